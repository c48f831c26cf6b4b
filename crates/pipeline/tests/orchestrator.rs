mod common;

use approx::assert_relative_eq;
use chrono::TimeDelta;
use common::{MemStore, at, daily_two_months, grid_1x2};
use lisagg_aggregate::{CellAreas, Method};
use lisagg_calendar::Frequency;
use lisagg_pipeline::{
    Classification, PipelineConfig, RunContext, SkipReason, VariableOutcome, VariableTask,
    run_all, run_variable,
};
use std::path::Path;

fn classes() -> Classification {
    Classification::new(
        vec!["rain".to_string()],
        vec!["sm".to_string()],
        vec!["dis".to_string()],
    )
    .unwrap()
}

fn config(native: Frequency) -> PipelineConfig {
    PipelineConfig::new(native, classes()).with_spatial_methods(vec![Method::Mean, Method::Max])
}

fn run(name: &str, path: &str, config: &PipelineConfig, store: &MemStore) -> VariableOutcome {
    let ctx = RunContext {
        config,
        store,
        areas: None,
    };
    run_variable(name, Path::new(path), &ctx)
}

#[test]
fn flux_chain_writes_every_resolution() {
    let store = MemStore::default().with_source("rain.nc", daily_two_months("rainfall"));
    let cfg = config(Frequency::Daily);

    assert_eq!(run("rain", "rain.nc", &cfg, &store), VariableOutcome::Completed);

    let daily = store.series(Frequency::Daily, "rain", "rain_mean").unwrap();
    assert_eq!(daily.len(), 59);
    assert_relative_eq!(daily.values()[0], 1.5);

    // January: cells sum to 31 and 62.
    let monthly = store.series(Frequency::Monthly, "rain", "rain_max_M_sum").unwrap();
    assert_eq!(monthly.times(), &[at(2023, 1, 31, 0), at(2023, 2, 28, 0)]);
    assert_relative_eq!(monthly.values()[0], 62.0);

    let yearly = store.series(Frequency::Yearly, "rain", "rain_mean_Y_sum").unwrap();
    assert_eq!(yearly.times(), &[at(2023, 12, 31, 0)]);
    assert_relative_eq!(yearly.values()[0], 88.5);

    // Grids are only persisted on request.
    assert!(store.grid_keys().is_empty());
}

#[test]
fn state_chain_averages() {
    let store = MemStore::default().with_source("sm.nc", daily_two_months("sm"));
    let cfg = config(Frequency::Daily).with_save_grids(true);

    assert_eq!(run("sm", "sm.nc", &cfg, &store), VariableOutcome::Completed);

    let monthly = store.grid(Frequency::Monthly, "sm").unwrap();
    assert_eq!(monthly.values(), &[1.0, 2.0, 1.0, 2.0]);
    assert_eq!(monthly.attribute("cell_methods"), Some("time: mean"));
    let yearly = store.grid(Frequency::Yearly, "sm").unwrap();
    assert_eq!(yearly.values(), &[1.0, 2.0]);
    assert!(store.grid(Frequency::Daily, "sm").is_none());
}

#[test]
fn six_hourly_native_persists_daily_grid() {
    let src = grid_1x2("rain", at(2023, 1, 1, 6), TimeDelta::hours(6), 8, |t, _| t as f64);
    let store = MemStore::default().with_source("rain.nc", src);
    let cfg = config(Frequency::SixHourly).with_save_grids(true);

    assert_eq!(run("rain", "rain.nc", &cfg, &store), VariableOutcome::Completed);

    let six = store.series(Frequency::SixHourly, "rain", "rain_mean").unwrap();
    assert_eq!(six.times()[0], at(2023, 1, 1, 0));

    let daily = store.grid(Frequency::Daily, "rain").unwrap();
    // Jan 1: steps 0..=2, Jan 2: 3..=6, Jan 3: 7
    assert_eq!(daily.times(), &[at(2023, 1, 1, 0), at(2023, 1, 2, 0), at(2023, 1, 3, 0)]);
    assert_eq!(daily.values(), &[3.0, 3.0, 18.0, 18.0, 7.0, 7.0]);
    assert!(store.grid(Frequency::Monthly, "rain").is_some());
    assert!(store.grid(Frequency::Yearly, "rain").is_some());
}

#[test]
fn yearly_output_means_done() {
    let store = MemStore::default()
        .with_source("rain.nc", daily_two_months("rain"))
        .with_grid(Frequency::Yearly, daily_two_months("rain"));

    let outcome = run("rain", "rain.nc", &config(Frequency::Daily), &store);
    assert_eq!(outcome, VariableOutcome::AlreadyDone);
    assert!(store.series_keys().is_empty());
    assert_eq!(store.grid_keys().len(), 1);
}

#[test]
fn overwrite_ignores_existing_output() {
    let store = MemStore::default()
        .with_source("rain.nc", daily_two_months("rain"))
        .with_grid(Frequency::Yearly, daily_two_months("rain"));
    let cfg = config(Frequency::Daily).with_overwrite(true);

    assert_eq!(run("rain", "rain.nc", &cfg, &store), VariableOutcome::Completed);
    assert!(store.series(Frequency::Daily, "rain", "rain_mean").is_some());
}

#[test]
fn resumes_from_monthly_without_touching_source() {
    let monthly = grid_1x2("rain", at(2023, 1, 31, 0), TimeDelta::days(28), 1, |_, c| {
        10.0 * (c + 1) as f64
    });
    // No source registered: loading it would skip the variable.
    let store = MemStore::default().with_grid(Frequency::Monthly, monthly);
    let cfg = config(Frequency::Daily).with_save_grids(true);

    assert_eq!(run("rain", "rain.nc", &cfg, &store), VariableOutcome::Completed);

    // The monthly series is rewritten from the persisted grid as is.
    let monthly = store.series(Frequency::Monthly, "rain", "rain_mean").unwrap();
    assert_eq!(monthly.times(), &[at(2023, 1, 31, 0)]);
    assert_relative_eq!(monthly.values()[0], 15.0);
    assert!(store.series(Frequency::Daily, "rain", "rain_mean").is_none());
    assert_eq!(
        store.series_keys(),
        vec![
            (Frequency::Monthly, "rain".to_string()),
            (Frequency::Yearly, "rain".to_string())
        ]
    );
    let yearly = store.series(Frequency::Yearly, "rain", "rain_mean_Y_sum").unwrap();
    assert_relative_eq!(yearly.values()[0], 15.0);
    assert!(store.grid(Frequency::Yearly, "rain").is_some());
}

#[test]
fn daily_checkpoint_ignored_for_daily_native() {
    let store = MemStore::default()
        .with_source("rain.nc", daily_two_months("rain"))
        .with_grid(Frequency::Daily, daily_two_months("rain"));

    assert_eq!(
        run("rain", "rain.nc", &config(Frequency::Daily), &store),
        VariableOutcome::Completed
    );
    // Started from native, so the daily series exists.
    assert!(store.series(Frequency::Daily, "rain", "rain_mean").is_some());
}

#[test]
fn unclassified_is_skipped() {
    let store = MemStore::default().with_source("x.nc", daily_two_months("x"));
    assert_eq!(
        run("x", "x.nc", &config(Frequency::Daily), &store),
        VariableOutcome::Skipped {
            reason: SkipReason::Unclassified
        }
    );
}

#[test]
fn unreadable_source_is_skipped() {
    let store = MemStore::default();
    let outcome = run("rain", "missing.nc", &config(Frequency::Daily), &store);
    assert!(matches!(
        outcome,
        VariableOutcome::Skipped {
            reason: SkipReason::LoadFailed { .. }
        }
    ));
}

#[test]
fn write_failure_halts_chain() {
    let mut store = MemStore::default().with_source("rain.nc", daily_two_months("rain"));
    store.fail_writes_at = Some(Frequency::Monthly);

    let outcome = run("rain", "rain.nc", &config(Frequency::Daily), &store);
    assert_eq!(
        outcome,
        VariableOutcome::Failed {
            at: Frequency::Monthly
        }
    );
    assert!(store.series(Frequency::Daily, "rain", "rain_mean").is_some());
    assert!(store.series(Frequency::Yearly, "rain", "rain_mean_Y_sum").is_none());
}

#[test]
fn empty_time_axis_fails_at_first_step() {
    let empty = grid_1x2("rain", at(2023, 1, 1, 0), TimeDelta::days(1), 0, |_, _| 0.0);
    let store = MemStore::default().with_source("rain.nc", empty);
    let cfg = config(Frequency::Daily).with_save_grids(true);

    assert_eq!(
        run("rain", "rain.nc", &cfg, &store),
        VariableOutcome::Failed {
            at: Frequency::Monthly
        }
    );
    assert!(store.grid_keys().is_empty());
    assert!(store.series_keys().is_empty());
}

#[test]
fn discharge_without_areas_is_skipped() {
    let store = MemStore::default().with_source("dis.nc", daily_two_months("dis"));
    assert_eq!(
        run("dis", "dis.nc", &config(Frequency::Daily), &store),
        VariableOutcome::Skipped {
            reason: SkipReason::MissingAreaGrid
        }
    );
}

#[test]
fn discharge_dual_path_from_six_hourly() {
    let src = grid_1x2("dis", at(2023, 1, 1, 6), TimeDelta::hours(6), 8, |_, _| 2.0);
    let store = MemStore::default().with_source("dis.nc", src);
    let cfg = config(Frequency::SixHourly).with_save_grids(true);
    let areas = CellAreas::new(1, 2, vec![1.0e6, 2.0e6]).unwrap();
    let ctx = RunContext {
        config: &cfg,
        store: &store,
        areas: Some(&areas),
    };

    assert_eq!(
        run_variable("dis", Path::new("dis.nc"), &ctx),
        VariableOutcome::Completed
    );

    // Rate path: averaged, un-suffixed.
    let rate_daily = store.grid(Frequency::Daily, "dis").unwrap();
    assert_eq!(rate_daily.values(), &[2.0; 6]);
    let rate_monthly = store.grid(Frequency::Monthly, "dis").unwrap();
    assert_eq!(rate_monthly.values(), &[2.0, 2.0]);
    assert!(store.series(Frequency::SixHourly, "dis", "dis_mean").is_some());

    // Depth path: r * 86400 * 1000 / a per day, summed per month.
    let depth_daily = store.grid(Frequency::Daily, "dis_mm").unwrap();
    assert_relative_eq!(depth_daily.values()[0], 172.8, epsilon = 1e-9);
    assert_relative_eq!(depth_daily.values()[1], 86.4, epsilon = 1e-9);
    assert_eq!(depth_daily.units(), Some("mm/day"));

    let depth_monthly = store.grid(Frequency::Monthly, "dis_mm").unwrap();
    assert_relative_eq!(depth_monthly.values()[0], 3.0 * 172.8, epsilon = 1e-9);
    assert_relative_eq!(depth_monthly.values()[1], 3.0 * 86.4, epsilon = 1e-9);
    assert!(store.grid(Frequency::Yearly, "dis_mm").is_some());

    let depth_series = store
        .series(Frequency::Monthly, "dis_mm", "dis_mm_mean_M_sum")
        .unwrap();
    assert_relative_eq!(depth_series.values()[0], 388.8, epsilon = 1e-9);
    assert!(store.series(Frequency::SixHourly, "dis_mm", "dis_mm_mean").is_none());
}

#[test]
fn discharge_done_when_both_yearly_grids_exist() {
    let store = MemStore::default()
        .with_source("dis.nc", daily_two_months("dis"))
        .with_grid(Frequency::Yearly, daily_two_months("dis"))
        .with_grid(Frequency::Yearly, daily_two_months("dis_mm"));
    let cfg = config(Frequency::Daily);
    let areas = CellAreas::new(1, 2, vec![1.0, 1.0]).unwrap();
    let ctx = RunContext {
        config: &cfg,
        store: &store,
        areas: Some(&areas),
    };
    assert_eq!(
        run_variable("dis", Path::new("dis.nc"), &ctx),
        VariableOutcome::AlreadyDone
    );
}

#[test]
fn discharge_area_shape_mismatch_fails_depth_only() {
    let store = MemStore::default().with_source("dis.nc", daily_two_months("dis"));
    let cfg = config(Frequency::Daily);
    let areas = CellAreas::new(2, 1, vec![1.0, 1.0]).unwrap();
    let ctx = RunContext {
        config: &cfg,
        store: &store,
        areas: Some(&areas),
    };
    assert_eq!(
        run_variable("dis", Path::new("dis.nc"), &ctx),
        VariableOutcome::Failed {
            at: Frequency::Daily
        }
    );
    // The rate path still ran.
    assert!(store.series(Frequency::Yearly, "dis", "dis_mean_Y_mean").is_some());
}

#[test]
fn pool_reports_every_task_in_order() {
    let store = MemStore::default()
        .with_source("rain.nc", daily_two_months("rain"))
        .with_source("sm.nc", daily_two_months("sm"));
    let cfg = config(Frequency::Daily);
    let ctx = RunContext {
        config: &cfg,
        store: &store,
        areas: None,
    };
    let tasks: Vec<VariableTask> = [("rain", "rain.nc"), ("bogus", "bogus.nc"), ("sm", "sm.nc")]
        .into_iter()
        .map(|(name, path)| VariableTask {
            name: name.to_string(),
            path: path.into(),
        })
        .collect();

    let reports = run_all(&tasks, &ctx, 2).unwrap();
    let names: Vec<_> = reports.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["rain", "bogus", "sm"]);
    assert_eq!(reports[0].outcome, VariableOutcome::Completed);
    assert!(matches!(reports[1].outcome, VariableOutcome::Skipped { .. }));
    assert_eq!(reports[2].outcome, VariableOutcome::Completed);
}

#[test]
fn pool_with_no_tasks() {
    let store = MemStore::default();
    let cfg = config(Frequency::Daily);
    let ctx = RunContext {
        config: &cfg,
        store: &store,
        areas: None,
    };
    assert!(run_all(&[], &ctx, 4).unwrap().is_empty());
    assert!(run_all(&[], &ctx, 0).is_err());
}
