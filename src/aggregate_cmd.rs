//! Aggregate command: discover model outputs and run the pipeline on each.

use std::path::Path;

use anyhow::{Context, Result, bail};
use tracing::{info, info_span, warn};

use lisagg_aggregate::CellAreas;
use lisagg_io::{BindingMatcher, LoaderConfig, discover_variables, load_cell_areas};
use lisagg_pipeline::{
    FsStore, OutputLayout, RunContext, VariableOutcome, VariableReport, VariableTask,
    default_workers, run_all,
};

use crate::cli::AggregateArgs;
use crate::config::LisaggConfig;
use crate::convert;

/// Run the full aggregation.
pub fn run(args: AggregateArgs) -> Result<()> {
    let _cmd = info_span!("aggregate").entered();
    let config = LisaggConfig::from_file(&args.config)?;

    // 1. Resolve paths; CLI flags win over the file
    let output_root = args
        .output_root
        .or_else(|| config.model.output_root.clone())
        .context("no output root: set [model].output_root or use --output-root")?;
    let maps_path = args.maps_path.or_else(|| config.model.maps_path.clone());
    if let Some(dir) = &maps_path
        && !dir.is_dir()
    {
        bail!("maps path is not a directory: {}", dir.display());
    }

    // 2. Build crate configs
    let dt_sec = config
        .model
        .dt_sec
        .context("no model timestep: set [model].dt_sec")?;
    let native = convert::native_frequency(dt_sec)?;
    let mut pipeline = convert::build_pipeline_config(&config.aggregation, native)?;
    if args.save_grids {
        pipeline = pipeline.with_save_grids(true);
    }
    if args.overwrite {
        pipeline = pipeline.with_overwrite(true);
    }
    let workers = args
        .workers
        .or(config.aggregation.workers)
        .unwrap_or_else(default_workers);
    let loader = convert::build_loader_config(&config.io)?;
    let matcher = BindingMatcher::new(&convert::build_bindings(&config.bindings))
        .context("invalid [bindings] pattern")?;

    // 3. Discover variables
    let found = discover_variables(&output_root, &matcher, &config.aggregation.ignore)
        .with_context(|| format!("failed to scan output root: {}", output_root.display()))?;
    if found.is_empty() {
        info!(dir = %output_root.display(), "no NetCDF files to process");
        return Ok(());
    }
    info!(n_variables = found.len(), native = %native, workers, "variables discovered");

    let layout = OutputLayout::new(&output_root);
    layout.create_dirs().context("failed to create output directories")?;

    // 4. Cell areas, once, only if some discharge variable is present
    let areas = if pipeline
        .classification()
        .any_discharge(found.keys().map(String::as_str))
    {
        load_areas(
            convert::area_path(&config.model, maps_path.as_deref()).as_deref(),
            &loader,
        )
    } else {
        None
    };

    // 5. Fan out
    let tasks: Vec<VariableTask> = found
        .into_iter()
        .map(|(name, path)| VariableTask { name, path })
        .collect();
    let store = FsStore::new(layout, loader);
    let ctx = RunContext {
        config: &pipeline,
        store: &store,
        areas: areas.as_ref(),
    };
    let reports = run_all(&tasks, &ctx, workers)?;
    summarise(&reports);
    Ok(())
}

/// Loads the cell-area grid. Failure only disables the discharge path.
fn load_areas(path: Option<&Path>, loader: &LoaderConfig) -> Option<CellAreas> {
    let Some(path) = path else {
        warn!("no [model].pixel_area configured; discharge variables will be skipped");
        return None;
    };
    match load_cell_areas(path, loader) {
        Ok(areas) => {
            info!(path = %path.display(), shape = ?areas.shape(), "cell areas loaded");
            Some(areas)
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "cell areas unavailable; discharge variables will be skipped"
            );
            None
        }
    }
}

fn summarise(reports: &[VariableReport]) {
    let mut done = 0;
    let mut completed = 0;
    let mut skipped = 0;
    let mut failed = Vec::new();
    for r in reports {
        match &r.outcome {
            VariableOutcome::AlreadyDone => done += 1,
            VariableOutcome::Completed => completed += 1,
            VariableOutcome::Skipped { .. } => skipped += 1,
            VariableOutcome::Failed { .. } => failed.push(r.name.as_str()),
        }
    }
    info!(completed, already_done = done, skipped, failed = failed.len(), "aggregation finished");
    if !failed.is_empty() {
        warn!(variables = ?failed, "some variables did not complete; rerun to resume");
    }
}
