//! TSS command: convert LISFLOOD time-series tables to CSV.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::{NaiveDateTime, TimeDelta};
use tracing::{error, info, info_span};

use lisagg_io::{convert_tss, list_tss_files};

use crate::cli::TssArgs;
use crate::config::{LisaggConfig, ModelToml};
use crate::convert;

/// Run the conversion of one file or a directory of files.
pub fn run(args: TssArgs) -> Result<()> {
    let _cmd = info_span!("tss").entered();
    let model = match &args.config {
        Some(path) => LisaggConfig::from_file(path)?.model,
        None => ModelToml::default(),
    };

    let start = args
        .start
        .or(model.calendar_day_start)
        .context("no start date: use --start or set [model].calendar_day_start")?;
    let start = convert::parse_start(&start)?;
    let dt_sec = args
        .dt_sec
        .or(model.dt_sec)
        .context("no timestep: use --dt-sec or set [model].dt_sec")?;
    if dt_sec == 0 {
        bail!("timestep must be positive");
    }
    let dt = TimeDelta::try_seconds(i64::try_from(dt_sec)?).context("timestep out of range")?;

    if args.input.is_dir() {
        let out_dir = args.output.unwrap_or_else(|| args.input.clone());
        convert_dir(&args.input, &out_dir, start, dt)
    } else {
        let output = args
            .output
            .unwrap_or_else(|| args.input.with_extension("csv"));
        convert_tss(&args.input, &output, start, dt)
            .with_context(|| format!("failed to convert {}", args.input.display()))?;
        Ok(())
    }
}

fn convert_dir(input: &Path, out_dir: &Path, start: NaiveDateTime, dt: TimeDelta) -> Result<()> {
    let files = list_tss_files(input)
        .with_context(|| format!("failed to list {}", input.display()))?;
    if files.is_empty() {
        info!(dir = %input.display(), "no .tss files found");
        return Ok(());
    }
    fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create {}", out_dir.display()))?;

    let mut failed = 0;
    for file in &files {
        let output = csv_path(file, out_dir);
        if let Err(e) = convert_tss(file, &output, start, dt) {
            error!(file = %file.display(), error = %e, "tss conversion failed");
            failed += 1;
        }
    }
    info!(converted = files.len() - failed, failed, "tss conversion finished");
    if failed > 0 {
        bail!("{failed} of {} tss files could not be converted", files.len());
    }
    Ok(())
}

fn csv_path(tss: &Path, out_dir: &Path) -> PathBuf {
    let stem = tss.file_stem().unwrap_or(tss.as_os_str()).to_string_lossy();
    out_dir.join(format!("{stem}.csv"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(input: PathBuf, output: Option<PathBuf>) -> TssArgs {
        TssArgs {
            input,
            output,
            config: None,
            start: Some("1990-01-02 06:00".to_string()),
            dt_sec: Some(21_600),
        }
    }

    #[test]
    fn single_file_defaults_to_sibling_csv() {
        let dir = tempfile::tempdir().unwrap();
        let tss = dir.path().join("dis.tss");
        fs::write(&tss, "timeseries scalar\n2\ntimestep\n7\n 1 0.5\n 2 0.75\n").unwrap();

        run(args(tss, None)).unwrap();

        let text = fs::read_to_string(dir.path().join("dis.csv")).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "time,7");
        assert_eq!(lines[1], "1990-01-02 06:00:00,0.5");
        assert_eq!(lines[2], "1990-01-02 12:00:00,0.75");
    }

    #[test]
    fn directory_into_other_directory() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("tss");
        fs::create_dir(&input).unwrap();
        fs::write(input.join("a.tss"), " 1 1.0 2.0\n 2 3.0 4.0\n").unwrap();
        fs::write(input.join("b.tss"), " 1 5.0\n").unwrap();
        let out = dir.path().join("csv");

        run(args(input, Some(out.clone()))).unwrap();

        assert!(out.join("a.csv").is_file());
        assert!(out.join("b.csv").is_file());
    }

    #[test]
    fn start_is_required() {
        let dir = tempfile::tempdir().unwrap();
        let mut a = args(dir.path().join("x.tss"), None);
        a.start = None;
        let err = run(a).unwrap_err();
        assert!(format!("{err:#}").contains("no start date"));
    }
}
