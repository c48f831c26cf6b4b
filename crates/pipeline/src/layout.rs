//! Output directory layout.

use std::fs;
use std::path::{Path, PathBuf};

use lisagg_calendar::Frequency;

use crate::error::PipelineError;

/// Where series CSVs and grid NetCDFs live under `<output_root>/pp`.
///
/// ```text
/// pp/
///   6hourly_TS/ daily_TS/ monthly_TS/ yearly_TS/   <name>.csv
///   daily_NC/   monthly_NC/ yearly_NC/             <name>.nc
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Layout rooted at `<output_root>/pp`.
    pub fn new(output_root: impl AsRef<Path>) -> Self {
        Self {
            root: output_root.as_ref().join("pp"),
        }
    }

    /// The `pp` directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Directory of series files at `freq`.
    pub fn series_dir(&self, freq: Frequency) -> PathBuf {
        self.root.join(format!("{}_TS", freq.dir_stem()))
    }

    /// Directory of grid files at `freq`.
    pub fn grid_dir(&self, freq: Frequency) -> PathBuf {
        self.root.join(format!("{}_NC", freq.dir_stem()))
    }

    /// Series file of `name` at `freq`.
    pub fn series_path(&self, freq: Frequency, name: &str) -> PathBuf {
        self.series_dir(freq).join(format!("{name}.csv"))
    }

    /// Grid file of `name` at `freq`.
    pub fn grid_path(&self, freq: Frequency, name: &str) -> PathBuf {
        self.grid_dir(freq).join(format!("{name}.nc"))
    }

    /// Create every series and grid directory of the chain.
    ///
    /// # Errors
    ///
    /// Returns [`PipelineError::Io`] if a directory cannot be created.
    pub fn create_dirs(&self) -> Result<(), PipelineError> {
        for freq in Frequency::CHAIN {
            fs::create_dir_all(self.series_dir(freq)).map_err(lisagg_io::IoError::from)?;
            if freq != Frequency::SixHourly {
                fs::create_dir_all(self.grid_dir(freq)).map_err(lisagg_io::IoError::from)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn paths() {
        let layout = OutputLayout::new("/out");
        assert_eq!(layout.root(), Path::new("/out/pp"));
        assert_eq!(
            layout.series_path(Frequency::SixHourly, "dis"),
            PathBuf::from("/out/pp/6hourly_TS/dis.csv")
        );
        assert_eq!(
            layout.grid_path(Frequency::Yearly, "dis_mm"),
            PathBuf::from("/out/pp/yearly_NC/dis_mm.nc")
        );
    }

    #[test]
    fn create_dirs_builds_tree() {
        let dir = tempfile::tempdir().unwrap();
        let layout = OutputLayout::new(dir.path());
        layout.create_dirs().unwrap();
        for stem in [
            "6hourly_TS",
            "daily_TS",
            "monthly_TS",
            "yearly_TS",
            "daily_NC",
            "monthly_NC",
            "yearly_NC",
        ] {
            assert!(layout.root().join(stem).is_dir(), "{stem}");
        }
        assert!(!layout.root().join("6hourly_NC").exists());
    }
}
