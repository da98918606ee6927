//! JSON table export: one `<report>.json` array per table

use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::features::reports::{ReportSet, ReportTable};
use crate::shared::models::{FunnelError, Result};

pub struct JsonReporter;

impl JsonReporter {
    /// Write one table to `<output_dir>/<report>.json`
    pub fn save_table(table: &ReportTable, output_dir: &Path) -> Result<PathBuf> {
        let kind = table.kind();
        let path = output_dir.join(format!("{}.json", kind.as_str()));
        let json = serde_json::to_string_pretty(table)
            .map_err(|e| FunnelError::from(e).with_report(kind.as_str()))?;
        fs::write(&path, json)?;
        Ok(path)
    }

    /// Write every table in `reports`, creating `output_dir` if needed
    pub fn save(reports: &ReportSet, output_dir: &Path) -> Result<Vec<PathBuf>> {
        fs::create_dir_all(output_dir)?;

        let paths = reports
            .tables()
            .iter()
            .map(|table| Self::save_table(table, output_dir))
            .collect::<Result<Vec<_>>>()?;

        info!(
            tables = paths.len(),
            dir = %output_dir.display(),
            "report tables written"
        );
        Ok(paths)
    }
}
