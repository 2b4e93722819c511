use std::path::Path;

use thiserror::Error;

use super::model::StressSeries;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("writing CSV")]
    Csv(#[from] csv::Error),
    #[error("flushing CSV")]
    Io(#[from] std::io::Error),
}

/// Write the series as `count,fps` rows with a header.
pub fn export_csv(series: &StressSeries, path: &Path) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for sample in series.samples() {
        writer.serialize(sample)?;
    }
    writer.flush()?;
    Ok(())
}
