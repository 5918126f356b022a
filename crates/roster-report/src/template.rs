//! Sample-format template written as CSV.

use std::path::Path;

use roster_model::SampleFormat;
use tracing::info;

use crate::error::{ReportError, Result};

/// File name used when no output path is given.
pub const DEFAULT_TEMPLATE_NAME: &str = "sample_format.csv";

/// Header plus the first sample row, as CSV text.
pub fn template_csv(format: &SampleFormat) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    write_rows(&mut writer, format).map_err(|source| ReportError::CsvWrite {
        path: DEFAULT_TEMPLATE_NAME.into(),
        source,
    })?;
    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Write the template to `path`.
pub fn write_template(format: &SampleFormat, path: &Path) -> Result<()> {
    let to_error = |source| ReportError::CsvWrite {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::Writer::from_path(path).map_err(to_error)?;
    write_rows(&mut writer, format).map_err(to_error)?;
    writer.flush()?;
    info!(path = %path.display(), columns = format.columns.len(), "template written");
    Ok(())
}

fn write_rows<W: std::io::Write>(
    writer: &mut csv::Writer<W>,
    format: &SampleFormat,
) -> std::result::Result<(), csv::Error> {
    writer.write_record(&format.columns)?;
    if !format.sample_rows.is_empty() {
        writer.write_record(format.first_row_values())?;
    }
    Ok(())
}
