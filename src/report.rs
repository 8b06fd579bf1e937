use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::error::{Result, SurveyError};
use crate::models::SurveyRecord;

/// Report columns, in the order downstream tools expect them.
pub const CSV_COLUMNS: [&str; 6] = [
    "Image",
    "Est. Hub Height (m)",
    "Ref. Wind Speed (m/s)",
    "Wind Shear Alpha",
    "Proj. Wind Speed (m/s)",
    "Site Suitability",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Csv,
    Json,
}

impl ReportFormat {
    /// `.json` selects JSON, anything else CSV
    pub fn from_path(path: &Path) -> Self {
        let lower = path.to_string_lossy().to_lowercase();
        if lower.ends_with(".json") {
            ReportFormat::Json
        } else {
            ReportFormat::Csv
        }
    }
}

/// Quote a field if it contains a delimiter, quote or line break
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

pub fn write_csv<W: Write>(writer: &mut W, records: &[SurveyRecord]) -> Result<()> {
    writeln!(writer, "{}", CSV_COLUMNS.join(","))?;
    for record in records {
        writeln!(
            writer,
            "{},{:.2},{},{},{:.2},{}",
            csv_field(&record.image),
            record.estimated_hub_height_m,
            record.wind.reference_speed_m_s,
            record.wind.shear_exponent,
            record.wind.projected_speed_m_s,
            record.wind.suitability
        )?;
    }
    Ok(())
}

pub fn write_json<W: Write>(writer: &mut W, records: &[SurveyRecord]) -> Result<()> {
    serde_json::to_writer_pretty(&mut *writer, records)
        .map_err(|e| SurveyError::Report(format!("failed to serialize records: {e}")))?;
    writeln!(writer)?;
    Ok(())
}

/// Write `records` to `path`, in the format its extension selects.
pub fn write_report(path: &Path, records: &[SurveyRecord]) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    match ReportFormat::from_path(path) {
        ReportFormat::Csv => write_csv(&mut writer, records)?,
        ReportFormat::Json => write_json(&mut writer, records)?,
    }
    writer.flush()?;
    Ok(())
}
