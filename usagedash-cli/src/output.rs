use std::fs;
use std::path::{Path, PathBuf};

use usagedash_core::serde_utils::from_json_bytes;
use usagedash_protocol::prelude::{ExportFile, ExportFormat, UsageEvent};

use crate::error::CliError;

/// Writes `file` to `output`. A directory (or no output at all) receives the
/// server-suggested file name.
pub fn write_export(file: &ExportFile, output: Option<&Path>) -> Result<PathBuf, CliError> {
    let path = match output {
        Some(path) if path.is_dir() => path.join(&file.filename),
        Some(path) => path.to_path_buf(),
        None => PathBuf::from(&file.filename),
    };
    fs::write(&path, &file.bytes)?;
    Ok(path)
}

/// Number of exported events: array entries for JSON, data rows for CSV.
pub fn record_count(format: ExportFormat, file: &ExportFile) -> Result<usize, CliError> {
    match format {
        ExportFormat::Json => {
            let events: Vec<UsageEvent> = from_json_bytes(&file.bytes)?;
            Ok(events.len())
        }
        ExportFormat::Csv => Ok(csv_rows(&file.bytes).saturating_sub(1)),
    }
}

/// Non-blank CSV records. Newlines inside quoted fields stay in their record.
fn csv_rows(bytes: &[u8]) -> usize {
    let mut rows = 0;
    let mut quoted = false;
    let mut blank = true;
    for byte in bytes {
        match byte {
            b'"' => {
                // A doubled quote toggles twice and stays inside the field.
                quoted = !quoted;
                blank = false;
            }
            b'\n' if !quoted => {
                if !blank {
                    rows += 1;
                }
                blank = true;
            }
            b'\r' if !quoted => {}
            _ => blank = false,
        }
    }
    if !blank {
        rows += 1;
    }
    rows
}
