use crate::error::{Result, StatsError};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

pub const FIELD_DELIMITER: char = '|';

/// Load the non-empty lines of a text file, in order, without line endings.
pub fn load_text_data(path: &Path, verbose: bool) -> Result<Vec<String>> {
    let file = File::open(path).map_err(|e| StatsError::file_access(path, e))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        let line = line.map_err(|e| StatsError::file_access(path, e))?;
        let line = line.trim_end_matches('\r');
        if line.is_empty() {
            continue;
        }
        if verbose {
            log::trace!("{}: {}", path.display(), line);
        }
        lines.push(line.to_string());
    }

    if verbose {
        log::info!("Loaded {} lines from {}", lines.len(), path.display());
    }
    Ok(lines)
}

/// Read field `index` of a pipe-delimited record. `line_number` is 1-based
/// and only used to report a short record.
pub fn record_field<'a>(
    record: &'a str,
    index: usize,
    path: &Path,
    line_number: usize,
) -> Result<&'a str> {
    record
        .split(FIELD_DELIMITER)
        .nth(index)
        .ok_or_else(|| StatsError::MalformedRecord {
            path: path.to_path_buf(),
            line: line_number,
            field: index,
        })
}
