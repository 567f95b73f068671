use crate::error::{Result, StatsError};
use crate::frequency::FrequencyTable;
use crate::loader::load_text_data;
use crate::vocabulary::Vocabulary;
use serde::Serialize;
use std::fmt::Write as _;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// Write `contents` to a temporary file next to `path` and rename it into
/// place, so `path` is either fully written or untouched.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let parent_dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    std::fs::create_dir_all(parent_dir).map_err(|e| StatsError::file_access(parent_dir, e))?;

    let mut temp_file =
        NamedTempFile::new_in(parent_dir).map_err(|e| StatsError::file_access(parent_dir, e))?;
    temp_file
        .write_all(contents)
        .map_err(|e| StatsError::file_access(path, e))?;
    temp_file
        .persist(path)
        .map_err(|e| StatsError::file_access(path, e.error))?;
    Ok(())
}

fn format_plain<'a>(entries: impl IntoIterator<Item = (&'a str, usize)>) -> String {
    let mut out = String::new();
    for (name, count) in entries {
        let _ = writeln!(out, "{} {}", name, count);
    }
    out
}

/// One `name count` line per entry, by descending count.
pub fn save_frequency_report(freq: &FrequencyTable, path: &Path) -> Result<()> {
    write_atomic(path, format_plain(freq.sorted()).as_bytes())
}

/// Markdown table of the entries with their share of the total.
pub fn save_markdown_report(freq: &FrequencyTable, heading: &str, path: &Path) -> Result<()> {
    let total = freq.total().max(1) as f64;
    let mut out = String::new();
    let _ = writeln!(out, "| {} | Count | Percent |", heading);
    let _ = writeln!(out, "| --- | ---: | ---: |");
    for (name, count) in freq.sorted() {
        let _ = writeln!(
            out,
            "| {} | {} | {:.2}% |",
            name,
            count,
            100.0 * count as f64 / total
        );
    }
    write_atomic(path, out.as_bytes())
}

/// Observed vocabulary tokens in index order with their corpus counts;
/// reserved tokens are left out.
pub fn save_vocabulary_report(vocab: &Vocabulary, freq: &FrequencyTable, path: &Path) -> Result<()> {
    let entries = vocab
        .observed()
        .map(|(_, token)| (token, freq.get(token).unwrap_or(0)));
    write_atomic(path, format_plain(entries).as_bytes())
}

/// Read a plain report back. Names may contain spaces; the count is the
/// last field.
pub fn read_frequency_report(path: &Path) -> Result<Vec<(String, usize)>> {
    load_text_data(path, false)?
        .iter()
        .enumerate()
        .map(|(i, line)| {
            line.rsplit_once(' ')
                .and_then(|(name, count)| Some((name.to_string(), count.parse().ok()?)))
                .ok_or_else(|| StatsError::MalformedRecord {
                    path: path.to_path_buf(),
                    line: i + 1,
                    field: 1,
                })
        })
        .collect()
}

pub fn save_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let bytes = serde_json::to_vec_pretty(value)?;
    write_atomic(path, &bytes)
}
