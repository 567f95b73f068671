use crate::error::{Result, StatsError};
use crate::frequency::FrequencyTable;
use crate::loader::{load_text_data, record_field};
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;

/// Resolves a raw label code to its canonical name.
pub trait LabelMap {
    fn resolve(&self, code: &str) -> Option<&str>;

    /// Name used in error messages.
    fn name(&self) -> &str;
}

/// Label map read from a `code|name` file, one mapping per line.
#[derive(Debug, Clone, Default)]
pub struct FileLabelMap {
    name: String,
    labels: HashMap<String, String>,
}

impl FileLabelMap {
    pub fn new(name: &str, labels: HashMap<String, String>) -> Self {
        Self {
            name: name.to_string(),
            labels,
        }
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let lines = load_text_data(path, false)?;
        let mut labels = HashMap::with_capacity(lines.len());
        for (i, line) in lines.iter().enumerate() {
            let code = record_field(line, 0, path, i + 1)?;
            let name = record_field(line, 1, path, i + 1)?;
            labels.insert(code.trim().to_string(), name.trim().to_string());
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        log::debug!("Loaded {} label mappings from {}", labels.len(), path.display());
        Ok(Self::new(&name, labels))
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

impl LabelMap for FileLabelMap {
    fn resolve(&self, code: &str) -> Option<&str> {
        self.labels.get(code).map(String::as_str)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Canonical labels of one granularity and how often each occurs.
#[derive(Debug, Clone, Serialize)]
pub struct LabelDistribution {
    /// Distinct labels by descending frequency.
    pub labels: Vec<String>,
    pub frequencies: FrequencyTable,
}

impl LabelDistribution {
    pub fn num_labels(&self) -> usize {
        self.labels.len()
    }
}

/// Count the canonical label at `field_index` of every corpus record.
/// An unmapped code is an error, never skipped.
pub fn extract_label_distribution<M: LabelMap>(
    records: &[String],
    corpus_path: &Path,
    label_map: &M,
    field_index: usize,
) -> Result<LabelDistribution> {
    let mut frequencies = FrequencyTable::new();
    for (i, record) in records.iter().enumerate() {
        let code = record_field(record, field_index, corpus_path, i + 1)?.trim();
        let label = label_map.resolve(code).ok_or_else(|| StatsError::Lookup {
            map: label_map.name().to_string(),
            code: code.to_string(),
        })?;
        frequencies.add(label);
    }

    Ok(LabelDistribution {
        labels: frequencies.keys_by_frequency(),
        frequencies,
    })
}

/// Load the corpus and the named label map and count one label column.
pub fn get_label_frequency_distributions(
    corpus_path: &Path,
    metadata_dir: &Path,
    label_map: &str,
    field_index: usize,
) -> Result<LabelDistribution> {
    let records = load_text_data(corpus_path, false)?;
    let label_map = FileLabelMap::load_from_file(&metadata_dir.join(label_map))?;
    extract_label_distribution(&records, corpus_path, &label_map, field_index)
}
