use crate::error::{Result, StatsError};
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILE: &str = "dialogue_stats.toml";

/// One label scheme: which corpus column to read and which map resolves it.
#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Granularity {
    pub name: String,
    pub label_map: String,
    pub field_index: usize,
    pub title: String,
}

impl Granularity {
    fn new(name: &str, field_index: usize, title: &str) -> Self {
        Self {
            name: name.to_string(),
            label_map: format!("{}_label_map.txt", name),
            field_index,
            title: title.to_string(),
        }
    }

    /// File name of the plain-text frequency dump, e.g. `basic_labels.txt`.
    pub fn report_file(&self) -> String {
        format!("{}_labels.txt", self.name)
    }
}

#[derive(Deserialize, Debug, Clone)]
#[serde(default)]
pub struct Config {
    pub data_dir: PathBuf,
    pub metadata_dir: PathBuf,
    pub corpus_file: String,
    pub chart_bars: usize,
    pub splits: Vec<String>,
    pub markdown_reports: bool,
    pub granularities: Vec<Granularity>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("mrda_data"),
            metadata_dir: PathBuf::from("metadata"),
            corpus_file: "full_set.txt".to_string(),
            chart_bars: 15,
            splits: vec!["train".into(), "test".into(), "val".into()],
            markdown_reports: false,
            granularities: vec![
                Granularity::new("basic", 2, "MRDA Basic Label Frequency Distributions"),
                Granularity::new("general", 3, "MRDA General Frequency Distributions"),
                Granularity::new("full", 4, "MRDA Full Frequency Distributions"),
            ],
        }
    }
}

impl Config {
    pub fn from_toml(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| StatsError::file_access(path, e))?;
        Self::from_toml(&content)
    }

    /// Reads `path` when it exists, otherwise falls back to the defaults.
    pub fn load_or_default(path: &Path) -> Result<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn with_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
            ..Self::default()
        }
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.data_dir.join(&self.metadata_dir)
    }

    pub fn corpus_path(&self) -> PathBuf {
        self.data_dir.join(&self.corpus_file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_granularities() {
        let config = Config::default();
        let names: Vec<_> = config.granularities.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["basic", "general", "full"]);
        assert_eq!(config.granularities[1].label_map, "general_label_map.txt");
        assert_eq!(config.granularities[2].field_index, 4);
        assert_eq!(config.granularities[0].report_file(), "basic_labels.txt");
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let config = Config::from_toml("data_dir = \"corpus\"\nchart_bars = 5\n").unwrap();
        assert_eq!(config.data_dir, PathBuf::from("corpus"));
        assert_eq!(config.chart_bars, 5);
        assert_eq!(config.splits, vec!["train", "test", "val"]);
        assert_eq!(config.metadata_path(), PathBuf::from("corpus").join("metadata"));
    }

    #[test]
    fn test_granularities_from_toml() {
        let content = r#"
splits = ["train"]

[[granularities]]
name = "basic"
label_map = "basic.txt"
field_index = 2
title = "Basic"
"#;
        let config = Config::from_toml(content).unwrap();
        assert_eq!(config.splits, vec!["train"]);
        assert_eq!(config.granularities.len(), 1);
        assert_eq!(config.granularities[0].label_map, "basic.txt");
    }

    #[test]
    fn test_invalid_toml() {
        let err = Config::from_toml("chart_bars = \"many\"").unwrap_err();
        assert!(matches!(err, StatsError::Config(_)));
    }
}
