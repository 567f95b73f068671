use crate::error::{Result, StatsError};
use crate::frequency::FrequencyTable;
use crate::labels::LabelDistribution;
use crate::report::save_json;
use crate::splits::{DialogueStats, SplitStats};
use crate::vocabulary::Vocabulary;
use serde::ser::{Serialize, SerializeMap, Serializer};
use std::path::Path;

pub const METADATA_FILE: &str = "metadata.json";

/// Arithmetic mean of counts; NaN when there are none.
pub fn mean(values: impl IntoIterator<Item = usize>) -> f64 {
    use statrs::statistics::Statistics;
    values
        .into_iter()
        .map(|v| v as f64)
        .collect::<Vec<_>>()
        .mean()
}

#[derive(Debug, Clone, PartialEq)]
pub struct UtteranceStats {
    pub num_utterances: usize,
    pub num_tokens: usize,
    pub max_utterance_len: usize,
    pub mean_utterance_len: f64,
}

impl UtteranceStats {
    /// Length statistics over tokenized utterances. `num_utterances` is the
    /// raw utterance count the tokenized sequences must agree with.
    pub fn from_tokenized(num_utterances: usize, tokenized: &[Vec<String>]) -> Result<Self> {
        if tokenized.len() != num_utterances {
            return Err(StatsError::Consistency(format!(
                "{} tokenized utterances for {} raw utterances",
                tokenized.len(),
                num_utterances
            )));
        }
        if num_utterances == 0 {
            return Err(StatsError::Consistency("corpus has no utterances".to_string()));
        }

        let lengths = tokenized.iter().map(Vec::len);
        Ok(Self {
            num_utterances,
            num_tokens: lengths.clone().sum(),
            max_utterance_len: lengths.clone().max().unwrap_or(0),
            mean_utterance_len: mean(lengths),
        })
    }
}

/// Everything computed in one run, persisted once at the end.
#[derive(Debug, Clone)]
pub struct Metadata {
    pub utterances: UtteranceStats,
    pub word_freq: FrequencyTable,
    pub vocabulary: Vocabulary,
    /// Label distributions keyed by granularity name, in run order.
    pub labels: Vec<(String, LabelDistribution)>,
    pub dialogues: DialogueStats,
}

impl Metadata {
    pub fn label_distribution(&self, granularity: &str) -> Option<&LabelDistribution> {
        self.labels
            .iter()
            .find(|(name, _)| name == granularity)
            .map(|(_, dist)| dist)
    }

    pub fn split(&self, name: &str) -> Option<&SplitStats> {
        self.dialogues.splits.iter().find(|s| s.name == name)
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        save_json(self, path)
    }
}

// Flat record: one key per statistic, named after its granularity or split.
impl Serialize for Metadata {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        map.serialize_entry("num_utterances", &self.utterances.num_utterances)?;
        map.serialize_entry("num_tokens", &self.utterances.num_tokens)?;
        map.serialize_entry("max_utterance_len", &self.utterances.max_utterance_len)?;
        map.serialize_entry("mean_utterance_len", &self.utterances.mean_utterance_len)?;
        map.serialize_entry("word_freq", &self.word_freq)?;
        map.serialize_entry("vocabulary", &self.vocabulary)?;
        map.serialize_entry("vocabulary_size", &self.vocabulary.len())?;

        for (name, dist) in &self.labels {
            map.serialize_entry(&format!("{}_label_freq", name), &dist.frequencies)?;
            map.serialize_entry(&format!("{}_labels", name), &dist.labels)?;
            map.serialize_entry(&format!("num_{}_labels", name), &dist.num_labels())?;
        }

        for split in &self.dialogues.splits {
            map.serialize_entry(&format!("{}_num_dialogues", split.name), &split.num_dialogues)?;
            map.serialize_entry(
                &format!("{}_max_dialogues_len", split.name),
                &split.max_dialogues_len,
            )?;
        }
        map.serialize_entry("num_dialogues", &self.dialogues.num_dialogues)?;
        map.serialize_entry("max_dialogues_len", &self.dialogues.max_dialogues_len)?;
        map.serialize_entry("mean_dialogues_len", &self.dialogues.mean_dialogues_len)?;
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::splits::aggregate;

    fn tokenized(lengths: &[usize]) -> Vec<Vec<String>> {
        lengths
            .iter()
            .map(|&n| (0..n).map(|i| format!("t{}", i)).collect())
            .collect()
    }

    #[test]
    fn test_mean() {
        assert!((mean([2, 1, 3]) - 2.0).abs() < 1e-12);
        assert!(mean(Vec::new()).is_nan());
    }

    #[test]
    fn test_utterance_stats() {
        let stats = UtteranceStats::from_tokenized(3, &tokenized(&[2, 1, 1])).unwrap();
        assert_eq!(stats.num_tokens, 4);
        assert_eq!(stats.max_utterance_len, 2);
        let expected = stats.num_tokens as f64 / stats.num_utterances as f64;
        assert!((stats.mean_utterance_len - expected).abs() < 1e-12);
    }

    #[test]
    fn test_count_mismatch() {
        let err = UtteranceStats::from_tokenized(4, &tokenized(&[1, 1])).unwrap_err();
        assert!(matches!(err, StatsError::Consistency(_)));
    }

    #[test]
    fn test_empty_corpus() {
        let err = UtteranceStats::from_tokenized(0, &[]).unwrap_err();
        assert!(matches!(err, StatsError::Consistency(_)));
    }

    #[test]
    fn test_flat_record_keys() {
        let word_freq = FrequencyTable::count(["hi", "there", "hi", "bye"]);
        let frequencies = FrequencyTable::count(["A", "A", "B"]);
        let metadata = Metadata {
            utterances: UtteranceStats::from_tokenized(3, &tokenized(&[2, 1, 1])).unwrap(),
            vocabulary: Vocabulary::from_frequencies(&word_freq),
            word_freq,
            labels: vec![(
                "general".to_string(),
                LabelDistribution {
                    labels: frequencies.keys_by_frequency(),
                    frequencies,
                },
            )],
            dialogues: aggregate(vec![SplitStats {
                name: "train".to_string(),
                num_dialogues: 2,
                max_dialogues_len: 5,
                dialogue_lengths: vec![5, 3],
            }])
            .unwrap(),
        };

        let json = serde_json::to_value(&metadata).unwrap();
        assert_eq!(json["num_utterances"], 3);
        assert_eq!(json["vocabulary_size"], 7);
        assert_eq!(json["general_label_freq"]["A"], 2);
        assert_eq!(json["general_labels"], serde_json::json!(["A", "B"]));
        assert_eq!(json["num_general_labels"], 2);
        assert_eq!(json["train_num_dialogues"], 2);
        assert_eq!(json["train_max_dialogues_len"], 5);
        assert_eq!(json["mean_dialogues_len"], 4.0);
        assert!(metadata.label_distribution("basic").is_none());
        assert_eq!(metadata.split("train").unwrap().num_dialogues, 2);
    }
}
