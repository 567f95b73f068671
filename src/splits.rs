use crate::error::{Result, StatsError};
use crate::loader::load_text_data;
use crate::metadata::mean;
use serde::Serialize;
use std::path::Path;

/// Dialogue counts of one split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SplitStats {
    pub name: String,
    pub num_dialogues: usize,
    pub max_dialogues_len: usize,
    /// Utterance count of every dialogue, in manifest order.
    #[serde(skip)]
    pub dialogue_lengths: Vec<usize>,
}

/// Per-split and combined dialogue statistics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DialogueStats {
    pub splits: Vec<SplitStats>,
    pub num_dialogues: usize,
    pub max_dialogues_len: usize,
    pub mean_dialogues_len: f64,
}

pub fn manifest_path(metadata_dir: &Path, split: &str) -> std::path::PathBuf {
    metadata_dir.join(format!("{}_split.txt", split))
}

/// Number of utterances in one dialogue file. A missing or empty file
/// is an error.
pub fn dialogue_length(path: &Path) -> Result<usize> {
    let utterances = load_text_data(path, false)?;
    if utterances.is_empty() {
        return Err(StatsError::file_access(
            path,
            std::io::Error::new(std::io::ErrorKind::UnexpectedEof, "dialogue has no utterances"),
        ));
    }
    Ok(utterances.len())
}

/// Load the manifest of `split` and measure each listed dialogue in
/// `<data_dir>/<split>/<dialogue>.txt`.
pub fn split_stats(data_dir: &Path, metadata_dir: &Path, split: &str) -> Result<SplitStats> {
    let dialogues = load_text_data(&manifest_path(metadata_dir, split), true)?;
    let split_dir = data_dir.join(split);

    let dialogue_lengths = dialogues
        .iter()
        .map(|dialogue| dialogue_length(&split_dir.join(format!("{}.txt", dialogue.trim()))))
        .collect::<Result<Vec<_>>>()?;

    Ok(SplitStats {
        name: split.to_string(),
        num_dialogues: dialogue_lengths.len(),
        max_dialogues_len: dialogue_lengths.iter().copied().max().unwrap_or(0),
        dialogue_lengths,
    })
}

/// Combine split statistics; the mean is over every dialogue of every split.
pub fn aggregate(splits: Vec<SplitStats>) -> Result<DialogueStats> {
    let num_dialogues: usize = splits.iter().map(|s| s.num_dialogues).sum();
    if num_dialogues == 0 {
        return Err(StatsError::Consistency(
            "no dialogues listed in any split manifest".to_string(),
        ));
    }

    let max_dialogues_len = splits
        .iter()
        .map(|s| s.max_dialogues_len)
        .max()
        .unwrap_or(0);
    let mean_dialogues_len = mean(splits.iter().flat_map(|s| s.dialogue_lengths.iter().copied()));

    Ok(DialogueStats {
        splits,
        num_dialogues,
        max_dialogues_len,
        mean_dialogues_len,
    })
}

pub fn dialogue_statistics(
    data_dir: &Path,
    metadata_dir: &Path,
    split_names: &[String],
) -> Result<DialogueStats> {
    let mut splits = Vec::with_capacity(split_names.len());
    for name in split_names {
        let stats = split_stats(data_dir, metadata_dir, name)?;
        log::info!("Number of dialogues in {} set: {}", name, stats.num_dialogues);
        log::info!(
            "Maximum length of dialogue in {} set: {}",
            name,
            stats.max_dialogues_len
        );
        splits.push(stats);
    }

    let stats = aggregate(splits)?;
    log::info!("Total number of dialogues: {}", stats.num_dialogues);
    log::info!("Maximum dialogue length: {}", stats.max_dialogues_len);
    log::info!("Mean dialogue length: {}", stats.mean_dialogues_len);
    Ok(stats)
}
