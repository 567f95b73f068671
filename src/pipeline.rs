use crate::chart::plot_label_distributions;
use crate::config::{Config, Granularity};
use crate::error::Result;
use crate::frequency::FrequencyTable;
use crate::labels::{get_label_frequency_distributions, LabelDistribution};
use crate::loader::{load_text_data, record_field};
use crate::metadata::{Metadata, UtteranceStats, METADATA_FILE};
use crate::report::{save_frequency_report, save_markdown_report, save_vocabulary_report};
use crate::splits::dialogue_statistics;
use crate::tokenizer::Tokenize;
use crate::vocabulary::{Vocabulary, SPECIAL_TOKENS};
use std::path::Path;

pub const UTTERANCE_FIELD: usize = 1;
pub const VOCABULARY_REPORT: &str = "vocabulary.txt";
pub const VOCABULARY_FILE: &str = "vocabulary.json";

/// Utterance text of every corpus record.
pub fn load_utterances(corpus_path: &Path) -> Result<Vec<String>> {
    load_text_data(corpus_path, true)?
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let utterance = record_field(record, UTTERANCE_FIELD, corpus_path, i + 1)?;
            Ok(utterance.to_string())
        })
        .collect()
}

/// Tokenize every utterance, then count tokens and build the vocabulary.
pub fn vocabulary_pass<T: Tokenize>(
    utterances: &[String],
    tokenizer: &T,
) -> Result<(UtteranceStats, FrequencyTable, Vocabulary)> {
    let tokenized: Vec<Vec<String>> = utterances.iter().map(|u| tokenizer.tokenize(u)).collect();
    let stats = UtteranceStats::from_tokenized(utterances.len(), &tokenized)?;
    log::info!("Total number of utterances: {}", stats.num_utterances);
    log::info!("Max utterance length: {}", stats.max_utterance_len);
    log::info!("Mean utterance length: {}", stats.mean_utterance_len);

    let word_freq = FrequencyTable::count(tokenized.iter().flatten());
    let vocabulary = Vocabulary::from_frequencies(&word_freq);
    for token in SPECIAL_TOKENS {
        if let Some(count) = word_freq.get(token) {
            log::warn!(
                "Corpus token {} ({} occurrences) maps to reserved index {} and is left out of {}",
                token,
                count,
                vocabulary.to_index(token),
                VOCABULARY_REPORT
            );
        }
    }
    log::info!(
        "Vocabulary size: {} ({} distinct tokens)",
        vocabulary.len(),
        word_freq.len()
    );
    Ok((stats, word_freq, vocabulary))
}

/// Count one label granularity and write its chart and reports.
fn label_pass(config: &Config, granularity: &Granularity) -> Result<LabelDistribution> {
    let metadata_dir = config.metadata_path();
    let dist = get_label_frequency_distributions(
        &config.corpus_path(),
        &metadata_dir,
        &granularity.label_map,
        granularity.field_index,
    )?;
    log::info!("{} labels: {:?}", granularity.name, dist.labels);
    log::info!("Number of {} labels: {}", granularity.name, dist.num_labels());

    let chart = plot_label_distributions(&dist.frequencies, &granularity.title, config.chart_bars);
    chart.save(&metadata_dir.join(format!("{}.txt", granularity.title)))?;

    let report = metadata_dir.join(granularity.report_file());
    save_frequency_report(&dist.frequencies, &report)?;
    if config.markdown_reports {
        save_markdown_report(&dist.frequencies, "Label", &report.with_extension("md"))?;
    }
    Ok(dist)
}

/// Run every pass in order, write all reports and return the metadata record
/// that was persisted.
pub fn run<T: Tokenize>(config: &Config, tokenizer: &T) -> Result<Metadata> {
    let metadata_dir = config.metadata_path();

    let utterances = load_utterances(&config.corpus_path())?;
    let (utterance_stats, word_freq, vocabulary) = vocabulary_pass(&utterances, tokenizer)?;
    drop(utterances);

    save_vocabulary_report(&vocabulary, &word_freq, &metadata_dir.join(VOCABULARY_REPORT))?;
    vocabulary.save_to_file(&metadata_dir.join(VOCABULARY_FILE))?;

    let mut labels = Vec::with_capacity(config.granularities.len());
    for granularity in &config.granularities {
        labels.push((granularity.name.clone(), label_pass(config, granularity)?));
    }

    let dialogues = dialogue_statistics(&config.data_dir, &metadata_dir, &config.splits)?;

    let metadata = Metadata {
        utterances: utterance_stats,
        word_freq,
        vocabulary,
        labels,
        dialogues,
    };
    metadata.save_to_file(&metadata_dir.join(METADATA_FILE))?;
    log::info!("Saved metadata to {}", metadata_dir.join(METADATA_FILE).display());
    Ok(metadata)
}
