use anyhow::{Context, Result};
use dialogue_stats::config::CONFIG_FILE;
use dialogue_stats::{Config, EnglishTokenizer};
use env_logger::Env;
use std::path::Path;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info"))
        .format_timestamp_millis()
        .init();

    let config = Config::load_or_default(Path::new(CONFIG_FILE))
        .with_context(|| format!("failed to load {}", CONFIG_FILE))?;
    log::info!("Reading corpus from {}", config.data_dir.display());

    let metadata = dialogue_stats::run(&config, &EnglishTokenizer::new()).with_context(|| {
        format!(
            "failed to compute statistics for {}",
            config.data_dir.display()
        )
    })?;

    log::info!(
        "Done: {} utterances, {} dialogues, vocabulary of {}",
        metadata.utterances.num_utterances,
        metadata.dialogues.num_dialogues,
        metadata.vocabulary.len()
    );
    Ok(())
}
