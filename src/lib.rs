pub mod chart;
pub mod config;
pub mod error;
pub mod frequency;
pub mod labels;
pub mod loader;
pub mod metadata;
pub mod pipeline;
pub mod report;
pub mod splits;
pub mod tokenizer;
pub mod vocabulary;

pub use chart::{plot_label_distributions, BarChart};
pub use config::{Config, Granularity};
pub use error::{Result, StatsError};
pub use frequency::FrequencyTable;
pub use labels::{FileLabelMap, LabelDistribution, LabelMap};
pub use metadata::{Metadata, UtteranceStats};
pub use pipeline::run;
pub use splits::{DialogueStats, SplitStats};
pub use tokenizer::{EnglishTokenizer, Tokenize, WhitespaceTokenizer};
pub use vocabulary::Vocabulary;
