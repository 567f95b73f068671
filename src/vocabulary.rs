use crate::error::{Result, StatsError};
use crate::frequency::FrequencyTable;
use crate::report::save_json;
use base64::{engine::general_purpose, Engine};
use serde::Serialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use std::sync::Arc;

type Token = Arc<str>;

pub type TokenId = u32;

pub const UNK_TOKEN: &str = "<unk>";
pub const PAD_TOKEN: &str = "<pad>";
pub const BOS_TOKEN: &str = "<bos>";
pub const EOS_TOKEN: &str = "<eos>";

/// Reserved tokens, in index order.
pub const SPECIAL_TOKENS: [&str; 4] = [UNK_TOKEN, PAD_TOKEN, BOS_TOKEN, EOS_TOKEN];
pub const NUM_SPECIAL_TOKENS: usize = SPECIAL_TOKENS.len();
pub const UNK_ID: TokenId = 0;

/// Bijection between tokens and indices. Indices below
/// [`NUM_SPECIAL_TOKENS`] hold the reserved tokens, observed tokens follow
/// by descending frequency.
#[derive(Debug, Clone, Serialize)]
pub struct Vocabulary {
    #[serde(rename = "idx_to_token")]
    id_to_token: Arc<[Token]>,
    #[serde(skip)]
    token_to_id: HashMap<Token, TokenId>,
}

impl Vocabulary {
    fn new(tokens: Arc<[Token]>) -> Self {
        let token_to_id = tokens
            .iter()
            .enumerate()
            .map(|(id, token)| (token.clone(), id as TokenId))
            .collect();

        Self {
            id_to_token: tokens,
            token_to_id,
        }
    }

    pub fn from_frequencies(freq: &FrequencyTable) -> Self {
        let tokens: Arc<[Token]> = SPECIAL_TOKENS
            .iter()
            .map(|&s| Arc::from(s))
            .chain(
                freq.sorted()
                    .into_iter()
                    .filter(|(token, _)| !SPECIAL_TOKENS.contains(token))
                    .map(|(token, _)| Arc::from(token)),
            )
            .collect();
        Self::new(tokens)
    }

    pub fn len(&self) -> usize {
        self.id_to_token.len()
    }

    pub fn is_empty(&self) -> bool {
        self.id_to_token.is_empty()
    }

    /// Index of `token`, or [`UNK_ID`] when it was never observed.
    pub fn to_index(&self, token: &str) -> TokenId {
        self.token_to_id.get(token).copied().unwrap_or(UNK_ID)
    }

    pub fn to_token(&self, id: TokenId) -> Option<&str> {
        self.id_to_token.get(id as usize).map(|token| token.as_ref())
    }

    /// Observed tokens with their indices, skipping the reserved ones.
    pub fn observed(&self) -> impl Iterator<Item = (TokenId, &str)> {
        self.id_to_token
            .iter()
            .enumerate()
            .skip(NUM_SPECIAL_TOKENS)
            .map(|(id, token)| (id as TokenId, token.as_ref()))
    }

    pub fn load_from_file(path: &Path) -> Result<Self> {
        let tokens = load_vocab_json(path)?;
        Ok(Self::new(Arc::from(tokens)))
    }

    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        save_vocab_json(&self.id_to_token, path)
    }
}

// Tokens are stored base64 encoded so arbitrary transcript text survives
// any downstream JSON tooling unchanged.
fn save_vocab_json(tokens: &[Token], path: &Path) -> Result<()> {
    let vocab_b64: Vec<String> = tokens
        .iter()
        .map(|token| general_purpose::STANDARD.encode(token.as_bytes()))
        .collect();
    save_json(&vocab_b64, path)
}

fn load_vocab_json(path: &Path) -> Result<Vec<Token>> {
    let file = File::open(path).map_err(|e| StatsError::file_access(path, e))?;
    let reader = BufReader::new(file);
    let vocab_b64: Vec<String> = serde_json::from_reader(reader)?;

    vocab_b64
        .into_iter()
        .map(|s| {
            let bytes = general_purpose::STANDARD.decode(&s).map_err(|e| {
                StatsError::Consistency(format!("invalid vocabulary entry `{}`: {}", s, e))
            })?;
            let token = String::from_utf8(bytes).map_err(|e| {
                StatsError::Consistency(format!("vocabulary entry is not UTF-8: {}", e))
            })?;
            Ok(Arc::from(token))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Vocabulary {
        Vocabulary::from_frequencies(&FrequencyTable::count(["hi", "there", "hi", "bye"]))
    }

    #[test]
    fn test_reserved_indices() {
        let vocab = sample();
        for (id, token) in SPECIAL_TOKENS.iter().enumerate() {
            assert_eq!(vocab.to_token(id as TokenId), Some(*token));
        }
        assert_eq!(vocab.len(), NUM_SPECIAL_TOKENS + 3);
    }

    #[test]
    fn test_order_by_frequency_then_first_seen() {
        let vocab = sample();
        let observed: Vec<_> = vocab.observed().collect();
        assert_eq!(observed, vec![(4, "hi"), (5, "there"), (6, "bye")]);
    }

    #[test]
    fn test_lookups_are_inverse() {
        let vocab = sample();
        for id in 0..vocab.len() as TokenId {
            let token = vocab.to_token(id).unwrap();
            assert_eq!(vocab.to_index(token), id);
        }
        assert_eq!(vocab.to_token(vocab.len() as TokenId), None);
    }

    #[test]
    fn test_reserved_spelling_is_not_duplicated() {
        let vocab = Vocabulary::from_frequencies(&FrequencyTable::count(["hi", "<pad>", "hi"]));
        assert_eq!(vocab.len(), NUM_SPECIAL_TOKENS + 1);
        assert_eq!(vocab.to_index("<pad>"), 1);
        assert_eq!(vocab.to_token(4), Some("hi"));
    }

    #[test]
    fn test_unknown_token() {
        assert_eq!(sample().to_index("missing"), UNK_ID);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("vocabulary.json");
        let vocab = Vocabulary::from_frequencies(&FrequencyTable::count(["naïve", "\"quoted\""]));
        vocab.save_to_file(&path).unwrap();

        let loaded = Vocabulary::load_from_file(&path).unwrap();
        assert_eq!(loaded.len(), vocab.len());
        assert_eq!(loaded.to_index("naïve"), vocab.to_index("naïve"));
        assert_eq!(loaded.to_token(5), Some("\"quoted\""));
    }

    #[test]
    fn test_serializes_index_list() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["idx_to_token"][0], "<unk>");
        assert_eq!(json["idx_to_token"][4], "hi");
    }
}
