use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;

/// Turns an utterance into an ordered sequence of tokens. Implementations
/// must be deterministic; an empty utterance yields no tokens.
pub trait Tokenize {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

/// Splits on whitespace only.
#[derive(Debug, Default, Clone, Copy)]
pub struct WhitespaceTokenizer;

impl Tokenize for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_string).collect()
    }
}

static PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"^(?:\.\.\.|["'‘“(\[{<¿¡$#*])"#).unwrap());

static CLITIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(?:n['’]t|['’](?:s|re|ve|ll|d|m))$").unwrap());

static SUFFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?:\.\.\.|[.,!?;:)\]}>"'’”%*])$"#).unwrap());

// Irregular forms the clitic rule cannot split. Keys are lowercase; values
// are the piece boundaries, applied to the original casing.
const EXCEPTION_TABLE: &[(&str, &[&str])] = &[
    ("can't", &["ca", "n't"]),
    ("won't", &["wo", "n't"]),
    ("shan't", &["sha", "n't"]),
    ("ain't", &["ai", "n't"]),
    ("cannot", &["can", "not"]),
    ("gonna", &["gon", "na"]),
    ("gotta", &["got", "ta"]),
    ("wanna", &["wan", "na"]),
    ("let's", &["let", "'s"]),
    ("'s", &["'s"]),
    ("'re", &["'re"]),
    ("'ve", &["'ve"]),
    ("'ll", &["'ll"]),
    ("'d", &["'d"]),
    ("'m", &["'m"]),
    ("n't", &["n't"]),
    ("o'clock", &["o'clock"]),
];

static EXCEPTIONS: Lazy<HashMap<&'static str, &'static [&'static str]>> =
    Lazy::new(|| EXCEPTION_TABLE.iter().copied().collect());

/// Rule-based English tokenizer: whitespace split, then per chunk an
/// exception lookup, prefix punctuation, clitic and suffix punctuation
/// stripping, and finally hyphen infixes between letters.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnglishTokenizer;

impl EnglishTokenizer {
    pub fn new() -> Self {
        Self
    }

    fn split_chunk(&self, chunk: &str, tokens: &mut Vec<String>) {
        let mut rest = chunk;
        let mut suffixes = Vec::new();

        while !rest.is_empty() {
            let lower = rest.to_lowercase();
            if let Some(pieces) = EXCEPTIONS
                .get(lower.as_str())
                .filter(|_| lower.len() == rest.len())
            {
                let mut start = 0;
                for piece in pieces.iter() {
                    let end = start + piece.len();
                    tokens.push(rest[start..end].to_string());
                    start = end;
                }
                break;
            }
            if let Some(m) = PREFIX.find(rest).filter(|m| m.end() < rest.len()) {
                tokens.push(m.as_str().to_string());
                rest = &rest[m.end()..];
                continue;
            }
            if let Some(m) = CLITIC.find(rest).filter(|m| m.start() > 0) {
                suffixes.push(m.as_str());
                rest = &rest[..m.start()];
                continue;
            }
            if let Some(m) = SUFFIX.find(rest).filter(|m| m.start() > 0) {
                suffixes.push(m.as_str());
                rest = &rest[..m.start()];
                continue;
            }
            split_infixes(rest, tokens);
            break;
        }

        tokens.extend(suffixes.into_iter().rev().map(str::to_string));
    }
}

/// Split `a-b` into `a`, `-`, `b` when the hyphen sits between letters.
fn split_infixes(text: &str, tokens: &mut Vec<String>) {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let mut start = 0;
    for window in chars.windows(3) {
        let (prev, (idx, c), next) = (window[0].1, window[1], window[2].1);
        if c == '-' && prev.is_alphabetic() && next.is_alphabetic() {
            tokens.push(text[start..idx].to_string());
            tokens.push("-".to_string());
            start = idx + c.len_utf8();
        }
    }
    if start < text.len() {
        tokens.push(text[start..].to_string());
    }
}

impl Tokenize for EnglishTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        let mut tokens = Vec::new();
        for chunk in text.split_whitespace() {
            self.split_chunk(chunk, &mut tokens);
        }
        tokens
    }
}
