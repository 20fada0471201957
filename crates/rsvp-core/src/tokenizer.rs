//! Whitespace tokenizer.
//!
//! Read positions are stored as percentages, so the same text must always
//! produce the same sequence. No case folding, no punctuation handling:
//! `"word,"` stays one token.

use once_cell::sync::Lazy;
use regex::Regex;

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("whitespace pattern is valid"));

/// Ordered, immutable list of non-empty words.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WordSequence {
    words: Vec<String>,
}

impl WordSequence {
    pub fn len(&self) -> usize {
        self.words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    /// Number of words from `index` (inclusive) to the end.
    pub fn remaining_from(&self, index: usize) -> usize {
        self.words.len().saturating_sub(index)
    }
}

impl From<Vec<String>> for WordSequence {
    fn from(words: Vec<String>) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|word| word.trim().to_string())
                .filter(|word| !word.is_empty())
                .collect(),
        }
    }
}

/// Split `text` on runs of whitespace, dropping empty pieces.
pub fn tokenize(text: &str) -> WordSequence {
    let words = WHITESPACE_RUN
        .split(text)
        .map(str::trim)
        .filter(|word| !word.is_empty())
        .map(str::to_string)
        .collect::<Vec<_>>();
    tracing::trace!(words = words.len(), chars = text.len(), "Tokenized text");
    WordSequence { words }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_text_has_no_words() {
        assert!(tokenize("").is_empty());
        assert!(tokenize(" \n\t  ").is_empty());
    }

    #[test]
    fn splits_on_any_whitespace_run() {
        let words = tokenize("  The quick\n\nbrown\tfox  ");
        assert_eq!(words.as_slice(), &["The", "quick", "brown", "fox"]);
    }

    #[test]
    fn punctuation_stays_attached() {
        let words = tokenize("Well, that's it... \"done\"");
        assert_eq!(words.as_slice(), &["Well,", "that's", "it...", "\"done\""]);
    }

    #[test]
    fn tokenizing_twice_is_identical() {
        let text = "A long text\u{00a0}with non-breaking\u{2003}spaces and\r\nCRLF lines.";
        let first = tokenize(text);
        let second = tokenize(text);
        assert_eq!(first.len(), second.len());
        assert_eq!(first, second);
    }

    #[test]
    fn remaining_counts_current_word() {
        let words = tokenize("a b c d");
        assert_eq!(words.remaining_from(1), 3);
        assert_eq!(words.remaining_from(9), 0);
    }

    #[test]
    fn from_vec_drops_blank_entries() {
        let words = WordSequence::from(vec![" a ".to_string(), "   ".to_string(), "b".to_string()]);
        assert_eq!(words.as_slice(), &["a", "b"]);
    }
}
