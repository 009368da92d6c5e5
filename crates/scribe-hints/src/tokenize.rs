use scribe_core::{TextRange, TextSize};
use unicode_segmentation::UnicodeSegmentation;

/// A candidate span of a snippet.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Token {
    pub raw_text: String,
    /// Location relative to the tokenized text.
    pub location: TextRange,
    /// `raw_text` with whitespace runs collapsed to one space and trimmed.
    /// Casing is preserved.
    pub sanitized: String,
}

impl Token {
    pub fn new(text: &str, location: TextRange) -> Self {
        let raw_text = text[location].to_owned();
        let sanitized = raw_text.split_whitespace().collect::<Vec<_>>().join(" ");
        Self {
            raw_text,
            location,
            sanitized,
        }
    }
}

/// Splits a snippet into candidate tokens.
pub trait Tokenizer: Send + Sync {
    fn tokenize(&self, text: &str) -> Vec<Token>;
}

/// Emits every run of up to `max_words` consecutive Unicode words as a token,
/// so multi-word labels and each of their parts are all candidates.
///
/// Tokens are ordered by start offset, then by length. Words past the `u32`
/// offset space are not tokenized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordTokenizer {
    max_words: usize,
}

impl WordTokenizer {
    pub const DEFAULT_MAX_WORDS: usize = 5;

    /// `max_words` is clamped to at least one.
    pub fn new(max_words: usize) -> Self {
        Self {
            max_words: max_words.max(1),
        }
    }

    pub fn max_words(&self) -> usize {
        self.max_words
    }
}

impl Default for WordTokenizer {
    fn default() -> Self {
        Self::new(Self::DEFAULT_MAX_WORDS)
    }
}

impl Tokenizer for WordTokenizer {
    fn tokenize(&self, text: &str) -> Vec<Token> {
        let words: Vec<(usize, usize)> = text
            .unicode_word_indices()
            .map(|(start, word)| (start, start + word.len()))
            .collect();

        let mut tokens = Vec::new();
        for (first, &(start, _)) in words.iter().enumerate() {
            let last = (first + self.max_words).min(words.len());
            for &(_, end) in &words[first..last] {
                let (Ok(lo), Ok(hi)) = (TextSize::try_from(start), TextSize::try_from(end)) else {
                    break;
                };
                tokens.push(Token::new(text, TextRange::new(lo, hi)));
            }
        }
        tokens
    }
}
