/*!
 * Sentence segmentation.
 *
 * Splitting is purely structural: a sentence ends right after `.`, `?` or `!`.
 * No abbreviation, quote or numeral detection is attempted, and the
 * concatenation of all sentences always reproduces the input exactly.
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::iter::FusedIterator;

/// Characters that close a sentence
static TERMINAL_PUNCTUATION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[.?!]").unwrap()
});

/// Lazy iterator over the sentences of a text
///
/// Each item borrows from the input text. Whitespace following a
/// terminal mark stays at the start of the next sentence.
#[derive(Debug, Clone)]
pub struct Sentences<'a> {
    rest: &'a str,
}

impl<'a> Iterator for Sentences<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<Self::Item> {
        if self.rest.is_empty() {
            return None;
        }

        // Without a terminal mark the remainder is the last sentence
        let end = TERMINAL_PUNCTUATION
            .find(self.rest)
            .map_or(self.rest.len(), |m| m.end());

        let (sentence, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(sentence)
    }
}

impl FusedIterator for Sentences<'_> {}

/// Split `text` into sentences
pub fn split_sentences(text: &str) -> Sentences<'_> {
    Sentences { rest: text }
}
