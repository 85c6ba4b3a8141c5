/*!
 * Greedy packing of sentences into size-bounded chunks.
 *
 * Every sentence is charged its length plus one separator character. When the
 * next sentence would push the running total past the limit, the current
 * chunk is emitted and a new one starts with that sentence. Sentences are
 * never split or reordered, so a sentence longer than the limit ends up alone
 * in an over-limit chunk.
 */

use std::iter::FusedIterator;
use std::mem;

use super::sentences::split_sentences;

/// Lazy iterator of chunks built from a sequence of sentences
#[derive(Debug)]
pub struct Chunks<I> {
    sentences: I,
    limit: usize,
    current: String,
    // Accounted length: sentence chars plus one separator per sentence
    current_len: usize,
    current_count: usize,
    finished: bool,
}

impl<I> Chunks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    fn new(sentences: I, limit: usize) -> Self {
        Self {
            sentences,
            limit,
            current: String::new(),
            current_len: 0,
            current_count: 0,
            finished: false,
        }
    }

    fn push(&mut self, sentence: &str, cost: usize) {
        // A sentence that already starts with whitespace carries its own separator
        if self.current_count > 0 && !sentence.starts_with(char::is_whitespace) {
            self.current.push(' ');
        }
        self.current.push_str(sentence);
        self.current_len += cost;
        self.current_count += 1;
    }

    fn take(&mut self) -> String {
        self.current_len = 0;
        self.current_count = 0;
        mem::take(&mut self.current)
    }
}

impl<I> Iterator for Chunks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = String;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        while let Some(sentence) = self.sentences.next() {
            let sentence = sentence.as_ref();
            let cost = sentence.chars().count() + 1;

            if self.current_count > 0 && self.current_len + cost > self.limit {
                let chunk = self.take();
                self.push(sentence, cost);
                return Some(chunk);
            }

            self.push(sentence, cost);
        }

        // The final flush happens even when nothing was accumulated, so an
        // empty input still produces a single empty chunk.
        self.finished = true;
        Some(self.take())
    }
}

impl<I> FusedIterator for Chunks<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
}

/// Pack `sentences` into chunks of at most `limit` accounted characters
pub fn chunk_sentences<I>(sentences: I, limit: usize) -> Chunks<I::IntoIter>
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    Chunks::new(sentences.into_iter(), limit)
}

/// Segment `text` and collect its chunks
pub fn build_chunks(text: &str, limit: usize) -> Vec<String> {
    chunk_sentences(split_sentences(text), limit).collect()
}

/// Size summary of a chunked input, logged in verbose mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReport {
    /// Characters in the input text
    pub input_chars: usize,
    /// Characters in each chunk, in order
    pub chunk_sizes: Vec<usize>,
}

impl ChunkReport {
    pub fn new(input: &str, chunks: &[String]) -> Self {
        Self {
            input_chars: input.chars().count(),
            chunk_sizes: chunks.iter().map(|c| c.chars().count()).collect(),
        }
    }

    pub fn chunk_count(&self) -> usize {
        self.chunk_sizes.len()
    }

    /// Chunks larger than `limit` (lone oversized sentences)
    pub fn oversized(&self, limit: usize) -> usize {
        self.chunk_sizes.iter().filter(|size| **size > limit).count()
    }
}
