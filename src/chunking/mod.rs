/*!
 * Text chunking for size-limited translation input.
 *
 * - `sentences`: structural sentence segmentation on terminal punctuation
 * - `chunks`: greedy packing of sentences into character-bounded chunks
 */

pub use self::chunks::{ChunkReport, Chunks, build_chunks, chunk_sentences};
pub use self::sentences::{Sentences, split_sentences};

pub mod chunks;
pub mod sentences;
