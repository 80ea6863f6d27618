//! signmatch_words: anagram fingerprints and word assembly.
//!
//! Two ephemeral, per-query searchers live here:
//!
//! - [`TagSearcher`] fingerprints one source string by letter frequency and
//!   enumerates anagram-equal windows inside longer strings.
//! - [`WordSearcher`] tests whether a target word can be spelled by
//!   combining candidate fragments, using the same frequency fingerprints
//!   for fragment-level equality.
//!
//! Both are deterministic and allocation-light; neither touches the grid or
//! spatial layers, which lets the relation driver run them per word on
//! worker threads without shared state.

mod anagram;
mod word;

pub use crate::anagram::{FindOccurrences, FindString, TagSearcher};
pub use crate::word::WordSearcher;

use thiserror::Error;

/// Errors produced by the string-search layer.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WordError {
    /// Searcher source was empty or whitespace-only.
    #[error("searcher source must contain at least one non-whitespace character")]
    EmptySource,
    /// Every fragment group was empty after discarding blank entries.
    #[error("word searcher requires at least one non-empty fragment group")]
    EmptyGroups,
}
