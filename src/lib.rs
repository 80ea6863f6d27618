//! Workspace umbrella crate for signmatch.
//!
//! This crate stitches the layered members together so callers can run the
//! whole locate-and-reconstruct flow through a single API entry point: build
//! maps from quantized sign values, match a subject against a candidate set,
//! fill a caller-built region with the best candidates per rectangle, and
//! test which target words those candidates can spell.

pub use signmatch_engine::{
    set_match_metrics, AttachedPoint, Attacher, EngineError, MatchAgainst, MatchMetrics, Rect,
    Reg, Region, Registered, ResultCell, SearchResults, DIFF_EQUAL,
};
pub use signmatch_grid::{GridError, Map, MapSet, SignValue, Tag};
pub use signmatch_words::{FindOccurrences, FindString, TagSearcher, WordError, WordSearcher};

use std::collections::HashSet;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur while driving the full pipeline.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignmatchError {
    /// Data-model construction or mutation failure.
    #[error("grid failure: {0}")]
    Grid(#[from] GridError),
    /// String-search failure.
    #[error("word search failure: {0}")]
    Word(#[from] WordError),
    /// Matching, region, or relation failure.
    #[error("engine failure: {0}")]
    Engine(#[from] EngineError),
}

/// Run one complete pass: match `subject` against `candidates`, fill
/// `region` from the outcome, and return the words from `words` that the
/// discovered tags can spell.
///
/// The region must already carry the rectangles to inspect; its geometry is
/// validated against the result grid before it is touched. `start_index`
/// and `fragment_length` address canonical tag characters, as in
/// [`SearchResults::find_relation`].
pub fn match_and_relate(
    subject: &Map,
    candidates: &MapSet,
    region: &mut Region,
    words: &[String],
    start_index: usize,
    fragment_length: usize,
) -> Result<HashSet<String>, SignmatchError> {
    let results = subject.match_against(candidates)?;
    results.fill_region(region)?;
    let matched = results.find_relation(words, start_index, fragment_length)?;
    debug!(
        words = words.len(),
        matched = matched.len(),
        "pipeline pass complete"
    );
    Ok(matched)
}
