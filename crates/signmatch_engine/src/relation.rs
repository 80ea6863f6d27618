//! Word relation search over a result grid.
//!
//! `find_relation` answers: which of the caller's words can be spelled from
//! the tags discovered by a matching pass, using fragments found at
//! spatially disjoint positions? Each word is split into fixed-length
//! fragments, every fragment is located on the grid by canonical tag
//! comparison, and assembly then picks one occurrence per fragment slot such
//! that no two chosen occurrences share a grid cell — disjointness is
//! enforced by inserting unit rectangles into a transient per-word
//! [`Region`](crate::region::Region).
//!
//! Words are independent, so they run on rayon workers; each worker reads
//! the shared result grid and owns all of its transient state. A failing
//! worker fails the whole call.

use std::collections::HashSet;
use std::time::Instant;

use rayon::prelude::*;
use tracing::{info, span, Level};

use signmatch_words::WordSearcher;

use crate::metrics::metrics_recorder;
use crate::region::{Rect, Region};
use crate::results::SearchResults;
use crate::types::EngineError;

/// One located fragment occurrence: a grid cell whose candidate tag carries
/// the fragment.
#[derive(Debug, Clone)]
struct Occurrence {
    position: (u32, u32),
}

impl SearchResults {
    /// Words from `words` that can be reconstructed from tag fragments found
    /// at disjoint grid positions.
    ///
    /// Fragments are the canonical tag characters
    /// `[start_index, start_index + fragment_length)` of each cell's
    /// candidates. A word whose character count is not a multiple of
    /// `fragment_length` is a caller error. Result order is irrelevant (set
    /// semantics); any worker error aborts the whole call.
    pub fn find_relation(
        &self,
        words: &[String],
        start_index: usize,
        fragment_length: usize,
    ) -> Result<HashSet<String>, EngineError> {
        if fragment_length == 0 {
            return Err(EngineError::ZeroFragmentLength);
        }
        let relation_span = span!(
            Level::INFO,
            "find_relation",
            words = words.len(),
            start_index,
            fragment_length,
        );
        let _guard = relation_span.enter();
        let started = Instant::now();

        let matched: HashSet<String> = words
            .par_iter()
            .map(|word| {
                self.relate_word(word, start_index, fragment_length)
                    .map(|hit| hit.then(|| word.clone()))
            })
            .collect::<Result<Vec<_>, EngineError>>()?
            .into_iter()
            .flatten()
            .collect();

        let latency = started.elapsed();
        info!(
            elapsed_ms = latency.as_millis() as u64,
            matched = matched.len(),
            "relation search complete"
        );
        if let Some(metrics) = metrics_recorder() {
            metrics.record_relation(latency, words.len(), matched.len());
        }
        Ok(matched)
    }

    /// Whether one word can be assembled from disjoint fragment occurrences.
    fn relate_word(
        &self,
        word: &str,
        start_index: usize,
        fragment_length: usize,
    ) -> Result<bool, EngineError> {
        let chars: Vec<char> = word.trim().to_uppercase().chars().collect();
        if chars.is_empty() || chars.len() % fragment_length != 0 {
            return Err(EngineError::FragmentLength {
                word: word.to_owned(),
                fragment_length,
            });
        }
        let fragments: Vec<String> = chars
            .chunks(fragment_length)
            .map(|c| c.iter().collect())
            .collect();

        // Locate every fragment on the grid.
        let mut slots: Vec<Vec<Occurrence>> = Vec::with_capacity(fragments.len());
        for fragment in &fragments {
            let mut occurrences = Vec::new();
            for y in 0..self.height() {
                for x in 0..self.width() {
                    let cell = self.get(x, y)?;
                    let found = cell.candidates.iter().any(|map| {
                        map.tag()
                            .fragment(start_index, fragment_length)
                            .is_some_and(|f| f == *fragment)
                    });
                    if found {
                        occurrences.push(Occurrence { position: (x, y) });
                    }
                }
            }
            if occurrences.is_empty() {
                return Ok(false);
            }
            slots.push(occurrences);
        }

        // Cheap letter-level precheck before the positional search.
        let searcher = WordSearcher::new(
            slots
                .iter()
                .zip(&fragments)
                .map(|(occurrences, fragment)| vec![fragment.clone(); occurrences.len()]),
        )?;
        let word_upper: String = chars.iter().collect();
        if !searcher.is_equal(&word_upper) {
            return Ok(false);
        }

        // Disjoint assembly: one occurrence per slot, no shared cells. The
        // transient region lives only for this word.
        let mut region = Region::new(self.width(), self.height())?;
        Ok(assemble(&slots, 0, &mut region)?)
    }
}

/// Backtracking occurrence selection; unit rectangles in `region` carry the
/// disjointness invariant.
fn assemble(
    slots: &[Vec<Occurrence>],
    slot: usize,
    region: &mut Region,
) -> Result<bool, EngineError> {
    if slot == slots.len() {
        return Ok(true);
    }
    for occurrence in &slots[slot] {
        let (x, y) = occurrence.position;
        let rect = Rect::new(x, y, 1, 1)?;
        if region.is_conflict(&rect) {
            continue;
        }
        region.add(rect)?;
        if assemble(slots, slot + 1, region)? {
            return Ok(true);
        }
        region.remove(x, y);
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use signmatch_grid::{Map, SignValue, Tag};

    fn tagged_map(tag: &str) -> Arc<Map> {
        Arc::new(
            Map::from_cells(Tag::new(tag).expect("tag"), 1, 1, vec![SignValue::MIN])
                .expect("map"),
        )
    }

    fn grid_with_tags(cells: Vec<((u32, u32), Vec<&str>)>) -> SearchResults {
        let mut results = SearchResults::new(4, 4, 2, 2);
        for ((x, y), tags) in cells {
            let maps = tags.into_iter().map(tagged_map).collect();
            results.set(x, y, 90.0, maps).expect("cell");
        }
        results
    }

    #[test]
    fn zero_fragment_length_rejected() {
        let results = SearchResults::new(2, 2, 1, 1);
        assert!(matches!(
            results.find_relation(&["ab".into()], 0, 0),
            Err(EngineError::ZeroFragmentLength)
        ));
    }

    #[test]
    fn indivisible_word_is_a_caller_error() {
        let results = grid_with_tags(vec![((0, 0), vec!["ab"])]);
        let err = results.find_relation(&["abc".into()], 0, 2);
        assert!(matches!(err, Err(EngineError::FragmentLength { .. })));
    }

    #[test]
    fn word_assembled_from_two_fragment_cells() {
        let results = grid_with_tags(vec![((0, 0), vec!["to"]), ((2, 1), vec!["we"])]);
        let matched = results.find_relation(&["towe".into()], 0, 2).expect("run");
        assert!(matched.contains("towe"));

        // Both fragments living only in one cell cannot be assembled
        // disjointly.
        let cramped = grid_with_tags(vec![((0, 0), vec!["to", "we"])]);
        let matched = cramped.find_relation(&["towe".into()], 0, 2).expect("run");
        assert!(matched.is_empty());
    }

    #[test]
    fn relation_respects_disjoint_positions() {
        // Tags are one character; the word "AA" needs two distinct cells
        // carrying "A".
        let one_cell = grid_with_tags(vec![((0, 0), vec!["a"])]);
        let matched = one_cell.find_relation(&["aa".into()], 0, 1).expect("run");
        assert!(matched.is_empty());

        let two_cells = grid_with_tags(vec![((0, 0), vec!["a"]), ((2, 2), vec!["a"])]);
        let matched = two_cells.find_relation(&["aa".into()], 0, 1).expect("run");
        assert!(matched.contains("aa"));
    }

    #[test]
    fn missing_fragment_fails_the_word_only() {
        let results = grid_with_tags(vec![((0, 0), vec!["a"]), ((1, 1), vec!["b"])]);
        let matched = results
            .find_relation(&["ab".into(), "ac".into()], 0, 1)
            .expect("run");
        assert!(matched.contains("ab"));
        assert!(!matched.contains("ac"));
        assert_eq!(matched.len(), 1);
    }

    #[test]
    fn start_index_slices_into_the_tag() {
        // Tags carry a type prefix; fragments start after it.
        let results = grid_with_tags(vec![((0, 0), vec!["sign_x"]), ((2, 0), vec!["sign_y"])]);
        let matched = results.find_relation(&["xy".into()], 5, 1).expect("run");
        assert!(matched.contains("xy"));
        let none = results.find_relation(&["xy".into()], 0, 1).expect("run");
        assert!(none.is_empty());
    }
}
