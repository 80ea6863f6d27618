//! The map matching pass.
//!
//! For every placement offset at which a candidate fits entirely inside the
//! subject, the pass computes per-cell sign differences against every
//! candidate in the set, keeps the per-cell minimum and the exact-tie set of
//! candidate indices, and crowns the candidate present in the most minimal
//! cells. Winner counts become the placement's percentage; candidates whose
//! own percentage lands within [`DIFF_EQUAL`] of the winner are recorded as
//! tied.
//!
//! Ties between equally-scoring candidates break toward the first candidate
//! in `MapSet` iteration order. That mirrors the behavior callers already
//! rely on; do not "improve" it.

use std::sync::Arc;
use std::time::Instant;

use tracing::{info, span, Level};

use signmatch_grid::{Map, MapSet, SignValue};

use crate::metrics::metrics_recorder;
use crate::results::SearchResults;
use crate::types::{EngineError, DIFF_EQUAL};

/// Matching entry points for a subject map.
///
/// Two variants make the aliasing contract explicit in the type system:
/// [`MatchAgainst::match_against`] is pure, while
/// [`MatchAgainst::match_against_mut`] additionally leaves the per-cell
/// residual minimum differences behind in the subject's own cells
/// ([`SignValue::MAX`] where no placement ever covered a cell). Both produce
/// the same result grid.
pub trait MatchAgainst {
    /// Read-only matching pass.
    fn match_against(&self, candidates: &MapSet) -> Result<SearchResults, EngineError>;

    /// Destructive matching pass; the subject keeps the residuals.
    fn match_against_mut(&mut self, candidates: &MapSet) -> Result<SearchResults, EngineError>;
}

impl MatchAgainst for Map {
    fn match_against(&self, candidates: &MapSet) -> Result<SearchResults, EngineError> {
        run_pass(self, candidates, None)
    }

    fn match_against_mut(&mut self, candidates: &MapSet) -> Result<SearchResults, EngineError> {
        let mut residual = vec![SignValue::MAX; self.cells().len()];
        let results = run_pass(self, candidates, Some(&mut residual))?;
        let width = self.width();
        for (i, value) in residual.into_iter().enumerate() {
            let x = (i % width as usize) as u32;
            let y = (i / width as usize) as u32;
            self.set(x, y, value)?;
        }
        Ok(results)
    }
}

fn run_pass(
    subject: &Map,
    candidates: &MapSet,
    mut residual: Option<&mut Vec<SignValue>>,
) -> Result<SearchResults, EngineError> {
    let (cand_w, cand_h) = (candidates.width(), candidates.height());
    let (sub_w, sub_h) = (subject.width(), subject.height());

    // Placements are indexed by their top-left subject cell; a candidate
    // larger than the subject fits nowhere and yields an empty grid.
    let result_w = if cand_w <= sub_w { sub_w - cand_w + 1 } else { 0 };
    let result_h = if cand_h <= sub_h { sub_h - cand_h + 1 } else { 0 };

    let pass_span = span!(
        Level::INFO,
        "match_pass",
        subject = %subject.tag(),
        candidates = candidates.len(),
        placements = result_w as u64 * result_h as u64,
    );
    let _guard = pass_span.enter();
    let started = Instant::now();

    let mut results = SearchResults::new(result_w, result_h, cand_w, cand_h);

    let cells_per_placement = cand_w as usize * cand_h as usize;
    let n = candidates.len();
    let subject_cells = subject.cells();
    let candidate_cells: Vec<&[SignValue]> = candidates.iter().map(|m| m.cells()).collect();

    // Per-placement scratch, reused across placements.
    let mut min_diff = vec![SignValue::MAX; cells_per_placement];
    let mut tied: Vec<Vec<usize>> = vec![Vec::new(); cells_per_placement];
    let mut counts = vec![0usize; n];

    for y in 0..result_h {
        for x in 0..result_w {
            for slot in &mut tied {
                slot.clear();
            }

            for (ci, cand) in candidate_cells.iter().enumerate() {
                for dy in 0..cand_h {
                    let subject_row = (y + dy) as usize * sub_w as usize + x as usize;
                    let cand_row = dy as usize * cand_w as usize;
                    for dx in 0..cand_w as usize {
                        let idx = cand_row + dx;
                        let diff = SignValue::difference(
                            subject_cells[subject_row + dx],
                            cand[idx],
                        );
                        if ci == 0 || diff < min_diff[idx] {
                            min_diff[idx] = diff;
                            tied[idx].clear();
                            tied[idx].push(ci);
                        } else if diff == min_diff[idx] {
                            tied[idx].push(ci);
                        }
                    }
                }
            }

            counts.iter_mut().for_each(|c| *c = 0);
            for slot in &tied {
                for &ci in slot {
                    counts[ci] += 1;
                }
            }

            // First candidate in set order wins count ties.
            let mut winner = 0usize;
            for (ci, &count) in counts.iter().enumerate() {
                if count > counts[winner] {
                    winner = ci;
                }
            }
            let percent = counts[winner] as f64 * 100.0 / cells_per_placement as f64;

            let best: Vec<Arc<Map>> = candidates
                .iter()
                .zip(counts.iter())
                .filter(|(_, &count)| {
                    let candidate_percent =
                        count as f64 * 100.0 / cells_per_placement as f64;
                    percent - candidate_percent <= DIFF_EQUAL
                })
                .map(|(map, _)| Arc::clone(map))
                .collect();

            results.set(x, y, percent, best)?;

            if let Some(residual) = residual.as_deref_mut() {
                for dy in 0..cand_h {
                    let subject_row = (y + dy) as usize * sub_w as usize + x as usize;
                    let cand_row = dy as usize * cand_w as usize;
                    for dx in 0..cand_w as usize {
                        let i = subject_row + dx;
                        let d = min_diff[cand_row + dx];
                        if d < residual[i] {
                            residual[i] = d;
                        }
                    }
                }
            }
        }
    }

    let latency = started.elapsed();
    info!(
        elapsed_ms = latency.as_millis() as u64,
        result_width = result_w,
        result_height = result_h,
        "matching pass complete"
    );
    if let Some(metrics) = metrics_recorder() {
        metrics.record_match(
            subject.tag().as_str(),
            latency,
            result_w as usize * result_h as usize,
        );
    }

    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;
    use signmatch_grid::Tag;

    fn map(tag: &str, rows: Vec<Vec<u8>>) -> Arc<Map> {
        let rows = rows
            .into_iter()
            .map(|r| r.into_iter().map(SignValue::new).collect())
            .collect();
        Arc::new(Map::from_rows(Tag::new(tag).expect("tag"), rows).expect("map"))
    }

    #[test]
    fn exact_placements_score_one_hundred() {
        // 5x5 subject with candidate "a" planted at placement (0,0) and
        // candidate "b" at placement (2,3). Every other 2x2 window mixes
        // cells from both candidates' territory, so no candidate can sweep
        // all four cells anywhere else.
        let subject = map(
            "subject",
            vec![
                vec![0, 0, 255, 0, 255],
                vec![0, 0, 0, 255, 0],
                vec![255, 255, 0, 0, 255],
                vec![0, 0, 255, 255, 0],
                vec![255, 255, 255, 255, 255],
            ],
        );
        let a = map("a", vec![vec![0, 0], vec![0, 0]]);
        let b = map("b", vec![vec![255, 255], vec![255, 255]]);
        let set = MapSet::from_maps(vec![Arc::clone(&a), Arc::clone(&b)]).expect("set");

        let results = subject.match_against(&set).expect("pass");
        assert_eq!((results.width(), results.height()), (4, 4));
        assert_eq!(results.map_size(), (2, 2));

        let at_origin = results.get(0, 0).expect("cell");
        assert_eq!(at_origin.percent, 100.0);
        assert!(at_origin
            .candidates
            .iter()
            .any(|m| m.tag().canonical_eq("a")));

        let at_far = results.get(2, 3).expect("cell");
        assert_eq!(at_far.percent, 100.0);
        assert!(at_far.candidates.iter().any(|m| m.tag().canonical_eq("b")));

        for y in 0..4 {
            for x in 0..4 {
                if (x, y) == (0, 0) || (x, y) == (2, 3) {
                    continue;
                }
                assert!(
                    results.get(x, y).expect("cell").percent < 100.0,
                    "unexpected perfect score at ({x}, {y})"
                );
            }
        }
    }

    #[test]
    fn tie_break_prefers_first_candidate_in_set_order() {
        let subject = map("subject", vec![vec![5, 5], vec![5, 5]]);
        // Content-equal candidates behind distinct references: both score
        // identically everywhere, so both land in every cell's tie set.
        let first = map("first", vec![vec![5, 5], vec![5, 5]]);
        let second = map("second", vec![vec![5, 5], vec![5, 5]]);
        let set = MapSet::from_maps(vec![first, second]).expect("set");

        let results = subject.match_against(&set).expect("pass");
        let cell = results.get(0, 0).expect("cell");
        assert_eq!(cell.percent, 100.0);
        assert_eq!(cell.candidates.len(), 2);
        assert!(cell.candidates[0].tag().canonical_eq("first"));
    }

    #[test]
    fn oversized_candidates_produce_empty_grid() {
        let subject = map("subject", vec![vec![1, 2], vec![3, 4]]);
        let big = map("big", vec![vec![0; 3], vec![0; 3], vec![0; 3]]);
        let set = MapSet::new(big);
        let results = subject.match_against(&set).expect("pass");
        assert_eq!((results.width(), results.height()), (0, 0));
    }

    #[test]
    fn pure_pass_leaves_subject_untouched() {
        let subject = map("subject", vec![vec![9, 9], vec![9, 9]]);
        let cand = map("c", vec![vec![1]]);
        let set = MapSet::new(cand);
        let before = subject.cells().to_vec();
        subject.match_against(&set).expect("pass");
        assert_eq!(subject.cells(), &before[..]);
    }

    #[test]
    fn destructive_pass_leaves_residual_minimums() {
        let mut subject = (*map("subject", vec![vec![10, 0], vec![0, 0]])).clone();
        let cand = map("c", vec![vec![3]]);
        let set = MapSet::new(cand);
        let results = subject.match_against_mut(&set).expect("pass");
        assert_eq!((results.width(), results.height()), (2, 2));
        // Every cell was probed by the 1x1 candidate; residual is |cell - 3|.
        assert_eq!(subject.get(0, 0).unwrap(), SignValue::new(7));
        assert_eq!(subject.get(1, 0).unwrap(), SignValue::new(3));
        assert_eq!(subject.get(1, 1).unwrap(), SignValue::new(3));
    }
}
