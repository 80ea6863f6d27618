//! Per-position aggregation of match outcomes.
//!
//! A [`SearchResults`] grid is produced by one matching pass: one cell per
//! placement offset, holding the winning match percentage and the candidate
//! maps that tied for it. Positions are in map-size units — cell `(x, y)`
//! describes the placement whose top-left subject cell is `(x, y)` — so the
//! grid also carries the matched candidates' dimensions (`map_size`).

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

use signmatch_grid::Map;

use crate::region::{Reg, Region};
use crate::types::{EngineError, DIFF_EQUAL};

/// One result-grid cell: winning quality and the tied candidates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResultCell {
    /// Winning match quality in `[0.0, 100.0]`; `0.0` when nothing fit.
    pub percent: f64,
    /// Candidates within [`DIFF_EQUAL`] of the winner, in set order.
    pub candidates: Vec<Arc<Map>>,
}

/// Grid of match outcomes for one pass of a subject against a map set.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    width: u32,
    height: u32,
    map_width: u32,
    map_height: u32,
    cells: Vec<ResultCell>,
}

impl SearchResults {
    /// Empty grid; cells default to zero percent with no candidates.
    ///
    /// Zero-dimension grids are legal — they describe a pass where no
    /// placement fit the subject.
    pub fn new(width: u32, height: u32, map_width: u32, map_height: u32) -> Self {
        let cells = vec![ResultCell::default(); width as usize * height as usize];
        SearchResults {
            width,
            height,
            map_width,
            map_height,
            cells,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Width/height of the candidate maps this grid was produced from.
    pub fn map_size(&self) -> (u32, u32) {
        (self.map_width, self.map_height)
    }

    pub fn get(&self, x: u32, y: u32) -> Result<&ResultCell, EngineError> {
        self.index(x, y).map(|i| &self.cells[i])
    }

    /// Overwrite one cell; used during grid population.
    pub fn set(
        &mut self,
        x: u32,
        y: u32,
        percent: f64,
        candidates: Vec<Arc<Map>>,
    ) -> Result<(), EngineError> {
        if !(0.0..=100.0).contains(&percent) {
            return Err(EngineError::InvalidPercent { value: percent });
        }
        let i = self.index(x, y)?;
        self.cells[i] = ResultCell {
            percent,
            candidates,
        };
        Ok(())
    }

    /// Validate that `region`'s coordinate space fits inside this grid.
    ///
    /// A fill is only meaningful when every region cell maps onto a result
    /// cell, so the region must not be wider or taller than the grid.
    pub fn region_correct(&self, region: &Region) -> Result<(), EngineError> {
        if region.width() > self.width {
            return Err(EngineError::RegionWidthTooLarge {
                region: region.width(),
                results: self.width,
            });
        }
        if region.height() > self.height {
            return Err(EngineError::RegionHeightTooLarge {
                region: region.height(),
                results: self.height,
            });
        }
        Ok(())
    }

    /// Populate every rectangle of `region` with the best candidates found
    /// in its sub-grid.
    ///
    /// Per rectangle: find the maximal percent (short-circuiting once 100 is
    /// seen), then store a [`Reg`] for every cell within [`DIFF_EQUAL`] of
    /// that maximum. A maximum of zero leaves the rectangle empty. The
    /// region is only mutated after [`SearchResults::region_correct`]
    /// passes.
    pub fn fill_region(&self, region: &mut Region) -> Result<(), EngineError> {
        self.region_correct(region)?;
        let mut filled = 0usize;
        for registered in region.iter_mut() {
            let rect = *registered.rect();
            let mut best = 0.0f64;
            'scan: for y in rect.y()..rect.bottom() as u32 {
                for x in rect.x()..rect.right() as u32 {
                    let percent = self.get(x, y)?.percent;
                    if percent > best {
                        best = percent;
                        if best >= 100.0 {
                            break 'scan;
                        }
                    }
                }
            }
            if best <= 0.0 {
                registered.set_candidates(Vec::new());
                continue;
            }
            let mut candidates = Vec::new();
            for y in rect.y()..rect.bottom() as u32 {
                for x in rect.x()..rect.right() as u32 {
                    let cell = self.get(x, y)?;
                    if best - cell.percent <= DIFF_EQUAL {
                        candidates.push(Reg {
                            position: (x, y),
                            percent: cell.percent,
                            candidates: cell.candidates.clone(),
                        });
                    }
                }
            }
            registered.set_candidates(candidates);
            filled += 1;
        }
        debug!(filled, rects = region.len(), "region fill complete");
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, EngineError> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::CellOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }
}
