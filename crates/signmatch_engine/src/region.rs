//! Disjoint-rectangle partitions.
//!
//! A [`Region`] partitions a `width × height` coordinate space into
//! axis-aligned, pairwise non-overlapping rectangles, each carrying the best
//! candidates found inside it during a region fill. The disjointness
//! invariant holds at every moment: an insert is checked in full before the
//! map is touched, so a rejected call leaves the region exactly as it was.
//!
//! Rectangles are keyed by origin and iterated row-major (by `y`, then `x`),
//! which keeps fills and queries deterministic.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

use signmatch_grid::Map;

use crate::types::EngineError;

/// Axis-aligned rectangle with positive dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl Rect {
    /// Build a rectangle; zero dimensions are rejected.
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidRect {
                x,
                y,
                width,
                height,
            });
        }
        Ok(Rect {
            x,
            y,
            width,
            height,
        })
    }

    pub fn x(&self) -> u32 {
        self.x
    }

    pub fn y(&self) -> u32 {
        self.y
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Exclusive right edge.
    pub fn right(&self) -> u64 {
        self.x as u64 + self.width as u64
    }

    /// Exclusive bottom edge.
    pub fn bottom(&self) -> u64 {
        self.y as u64 + self.height as u64
    }

    /// Whether the point lies inside this rectangle.
    pub fn contains(&self, x: u32, y: u32) -> bool {
        x >= self.x && (x as u64) < self.right() && y >= self.y && (y as u64) < self.bottom()
    }

    /// Whether the two rectangles share any cell.
    pub fn intersects(&self, other: &Rect) -> bool {
        (self.x as u64) < other.right()
            && (other.x as u64) < self.right()
            && (self.y as u64) < other.bottom()
            && (other.y as u64) < self.bottom()
    }
}

/// Best-match entry attached to a rectangle: one result-grid cell that tied
/// for the rectangle's maximum, with the candidates that tied there.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reg {
    /// Result-grid position of the cell, in map-size units.
    pub position: (u32, u32),
    /// Winning match quality at that cell.
    pub percent: f64,
    /// Candidate maps that tied for best at that cell.
    pub candidates: Vec<Arc<Map>>,
}

/// A rectangle stored in a region, with its fill state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Registered {
    rect: Rect,
    candidates: Vec<Reg>,
}

impl Registered {
    fn new(rect: Rect) -> Self {
        Registered {
            rect,
            candidates: Vec::new(),
        }
    }

    pub fn rect(&self) -> &Rect {
        &self.rect
    }

    /// Candidates found inside this rectangle; empty until a fill pass.
    pub fn candidates(&self) -> &[Reg] {
        &self.candidates
    }

    pub(crate) fn set_candidates(&mut self, candidates: Vec<Reg>) {
        self.candidates = candidates;
    }
}

/// Spatial partition of non-overlapping rectangles over a coordinate space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Region {
    width: u32,
    height: u32,
    // Keyed (y, x) for row-major iteration.
    cells: BTreeMap<(u32, u32), Registered>,
}

impl Region {
    /// Build an empty region over a `width × height` space.
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Region {
            width,
            height,
            cells: BTreeMap::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of stored rectangles.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Whether `rect` would violate the partition: out of bounds or
    /// intersecting any stored rectangle.
    pub fn is_conflict(&self, rect: &Rect) -> bool {
        rect.right() > self.width as u64
            || rect.bottom() > self.height as u64
            || self.cells.values().any(|r| r.rect.intersects(rect))
    }

    /// Insert a rectangle with an empty candidate list.
    ///
    /// Check-then-commit: on any rejection the region is untouched.
    pub fn add(&mut self, rect: Rect) -> Result<(), EngineError> {
        if rect.right() > self.width as u64 || rect.bottom() > self.height as u64 {
            return Err(EngineError::RectOutOfBounds {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                bound_width: self.width,
                bound_height: self.height,
            });
        }
        if self.cells.values().any(|r| r.rect.intersects(&rect)) {
            return Err(EngineError::RectOverlap {
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
            });
        }
        self.cells.insert((rect.y, rect.x), Registered::new(rect));
        Ok(())
    }

    /// Delete the rectangle registered under the exact origin `(x, y)`.
    ///
    /// Returns the removed entry; `None` (and no other effect) when no
    /// rectangle has that origin.
    pub fn remove(&mut self, x: u32, y: u32) -> Option<Registered> {
        self.cells.remove(&(y, x))
    }

    /// The rectangle containing the point, if any.
    ///
    /// Disjointness guarantees at most one; the scan is O(count), which is
    /// fine because rectangle counts stay small relative to the grid.
    pub fn lookup(&self, x: u32, y: u32) -> Option<&Registered> {
        self.cells.values().find(|r| r.rect.contains(x, y))
    }

    /// Whether any stored rectangle holds a candidate map whose tag, sliced
    /// from `start_index`, canonically equals `tag_fragment`.
    pub fn contains_tag(&self, tag_fragment: &str, start_index: usize) -> bool {
        let wanted = tag_fragment.trim().to_uppercase();
        self.cells.values().any(|registered| {
            registered.candidates.iter().any(|reg| {
                reg.candidates.iter().any(|map| {
                    map.tag()
                        .slice_from(start_index)
                        .is_some_and(|sliced| sliced == wanted)
                })
            })
        })
    }

    /// Stored rectangles in row-major origin order.
    pub fn iter(&self) -> impl Iterator<Item = &Registered> {
        self.cells.values()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Registered> {
        self.cells.values_mut()
    }

    /// Drop all fill state, keeping the rectangles; supports refilling
    /// after a new matching pass.
    pub fn clear_candidates(&mut self) {
        for registered in self.cells.values_mut() {
            registered.candidates.clear();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x: u32, y: u32, w: u32, h: u32) -> Rect {
        Rect::new(x, y, w, h).expect("valid rect")
    }

    #[test]
    fn zero_sized_rect_rejected() {
        assert!(matches!(
            Rect::new(1, 1, 0, 2),
            Err(EngineError::InvalidRect { .. })
        ));
    }

    #[test]
    fn overlap_rejected_and_state_unchanged() {
        let mut region = Region::new(10, 10).expect("region");
        region.add(rect(0, 0, 4, 4)).expect("first rect");
        let err = region.add(rect(3, 3, 4, 4));
        assert!(matches!(err, Err(EngineError::RectOverlap { .. })));
        assert_eq!(region.len(), 1);
        // Touching edges do not overlap.
        region.add(rect(4, 0, 4, 4)).expect("adjacent rect");
        assert_eq!(region.len(), 2);
    }

    #[test]
    fn out_of_bounds_rejected() {
        let mut region = Region::new(5, 5).expect("region");
        let err = region.add(rect(3, 3, 3, 3));
        assert!(matches!(err, Err(EngineError::RectOutOfBounds { .. })));
        assert!(region.is_empty());
        assert!(region.is_conflict(&rect(3, 3, 3, 3)));
    }

    #[test]
    fn lookup_finds_containing_rect() {
        let mut region = Region::new(10, 10).expect("region");
        region.add(rect(2, 2, 3, 3)).expect("add");
        assert_eq!(region.lookup(4, 4).map(|r| r.rect().x()), Some(2));
        assert!(region.lookup(5, 5).is_none());
        assert!(region.lookup(1, 2).is_none());
    }

    #[test]
    fn remove_is_exact_origin_only() {
        let mut region = Region::new(10, 10).expect("region");
        region.add(rect(2, 2, 3, 3)).expect("add");
        assert!(region.remove(3, 3).is_none());
        assert_eq!(region.len(), 1);
        assert!(region.remove(2, 2).is_some());
        assert!(region.is_empty());
    }

    #[test]
    fn iteration_is_row_major() {
        let mut region = Region::new(10, 10).expect("region");
        region.add(rect(4, 4, 2, 2)).expect("add");
        region.add(rect(0, 0, 2, 2)).expect("add");
        region.add(rect(4, 0, 2, 2)).expect("add");
        let origins: Vec<(u32, u32)> = region
            .iter()
            .map(|r| (r.rect().x(), r.rect().y()))
            .collect();
        assert_eq!(origins, vec![(0, 0), (4, 0), (4, 4)]);
    }
}
