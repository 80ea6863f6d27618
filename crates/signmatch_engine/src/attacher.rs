//! Point-to-rectangle binding.
//!
//! An [`Attacher`] is the point-based analogue of [`Region`]: instead of
//! owning rectangles it owns bare points, and `set_mask` binds each point to
//! whichever rectangle of a caller-supplied region contains it. Binding is
//! all-or-nothing — geometry and ambiguity are validated over every point
//! before any annotation is written, so a failed `set_mask` leaves previous
//! annotations intact.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use signmatch_grid::Map;

use crate::region::{Reg, Region};
use crate::types::EngineError;

/// One registered point with its binding state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttachedPoint {
    position: (u32, u32),
    /// `None` until a mask pass, or when the point fell outside every
    /// rectangle of the masking region.
    candidates: Option<Vec<Reg>>,
}

impl AttachedPoint {
    pub fn position(&self) -> (u32, u32) {
        self.position
    }

    pub fn candidates(&self) -> Option<&[Reg]> {
        self.candidates.as_deref()
    }
}

/// Set of distinct points over a `width × height` space.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attacher {
    width: u32,
    height: u32,
    points: Vec<AttachedPoint>,
}

impl Attacher {
    pub fn new(width: u32, height: u32) -> Result<Self, EngineError> {
        if width == 0 || height == 0 {
            return Err(EngineError::InvalidDimensions { width, height });
        }
        Ok(Attacher {
            width,
            height,
            points: Vec::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Registered points in registration order.
    pub fn points(&self) -> &[AttachedPoint] {
        &self.points
    }

    /// Register a point; out-of-bounds and duplicate points are rejected.
    pub fn add_point(&mut self, x: u32, y: u32) -> Result<(), EngineError> {
        if x >= self.width || y >= self.height {
            return Err(EngineError::PointOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        if self.points.iter().any(|p| p.position == (x, y)) {
            return Err(EngineError::DuplicatePoint { x, y });
        }
        self.points.push(AttachedPoint {
            position: (x, y),
            candidates: None,
        });
        Ok(())
    }

    /// Bind every point to the candidates of its enclosing rectangle in
    /// `region`.
    ///
    /// Fails when the region's coordinate space differs from the attacher's,
    /// or when two points resolve into the same rectangle — that binding
    /// would be ambiguous and is a caller logic error, not something to
    /// resolve heuristically.
    pub fn set_mask(&mut self, region: &Region) -> Result<(), EngineError> {
        if region.width() != self.width || region.height() != self.height {
            return Err(EngineError::MaskGeometryMismatch {
                region_width: region.width(),
                region_height: region.height(),
                mask_width: self.width,
                mask_height: self.height,
            });
        }

        // Resolve everything before writing anything.
        let mut resolved: Vec<Option<Vec<Reg>>> = Vec::with_capacity(self.points.len());
        let mut bound: Vec<((u32, u32), (u32, u32))> = Vec::new();
        for point in &self.points {
            let (x, y) = point.position;
            match region.lookup(x, y) {
                Some(registered) => {
                    let origin = (registered.rect().x(), registered.rect().y());
                    if let Some((_, first)) = bound.iter().find(|(o, _)| *o == origin) {
                        return Err(EngineError::AmbiguousPoints {
                            first_x: first.0,
                            first_y: first.1,
                            second_x: x,
                            second_y: y,
                        });
                    }
                    bound.push((origin, (x, y)));
                    resolved.push(Some(registered.candidates().to_vec()));
                }
                None => resolved.push(None),
            }
        }

        for (point, binding) in self.points.iter_mut().zip(resolved) {
            point.candidates = binding;
        }
        Ok(())
    }

    /// Drop all bindings, keeping the points.
    pub fn clear_mask(&mut self) {
        for point in &mut self.points {
            point.candidates = None;
        }
    }

    /// Candidate maps attached to the point, with canonically-duplicate
    /// tags collapsed to their first occurrence (first-seen order).
    ///
    /// Empty when the point is unbound or bound to an empty rectangle.
    pub fn unique_candidates(&self, x: u32, y: u32) -> Result<Vec<Arc<Map>>, EngineError> {
        let point = self
            .points
            .iter()
            .find(|p| p.position == (x, y))
            .ok_or(EngineError::UnknownPoint { x, y })?;
        let mut unique: Vec<Arc<Map>> = Vec::new();
        if let Some(regs) = &point.candidates {
            for reg in regs {
                for map in &reg.candidates {
                    if !unique
                        .iter()
                        .any(|seen| seen.tag().canonical_eq(map.tag().as_str()))
                    {
                        unique.push(Arc::clone(map));
                    }
                }
            }
        }
        Ok(unique)
    }
}
