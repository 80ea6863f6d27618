//! signmatch_grid: data model for the signmatch engine.
//!
//! This crate owns the leaf types every other layer builds on:
//!
//! - [`SignValue`] — a quantized color sample with saturating difference and
//!   averaging; the unit of all distance computations.
//! - [`Tag`] — a caller-supplied name with one shared canonical equivalence
//!   (trimmed, case-insensitive) applied everywhere tags are compared.
//! - [`Map`] — a named rectangular grid of sign values; the atomic template
//!   unit, used both as matching subject and as candidate.
//! - [`MapSet`] — a validated, size-homogeneous collection of shared maps.
//!
//! All construction is validate-then-commit: a value either exists and
//! upholds its invariants or was rejected with a typed [`GridError`]. No
//! partially-built state escapes.

mod map;
mod sign;
mod tag;

pub use crate::map::{Map, MapSet};
pub use crate::sign::SignValue;
pub use crate::tag::Tag;

use thiserror::Error;

/// Errors produced while constructing or mutating the grid data model.
///
/// All variants are cloneable and comparable so callers and tests can match
/// on exact conditions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Tag was empty or whitespace-only after trimming.
    #[error("tag must contain at least one non-whitespace character")]
    EmptyTag,
    /// A map was declared with a zero width or height.
    #[error("map dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// The flat cell buffer does not match the declared dimensions.
    #[error("expected {expected} cells for the declared dimensions, got {actual}")]
    CellCountMismatch { expected: usize, actual: usize },
    /// Nested row input had rows of differing lengths.
    #[error("row {row} has {actual} cells, expected {expected}")]
    RaggedRows {
        row: usize,
        expected: usize,
        actual: usize,
    },
    /// Cell access outside the map bounds.
    #[error("cell ({x}, {y}) is outside the {width}x{height} map")]
    CellOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// A map's dimensions differ from the set's fixed dimensions.
    #[error("map '{tag}' is {actual_width}x{actual_height}, set requires {expected_width}x{expected_height}")]
    SizeMismatch {
        tag: String,
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },
    /// The same map object (by reference identity) was offered twice.
    #[error("map '{tag}' is already present in the set by reference identity")]
    DuplicateReference { tag: String },
    /// A map set cannot be built from zero maps.
    #[error("map set requires at least one map")]
    EmptyMapSet,
}
