//! Engine-wide constants and the engine error surface.

use thiserror::Error;

use signmatch_grid::GridError;
use signmatch_words::WordError;

/// Maximum percentage gap treated as "equally best".
///
/// Used both when collecting tied candidates for a result cell and when
/// gathering cells around a rectangle's maximum during region fill.
pub const DIFF_EQUAL: f64 = 0.01;

/// Errors produced by the matching engine and spatial layers.
///
/// Every variant is a local, recoverable-by-caller condition; nothing here
/// is process-fatal. Validation always happens before mutation, so an error
/// implies the target structure is unchanged.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    /// A region, attacher, or result grid was declared with zero dimensions.
    #[error("dimensions must be positive, got {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    /// A rectangle was declared with zero width or height.
    #[error("rectangle at ({x}, {y}) must have positive dimensions, got {width}x{height}")]
    InvalidRect {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// A rectangle does not fit inside the region's bounds.
    #[error("rectangle ({x}, {y}) {width}x{height} exceeds the {bound_width}x{bound_height} region")]
    RectOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        bound_width: u32,
        bound_height: u32,
    },
    /// A rectangle overlaps one already stored in the region.
    #[error("rectangle ({x}, {y}) {width}x{height} overlaps an existing rectangle")]
    RectOverlap {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// Result-grid access outside its bounds.
    #[error("result cell ({x}, {y}) is outside the {width}x{height} grid")]
    CellOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// A percentage outside the closed range [0, 100].
    #[error("percent {value} is outside the range 0.0..=100.0")]
    InvalidPercent { value: f64 },
    /// Region is wider than the result grid it should be filled from.
    #[error("region width {region} exceeds result grid width {results}")]
    RegionWidthTooLarge { region: u32, results: u32 },
    /// Region is taller than the result grid it should be filled from.
    #[error("region height {region} exceeds result grid height {results}")]
    RegionHeightTooLarge { region: u32, results: u32 },
    /// A point outside the attacher's coordinate space.
    #[error("point ({x}, {y}) is outside the {width}x{height} space")]
    PointOutOfBounds {
        x: u32,
        y: u32,
        width: u32,
        height: u32,
    },
    /// The same point was registered twice.
    #[error("point ({x}, {y}) is already registered")]
    DuplicatePoint { x: u32, y: u32 },
    /// A point was queried that was never registered.
    #[error("point ({x}, {y}) is not registered")]
    UnknownPoint { x: u32, y: u32 },
    /// Two attacher points resolve into the same region rectangle.
    #[error("points ({first_x}, {first_y}) and ({second_x}, {second_y}) bind to the same rectangle")]
    AmbiguousPoints {
        first_x: u32,
        first_y: u32,
        second_x: u32,
        second_y: u32,
    },
    /// Region geometry does not match the attacher's coordinate space.
    #[error("region is {region_width}x{region_height}, attacher space is {mask_width}x{mask_height}")]
    MaskGeometryMismatch {
        region_width: u32,
        region_height: u32,
        mask_width: u32,
        mask_height: u32,
    },
    /// Fragment length of zero can never partition a word.
    #[error("fragment length must be positive")]
    ZeroFragmentLength,
    /// A word's length is not a whole number of fragments.
    #[error("word '{word}' cannot be split into fragments of length {fragment_length}")]
    FragmentLength { word: String, fragment_length: usize },
    /// Data-model error surfaced through the engine.
    #[error(transparent)]
    Grid(#[from] GridError),
    /// String-search error surfaced through the engine.
    #[error(transparent)]
    Word(#[from] WordError),
}
