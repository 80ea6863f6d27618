//! Maps and map sets.
//!
//! A [`Map`] is the atomic template unit: a named, row-major grid of
//! [`SignValue`] cells. The same type serves as the matching subject and as
//! a candidate pattern. A [`MapSet`] is the validated candidate collection a
//! subject is matched against: every member shares one width/height (fixed
//! by the first map) and no member may appear twice by reference identity.
//!
//! Maps are shared via `Arc` so result grids can hold winning candidates
//! without copying cell data; `Arc` pointer identity is also what "same
//! object reference" means for duplicate rejection.

use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{GridError, SignValue, Tag};

/// Named rectangular grid of sign values.
///
/// Immutable after construction; the destructive matching entry point is the
/// one sanctioned exception and goes through [`Map::set`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Map {
    tag: Tag,
    width: u32,
    height: u32,
    cells: Vec<SignValue>,
}

impl Map {
    /// Build a map from a flat row-major cell buffer.
    pub fn from_cells(
        tag: Tag,
        width: u32,
        height: u32,
        cells: Vec<SignValue>,
    ) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        let expected = width as usize * height as usize;
        if cells.len() != expected {
            return Err(GridError::CellCountMismatch {
                expected,
                actual: cells.len(),
            });
        }
        Ok(Map {
            tag,
            width,
            height,
            cells,
        })
    }

    /// Build a map from nested rows (top row first).
    pub fn from_rows(tag: Tag, rows: Vec<Vec<SignValue>>) -> Result<Self, GridError> {
        let height = rows.len() as u32;
        let width = rows.first().map(|r| r.len() as u32).unwrap_or(0);
        if width == 0 || height == 0 {
            return Err(GridError::InvalidDimensions { width, height });
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() as u32 != width {
                return Err(GridError::RaggedRows {
                    row: i,
                    expected: width as usize,
                    actual: row.len(),
                });
            }
        }
        let cells = rows.into_iter().flatten().collect();
        Map::from_cells(tag, width, height, cells)
    }

    pub fn tag(&self) -> &Tag {
        &self.tag
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Row-major cell buffer.
    pub fn cells(&self) -> &[SignValue] {
        &self.cells
    }

    /// Cell at `(x, y)`, origin top-left.
    pub fn get(&self, x: u32, y: u32) -> Result<SignValue, GridError> {
        self.index(x, y).map(|i| self.cells[i])
    }

    /// Overwrite the cell at `(x, y)`.
    ///
    /// Only the destructive matching pass writes through this; ordinary
    /// callers treat maps as immutable.
    pub fn set(&mut self, x: u32, y: u32, value: SignValue) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.cells[i] = value;
        Ok(())
    }

    fn index(&self, x: u32, y: u32) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::CellOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y as usize * self.width as usize + x as usize)
    }
}

/// Ordered, size-homogeneous collection of shared maps.
///
/// The width/height of the whole set is fixed by the first map. Mutations
/// are all-or-nothing: if any candidate in a batch is invalid, the set is
/// left exactly as it was.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapSet {
    width: u32,
    height: u32,
    maps: Vec<Arc<Map>>,
}

impl MapSet {
    /// Start a set from its first map, fixing the set's dimensions.
    pub fn new(first: Arc<Map>) -> Self {
        MapSet {
            width: first.width(),
            height: first.height(),
            maps: vec![first],
        }
    }

    /// Build a set from a non-empty batch of maps.
    pub fn from_maps(maps: Vec<Arc<Map>>) -> Result<Self, GridError> {
        let mut iter = maps.into_iter();
        let first = iter.next().ok_or(GridError::EmptyMapSet)?;
        let mut set = MapSet::new(first);
        set.add_range(iter.collect())?;
        Ok(set)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn len(&self) -> usize {
        self.maps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.maps.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Arc<Map>> {
        self.maps.get(index)
    }

    /// Members in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Arc<Map>> {
        self.maps.iter()
    }

    /// Add one map; the set is unchanged on rejection.
    pub fn add(&mut self, map: Arc<Map>) -> Result<(), GridError> {
        self.validate_against(&map, &self.maps)?;
        self.maps.push(map);
        Ok(())
    }

    /// Add a batch of maps atomically.
    ///
    /// The whole batch is validated (including reference duplicates within
    /// the batch itself) before any map is inserted.
    pub fn add_range(&mut self, maps: Vec<Arc<Map>>) -> Result<(), GridError> {
        let mut staged: Vec<&Arc<Map>> = self.maps.iter().collect();
        for map in &maps {
            self.validate_dimensions(map)?;
            if staged.iter().any(|existing| Arc::ptr_eq(existing, map)) {
                return Err(GridError::DuplicateReference {
                    tag: map.tag().as_str().to_owned(),
                });
            }
            staged.push(map);
        }
        self.maps.extend(maps);
        Ok(())
    }

    fn validate_against(&self, map: &Arc<Map>, existing: &[Arc<Map>]) -> Result<(), GridError> {
        self.validate_dimensions(map)?;
        if existing.iter().any(|m| Arc::ptr_eq(m, map)) {
            return Err(GridError::DuplicateReference {
                tag: map.tag().as_str().to_owned(),
            });
        }
        Ok(())
    }

    fn validate_dimensions(&self, map: &Map) -> Result<(), GridError> {
        if map.width() != self.width || map.height() != self.height {
            return Err(GridError::SizeMismatch {
                tag: map.tag().as_str().to_owned(),
                expected_width: self.width,
                expected_height: self.height,
                actual_width: map.width(),
                actual_height: map.height(),
            });
        }
        Ok(())
    }
}
