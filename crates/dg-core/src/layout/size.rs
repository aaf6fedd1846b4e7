//! Cell footprints and the allowed-size catalog
//!
//! Every footprint is stored in both orientations, so a 2x3 entry also
//! allows 3x2 cells. Entries are kept sorted and deduplicated; sampling
//! picks by index, so the order is part of reproducibility.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Longest wall a cell may have (one door bit per unit)
pub const MAX_WALL_LENGTH: u32 = 64;

/// A (width, height) footprint in grid units
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct CellSize {
    pub width: u32,
    pub height: u32,
}

impl CellSize {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Same footprint turned a quarter
    pub const fn rotated(&self) -> Self {
        Self {
            width: self.height,
            height: self.width,
        }
    }

    /// Larger of the two dimensions
    pub fn max_dimension(&self) -> u32 {
        self.width.max(self.height)
    }

    pub fn area(&self) -> u32 {
        self.width * self.height
    }

    /// Check if this footprint fits inside a `max_width` x `max_height` box
    pub fn fits_within(&self, max_width: u32, max_height: u32) -> bool {
        self.width <= max_width && self.height <= max_height
    }
}

impl std::fmt::Display for CellSize {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// The set of footprints cells may take, closed under rotation
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<CellSize>", into = "Vec<CellSize>")]
pub struct SizeCatalog {
    sizes: Vec<CellSize>,
}

impl SizeCatalog {
    /// Build a catalog, adding the rotated form of every entry
    pub fn new(sizes: impl IntoIterator<Item = CellSize>) -> Self {
        let mut all = Vec::new();
        for size in sizes {
            all.push(size);
            all.push(size.rotated());
        }
        all.sort_unstable();
        all.dedup();
        Self { sizes: all }
    }

    /// All entries, both orientations, in canonical order
    pub fn sizes(&self) -> &[CellSize] {
        &self.sizes
    }

    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    pub fn contains(&self, size: CellSize) -> bool {
        self.sizes.binary_search(&size).is_ok()
    }

    /// Largest dimension over all entries (0 for an empty catalog)
    pub fn max_dimension(&self) -> u32 {
        self.sizes
            .iter()
            .map(CellSize::max_dimension)
            .max()
            .unwrap_or(0)
    }

    /// Entries that fit inside a `max_width` x `max_height` box
    pub fn fitting(&self, max_width: u32, max_height: u32) -> Vec<CellSize> {
        self.sizes
            .iter()
            .copied()
            .filter(|s| s.fits_within(max_width, max_height))
            .collect()
    }

    /// Check if at least one entry fits inside the box
    pub fn any_fits(&self, max_width: u32, max_height: u32) -> bool {
        self.sizes
            .iter()
            .any(|s| s.fits_within(max_width, max_height))
    }

    /// Check the entries are usable as cell footprints
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sizes.is_empty() {
            return Err(ConfigError::EmptyCatalog);
        }
        for size in &self.sizes {
            if size.width == 0 || size.height == 0 {
                return Err(ConfigError::ZeroSizedCell {
                    width: size.width,
                    height: size.height,
                });
            }
            if size.max_dimension() > MAX_WALL_LENGTH {
                return Err(ConfigError::CellTooLarge {
                    width: size.width,
                    height: size.height,
                    max: MAX_WALL_LENGTH,
                });
            }
        }
        Ok(())
    }
}

impl From<Vec<CellSize>> for SizeCatalog {
    fn from(sizes: Vec<CellSize>) -> Self {
        Self::new(sizes)
    }
}

impl From<SizeCatalog> for Vec<CellSize> {
    fn from(catalog: SizeCatalog) -> Self {
        catalog.sizes
    }
}

impl FromIterator<CellSize> for SizeCatalog {
    fn from_iter<I: IntoIterator<Item = CellSize>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Catalog subsets precomputed for every (max width, max height) cap
///
/// Caps run from 0 to the catalog's largest dimension; the packer never
/// asks for a larger cap.
#[derive(Debug, Clone)]
pub struct FitTable {
    side: usize,
    subsets: Vec<Vec<CellSize>>,
}

impl FitTable {
    pub fn new(catalog: &SizeCatalog) -> Self {
        let side = catalog.max_dimension() as usize + 1;
        let mut subsets = Vec::with_capacity(side * side);
        for max_height in 0..side {
            for max_width in 0..side {
                subsets.push(catalog.fitting(max_width as u32, max_height as u32));
            }
        }
        Self { side, subsets }
    }

    /// Entries fitting the cap; caps beyond the table are clamped
    pub fn fitting(&self, max_width: u32, max_height: u32) -> &[CellSize] {
        let last = self.side - 1;
        let w = (max_width as usize).min(last);
        let h = (max_height as usize).min(last);
        &self.subsets[h * self.side + w]
    }
}
