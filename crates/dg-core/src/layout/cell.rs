//! Working cells used while packing and routing
//!
//! Coordinates are grid units; a cell covers `x..x+width` by `y..y+height`
//! (right and bottom edges exclusive).

use super::size::CellSize;

/// A packed cell, before door placement
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingCell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    /// Position in the cell array; the only key used by graph code
    pub index: usize,
    /// Routing weight in [0, 1)
    pub cost: f64,
    /// Indices of touching cells (may repeat)
    pub neighbors: Vec<usize>,
}

impl WorkingCell {
    pub fn new(x: u32, y: u32, size: CellSize, index: usize, cost: f64) -> Self {
        Self {
            x,
            y,
            width: size.width,
            height: size.height,
            index,
            cost,
            neighbors: Vec::new(),
        }
    }

    pub fn size(&self) -> CellSize {
        CellSize::new(self.width, self.height)
    }

    /// X of the east edge (exclusive)
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    /// Y of the south edge (exclusive)
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    /// Check if a grid unit lies inside this cell
    pub fn contains_point(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    /// Check if the two footprints share at least one grid unit
    pub fn overlaps(&self, other: &WorkingCell) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }
}

/// Length of the overlap of `[a, a+a_len)` and `[b, b+b_len)`, with its start
pub fn span_overlap(a: u32, a_len: u32, b: u32, b_len: u32) -> Option<(u32, u32)> {
    let lo = a.max(b);
    let hi = (a + a_len).min(b + b_len);
    if hi > lo { Some((lo, hi - lo)) } else { None }
}
