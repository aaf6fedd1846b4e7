//! Greedy grid packing
//!
//! Scans the grid row by row. At each uncovered unit the free run to the
//! east and to the south (capped by the largest catalog dimension) bounds
//! the footprint; a footprint is drawn uniformly from the catalog entries
//! that fit. Positions where nothing fits stay empty.
//!
//! A later cell can never overlap an earlier one: any earlier cell reaching
//! below the current row also covers the current row, so the eastward run
//! already stops at it.

use crate::rng::MapRng;

use super::cell::WorkingCell;
use super::size::{FitTable, SizeCatalog};

/// A grid unit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct GridPoint {
    pub x: u32,
    pub y: u32,
}

impl GridPoint {
    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// Result of packing one grid
#[derive(Debug, Clone)]
pub struct Packing {
    pub width: u32,
    pub height: u32,
    pub cells: Vec<WorkingCell>,
    pub start_point: GridPoint,
    pub end_point: GridPoint,
    /// Cell containing the start point, if it was covered
    pub start_cell: Option<usize>,
    /// Cell containing the end point, if it was covered
    pub end_cell: Option<usize>,
    /// Number of scan positions left uncovered
    pub gaps: usize,
    occupancy: Vec<Option<usize>>,
}

impl Packing {
    /// Index of the cell covering a grid unit
    pub fn cell_at(&self, x: u32, y: u32) -> Option<usize> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.occupancy[(y * self.width + x) as usize]
    }

    /// Number of grid units covered by some cell
    pub fn covered_units(&self) -> usize {
        self.occupancy.iter().filter(|o| o.is_some()).count()
    }
}

/// Draw the provisional start and end points
///
/// The start lies in the north-west sixth of the grid, the end in the
/// south-east sixth.
pub fn pick_endpoints(width: u32, height: u32, rng: &mut MapRng) -> (GridPoint, GridPoint) {
    let start_x = rng.rn2(width / 6);
    let start_y = rng.rn2(height / 6);
    let end_x = rng.range(width * 5 / 6, width);
    let end_y = rng.range(height * 5 / 6, height);
    (
        GridPoint::new(start_x, start_y),
        GridPoint::new(end_x, end_y),
    )
}

/// Pack a `width` x `height` grid with cells from `catalog`
pub fn pack_grid(
    width: u32,
    height: u32,
    catalog: &SizeCatalog,
    start_point: GridPoint,
    end_point: GridPoint,
    rng: &mut MapRng,
) -> Packing {
    let max_cell = catalog.max_dimension();
    let table = FitTable::new(catalog);
    let mut occupancy: Vec<Option<usize>> = vec![None; (width * height) as usize];
    let mut cells: Vec<WorkingCell> = Vec::new();
    let mut start_cell = None;
    let mut end_cell = None;
    let mut gaps = 0;

    for y in 0..height {
        let mut x = 0;
        while x < width {
            if occupancy[(y * width + x) as usize].is_some() {
                x += 1;
                continue;
            }

            let max_w = free_run_east(&occupancy, width, x, y, max_cell);
            let max_h = free_run_south(&occupancy, width, height, x, y, max_cell);
            let candidates = table.fitting(max_w, max_h);
            if max_w == 0 || max_h == 0 || candidates.is_empty() {
                gaps += 1;
                x += 1;
                continue;
            }

            let size = candidates[rng.index(candidates.len())];
            let cost = rng.unit();
            let index = cells.len();

            for yp in y..y + size.height {
                for xp in x..x + size.width {
                    occupancy[(yp * width + xp) as usize] = Some(index);
                }
            }

            let cell = WorkingCell::new(x, y, size, index, cost);
            if cell.contains_point(start_point.x, start_point.y) {
                start_cell = Some(index);
            }
            if cell.contains_point(end_point.x, end_point.y) {
                end_cell = Some(index);
            }
            cells.push(cell);

            x += size.width;
        }
    }

    tracing::debug!(
        cells = cells.len(),
        gaps,
        "packed {}x{} grid",
        width,
        height
    );

    Packing {
        width,
        height,
        cells,
        start_point,
        end_point,
        start_cell,
        end_cell,
        gaps,
        occupancy,
    }
}

fn free_run_east(occupancy: &[Option<usize>], width: u32, x: u32, y: u32, cap: u32) -> u32 {
    let mut run = 0;
    while run < cap && x + run < width && occupancy[(y * width + x + run) as usize].is_none() {
        run += 1;
    }
    run
}

fn free_run_south(
    occupancy: &[Option<usize>],
    width: u32,
    height: u32,
    x: u32,
    y: u32,
    cap: u32,
) -> u32 {
    let mut run = 0;
    while run < cap && y + run < height && occupancy[((y + run) * width + x) as usize].is_none() {
        run += 1;
    }
    run
}
