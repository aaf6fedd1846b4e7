//! Generated floors
//!
//! A [`Floor`] owns the selected cells in selection order: the direct path
//! from start to end first, then recruited rooms. Every index stored on the
//! floor (`start`, `end`, `path`, `extra_links`) points into `cells`.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::FloorError;
use crate::layout::{CellDoors, CellSize, DoorMask, Side, Sides, WorkingCell};

/// A room of the finished floor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapCell {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub doors_north: DoorMask,
    pub doors_south: DoorMask,
    pub doors_east: DoorMask,
    pub doors_west: DoorMask,
}

impl MapCell {
    /// A cell with solid walls
    pub fn new(x: u32, y: u32, size: CellSize) -> Self {
        Self::with_doors(x, y, size, CellDoors::new(size.width, size.height))
    }

    pub fn with_doors(x: u32, y: u32, size: CellSize, doors: CellDoors) -> Self {
        Self {
            x,
            y,
            width: size.width,
            height: size.height,
            doors_north: doors.north,
            doors_south: doors.south,
            doors_east: doors.east,
            doors_west: doors.west,
        }
    }

    pub(crate) fn from_working(cell: &WorkingCell, doors: CellDoors) -> Self {
        Self::with_doors(cell.x, cell.y, cell.size(), doors)
    }

    pub fn size(&self) -> CellSize {
        CellSize::new(self.width, self.height)
    }

    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    pub fn contains_point(&self, px: u32, py: u32) -> bool {
        px >= self.x && px < self.right() && py >= self.y && py < self.bottom()
    }

    pub fn overlaps(&self, other: &MapCell) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    pub fn doors(&self, side: Side) -> &DoorMask {
        match side {
            Side::North => &self.doors_north,
            Side::East => &self.doors_east,
            Side::South => &self.doors_south,
            Side::West => &self.doors_west,
        }
    }

    /// Sides with at least one door
    pub fn door_sides(&self) -> Sides {
        [Side::North, Side::East, Side::South, Side::West]
            .into_iter()
            .filter(|&side| self.doors(side).has_doors())
            .fold(Sides::empty(), |acc, side| acc | side.flag())
    }

    pub fn door_count(&self) -> u32 {
        self.doors_north.count()
            + self.doors_east.count()
            + self.doors_south.count()
            + self.doors_west.count()
    }

    /// Grid unit just outside a wall unit, if it is on the grid's side of 0
    fn outside(&self, side: Side, offset: u32) -> Option<(u32, u32)> {
        match side {
            Side::North => self.y.checked_sub(1).map(|y| (self.x + offset, y)),
            Side::South => Some((self.x + offset, self.bottom())),
            Side::East => Some((self.right(), self.y + offset)),
            Side::West => self.x.checked_sub(1).map(|x| (x, self.y + offset)),
        }
    }
}

/// A door seen from one of the two cells it joins
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DoorRef {
    pub cell: usize,
    pub side: Side,
    pub offset: u32,
}

/// A generated floor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Floor {
    pub width: u32,
    pub height: u32,
    /// Seed of the run that produced this floor
    pub seed: u64,
    pub cells: Vec<MapCell>,
    pub start: usize,
    pub end: usize,
    /// Direct path from `start` to `end`, both included
    pub path: Vec<usize>,
    /// Links beyond the direct path (recruitment, then augmentation)
    pub extra_links: Vec<(usize, usize)>,
}

impl Floor {
    /// Index of the cell covering a grid unit
    pub fn cell_at(&self, x: u32, y: u32) -> Option<usize> {
        self.cells.iter().position(|c| c.contains_point(x, y))
    }

    /// Total number of doors (each counted once, not per side)
    pub fn door_count(&self) -> u32 {
        self.cells.iter().map(MapCell::door_count).sum::<u32>() / 2
    }

    /// Pairs of cells whose footprints share a grid unit
    pub fn overlapping_cells(&self) -> Vec<(usize, usize)> {
        let mut pairs = Vec::new();
        for i in 0..self.cells.len() {
            for j in (i + 1)..self.cells.len() {
                if self.cells[i].overlaps(&self.cells[j]) {
                    pairs.push((i, j));
                }
            }
        }
        pairs
    }

    /// The wall unit facing `door` on the other side, if a cell is there
    pub fn across(&self, door: DoorRef) -> Option<DoorRef> {
        let cell = self.cells.get(door.cell)?;
        let (ox, oy) = cell.outside(door.side, door.offset)?;
        let other = self.cell_at(ox, oy)?;
        let offset = if door.side.is_horizontal() {
            ox - self.cells[other].x
        } else {
            oy - self.cells[other].y
        };
        Some(DoorRef {
            cell: other,
            side: door.side.opposite(),
            offset,
        })
    }

    /// Every door, from both sides
    pub fn doors(&self) -> impl Iterator<Item = DoorRef> + '_ {
        self.cells.iter().enumerate().flat_map(|(idx, cell)| {
            [Side::North, Side::East, Side::South, Side::West]
                .into_iter()
                .flat_map(move |side| {
                    cell.doors(side).openings().map(move |offset| DoorRef {
                        cell: idx,
                        side,
                        offset,
                    })
                })
        })
    }

    /// Doors with no matching door on the facing wall
    pub fn unpaired_doors(&self) -> Vec<DoorRef> {
        self.doors()
            .filter(|&door| match self.across(door) {
                Some(other) => !self.cells[other.cell].doors(other.side).get(other.offset),
                None => true,
            })
            .collect()
    }

    /// Cells joined through each cell's doors
    pub fn door_neighbors(&self, idx: usize) -> Vec<usize> {
        let mut out = Vec::new();
        for door in self.doors().filter(|d| d.cell == idx) {
            if let Some(other) = self.across(door)
                && !out.contains(&other.cell)
            {
                out.push(other.cell);
            }
        }
        out
    }

    /// Cells reachable from `from` by walking through doors
    pub fn reachable_from(&self, from: usize) -> Vec<bool> {
        let mut seen = vec![false; self.cells.len()];
        if from >= self.cells.len() {
            return seen;
        }
        let mut queue = VecDeque::new();
        seen[from] = true;
        queue.push_back(from);
        while let Some(current) = queue.pop_front() {
            for next in self.door_neighbors(current) {
                if !seen[next] {
                    seen[next] = true;
                    queue.push_back(next);
                }
            }
        }
        seen
    }

    /// Check every cell can be reached from the start cell
    pub fn is_connected(&self) -> bool {
        self.reachable_from(self.start).iter().all(|&r| r)
    }

    /// Check the floor has the shape generation gives it
    ///
    /// Every cell lies on the grid with walls as long as its sides, and every
    /// stored index points into `cells`. Floors read from outside the
    /// generator should pass this before being walked or drawn.
    pub fn validate(&self) -> Result<(), FloorError> {
        if self.cells.is_empty() {
            return Err(FloorError::NoCells);
        }

        for (idx, cell) in self.cells.iter().enumerate() {
            let fits = |pos: u32, len: u32, limit: u32| {
                pos.checked_add(len).is_some_and(|far| far <= limit)
            };
            if !fits(cell.x, cell.width, self.width) || !fits(cell.y, cell.height, self.height) {
                return Err(FloorError::CellOutOfBounds {
                    cell: idx,
                    width: self.width,
                    height: self.height,
                });
            }
            for side in [Side::North, Side::East, Side::South, Side::West] {
                let expected = if side.is_horizontal() {
                    cell.width
                } else {
                    cell.height
                };
                let found = cell.doors(side).len();
                if found != expected {
                    return Err(FloorError::WallLength {
                        cell: idx,
                        side,
                        expected,
                        found,
                    });
                }
            }
        }

        let count = self.cells.len();
        let indices = [("start", self.start), ("end", self.end)]
            .into_iter()
            .chain(self.path.iter().map(|&i| ("path", i)))
            .chain(
                self.extra_links
                    .iter()
                    .flat_map(|&(a, b)| [("extra link", a), ("extra link", b)]),
            );
        for (what, index) in indices {
            if index >= count {
                return Err(FloorError::BadIndex { what, index, count });
            }
        }
        Ok(())
    }

    /// Plain-text picture of the floor
    ///
    /// Each grid unit is drawn at odd coordinates of a doubled canvas so
    /// walls sit between units. `#` is wall, `+` a door, `S`/`E` mark the
    /// start and end cells.
    pub fn to_ascii(&self) -> String {
        let cols = (self.width * 2 + 1) as usize;
        let rows = (self.height * 2 + 1) as usize;
        let mut canvas = vec![vec!['#'; cols]; rows];

        for cell in &self.cells {
            for y in (cell.y * 2 + 1)..(cell.bottom() * 2) {
                for x in (cell.x * 2 + 1)..(cell.right() * 2) {
                    canvas[y as usize][x as usize] = ' ';
                }
            }
        }
        for door in self.doors() {
            let cell = &self.cells[door.cell];
            let (x, y) = match door.side {
                Side::North => ((cell.x + door.offset) * 2 + 1, cell.y * 2),
                Side::South => ((cell.x + door.offset) * 2 + 1, cell.bottom() * 2),
                Side::East => (cell.right() * 2, (cell.y + door.offset) * 2 + 1),
                Side::West => (cell.x * 2, (cell.y + door.offset) * 2 + 1),
            };
            canvas[y as usize][x as usize] = '+';
        }
        for (idx, mark) in [(self.start, 'S'), (self.end, 'E')] {
            if let Some(cell) = self.cells.get(idx) {
                canvas[(cell.y * 2 + 1) as usize][(cell.x * 2 + 1) as usize] = mark;
            }
        }

        let mut out = String::with_capacity(rows * (cols + 1));
        for row in canvas {
            out.extend(row);
            out.push('\n');
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(x: u32, y: u32, w: u32, h: u32) -> MapCell {
        MapCell::new(x, y, CellSize::new(w, h))
    }

    /// Two 2x2 rooms side by side with one door at offset 1
    fn pair() -> Floor {
        let mut a = cell(0, 0, 2, 2);
        let mut b = cell(2, 0, 2, 2);
        a.doors_east.set(1);
        b.doors_west.set(1);
        Floor {
            width: 4,
            height: 2,
            seed: 0,
            cells: vec![a, b],
            start: 0,
            end: 1,
            path: vec![0, 1],
            extra_links: Vec::new(),
        }
    }

    #[test]
    fn test_paired_and_connected() {
        let floor = pair();
        assert_eq!(floor.door_count(), 1);
        assert!(floor.unpaired_doors().is_empty());
        assert!(floor.overlapping_cells().is_empty());
        assert_eq!(floor.door_neighbors(0), vec![1]);
        assert!(floor.is_connected());
        assert_eq!(floor.cells[0].door_sides(), Sides::EAST);
    }

    #[test]
    fn test_unpaired_door_detected() {
        let mut floor = pair();
        floor.cells[1].doors_west = DoorMask::new(2);
        let unpaired = floor.unpaired_doors();
        assert_eq!(
            unpaired,
            vec![DoorRef {
                cell: 0,
                side: Side::East,
                offset: 1
            }]
        );
    }

    #[test]
    fn test_door_to_nowhere_is_unpaired() {
        let mut floor = pair();
        floor.cells[0].doors_north.set(0);
        assert_eq!(floor.unpaired_doors().len(), 1);
    }

    #[test]
    fn test_disconnected_floor() {
        let mut floor = pair();
        floor.cells[0].doors_east = DoorMask::new(2);
        floor.cells[1].doors_west = DoorMask::new(2);
        assert!(!floor.is_connected());
        assert_eq!(floor.reachable_from(0), vec![true, false]);
    }

    #[test]
    fn test_across_uses_facing_offset() {
        // 0 0 0 0
        //     1 1
        let floor = Floor {
            width: 4,
            height: 2,
            seed: 0,
            cells: vec![cell(0, 0, 4, 1), cell(2, 1, 2, 1)],
            start: 0,
            end: 1,
            path: vec![0, 1],
            extra_links: Vec::new(),
        };
        let facing = floor
            .across(DoorRef {
                cell: 0,
                side: Side::South,
                offset: 3,
            })
            .unwrap();
        assert_eq!(
            facing,
            DoorRef {
                cell: 1,
                side: Side::North,
                offset: 1
            }
        );
    }

    #[test]
    fn test_overlap_detected() {
        let mut floor = pair();
        floor.cells.push(cell(1, 1, 2, 1));
        assert_eq!(floor.overlapping_cells(), vec![(0, 2), (1, 2)]);
    }

    #[test]
    fn test_ascii() {
        let expected = "\
#########
#S  #E  #
#   #   #
#   +   #
#########
";
        assert_eq!(pair().to_ascii(), expected);
    }

    #[test]
    fn test_validate() {
        assert_eq!(pair().validate(), Ok(()));

        let mut off_grid = pair();
        off_grid.cells[1].x = 3;
        assert_eq!(
            off_grid.validate(),
            Err(FloorError::CellOutOfBounds {
                cell: 1,
                width: 4,
                height: 2
            })
        );

        let mut wrapped = pair();
        wrapped.cells[0].x = u32::MAX;
        assert!(matches!(
            wrapped.validate(),
            Err(FloorError::CellOutOfBounds { cell: 0, .. })
        ));

        let mut long_wall = pair();
        long_wall.cells[0].doors_south = DoorMask::new(64);
        assert_eq!(
            long_wall.validate(),
            Err(FloorError::WallLength {
                cell: 0,
                side: Side::South,
                expected: 2,
                found: 64
            })
        );

        let mut bad_link = pair();
        bad_link.extra_links.push((0, 7));
        assert_eq!(
            bad_link.validate(),
            Err(FloorError::BadIndex {
                what: "extra link",
                index: 7,
                count: 2
            })
        );

        let mut bad_end = pair();
        bad_end.end = 2;
        assert!(matches!(
            bad_end.validate(),
            Err(FloorError::BadIndex { what: "end", .. })
        ));

        let mut empty = pair();
        empty.cells.clear();
        assert_eq!(empty.validate(), Err(FloorError::NoCells));
    }

    #[test]
    fn test_oversized_mask_rejected_from_json() {
        let mut json = serde_json::to_value(pair()).unwrap();
        json["cells"][0]["doors_east"] = serde_json::json!({ "bits": 1, "len": 100 });
        assert!(serde_json::from_value::<Floor>(json).is_err());
    }

    #[test]
    fn test_json_shape() {
        let json = serde_json::to_value(pair()).unwrap();
        assert_eq!(json["cells"][0]["width"], 2);
        assert_eq!(json["extra_links"].as_array().unwrap().len(), 0);
        let back: Floor = serde_json::from_value(json).unwrap();
        assert_eq!(back, pair());
    }
}
