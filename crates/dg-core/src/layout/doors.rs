//! Door placement between linked cells
//!
//! Each link gets exactly one opening, at a random unit of the wall the two
//! cells share. The opening is recorded on both sides: the east wall of the
//! western cell and the west wall of the eastern cell, or the south wall of
//! the northern cell and the north wall of the southern cell.

use bitflags::bitflags;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::error::{FloorError, GenerationError};
use crate::rng::MapRng;

use super::cell::{WorkingCell, span_overlap};
use super::size::MAX_WALL_LENGTH;

/// Openings along one wall, one bit per unit of wall length
///
/// `len` never exceeds [`MAX_WALL_LENGTH`] and no bit at or past `len` is
/// set, including for masks read back from JSON.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "RawDoorMask")]
pub struct DoorMask {
    bits: u64,
    len: u32,
}

/// Unchecked wire form of a [`DoorMask`]
#[derive(Deserialize)]
struct RawDoorMask {
    bits: u64,
    len: u32,
}

impl TryFrom<RawDoorMask> for DoorMask {
    type Error = FloorError;

    fn try_from(raw: RawDoorMask) -> Result<Self, Self::Error> {
        if raw.len > MAX_WALL_LENGTH {
            return Err(FloorError::MaskTooLong {
                len: raw.len,
                max: MAX_WALL_LENGTH,
            });
        }
        let valid = u64::MAX.checked_shr(64 - raw.len).unwrap_or(0);
        if raw.bits & !valid != 0 {
            return Err(FloorError::MaskBitsPastEnd {
                len: raw.len,
                bits: raw.bits,
            });
        }
        Ok(Self {
            bits: raw.bits,
            len: raw.len,
        })
    }
}

impl DoorMask {
    /// An empty wall of `len` units (capped at the bitset width)
    pub fn new(len: u32) -> Self {
        Self {
            bits: 0,
            len: len.min(MAX_WALL_LENGTH),
        }
    }

    /// Wall length in units
    pub fn len(&self) -> u32 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Raw bits, bit `i` set for an opening at offset `i`
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn get(&self, offset: u32) -> bool {
        offset < self.len && self.bits & (1 << offset) != 0
    }

    /// Open the wall at `offset`; offsets past the end are ignored
    pub fn set(&mut self, offset: u32) {
        if offset < self.len {
            self.bits |= 1 << offset;
        }
    }

    /// Number of openings
    pub fn count(&self) -> u32 {
        self.bits.count_ones()
    }

    pub fn has_doors(&self) -> bool {
        self.bits != 0
    }

    /// Every unit of the wall, `true` where there is an opening
    pub fn iter(&self) -> impl Iterator<Item = bool> + '_ {
        (0..self.len).map(|i| self.get(i))
    }

    /// Offsets of the openings, ascending
    pub fn openings(&self) -> impl Iterator<Item = u32> + '_ {
        (0..self.len).filter(|&i| self.get(i))
    }
}

/// A side of a rectangular cell
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
pub enum Side {
    North,
    East,
    South,
    West,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::North => Side::South,
            Side::East => Side::West,
            Side::South => Side::North,
            Side::West => Side::East,
        }
    }

    pub fn flag(self) -> Sides {
        match self {
            Side::North => Sides::NORTH,
            Side::East => Sides::EAST,
            Side::South => Sides::SOUTH,
            Side::West => Sides::WEST,
        }
    }

    /// Whether walls on this side run along x (north and south walls)
    pub fn is_horizontal(self) -> bool {
        matches!(self, Side::North | Side::South)
    }
}

bitflags! {
    /// A set of cell sides
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct Sides: u8 {
        const NORTH = 0x01;
        const WEST = 0x02;
        const SOUTH = 0x04;
        const EAST = 0x08;
    }
}

/// Door masks for the four walls of one cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CellDoors {
    pub north: DoorMask,
    pub east: DoorMask,
    pub south: DoorMask,
    pub west: DoorMask,
}

impl CellDoors {
    /// Empty walls sized for a `width` x `height` cell
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            north: DoorMask::new(width),
            east: DoorMask::new(height),
            south: DoorMask::new(width),
            west: DoorMask::new(height),
        }
    }

    pub fn side(&self, side: Side) -> &DoorMask {
        match side {
            Side::North => &self.north,
            Side::East => &self.east,
            Side::South => &self.south,
            Side::West => &self.west,
        }
    }

    pub fn side_mut(&mut self, side: Side) -> &mut DoorMask {
        match side {
            Side::North => &mut self.north,
            Side::East => &mut self.east,
            Side::South => &mut self.south,
            Side::West => &mut self.west,
        }
    }

    /// Sides with at least one opening
    pub fn sides(&self) -> Sides {
        let mut sides = Sides::empty();
        for (side, mask) in [
            (Side::North, &self.north),
            (Side::East, &self.east),
            (Side::South, &self.south),
            (Side::West, &self.west),
        ] {
            if mask.has_doors() {
                sides |= side.flag();
            }
        }
        sides
    }

    pub fn count(&self) -> u32 {
        self.north.count() + self.east.count() + self.south.count() + self.west.count()
    }
}

/// The wall two cells share
///
/// `first` is the western (or northern) cell. Offsets are measured from
/// each cell's own corner along the shared wall.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SharedWall {
    pub first: usize,
    pub second: usize,
    /// Side of `first` the wall lies on; `second` has the opposite side
    pub side: Side,
    pub first_offset: u32,
    pub second_offset: u32,
    pub length: u32,
}

/// Find the wall shared by two cells, if they touch along an edge
pub fn shared_wall(a: &WorkingCell, b: &WorkingCell) -> Option<SharedWall> {
    let (c1, c2) = if a.x <= b.x { (a, b) } else { (b, a) };
    if c1.right() == c2.x
        && let Some((lo, length)) = span_overlap(c1.y, c1.height, c2.y, c2.height)
    {
        return Some(SharedWall {
            first: c1.index,
            second: c2.index,
            side: Side::East,
            first_offset: lo - c1.y,
            second_offset: lo - c2.y,
            length,
        });
    }

    let (c1, c2) = if a.y <= b.y { (a, b) } else { (b, a) };
    if c1.bottom() == c2.y
        && let Some((lo, length)) = span_overlap(c1.x, c1.width, c2.x, c2.width)
    {
        return Some(SharedWall {
            first: c1.index,
            second: c2.index,
            side: Side::South,
            first_offset: lo - c1.x,
            second_offset: lo - c2.x,
            length,
        });
    }

    None
}

/// Place one door per link
///
/// Returns door masks for every working cell; cells that take part in no
/// link keep solid walls. Links must join cells that share a wall.
pub fn plan_doors(
    cells: &[WorkingCell],
    links: &[(usize, usize)],
    rng: &mut MapRng,
) -> Result<Vec<CellDoors>, GenerationError> {
    let mut doors: Vec<CellDoors> = cells
        .iter()
        .map(|c| CellDoors::new(c.width, c.height))
        .collect();

    for &(a, b) in links {
        let wall = shared_wall(&cells[a], &cells[b]).ok_or(GenerationError::NotAdjacent { a, b })?;
        let i = rng.rn2(wall.length);
        doors[wall.first]
            .side_mut(wall.side)
            .set(wall.first_offset + i);
        doors[wall.second]
            .side_mut(wall.side.opposite())
            .set(wall.second_offset + i);
    }

    tracing::debug!(doors = links.len(), "placed doors");
    Ok(doors)
}
