//! Layout pipeline stages
//!
//! Packing, neighbor graph, direct path, expansion and doors.

mod cell;
mod doors;
mod expand;
mod graph;
mod packer;
mod path;
mod size;

pub use cell::{WorkingCell, span_overlap};
pub use doors::{CellDoors, DoorMask, SharedWall, Side, Sides, plan_doors, shared_wall};
pub use expand::{AreaFraction, ExpansionTuning, Selection, add_extra_links, recruit_rooms};
pub use graph::{are_adjacent, build_neighbors};
pub use packer::{GridPoint, Packing, pack_grid, pick_endpoints};
pub use path::{ShortestPathTree, direct_path, shortest_paths};
pub use size::{CellSize, FitTable, MAX_WALL_LENGTH, SizeCatalog};
