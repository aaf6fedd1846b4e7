//! dg-core: Procedural floor generation
//!
//! Packs a rectangular grid with rectangular rooms, routes a cheapest chain
//! of rooms from a north-west start to a south-east end, grows extra rooms
//! and loops around that chain, and cuts one door per link.
//!
//! This crate contains no I/O. Everything random flows through one seeded
//! [`MapRng`], so a seed and a configuration fully determine a floor.
//!
//! ```no_run
//! use dg_core::{GeneratorConfig, generate};
//!
//! let floor = generate(&GeneratorConfig::default(), 42).unwrap();
//! println!("{}", floor.to_ascii());
//! ```

pub mod config;
pub mod error;
pub mod floor;
pub mod generator;
pub mod layout;

mod rng;

pub use config::{DEFAULT_MAX_ATTEMPTS, GeneratorConfig, IncRange, ParseRangeError};
pub use error::{ConfigError, FloorError, GenerationError};
pub use floor::{DoorRef, Floor, MapCell};
pub use generator::{attempt_seed, generate, generate_once};
pub use layout::{CellSize, DoorMask, ExpansionTuning, Side, Sides, SizeCatalog};
pub use rng::MapRng;
