//! dg-template: Map templates and floor files for dg-core
//!
//! Reads map directories (`def.json` plus `cell*.json`) into generator
//! configurations, and writes generated floors to JSON.

mod error;
pub mod export;
pub mod template;

pub use error::TemplateError;
pub use export::{FLOOR_VERSION, FloorFile, FloorHeader, export_floor, load_floor};
pub use template::{
    CellTemplate, DEF_FILE, GeneratorKind, MapTemplate, load_map, load_named, parse_size,
};
