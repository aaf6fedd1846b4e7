//! Floor files
//!
//! A generated floor written as JSON behind a small versioned header.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use dg_core::Floor;
use serde::{Deserialize, Serialize};

use crate::error::TemplateError;

/// Current floor file format version
pub const FLOOR_VERSION: u32 = 1;

/// Floor file header for versioning
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FloorHeader {
    /// Magic identifier
    pub magic: String,
    /// Format version
    pub version: u32,
    /// Template the floor was generated from
    pub map: String,
}

impl FloorHeader {
    const MAGIC: &'static str = "DGFL";

    pub fn new(map: &str) -> Self {
        Self {
            magic: Self::MAGIC.to_string(),
            version: FLOOR_VERSION,
            map: map.to_string(),
        }
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.magic != Self::MAGIC {
            return Err(TemplateError::InvalidHeader);
        }
        if self.version != FLOOR_VERSION {
            return Err(TemplateError::IncompatibleVersion {
                expected: FLOOR_VERSION,
                found: self.version,
            });
        }
        Ok(())
    }
}

/// Complete floor file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorFile {
    pub header: FloorHeader,
    pub floor: Floor,
}

/// Write a floor to `path` as pretty JSON
pub fn export_floor(floor: &Floor, map: &str, path: impl AsRef<Path>) -> Result<(), TemplateError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| TemplateError::io(path, e))?;
    let writer = BufWriter::new(file);
    let contents = FloorFile {
        header: FloorHeader::new(map),
        floor: floor.clone(),
    };
    serde_json::to_writer_pretty(writer, &contents).map_err(|e| TemplateError::json(path, e))?;
    tracing::debug!(map, "exported floor to {}", path.display());
    Ok(())
}

/// Read a floor written by [`export_floor`]
pub fn load_floor(path: impl AsRef<Path>) -> Result<FloorFile, TemplateError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| TemplateError::io(path, e))?;
    let reader = BufReader::new(file);
    let contents: FloorFile =
        serde_json::from_reader(reader).map_err(|e| TemplateError::json(path, e))?;
    contents.header.validate()?;
    contents
        .floor
        .validate()
        .map_err(|e| TemplateError::invalid(&path.display().to_string(), e.to_string()))?;
    Ok(contents)
}
