//! Map templates on disk
//!
//! A map directory holds `def.json` and one `cell*.json` per footprint:
//!
//! ```text
//! maps/dungeon/
//!   def.json      {"name": "dungeon", "generator": "room", "width": "24-32", "height": "24-32"}
//!   cell2x3.json  {"size": "2x3", "weight": 1, "doors": [...]}
//! ```
//!
//! `doors` lists one flag per wall unit going north, east, south then west,
//! so it has `2 * width + 2 * height` entries.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use dg_core::{
    CellSize, ExpansionTuning, Floor, GeneratorConfig, IncRange, Side, Sides, SizeCatalog,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use strum::{Display, EnumString};

use crate::error::TemplateError;

/// Name of the map definition file inside a map directory
pub const DEF_FILE: &str = "def.json";

/// Generators a template can ask for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive, serialize_all = "lowercase")]
pub enum GeneratorKind {
    /// Packed rooms joined by doors along a principal path
    Room,
}

impl GeneratorKind {
    /// Produce a floor for `config` with this generator
    pub fn generate(self, config: &GeneratorConfig, seed: u64) -> Result<Floor, TemplateError> {
        match self {
            GeneratorKind::Room => Ok(dg_core::generate(config, seed)?),
        }
    }
}

/// Parse a `"WxH"` footprint
pub fn parse_size(text: &str) -> Result<CellSize, TemplateError> {
    let err = || TemplateError::Parse {
        what: "cell size",
        text: text.to_string(),
    };
    let (w, h) = text.trim().split_once(['x', 'X']).ok_or_else(err)?;
    let width = w.parse().map_err(|_| err())?;
    let height = h.parse().map_err(|_| err())?;
    Ok(CellSize::new(width, height))
}

fn deserialize_size<'de, D: Deserializer<'de>>(deserializer: D) -> Result<CellSize, D::Error> {
    let text = String::deserialize(deserializer)?;
    parse_size(&text).map_err(serde::de::Error::custom)
}

fn serialize_size<S: Serializer>(size: &CellSize, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&size.to_string())
}

fn default_weight() -> f64 {
    1.0
}

/// One allowed cell footprint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellTemplate {
    /// File stem the template was read from
    #[serde(skip)]
    pub name: String,
    #[serde(
        alias = "Size",
        deserialize_with = "deserialize_size",
        serialize_with = "serialize_size"
    )]
    pub size: CellSize,
    #[serde(default = "default_weight", alias = "Weight")]
    pub weight: f64,
    /// Unlimited when absent
    #[serde(default, alias = "MaximumCount")]
    pub maximum_count: Option<u32>,
    /// Door eligibility per wall unit; empty means every unit is eligible
    #[serde(default, alias = "Doors")]
    pub doors: Vec<bool>,
}

impl CellTemplate {
    pub fn new(name: impl Into<String>, size: CellSize) -> Self {
        Self {
            name: name.into(),
            size,
            weight: default_weight(),
            maximum_count: None,
            doors: Vec::new(),
        }
    }

    /// Door flags for one side, or `None` when no mask was given
    pub fn doors_on(&self, side: Side) -> Option<&[bool]> {
        if self.doors.is_empty() {
            return None;
        }
        let (w, h) = (self.size.width as usize, self.size.height as usize);
        let range = match side {
            Side::North => 0..w,
            Side::East => w..w + h,
            Side::South => w + h..2 * w + h,
            Side::West => 2 * w + h..2 * w + 2 * h,
        };
        self.doors.get(range)
    }

    /// Sides with at least one eligible door unit
    pub fn door_sides(&self) -> Sides {
        if self.doors.is_empty() {
            return Sides::all();
        }
        let mut sides = Sides::empty();
        for side in [Side::North, Side::East, Side::South, Side::West] {
            if self.doors_on(side).is_some_and(|units| units.contains(&true)) {
                sides |= side.flag();
            }
        }
        sides
    }

    pub fn validate(&self) -> Result<(), TemplateError> {
        if self.size.width == 0 || self.size.height == 0 {
            return Err(TemplateError::invalid(
                &self.name,
                format!("size {} has a zero dimension", self.size),
            ));
        }
        if !self.weight.is_finite() || self.weight < 0.0 {
            return Err(TemplateError::invalid(
                &self.name,
                format!("weight {} is not a non-negative number", self.weight),
            ));
        }
        let expected = 2 * (self.size.width + self.size.height) as usize;
        if !self.doors.is_empty() && self.doors.len() != expected {
            return Err(TemplateError::invalid(
                &self.name,
                format!(
                    "expected {} door flags for size {}, found {}",
                    expected,
                    self.size,
                    self.doors.len()
                ),
            ));
        }
        Ok(())
    }
}

/// A map definition with its cell templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapTemplate {
    #[serde(alias = "Name")]
    pub name: String,
    #[serde(alias = "Generator")]
    pub generator: String,
    #[serde(alias = "Width")]
    pub width: IncRange,
    #[serde(alias = "Height")]
    pub height: IncRange,
    #[serde(default, alias = "Tuning")]
    pub tuning: ExpansionTuning,
    #[serde(skip)]
    pub cells: Vec<CellTemplate>,
}

impl MapTemplate {
    /// Resolve the generator name
    pub fn kind(&self) -> Result<GeneratorKind, TemplateError> {
        GeneratorKind::from_str(&self.generator)
            .map_err(|_| TemplateError::UnknownGenerator(self.generator.clone()))
    }

    pub fn catalog(&self) -> SizeCatalog {
        self.cells.iter().map(|c| c.size).collect()
    }

    /// Build a validated generator configuration
    pub fn to_config(&self) -> Result<GeneratorConfig, TemplateError> {
        self.kind()?;
        if self.cells.is_empty() {
            return Err(TemplateError::invalid(&self.name, "no cell templates"));
        }
        for cell in &self.cells {
            cell.validate()?;
        }
        let config = GeneratorConfig::new(self.width, self.height, self.catalog())
            .with_tuning(self.tuning);
        config.validate()?;
        Ok(config)
    }

    /// Generate a floor from this template
    pub fn generate(&self, seed: u64) -> Result<Floor, TemplateError> {
        let config = self.to_config()?;
        self.kind()?.generate(&config, seed)
    }
}

/// Load a map directory
///
/// Cell templates are read from `cell*.json` files in file-name order and
/// named after their file stems.
pub fn load_map(dir: impl AsRef<Path>) -> Result<MapTemplate, TemplateError> {
    let dir = dir.as_ref();
    let def_path = dir.join(DEF_FILE);
    let mut template: MapTemplate = read_json(&def_path)?;

    let entries = fs::read_dir(dir).map_err(|e| TemplateError::io(dir, e))?;
    let mut cell_paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path = entry.map_err(|e| TemplateError::io(dir, e))?.path();
        let is_cell = path.is_file()
            && path
                .file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with("cell") && n.ends_with(".json"));
        if is_cell {
            cell_paths.push(path);
        }
    }
    cell_paths.sort();

    for path in cell_paths {
        let mut cell: CellTemplate = read_json(&path)?;
        cell.name = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or_default()
            .to_string();
        template.cells.push(cell);
    }

    tracing::debug!(
        map = %template.name,
        cells = template.cells.len(),
        "loaded map template from {}",
        dir.display()
    );
    Ok(template)
}

/// Load `root/<name>`
pub fn load_named(root: impl AsRef<Path>, name: &str) -> Result<MapTemplate, TemplateError> {
    load_map(root.as_ref().join(name))
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, TemplateError> {
    let text = fs::read_to_string(path).map_err(|e| TemplateError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| TemplateError::json(path, e))
}
