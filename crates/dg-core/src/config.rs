//! Generator configuration

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::ConfigError;
use crate::layout::{CellSize, ExpansionTuning, SizeCatalog};
use crate::rng::MapRng;

/// Default number of generation attempts before giving up
pub const DEFAULT_MAX_ATTEMPTS: u32 = 16;

/// An inclusive range of grid dimensions
///
/// Written as `"N"` or `"A-B"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct IncRange {
    pub start: u32,
    pub end: u32,
}

/// Malformed range text
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Invalid range '{0}', expected N or A-B")]
pub struct ParseRangeError(pub String);

impl IncRange {
    pub const fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    pub const fn exactly(value: u32) -> Self {
        Self::new(value, value)
    }

    pub fn contains(&self, value: u32) -> bool {
        value >= self.start && value <= self.end
    }

    /// Draw a value; a reversed range yields `start`
    pub fn pick(&self, rng: &mut MapRng) -> u32 {
        rng.range_inclusive(self.start, self.end)
    }

    /// Reject empty, reversed or zero-based ranges
    pub fn validate(&self, axis: &'static str) -> Result<(), ConfigError> {
        if self.start == 0 || self.start > self.end {
            return Err(ConfigError::InvalidRange {
                axis,
                start: self.start,
                end: self.end,
            });
        }
        Ok(())
    }
}

impl fmt::Display for IncRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for IncRange {
    type Err = ParseRangeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseRangeError(s.to_string());
        let trimmed = s.trim();
        match trimmed.split_once('-') {
            Some((a, b)) => {
                let start = a.trim().parse().map_err(|_| err())?;
                let end = b.trim().parse().map_err(|_| err())?;
                Ok(Self::new(start, end))
            }
            None => trimmed.parse().map(Self::exactly).map_err(|_| err()),
        }
    }
}

impl TryFrom<String> for IncRange {
    type Error = ParseRangeError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<IncRange> for String {
    fn from(range: IncRange) -> Self {
        range.to_string()
    }
}

/// Everything a generation run needs besides the seed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    pub width: IncRange,
    pub height: IncRange,
    pub catalog: SizeCatalog,
    #[serde(default)]
    pub tuning: ExpansionTuning,
    /// Whole-run attempts, each with a fresh seed, before giving up
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
}

fn default_max_attempts() -> u32 {
    DEFAULT_MAX_ATTEMPTS
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self::new(
            IncRange::new(24, 32),
            IncRange::new(24, 32),
            SizeCatalog::new([
                CellSize::new(1, 1),
                CellSize::new(1, 2),
                CellSize::new(2, 2),
                CellSize::new(2, 3),
                CellSize::new(3, 3),
            ]),
        )
    }
}

impl GeneratorConfig {
    pub fn new(width: IncRange, height: IncRange, catalog: SizeCatalog) -> Self {
        Self {
            width,
            height,
            catalog,
            tuning: ExpansionTuning::default(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    pub fn with_tuning(mut self, tuning: ExpansionTuning) -> Self {
        self.tuning = tuning;
        self
    }

    pub fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Check the configuration can produce floors at all
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.catalog.validate()?;
        self.width.validate("width")?;
        self.height.validate("height")?;
        if self.max_attempts == 0 {
            return Err(ConfigError::NoAttempts);
        }
        if !self.catalog.any_fits(self.width.start, self.height.start) {
            return Err(ConfigError::NoFittingCell {
                width: self.width.start,
                height: self.height.start,
            });
        }
        Ok(())
    }
}
