//! Perft suite configuration.
//!
//! A suite is a TOML file listing named positions (as USI `position`
//! commands, with or without the leading keyword) and their expected node
//! counts from depth 1 upward.

use serde::{Deserialize, Serialize};
use shogi_engine::{Position, PositionError};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur when loading or validating a suite.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the suite file from disk.
    #[error("Failed to read suite file: {0}")]
    ReadError(#[from] std::io::Error),
    /// Failed to parse the suite file as valid TOML.
    #[error("Failed to parse suite: {0}")]
    ParseError(#[from] toml::de::Error),
    /// The suite lists no positions.
    #[error("Suite contains no positions")]
    EmptySuite,
    /// A position entry could not be set up.
    #[error("Position '{name}' is invalid: {source}")]
    InvalidPosition {
        name: String,
        #[source]
        source: PositionError,
    },
}

/// One position of a suite.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SuiteEntry {
    pub name: String,
    /// USI position command. Defaults to the initial position.
    #[serde(default = "default_position")]
    pub position: String,
    /// Expected node counts for depths 1, 2, ...
    #[serde(default)]
    pub expected: Vec<u64>,
    /// Overrides the suite-wide depth limit.
    #[serde(default)]
    pub max_depth: Option<u32>,
}

fn default_position() -> String {
    "startpos".to_string()
}

impl SuiteEntry {
    /// Depths to run: every expected count up to the depth limit, or all
    /// depths up to the limit when nothing is expected.
    pub fn depths(&self, suite_max_depth: u32) -> std::ops::RangeInclusive<u32> {
        let limit = self.max_depth.unwrap_or(suite_max_depth);
        let last = if self.expected.is_empty() {
            limit
        } else {
            limit.min(self.expected.len() as u32)
        };
        1..=last
    }

    /// Expected node count at `depth`, if listed.
    pub fn expected_at(&self, depth: u32) -> Option<u64> {
        let index = usize::try_from(depth).ok()?.checked_sub(1)?;
        self.expected.get(index).copied()
    }

    /// Sets up the position this entry describes.
    pub fn setup(&self) -> Result<Position, ConfigError> {
        let mut position = Position::startpos();
        position
            .set_usi_position(&self.position)
            .map_err(|source| ConfigError::InvalidPosition {
                name: self.name.clone(),
                source,
            })?;
        Ok(position)
    }
}

/// A perft suite.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SuiteConfig {
    /// Default depth limit. Defaults to 3.
    #[serde(default = "default_max_depth")]
    pub max_depth: u32,
    #[serde(default)]
    pub positions: Vec<SuiteEntry>,
}

fn default_max_depth() -> u32 {
    3
}

impl Default for SuiteConfig {
    fn default() -> Self {
        SuiteConfig {
            max_depth: default_max_depth(),
            positions: Vec::new(),
        }
    }
}

impl SuiteConfig {
    /// Reads and validates a suite file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ReadError`] if the file cannot be read,
    /// [`ConfigError::ParseError`] for invalid TOML, and the errors of
    /// [`Self::validate`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: SuiteConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the suite is non-empty and every position sets up.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.positions.is_empty() {
            return Err(ConfigError::EmptySuite);
        }
        for entry in &self.positions {
            entry.setup()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_suite() {
        let toml_content = r#"
max_depth = 4

[[positions]]
name = "startpos"
expected = [30, 900]

[[positions]]
name = "opening"
position = "position startpos moves 7g7f"
max_depth = 1
"#;

        let config: SuiteConfig = toml::from_str(toml_content).unwrap();
        assert_eq!(config.max_depth, 4);
        assert_eq!(config.positions.len(), 2);

        let start = &config.positions[0];
        assert_eq!(start.position, "startpos");
        assert_eq!(start.depths(config.max_depth), 1..=2);
        assert_eq!(start.expected_at(2), Some(900));
        assert_eq!(start.expected_at(3), None);
        assert_eq!(start.expected_at(0), None);

        let opening = &config.positions[1];
        assert_eq!(opening.depths(config.max_depth), 1..=1);
        assert_eq!(opening.setup().unwrap().plies_from_root(), 1);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults() {
        let config: SuiteConfig = toml::from_str("").unwrap();
        assert_eq!(config, SuiteConfig::default());
        assert!(matches!(config.validate(), Err(ConfigError::EmptySuite)));
    }

    #[test]
    fn test_invalid_position_is_reported() {
        let toml_content = r#"
[[positions]]
name = "broken"
position = "startpos moves 7g7f 7f7e"
"#;
        let config: SuiteConfig = toml::from_str(toml_content).unwrap();
        match config.validate() {
            Err(ConfigError::InvalidPosition { name, source }) => {
                assert_eq!(name, "broken");
                assert!(matches!(source, PositionError::IllegalMove { ply: 2, .. }));
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_bundled_suite_parses() {
        let path = concat!(env!("CARGO_MANIFEST_DIR"), "/perft.toml");
        let config = SuiteConfig::load(path).unwrap();
        assert_eq!(config.positions[0].expected_at(1), Some(30));
        assert_eq!(config.positions[1].depths(config.max_depth), 1..=1);
    }
}
