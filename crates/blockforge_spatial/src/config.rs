//! Clipmap configuration.
//!
//! All tunables are explicit fields supplied by the caller or loaded
//! once at startup from a TOML file. No environment variables.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised while loading or validating a clipmap config.
#[derive(Error, Debug)]
pub enum ClipmapConfigError {
    /// The TOML text failed to parse.
    #[error("clipmap config parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The parsed values violate an invariant.
    #[error("invalid clipmap config: {0}")]
    Invalid(String),
}

fn default_level_count() -> u32 {
    3
}

fn default_base_brick_size_cells() -> u32 {
    16
}

fn default_brick_radius() -> Vec<u32> {
    vec![2, 2, 2]
}

/// Parameters of the clipmap index.
///
/// Brick size doubles per level starting from
/// `base_brick_size_cells`; `brick_radius[level]` is the Chebyshev
/// radius, in bricks, of the residency ball around the camera (the last
/// entry repeats for deeper levels).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipmapConfig {
    /// Number of nested levels; at least 1.
    #[serde(default = "default_level_count")]
    pub level_count: u32,
    /// Cells per brick at level 0; a power of two.
    #[serde(default = "default_base_brick_size_cells")]
    pub base_brick_size_cells: u32,
    /// Per-level residency radius in bricks.
    #[serde(default = "default_brick_radius")]
    pub brick_radius: Vec<u32>,
}

impl Default for ClipmapConfig {
    fn default() -> Self {
        Self {
            level_count: default_level_count(),
            base_brick_size_cells: default_base_brick_size_cells(),
            brick_radius: default_brick_radius(),
        }
    }
}

impl ClipmapConfig {
    /// Parses and validates a config from TOML text.
    ///
    /// # Errors
    ///
    /// `Parse` on malformed TOML, `Invalid` when the values violate an
    /// invariant.
    pub fn from_toml_str(text: &str) -> Result<Self, ClipmapConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks the config invariants.
    ///
    /// # Errors
    ///
    /// `Invalid` with a human-readable reason.
    pub fn validate(&self) -> Result<(), ClipmapConfigError> {
        if self.level_count < 1 {
            return Err(ClipmapConfigError::Invalid(
                "level_count must be at least 1".into(),
            ));
        }
        if !self.base_brick_size_cells.is_power_of_two() {
            return Err(ClipmapConfigError::Invalid(format!(
                "base_brick_size_cells must be a power of two, got {}",
                self.base_brick_size_cells
            )));
        }
        if self.brick_radius.is_empty() {
            return Err(ClipmapConfigError::Invalid(
                "brick_radius must name at least one level".into(),
            ));
        }
        if self.brick_radius.iter().any(|&r| r == 0) {
            return Err(ClipmapConfigError::Invalid(
                "brick_radius entries must be at least 1".into(),
            ));
        }
        // Level-(L-1) bricks must still fit i32 cells.
        let shift = self.level_count - 1;
        if shift >= 30 || self.base_brick_size_cells.checked_shl(shift).is_none() {
            return Err(ClipmapConfigError::Invalid(
                "deepest level brick size overflows".into(),
            ));
        }
        Ok(())
    }

    /// Cells per brick at a level.
    #[inline]
    #[must_use]
    pub fn brick_size_cells(&self, level: u32) -> u32 {
        self.base_brick_size_cells << level
    }

    /// Residency radius in bricks at a level; the last configured entry
    /// repeats for deeper levels.
    #[inline]
    #[must_use]
    pub fn brick_radius_for_level(&self, level: u32) -> u32 {
        let index = (level as usize).min(self.brick_radius.len() - 1);
        self.brick_radius[index]
    }
}
