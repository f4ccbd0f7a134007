//! Configuration for the layout engine

use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

/// Tolerance for the inflated overlap and "resting on" tests
pub const OVERLAP_EPSILON: f64 = 0.001;

/// Coarser tolerance deciding whether a block was flush against a moving face
pub const TOUCH_TOLERANCE: f64 = 0.1;

/// Two placement requests closer than this (per component) are the same cell
pub const PLACEMENT_TOLERANCE: f64 = 0.1;

/// Minimum positional change that counts as resolver progress
pub const PROGRESS_EPSILON: f64 = 0.001;

/// Hard bound on resolution passes
pub const MAX_ITERATIONS: usize = 10;

/// Errors that can occur when loading a configuration file
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse config TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// How dependents react when a block shrinks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ShrinkPolicy {
    /// Dependents follow the face back (signed delta)
    #[default]
    Follow,
    /// Dependents are pushed away by the magnitude of the change, even on shrink
    PushAway,
}

/// Where a block added against a negative face (left, below, behind) goes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegativeFace {
    /// Offset by the source block's own extent on that axis
    #[default]
    SourceExtent,
    /// Offset by the new block's extent, so it ends flush against the face
    Flush,
}

/// Configuration options for layout editing
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutConfig {
    /// Inflation applied to bounds in overlap tests
    pub overlap_epsilon: f64,

    /// Gap under which two faces count as touching
    pub touch_tolerance: f64,

    /// Distance under which a new block collides with an existing one
    pub placement_tolerance: f64,

    /// Minimum change in position that counts as progress during resolution
    pub progress_epsilon: f64,

    /// Maximum number of resolution passes
    pub max_iterations: usize,

    /// Displacement direction when a block shrinks
    pub shrink_policy: ShrinkPolicy,

    /// Clamp blocks pushed below ground back to y = 0
    pub clamp_to_ground: bool,

    /// Offset rule for placement against negative faces
    pub negative_face: NegativeFace,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            overlap_epsilon: OVERLAP_EPSILON,
            touch_tolerance: TOUCH_TOLERANCE,
            placement_tolerance: PLACEMENT_TOLERANCE,
            progress_epsilon: PROGRESS_EPSILON,
            max_iterations: MAX_ITERATIONS,
            shrink_policy: ShrinkPolicy::Follow,
            clamp_to_ground: true,
            negative_face: NegativeFace::SourceExtent,
        }
    }
}

/// TOML structure for deserializing configuration files
#[derive(Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TomlConfig {
    tolerance: Option<TomlTolerance>,
    resolver: Option<TomlResolver>,
    placement: Option<TomlPlacement>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlTolerance {
    overlap: Option<f64>,
    touch: Option<f64>,
    placement: Option<f64>,
    progress: Option<f64>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlResolver {
    max_iterations: Option<usize>,
    shrink: Option<ShrinkPolicy>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlPlacement {
    clamp_to_ground: Option<bool>,
    negative_face: Option<NegativeFace>,
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load configuration from a TOML string. Missing keys keep their defaults.
    pub fn from_str(content: &str) -> Result<Self, ConfigError> {
        let parsed: TomlConfig = toml::from_str(content)?;
        let mut config = Self::default();

        if let Some(t) = parsed.tolerance {
            config.overlap_epsilon = t.overlap.unwrap_or(config.overlap_epsilon);
            config.touch_tolerance = t.touch.unwrap_or(config.touch_tolerance);
            config.placement_tolerance = t.placement.unwrap_or(config.placement_tolerance);
            config.progress_epsilon = t.progress.unwrap_or(config.progress_epsilon);
        }
        if let Some(r) = parsed.resolver {
            config.max_iterations = r.max_iterations.unwrap_or(config.max_iterations);
            config.shrink_policy = r.shrink.unwrap_or(config.shrink_policy);
        }
        if let Some(p) = parsed.placement {
            config.clamp_to_ground = p.clamp_to_ground.unwrap_or(config.clamp_to_ground);
            config.negative_face = p.negative_face.unwrap_or(config.negative_face);
        }

        Ok(config)
    }

    /// Set the overlap tolerance
    pub fn with_overlap_epsilon(mut self, epsilon: f64) -> Self {
        self.overlap_epsilon = epsilon;
        self
    }

    /// Set the touching tolerance
    pub fn with_touch_tolerance(mut self, tolerance: f64) -> Self {
        self.touch_tolerance = tolerance;
        self
    }

    /// Set the iteration cap
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Set the shrink policy
    pub fn with_shrink_policy(mut self, policy: ShrinkPolicy) -> Self {
        self.shrink_policy = policy;
        self
    }

    /// Enable or disable clamping to ground
    pub fn with_clamp_to_ground(mut self, clamp: bool) -> Self {
        self.clamp_to_ground = clamp;
        self
    }

    /// Set the negative-face placement rule
    pub fn with_negative_face(mut self, rule: NegativeFace) -> Self {
        self.negative_face = rule;
        self
    }
}
