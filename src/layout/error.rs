//! Error types for the layout engine

use thiserror::Error;

/// Errors that can occur while editing a layout
#[derive(Debug, Error)]
pub enum LayoutError {
    /// Reference to a block id that is not in the store
    #[error("unknown block '{id}'")]
    UnknownBlock { id: String, suggestions: Vec<String> },

    /// Width, height and depth must all be positive
    #[error("invalid dimensions {width}x{height}x{depth}: all extents must be positive")]
    InvalidDimensions { width: f64, height: f64, depth: f64 },

    /// A face normal with no usable component
    #[error("invalid face normal ({x}, {y}, {z})")]
    InvalidFaceNormal { x: f64, y: f64, z: f64 },

    /// Explicit block declaration reusing an existing id
    #[error("block '{id}' is already defined")]
    DuplicateBlock { id: String },

    /// A modifier whose value does not fit its key
    #[error("invalid value '{value}' for '{key}' (expected {expected})")]
    InvalidModifier {
        key: String,
        value: String,
        expected: String,
    },
}

impl LayoutError {
    /// Create an unknown block error with suggestions
    pub fn unknown_block(id: impl Into<String>, suggestions: Vec<String>) -> Self {
        Self::UnknownBlock {
            id: id.into(),
            suggestions,
        }
    }

    /// Create a duplicate block error
    pub fn duplicate(id: impl Into<String>) -> Self {
        Self::DuplicateBlock { id: id.into() }
    }

    /// Create an invalid modifier error
    pub fn invalid_modifier(
        key: impl Into<String>,
        value: impl Into<String>,
        expected: impl Into<String>,
    ) -> Self {
        Self::InvalidModifier {
            key: key.into(),
            value: value.into(),
            expected: expected.into(),
        }
    }

    /// Get suggestions if available
    pub fn suggestions(&self) -> Option<&[String]> {
        match self {
            Self::UnknownBlock { suggestions, .. } => Some(suggestions),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_block_display() {
        let err = LayoutError::unknown_block("lobyy", vec!["lobby".to_string()]);
        assert!(err.to_string().contains("lobyy"));
        assert_eq!(err.suggestions(), Some(&["lobby".to_string()][..]));
    }

    #[test]
    fn test_invalid_dimensions_display() {
        let err = LayoutError::InvalidDimensions {
            width: 0.0,
            height: 1.0,
            depth: 1.0,
        };
        assert!(err.to_string().contains("0x1x1"));
    }
}
