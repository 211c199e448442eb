//! Codec configuration
//!
//! Limits shared by every codec and tree walk in the workspace. Inputs such as
//! decoded wire bytes are untrusted, so each recursive operation checks its
//! nesting depth against these bounds.

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};

/// Nesting cap for Plutus Data decoding
pub const DEFAULT_MAX_DATA_DEPTH: usize = 256;

/// Nesting cap for term decoding, interning and binder conversion
pub const DEFAULT_MAX_TERM_DEPTH: usize = 4096;

/// Nesting cap for constant types and the values they describe
pub const DEFAULT_MAX_TYPE_DEPTH: usize = 256;

/// Width of the builtin id field (128 builtin slots)
pub const DEFAULT_BUILTIN_TAG_WIDTH: u32 = 7;

/// Widest builtin id field a [`crate::BuiltinId`] can hold
pub const MAX_BUILTIN_TAG_WIDTH: u32 = u8::BITS;

/// Minimum stack space to reserve before recursive calls (32 KB).
pub(crate) const MIN_STACK_RED_ZONE: usize = 32 * 1024;

/// Stack size to grow to when running low (1 MB).
pub(crate) const STACK_GROWTH_SIZE: usize = 1024 * 1024;

/// Limits applied by the codecs and tree transformations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Maximum nesting of Plutus Data values (CBOR and JSON)
    pub max_data_depth: usize,
    /// Maximum nesting of terms
    pub max_term_depth: usize,
    /// Maximum nesting of constant types (`list`, `pair`) and their values
    pub max_type_depth: usize,
    /// Bits used for the builtin id in the FLAT encoding
    pub builtin_tag_width: u32,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_data_depth: DEFAULT_MAX_DATA_DEPTH,
            max_term_depth: DEFAULT_MAX_TERM_DEPTH,
            max_type_depth: DEFAULT_MAX_TYPE_DEPTH,
            builtin_tag_width: DEFAULT_BUILTIN_TAG_WIDTH,
        }
    }
}

impl CodecConfig {
    /// Override the Plutus Data nesting cap
    #[must_use]
    pub fn with_max_data_depth(mut self, depth: usize) -> Self {
        self.max_data_depth = depth;
        self
    }

    /// Override the term nesting cap
    #[must_use]
    pub fn with_max_term_depth(mut self, depth: usize) -> Self {
        self.max_term_depth = depth;
        self
    }

    /// Override the constant type nesting cap
    #[must_use]
    pub fn with_max_type_depth(mut self, depth: usize) -> Self {
        self.max_type_depth = depth;
        self
    }

    /// Override the builtin id width
    ///
    /// Widths outside `1..=8` are rejected by [`CodecConfig::validate`], which
    /// the codecs run before touching any input.
    #[must_use]
    pub fn with_builtin_tag_width(mut self, width: u32) -> Self {
        self.builtin_tag_width = width;
        self
    }

    /// Check values that cannot be expressed in the term model
    pub fn validate(&self) -> CoreResult<()> {
        if self.builtin_tag_width == 0 || self.builtin_tag_width > MAX_BUILTIN_TAG_WIDTH {
            return Err(CoreError::InvalidConfig(format!(
                "builtin_tag_width {} outside 1..={MAX_BUILTIN_TAG_WIDTH}",
                self.builtin_tag_width
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = CodecConfig::default();
        assert_eq!(config.max_data_depth, 256);
        assert_eq!(config.max_term_depth, 4096);
        assert_eq!(config.max_type_depth, 256);
        assert_eq!(config.builtin_tag_width, 7);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: CodecConfig = serde_json::from_str(r#"{"max_term_depth": 64}"#).unwrap();
        assert_eq!(config.max_term_depth, 64);
        assert_eq!(config.max_data_depth, DEFAULT_MAX_DATA_DEPTH);
        assert_eq!(config.builtin_tag_width, DEFAULT_BUILTIN_TAG_WIDTH);
    }

    #[test]
    fn test_builders() {
        let config = CodecConfig::default()
            .with_max_data_depth(8)
            .with_max_term_depth(16)
            .with_max_type_depth(4)
            .with_builtin_tag_width(8);
        assert_eq!(config.max_data_depth, 8);
        assert_eq!(config.max_term_depth, 16);
        assert_eq!(config.max_type_depth, 4);
        assert_eq!(config.builtin_tag_width, 8);
    }

    #[test]
    fn test_builtin_width_must_fit_a_byte() {
        assert!(CodecConfig::default().with_builtin_tag_width(8).validate().is_ok());
        for width in [0, 9, 32] {
            let err = CodecConfig::default()
                .with_builtin_tag_width(width)
                .validate()
                .unwrap_err();
            assert!(matches!(err, CoreError::InvalidConfig(_)), "width {width}");
        }
    }
}
