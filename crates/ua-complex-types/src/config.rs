// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Wire constants and codec limits.
//!
//! - **Static**: field names and bounds fixed by the structure encoding rules.
//! - **Dynamic**: [`CodecLimits`], held by the registry behind an `ArcSwap`
//!   and replaceable at runtime (optionally loaded from YAML or JSON).

#[cfg(feature = "schema-loaders")]
use crate::error::{Error, Result};
#[cfg(feature = "schema-loaders")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "schema-loaders")]
use std::path::Path;

/// Field name under which the optional-field mask is written.
pub const OPTIONAL_FIELD_MASK_NAME: &str = "OptionalField";

/// Field name under which the union switch is written.
pub const SWITCH_FIELD_NAME: &str = "SwitchField";

/// Optional fields per structure (bits in the mask).
pub const MAX_OPTIONAL_FIELDS: usize = 32;

/// Default bound on decoded string length in bytes.
pub const DEFAULT_MAX_STRING_LENGTH: usize = 1 << 20;

/// Default bound on decoded byte-string length.
pub const DEFAULT_MAX_BYTE_STRING_LENGTH: usize = 16 << 20;

/// Default bound on decoded array element count.
pub const DEFAULT_MAX_ARRAY_LENGTH: usize = 1 << 20;

/// Default bound on structure / variant / diagnostic nesting.
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 64;

/// Bounds enforced while decoding untrusted input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "schema-loaders",
    derive(Serialize, Deserialize),
    serde(default, deny_unknown_fields)
)]
pub struct CodecLimits {
    pub max_string_length: usize,
    pub max_byte_string_length: usize,
    pub max_array_length: usize,
    pub max_nesting_depth: usize,
}

impl Default for CodecLimits {
    fn default() -> Self {
        Self {
            max_string_length: DEFAULT_MAX_STRING_LENGTH,
            max_byte_string_length: DEFAULT_MAX_BYTE_STRING_LENGTH,
            max_array_length: DEFAULT_MAX_ARRAY_LENGTH,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

#[cfg(feature = "schema-loaders")]
impl CodecLimits {
    /// Parse limits from YAML. Missing keys keep their defaults.
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).map_err(|e| Error::Config(format!("Invalid limits YAML: {}", e)))
    }

    /// Parse limits from JSON. Missing keys keep their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| Error::Config(format!("Invalid limits JSON: {}", e)))
    }

    /// Load limits from a `.json` file, or YAML for any other extension.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        let limits = if is_json(path) {
            Self::from_json_str(&content)?
        } else {
            Self::from_yaml_str(&content)?
        };
        log::debug!("[config] loaded codec limits from {}", path.display());
        Ok(limits)
    }
}

#[cfg(feature = "schema-loaders")]
pub(crate) fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_limits() {
        let limits = CodecLimits::default();
        assert_eq!(limits.max_nesting_depth, DEFAULT_MAX_NESTING_DEPTH);
        assert!(limits.max_byte_string_length >= limits.max_string_length);
    }

    #[cfg(feature = "schema-loaders")]
    mod loaders {
        use super::super::*;
        use std::io::Write;

        fn write_temp(content: &str, suffix: &str) -> tempfile::NamedTempFile {
            let mut f = tempfile::Builder::new()
                .suffix(suffix)
                .tempfile()
                .expect("create temp file");
            f.write_all(content.as_bytes()).expect("write temp file");
            f.flush().expect("flush temp file");
            f
        }

        #[test]
        fn test_partial_yaml_keeps_defaults() {
            let limits = CodecLimits::from_yaml_str("max_array_length: 10\n").expect("yaml");
            assert_eq!(limits.max_array_length, 10);
            assert_eq!(limits.max_string_length, DEFAULT_MAX_STRING_LENGTH);
        }

        #[test]
        fn test_unknown_key_rejected() {
            let err = CodecLimits::from_json_str(r#"{"max_arrays": 3}"#).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
        }

        #[test]
        fn test_load_from_files() {
            let json = write_temp(r#"{"max_nesting_depth": 8}"#, ".json");
            let limits = CodecLimits::load_from_file(json.path()).expect("json file");
            assert_eq!(limits.max_nesting_depth, 8);

            let yaml = write_temp("max_string_length: 256\n", ".yaml");
            let limits = CodecLimits::load_from_file(yaml.path()).expect("yaml file");
            assert_eq!(limits.max_string_length, 256);

            let missing = CodecLimits::load_from_file(Path::new("/nonexistent/limits.yaml"));
            assert!(matches!(missing, Err(Error::Config(_))));
        }
    }
}
