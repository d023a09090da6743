//! Output configuration for the `rsswriter` binary.
//!
//! Optional TOML file with serialization settings. A missing or blank file
//! means defaults; keys other than the three known ones are logged and skipped.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

use crate::xml::WriteOptions;

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// Top-level configuration.
///
/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Spaces per nesting level in the written XML. 0 = single line.
    pub indent: usize,

    /// Whether to start the output with an XML declaration.
    pub xml_declaration: bool,

    /// Re-parse the output and fail if it is not well-formed.
    pub check_output: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            indent: 2,
            xml_declaration: true,
            check_output: true,
        }
    }
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 3] = ["indent", "xml_declaration", "check_output"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
        };

        if content.len() as u64 > Self::MAX_FILE_SIZE {
            return Err(ConfigError::TooLarge(format!(
                "{} is {} bytes, limit is {}",
                path.display(),
                content.len(),
                Self::MAX_FILE_SIZE
            )));
        }

        Self::from_toml(&content)
    }

    /// Parses configuration from TOML text. Blank input yields defaults.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        if content.trim().is_empty() {
            tracing::debug!("Config is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(content)?;
        tracing::info!(
            indent = config.indent,
            check_output = config.check_output,
            "Loaded configuration"
        );
        Ok(config)
    }

    pub fn write_options(&self) -> WriteOptions {
        WriteOptions {
            indent: self.indent,
            xml_declaration: self.xml_declaration,
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.indent, 2);
        assert!(config.xml_declaration);
        assert!(config.check_output);
        assert_eq!(config.write_options(), WriteOptions::default());
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/rsswriter_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_empty_file_returns_default() {
        let dir = std::env::temp_dir().join("rsswriter_config_test_empty");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, "").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let config = Config::from_toml("indent = 0\n").unwrap();
        assert_eq!(config.indent, 0);
        assert!(config.xml_declaration); // default
        assert!(config.check_output); // default
    }

    #[test]
    fn test_full_config() {
        let dir = std::env::temp_dir().join("rsswriter_config_test_full");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = r#"
indent = 4
xml_declaration = false
check_output = false
"#;
        std::fs::write(&path, content).unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.indent, 4);
        assert!(!config.xml_declaration);
        assert!(!config.check_output);
        assert_eq!(
            config.write_options(),
            WriteOptions {
                indent: 4,
                xml_declaration: false
            }
        );

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let result = Config::from_toml("this is not [valid toml");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let content = r#"
indent = 3
totally_fake_key = "should not fail"
"#;
        let config = Config::from_toml(content).unwrap();
        assert_eq!(config.indent, 3);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        assert!(Config::from_toml("indent = \"wide\"\n").is_err());
    }

    #[test]
    fn test_whitespace_only_returns_default() {
        let config = Config::from_toml("   \n  \n  ").unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_too_large_file_rejected() {
        let dir = std::env::temp_dir().join("rsswriter_config_test_too_large");
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");

        let content = "a".repeat(1_048_577);
        std::fs::write(&path, content).unwrap();

        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
