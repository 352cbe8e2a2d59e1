//! jscrunch configuration
//!
//! Loads cruncher and layout settings from a `key = value` options file.

use jscrunch_core::{CrunchError, LayoutOptions, Locale, Result, ScriptVersion};
use std::fs;
use std::path::Path;

/// File looked up in the working directory by [`CrunchConfig::load_default`]
pub const DEFAULT_CONFIG_FILE: &str = "jscrunch.cfg";

/// Settings for a cruncher session and the formatter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrunchConfig {
    /// Dialect (from "version", e.g. `1.5`; `0` selects the default)
    pub version: ScriptVersion,
    /// Language of diagnostics (from "locale")
    pub locale: Locale,
    /// Deliver warnings (from "warnings")
    pub warnings: bool,
    /// Parse before removing comments (from "check_syntax")
    pub check_syntax: bool,
    /// From "offset", "indent", "label_setback", "use_tabs" and
    /// "blank_line_before_label"
    pub layout: LayoutOptions,
}

impl Default for CrunchConfig {
    fn default() -> Self {
        Self {
            version: ScriptVersion::Default,
            locale: Locale::English,
            warnings: false,
            check_syntax: true,
            layout: LayoutOptions::default(),
        }
    }
}

impl CrunchConfig {
    /// Load configuration from an options file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|e| CrunchError::io(path, e))?;
        Self::parse(&content)
    }

    /// Load `jscrunch.cfg` from the working directory, or defaults when
    /// there is none
    pub fn load_default() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::load_from_file(path)
        } else {
            tracing::debug!("No {} found, using defaults", DEFAULT_CONFIG_FILE);
            Ok(Self::default())
        }
    }

    /// Parse options file content
    pub fn parse(content: &str) -> Result<Self> {
        let mut config = Self::default();

        for (number, line) in content.lines().enumerate() {
            let line = line.trim();

            // Skip comments and empty lines
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                return Err(CrunchError::Config(format!(
                    "line {}: expected key = value",
                    number + 1
                )));
            };
            config
                .parse_option(key.trim(), value.trim())
                .map_err(|msg| CrunchError::Config(format!("line {}: {}", number + 1, msg)))?;
        }

        Ok(config)
    }

    fn parse_option(&mut self, key: &str, value: &str) -> std::result::Result<(), String> {
        match key {
            "version" => {
                let number: f64 = value
                    .parse()
                    .map_err(|_| format!("invalid version {value:?}"))?;
                self.version = ScriptVersion::from_f64(number).map_err(|e| e.to_string())?;
            }
            "locale" => {
                self.locale =
                    Locale::from_tag(value).ok_or_else(|| format!("unknown locale {value:?}"))?;
            }
            "warnings" => self.warnings = parse_bool(key, value)?,
            "check_syntax" => self.check_syntax = parse_bool(key, value)?,
            "offset" => self.layout.offset = parse_width(key, value)?,
            "indent" => self.layout.indent = parse_width(key, value)?,
            "label_setback" => self.layout.label_setback = parse_width(key, value)?,
            "use_tabs" => self.layout.use_tabs = parse_bool(key, value)?,
            "blank_line_before_label" => self.layout.blank_line_before_label = parse_bool(key, value)?,
            _ => {
                tracing::debug!("Unknown config option: {} = {}", key, value);
            }
        }
        Ok(())
    }

    /// Log the effective settings
    pub fn display(&self) {
        tracing::info!("jscrunch configuration:");
        tracing::info!("  Version: {}", self.version);
        tracing::info!("  Locale: {}", self.locale.as_str());
        tracing::info!("  Warnings: {}", self.warnings);
        tracing::info!("  Check syntax: {}", self.check_syntax);
        tracing::info!(
            "  Layout: offset {}, indent {}, label setback {}, tabs {}, blank line before label {}",
            self.layout.offset,
            self.layout.indent,
            self.layout.label_setback,
            self.layout.use_tabs,
            self.layout.blank_line_before_label
        );
    }
}

fn parse_bool(key: &str, value: &str) -> std::result::Result<bool, String> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(format!("{key} expects a boolean, got {value:?}")),
    }
}

fn parse_width(key: &str, value: &str) -> std::result::Result<u32, String> {
    value
        .parse()
        .map_err(|_| format!("{key} expects a column count, got {value:?}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = CrunchConfig::default();
        assert_eq!(config.version, ScriptVersion::Default);
        assert_eq!(config.layout.indent, 4);
        assert_eq!(config.layout.label_setback, 2);
        assert!(config.check_syntax);
        assert!(!config.warnings);
    }

    #[test]
    fn test_parse_simple_config() {
        let config_text = r#"
# formatter settings
version = 1.3
locale = fr
warnings = yes
indent = 2
use_tabs = true
something_else = ignored
"#;
        let config = CrunchConfig::parse(config_text).unwrap();
        assert_eq!(config.version, ScriptVersion::V1_3);
        assert_eq!(config.locale, Locale::French);
        assert!(config.warnings);
        assert_eq!(config.layout.indent, 2);
        assert!(config.layout.use_tabs);
        assert_eq!(config.layout.offset, 0);
    }

    #[test]
    fn test_invalid_values() {
        let err = CrunchConfig::parse("version = 9.9").unwrap_err();
        assert!(matches!(err, CrunchError::Config(_)));
        assert!(err.to_string().contains("line 1"));

        assert!(CrunchConfig::parse("\nindent = wide").is_err());
        assert!(CrunchConfig::parse("warnings").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "label_setback = 0").unwrap();
        writeln!(file, "blank_line_before_label = on").unwrap();
        let config = CrunchConfig::load_from_file(file.path()).unwrap();
        assert_eq!(config.layout.label_setback, 0);
        assert!(config.layout.blank_line_before_label);

        let missing = CrunchConfig::load_from_file("/does/not/exist.cfg").unwrap_err();
        assert!(matches!(missing, CrunchError::Io { .. }));
    }
}
