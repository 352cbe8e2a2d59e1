//! Core type definitions

use crate::error::{CrunchError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// JavaScript language level used for a parse.
///
/// `Default` behaves like the newest supported dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ScriptVersion {
    #[default]
    Default = 0,
    V1_0 = 100,
    V1_1 = 110,
    V1_2 = 120,
    V1_3 = 130,
    V1_4 = 140,
    V1_5 = 150,
}

impl ScriptVersion {
    pub const ALL: [ScriptVersion; 7] = [
        Self::Default,
        Self::V1_0,
        Self::V1_1,
        Self::V1_2,
        Self::V1_3,
        Self::V1_4,
        Self::V1_5,
    ];

    pub fn from_code(value: u32) -> Option<Self> {
        match value {
            0 => Some(Self::Default),
            100 => Some(Self::V1_0),
            110 => Some(Self::V1_1),
            120 => Some(Self::V1_2),
            130 => Some(Self::V1_3),
            140 => Some(Self::V1_4),
            150 => Some(Self::V1_5),
            _ => None,
        }
    }

    /// Resolve a numeric dialect such as `1.3`. `0.0` selects `Default`.
    pub fn from_f64(value: f64) -> Result<Self> {
        if !value.is_finite() || value < 0.0 {
            return Err(CrunchError::UnsupportedVersion(value.to_string()));
        }
        let code = (value * 100.0).round();
        if (code / 100.0 - value).abs() > 1e-9 || code > u32::MAX as f64 {
            return Err(CrunchError::UnsupportedVersion(value.to_string()));
        }
        Self::from_code(code as u32).ok_or_else(|| CrunchError::UnsupportedVersion(value.to_string()))
    }

    pub fn code(self) -> u32 {
        self as u32
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Default => "default",
            Self::V1_0 => "1.0",
            Self::V1_1 => "1.1",
            Self::V1_2 => "1.2",
            Self::V1_3 => "1.3",
            Self::V1_4 => "1.4",
            Self::V1_5 => "1.5",
        }
    }

    /// True when this dialect is `other` or newer. `Default` is the newest.
    pub fn at_least(self, other: ScriptVersion) -> bool {
        self == Self::Default || (other != Self::Default && self.code() >= other.code())
    }

    pub fn has_regexp_literals(self) -> bool {
        self.at_least(Self::V1_2)
    }

    pub fn has_switch(self) -> bool {
        self.at_least(Self::V1_2)
    }

    pub fn has_strict_equality(self) -> bool {
        self.at_least(Self::V1_3)
    }

    pub fn has_exceptions(self) -> bool {
        self.at_least(Self::V1_4)
    }

    pub fn has_catch_guards(self) -> bool {
        self.at_least(Self::V1_5)
    }
}

impl fmt::Display for ScriptVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ScriptVersion {
    type Err = CrunchError;

    fn from_str(s: &str) -> Result<Self> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("default") {
            return Ok(Self::Default);
        }
        let value: f64 = s
            .parse()
            .map_err(|_| CrunchError::UnsupportedVersion(s.to_string()))?;
        Self::from_f64(value)
    }
}

/// Language of diagnostic messages
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    English,
    French,
}

impl Locale {
    /// Accepts tags like `en`, `en-US`, `fr_FR`.
    pub fn from_tag(tag: &str) -> Option<Self> {
        let lang = tag
            .split(|c| c == '-' || c == '_')
            .next()
            .unwrap_or("")
            .to_ascii_lowercase();
        match lang.as_str() {
            "en" | "english" => Some(Self::English),
            "fr" | "french" => Some(Self::French),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::English => "en",
            Self::French => "fr",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_from_float() {
        assert_eq!(ScriptVersion::from_f64(1.3).unwrap(), ScriptVersion::V1_3);
        assert_eq!(ScriptVersion::from_f64(1.0).unwrap(), ScriptVersion::V1_0);
        assert_eq!(ScriptVersion::from_f64(0.0).unwrap(), ScriptVersion::Default);
    }

    #[test]
    fn test_unsupported_version() {
        let err = ScriptVersion::from_f64(9.9).unwrap_err();
        assert!(matches!(err, CrunchError::UnsupportedVersion(_)));
        assert!(!err.is_syntax());
        assert!(ScriptVersion::from_f64(1.25).is_err());
        assert!(ScriptVersion::from_f64(f64::NAN).is_err());
    }

    #[test]
    fn test_version_ordering() {
        assert!(ScriptVersion::Default.at_least(ScriptVersion::V1_5));
        assert!(ScriptVersion::V1_3.has_strict_equality());
        assert!(!ScriptVersion::V1_2.has_strict_equality());
        assert!(!ScriptVersion::V1_1.has_regexp_literals());
        assert!(!ScriptVersion::V1_5.at_least(ScriptVersion::Default));
    }

    #[test]
    fn test_version_parse() {
        assert_eq!("1.5".parse::<ScriptVersion>().unwrap(), ScriptVersion::V1_5);
        assert_eq!("default".parse::<ScriptVersion>().unwrap(), ScriptVersion::Default);
        assert!("abc".parse::<ScriptVersion>().is_err());
    }

    #[test]
    fn test_locale_tags() {
        assert_eq!(Locale::from_tag("fr-FR"), Some(Locale::French));
        assert_eq!(Locale::from_tag("en_US"), Some(Locale::English));
        assert_eq!(Locale::from_tag("de"), None);
    }
}
