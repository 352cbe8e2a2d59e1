//! Non-fatal diagnostics

use serde::{Deserialize, Serialize};
use std::fmt;

/// Category of a non-fatal condition found while parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WarningKind {
    MissingSemicolon,
    NoSideEffects,
    AssignmentAsCondition,
    TrailingComma,
    FutureKeyword,
    VarRedeclared,
    ReservedPropertyName,
}

/// A warning delivered to subscribers while warnings are enabled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Warning {
    pub kind: WarningKind,
    pub message: String,
    pub source_name: String,
    pub line: u32,
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: warning: {}", self.source_name, self.line, self.message)
    }
}
