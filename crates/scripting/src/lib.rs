//! # jscrunch scripting
//!
//! JavaScript parsing and source regeneration.
//!
//! ## Features
//! - Dialect-aware lexer and recursive descent parser (JavaScript 1.0 - 1.5)
//! - Arena-backed syntax tree with per-node property bags
//! - Compact ("crunched") and formatted output
//! - Comment removal with or without a grammar check
//!
//! ## Entry points
//!
//! ### Facade
//! - Stateless functions over strings and files
//! - Default dialect and layout unless given
//!
//! ### Cruncher
//! - Caller-owned session with dialect, locale and warnings
//! - Warning listeners

pub mod cruncher;
pub mod facade;
pub mod js;

pub use cruncher::{Cruncher, CruncherOptions, WarningListener, DEFAULT_SOURCE_NAME};
pub use facade::*;
pub use js::{DecompileOptions, FunctionTree, ScriptTree};
