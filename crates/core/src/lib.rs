//! jscrunch core - shared types for the JavaScript cruncher

mod error;
mod layout;
mod types;
mod warning;

pub use error::*;
pub use layout::*;
pub use types::*;
pub use warning::*;
