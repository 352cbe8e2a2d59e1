//! JavaScript front end and regenerator
//!
//! Lexer, parser and IR builder produce a tree in a node arena; the
//! decompiler writes it back out compact or formatted.

pub mod ast;
pub mod decompiler;
pub mod function_tree;
pub mod ir;
pub mod lexer;
pub mod messages;
pub mod parser;
pub mod props;
pub mod strip;
pub mod token;

pub use ast::{FunctionData, FunctionRole, Node, NodeArena, NodeId, NodeKind};
pub use decompiler::{decompile, DecompileOptions};
pub use function_tree::{FunctionInfo, FunctionTree};
pub use lexer::{Lexer, Token};
pub use parser::{parse, ParseOptions, ParseOutput, ScriptTree};
pub use props::{PropKind, PropValue, PropertyContainer};
pub use strip::strip_comments;
pub use token::TokenType;
