//! tsyn_ast: syntax tree definitions.
//!
//! Defines the `SyntaxKind` tags shared by tokens and nodes, the lexer's
//! flag types, the owned node structs, and traversal helpers.

pub mod node;
pub mod syntax_kind;
pub mod types;
pub mod visitor;

pub use node::*;
pub use syntax_kind::{SyntaxKind, TokenClass};
pub use types::*;
