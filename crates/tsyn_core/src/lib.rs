//! tsyn_core: text positions shared by every stage of the tsyn front end.
//!
//! Byte-offset ranges for tokens and nodes, plus the line/column
//! bookkeeping used when reporting errors.

pub mod text;

pub use text::{LineMap, Position, TextPos, TextRange, TextSpan};
