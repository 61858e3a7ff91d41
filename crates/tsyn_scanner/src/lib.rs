//! tsyn_scanner: lexer and token stream.
//!
//! - `tokenize` / `Lexer`: a lazy, fused iterator of `Result<Token, LexError>`
//! - `TokenStream`: buffered lookahead with O(1) checkpoints for the parser

mod char_codes;
mod error;
mod lexer;
mod stream;
mod token;

pub use char_codes::{is_identifier_part, is_identifier_start};
pub use error::{LexError, LexErrorKind};
pub use lexer::{tokenize, Lexer};
pub use stream::{Mark, TokenStream};
pub use token::{unescape, Token};
