//! Buffered cursor over a `Lexer`.
//!
//! Tokens are pulled from the lexer only when a peek or advance reaches
//! past the end of the buffer, and are never discarded, so a `Mark` is
//! just a buffer index. That makes speculative parsing cheap: take a
//! checkpoint, try a production, and restore on failure.

use tsyn_ast::syntax_kind::SyntaxKind;
use tsyn_ast::types::KeywordSet;

use crate::error::LexError;
use crate::lexer::Lexer;
use crate::token::Token;

/// A saved stream position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Mark(usize);

pub struct TokenStream<'src> {
    lexer: Lexer<'src>,
    buffer: Vec<Token>,
    cursor: usize,
    /// The lexer's error, once reached. Every later request for a token
    /// at or beyond it returns this again.
    error: Option<LexError>,
}

impl<'src> TokenStream<'src> {
    pub fn new(source: &'src str) -> Self {
        Self::from_lexer(Lexer::new(source))
    }

    pub fn with_keywords(source: &'src str, keywords: KeywordSet) -> Self {
        Self::from_lexer(Lexer::with_keywords(source, keywords))
    }

    pub fn from_lexer(lexer: Lexer<'src>) -> Self {
        Self {
            lexer,
            buffer: Vec::new(),
            cursor: 0,
            error: None,
        }
    }

    pub fn source(&self) -> &'src str {
        self.lexer.source()
    }

    /// Lex until `index` is buffered, end of input is reached, or the
    /// lexer fails.
    fn fill(&mut self, index: usize) -> Result<(), LexError> {
        while self.buffer.len() <= index {
            if let Some(ref err) = self.error {
                return Err(err.clone());
            }
            if self.buffer.last().is_some_and(|t| t.kind == SyntaxKind::EndOfFileToken) {
                break;
            }
            match self.lexer.next() {
                Some(Ok(token)) => self.buffer.push(token),
                Some(Err(err)) => {
                    self.error = Some(err.clone());
                    return Err(err);
                }
                None => break,
            }
        }
        Ok(())
    }

    /// The token `offset` places ahead of the cursor. Looking past the end
    /// of input yields the end-of-file token again.
    pub fn peek(&mut self, offset: usize) -> Result<&Token, LexError> {
        let index = self.cursor + offset;
        self.fill(index)?;
        let last = self.buffer.len() - 1;
        Ok(&self.buffer[index.min(last)])
    }

    /// Kind of the token `offset` places ahead.
    pub fn peek_kind(&mut self, offset: usize) -> Result<SyntaxKind, LexError> {
        self.peek(offset).map(|t| t.kind)
    }

    /// Consume and return the current token. The cursor never moves past
    /// the end-of-file token.
    pub fn advance(&mut self) -> Result<Token, LexError> {
        let token = self.peek(0)?.clone();
        if token.kind != SyntaxKind::EndOfFileToken {
            self.cursor += 1;
        }
        Ok(token)
    }

    #[inline]
    pub fn checkpoint(&self) -> Mark {
        Mark(self.cursor)
    }

    #[inline]
    pub fn restore(&mut self, mark: Mark) {
        self.cursor = mark.0;
    }

    /// Tokens consumed since `mark`.
    #[inline]
    pub fn consumed_since(&self, mark: Mark) -> usize {
        self.cursor - mark.0
    }

    /// How many tokens have been lexed so far.
    #[inline]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }
}
