//! Source location types.
//!
//! Offsets are byte offsets into the UTF-8 source. Lines and columns are
//! 1-based; columns count characters, not bytes.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

/// A byte offset from the start of the source.
pub type TextPos = u32;

/// A start offset plus a length, the shape renderers want.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

/// A half-open byte range `[pos, end)` covering a token or a node.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        debug_assert!(end >= pos);
        Self { pos, end }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end - self.pos
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// Whether `other` lies entirely inside this range.
    #[inline]
    pub fn contains_range(&self, other: TextRange) -> bool {
        other.pos >= self.pos && other.end <= self.end
    }

    /// The slice of `source` this range covers, if it is in bounds.
    pub fn slice<'s>(&self, source: &'s str) -> Option<&'s str> {
        source.get(self.to_range())
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        TextSpan {
            start: range.pos,
            length: range.len(),
        }
    }
}

/// A point in the source: byte offset plus 1-based line and column.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Position {
    pub offset: TextPos,
    pub line: u32,
    pub column: u32,
}

impl Position {
    /// The first character of a source.
    pub const START: Position = Position {
        offset: 0,
        line: 1,
        column: 1,
    };

    pub fn new(offset: TextPos, line: u32, column: u32) -> Self {
        Self {
            offset,
            line,
            column,
        }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::START
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The first line terminator in `bytes`: its offset and byte width.
/// Terminators are `\n`, `\r`, `\r\n`, U+2028 and U+2029.
pub fn find_line_break(bytes: &[u8]) -> Option<(usize, usize)> {
    let mut from = 0;
    while let Some(off) = memchr::memchr3(b'\n', b'\r', 0xE2, &bytes[from..]) {
        let at = from + off;
        match bytes[at] {
            b'\r' if bytes.get(at + 1) == Some(&b'\n') => return Some((at, 2)),
            b'\n' | b'\r' => return Some((at, 1)),
            // U+2028 and U+2029 are E2 80 A8 and E2 80 A9
            _ if bytes.get(at + 1) == Some(&0x80) && matches!(bytes.get(at + 2), Some(0xA8 | 0xA9)) => {
                return Some((at, 3))
            }
            _ => from = at + 1,
        }
    }
    None
}

/// Maps byte offsets back to line and column, for consumers that only
/// kept a `TextRange`.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        let mut from = 0;
        while let Some((at, width)) = find_line_break(&bytes[from..]) {
            from += at + width;
            line_starts.push(from as u32);
        }
        Self { line_starts }
    }

    /// 0-based line index holding `pos`.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Resolve `pos` to a full `Position`. Columns count characters of
    /// `text`, which must be the same text the map was built from.
    pub fn position_of(&self, text: &str, pos: TextPos) -> Position {
        let line = self.line_of(pos);
        let start = self.line_starts[line as usize] as usize;
        let end = (pos as usize).min(text.len());
        let column = text
            .get(start..end)
            .map_or(end.saturating_sub(start), |s| s.chars().count());
        Position {
            offset: pos,
            line: line + 1,
            column: column as u32 + 1,
        }
    }
}
