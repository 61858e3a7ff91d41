//! Flag types shared by the lexer and the parser.

use crate::syntax_kind::SyntaxKind;

bitflags::bitflags! {
    /// Per-token facts recorded by the lexer.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TokenFlags: u8 {
        const NONE                  = 0;
        /// A line break appeared between the previous token and this one.
        const PRECEDING_LINE_BREAK  = 1 << 0;
        /// A string literal contained at least one backslash escape.
        const CONTAINS_ESCAPE       = 1 << 1;
    }
}

bitflags::bitflags! {
    /// The set of reserved words the lexer turns into keyword tokens.
    /// Words outside the set lex as plain identifiers.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct KeywordSet: u16 {
        const CONST     = 1 << 0;
        const EXPORT    = 1 << 1;
        const FUNCTION  = 1 << 2;
        const IMPORT    = 1 << 3;
        const INTERFACE = 1 << 4;
        const NEW       = 1 << 5;
        const RETURN    = 1 << 6;
        const TYPE      = 1 << 7;
    }
}

impl KeywordSet {
    /// The flag for a keyword kind.
    pub fn from_kind(kind: SyntaxKind) -> Option<KeywordSet> {
        let flag = match kind {
            SyntaxKind::ConstKeyword => KeywordSet::CONST,
            SyntaxKind::ExportKeyword => KeywordSet::EXPORT,
            SyntaxKind::FunctionKeyword => KeywordSet::FUNCTION,
            SyntaxKind::ImportKeyword => KeywordSet::IMPORT,
            SyntaxKind::InterfaceKeyword => KeywordSet::INTERFACE,
            SyntaxKind::NewKeyword => KeywordSet::NEW,
            SyntaxKind::ReturnKeyword => KeywordSet::RETURN,
            SyntaxKind::TypeKeyword => KeywordSet::TYPE,
            _ => return None,
        };
        Some(flag)
    }

    /// The flag for a reserved word's text.
    pub fn from_keyword(name: &str) -> Option<KeywordSet> {
        SyntaxKind::from_keyword(name).and_then(KeywordSet::from_kind)
    }

    /// The keyword kind for `text`, if it is a reserved word in this set.
    #[inline]
    pub fn lookup(self, text: &str) -> Option<SyntaxKind> {
        let kind = SyntaxKind::from_keyword(text)?;
        let flag = KeywordSet::from_kind(kind)?;
        self.contains(flag).then_some(kind)
    }
}

impl Default for KeywordSet {
    fn default() -> Self {
        KeywordSet::all()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_set_lookup() {
        let set = KeywordSet::default();
        assert_eq!(set.lookup("interface"), Some(SyntaxKind::InterfaceKeyword));
        assert_eq!(set.lookup("let"), None);

        let without_type = set - KeywordSet::TYPE;
        assert_eq!(without_type.lookup("type"), None);
        assert_eq!(without_type.lookup("const"), Some(SyntaxKind::ConstKeyword));
    }

    #[test]
    fn test_keyword_set_from_keyword() {
        assert_eq!(KeywordSet::from_keyword("new"), Some(KeywordSet::NEW));
        assert_eq!(KeywordSet::from_keyword("class"), None);
        assert_eq!(KeywordSet::from_keyword("NEW"), None);
    }
}
