//! SyntaxKind enum - every token and node kind produced by the front end.

use serde::Serialize;

/// The kind of a token or syntax node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[repr(u16)]
pub enum SyntaxKind {
    // ========================================================================
    // Tokens
    // ========================================================================
    Unknown = 0,
    EndOfFileToken,

    // Literals
    NumericLiteral,
    StringLiteral,

    // Punctuation
    OpenBraceToken,
    CloseBraceToken,
    OpenParenToken,
    CloseParenToken,
    OpenBracketToken,
    CloseBracketToken,
    DotToken,
    DotDotDotToken,
    SemicolonToken,
    CommaToken,
    QuestionDotToken,
    ColonToken,
    EqualsGreaterThanToken,

    // Operators
    LessThanToken,
    GreaterThanToken,
    LessThanEqualsToken,
    GreaterThanEqualsToken,
    EqualsEqualsToken,
    ExclamationEqualsToken,
    EqualsEqualsEqualsToken,
    ExclamationEqualsEqualsToken,
    PlusToken,
    MinusToken,
    AsteriskToken,
    SlashToken,
    PercentToken,
    AmpersandToken,
    BarToken,
    CaretToken,
    ExclamationToken,
    TildeToken,
    AmpersandAmpersandToken,
    BarBarToken,
    QuestionToken,
    QuestionQuestionToken,
    EqualsToken,
    PlusEqualsToken,
    MinusEqualsToken,
    AsteriskEqualsToken,
    SlashEqualsToken,

    // Identifiers
    Identifier,

    // Reserved words
    ConstKeyword,
    ExportKeyword,
    FunctionKeyword,
    ImportKeyword,
    InterfaceKeyword,
    NewKeyword,
    ReturnKeyword,
    TypeKeyword,

    // ========================================================================
    // Nodes
    // ========================================================================
    Program,

    // Statements and declarations
    ImportDeclaration,
    ImportSpecifier,
    ExportDeclaration,
    ExportSpecifier,
    InterfaceDeclaration,
    PropertySignature,
    MethodSignature,
    TypeAliasDeclaration,
    FunctionDeclaration,
    FunctionBody,
    TypeParameter,
    Parameter,
    VariableDeclaration,
    ExpressionStatement,
    ReturnStatement,
    EmptyStatement,

    // Types
    TypeReference,
    KeywordType,
    LiteralType,
    UnionType,
    IntersectionType,
    ArrayType,
    ParenthesizedType,
    TypeLiteral,
    TupleType,
    FunctionType,

    // Expressions
    TrueLiteral,
    FalseLiteral,
    NullLiteral,
    CallExpression,
    NewExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    ConditionalExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    InstantiationExpression,
    ObjectLiteralExpression,
    PropertyAssignment,
    ShorthandPropertyAssignment,
    ArrayLiteralExpression,
    ParenthesizedExpression,
    ArrowFunction,
}

/// Coarse classification of a lexed token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenClass {
    Identifier,
    Keyword,
    NumericLiteral,
    StringLiteral,
    Punctuation,
    Operator,
    EndOfInput,
}

impl SyntaxKind {
    pub const FIRST_PUNCTUATION: SyntaxKind = SyntaxKind::OpenBraceToken;
    pub const LAST_PUNCTUATION: SyntaxKind = SyntaxKind::EqualsGreaterThanToken;
    pub const FIRST_OPERATOR: SyntaxKind = SyntaxKind::LessThanToken;
    pub const LAST_OPERATOR: SyntaxKind = SyntaxKind::SlashEqualsToken;
    pub const FIRST_KEYWORD: SyntaxKind = SyntaxKind::ConstKeyword;
    pub const LAST_KEYWORD: SyntaxKind = SyntaxKind::TypeKeyword;

    #[inline]
    fn in_range(self, first: SyntaxKind, last: SyntaxKind) -> bool {
        let v = self as u16;
        v >= first as u16 && v <= last as u16
    }

    #[inline]
    pub fn is_keyword(self) -> bool {
        self.in_range(Self::FIRST_KEYWORD, Self::LAST_KEYWORD)
    }

    #[inline]
    pub fn is_punctuation(self) -> bool {
        self.in_range(Self::FIRST_PUNCTUATION, Self::LAST_PUNCTUATION)
    }

    #[inline]
    pub fn is_operator(self) -> bool {
        self.in_range(Self::FIRST_OPERATOR, Self::LAST_OPERATOR)
    }

    /// Whether a token of this kind can be used where a property or member
    /// name is expected (`a.type`, `{ new: 1 }`).
    #[inline]
    pub fn is_identifier_or_keyword(self) -> bool {
        self == SyntaxKind::Identifier || self.is_keyword()
    }

    #[inline]
    pub fn is_assignment_operator(self) -> bool {
        self.in_range(SyntaxKind::EqualsToken, SyntaxKind::SlashEqualsToken)
    }

    /// The token class for a lexed kind, or None for node kinds.
    pub fn token_class(self) -> Option<TokenClass> {
        match self {
            SyntaxKind::EndOfFileToken => Some(TokenClass::EndOfInput),
            SyntaxKind::Identifier => Some(TokenClass::Identifier),
            SyntaxKind::NumericLiteral => Some(TokenClass::NumericLiteral),
            SyntaxKind::StringLiteral => Some(TokenClass::StringLiteral),
            k if k.is_keyword() => Some(TokenClass::Keyword),
            k if k.is_punctuation() => Some(TokenClass::Punctuation),
            k if k.is_operator() => Some(TokenClass::Operator),
            _ => None,
        }
    }

    pub fn keyword_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::ConstKeyword => Some("const"),
            SyntaxKind::ExportKeyword => Some("export"),
            SyntaxKind::FunctionKeyword => Some("function"),
            SyntaxKind::ImportKeyword => Some("import"),
            SyntaxKind::InterfaceKeyword => Some("interface"),
            SyntaxKind::NewKeyword => Some("new"),
            SyntaxKind::ReturnKeyword => Some("return"),
            SyntaxKind::TypeKeyword => Some("type"),
            _ => None,
        }
    }

    /// Look up a reserved word. This ignores any configured keyword set;
    /// see `KeywordSet::lookup`.
    pub fn from_keyword(text: &str) -> Option<SyntaxKind> {
        match text {
            "const" => Some(SyntaxKind::ConstKeyword),
            "export" => Some(SyntaxKind::ExportKeyword),
            "function" => Some(SyntaxKind::FunctionKeyword),
            "import" => Some(SyntaxKind::ImportKeyword),
            "interface" => Some(SyntaxKind::InterfaceKeyword),
            "new" => Some(SyntaxKind::NewKeyword),
            "return" => Some(SyntaxKind::ReturnKeyword),
            "type" => Some(SyntaxKind::TypeKeyword),
            _ => None,
        }
    }

    pub fn punctuation_text(self) -> Option<&'static str> {
        match self {
            SyntaxKind::OpenBraceToken => Some("{"),
            SyntaxKind::CloseBraceToken => Some("}"),
            SyntaxKind::OpenParenToken => Some("("),
            SyntaxKind::CloseParenToken => Some(")"),
            SyntaxKind::OpenBracketToken => Some("["),
            SyntaxKind::CloseBracketToken => Some("]"),
            SyntaxKind::DotToken => Some("."),
            SyntaxKind::DotDotDotToken => Some("..."),
            SyntaxKind::SemicolonToken => Some(";"),
            SyntaxKind::CommaToken => Some(","),
            SyntaxKind::QuestionDotToken => Some("?."),
            SyntaxKind::ColonToken => Some(":"),
            SyntaxKind::EqualsGreaterThanToken => Some("=>"),
            SyntaxKind::LessThanToken => Some("<"),
            SyntaxKind::GreaterThanToken => Some(">"),
            SyntaxKind::LessThanEqualsToken => Some("<="),
            SyntaxKind::GreaterThanEqualsToken => Some(">="),
            SyntaxKind::EqualsEqualsToken => Some("=="),
            SyntaxKind::ExclamationEqualsToken => Some("!="),
            SyntaxKind::EqualsEqualsEqualsToken => Some("==="),
            SyntaxKind::ExclamationEqualsEqualsToken => Some("!=="),
            SyntaxKind::PlusToken => Some("+"),
            SyntaxKind::MinusToken => Some("-"),
            SyntaxKind::AsteriskToken => Some("*"),
            SyntaxKind::SlashToken => Some("/"),
            SyntaxKind::PercentToken => Some("%"),
            SyntaxKind::AmpersandToken => Some("&"),
            SyntaxKind::BarToken => Some("|"),
            SyntaxKind::CaretToken => Some("^"),
            SyntaxKind::ExclamationToken => Some("!"),
            SyntaxKind::TildeToken => Some("~"),
            SyntaxKind::AmpersandAmpersandToken => Some("&&"),
            SyntaxKind::BarBarToken => Some("||"),
            SyntaxKind::QuestionToken => Some("?"),
            SyntaxKind::QuestionQuestionToken => Some("??"),
            SyntaxKind::EqualsToken => Some("="),
            SyntaxKind::PlusEqualsToken => Some("+="),
            SyntaxKind::MinusEqualsToken => Some("-="),
            SyntaxKind::AsteriskEqualsToken => Some("*="),
            SyntaxKind::SlashEqualsToken => Some("/="),
            _ => None,
        }
    }
}

impl std::fmt::Display for SyntaxKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if let Some(text) = self.keyword_text().or_else(|| self.punctuation_text()) {
            return write!(f, "{}", text);
        }
        match self {
            SyntaxKind::EndOfFileToken => write!(f, "end of input"),
            SyntaxKind::Identifier => write!(f, "identifier"),
            SyntaxKind::NumericLiteral => write!(f, "numeric literal"),
            SyntaxKind::StringLiteral => write!(f, "string literal"),
            other => write!(f, "{:?}", other),
        }
    }
}
