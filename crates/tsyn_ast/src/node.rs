//! Syntax tree node definitions.
//!
//! The tree is owned: every node holds its children by value (`Box`/`Vec`),
//! so a parsed `Program` can be cloned, compared, serialized, or sent across
//! threads without reference to the source it came from.
//!
//! Enums that only wrap nodes serialize untagged: each node already
//! carries its `kind`.

use serde::Serialize;
use tsyn_core::text::TextRange;

use crate::syntax_kind::SyntaxKind;

// ============================================================================
// Core Node Wrapper
// ============================================================================

/// Common data shared by all nodes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeData {
    pub kind: SyntaxKind,
    pub range: TextRange,
}

impl NodeData {
    pub fn new(kind: SyntaxKind, pos: u32, end: u32) -> Self {
        Self {
            kind,
            range: TextRange::new(pos, end),
        }
    }
}

/// Access to the kind and source range of any node.
pub trait AstNode {
    fn data(&self) -> &NodeData;

    #[inline]
    fn kind(&self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    fn range(&self) -> TextRange {
        self.data().range
    }
}

macro_rules! impl_ast_node {
    ($($ty:ident),* $(,)?) => {
        $(
            impl AstNode for $ty {
                #[inline]
                fn data(&self) -> &NodeData {
                    &self.data
                }
            }
        )*
    };
}

macro_rules! impl_ast_node_enum {
    ($ty:ident { $($variant:ident),* $(,)? }) => {
        impl AstNode for $ty {
            fn data(&self) -> &NodeData {
                match self {
                    $($ty::$variant(n) => n.data(),)*
                }
            }
        }
    };
}

// ============================================================================
// Program
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Program {
    #[serde(flatten)]
    pub data: NodeData,
    pub statements: Vec<Statement>,
}

// ============================================================================
// Names and literals
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    #[serde(flatten)]
    pub data: NodeData,
    /// For a qualified type name (`A.B`) this is the dotted text.
    pub text: String,
}

/// The value of a literal. Numbers keep their source text so that trees
/// stay comparable with `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum LiteralValue {
    String(String),
    Number(String),
    Boolean(bool),
    Null,
}

/// A literal expression or literal type. The node kind is `StringLiteral`,
/// `NumericLiteral`, `TrueLiteral`, `FalseLiteral` or `NullLiteral`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Literal {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: LiteralValue,
}

/// A module specifier such as `"./b"`, already unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StringLiteral {
    #[serde(flatten)]
    pub data: NodeData,
    pub value: String,
}

// ============================================================================
// Statements
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Statement {
    Import(ImportDeclaration),
    Export(ExportDeclaration),
    Interface(InterfaceDeclaration),
    TypeAlias(TypeAliasDeclaration),
    Function(FunctionDeclaration),
    Variable(VariableDeclaration),
    Expression(ExpressionStatement),
    Return(ReturnStatement),
    Empty(EmptyStatement),
}

/// `import a, { b as c } from "x"`, `import * as ns from "x"`, `import "x"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportDeclaration {
    #[serde(flatten)]
    pub data: NodeData,
    pub default_binding: Option<Identifier>,
    pub namespace_binding: Option<Identifier>,
    pub named_bindings: Vec<ImportSpecifier>,
    pub source: StringLiteral,
}

/// `name` or `property_name as name`, inside import or export braces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImportSpecifier {
    #[serde(flatten)]
    pub data: NodeData,
    pub property_name: Option<Identifier>,
    pub name: Identifier,
}

pub type ExportSpecifier = ImportSpecifier;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportDeclaration {
    #[serde(flatten)]
    pub data: NodeData,
    pub clause: ExportClause,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ExportClause {
    /// `export <declaration>`
    Declaration(Box<Statement>),
    /// `export { a, b as c } [from "x"]`
    Named {
        specifiers: Vec<ExportSpecifier>,
        source: Option<StringLiteral>,
    },
    /// `export default <expression>`
    Default(Expression),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InterfaceDeclaration {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub extends: Vec<TypeExpr>,
    pub members: Vec<TypeMember>,
}

/// A member of an interface body or an object type literal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypeMember {
    Property(PropertySignature),
    Method(MethodSignature),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertySignature {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub optional: bool,
    pub type_annotation: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodSignature {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub optional: bool,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeAliasDeclaration {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub type_expr: TypeExpr,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionDeclaration {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
    /// None for an overload signature ending in `;`.
    pub body: Option<FunctionBody>,
}

/// A `{ ... }` function or arrow body.
///
/// Bodies are not parsed. The parser skips them by counting brace depth,
/// so a body node only records where the braces are and how many tokens
/// lie between them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionBody {
    #[serde(flatten)]
    pub data: NodeData,
    pub token_count: u32,
}

/// `T`, `T extends C`, `T = D`, `T extends C = D`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeParameter {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub constraint: Option<TypeExpr>,
    pub default: Option<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Parameter {
    #[serde(flatten)]
    pub data: NodeData,
    pub rest: bool,
    pub name: Identifier,
    pub optional: bool,
    pub type_annotation: Option<TypeExpr>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum DeclarationKind {
    Const,
    Let,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VariableDeclaration {
    #[serde(flatten)]
    pub data: NodeData,
    pub declaration_kind: DeclarationKind,
    pub name: Identifier,
    pub type_annotation: Option<TypeExpr>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExpressionStatement {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReturnStatement {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmptyStatement {
    #[serde(flatten)]
    pub data: NodeData,
}

// ============================================================================
// Types
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum TypeExpr {
    Named(TypeReference),
    Keyword(KeywordType),
    Literal(LiteralType),
    Union(UnionType),
    Intersection(IntersectionType),
    Array(ArrayType),
    Parenthesized(ParenthesizedType),
    TypeLiteral(TypeLiteral),
    Tuple(TupleType),
    Function(FunctionType),
}

/// `Name` or `Name<Args>`; `Ns.Name` is stored with a dotted name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeReference {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
    pub type_arguments: Option<Vec<TypeExpr>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PrimitiveType {
    Any,
    BigInt,
    Boolean,
    Never,
    Number,
    Object,
    String,
    Symbol,
    Undefined,
    Unknown,
    Void,
}

impl PrimitiveType {
    pub fn from_text(text: &str) -> Option<PrimitiveType> {
        match text {
            "any" => Some(PrimitiveType::Any),
            "bigint" => Some(PrimitiveType::BigInt),
            "boolean" => Some(PrimitiveType::Boolean),
            "never" => Some(PrimitiveType::Never),
            "number" => Some(PrimitiveType::Number),
            "object" => Some(PrimitiveType::Object),
            "string" => Some(PrimitiveType::String),
            "symbol" => Some(PrimitiveType::Symbol),
            "undefined" => Some(PrimitiveType::Undefined),
            "unknown" => Some(PrimitiveType::Unknown),
            "void" => Some(PrimitiveType::Void),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            PrimitiveType::Any => "any",
            PrimitiveType::BigInt => "bigint",
            PrimitiveType::Boolean => "boolean",
            PrimitiveType::Never => "never",
            PrimitiveType::Number => "number",
            PrimitiveType::Object => "object",
            PrimitiveType::String => "string",
            PrimitiveType::Symbol => "symbol",
            PrimitiveType::Undefined => "undefined",
            PrimitiveType::Unknown => "unknown",
            PrimitiveType::Void => "void",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeywordType {
    #[serde(flatten)]
    pub data: NodeData,
    pub keyword: PrimitiveType,
}

/// `"x"`, `3`, `true`, `null` in type position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LiteralType {
    #[serde(flatten)]
    pub data: NodeData,
    pub literal: Literal,
}

/// At least two members, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UnionType {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: Vec<TypeExpr>,
}

/// At least two members, in source order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntersectionType {
    #[serde(flatten)]
    pub data: NodeData,
    pub types: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayType {
    #[serde(flatten)]
    pub data: NodeData,
    pub element: Box<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParenthesizedType {
    #[serde(flatten)]
    pub data: NodeData,
    pub inner: Box<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TypeLiteral {
    #[serde(flatten)]
    pub data: NodeData,
    pub members: Vec<TypeMember>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TupleType {
    #[serde(flatten)]
    pub data: NodeData,
    pub elements: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FunctionType {
    #[serde(flatten)]
    pub data: NodeData,
    pub type_parameters: Vec<TypeParameter>,
    pub parameters: Vec<Parameter>,
    pub return_type: Box<TypeExpr>,
}

// ============================================================================
// Expressions
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum Expression {
    Identifier(Identifier),
    Literal(Literal),
    Call(CallExpression),
    New(NewExpression),
    Binary(BinaryExpression),
    PrefixUnary(PrefixUnaryExpression),
    Conditional(ConditionalExpression),
    PropertyAccess(PropertyAccessExpression),
    ElementAccess(ElementAccessExpression),
    Instantiation(InstantiationExpression),
    Object(ObjectLiteral),
    Array(ArrayLiteral),
    Parenthesized(ParenthesizedExpression),
    Arrow(ArrowFunction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CallExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub callee: Box<Expression>,
    pub type_arguments: Option<Vec<TypeExpr>>,
    pub arguments: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub callee: Box<Expression>,
    pub type_arguments: Option<Vec<TypeExpr>>,
    /// None for `new Foo` without parentheses.
    pub arguments: Option<Vec<Expression>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BinaryExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub left: Box<Expression>,
    pub operator: SyntaxKind,
    pub right: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrefixUnaryExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub operator: SyntaxKind,
    pub operand: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConditionalExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub condition: Box<Expression>,
    pub when_true: Box<Expression>,
    pub when_false: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyAccessExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub object: Box<Expression>,
    pub name: Identifier,
    /// Accessed with `?.`.
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ElementAccessExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub object: Box<Expression>,
    pub index: Box<Expression>,
}

/// `f<T>` not followed by a call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstantiationExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Box<Expression>,
    pub type_arguments: Vec<TypeExpr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectLiteral {
    #[serde(flatten)]
    pub data: NodeData,
    pub properties: Vec<ObjectProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ObjectProperty {
    Assignment(PropertyAssignment),
    Shorthand(ShorthandProperty),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PropertyKey {
    Identifier(Identifier),
    Literal(Literal),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PropertyAssignment {
    #[serde(flatten)]
    pub data: NodeData,
    pub key: PropertyKey,
    pub value: Expression,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShorthandProperty {
    #[serde(flatten)]
    pub data: NodeData,
    pub name: Identifier,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayLiteral {
    #[serde(flatten)]
    pub data: NodeData,
    pub elements: Vec<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParenthesizedExpression {
    #[serde(flatten)]
    pub data: NodeData,
    pub expression: Box<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrowFunction {
    #[serde(flatten)]
    pub data: NodeData,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<TypeExpr>,
    pub body: ArrowBody,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ArrowBody {
    Block(FunctionBody),
    Expression(Box<Expression>),
}

impl_ast_node!(
    Program,
    Identifier,
    Literal,
    StringLiteral,
    ImportDeclaration,
    ImportSpecifier,
    ExportDeclaration,
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
    CallExpression,
    NewExpression,
    BinaryExpression,
    PrefixUnaryExpression,
    ConditionalExpression,
    PropertyAccessExpression,
    ElementAccessExpression,
    InstantiationExpression,
    ObjectLiteral,
    PropertyAssignment,
    ShorthandProperty,
    ArrayLiteral,
    ParenthesizedExpression,
    ArrowFunction,
);

impl_ast_node_enum!(Statement {
    Import,
    Export,
    Interface,
    TypeAlias,
    Function,
    Variable,
    Expression,
    Return,
    Empty,
});

impl_ast_node_enum!(TypeMember { Property, Method });

impl_ast_node_enum!(TypeExpr {
    Named,
    Keyword,
    Literal,
    Union,
    Intersection,
    Array,
    Parenthesized,
    TypeLiteral,
    Tuple,
    Function,
});

impl_ast_node_enum!(Expression {
    Identifier,
    Literal,
    Call,
    New,
    Binary,
    PrefixUnary,
    Conditional,
    PropertyAccess,
    ElementAccess,
    Instantiation,
    Object,
    Array,
    Parenthesized,
    Arrow,
});

impl_ast_node_enum!(ObjectProperty { Assignment, Shorthand });

impl_ast_node_enum!(PropertyKey { Identifier, Literal });

impl_ast_node_enum!(ArrowBody { Block, Expression });

impl Statement {
    /// The declared name, for statements that declare one.
    pub fn declared_name(&self) -> Option<&Identifier> {
        match self {
            Statement::Interface(n) => Some(&n.name),
            Statement::TypeAlias(n) => Some(&n.name),
            Statement::Function(n) => Some(&n.name),
            Statement::Variable(n) => Some(&n.name),
            Statement::Export(ExportDeclaration {
                clause: ExportClause::Declaration(inner),
                ..
            }) => inner.declared_name(),
            _ => None,
        }
    }
}

impl TypeExpr {
    /// The referenced name, if this is a named type.
    pub fn as_named(&self) -> Option<&TypeReference> {
        match self {
            TypeExpr::Named(n) => Some(n),
            _ => None,
        }
    }
}
