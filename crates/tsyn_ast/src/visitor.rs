//! Tree traversal.
//!
//! `Visitor` is a trait with default methods that walk into children;
//! override the ones you care about and call the matching `walk_*`
//! function to keep descending. `for_each_child` gives untyped access to
//! a node's direct children, which is what `verify_spans` builds on.

use std::fmt;

use tsyn_core::text::TextRange;

use crate::node::*;
use crate::syntax_kind::SyntaxKind;

pub trait Visitor {
    fn visit_program(&mut self, node: &Program) {
        for stmt in &node.statements {
            self.visit_statement(stmt);
        }
    }

    fn visit_statement(&mut self, stmt: &Statement) {
        walk_statement(self, stmt);
    }

    fn visit_type(&mut self, ty: &TypeExpr) {
        walk_type(self, ty);
    }

    fn visit_expression(&mut self, expr: &Expression) {
        walk_expression(self, expr);
    }

    fn visit_type_parameter(&mut self, node: &TypeParameter) {
        if let Some(ref constraint) = node.constraint {
            self.visit_type(constraint);
        }
        if let Some(ref default) = node.default {
            self.visit_type(default);
        }
    }

    fn visit_parameter(&mut self, node: &Parameter) {
        if let Some(ref ty) = node.type_annotation {
            self.visit_type(ty);
        }
        if let Some(ref init) = node.initializer {
            self.visit_expression(init);
        }
    }

    fn visit_type_member(&mut self, member: &TypeMember) {
        match member {
            TypeMember::Property(p) => {
                if let Some(ref ty) = p.type_annotation {
                    self.visit_type(ty);
                }
            }
            TypeMember::Method(m) => {
                walk_signature(self, &m.type_parameters, &m.parameters);
                if let Some(ref ret) = m.return_type {
                    self.visit_type(ret);
                }
            }
        }
    }
}

fn walk_signature<V: Visitor + ?Sized>(v: &mut V, type_params: &[TypeParameter], params: &[Parameter]) {
    for tp in type_params {
        v.visit_type_parameter(tp);
    }
    for param in params {
        v.visit_parameter(param);
    }
}

pub fn walk_statement<V: Visitor + ?Sized>(v: &mut V, stmt: &Statement) {
    match stmt {
        Statement::Import(_) | Statement::Empty(_) => {}
        Statement::Export(n) => match &n.clause {
            ExportClause::Declaration(inner) => v.visit_statement(inner),
            ExportClause::Default(expr) => v.visit_expression(expr),
            ExportClause::Named { .. } => {}
        },
        Statement::Interface(n) => {
            walk_signature(v, &n.type_parameters, &[]);
            for ty in &n.extends {
                v.visit_type(ty);
            }
            for member in &n.members {
                v.visit_type_member(member);
            }
        }
        Statement::TypeAlias(n) => {
            walk_signature(v, &n.type_parameters, &[]);
            v.visit_type(&n.type_expr);
        }
        Statement::Function(n) => {
            walk_signature(v, &n.type_parameters, &n.parameters);
            if let Some(ref ret) = n.return_type {
                v.visit_type(ret);
            }
        }
        Statement::Variable(n) => {
            if let Some(ref ty) = n.type_annotation {
                v.visit_type(ty);
            }
            if let Some(ref init) = n.initializer {
                v.visit_expression(init);
            }
        }
        Statement::Expression(n) => v.visit_expression(&n.expression),
        Statement::Return(n) => {
            if let Some(ref expr) = n.expression {
                v.visit_expression(expr);
            }
        }
    }
}

pub fn walk_type<V: Visitor + ?Sized>(v: &mut V, ty: &TypeExpr) {
    match ty {
        TypeExpr::Named(n) => {
            for arg in n.type_arguments.iter().flatten() {
                v.visit_type(arg);
            }
        }
        TypeExpr::Keyword(_) | TypeExpr::Literal(_) => {}
        TypeExpr::Union(UnionType { types, .. })
        | TypeExpr::Intersection(IntersectionType { types, .. })
        | TypeExpr::Tuple(TupleType { elements: types, .. }) => {
            for t in types {
                v.visit_type(t);
            }
        }
        TypeExpr::Array(n) => v.visit_type(&n.element),
        TypeExpr::Parenthesized(n) => v.visit_type(&n.inner),
        TypeExpr::TypeLiteral(n) => {
            for member in &n.members {
                v.visit_type_member(member);
            }
        }
        TypeExpr::Function(n) => {
            walk_signature(v, &n.type_parameters, &n.parameters);
            v.visit_type(&n.return_type);
        }
    }
}

pub fn walk_expression<V: Visitor + ?Sized>(v: &mut V, expr: &Expression) {
    match expr {
        Expression::Identifier(_) | Expression::Literal(_) => {}
        Expression::Call(n) => {
            v.visit_expression(&n.callee);
            for ty in n.type_arguments.iter().flatten() {
                v.visit_type(ty);
            }
            for arg in &n.arguments {
                v.visit_expression(arg);
            }
        }
        Expression::New(n) => {
            v.visit_expression(&n.callee);
            for ty in n.type_arguments.iter().flatten() {
                v.visit_type(ty);
            }
            for arg in n.arguments.iter().flatten() {
                v.visit_expression(arg);
            }
        }
        Expression::Binary(n) => {
            v.visit_expression(&n.left);
            v.visit_expression(&n.right);
        }
        Expression::PrefixUnary(n) => v.visit_expression(&n.operand),
        Expression::Conditional(n) => {
            v.visit_expression(&n.condition);
            v.visit_expression(&n.when_true);
            v.visit_expression(&n.when_false);
        }
        Expression::PropertyAccess(n) => v.visit_expression(&n.object),
        Expression::ElementAccess(n) => {
            v.visit_expression(&n.object);
            v.visit_expression(&n.index);
        }
        Expression::Instantiation(n) => {
            v.visit_expression(&n.expression);
            for ty in &n.type_arguments {
                v.visit_type(ty);
            }
        }
        Expression::Object(n) => {
            for prop in &n.properties {
                if let ObjectProperty::Assignment(a) = prop {
                    v.visit_expression(&a.value);
                }
            }
        }
        Expression::Array(n) => {
            for el in &n.elements {
                v.visit_expression(el);
            }
        }
        Expression::Parenthesized(n) => v.visit_expression(&n.expression),
        Expression::Arrow(n) => {
            walk_signature(v, &[], &n.parameters);
            if let Some(ref ret) = n.return_type {
                v.visit_type(ret);
            }
            if let ArrowBody::Expression(ref body) = n.body {
                v.visit_expression(body);
            }
        }
    }
}

// ============================================================================
// Untyped child iteration
// ============================================================================

/// A borrowed reference to any node.
#[derive(Debug, Clone, Copy)]
pub enum NodeRef<'a> {
    Program(&'a Program),
    Statement(&'a Statement),
    Type(&'a TypeExpr),
    Expression(&'a Expression),
    Identifier(&'a Identifier),
    Literal(&'a Literal),
    StringLiteral(&'a StringLiteral),
    ImportSpecifier(&'a ImportSpecifier),
    TypeMember(&'a TypeMember),
    TypeParameter(&'a TypeParameter),
    Parameter(&'a Parameter),
    FunctionBody(&'a FunctionBody),
    ObjectProperty(&'a ObjectProperty),
    PropertyKey(&'a PropertyKey),
}

impl<'a> NodeRef<'a> {
    pub fn data(self) -> &'a NodeData {
        match self {
            NodeRef::Program(n) => n.data(),
            NodeRef::Statement(n) => n.data(),
            NodeRef::Type(n) => n.data(),
            NodeRef::Expression(n) => n.data(),
            NodeRef::Identifier(n) => n.data(),
            NodeRef::Literal(n) => n.data(),
            NodeRef::StringLiteral(n) => n.data(),
            NodeRef::ImportSpecifier(n) => n.data(),
            NodeRef::TypeMember(n) => n.data(),
            NodeRef::TypeParameter(n) => n.data(),
            NodeRef::Parameter(n) => n.data(),
            NodeRef::FunctionBody(n) => n.data(),
            NodeRef::ObjectProperty(n) => n.data(),
            NodeRef::PropertyKey(n) => n.data(),
        }
    }

    #[inline]
    pub fn kind(self) -> SyntaxKind {
        self.data().kind
    }

    #[inline]
    pub fn range(self) -> TextRange {
        self.data().range
    }
}

fn each_type_parameter<'a>(items: &'a [TypeParameter], f: &mut impl FnMut(NodeRef<'a>)) {
    items.iter().for_each(|n| f(NodeRef::TypeParameter(n)));
}

fn each_parameter<'a>(items: &'a [Parameter], f: &mut impl FnMut(NodeRef<'a>)) {
    items.iter().for_each(|n| f(NodeRef::Parameter(n)));
}

fn each_type<'a>(items: &'a [TypeExpr], f: &mut impl FnMut(NodeRef<'a>)) {
    items.iter().for_each(|n| f(NodeRef::Type(n)));
}

fn each_expression<'a>(items: &'a [Expression], f: &mut impl FnMut(NodeRef<'a>)) {
    items.iter().for_each(|n| f(NodeRef::Expression(n)));
}

/// Call `f` on each direct child of `node`, in source order.
pub fn for_each_child<'a>(node: NodeRef<'a>, mut f: impl FnMut(NodeRef<'a>)) {
    let f = &mut f;
    match node {
        NodeRef::Program(n) => n.statements.iter().for_each(|s| f(NodeRef::Statement(s))),
        NodeRef::Statement(stmt) => statement_children(stmt, f),
        NodeRef::Type(ty) => type_children(ty, f),
        NodeRef::Expression(expr) => expression_children(expr, f),
        NodeRef::Identifier(_)
        | NodeRef::Literal(_)
        | NodeRef::StringLiteral(_)
        | NodeRef::FunctionBody(_) => {}
        NodeRef::ImportSpecifier(n) => {
            if let Some(ref prop) = n.property_name {
                f(NodeRef::Identifier(prop));
            }
            f(NodeRef::Identifier(&n.name));
        }
        NodeRef::TypeMember(TypeMember::Property(p)) => {
            f(NodeRef::Identifier(&p.name));
            if let Some(ref ty) = p.type_annotation {
                f(NodeRef::Type(ty));
            }
        }
        NodeRef::TypeMember(TypeMember::Method(m)) => {
            f(NodeRef::Identifier(&m.name));
            each_type_parameter(&m.type_parameters, f);
            each_parameter(&m.parameters, f);
            if let Some(ref ret) = m.return_type {
                f(NodeRef::Type(ret));
            }
        }
        NodeRef::TypeParameter(n) => {
            f(NodeRef::Identifier(&n.name));
            if let Some(ref c) = n.constraint {
                f(NodeRef::Type(c));
            }
            if let Some(ref d) = n.default {
                f(NodeRef::Type(d));
            }
        }
        NodeRef::Parameter(n) => {
            f(NodeRef::Identifier(&n.name));
            if let Some(ref ty) = n.type_annotation {
                f(NodeRef::Type(ty));
            }
            if let Some(ref init) = n.initializer {
                f(NodeRef::Expression(init));
            }
        }
        NodeRef::ObjectProperty(ObjectProperty::Assignment(a)) => {
            f(NodeRef::PropertyKey(&a.key));
            f(NodeRef::Expression(&a.value));
        }
        NodeRef::ObjectProperty(ObjectProperty::Shorthand(s)) => f(NodeRef::Identifier(&s.name)),
        NodeRef::PropertyKey(PropertyKey::Identifier(id)) => f(NodeRef::Identifier(id)),
        NodeRef::PropertyKey(PropertyKey::Literal(lit)) => f(NodeRef::Literal(lit)),
    }
}

fn statement_children<'a>(stmt: &'a Statement, f: &mut impl FnMut(NodeRef<'a>)) {
    match stmt {
        Statement::Import(n) => {
            if let Some(ref id) = n.default_binding {
                f(NodeRef::Identifier(id));
            }
            if let Some(ref id) = n.namespace_binding {
                f(NodeRef::Identifier(id));
            }
            n.named_bindings.iter().for_each(|s| f(NodeRef::ImportSpecifier(s)));
            f(NodeRef::StringLiteral(&n.source));
        }
        Statement::Export(n) => match &n.clause {
            ExportClause::Declaration(inner) => f(NodeRef::Statement(inner)),
            ExportClause::Default(expr) => f(NodeRef::Expression(expr)),
            ExportClause::Named { specifiers, source } => {
                specifiers.iter().for_each(|s| f(NodeRef::ImportSpecifier(s)));
                if let Some(ref src) = source {
                    f(NodeRef::StringLiteral(src));
                }
            }
        },
        Statement::Interface(n) => {
            f(NodeRef::Identifier(&n.name));
            each_type_parameter(&n.type_parameters, f);
            each_type(&n.extends, f);
            n.members.iter().for_each(|m| f(NodeRef::TypeMember(m)));
        }
        Statement::TypeAlias(n) => {
            f(NodeRef::Identifier(&n.name));
            each_type_parameter(&n.type_parameters, f);
            f(NodeRef::Type(&n.type_expr));
        }
        Statement::Function(n) => {
            f(NodeRef::Identifier(&n.name));
            each_type_parameter(&n.type_parameters, f);
            each_parameter(&n.parameters, f);
            if let Some(ref ret) = n.return_type {
                f(NodeRef::Type(ret));
            }
            if let Some(ref body) = n.body {
                f(NodeRef::FunctionBody(body));
            }
        }
        Statement::Variable(n) => {
            f(NodeRef::Identifier(&n.name));
            if let Some(ref ty) = n.type_annotation {
                f(NodeRef::Type(ty));
            }
            if let Some(ref init) = n.initializer {
                f(NodeRef::Expression(init));
            }
        }
        Statement::Expression(n) => f(NodeRef::Expression(&n.expression)),
        Statement::Return(n) => {
            if let Some(ref expr) = n.expression {
                f(NodeRef::Expression(expr));
            }
        }
        Statement::Empty(_) => {}
    }
}

fn type_children<'a>(ty: &'a TypeExpr, f: &mut impl FnMut(NodeRef<'a>)) {
    match ty {
        TypeExpr::Named(n) => {
            f(NodeRef::Identifier(&n.name));
            if let Some(ref args) = n.type_arguments {
                each_type(args, f);
            }
        }
        TypeExpr::Keyword(_) => {}
        TypeExpr::Literal(n) => f(NodeRef::Literal(&n.literal)),
        TypeExpr::Union(UnionType { types, .. })
        | TypeExpr::Intersection(IntersectionType { types, .. })
        | TypeExpr::Tuple(TupleType { elements: types, .. }) => each_type(types, f),
        TypeExpr::Array(n) => f(NodeRef::Type(&n.element)),
        TypeExpr::Parenthesized(n) => f(NodeRef::Type(&n.inner)),
        TypeExpr::TypeLiteral(n) => n.members.iter().for_each(|m| f(NodeRef::TypeMember(m))),
        TypeExpr::Function(n) => {
            each_type_parameter(&n.type_parameters, f);
            each_parameter(&n.parameters, f);
            f(NodeRef::Type(&n.return_type));
        }
    }
}

fn expression_children<'a>(expr: &'a Expression, f: &mut impl FnMut(NodeRef<'a>)) {
    match expr {
        Expression::Identifier(_) | Expression::Literal(_) => {}
        Expression::Call(n) => {
            f(NodeRef::Expression(&n.callee));
            if let Some(ref args) = n.type_arguments {
                each_type(args, f);
            }
            each_expression(&n.arguments, f);
        }
        Expression::New(n) => {
            f(NodeRef::Expression(&n.callee));
            if let Some(ref args) = n.type_arguments {
                each_type(args, f);
            }
            if let Some(ref args) = n.arguments {
                each_expression(args, f);
            }
        }
        Expression::Binary(n) => {
            f(NodeRef::Expression(&n.left));
            f(NodeRef::Expression(&n.right));
        }
        Expression::PrefixUnary(n) => f(NodeRef::Expression(&n.operand)),
        Expression::Conditional(n) => {
            f(NodeRef::Expression(&n.condition));
            f(NodeRef::Expression(&n.when_true));
            f(NodeRef::Expression(&n.when_false));
        }
        Expression::PropertyAccess(n) => {
            f(NodeRef::Expression(&n.object));
            f(NodeRef::Identifier(&n.name));
        }
        Expression::ElementAccess(n) => {
            f(NodeRef::Expression(&n.object));
            f(NodeRef::Expression(&n.index));
        }
        Expression::Instantiation(n) => {
            f(NodeRef::Expression(&n.expression));
            each_type(&n.type_arguments, f);
        }
        Expression::Object(n) => n.properties.iter().for_each(|p| f(NodeRef::ObjectProperty(p))),
        Expression::Array(n) => each_expression(&n.elements, f),
        Expression::Parenthesized(n) => f(NodeRef::Expression(&n.expression)),
        Expression::Arrow(n) => {
            each_parameter(&n.parameters, f);
            if let Some(ref ret) = n.return_type {
                f(NodeRef::Type(ret));
            }
            match &n.body {
                ArrowBody::Block(body) => f(NodeRef::FunctionBody(body)),
                ArrowBody::Expression(body) => f(NodeRef::Expression(body)),
            }
        }
    }
}

// ============================================================================
// Span verification
// ============================================================================

/// A node whose range breaks the containment or ordering rule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpanViolation {
    pub parent: SyntaxKind,
    pub parent_range: TextRange,
    pub child: SyntaxKind,
    pub child_range: TextRange,
    /// The previous sibling's range, when the violation is an overlap.
    pub previous_sibling: Option<TextRange>,
}

impl fmt::Display for SpanViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.previous_sibling {
            Some(prev) => write!(
                f,
                "{:?} at {:?} overlaps or precedes its sibling at {:?}",
                self.child, self.child_range, prev
            ),
            None => write!(
                f,
                "{:?} at {:?} escapes its parent {:?} at {:?}",
                self.child, self.child_range, self.parent, self.parent_range
            ),
        }
    }
}

/// Check that every node lies within its parent and that siblings are
/// disjoint and in source order.
pub fn verify_spans(program: &Program) -> Result<(), SpanViolation> {
    verify_node(NodeRef::Program(program))
}

fn verify_node(node: NodeRef<'_>) -> Result<(), SpanViolation> {
    let parent_range = node.range();
    let mut previous: Option<TextRange> = None;
    let mut result = Ok(());
    for_each_child(node, |child| {
        if result.is_err() {
            return;
        }
        let child_range = child.range();
        let violation = |previous_sibling| SpanViolation {
            parent: node.kind(),
            parent_range,
            child: child.kind(),
            child_range,
            previous_sibling,
        };
        if !parent_range.contains_range(child_range) {
            result = Err(violation(None));
        } else if let Some(prev) = previous.filter(|prev| child_range.pos < prev.end) {
            result = Err(violation(Some(prev)));
        } else {
            previous = Some(child_range);
            result = verify_node(child);
        }
    });
    result
}
