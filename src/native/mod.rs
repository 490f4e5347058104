/*!
# Native tree binding

Rust-side view of the external Java parser's syntax tree: a closed set of
node kinds, an index arena of nodes with structural roles, per-node tokens
and flags, and the full source text of the compilation unit. The parser
hands a tree over either through [`NativeTreeBuilder`] or as a JSON document
(see [`document`]).
*/

pub mod accessors;
pub mod builder;
pub mod document;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{Result, SourceSpan, TreeGenError};

pub use accessors::{CallParts, ForParts, IfParts, ImportParts, TypeDeclarationParts};
pub use builder::NativeTreeBuilder;
pub use document::{NativeDocument, NativeNodeJson};

macro_rules! native_kinds {
    ($($kind:ident = $code:literal),+ $(,)?) => {
        /// Node kind as reported by the parser; the discriminant is the parser's numeric node type.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[repr(i32)]
        pub enum NativeKind {
            $($kind = $code),+
        }

        impl NativeKind {
            pub const ALL: &'static [NativeKind] = &[$(NativeKind::$kind),+];

            /// Parser class name, e.g. `MethodInvocation`.
            pub fn name(self) -> &'static str {
                match self {
                    $(NativeKind::$kind => stringify!($kind)),+
                }
            }
        }
    };
}

native_kinds! {
    AnonymousClassDeclaration = 1,
    ArrayAccess = 2,
    ArrayCreation = 3,
    ArrayInitializer = 4,
    ArrayType = 5,
    AssertStatement = 6,
    Assignment = 7,
    Block = 8,
    BooleanLiteral = 9,
    BreakStatement = 10,
    CastExpression = 11,
    CatchClause = 12,
    CharacterLiteral = 13,
    ClassInstanceCreation = 14,
    CompilationUnit = 15,
    ConditionalExpression = 16,
    ConstructorInvocation = 17,
    ContinueStatement = 18,
    DoStatement = 19,
    EmptyStatement = 20,
    ExpressionStatement = 21,
    FieldAccess = 22,
    FieldDeclaration = 23,
    ForStatement = 24,
    IfStatement = 25,
    ImportDeclaration = 26,
    InfixExpression = 27,
    Initializer = 28,
    Javadoc = 29,
    LabeledStatement = 30,
    MethodDeclaration = 31,
    MethodInvocation = 32,
    NullLiteral = 33,
    NumberLiteral = 34,
    PackageDeclaration = 35,
    ParenthesizedExpression = 36,
    PostfixExpression = 37,
    PrefixExpression = 38,
    PrimitiveType = 39,
    QualifiedName = 40,
    ReturnStatement = 41,
    SimpleName = 42,
    SimpleType = 43,
    SingleVariableDeclaration = 44,
    StringLiteral = 45,
    SuperConstructorInvocation = 46,
    SuperFieldAccess = 47,
    SuperMethodInvocation = 48,
    SwitchCase = 49,
    SwitchStatement = 50,
    SynchronizedStatement = 51,
    ThisExpression = 52,
    ThrowStatement = 53,
    TryStatement = 54,
    TypeDeclaration = 55,
    TypeDeclarationStatement = 56,
    TypeLiteral = 57,
    VariableDeclarationExpression = 58,
    VariableDeclarationFragment = 59,
    VariableDeclarationStatement = 60,
    WhileStatement = 61,
    InstanceofExpression = 62,
    LineComment = 63,
    BlockComment = 64,
    TagElement = 65,
    TextElement = 66,
    MemberRef = 67,
    MethodRef = 68,
    MethodRefParameter = 69,
    EnhancedForStatement = 70,
    EnumDeclaration = 71,
    EnumConstantDeclaration = 72,
    TypeParameter = 73,
    ParameterizedType = 74,
    QualifiedType = 75,
    WildcardType = 76,
    NormalAnnotation = 77,
    MarkerAnnotation = 78,
    SingleMemberAnnotation = 79,
    MemberValuePair = 80,
    AnnotationTypeDeclaration = 81,
    AnnotationTypeMemberDeclaration = 82,
    Modifier = 83,
    Dimension = 85,
}

impl NativeKind {
    pub fn code(self) -> i32 { self as i32 }

    /// Kind for a parser class name; `None` for kinds outside the supported set.
    pub fn from_name(name: &str) -> Option<NativeKind> {
        NativeKind::ALL.iter().copied().find(|k| k.name() == name)
    }

    /// Annotation kinds allowed in a modifier list.
    pub fn is_annotation(self) -> bool {
        matches!(self, NativeKind::NormalAnnotation | NativeKind::MarkerAnnotation | NativeKind::SingleMemberAnnotation)
    }
}

impl fmt::Display for NativeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

/// Structural property a child fills in its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Expression,
    ThenStatement,
    ElseStatement,
    TypeArguments,
    Name,
    Arguments,
    Modifiers,
    SuperclassType,
    SuperInterfaceTypes,
    BodyDeclarations,
    Initializers,
    Updaters,
    Body,
    #[default]
    Other,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Expression => "expression",
            Role::ThenStatement => "then_statement",
            Role::ElseStatement => "else_statement",
            Role::TypeArguments => "type_arguments",
            Role::Name => "name",
            Role::Arguments => "arguments",
            Role::Modifiers => "modifiers",
            Role::SuperclassType => "superclass_type",
            Role::SuperInterfaceTypes => "super_interface_types",
            Role::BodyDeclarations => "body_declarations",
            Role::Initializers => "initializers",
            Role::Updaters => "updaters",
            Role::Body => "body",
            Role::Other => "other",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Per-node textual content and flags.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NativeAttrs {
    /// Identifier, literal token (escaped, as written), operator, modifier keyword,
    /// documentation text, tag name or wildcard bound keyword, depending on the kind.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_static: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_on_demand: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_interface: bool,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_default: bool,
}

impl NativeAttrs {
    pub fn token(token: impl Into<String>) -> Self { Self { token: Some(token.into()), ..Default::default() } }
    pub fn with_static(mut self) -> Self { self.is_static = true; self }
    pub fn with_on_demand(mut self) -> Self { self.is_on_demand = true; self }
    pub fn with_interface(mut self) -> Self { self.is_interface = true; self }
    pub fn with_default(mut self) -> Self { self.is_default = true; self }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NativeId(pub u32);

#[derive(Debug, Clone)]
pub struct NativeNode {
    pub kind: NativeKind,
    pub span: SourceSpan,
    pub role: Role,
    pub attrs: NativeAttrs,
    pub parent: Option<NativeId>,
    /// Source order.
    pub children: Vec<NativeId>,
}

/// Native syntax tree of one compilation unit.
#[derive(Debug, Clone)]
pub struct NativeTree {
    source: String,
    nodes: Vec<NativeNode>,
    root: NativeId,
}

impl NativeTree {
    pub(crate) fn from_parts(source: String, nodes: Vec<NativeNode>, root: NativeId) -> Self {
        Self { source, nodes, root }
    }

    /// Parse a JSON native document.
    pub fn from_json(json: &str) -> Result<NativeTree> {
        let doc: NativeDocument = serde_json::from_str(json)?;
        doc.into_tree()
    }

    pub fn root(&self) -> NativeId { self.root }
    pub fn source(&self) -> &str { &self.source }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    /// Panics on an id from another tree.
    pub fn node(&self, id: NativeId) -> &NativeNode { &self.nodes[id.0 as usize] }
    pub fn kind(&self, id: NativeId) -> NativeKind { self.node(id).kind }
    pub fn children(&self, id: NativeId) -> &[NativeId] { &self.node(id).children }

    /// Children filling `role`, in source order.
    pub fn children_with_role(&self, id: NativeId, role: Role) -> impl Iterator<Item = NativeId> + '_ {
        self.children(id).iter().copied().filter(move |c| self.node(*c).role == role)
    }

    /// First child filling `role`.
    pub fn child_with_role(&self, id: NativeId, role: Role) -> Option<NativeId> {
        self.children_with_role(id, role).next()
    }

    pub(crate) fn required_child(&self, id: NativeId, role: Role) -> Result<NativeId> {
        self.child_with_role(id, role).ok_or_else(|| {
            let node = self.node(id);
            TreeGenError::MissingChild { kind: node.kind, role, offset: node.span.start }
        })
    }

    /// Textual form: the node's source slice, or a rendering from tokens when
    /// the span does not address the source text.
    pub fn text(&self, id: NativeId) -> String {
        let node = self.node(id);
        if let Some(slice) = node.span.range().and_then(|r| self.source.get(r)) {
            if !slice.is_empty() { return slice.to_string(); }
        }
        self.render(id)
    }

    fn render(&self, id: NativeId) -> String {
        let node = self.node(id);
        let token = node.attrs.token.as_deref().unwrap_or("");
        if node.children.is_empty() {
            return match node.kind {
                NativeKind::WildcardType => "?".to_string(),
                NativeKind::NullLiteral if token.is_empty() => "null".to_string(),
                NativeKind::ThisExpression if token.is_empty() => "this".to_string(),
                NativeKind::Dimension if token.is_empty() => "[]".to_string(),
                _ => token.to_string(),
            };
        }
        let parts: Vec<String> = node.children.iter().map(|c| self.text(*c)).collect();
        let (first, rest) = (&parts[0], &parts[1..]);
        match node.kind {
            NativeKind::QualifiedName | NativeKind::QualifiedType | NativeKind::FieldAccess => parts.join("."),
            NativeKind::InfixExpression | NativeKind::Assignment => parts.join(&format!(" {token} ")),
            NativeKind::PrefixExpression => format!("{token}{}", parts.concat()),
            NativeKind::PostfixExpression => format!("{}{token}", parts.concat()),
            NativeKind::MethodInvocation | NativeKind::SuperMethodInvocation => self.render_call(id),
            NativeKind::ClassInstanceCreation => self.render_instance_creation(id),
            NativeKind::ArrayCreation => self.render_array_creation(id),
            NativeKind::ParameterizedType => format!("{first}<{}>", rest.join(", ")),
            // Element type followed by its dimensions; older parsers nest one level per dimension.
            NativeKind::ArrayType if rest.is_empty() => format!("{first}[]"),
            NativeKind::ArrayType => parts.concat(),
            NativeKind::WildcardType => {
                let bound = if token == "super" { "super" } else { "extends" };
                format!("? {bound} {}", parts.join(" "))
            }
            NativeKind::ArrayAccess => format!("{first}[{}]", rest.concat()),
            NativeKind::CastExpression => format!("({first}) {}", rest.join(" ")),
            NativeKind::ParenthesizedExpression => format!("({})", parts.join(" ")),
            NativeKind::ConditionalExpression if parts.len() == 3 => {
                format!("{} ? {} : {}", parts[0], parts[1], parts[2])
            }
            NativeKind::InstanceofExpression => parts.join(" instanceof "),
            NativeKind::TypeLiteral => format!("{}.class", parts.concat()),
            NativeKind::ThisExpression => format!("{}.this", parts.concat()),
            NativeKind::SuperFieldAccess => match parts.split_last() {
                Some((name, [])) => format!("super.{name}"),
                Some((name, qualifier)) => format!("{}.super.{name}", qualifier.join(".")),
                None => "super".to_string(),
            },
            NativeKind::ArrayInitializer => format!("{{{}}}", parts.join(", ")),
            NativeKind::MemberValuePair => parts.join(" = "),
            NativeKind::VariableDeclarationFragment => self.render_fragment(id),
            NativeKind::MarkerAnnotation => format!("@{first}"),
            NativeKind::SingleMemberAnnotation | NativeKind::NormalAnnotation => {
                format!("@{first}({})", rest.join(", "))
            }
            _ => parts.join(" "),
        }
    }

    fn render_call(&self, id: NativeId) -> String {
        let mut out = String::new();
        if self.kind(id) == NativeKind::SuperMethodInvocation {
            out.push_str("super.");
        } else if let Some(recv) = self.child_with_role(id, Role::Expression) {
            out.push_str(&self.text(recv));
            out.push('.');
        }
        out.push_str(&self.joined(id, Role::TypeArguments, "<", ">"));
        if let Some(name) = self.child_with_role(id, Role::Name) {
            out.push_str(&self.text(name));
        }
        out.push_str(&self.arguments(id));
        out
    }

    fn render_instance_creation(&self, id: NativeId) -> String {
        let mut out = String::new();
        if let Some(outer) = self.child_with_role(id, Role::Expression) {
            out.push_str(&self.text(outer));
            out.push('.');
        }
        out.push_str("new ");
        out.push_str(&self.joined(id, Role::TypeArguments, "<", ">"));
        let created = self.children(id).iter().copied().find(|c| {
            let child = self.node(*c);
            child.kind != NativeKind::AnonymousClassDeclaration
                && !matches!(child.role, Role::Expression | Role::TypeArguments | Role::Arguments)
        });
        if let Some(ty) = created {
            out.push_str(&self.text(ty));
        }
        out.push_str(&self.arguments(id));
        let body = self.children(id).iter().find(|c| self.kind(**c) == NativeKind::AnonymousClassDeclaration);
        if let Some(body) = body {
            out.push(' ');
            out.push_str(&self.text(*body));
        }
        out
    }

    /// `new int[n][]`: sized dimensions come from the expressions, the rest from the array type.
    fn render_array_creation(&self, id: NativeId) -> String {
        let Some((ty, rest)) = self.children(id).split_first() else { return "new".to_string() };
        let mut element = self.text(*ty);
        let mut unsized_dims = 0usize;
        while let Some(stripped) = element.strip_suffix("[]") {
            let keep = stripped.len();
            element.truncate(keep);
            unsized_dims += 1;
        }
        let mut out = format!("new {element}");
        let mut initializer = None;
        for &child in rest {
            if self.kind(child) == NativeKind::ArrayInitializer {
                initializer = Some(self.text(child));
            } else {
                out.push_str(&format!("[{}]", self.text(child)));
                unsized_dims = unsized_dims.saturating_sub(1);
            }
        }
        out.push_str(&"[]".repeat(unsized_dims));
        if let Some(init) = initializer {
            out.push(' ');
            out.push_str(&init);
        }
        out
    }

    fn render_fragment(&self, id: NativeId) -> String {
        let mut declarator = String::new();
        let mut initializer = None;
        for &child in self.children(id) {
            match self.kind(child) {
                NativeKind::Dimension => declarator.push_str(&self.text(child)),
                _ if declarator.is_empty() => declarator.push_str(&self.text(child)),
                _ => initializer = Some(self.text(child)),
            }
        }
        match initializer {
            Some(init) => format!("{declarator} = {init}"),
            None => declarator,
        }
    }

    fn arguments(&self, id: NativeId) -> String {
        let args: Vec<String> = self.children_with_role(id, Role::Arguments).map(|a| self.text(a)).collect();
        format!("({})", args.join(", "))
    }

    /// Children in `role` joined by `", "` between `open` and `close`; empty when there are none.
    fn joined(&self, id: NativeId, role: Role, open: &str, close: &str) -> String {
        let items: Vec<String> = self.children_with_role(id, role).map(|c| self.text(c)).collect();
        if items.is_empty() { String::new() } else { format!("{open}{}{close}", items.join(", ")) }
    }
}

/// Traversal control returned from [`NativeVisitor::enter`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitControl {
    Continue,
    SkipChildren,
}

/// Enter/leave visitor over a native tree. `leave` runs for every entered
/// node, including those whose children were skipped.
pub trait NativeVisitor {
    type Error;
    fn enter(&mut self, tree: &NativeTree, id: NativeId) -> std::result::Result<VisitControl, Self::Error>;
    fn leave(&mut self, _tree: &NativeTree, _id: NativeId) -> std::result::Result<(), Self::Error> { Ok(()) }
}

/// Depth-first walk of the subtree rooted at `id`, children in source order.
pub fn walk<V: NativeVisitor>(tree: &NativeTree, id: NativeId, visitor: &mut V) -> std::result::Result<(), V::Error> {
    if visitor.enter(tree, id)? == VisitControl::Continue {
        for &child in tree.children(id) {
            walk(tree, child, visitor)?;
        }
    }
    visitor.leave(tree, id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    #[test]
    fn kinds_cover_native_codes() {
        assert_eq!(NativeKind::ALL.len(), 84);
        assert_eq!(NativeKind::MethodInvocation.code(), 32);
        assert_eq!(NativeKind::Dimension.code(), 85);
        assert_eq!(NativeKind::from_name("TagElement"), Some(NativeKind::TagElement));
        assert_eq!(NativeKind::from_name("LambdaExpression"), None);
    }

    #[test]
    fn role_serde_is_snake_case() {
        assert_eq!(serde_json::to_string(&Role::SuperInterfaceTypes).unwrap(), "\"super_interface_types\"");
        assert_eq!(Role::ThenStatement.to_string(), "then_statement");
    }

    fn qualified_call() -> NativeTree {
        // a.b.c(x)
        let mut b = NativeTreeBuilder::new("");
        b.start_node(NativeKind::MethodInvocation, Role::Other, SourceSpan::UNKNOWN);
        b.start_node(NativeKind::QualifiedName, Role::Expression, SourceSpan::UNKNOWN);
        b.leaf(NativeKind::SimpleName, Role::Other, SourceSpan::UNKNOWN, NativeAttrs::token("a"));
        b.leaf(NativeKind::SimpleName, Role::Name, SourceSpan::UNKNOWN, NativeAttrs::token("b"));
        b.finish_node();
        b.leaf(NativeKind::SimpleName, Role::Name, SourceSpan::UNKNOWN, NativeAttrs::token("c"));
        b.leaf(NativeKind::SimpleName, Role::Arguments, SourceSpan::UNKNOWN, NativeAttrs::token("x"));
        b.finish_node();
        b.build().unwrap()
    }

    #[test]
    fn text_renders_without_source() {
        let tree = qualified_call();
        assert_eq!(tree.text(tree.root()), "a.b.c(x)");
        let recv = tree.child_with_role(tree.root(), Role::Expression).unwrap();
        assert_eq!(tree.text(recv), "a.b");
    }

    fn leaf(b: &mut NativeTreeBuilder, kind: NativeKind, role: Role, token: &str) {
        b.leaf(kind, role, SourceSpan::UNKNOWN, NativeAttrs::token(token));
    }

    fn rendered(build: impl FnOnce(&mut NativeTreeBuilder)) -> String {
        let mut b = NativeTreeBuilder::new("");
        build(&mut b);
        let tree = b.build().unwrap();
        tree.text(tree.root())
    }

    #[test]
    fn text_renders_flattened_expressions() {
        let u = SourceSpan::UNKNOWN;
        let access = rendered(|b| {
            b.start_node(NativeKind::ArrayAccess, Role::Other, u);
            leaf(b, NativeKind::SimpleName, Role::Other, "a");
            leaf(b, NativeKind::NumberLiteral, Role::Other, "0");
            b.finish_node();
        });
        assert_eq!(access, "a[0]");

        let cast = rendered(|b| {
            b.start_node(NativeKind::CastExpression, Role::Other, u);
            leaf(b, NativeKind::PrimitiveType, Role::Other, "long");
            b.start_node(NativeKind::ParenthesizedExpression, Role::Other, u);
            b.start_node(NativeKind::ConditionalExpression, Role::Other, u);
            leaf(b, NativeKind::SimpleName, Role::Other, "c");
            leaf(b, NativeKind::SimpleName, Role::Other, "x");
            b.leaf(NativeKind::NullLiteral, Role::Other, u, NativeAttrs::default());
            b.finish_node();
            b.finish_node();
            b.finish_node();
        });
        assert_eq!(cast, "(long) (c ? x : null)");

        let creation = rendered(|b| {
            b.start_node(NativeKind::ClassInstanceCreation, Role::Other, u);
            b.start_node(NativeKind::SimpleType, Role::Other, u);
            leaf(b, NativeKind::SimpleName, Role::Name, "Point");
            b.finish_node();
            leaf(b, NativeKind::NumberLiteral, Role::Arguments, "1");
            b.leaf(NativeKind::ThisExpression, Role::Arguments, u, NativeAttrs::default());
            b.finish_node();
        });
        assert_eq!(creation, "new Point(1, this)");

        let array = rendered(|b| {
            b.start_node(NativeKind::ArrayCreation, Role::Other, u);
            b.start_node(NativeKind::ArrayType, Role::Other, u);
            leaf(b, NativeKind::PrimitiveType, Role::Other, "int");
            b.leaf(NativeKind::Dimension, Role::Other, u, NativeAttrs::default());
            b.leaf(NativeKind::Dimension, Role::Other, u, NativeAttrs::default());
            b.finish_node();
            leaf(b, NativeKind::SimpleName, Role::Other, "n");
            b.finish_node();
        });
        assert_eq!(array, "new int[n][]");

        let initialized = rendered(|b| {
            b.start_node(NativeKind::VariableDeclarationFragment, Role::Other, u);
            leaf(b, NativeKind::SimpleName, Role::Name, "xs");
            b.start_node(NativeKind::ArrayInitializer, Role::Other, u);
            leaf(b, NativeKind::NumberLiteral, Role::Other, "1");
            leaf(b, NativeKind::NumberLiteral, Role::Other, "2");
            b.finish_node();
            b.finish_node();
        });
        assert_eq!(initialized, "xs = {1, 2}");
    }

    #[test]
    fn text_prefers_source_slice() {
        let src = "x = foo( 1 );";
        let mut b = NativeTreeBuilder::new(src);
        b.leaf(NativeKind::NumberLiteral, Role::Other, SourceSpan::new(9, 1), NativeAttrs::token("1"));
        let tree = b.build().unwrap();
        assert_eq!(tree.text(tree.root()), "1");
    }

    struct Order(Vec<(char, NativeKind)>);
    impl NativeVisitor for Order {
        type Error = Infallible;
        fn enter(&mut self, tree: &NativeTree, id: NativeId) -> std::result::Result<VisitControl, Infallible> {
            self.0.push(('+', tree.kind(id)));
            Ok(if tree.kind(id) == NativeKind::QualifiedName { VisitControl::SkipChildren } else { VisitControl::Continue })
        }
        fn leave(&mut self, tree: &NativeTree, id: NativeId) -> std::result::Result<(), Infallible> {
            self.0.push(('-', tree.kind(id)));
            Ok(())
        }
    }

    #[test]
    fn walk_enters_and_leaves_in_order() {
        let tree = qualified_call();
        let mut v = Order(Vec::new());
        walk(&tree, tree.root(), &mut v).unwrap();
        let seq: Vec<char> = v.0.iter().map(|(c, _)| *c).collect();
        // call, qualified name (children skipped), c, x
        assert_eq!(seq, vec!['+', '+', '-', '+', '-', '+', '-', '-']);
        assert_eq!(v.0[1].1, NativeKind::QualifiedName);
    }
}
