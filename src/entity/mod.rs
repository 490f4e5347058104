/*!
# Entity Type Registry

Closed taxonomy of canonical node kinds. Each variant carries a legacy numeric
code (the JDT parser's node-type constant, `-1` for synthetic-only kinds)
and a flag telling the diff engine whether changes on that kind matter.
The per-variant payload lives in a static table indexed by the variant.
*/

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::native::NativeKind;

/// Legacy code of kinds with no native equivalent.
pub const SYNTHETIC_CODE: i32 = -1;

#[derive(Debug, Clone, Copy)]
struct EntityInfo {
    name: &'static str,
    legacy_code: i32,
    is_valid_change: bool,
}

macro_rules! entity_types {
    ($($variant:ident = ($name:literal, $code:literal, $valid:literal)),+ $(,)?) => {
        /// Canonical node kind.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "SCREAMING_SNAKE_CASE")]
        pub enum EntityType {
            $($variant),+
        }

        const TABLE: &[EntityInfo] = &[
            $(EntityInfo { name: $name, legacy_code: $code, is_valid_change: $valid }),+
        ];

        impl EntityType {
            /// All variants in declaration order.
            pub const ALL: &'static [EntityType] = &[$(EntityType::$variant),+];
        }
    };
}

entity_types! {
    AnnotationTypeDeclaration = ("ANNOTATION_TYPE_DECLARATION", 81, true),
    AnnotationTypeMemberDeclaration = ("ANNOTATION_TYPE_MEMBER_DECLARATION", 82, true),
    AnonymousClassDeclaration = ("ANONYMOUS_CLASS_DECLARATION", 1, true),
    Arguments = ("ARGUMENTS", 100, false),
    ArrayAccess = ("ARRAY_ACCESS", 2, true),
    ArrayCreation = ("ARRAY_CREATION", 3, true),
    ArrayDimension = ("ARRAY_DIMENSION", 85, true),
    ArrayInitializer = ("ARRAY_INITIALIZER", 4, true),
    ArrayType = ("ARRAY_TYPE", 5, true),
    AssertStatement = ("ASSERT_STATEMENT", 6, true),
    Assignment = ("ASSIGNMENT", 7, true),
    Attribute = ("ATTRIBUTE", -1, false),
    Block = ("BLOCK", 8, false),
    BlockComment = ("BLOCK_COMMENT", 64, true),
    Body = ("BODY", -1, false),
    BodyDeclarations = ("BODY_DECLARATIONS", -1, false),
    BooleanLiteral = ("BOOLEAN_LITERAL", 9, true),
    BreakStatement = ("BREAK_STATEMENT", 10, true),
    CastExpression = ("CAST_EXPRESSION", 11, true),
    CatchClause = ("CATCH_CLAUSE", 12, true),
    CatchClauses = ("CATCH_CLAUSES", -1, false),
    CharacterLiteral = ("CHARACTER_LITERAL", 13, true),
    Class = ("CLASS", -1, false),
    ClassInstanceCreation = ("CLASS_INSTANCE_CREATION", 14, true),
    CompilationUnit = ("COMPILATION_UNIT", 15, true),
    ConditionalForExpression = ("CONDITIONAL_FOR_EXPRESSION", 106, true),
    ConditionalExpression = ("CONDITIONAL_EXPRESSION", 16, true),
    ConstructorInvocation = ("CONSTRUCTOR_INVOCATION", 17, true),
    ContinueStatement = ("CONTINUE_STATEMENT", 18, true),
    DoStatement = ("DO_STATEMENT", 19, true),
    ElseStatement = ("ELSE_STATEMENT", 101, true),
    EmptyStatement = ("EMPTY_STATEMENT", 20, true),
    EnhancedForStatement = ("ENHANCED_FOR_STATEMENT", 70, true),
    EnumConstantDeclaration = ("ENUM_CONSTANT_DECLARATION", 72, true),
    EnumConstants = ("ENUM_CONSTANTS", -1, false),
    EnumDeclaration = ("ENUM_DECLARATION", 71, true),
    ExpressionStatement = ("EXPRESSION_STATEMENT", 21, true),
    ExtendedOperands = ("EXTENDED_OPERANDS", -1, false),
    FieldAccess = ("FIELD_ACCESS", 22, true),
    FieldDeclaration = ("FIELD_DECLARATION", 23, true),
    Finally = ("FINALLY", -1, false),
    ForStatement = ("FOR_STATEMENT", 24, true),
    Fragments = ("FRAGMENTS", -1, false),
    IfStatement = ("IF_STATEMENT", 25, true),
    ImportDeclaration = ("IMPORT_DECLARATION", 26, true),
    InfixExpression = ("INFIX_EXPRESSION", 27, true),
    Initializer = ("INITIALIZER", 28, true),
    Initializers = ("INITIALIZERS", 103, false),
    InstanceofExpression = ("INSTANCEOF_EXPRESSION", 62, true),
    Javadoc = ("JAVADOC", 29, true),
    LabeledStatement = ("LABELED_STATEMENT", 30, true),
    LineComment = ("LINE_COMMENT", 63, true),
    MarkerAnnotation = ("MARKER_ANNOTATION", 78, true),
    MemberRef = ("MEMBER_REF", 67, true),
    MemberValuePair = ("MEMBER_VALUE_PAIR", 80, true),
    Method = ("METHOD", -1, false),
    MethodDeclaration = ("METHOD_DECLARATION", 31, true),
    MethodInvocation = ("METHOD_INVOCATION", 32, true),
    MethodRef = ("METHOD_REF", 68, true),
    MethodRefParameter = ("METHOD_REF_PARAMETER", 69, true),
    Modifier = ("MODIFIER", 83, true),
    Modifiers = ("MODIFIERS", -1, false),
    NormalAnnotation = ("NORMAL_ANNOTATION", 77, true),
    NullLiteral = ("NULL_LITERAL", 33, true),
    NumberLiteral = ("NUMBER_LITERAL", 34, true),
    PackageDeclaration = ("PACKAGE_DECLARATION", 35, true),
    ParameterizedType = ("PARAMETERIZED_TYPE", 74, true),
    Parameters = ("PARAMETERS", -1, false),
    ParenthesizedExpression = ("PARENTHESIZED_EXPRESSION", 36, true),
    PostfixExpression = ("POSTFIX_EXPRESSION", 37, true),
    PrefixExpression = ("PREFIX_EXPRESSION", 38, true),
    PrimitiveType = ("PRIMITIVE_TYPE", 39, true),
    QualifiedName = ("QUALIFIED_NAME", 40, true),
    QualifiedType = ("QUALIFIED_TYPE", 75, true),
    ReturnStatement = ("RETURN_STATEMENT", 41, true),
    RootNode = ("ROOT_NODE", -1, true),
    SimpleName = ("SIMPLE_NAME", 42, true),
    SimpleType = ("SIMPLE_TYPE", 43, true),
    SingleMemberAnnotation = ("SINGLE_MEMBER_ANNOTATION", 79, true),
    SingleVariableDeclaration = ("SINGLE_VARIABLE_DECLARATION", 44, true),
    StringLiteral = ("STRING_LITERAL", 45, true),
    SuperClassType = ("SUPER_CLASS_TYPE", 105, true),
    SuperConstructorInvocation = ("SUPER_CONSTRUCTOR_INVOCATION", 46, true),
    SuperFieldAccess = ("SUPER_FIELD_ACCESS", 47, true),
    SuperInterfaceTypes = ("SUPER_INTERFACE_TYPES", 104, false),
    SuperMethodInvocation = ("SUPER_METHOD_INVOCATION", 48, true),
    SwitchCase = ("SWITCH_CASE", 49, true),
    SwitchStatement = ("SWITCH_STATEMENT", 50, true),
    SynchronizedStatement = ("SYNCHRONIZED_STATEMENT", 51, true),
    TagElement = ("TAG_ELEMENT", 65, true),
    TextElement = ("TEXT_ELEMENT", 66, true),
    ThenStatement = ("THEN_STATEMENT", -1, true),
    ThisExpression = ("THIS_EXPRESSION", 52, true),
    Throw = ("THROW", -1, false),
    ThrowStatement = ("THROW_STATEMENT", 53, true),
    TryStatement = ("TRY_STATEMENT", 54, true),
    TypeArguments = ("TYPE_ARGUMENTS", 107, false),
    TypeDeclaration = ("TYPE_DECLARATION", 55, true),
    TypeDeclarationStatement = ("TYPE_DECLARATION_STATEMENT", 56, true),
    TypeLiteral = ("TYPE_LITERAL", 57, true),
    TypeParameter = ("TYPE_PARAMETER", 73, true),
    Updaters = ("UPDATERS", 102, false),
    VariableDeclarationExpression = ("VARIABLE_DECLARATION_EXPRESSION", 58, true),
    VariableDeclarationFragment = ("VARIABLE_DECLARATION_FRAGMENT", 59, true),
    VariableDeclarationStatement = ("VARIABLE_DECLARATION_STATEMENT", 60, true),
    WhileStatement = ("WHILE_STATEMENT", 61, true),
    WildcardType = ("WILDCARD_TYPE", 76, true),
}

static BY_NAME: Lazy<HashMap<String, EntityType>> = Lazy::new(|| {
    let mut map = HashMap::with_capacity(EntityType::ALL.len() * 2);
    for &t in EntityType::ALL {
        map.insert(t.name().to_string(), t);
        map.insert(t.jdt_compliant_name(), t);
    }
    map
});

static BY_CODE: Lazy<HashMap<i32, EntityType>> = Lazy::new(|| {
    EntityType::ALL
        .iter()
        .filter(|t| !t.is_synthetic())
        .map(|&t| (t.legacy_code(), t))
        .collect()
});

/// Number of defined entity types.
pub fn number_of_types() -> usize { EntityType::ALL.len() }

impl EntityType {
    fn info(self) -> &'static EntityInfo { &TABLE[self as usize] }

    /// Stable identifier, e.g. `METHOD_INVOCATION`.
    pub fn name(self) -> &'static str { self.info().name }

    pub fn legacy_code(self) -> i32 { self.info().legacy_code }

    /// Whether a diff engine should report changes on this kind
    /// (e.g. changes inside a `finally` clause are ignored).
    pub fn is_valid_change(self) -> bool { self.info().is_valid_change }

    /// No native equivalent; only ever produced by the builder.
    pub fn is_synthetic(self) -> bool { self.legacy_code() == SYNTHETIC_CODE }

    /// True for exactly the type-expression kinds.
    pub fn is_type(self) -> bool {
        matches!(
            self,
            EntityType::ArrayType
                | EntityType::ParameterizedType
                | EntityType::PrimitiveType
                | EntityType::QualifiedType
                | EntityType::SimpleType
                | EntityType::WildcardType
        )
    }

    /// True for exactly the statement-level kinds.
    pub fn is_at_statement_level(self) -> bool {
        matches!(
            self,
            EntityType::AssertStatement
                | EntityType::Assignment
                | EntityType::BreakStatement
                | EntityType::CatchClause
                | EntityType::ClassInstanceCreation
                | EntityType::ConstructorInvocation
                | EntityType::ContinueStatement
                | EntityType::DoStatement
                | EntityType::Finally
                | EntityType::ForStatement
                | EntityType::IfStatement
                | EntityType::LabeledStatement
                | EntityType::MethodInvocation
                | EntityType::ReturnStatement
                | EntityType::SuperConstructorInvocation
                | EntityType::SuperMethodInvocation
                | EntityType::SwitchCase
                | EntityType::SwitchStatement
                | EntityType::SynchronizedStatement
                | EntityType::ThrowStatement
                | EntityType::TryStatement
                | EntityType::VariableDeclarationStatement
                | EntityType::WhileStatement
                | EntityType::EnhancedForStatement
        )
    }

    /// Name in the parser's capitalization convention (`METHOD_INVOCATION` -> `MethodInvocation`).
    pub fn jdt_compliant_name(self) -> String { jdt_compliant(self.name()) }

    pub fn from_legacy_code(code: i32) -> Option<EntityType> { BY_CODE.get(&code).copied() }

    /// Accepts both `METHOD_INVOCATION` and `MethodInvocation`.
    pub fn from_name(name: &str) -> Option<EntityType> { BY_NAME.get(name).copied() }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.name()) }
}

fn jdt_compliant(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    for part in name.split('_').filter(|p| !p.is_empty()) {
        let mut chars = part.chars();
        if let Some(first) = chars.next() {
            out.extend(first.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}

/// Entity type a native node of `kind` becomes when pushed by the default rule.
pub fn entity_type_of(kind: NativeKind) -> EntityType {
    match kind {
        NativeKind::AnonymousClassDeclaration => EntityType::AnonymousClassDeclaration,
        NativeKind::ArrayAccess => EntityType::ArrayAccess,
        NativeKind::ArrayCreation => EntityType::ArrayCreation,
        NativeKind::ArrayInitializer => EntityType::ArrayInitializer,
        NativeKind::ArrayType => EntityType::ArrayType,
        NativeKind::AssertStatement => EntityType::AssertStatement,
        NativeKind::Assignment => EntityType::Assignment,
        NativeKind::Block => EntityType::Block,
        NativeKind::BooleanLiteral => EntityType::BooleanLiteral,
        NativeKind::BreakStatement => EntityType::BreakStatement,
        NativeKind::CastExpression => EntityType::CastExpression,
        NativeKind::CatchClause => EntityType::CatchClause,
        NativeKind::CharacterLiteral => EntityType::CharacterLiteral,
        NativeKind::ClassInstanceCreation => EntityType::ClassInstanceCreation,
        NativeKind::CompilationUnit => EntityType::CompilationUnit,
        NativeKind::ConditionalExpression => EntityType::ConditionalExpression,
        NativeKind::ConstructorInvocation => EntityType::ConstructorInvocation,
        NativeKind::ContinueStatement => EntityType::ContinueStatement,
        NativeKind::DoStatement => EntityType::DoStatement,
        NativeKind::EmptyStatement => EntityType::EmptyStatement,
        NativeKind::ExpressionStatement => EntityType::ExpressionStatement,
        NativeKind::FieldAccess => EntityType::FieldAccess,
        NativeKind::FieldDeclaration => EntityType::FieldDeclaration,
        NativeKind::ForStatement => EntityType::ForStatement,
        NativeKind::IfStatement => EntityType::IfStatement,
        NativeKind::ImportDeclaration => EntityType::ImportDeclaration,
        NativeKind::InfixExpression => EntityType::InfixExpression,
        NativeKind::Initializer => EntityType::Initializer,
        NativeKind::Javadoc => EntityType::Javadoc,
        NativeKind::LabeledStatement => EntityType::LabeledStatement,
        NativeKind::MethodDeclaration => EntityType::MethodDeclaration,
        NativeKind::MethodInvocation => EntityType::MethodInvocation,
        NativeKind::NullLiteral => EntityType::NullLiteral,
        NativeKind::NumberLiteral => EntityType::NumberLiteral,
        NativeKind::PackageDeclaration => EntityType::PackageDeclaration,
        NativeKind::ParenthesizedExpression => EntityType::ParenthesizedExpression,
        NativeKind::PostfixExpression => EntityType::PostfixExpression,
        NativeKind::PrefixExpression => EntityType::PrefixExpression,
        NativeKind::PrimitiveType => EntityType::PrimitiveType,
        NativeKind::QualifiedName => EntityType::QualifiedName,
        NativeKind::ReturnStatement => EntityType::ReturnStatement,
        NativeKind::SimpleName => EntityType::SimpleName,
        NativeKind::SimpleType => EntityType::SimpleType,
        NativeKind::SingleVariableDeclaration => EntityType::SingleVariableDeclaration,
        NativeKind::StringLiteral => EntityType::StringLiteral,
        NativeKind::SuperConstructorInvocation => EntityType::SuperConstructorInvocation,
        NativeKind::SuperFieldAccess => EntityType::SuperFieldAccess,
        NativeKind::SuperMethodInvocation => EntityType::SuperMethodInvocation,
        NativeKind::SwitchCase => EntityType::SwitchCase,
        NativeKind::SwitchStatement => EntityType::SwitchStatement,
        NativeKind::SynchronizedStatement => EntityType::SynchronizedStatement,
        NativeKind::ThisExpression => EntityType::ThisExpression,
        NativeKind::ThrowStatement => EntityType::ThrowStatement,
        NativeKind::TryStatement => EntityType::TryStatement,
        NativeKind::TypeDeclaration => EntityType::TypeDeclaration,
        NativeKind::TypeDeclarationStatement => EntityType::TypeDeclarationStatement,
        NativeKind::TypeLiteral => EntityType::TypeLiteral,
        NativeKind::VariableDeclarationExpression => EntityType::VariableDeclarationExpression,
        NativeKind::VariableDeclarationFragment => EntityType::VariableDeclarationFragment,
        NativeKind::VariableDeclarationStatement => EntityType::VariableDeclarationStatement,
        NativeKind::WhileStatement => EntityType::WhileStatement,
        NativeKind::InstanceofExpression => EntityType::InstanceofExpression,
        NativeKind::LineComment => EntityType::LineComment,
        NativeKind::BlockComment => EntityType::BlockComment,
        NativeKind::TagElement => EntityType::TagElement,
        NativeKind::TextElement => EntityType::TextElement,
        NativeKind::MemberRef => EntityType::MemberRef,
        NativeKind::MethodRef => EntityType::MethodRef,
        NativeKind::MethodRefParameter => EntityType::MethodRefParameter,
        NativeKind::EnhancedForStatement => EntityType::EnhancedForStatement,
        NativeKind::EnumDeclaration => EntityType::EnumDeclaration,
        NativeKind::EnumConstantDeclaration => EntityType::EnumConstantDeclaration,
        NativeKind::TypeParameter => EntityType::TypeParameter,
        NativeKind::ParameterizedType => EntityType::ParameterizedType,
        NativeKind::QualifiedType => EntityType::QualifiedType,
        NativeKind::WildcardType => EntityType::WildcardType,
        NativeKind::NormalAnnotation => EntityType::NormalAnnotation,
        NativeKind::MarkerAnnotation => EntityType::MarkerAnnotation,
        NativeKind::SingleMemberAnnotation => EntityType::SingleMemberAnnotation,
        NativeKind::MemberValuePair => EntityType::MemberValuePair,
        NativeKind::AnnotationTypeDeclaration => EntityType::AnnotationTypeDeclaration,
        NativeKind::AnnotationTypeMemberDeclaration => EntityType::AnnotationTypeMemberDeclaration,
        NativeKind::Modifier => EntityType::Modifier,
        NativeKind::Dimension => EntityType::ArrayDimension,
    }
}

/// One row of the exported registry table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub name: String,
    pub legacy_code: i32,
    pub is_valid_change: bool,
}

/// `(name, legacyCode, isValidChange)` rows in declaration order, for tools
/// keyed on the legacy numeric scheme.
pub fn registry_table() -> Vec<RegistryEntry> {
    EntityType::ALL
        .iter()
        .map(|t| RegistryEntry { name: t.name().to_string(), legacy_code: t.legacy_code(), is_valid_change: t.is_valid_change() })
        .collect()
}
