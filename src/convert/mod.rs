/*!
# Traversal driver

Walks a [`NativeTree`] and builds the [`CanonicalTree`]. Every native node is
pushed on enter and popped on leave. A handful of kinds take over the
traversal of their own children to reshape the canonical tree:

- `IfStatement`: condition, then-branch, else-branch under `ELSE_STATEMENT`
- `MethodInvocation` / `SuperMethodInvocation`: opaque text leaves for
  receiver, type arguments, name and arguments
- `ImportDeclaration`: leading `MODIFIER "static"` leaf for static imports
- `TypeDeclaration`: modifiers, name leaf, `SUPER_CLASS_TYPE`,
  `SUPER_INTERFACE_TYPES`, body declarations
- `ForStatement`: `INITIALIZERS`, `CONDITIONAL_FOR_EXPRESSION`, `UPDATERS`
- `QualifiedName`: never descended into

Each nested traversal step is checked for bracket discipline: the builder
stack depth on exit must equal the depth on entry.
*/

use tracing::{debug, trace};

use crate::canonical::{CanonicalTree, TreeBuilder};
use crate::core::{Result, SourceSpan, TreeGenError, UNKNOWN_OFFSET};
use crate::entity::EntityType;
use crate::label::label_of;
use crate::native::{walk, NativeId, NativeKind, NativeTree, NativeVisitor, VisitControl};

const STATIC: &str = "static";

/// Convert one compilation unit.
pub fn convert(tree: &NativeTree) -> Result<CanonicalTree> {
    Converter::new().run(tree)
}

/// One conversion run: owns the builder stack, never reused.
#[derive(Debug, Default)]
pub struct Converter {
    builder: TreeBuilder,
    reshaped: usize,
}

impl Converter {
    pub fn new() -> Self { Self::default() }

    /// Converts the whole unit. Consumes the converter so a run is never resumed after an error.
    pub fn run(mut self, tree: &NativeTree) -> Result<CanonicalTree> {
        self.accept(tree, tree.root())?;
        let reshaped = self.reshaped;
        let canonical = self.builder.build()?;
        debug!(
            native_nodes = tree.len(),
            nodes = canonical.len(),
            synthetic = canonical.synthetic_count(),
            reshaped,
            "converted compilation unit"
        );
        Ok(canonical)
    }

    /// Recursive visit of one native subtree, bracket-checked.
    fn accept(&mut self, tree: &NativeTree, id: NativeId) -> Result<()> {
        self.bracketed(tree, id, |conv| walk(tree, id, conv))
    }

    /// Runs `step` for the subtree at `id`; the stack depth must be the same after it as before.
    fn bracketed<F>(&mut self, tree: &NativeTree, id: NativeId, step: F) -> Result<()>
    where
        F: FnOnce(&mut Self) -> Result<()>,
    {
        let before = self.builder.depth();
        step(self)?;
        let after = self.builder.depth();
        if before != after {
            let node = tree.node(id);
            return Err(TreeGenError::BracketViolation { kind: node.kind, offset: node.span.start, before, after });
        }
        Ok(())
    }

    fn accept_all(&mut self, tree: &NativeTree, ids: &[NativeId]) -> Result<()> {
        ids.iter().try_for_each(|&id| self.accept(tree, id))
    }

    fn fake_leaf(&mut self, entity: EntityType, label: &str, span: SourceSpan) -> Result<()> {
        self.builder.push_fake_node(entity, label, span.start, span.length)?;
        self.builder.pop_node()?;
        Ok(())
    }

    /// Opaque text leaf; the length is that of the text, the start unknown.
    fn text_leaf(&mut self, text: &str) -> Result<()> {
        self.fake_leaf(EntityType::SimpleName, text, SourceSpan::detached(text.len()))
    }

    /// Synthetic wrapper around the converted subtrees of `ids`.
    fn wrapped(&mut self, tree: &NativeTree, entity: EntityType, ids: &[NativeId]) -> Result<()> {
        self.builder.push_fake_node(entity, "", UNKNOWN_OFFSET, UNKNOWN_OFFSET)?;
        self.accept_all(tree, ids)?;
        self.builder.pop_node()?;
        Ok(())
    }

    /// Synthetic container of opaque text leaves; containers carry length 0.
    fn text_container(&mut self, tree: &NativeTree, entity: EntityType, ids: &[NativeId]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        self.builder.push_fake_node(entity, "", UNKNOWN_OFFSET, 0)?;
        for &id in ids {
            self.text_leaf(&tree.text(id))?;
        }
        self.builder.pop_node()?;
        Ok(())
    }

    fn convert_if(&mut self, tree: &NativeTree, id: NativeId) -> Result<()> {
        let parts = tree.if_parts(id)?;
        self.accept(tree, parts.condition)?;
        self.accept(tree, parts.then_branch)?;
        if let Some(else_branch) = parts.else_branch {
            trace!(offset = tree.node(id).span.start, "wrapping else branch");
            self.wrapped(tree, EntityType::ElseStatement, &[else_branch])?;
        }
        Ok(())
    }

    fn convert_call(&mut self, tree: &NativeTree, id: NativeId) -> Result<()> {
        let parts = tree.call_parts(id)?;
        trace!(offset = tree.node(id).span.start, arguments = parts.arguments.len(), "flattening call");
        if let Some(receiver) = parts.receiver {
            self.text_leaf(&tree.text(receiver))?;
        }
        self.text_container(tree, EntityType::TypeArguments, &parts.type_arguments)?;
        self.text_leaf(&tree.text(parts.name))?;
        self.text_container(tree, EntityType::Arguments, &parts.arguments)?;
        Ok(())
    }

    fn mark_static_import(&mut self, tree: &NativeTree, id: NativeId) -> Result<()> {
        let parts = tree.import_parts(id)?;
        if parts.is_static {
            let start = tree.source().find(STATIC).map_or(UNKNOWN_OFFSET, |pos| pos as i32);
            trace!(start, "static import modifier");
            self.fake_leaf(EntityType::Modifier, STATIC, SourceSpan::new(start, STATIC.len() as i32))?;
        }
        Ok(())
    }

    fn convert_type_declaration(&mut self, tree: &NativeTree, id: NativeId) -> Result<()> {
        let parts = tree.type_declaration_parts(id)?;
        for &modifier in &parts.modifiers {
            let node = tree.node(modifier);
            match node.kind {
                NativeKind::Modifier => self.accept(tree, modifier)?,
                kind if kind.is_annotation() => self.accept(tree, modifier)?,
                found => return Err(TreeGenError::UnexpectedModifier { found, offset: node.span.start }),
            }
        }
        self.fake_leaf(EntityType::SimpleName, &tree.text(parts.name), SourceSpan::UNKNOWN)?;
        if let Some(superclass) = parts.superclass {
            self.wrapped(tree, EntityType::SuperClassType, &[superclass])?;
        }
        if !parts.super_interfaces.is_empty() {
            self.wrapped(tree, EntityType::SuperInterfaceTypes, &parts.super_interfaces)?;
        }
        self.accept_all(tree, &parts.body_declarations)
    }

    fn convert_for(&mut self, tree: &NativeTree, id: NativeId) -> Result<()> {
        let parts = tree.for_parts(id)?;
        if !parts.initializers.is_empty() {
            self.wrapped(tree, EntityType::Initializers, &parts.initializers)?;
        }
        if let Some(condition) = parts.condition {
            self.wrapped(tree, EntityType::ConditionalForExpression, &[condition])?;
        }
        if !parts.updaters.is_empty() {
            self.wrapped(tree, EntityType::Updaters, &parts.updaters)?;
        }
        self.accept(tree, parts.body)
    }
}

impl NativeVisitor for Converter {
    type Error = TreeGenError;

    fn enter(&mut self, tree: &NativeTree, id: NativeId) -> Result<VisitControl> {
        self.builder.push_node(tree, id, label_of(tree, id))?;
        let kind = tree.kind(id);
        let reshaped = match kind {
            NativeKind::IfStatement => {
                self.convert_if(tree, id)?;
                true
            }
            NativeKind::MethodInvocation | NativeKind::SuperMethodInvocation => {
                self.convert_call(tree, id)?;
                true
            }
            NativeKind::TypeDeclaration => {
                self.convert_type_declaration(tree, id)?;
                true
            }
            NativeKind::ForStatement => {
                self.convert_for(tree, id)?;
                true
            }
            NativeKind::ImportDeclaration => {
                self.mark_static_import(tree, id)?;
                false
            }
            NativeKind::QualifiedName => return Ok(VisitControl::SkipChildren),
            // Tag elements always descend, like every other default kind.
            NativeKind::TagElement => false,
            NativeKind::AnonymousClassDeclaration
            | NativeKind::ArrayAccess
            | NativeKind::ArrayCreation
            | NativeKind::ArrayInitializer
            | NativeKind::ArrayType
            | NativeKind::AssertStatement
            | NativeKind::Assignment
            | NativeKind::Block
            | NativeKind::BooleanLiteral
            | NativeKind::BreakStatement
            | NativeKind::CastExpression
            | NativeKind::CatchClause
            | NativeKind::CharacterLiteral
            | NativeKind::ClassInstanceCreation
            | NativeKind::CompilationUnit
            | NativeKind::ConditionalExpression
            | NativeKind::ConstructorInvocation
            | NativeKind::ContinueStatement
            | NativeKind::DoStatement
            | NativeKind::EmptyStatement
            | NativeKind::ExpressionStatement
            | NativeKind::FieldAccess
            | NativeKind::FieldDeclaration
            | NativeKind::InfixExpression
            | NativeKind::Initializer
            | NativeKind::Javadoc
            | NativeKind::LabeledStatement
            | NativeKind::MethodDeclaration
            | NativeKind::NullLiteral
            | NativeKind::NumberLiteral
            | NativeKind::PackageDeclaration
            | NativeKind::ParenthesizedExpression
            | NativeKind::PostfixExpression
            | NativeKind::PrefixExpression
            | NativeKind::PrimitiveType
            | NativeKind::ReturnStatement
            | NativeKind::SimpleName
            | NativeKind::SimpleType
            | NativeKind::SingleVariableDeclaration
            | NativeKind::StringLiteral
            | NativeKind::SuperConstructorInvocation
            | NativeKind::SuperFieldAccess
            | NativeKind::SwitchCase
            | NativeKind::SwitchStatement
            | NativeKind::SynchronizedStatement
            | NativeKind::ThisExpression
            | NativeKind::ThrowStatement
            | NativeKind::TryStatement
            | NativeKind::TypeDeclarationStatement
            | NativeKind::TypeLiteral
            | NativeKind::VariableDeclarationExpression
            | NativeKind::VariableDeclarationFragment
            | NativeKind::VariableDeclarationStatement
            | NativeKind::WhileStatement
            | NativeKind::InstanceofExpression
            | NativeKind::LineComment
            | NativeKind::BlockComment
            | NativeKind::TextElement
            | NativeKind::MemberRef
            | NativeKind::MethodRef
            | NativeKind::MethodRefParameter
            | NativeKind::EnhancedForStatement
            | NativeKind::EnumDeclaration
            | NativeKind::EnumConstantDeclaration
            | NativeKind::TypeParameter
            | NativeKind::ParameterizedType
            | NativeKind::QualifiedType
            | NativeKind::WildcardType
            | NativeKind::NormalAnnotation
            | NativeKind::MarkerAnnotation
            | NativeKind::SingleMemberAnnotation
            | NativeKind::MemberValuePair
            | NativeKind::AnnotationTypeDeclaration
            | NativeKind::AnnotationTypeMemberDeclaration
            | NativeKind::Modifier
            | NativeKind::Dimension => false,
        };
        if reshaped {
            self.reshaped += 1;
            Ok(VisitControl::SkipChildren)
        } else {
            Ok(VisitControl::Continue)
        }
    }

    fn leave(&mut self, _tree: &NativeTree, _id: NativeId) -> Result<()> {
        self.builder.pop_node().map(|_| ())
    }
}
