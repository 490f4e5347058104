//! Typed views over the constructs the converter reshapes.

use super::{NativeId, NativeKind, NativeTree, Role};
use crate::core::Result;

/// Condition, then branch and optional else branch of an `if`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IfParts {
    pub condition: NativeId,
    pub then_branch: NativeId,
    pub else_branch: Option<NativeId>,
}

/// Direct or super-qualified method call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallParts {
    pub receiver: Option<NativeId>,
    pub type_arguments: Vec<NativeId>,
    pub name: NativeId,
    pub arguments: Vec<NativeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeDeclarationParts {
    pub modifiers: Vec<NativeId>,
    pub name: NativeId,
    pub superclass: Option<NativeId>,
    pub super_interfaces: Vec<NativeId>,
    pub body_declarations: Vec<NativeId>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportParts {
    pub name: NativeId,
    pub is_static: bool,
    pub is_on_demand: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForParts {
    pub initializers: Vec<NativeId>,
    pub condition: Option<NativeId>,
    pub updaters: Vec<NativeId>,
    pub body: NativeId,
}

impl NativeTree {
    /// `MissingChild` when the condition or the then branch is absent.
    pub fn if_parts(&self, id: NativeId) -> Result<IfParts> {
        Ok(IfParts {
            condition: self.required_child(id, Role::Expression)?,
            then_branch: self.required_child(id, Role::ThenStatement)?,
            else_branch: self.child_with_role(id, Role::ElseStatement),
        })
    }

    /// Super calls never report a receiver; `super` is implied by the kind, and an
    /// `Outer.super.m()` qualifier is ignored.
    pub fn call_parts(&self, id: NativeId) -> Result<CallParts> {
        let receiver = match self.kind(id) {
            NativeKind::SuperMethodInvocation => None,
            _ => self.child_with_role(id, Role::Expression),
        };
        Ok(CallParts {
            receiver,
            type_arguments: self.children_with_role(id, Role::TypeArguments).collect(),
            name: self.required_child(id, Role::Name)?,
            arguments: self.children_with_role(id, Role::Arguments).collect(),
        })
    }

    /// Only the name is required. Javadoc and type parameters are not reported.
    pub fn type_declaration_parts(&self, id: NativeId) -> Result<TypeDeclarationParts> {
        Ok(TypeDeclarationParts {
            modifiers: self.children_with_role(id, Role::Modifiers).collect(),
            name: self.required_child(id, Role::Name)?,
            superclass: self.child_with_role(id, Role::SuperclassType),
            super_interfaces: self.children_with_role(id, Role::SuperInterfaceTypes).collect(),
            body_declarations: self.children_with_role(id, Role::BodyDeclarations).collect(),
        })
    }

    /// Clauses of a counted loop; every header clause may be empty, the body may not.
    pub fn for_parts(&self, id: NativeId) -> Result<ForParts> {
        Ok(ForParts {
            initializers: self.children_with_role(id, Role::Initializers).collect(),
            condition: self.child_with_role(id, Role::Expression),
            updaters: self.children_with_role(id, Role::Updaters).collect(),
            body: self.required_child(id, Role::Body)?,
        })
    }

    /// Imported name plus the static and on-demand flags.
    pub fn import_parts(&self, id: NativeId) -> Result<ImportParts> {
        let attrs = &self.node(id).attrs;
        Ok(ImportParts {
            name: self.required_child(id, Role::Name)?,
            is_static: attrs.is_static,
            is_on_demand: attrs.is_on_demand,
        })
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{SourceSpan, TreeGenError};
    use crate::native::{NativeAttrs, NativeKind, NativeTreeBuilder, Role};

    #[test]
    fn if_without_then_is_malformed() {
        let mut b = NativeTreeBuilder::new("");
        b.start_node(NativeKind::IfStatement, Role::Other, SourceSpan::new(3, 10));
        b.leaf(NativeKind::BooleanLiteral, Role::Expression, SourceSpan::UNKNOWN, NativeAttrs::token("true"));
        b.finish_node();
        let tree = b.build().unwrap();
        match tree.if_parts(tree.root()) {
            Err(TreeGenError::MissingChild { kind, role, offset }) => {
                assert_eq!(kind, NativeKind::IfStatement);
                assert_eq!(role, Role::ThenStatement);
                assert_eq!(offset, 3);
            }
            other => panic!("expected MissingChild, got {other:?}"),
        }
    }

    #[test]
    fn import_without_name_is_malformed() {
        let mut b = NativeTreeBuilder::new("");
        b.leaf(NativeKind::ImportDeclaration, Role::Other, SourceSpan::new(0, 7), NativeAttrs::default().with_static());
        let tree = b.build().unwrap();
        assert!(matches!(
            tree.import_parts(tree.root()),
            Err(TreeGenError::MissingChild { kind: NativeKind::ImportDeclaration, role: Role::Name, offset: 0 })
        ));
    }

    #[test]
    fn super_call_qualifier_is_not_a_receiver() {
        // Outer.super.m(x)
        let mut b = NativeTreeBuilder::new("");
        b.start_node(NativeKind::SuperMethodInvocation, Role::Other, SourceSpan::UNKNOWN);
        b.leaf(NativeKind::SimpleName, Role::Expression, SourceSpan::UNKNOWN, NativeAttrs::token("Outer"));
        let name = b.leaf(NativeKind::SimpleName, Role::Name, SourceSpan::UNKNOWN, NativeAttrs::token("m"));
        let arg = b.leaf(NativeKind::SimpleName, Role::Arguments, SourceSpan::UNKNOWN, NativeAttrs::token("x"));
        b.finish_node();
        let tree = b.build().unwrap();
        let parts = tree.call_parts(tree.root()).unwrap();
        assert_eq!(parts.receiver, None);
        assert_eq!(parts.name, name);
        assert_eq!(parts.arguments, vec![arg]);
        assert_eq!(tree.text(tree.root()), "super.m(x)");
    }

    #[test]
    fn for_parts_collects_clauses_in_order() {
        let mut b = NativeTreeBuilder::new("");
        b.start_node(NativeKind::ForStatement, Role::Other, SourceSpan::UNKNOWN);
        let i1 = b.leaf(NativeKind::Assignment, Role::Initializers, SourceSpan::UNKNOWN, NativeAttrs::token("="));
        let i2 = b.leaf(NativeKind::Assignment, Role::Initializers, SourceSpan::UNKNOWN, NativeAttrs::token("="));
        let body = b.leaf(NativeKind::Block, Role::Body, SourceSpan::UNKNOWN, NativeAttrs::default());
        b.finish_node();
        let tree = b.build().unwrap();
        let parts = tree.for_parts(tree.root()).unwrap();
        assert_eq!(parts.initializers, vec![i1, i2]);
        assert_eq!(parts.condition, None);
        assert!(parts.updaters.is_empty());
        assert_eq!(parts.body, body);
    }
}
