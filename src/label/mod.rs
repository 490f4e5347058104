//! Label extraction: native node -> canonical label string.
//!
//! Total and independent of traversal state; unknown or label-less kinds
//! yield the empty string.

use crate::native::{NativeId, NativeKind, NativeTree};

pub const INTERFACE: &str = "interface";
pub const CLASS: &str = "class";
pub const ON_DEMAND: &str = "on-demand";
pub const SINGLE_TYPE: &str = "single-type";
pub const DEFAULT_CASE: &str = "default";

pub fn label_of(tree: &NativeTree, id: NativeId) -> String {
    let node = tree.node(id);
    let token = || node.attrs.token.clone();
    match node.kind {
        NativeKind::SimpleName => token().unwrap_or_else(|| tree.text(id)),
        // Fully qualified form, never split into parts.
        NativeKind::QualifiedName => {
            token().unwrap_or_else(|| tree.text(id).chars().filter(|c| !c.is_whitespace()).collect())
        }
        NativeKind::ArrayType
        | NativeKind::ParameterizedType
        | NativeKind::PrimitiveType
        | NativeKind::QualifiedType
        | NativeKind::SimpleType
        | NativeKind::WildcardType => tree.text(id),
        NativeKind::Modifier
        | NativeKind::StringLiteral
        | NativeKind::NumberLiteral
        | NativeKind::CharacterLiteral
        | NativeKind::BooleanLiteral
        | NativeKind::TextElement => token().unwrap_or_else(|| tree.text(id)),
        NativeKind::InfixExpression
        | NativeKind::PrefixExpression
        | NativeKind::PostfixExpression
        | NativeKind::Assignment => token().unwrap_or_default(),
        // Tag-less elements (the javadoc body) have no name.
        NativeKind::TagElement => token().unwrap_or_default(),
        NativeKind::TypeDeclaration => {
            if node.attrs.is_interface { INTERFACE } else { CLASS }.to_string()
        }
        NativeKind::ImportDeclaration => {
            if node.attrs.is_on_demand { ON_DEMAND } else { SINGLE_TYPE }.to_string()
        }
        NativeKind::SwitchCase => {
            if node.attrs.is_default { DEFAULT_CASE.to_string() } else { String::new() }
        }
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceSpan;
    use crate::native::{NativeAttrs, NativeTreeBuilder, Role};

    fn single(kind: NativeKind, source: &str, span: SourceSpan, attrs: NativeAttrs) -> String {
        let mut b = NativeTreeBuilder::new(source);
        b.leaf(kind, Role::Other, span, attrs);
        let tree = b.build().unwrap();
        label_of(&tree, tree.root())
    }

    #[test]
    fn textual_kinds() {
        let u = SourceSpan::UNKNOWN;
        assert_eq!(single(NativeKind::SimpleName, "", u, NativeAttrs::token("foo")), "foo");
        assert_eq!(single(NativeKind::StringLiteral, "", u, NativeAttrs::token("\"a\\n\"")), "\"a\\n\"");
        assert_eq!(single(NativeKind::CharacterLiteral, "", u, NativeAttrs::token("'\\t'")), "'\\t'");
        assert_eq!(single(NativeKind::NumberLiteral, "", u, NativeAttrs::token("0x1F")), "0x1F");
        assert_eq!(single(NativeKind::BooleanLiteral, "", u, NativeAttrs::token("false")), "false");
        assert_eq!(single(NativeKind::Modifier, "", u, NativeAttrs::token("public")), "public");
        assert_eq!(single(NativeKind::InfixExpression, "", u, NativeAttrs::token("&&")), "&&");
        assert_eq!(single(NativeKind::Assignment, "", u, NativeAttrs::token("+=")), "+=");
        assert_eq!(single(NativeKind::TagElement, "", u, NativeAttrs::token("@param")), "@param");
        assert_eq!(single(NativeKind::TagElement, "", u, NativeAttrs::default()), "");
    }

    #[test]
    fn types_and_qualified_names_use_source_text() {
        let src = "java.util.List<String> x";
        assert_eq!(single(NativeKind::ParameterizedType, src, SourceSpan::new(0, 22), NativeAttrs::default()), "java.util.List<String>");
        assert_eq!(single(NativeKind::QualifiedName, "a . b", SourceSpan::new(0, 5), NativeAttrs::default()), "a.b");
    }

    fn simple_type(b: &mut NativeTreeBuilder, name: &str) {
        b.start_node(NativeKind::SimpleType, Role::Other, SourceSpan::UNKNOWN);
        b.leaf(NativeKind::SimpleName, Role::Name, SourceSpan::UNKNOWN, NativeAttrs::token(name));
        b.finish_node();
    }

    #[test]
    fn type_labels_render_without_source() {
        let u = SourceSpan::UNKNOWN;
        let mut b = NativeTreeBuilder::new("");
        b.start_node(NativeKind::ParameterizedType, Role::Other, u);
        simple_type(&mut b, "Map");
        simple_type(&mut b, "String");
        b.start_node(NativeKind::WildcardType, Role::Other, u);
        b.start_node(NativeKind::ArrayType, Role::Other, u);
        b.leaf(NativeKind::PrimitiveType, Role::Other, u, NativeAttrs::token("int"));
        b.finish_node();
        b.finish_node();
        b.finish_node();
        let tree = b.build().unwrap();
        assert_eq!(label_of(&tree, tree.root()), "Map<String, ? extends int[]>");

        assert_eq!(single(NativeKind::WildcardType, "", u, NativeAttrs::default()), "?");
        let mut b = NativeTreeBuilder::new("");
        b.start_node(NativeKind::WildcardType, Role::Other, u);
        b.start_node(NativeKind::WildcardType, Role::Other, u);
        b.finish_node();
        b.finish_node();
        let tree = b.build().unwrap();
        assert_eq!(label_of(&tree, tree.root()), "? extends ?");
    }

    #[test]
    fn lower_bounded_wildcard_uses_super() {
        let u = SourceSpan::UNKNOWN;
        let mut b = NativeTreeBuilder::new("");
        b.start_node_with(NativeKind::WildcardType, Role::Other, u, NativeAttrs::token("super"));
        simple_type(&mut b, "Number");
        b.finish_node();
        let tree = b.build().unwrap();
        assert_eq!(label_of(&tree, tree.root()), "? super Number");
    }

    #[test]
    fn flag_driven_labels() {
        let u = SourceSpan::UNKNOWN;
        assert_eq!(single(NativeKind::TypeDeclaration, "", u, NativeAttrs::default().with_interface()), "interface");
        assert_eq!(single(NativeKind::TypeDeclaration, "", u, NativeAttrs::default()), "class");
        assert_eq!(single(NativeKind::ImportDeclaration, "", u, NativeAttrs::default().with_on_demand()), "on-demand");
        assert_eq!(single(NativeKind::ImportDeclaration, "", u, NativeAttrs::default()), "single-type");
        assert_eq!(single(NativeKind::SwitchCase, "", u, NativeAttrs::default().with_default()), "default");
        assert_eq!(single(NativeKind::SwitchCase, "", u, NativeAttrs::default()), "");
    }

    #[test]
    fn other_kinds_are_unlabeled_and_deterministic() {
        let u = SourceSpan::UNKNOWN;
        assert_eq!(single(NativeKind::Block, "{}", SourceSpan::new(0, 2), NativeAttrs::token("ignored")), "");
        assert_eq!(single(NativeKind::MethodInvocation, "", u, NativeAttrs::default()), "");
        let a = single(NativeKind::SimpleName, "", u, NativeAttrs::token("x"));
        let b = single(NativeKind::SimpleName, "", u, NativeAttrs::token("x"));
        assert_eq!(a, b);
    }
}
