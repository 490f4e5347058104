//! JSON interchange format for native trees.
//!
//! ```json
//! { "source": "class A {}",
//!   "root": { "kind": "CompilationUnit", "start": 0, "length": 10,
//!             "children": [ { "kind": "TypeDeclaration", "role": "other", ... } ] } }
//! ```

use serde::{Deserialize, Serialize};

use super::{NativeAttrs, NativeId, NativeKind, NativeTree, NativeTreeBuilder, Role};
use crate::core::{Result, SourceSpan, TreeGenError, UNKNOWN_OFFSET};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeDocument {
    /// Full source text of the compilation unit.
    #[serde(default)]
    pub source: String,
    pub root: NativeNodeJson,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NativeNodeJson {
    pub kind: String,
    #[serde(default = "unknown_offset")]
    pub start: i32,
    #[serde(default = "unknown_offset")]
    pub length: i32,
    #[serde(default)]
    pub role: Role,
    #[serde(flatten)]
    pub attrs: NativeAttrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NativeNodeJson>,
}

fn unknown_offset() -> i32 { UNKNOWN_OFFSET }

impl NativeDocument {
    /// Rebuilds the arena; kinds were already checked by deserialization.
    pub fn into_tree(self) -> Result<NativeTree> {
        let mut b = NativeTreeBuilder::new(self.source);
        push_node_json(&mut b, &self.root)?;
        b.build()
    }

    /// Nested document for a tree, e.g. to dump a tree built in code.
    pub fn from_tree(tree: &NativeTree) -> Self {
        Self { source: tree.source().to_string(), root: node_json(tree, tree.root()) }
    }
}

fn push_node_json(b: &mut NativeTreeBuilder, node: &NativeNodeJson) -> Result<()> {
    let kind = NativeKind::from_name(&node.kind).ok_or_else(|| TreeGenError::UnknownKind(node.kind.clone()))?;
    let span = SourceSpan::new(node.start, node.length);
    b.start_node_with(kind, node.role, span, node.attrs.clone());
    for child in &node.children {
        push_node_json(b, child)?;
    }
    b.finish_node();
    Ok(())
}

fn node_json(tree: &NativeTree, id: NativeId) -> NativeNodeJson {
    let node = tree.node(id);
    NativeNodeJson {
        kind: node.kind.name().to_string(),
        start: node.span.start,
        length: node.span.length,
        role: node.role,
        attrs: node.attrs.clone(),
        children: node.children.iter().map(|c| node_json(tree, *c)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const IMPORT: &str = r#"{
        "source": "import static java.lang.Math.max;",
        "root": { "kind": "CompilationUnit", "start": 0, "length": 33, "children": [
            { "kind": "ImportDeclaration", "start": 0, "length": 33, "is_static": true, "children": [
                { "kind": "QualifiedName", "role": "name", "start": 14, "length": 18, "token": "java.lang.Math.max" }
            ]}
        ]}
    }"#;

    #[test]
    fn loads_nested_document() {
        let tree = NativeTree::from_json(IMPORT).unwrap();
        assert_eq!(tree.len(), 3);
        let import = tree.children(tree.root())[0];
        assert_eq!(tree.kind(import), NativeKind::ImportDeclaration);
        let parts = tree.import_parts(import).unwrap();
        assert!(parts.is_static);
        assert!(!parts.is_on_demand);
        let name = parts.name;
        assert_eq!(tree.text(name), "java.lang.Math.max");
    }

    #[test]
    fn defaults_apply_to_missing_fields() {
        let tree = NativeTree::from_json(r#"{ "root": { "kind": "Block" } }"#).unwrap();
        let root = tree.node(tree.root());
        assert_eq!(root.span, SourceSpan::UNKNOWN);
        assert_eq!(root.role, Role::Other);
        assert_eq!(tree.source(), "");
    }

    #[test]
    fn unknown_kind_is_rejected() {
        let err = NativeTree::from_json(r#"{ "root": { "kind": "LambdaExpression" } }"#).unwrap_err();
        assert!(matches!(err, TreeGenError::UnknownKind(ref k) if k == "LambdaExpression"));
    }

    #[test]
    fn document_survives_round_trip() {
        let tree = NativeTree::from_json(IMPORT).unwrap();
        let json = serde_json::to_string(&NativeDocument::from_tree(&tree)).unwrap();
        let again = NativeTree::from_json(&json).unwrap();
        assert_eq!(again.len(), tree.len());
        assert!(again.import_parts(again.children(again.root())[0]).unwrap().is_static);
    }
}
