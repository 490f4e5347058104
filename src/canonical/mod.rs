//! Canonical tree: the ordered, labeled tree handed to a structural diff engine.
//!
//! Nodes live in an arena addressed by [`NodeId`]; a child refers to its parent
//! by index. Nothing is mutable once the builder hands the tree over.

pub mod builder;

use serde::ser::{SerializeSeq, SerializeStruct};
use serde::{Serialize, Serializer};
use std::fmt::Write as _;

use crate::core::SourceSpan;
use crate::entity::{number_of_types, EntityType};

pub use builder::TreeBuilder;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(pub u32);

#[derive(Debug, Clone)]
pub struct Node {
    pub entity: EntityType,
    pub label: String,
    pub span: SourceSpan,
    pub parent: Option<NodeId>,
    /// Push order.
    pub children: Vec<NodeId>,
    /// Introduced by the converter, no native counterpart.
    pub synthetic: bool,
}

#[derive(Debug, Clone)]
pub struct CanonicalTree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl CanonicalTree {
    pub(crate) fn from_parts(nodes: Vec<Node>, root: NodeId) -> Self { Self { nodes, root } }

    pub fn root(&self) -> NodeId { self.root }
    pub fn len(&self) -> usize { self.nodes.len() }
    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }
    pub fn node(&self, id: NodeId) -> &Node { &self.nodes[id.0 as usize] }
    pub fn children(&self, id: NodeId) -> &[NodeId] { &self.node(id).children }
    pub fn parent(&self, id: NodeId) -> Option<NodeId> { self.node(id).parent }

    /// Nodes in push order with their ids.
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node)> {
        self.nodes.iter().enumerate().map(|(i, n)| (NodeId(i as u32), n))
    }

    /// Number of edges between `id` and the root.
    pub fn depth(&self, id: NodeId) -> usize {
        let mut depth = 0;
        let mut cur = self.parent(id);
        while let Some(p) = cur {
            depth += 1;
            cur = self.parent(p);
        }
        depth
    }

    /// Pre-order, children left to right.
    pub fn preorder(&self) -> impl Iterator<Item = NodeId> + '_ {
        let mut stack = vec![self.root];
        std::iter::from_fn(move || {
            let id = stack.pop()?;
            stack.extend(self.children(id).iter().rev().copied());
            Some(id)
        })
    }

    /// Nodes without a native counterpart.
    pub fn synthetic_count(&self) -> usize { self.nodes.iter().filter(|n| n.synthetic).count() }

    /// Node counts indexed by `EntityType as usize`.
    pub fn type_histogram(&self) -> Vec<usize> {
        let mut counts = vec![0usize; number_of_types()];
        for node in &self.nodes {
            counts[node.entity as usize] += 1;
        }
        counts
    }

    /// Indented dump, one node per line: `ENTITY: label [start,length]`.
    pub fn to_tree_string(&self, include_positions: bool) -> String {
        let mut out = String::new();
        for id in self.preorder() {
            let node = self.node(id);
            let indent = "    ".repeat(self.depth(id));
            let _ = write!(out, "{indent}{}", node.entity);
            if !node.label.is_empty() {
                let _ = write!(out, ": {}", node.label);
            }
            if include_positions {
                let _ = write!(out, " {}", node.span);
            }
            out.push('\n');
        }
        out
    }

    /// Nested JSON view; positions can be left out for position-insensitive comparison.
    pub fn json(&self, include_positions: bool) -> TreeJson<'_> {
        TreeJson { tree: self, id: self.root, include_positions }
    }
}

impl Serialize for CanonicalTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.json(true).serialize(serializer)
    }
}

/// Serializable subtree view.
pub struct TreeJson<'a> {
    tree: &'a CanonicalTree,
    id: NodeId,
    include_positions: bool,
}

struct ChildrenJson<'a>(&'a TreeJson<'a>);

impl Serialize for TreeJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let node = self.tree.node(self.id);
        let fields = if self.include_positions { 6 } else { 4 };
        let mut s = serializer.serialize_struct("Node", fields)?;
        s.serialize_field("type", node.entity.name())?;
        s.serialize_field("legacy_code", &node.entity.legacy_code())?;
        s.serialize_field("label", &node.label)?;
        if self.include_positions {
            s.serialize_field("pos", &node.span.start)?;
            s.serialize_field("length", &node.span.length)?;
        }
        s.serialize_field("children", &ChildrenJson(self))?;
        s.end()
    }
}

impl Serialize for ChildrenJson<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let parent = self.0;
        let children = parent.tree.children(parent.id);
        let mut seq = serializer.serialize_seq(Some(children.len()))?;
        for &child in children {
            seq.serialize_element(&TreeJson { tree: parent.tree, id: child, include_positions: parent.include_positions })?;
        }
        seq.end()
    }
}
