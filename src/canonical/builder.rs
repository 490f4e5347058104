//! Stack-based canonical tree builder.
//!
//! Every push attaches the new node as last child of the stack top (or makes
//! it the root) and pushes it; every pop closes the top node's children list.
//! One builder serves exactly one conversion run.

use std::panic::Location;

use super::{CanonicalTree, Node, NodeId};
use crate::core::{Result, SourceSpan, TreeGenError};
use crate::entity::{entity_type_of, EntityType};
use crate::native::{NativeId, NativeTree};

#[derive(Debug, Clone, Copy)]
struct OpenNode {
    id: NodeId,
    site: &'static Location<'static>,
}

/// Builds a [`CanonicalTree`] from balanced push/pop calls.
#[derive(Debug, Default)]
pub struct TreeBuilder {
    nodes: Vec<Node>,
    stack: Vec<OpenNode>,
    root: Option<NodeId>,
}

impl TreeBuilder {
    pub fn new() -> Self { Self::default() }

    /// Push a node for a native node; the entity type follows the native kind.
    #[track_caller]
    pub fn push_node(&mut self, tree: &NativeTree, id: NativeId, label: impl Into<String>) -> Result<NodeId> {
        let native = tree.node(id);
        self.push(entity_type_of(native.kind), label.into(), native.span, false, Location::caller())
    }

    /// Push a synthetic node with no native counterpart.
    #[track_caller]
    pub fn push_fake_node(&mut self, entity: EntityType, label: impl Into<String>, start: i32, length: i32) -> Result<NodeId> {
        self.push(entity, label.into(), SourceSpan::new(start, length), true, Location::caller())
    }

    fn push(
        &mut self,
        entity: EntityType,
        label: String,
        span: SourceSpan,
        synthetic: bool,
        site: &'static Location<'static>,
    ) -> Result<NodeId> {
        let parent = self.stack.last().map(|open| open.id);
        if parent.is_none() && self.root.is_some() {
            return Err(TreeGenError::SecondRoot { entity, site });
        }
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node { entity, label, span, parent, children: Vec::new(), synthetic });
        match parent {
            Some(p) => self.nodes[p.0 as usize].children.push(id),
            None => self.root = Some(id),
        }
        self.stack.push(OpenNode { id, site });
        Ok(id)
    }

    /// Close the stack top.
    pub fn pop_node(&mut self) -> Result<NodeId> {
        self.stack.pop().map(|open| open.id).ok_or(TreeGenError::StackUnderflow)
    }

    /// Number of open nodes.
    pub fn depth(&self) -> usize { self.stack.len() }

    /// Innermost open node, the parent of the next push.
    pub fn current(&self) -> Option<NodeId> { self.stack.last().map(|open| open.id) }

    pub fn len(&self) -> usize { self.nodes.len() }

    pub fn is_empty(&self) -> bool { self.nodes.is_empty() }

    /// Hand the finished tree over; fails if any push is still unmatched.
    pub fn build(self) -> Result<CanonicalTree> {
        if let Some(open) = self.stack.last() {
            return Err(TreeGenError::UnbalancedStack {
                open: self.stack.len(),
                entity: self.nodes[open.id.0 as usize].entity,
                site: open.site,
            });
        }
        let root = self.root.ok_or(TreeGenError::EmptyTree)?;
        Ok(CanonicalTree::from_parts(self.nodes, root))
    }
}
