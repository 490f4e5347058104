//! Push/pop builder for native trees (nested start/finish on an explicit stack).

use super::{NativeAttrs, NativeId, NativeKind, NativeNode, NativeTree, Role};
use crate::core::{Result, SourceSpan, TreeGenError};

/// Builds a [`NativeTree`] in source order. The first node allocated outside
/// any open node becomes the root.
pub struct NativeTreeBuilder {
    source: String,
    nodes: Vec<NativeNode>,
    stack: Vec<NativeId>,
    root: Option<NativeId>,
    extra_roots: usize,
}

impl NativeTreeBuilder {
    /// Builder over the full source text of one compilation unit.
    pub fn new(source: impl Into<String>) -> Self {
        Self { source: source.into(), nodes: Vec::new(), stack: Vec::new(), root: None, extra_roots: 0 }
    }

    /// Span of the first occurrence of `needle` at or after byte `from`.
    pub fn span_of(&self, needle: &str, from: usize) -> SourceSpan {
        match self.source.get(from..).and_then(|tail| tail.find(needle)) {
            Some(pos) => SourceSpan::new((from + pos) as i32, needle.len() as i32),
            None => SourceSpan::UNKNOWN,
        }
    }

    /// Opens a node with default attributes; later nodes become its children until [`finish_node`](Self::finish_node).
    pub fn start_node(&mut self, kind: NativeKind, role: Role, span: SourceSpan) -> NativeId {
        self.start_node_with(kind, role, span, NativeAttrs::default())
    }

    pub fn start_node_with(&mut self, kind: NativeKind, role: Role, span: SourceSpan, attrs: NativeAttrs) -> NativeId {
        let id = self.alloc(kind, role, span, attrs);
        self.stack.push(id);
        id
    }

    /// Closes the innermost open node.
    pub fn finish_node(&mut self) {
        self.stack.pop();
    }

    /// Childless node attached to the innermost open node.
    pub fn leaf(&mut self, kind: NativeKind, role: Role, span: SourceSpan, attrs: NativeAttrs) -> NativeId {
        self.alloc(kind, role, span, attrs)
    }

    fn alloc(&mut self, kind: NativeKind, role: Role, span: SourceSpan, attrs: NativeAttrs) -> NativeId {
        let id = NativeId(self.nodes.len() as u32);
        let parent = self.stack.last().copied();
        self.nodes.push(NativeNode { kind, span, role, attrs, parent, children: Vec::new() });
        match parent {
            Some(p) => self.nodes[p.0 as usize].children.push(id),
            None if self.root.is_none() => self.root = Some(id),
            None => self.extra_roots += 1,
        }
        id
    }

    /// Fails with `InvalidNativeTree` on open nodes, several roots or no node at all.
    pub fn build(self) -> Result<NativeTree> {
        if !self.stack.is_empty() {
            return Err(TreeGenError::InvalidNativeTree(format!("{} node(s) left open", self.stack.len())));
        }
        if self.extra_roots > 0 {
            return Err(TreeGenError::InvalidNativeTree(format!("{} node(s) outside the root", self.extra_roots)));
        }
        let root = self.root.ok_or_else(|| TreeGenError::InvalidNativeTree("empty tree".into()))?;
        Ok(NativeTree::from_parts(self.source, self.nodes, root))
    }
}
