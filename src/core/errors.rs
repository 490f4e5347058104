/*!
# Error System

Every error aborts the conversion of the current compilation unit; there is
no partial canonical tree. Conversion is deterministic, so nothing here is
retryable.
*/

use std::panic::Location;
use thiserror::Error;

use crate::entity::EntityType;
use crate::native::{NativeKind, Role};

pub type Result<T> = std::result::Result<T, TreeGenError>;

#[derive(Debug, Error)]
pub enum TreeGenError {
    /// `pop_node` with nothing on the builder stack.
    #[error("builder stack underflow: pop without a matching push")]
    StackUnderflow,

    /// Conversion finished with nodes still open.
    #[error("unbalanced builder stack: {open} node(s) left open, innermost {entity} pushed at {site}")]
    UnbalancedStack { open: usize, entity: EntityType, site: &'static Location<'static> },

    /// Push with an empty stack after the root was already closed.
    #[error("second root: {entity} pushed at {site} after the root was closed")]
    SecondRoot { entity: EntityType, site: &'static Location<'static> },

    /// A traversal step returned with a different stack depth than it entered with.
    #[error("bracket violation while converting {kind} at offset {offset}: depth {before} on entry, {after} on exit")]
    BracketViolation { kind: NativeKind, offset: i32, before: usize, after: usize },

    #[error("conversion produced no root node")]
    EmptyTree,

    /// Grammar-required child absent from the native tree.
    #[error("malformed {kind} at offset {offset}: missing {role}")]
    MissingChild { kind: NativeKind, role: Role, offset: i32 },

    /// Type declaration modifier list holding something other than a modifier or an annotation.
    #[error("unexpected {found} in type declaration modifiers at offset {offset}")]
    UnexpectedModifier { found: NativeKind, offset: i32 },

    #[error("unknown native node kind: {0}")]
    UnknownKind(String),

    #[error("invalid native tree: {0}")]
    InvalidNativeTree(String),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl TreeGenError {
    /// Driver/builder bugs as opposed to defects of the input tree.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            TreeGenError::StackUnderflow
                | TreeGenError::UnbalancedStack { .. }
                | TreeGenError::SecondRoot { .. }
                | TreeGenError::BracketViolation { .. }
                | TreeGenError::EmptyTree
        )
    }

    /// Source offset the error refers to, if any.
    pub fn offset(&self) -> Option<i32> {
        match self {
            TreeGenError::BracketViolation { offset, .. }
            | TreeGenError::MissingChild { offset, .. }
            | TreeGenError::UnexpectedModifier { offset, .. } => Some(*offset),
            _ => None,
        }
    }
}
