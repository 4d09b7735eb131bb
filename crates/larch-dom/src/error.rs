//! Error types for tree operations and the document error log.

use std::cell::RefCell;

use thiserror::Error;

use crate::node::{NodeId, NodeType};

/// Errors raised by structural and data operations on the tree.
///
/// These are always returned to the caller; the tree never logs or swallows
/// them.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomError {
    /// `insert_before` was given a reference node that is not a child of the
    /// parent.
    #[error("reference node {reference:?} is not a child of {parent:?}")]
    InvalidReference {
        /// The node being inserted into.
        parent: NodeId,
        /// The reference node that was not found among its children.
        reference: NodeId,
    },

    /// `remove_child` or `replace_child` was given a node that is not a child
    /// of the parent.
    #[error("node {child:?} is not a child of {parent:?}")]
    NotFound {
        /// The parent that was searched.
        parent: NodeId,
        /// The node that was not among its children.
        child: NodeId,
    },

    /// A character-data offset past the end of the data.
    #[error("offset {offset} is out of range for data of length {length}")]
    Range {
        /// The rejected offset, in characters.
        offset: usize,
        /// The data length, in characters.
        length: usize,
    },

    /// The insertion would break the tree shape: a node inserted under itself
    /// or one of its descendants, a document node inserted anywhere, or a
    /// child added to a node that cannot have children.
    #[error("cannot insert {child:?} under {parent:?}")]
    HierarchyRequest {
        /// The would-be parent.
        parent: NodeId,
        /// The would-be child.
        child: NodeId,
    },

    /// The operation needs a different kind of node.
    #[error("{node:?} is a {actual} but the operation needs {expected}")]
    WrongNodeType {
        /// The node the operation was called on.
        node: NodeId,
        /// What the operation accepts.
        expected: &'static str,
        /// What the node actually is.
        actual: NodeType,
    },

    /// The handle does not refer to a node of this tree.
    #[error("{0:?} is not a node of this tree")]
    UnknownNode(NodeId),
}

/// Result alias for tree operations.
pub type DomResult<T> = Result<T, DomError>;

/// Append-only log of recovered errors.
///
/// Recovered failures (malformed selectors, listener errors, parse failures)
/// are recorded here and mirrored to `tracing` at error level. Queries only
/// need `&self`, so the entries sit behind a `RefCell`.
#[derive(Debug, Default)]
pub struct ErrorLog {
    entries: RefCell<Vec<String>>,
}

impl ErrorLog {
    /// Create an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a message.
    pub fn push(&self, message: impl Into<String>) {
        let message = message.into();
        tracing::error!("{message}");
        self.entries.borrow_mut().push(message);
    }

    /// A snapshot of every message recorded so far, oldest first.
    #[must_use]
    pub fn entries(&self) -> Vec<String> {
        self.entries.borrow().clone()
    }

    /// Number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Whether nothing has been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_log_keeps_order() {
        let log = ErrorLog::new();
        assert!(log.is_empty());
        log.push("first");
        log.push(String::from("second"));
        assert_eq!(log.len(), 2);
        assert_eq!(log.entries(), vec!["first", "second"]);
    }

    #[test]
    fn test_range_error_message() {
        let error = DomError::Range {
            offset: 9,
            length: 4,
        };
        assert_eq!(
            error.to_string(),
            "offset 9 is out of range for data of length 4"
        );
    }
}
