/// Generic syntax tree produced by the grammar engine.
/// Labels are canonical upper-case names for keyword-derived nodes and the
/// verbatim source text for identifiers and literals.

use std::mem;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AstNode {
    /// A node without children, rendered as its label.
    Leaf(String),
    /// A labelled node with children.
    Internal { label: String, children: Vec<AstNode> },
    /// Label-less grouping node, e.g. the root of a statement list.
    Group(Vec<AstNode>),
}

impl AstNode {
    pub fn leaf(label: impl Into<String>) -> Self {
        AstNode::Leaf(label.into())
    }

    /// Builds a labelled node. Group children are spliced into the new node,
    /// and a node left without children collapses to a leaf.
    pub fn internal(label: impl Into<String>, children: Vec<AstNode>) -> Self {
        let mut flat = Vec::with_capacity(children.len());
        for mut child in children {
            if let AstNode::Group(grand) = &mut child {
                flat.append(grand);
                continue;
            }
            flat.push(child);
        }
        if flat.is_empty() {
            AstNode::Leaf(label.into())
        } else {
            AstNode::Internal { label: label.into(), children: flat }
        }
    }

    pub fn group(children: Vec<AstNode>) -> Self {
        AstNode::Group(children)
    }

    pub fn label(&self) -> Option<&str> {
        match self {
            AstNode::Leaf(label) | AstNode::Internal { label, .. } => Some(label.as_str()),
            AstNode::Group(_) => None,
        }
    }

    pub fn children(&self) -> &[AstNode] {
        match self {
            AstNode::Leaf(_) => &[],
            AstNode::Internal { children, .. } | AstNode::Group(children) => children.as_slice(),
        }
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, AstNode::Group(_))
    }

    pub fn is_leaf(&self) -> bool {
        self.children().is_empty()
    }

    /// Number of leaf descendants. A labelled node without children counts
    /// as one leaf; an empty group has none.
    pub fn leaf_count(&self) -> usize {
        let mut count = 0;
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            match node {
                AstNode::Leaf(_) => count += 1,
                AstNode::Internal { children, .. } if children.is_empty() => count += 1,
                AstNode::Internal { children, .. } | AstNode::Group(children) => {
                    stack.extend(children.iter())
                }
            }
        }
        count
    }

    /// Child at `idx`, if any.
    pub fn child(&self, idx: usize) -> Option<&AstNode> {
        self.children().get(idx)
    }
}

impl Drop for AstNode {
    // Detach descendants onto a heap stack so deep chains drop without
    // recursing once per level.
    fn drop(&mut self) {
        let mut pending = match self {
            AstNode::Leaf(_) => return,
            AstNode::Internal { children, .. } | AstNode::Group(children) => mem::take(children),
        };
        while let Some(mut node) = pending.pop() {
            if let AstNode::Internal { children, .. } | AstNode::Group(children) = &mut node {
                pending.append(children);
            }
        }
    }
}
