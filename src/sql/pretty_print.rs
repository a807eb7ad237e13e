/// Pretty printing utilities for syntax trees.
/// Renders an `AstNode` as a parenthesized tree. A node whose subtree holds
/// more than `MULTILINE_LEAF_THRESHOLD` leaves puts each child on its own
/// indented line; smaller nodes stay on one line.

use std::fmt;

use crate::config::{INDENT_UNIT, MULTILINE_LEAF_THRESHOLD};
use super::ast::AstNode;

pub fn render(node: &AstNode) -> String {
    render_at(node, 1)
}

/// Renders `node` as if it sat at nesting `depth`. Multi-line children of
/// this node are indented `depth` units.
pub fn render_at(node: &AstNode, depth: usize) -> String {
    Layout::new(node).write(depth, false)
}

/// Single-line form: `(label child ...)`, group children joined by spaces.
pub fn render_flat(node: &AstNode) -> String {
    Layout::new(node).write(0, true)
}

/// Pre-order snapshot of a tree with per-node leaf counts and subtree sizes,
/// so rendering needs neither recursion nor repeated leaf counting.
struct Layout<'a> {
    nodes: Vec<&'a AstNode>,
    leaves: Vec<usize>,
    sizes: Vec<usize>,
}

enum Step {
    Visit { idx: usize, depth: usize },
    Break(usize),
    Space,
    Close,
}

impl<'a> Layout<'a> {
    fn new(root: &'a AstNode) -> Self {
        let mut nodes = Vec::new();
        let mut parents = Vec::new();
        let mut stack = vec![(root, usize::MAX)];
        while let Some((node, parent)) = stack.pop() {
            let idx = nodes.len();
            nodes.push(node);
            parents.push(parent);
            stack.extend(node.children().iter().rev().map(|c| (c, idx)));
        }

        let mut leaves: Vec<usize> = nodes
            .iter()
            .map(|n| match n {
                AstNode::Leaf(_) => 1,
                AstNode::Internal { children, .. } if children.is_empty() => 1,
                _ => 0,
            })
            .collect();
        let mut sizes = vec![1; nodes.len()];
        // descendants follow their ancestors in pre-order
        for idx in (1..nodes.len()).rev() {
            let parent = parents[idx];
            leaves[parent] += leaves[idx];
            sizes[parent] += sizes[idx];
        }

        Self { nodes, leaves, sizes }
    }

    fn child_indices(&self, idx: usize) -> Vec<usize> {
        let mut next = idx + 1;
        self.nodes[idx]
            .children()
            .iter()
            .map(|_| {
                let child = next;
                next += self.sizes[child];
                child
            })
            .collect()
    }

    fn write(&self, depth: usize, flat: bool) -> String {
        let mut out = String::new();
        let mut stack = vec![Step::Visit { idx: 0, depth }];
        while let Some(step) = stack.pop() {
            match step {
                Step::Break(depth) => {
                    out.push('\n');
                    out.push_str(&INDENT_UNIT.repeat(depth));
                }
                Step::Space => out.push(' '),
                Step::Close => out.push(')'),
                Step::Visit { idx, depth } => {
                    let node = self.nodes[idx];
                    let nil = match node {
                        AstNode::Leaf(label) => {
                            out.push_str(label);
                            continue;
                        }
                        AstNode::Internal { label, children } if children.is_empty() => {
                            out.push_str(label);
                            continue;
                        }
                        AstNode::Internal { label, .. } => {
                            out.push('(');
                            out.push_str(label);
                            stack.push(Step::Close);
                            false
                        }
                        AstNode::Group(_) => true,
                    };
                    let multiline = !flat && self.leaves[idx] > MULTILINE_LEAF_THRESHOLD;
                    let children = self.child_indices(idx);
                    for (i, &child) in children.iter().enumerate().rev() {
                        stack.push(Step::Visit { idx: child, depth: depth + 1 });
                        // a group has no label for its first child to follow
                        if nil && i == 0 {
                            continue;
                        }
                        stack.push(if multiline { Step::Break(depth) } else { Step::Space });
                    }
                }
            }
        }
        out
    }
}

impl fmt::Display for AstNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&render(self))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(s: &str) -> AstNode {
        AstNode::leaf(s)
    }

    fn node(label: &str, children: Vec<AstNode>) -> AstNode {
        AstNode::internal(label, children)
    }

    #[test]
    fn test_leaf_renders_label() {
        assert_eq!(render(&leaf("'MiXed'")), "'MiXed'");
        let raw = AstNode::Internal { label: "x".into(), children: vec![] };
        assert_eq!(render(&raw), "x");
    }

    #[test]
    fn test_two_leaves_inline() {
        let tree = node("root", vec![leaf("leaf1"), leaf("leaf2")]);
        assert_eq!(render(&tree), "(root leaf1 leaf2)");
    }

    #[test]
    fn test_single_leaf_child_inline() {
        assert_eq!(render(&node("LIMIT", vec![leaf("10")])), "(LIMIT 10)");
    }

    #[test]
    fn test_three_leaves_multiline() {
        let tree = node("root", vec![leaf("a"), leaf("b"), leaf("c")]);
        assert_eq!(render(&tree), "(root\n   a\n   b\n   c)");
    }

    #[test]
    fn test_layout_alternates_by_depth() {
        let tree = node(
            "A",
            vec![node("B", vec![leaf("x"), leaf("y"), leaf("z")]), node("C", vec![leaf("w")])],
        );
        assert_eq!(render(&tree), "(A\n   (B\n      x\n      y\n      z)\n   (C w))");

        let query = node(
            "QUERY",
            vec![node("SELECT", vec![leaf("a"), leaf("b")]), node("FROM", vec![leaf("t")])],
        );
        assert_eq!(render(&query), "(QUERY\n   (SELECT a b)\n   (FROM t))");
    }

    #[test]
    fn test_single_child_chain_stays_inline() {
        let mut tree = leaf("x");
        for label in ["a", "b", "c", "d", "e"] {
            tree = node(label, vec![tree]);
        }
        assert_eq!(render(&tree), "(e (d (c (b (a x)))))");
    }

    #[test]
    fn test_render_at_depth_offsets_indent() {
        let inner = node("I", vec![leaf("p"), leaf("q"), leaf("r")]);
        let tree = render_at(&node("O", vec![inner.clone()]), 1);
        assert_eq!(tree, "(O\n   (I\n      p\n      q\n      r))");
        assert_eq!(render_at(&inner, 3), "(I\n         p\n         q\n         r)");
    }

    #[test]
    fn test_group_elision() {
        assert_eq!(render(&AstNode::group(vec![])), "");

        let two = AstNode::group(vec![leaf("a"), leaf("b")]);
        assert_eq!(render(&two), "a b");

        let stmts = AstNode::group(vec![
            node("S1", vec![leaf("x"), leaf("y")]),
            node("S2", vec![leaf("z")]),
        ]);
        assert_eq!(render(&stmts), "(S1 x y)\n   (S2 z)");
    }

    #[test]
    fn test_group_joins_children_like_a_node() {
        let children = vec![node("S1", vec![leaf("a"), leaf("b"), leaf("c")]), node("S2", vec![leaf("d")])];
        let stmts = AstNode::group(children.clone());
        assert_eq!(render(&stmts), "(S1\n      a\n      b\n      c)\n   (S2 d)");

        // same text as a labelled node, minus "(ROOT" and ")"
        let labelled = render(&AstNode::internal("ROOT", children));
        assert_eq!(format!("(ROOT\n   {})", render(&stmts)), labelled);
    }

    #[test]
    fn test_deep_chain_renders_on_one_line() {
        let depth = 100_000;
        let mut tree = leaf("x");
        for _ in 0..depth {
            tree = node("a", vec![tree]);
        }
        let rendered = render(&tree);
        assert!(!rendered.contains('\n'));
        assert_eq!(rendered.len(), depth * 3 + 1 + depth);
        assert!(rendered.starts_with("(a (a "));
        assert!(rendered.ends_with(" x))"));
        assert_eq!(render_flat(&tree), rendered);
    }

    #[test]
    fn test_render_is_idempotent_and_display_matches() {
        let tree = node("A", vec![node("B", vec![leaf("x"), leaf("y")]), leaf("z")]);
        let first = render(&tree);
        assert_eq!(first, render(&tree));
        assert_eq!(tree.to_string(), first);
    }

    #[test]
    fn test_render_flat() {
        let tree = node("A", vec![node("B", vec![leaf("x"), leaf("y")]), leaf("z")]);
        assert_eq!(render_flat(&tree), "(A (B x y) z)");
        let stmts = AstNode::group(vec![leaf("a"), node("S", vec![leaf("b")])]);
        assert_eq!(render_flat(&stmts), "a (S b)");
        assert_eq!(render_flat(&AstNode::group(vec![])), "");
    }
}
