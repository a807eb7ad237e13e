//! This file provide some configuration for querytree
//! Caution: changing the layout constants below changes every rendered tree,
//! so snapshot-style assertions in downstream tools will need updating.

pub const _NAME: &str = "querytree";
pub const _VERSION: &str = "0.1.0";

pub const LOG_LEVEL: &str = "info";

/// One level of indentation in multi-line tree output.
pub const INDENT_UNIT: &str = "   ";
/// A subtree with more leaves than this is printed one child per line.
pub const MULTILINE_LEAF_THRESHOLD: usize = 2;

pub const READ_BUFFER_SIZE: usize = 4 * 1024; // 4 KB

/// Deepest expression/query nesting the built-in grammar accepts before
/// reporting a syntax error instead of recursing further.
pub const MAX_NESTING_DEPTH: usize = 128;
