//! Syntax check for generated code.
//!
//! Extracted code replaces the user's file, so it has to parse as a complete
//! Python module. Truncated answers and broken edits are rejected with
//! [`DocError::InvalidOutput`] before anything is written.

use tree_sitter::Node;
use tracing::debug;

use crate::analyzer::create_python_parser;
use crate::types::{DocError, Result};

/// Reject code that is empty or does not parse cleanly.
pub fn validate_python(code: &str) -> Result<()> {
    if code.trim().is_empty() {
        return Err(DocError::InvalidOutput {
            reason: "generated code is empty".to_string(),
        });
    }

    let mut parser = create_python_parser()?;
    let tree = parser.parse(code, None).ok_or_else(|| DocError::InvalidOutput {
        reason: "parser produced no syntax tree".to_string(),
    })?;

    let root = tree.root_node();
    if !root.has_error() {
        return Ok(());
    }

    let reason = match first_error(root) {
        Some(node) => {
            let pos = node.start_position();
            let what = if node.is_missing() {
                format!("missing {}", node.kind())
            } else {
                "syntax error".to_string()
            };
            format!("{} at line {}, column {}", what, pos.row + 1, pos.column + 1)
        }
        None => "syntax error".to_string(),
    };

    debug!("Rejecting generated code: {}", reason);
    Err(DocError::InvalidOutput { reason })
}

fn first_error(node: Node) -> Option<Node> {
    if node.is_error() || node.is_missing() {
        return Some(node);
    }
    if !node.has_error() {
        return None;
    }
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).find_map(first_error);
    found
}
