//! Skippability Analysis
//!
//! Decides whether a Python source unit is trivial enough that sending it to
//! a model would be wasted work. Classification only ever reads the syntax
//! tree; it never mutates the source.
//!
//! A source unit is skippable when it consists only of imports, of a single
//! literal expression (a module docstring), or of plain `name = value`
//! assignments. Anything that fails to parse is *not* skippable: the model
//! may still be able to handle input our grammar rejects.

use std::fmt;

use tree_sitter::Node;
use tracing::{debug, warn};

use crate::types::{DocError, Result};

/// Why a source unit was left untouched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Zero-length or whitespace-only input
    Empty,
    /// Only import statements (or no statements at all)
    ImportsOnly,
    /// A single literal expression, usually a module docstring
    DocstringOnly,
    /// Only single-target assignments to plain names
    ConstantsOnly,
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty"),
            Self::ImportsOnly => write!(f, "imports only"),
            Self::DocstringOnly => write!(f, "docstring only"),
            Self::ConstantsOnly => write!(f, "constants only"),
        }
    }
}

const IMPORT_KINDS: &[&str] = &[
    "import_statement",
    "import_from_statement",
    "future_import_statement",
];

const LITERAL_KINDS: &[&str] = &[
    "string",
    "concatenated_string",
    "integer",
    "float",
    "true",
    "false",
    "none",
    "ellipsis",
];

/// Create a tree-sitter parser for Python source.
pub fn create_python_parser() -> Result<tree_sitter::Parser> {
    let mut parser = tree_sitter::Parser::new();
    parser
        .set_language(&tree_sitter_python::LANGUAGE.into())
        .map_err(|e| DocError::Parse(format!("Failed to set Python language: {}", e)))?;
    Ok(parser)
}

/// Returns true when the source needs no generated documentation.
pub fn is_skippable(source: &str) -> bool {
    classify(source).is_some()
}

/// Classify a source unit by its top-level statements.
///
/// Returns `None` when the unit should be documented, including when it
/// cannot be parsed. Empty input is reported as [`SkipReason::ImportsOnly`]
/// here (there are no statements, so all of them are imports); callers that
/// care about emptiness check for it first.
pub fn classify(source: &str) -> Option<SkipReason> {
    let mut parser = match create_python_parser() {
        Ok(parser) => parser,
        Err(e) => {
            warn!("Skip analysis unavailable, documenting anyway: {}", e);
            return None;
        }
    };

    let Some(tree) = parser.parse(source, None) else {
        debug!("Parser returned no tree; treating source as not skippable");
        return None;
    };

    let root = tree.root_node();
    if root.has_error() {
        debug!("Source has syntax errors; treating as not skippable");
        return None;
    }

    let mut cursor = root.walk();
    let statements: Vec<Node> = root
        .named_children(&mut cursor)
        .filter(|node| node.kind() != "comment")
        .collect();

    if statements.iter().all(|node| is_import(*node)) {
        return Some(SkipReason::ImportsOnly);
    }

    if let [only] = statements.as_slice()
        && is_literal_expression(*only)
    {
        return Some(SkipReason::DocstringOnly);
    }

    if statements.iter().all(|node| is_simple_assignment(*node)) {
        return Some(SkipReason::ConstantsOnly);
    }

    None
}

fn is_import(node: Node) -> bool {
    IMPORT_KINDS.contains(&node.kind())
}

/// Named children of a node, skipping comments
fn named_children(node: Node) -> Vec<Node> {
    let mut cursor = node.walk();
    node.named_children(&mut cursor)
        .filter(|child| child.kind() != "comment")
        .collect()
}

/// `"""docstring"""`, `42`, `None`, ... as a whole statement
fn is_literal_expression(node: Node) -> bool {
    if node.kind() != "expression_statement" {
        return false;
    }

    match named_children(node).as_slice() {
        [value] => LITERAL_KINDS.contains(&value.kind()) && !contains_interpolation(*value),
        _ => false,
    }
}

/// f-strings parse as `string` nodes but are not constants
fn contains_interpolation(node: Node) -> bool {
    if node.kind() == "interpolation" {
        return true;
    }
    named_children(node)
        .into_iter()
        .any(contains_interpolation)
}

/// `NAME = value` with exactly one target and no annotation
fn is_simple_assignment(node: Node) -> bool {
    if node.kind() != "expression_statement" {
        return false;
    }

    let children = named_children(node);
    let [assignment] = children.as_slice() else {
        return false;
    };
    if assignment.kind() != "assignment" {
        return false;
    }

    let Some(left) = assignment.child_by_field_name("left") else {
        return false;
    };
    let Some(right) = assignment.child_by_field_name("right") else {
        // annotation without a value: `x: int`
        return false;
    };

    left.kind() == "identifier"
        && assignment.child_by_field_name("type").is_none()
        // chained assignment `a = b = 1` has two targets
        && right.kind() != "assignment"
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_imports_only() {
        assert_eq!(classify("import os\n"), Some(SkipReason::ImportsOnly));
        assert_eq!(
            classify("import os\nimport sys\nfrom typing import List, Dict\n"),
            Some(SkipReason::ImportsOnly)
        );
        assert_eq!(
            classify("from __future__ import annotations\nimport os.path as p\n"),
            Some(SkipReason::ImportsOnly)
        );
    }

    #[test]
    fn test_docstring_only() {
        assert_eq!(
            classify("\"\"\"This is a docstring.\"\"\"\n"),
            Some(SkipReason::DocstringOnly)
        );
        assert_eq!(classify("'single'\n"), Some(SkipReason::DocstringOnly));
        assert_eq!(classify("42\n"), Some(SkipReason::DocstringOnly));
    }

    #[test]
    fn test_fstring_is_not_a_constant() {
        assert_eq!(classify("f\"hello {name}\"\n"), None);
    }

    #[test]
    fn test_two_docstrings_are_not_skippable() {
        assert_eq!(classify("\"\"\"one\"\"\"\n\"\"\"two\"\"\"\n"), None);
    }

    #[test]
    fn test_constants_only() {
        assert_eq!(classify("x = 5\n"), Some(SkipReason::ConstantsOnly));
        assert_eq!(
            classify("x = 'hello'\nMAX_SIZE = 10\nDEFAULTS = {'a': 1}\n"),
            Some(SkipReason::ConstantsOnly)
        );
    }

    #[test]
    fn test_multi_target_assignments_are_not_skippable() {
        assert_eq!(classify("x, y = 5, 10\n"), None);
        assert_eq!(classify("a = b = 1\n"), None);
        assert_eq!(classify("obj.attr = 1\n"), None);
        assert_eq!(classify("items[0] = 1\n"), None);
    }

    #[test]
    fn test_annotated_and_augmented_assignments_are_not_skippable() {
        assert_eq!(classify("x: int = 5\n"), None);
        assert_eq!(classify("x: int\n"), None);
        assert_eq!(classify("x += 1\n"), None);
    }

    #[test]
    fn test_code_is_not_skippable() {
        assert_eq!(classify("def func(): pass\n"), None);
        assert_eq!(classify("class A:\n    pass\n"), None);
        assert_eq!(classify("import os\n\ndef main():\n    return os.getcwd()\n"), None);
        assert!(!is_skippable("def f(x):\n    return x + 1\n"));
    }

    #[test]
    fn test_mixed_imports_and_constants_are_not_skippable() {
        assert_eq!(classify("import os\nX = 1\n"), None);
    }

    #[test]
    fn test_syntax_error_is_not_skippable() {
        assert_eq!(classify("import os\ndef broken(:\n"), None);
        assert_eq!(classify("x = = 1\n"), None);
    }

    #[test]
    fn test_comments_are_ignored() {
        assert_eq!(
            classify("# header comment\nimport os  # trailing\n"),
            Some(SkipReason::ImportsOnly)
        );
        assert_eq!(classify("# only a comment\n"), Some(SkipReason::ImportsOnly));
    }

    fn module_name() -> impl Strategy<Value = String> {
        "[a-z_][a-z0-9_]{0,8}(\\.[a-z_][a-z0-9_]{0,8}){0,2}"
            .prop_filter("python keyword", |name| {
                !name.split('.').any(|part| {
                    matches!(
                        part,
                        "as" | "if" | "in" | "is" | "or" | "and" | "not" | "def" | "del"
                            | "for" | "try" | "from" | "else" | "elif" | "with" | "pass"
                            | "class" | "while" | "yield" | "raise" | "break" | "async"
                            | "await" | "global" | "import" | "lambda" | "return"
                            | "assert" | "except" | "finally" | "continue" | "nonlocal"
                            | "print" | "exec" | "match" | "case" | "type" | "_"
                    )
                })
            })
    }

    proptest! {
        #[test]
        fn prop_imports_only_is_skippable(names in proptest::collection::vec(module_name(), 1..6)) {
            let source: String = names
                .iter()
                .enumerate()
                .map(|(i, name)| {
                    if i % 2 == 0 {
                        format!("import {}\n", name)
                    } else {
                        format!("from {} import thing\n", name)
                    }
                })
                .collect();
            prop_assert_eq!(classify(&source), Some(SkipReason::ImportsOnly));
        }
    }
}
