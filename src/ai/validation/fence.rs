//! Fenced Output Extraction
//!
//! The model must answer with exactly one block of the form
//!
//! ````text
//! ```generated-python-code
//! <code>
//! ```
//! ````
//!
//! The block closes at the last line that starts with a triple backtick, so
//! fenced examples inside generated docstrings stay part of the code.
//! Zero or several opening fences are a [`DocError::FormatViolation`], and so
//! is an opening fence that is never closed. The extracted code has leading
//! and trailing whitespace trimmed.

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::constants::output::FENCE_LABEL;
use crate::types::{DocError, Result};

static OPEN_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"```{}[ \t]*\r?\n", regex::escape(FENCE_LABEL)))
        .expect("opening fence pattern is a valid regex")
});

static CLOSE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*```[ \t]*\r?$").expect("closing fence pattern is a valid regex")
});

/// Extract the generated code from a raw model response.
pub fn extract_generated_code(response: &str) -> Result<String> {
    let openings: Vec<_> = OPEN_RE.find_iter(response).collect();

    let [opening] = openings.as_slice() else {
        debug!(
            "Expected one {} block, found {} ({} bytes of response)",
            FENCE_LABEL,
            openings.len(),
            response.len()
        );
        return Err(DocError::FormatViolation {
            blocks_found: openings.len(),
        });
    };

    let rest = &response[opening.end()..];
    let Some(closing) = CLOSE_RE.find_iter(rest).last() else {
        debug!("{} block is never closed", FENCE_LABEL);
        return Err(DocError::FormatViolation { blocks_found: 0 });
    };

    Ok(rest[..closing.start()].trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_single_block() {
        let response = "Here you go:\n```generated-python-code\ndef f(x):\n    \"\"\"Add one.\"\"\"\n    return x + 1\n```\nDone.";
        let code = extract_generated_code(response).unwrap();
        assert_eq!(code, "def f(x):\n    \"\"\"Add one.\"\"\"\n    return x + 1");
    }

    #[test]
    fn test_trims_surrounding_whitespace() {
        let response = "```generated-python-code\n\n\nimport os\n\n\n```";
        assert_eq!(extract_generated_code(response).unwrap(), "import os");
    }

    #[test]
    fn test_preserves_inner_indentation() {
        let response = "```generated-python-code\nclass A:\n    def m(self):\n        pass\n```";
        assert_eq!(
            extract_generated_code(response).unwrap(),
            "class A:\n    def m(self):\n        pass"
        );
    }

    #[test]
    fn test_accepts_crlf_line_endings() {
        let response = "```generated-python-code\r\nx = 1\r\n```";
        assert_eq!(extract_generated_code(response).unwrap(), "x = 1");
    }

    #[test]
    fn test_nested_fence_in_docstring_stays_in_code() {
        let code = "def f(x):\n    \"\"\"Add one.\n\n    Example:\n        ```python\n        f(1)\n        ```\n    \"\"\"\n    return x + 1";
        let response = format!("```generated-python-code\n{}\n```\n", code);
        assert_eq!(extract_generated_code(&response).unwrap(), code);
    }

    #[test]
    fn test_unclosed_block_is_format_violation() {
        let err = extract_generated_code("```generated-python-code\ndef f():\n    pass\n").unwrap_err();
        assert!(matches!(err, DocError::FormatViolation { blocks_found: 0 }));
    }

    #[test]
    fn test_missing_block_is_format_violation() {
        let err = extract_generated_code("def f(x):\n    return x\n").unwrap_err();
        assert!(matches!(err, DocError::FormatViolation { blocks_found: 0 }));
    }

    #[test]
    fn test_other_fence_labels_are_not_recognized() {
        let err = extract_generated_code("```python\ndef f(): pass\n```").unwrap_err();
        assert!(err.is_format_violation());
    }

    #[test]
    fn test_multiple_blocks_are_format_violation() {
        let response = "```generated-python-code\na = 1\n```\nand\n```generated-python-code\nb = 2\n```";
        let err = extract_generated_code(response).unwrap_err();
        assert!(matches!(err, DocError::FormatViolation { blocks_found: 2 }));
    }
}
