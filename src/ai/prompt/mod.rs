//! Prompt Builder System
//!
//! Builds the system instruction sent with every generation request.
//!
//! The rendered prompt is a pure function of [`GenerationConfig`]: equal
//! configs always produce byte-identical text. Nothing is cached or shared
//! between calls; the prompt is rebuilt for every request.

use crate::constants::output::FENCE_LABEL;
use crate::types::GenerationConfig;

/// Prompt section types
#[derive(Debug, Clone)]
pub enum PromptSection {
    /// Raw text section with optional header
    Text {
        header: Option<String>,
        content: String,
    },
    /// Bulleted list under a header
    List { header: String, items: Vec<String> },
    /// Code block with language tag
    Code { language: String, content: String },
}

/// Prompt builder for consistent prompt construction
#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    sections: Vec<PromptSection>,
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add text section
    pub fn text(mut self, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: None,
            content: content.to_string(),
        });
        self
    }

    /// Add text section with header
    pub fn section(mut self, header: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Text {
            header: Some(header.to_string()),
            content: content.to_string(),
        });
        self
    }

    /// Add a bulleted list; empty lists are dropped entirely
    pub fn list(mut self, header: &str, items: Vec<String>) -> Self {
        if !items.is_empty() {
            self.sections.push(PromptSection::List {
                header: header.to_string(),
                items,
            });
        }
        self
    }

    /// Add code block
    pub fn code(mut self, language: &str, content: &str) -> Self {
        self.sections.push(PromptSection::Code {
            language: language.to_string(),
            content: content.to_string(),
        });
        self
    }

    /// Build the final prompt string
    pub fn build(self) -> String {
        let mut prompt = String::new();

        for section in self.sections {
            match section {
                PromptSection::Text { header, content } => {
                    if let Some(h) = header {
                        prompt.push_str(&format!("# {}\n\n", h));
                    }
                    prompt.push_str(&content);
                    prompt.push_str("\n\n");
                }
                PromptSection::List { header, items } => {
                    prompt.push_str(&format!("# {}\n\n", header));
                    for item in items {
                        prompt.push_str(&format!("- {}\n", item));
                    }
                    prompt.push('\n');
                }
                PromptSection::Code { language, content } => {
                    prompt.push_str(&format!("```{}\n", language));
                    prompt.push_str(&content);
                    prompt.push_str("\n```\n\n");
                }
            }
        }

        prompt.trim_end().to_string()
    }
}

const RULES: &[&str] = &[
    "Do not alter the semantics of the original code in any way.",
    "Preserve the original indentation and line breaks exactly.",
    "Do not fix bugs, refactor, rename, or reorder anything.",
    "Do not add any code or comments other than docstrings.",
    "Leave constants and import statements undocumented.",
    "The output must remain valid, runnable Python.",
];

/// Render the system instruction for a generation request.
pub fn render(config: &GenerationConfig) -> String {
    let task = format!(
        "Given Python source code that may contain classes, functions, methods, \
         and variables, generate docstrings for it using the {} docstring format.",
        config.docstring_format()
    );

    let mut requirements = Vec::new();
    if config.include_raises() {
        requirements.push("The exceptions that the code can raise.".to_string());
    }
    if config.include_returns() {
        requirements.push("The return value of the code.".to_string());
    }
    if config.include_examples() {
        requirements.push("Examples of how to use the code.".to_string());
    }

    PromptBuilder::new()
        .text(&task)
        .list(
            "Requirements",
            requirements
                .into_iter()
                .map(|r| format!("For each class, function, and method, include: {}", r))
                .collect(),
        )
        .list("Rules", RULES.iter().map(|r| r.to_string()).collect())
        .section(
            "Output Format",
            "Return only the input code populated with the generated docstrings, \
             in exactly the following format:",
        )
        .code(FENCE_LABEL, "<OUTPUT_CODE>")
        .text("No other output format is accepted.")
        .build()
}
