//! Generation settings shared by the prompt builder and the generator.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{DocError, Result};

/// Docstring convention requested from the model
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(try_from = "String", into = "String")]
pub enum DocstringFormat {
    #[default]
    Google,
    Numpy,
    Sphinx,
}

impl DocstringFormat {
    pub const ALL: [DocstringFormat; 3] = [Self::Google, Self::Numpy, Self::Sphinx];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "google",
            Self::Numpy => "numpy",
            Self::Sphinx => "sphinx",
        }
    }
}

impl fmt::Display for DocstringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DocstringFormat {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "google" => Ok(Self::Google),
            "numpy" => Ok(Self::Numpy),
            "sphinx" => Ok(Self::Sphinx),
            _ => Err(DocError::config(format!(
                "Invalid docstring format '{}'. Valid values: google, numpy, sphinx",
                s
            ))),
        }
    }
}

impl TryFrom<String> for DocstringFormat {
    type Error = DocError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<DocstringFormat> for String {
    fn from(value: DocstringFormat) -> Self {
        value.as_str().to_string()
    }
}

/// Immutable per-run generation settings.
///
/// Built once from resolved configuration; the only fallible constructor is
/// [`GenerationConfig::new`], which rejects unknown docstring formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GenerationConfig {
    docstring_format: DocstringFormat,
    include_raises: bool,
    include_returns: bool,
    include_examples: bool,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self::from_format(DocstringFormat::default(), true, true, true)
    }
}

impl GenerationConfig {
    /// Build from a format name as it appears in config files and CLI flags
    pub fn new(
        docstring_format: &str,
        include_raises: bool,
        include_returns: bool,
        include_examples: bool,
    ) -> Result<Self> {
        let format = docstring_format.parse::<DocstringFormat>()?;
        Ok(Self::from_format(
            format,
            include_raises,
            include_returns,
            include_examples,
        ))
    }

    pub fn from_format(
        docstring_format: DocstringFormat,
        include_raises: bool,
        include_returns: bool,
        include_examples: bool,
    ) -> Self {
        Self {
            docstring_format,
            include_raises,
            include_returns,
            include_examples,
        }
    }

    pub fn docstring_format(&self) -> DocstringFormat {
        self.docstring_format
    }

    pub fn include_raises(&self) -> bool {
        self.include_raises
    }

    pub fn include_returns(&self) -> bool {
        self.include_returns
    }

    pub fn include_examples(&self) -> bool {
        self.include_examples
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_format() {
        let err = GenerationConfig::new("xml", true, true, true).unwrap_err();
        assert!(matches!(err, DocError::Config(_)));
        assert!(err.to_string().contains("xml"));
    }

    #[test]
    fn test_accepts_known_formats() {
        let config = GenerationConfig::new("numpy", true, false, true).unwrap();
        assert_eq!(config.docstring_format(), DocstringFormat::Numpy);
        assert!(config.include_raises());
        assert!(!config.include_returns());
        assert!(config.include_examples());

        for format in DocstringFormat::ALL {
            let parsed = GenerationConfig::new(format.as_str(), true, true, true).unwrap();
            assert_eq!(parsed.docstring_format(), format);
        }
    }

    #[test]
    fn test_format_parse_is_case_insensitive() {
        assert_eq!(
            "Sphinx".parse::<DocstringFormat>().unwrap(),
            DocstringFormat::Sphinx
        );
    }

    #[test]
    fn test_serde_goes_through_from_str() {
        let parsed: DocstringFormat = serde_json::from_str("\"NumPy\"").unwrap();
        assert_eq!(parsed, DocstringFormat::Numpy);
        assert_eq!(
            serde_json::to_string(&DocstringFormat::Google).unwrap(),
            "\"google\""
        );
        assert!(serde_json::from_str::<DocstringFormat>("\"epytext\"").is_err());
    }

    #[test]
    fn test_default_requests_everything() {
        let config = GenerationConfig::default();
        assert_eq!(config.docstring_format(), DocstringFormat::Google);
        assert!(config.include_raises());
        assert!(config.include_returns());
        assert!(config.include_examples());
    }
}
