use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::error::{DocError, Result};

/// Supported model tiers, written as `provider:model`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum ModelId {
    #[default]
    Gpt4o,
    Gpt4oMini,
}

impl ModelId {
    pub const ALL: [ModelId; 2] = [Self::Gpt4o, Self::Gpt4oMini];

    /// Full identifier as accepted on the command line
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Gpt4o => "openai:gpt-4o",
            Self::Gpt4oMini => "openai:gpt-4o-mini",
        }
    }

    /// Model name as the provider API expects it
    pub fn model_name(&self) -> &'static str {
        match self {
            Self::Gpt4o => "gpt-4o",
            Self::Gpt4oMini => "gpt-4o-mini",
        }
    }

    fn supported_list() -> String {
        Self::ALL
            .iter()
            .map(|m| m.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for ModelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ModelId {
    type Err = DocError;

    fn from_str(s: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|m| m.as_str() == s.trim())
            .ok_or_else(|| {
                DocError::config(format!(
                    "Unsupported model '{}'. Must be one of: {}",
                    s,
                    Self::supported_list()
                ))
            })
    }
}

impl TryFrom<String> for ModelId {
    type Error = DocError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<ModelId> for String {
    fn from(value: ModelId) -> Self {
        value.as_str().to_string()
    }
}
