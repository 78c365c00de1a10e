//! Configuration Loader (Figment-based)
//!
//! Loads and merges configuration from multiple sources using Figment:
//! 1. Built-in defaults (Serialized)
//! 2. Global config (<config dir>/docugenius/config.toml)
//! 3. Project config (./docugenius.toml), or the file passed with `--config`
//! 4. Environment variables (DOCUGENIUS_* prefix, `__` separates sections)

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use super::types::Config;
use crate::types::{DocError, Result};

const APP_NAME: &str = "docugenius";
const ENV_PREFIX: &str = "DOCUGENIUS_";
const PROJECT_CONFIG_FILE: &str = "docugenius.toml";

/// Configuration loader
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with full resolution chain:
    /// defaults → global → project (or explicit file) → env vars
    pub fn load(explicit: Option<&Path>) -> Result<Config> {
        let project = match explicit {
            Some(path) => {
                if !path.is_file() {
                    return Err(DocError::config(format!(
                        "Config file not found: {}",
                        path.display()
                    )));
                }
                Some(path.to_path_buf())
            }
            None => {
                let path = Self::project_config_path();
                path.exists().then_some(path)
            }
        };

        let global = Self::global_config_path().filter(|p| p.exists());

        Self::load_layers(global.as_deref(), project.as_deref())
    }

    /// Merge the given files over defaults, then apply environment overrides
    pub fn load_layers(global: Option<&Path>, project: Option<&Path>) -> Result<Config> {
        let mut figment = Figment::new().merge(Serialized::defaults(Config::default()));

        if let Some(path) = global {
            debug!("Loading global config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        if let Some(path) = project {
            debug!("Loading project config from: {}", path.display());
            figment = figment.merge(Toml::file(path));
        }

        // e.g. DOCUGENIUS_LLM__TIMEOUT_SECS -> llm.timeout_secs
        figment = figment.merge(Env::prefixed(ENV_PREFIX).split("__"));

        Self::extract(figment)
    }

    /// Load configuration from a specific file only
    pub fn load_from_file(path: &Path) -> Result<Config> {
        Self::extract(
            Figment::new()
                .merge(Serialized::defaults(Config::default()))
                .merge(Toml::file(path)),
        )
    }

    fn extract(figment: Figment) -> Result<Config> {
        let config: Config = figment
            .extract()
            .map_err(|e| DocError::config(format!("Configuration error: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    // =========================================================================
    // Path Management
    // =========================================================================

    /// Get path to global config directory (e.g. ~/.config/docugenius/)
    pub fn global_dir() -> Option<PathBuf> {
        ProjectDirs::from("", "", APP_NAME).map(|dirs| dirs.config_dir().to_path_buf())
    }

    /// Get path to global config file
    pub fn global_config_path() -> Option<PathBuf> {
        Self::global_dir().map(|dir| dir.join("config.toml"))
    }

    /// Get path to project config file
    pub fn project_config_path() -> PathBuf {
        PathBuf::from(PROJECT_CONFIG_FILE)
    }

    // =========================================================================
    // Config Commands
    // =========================================================================

    /// Render the effective configuration as TOML or JSON
    pub fn render(config: &Config, as_json: bool) -> Result<String> {
        if as_json {
            Ok(serde_json::to_string_pretty(config)?)
        } else {
            Ok(toml::to_string_pretty(config)?)
        }
    }

    /// Write a default config file, refusing to overwrite unless forced.
    ///
    /// Returns `false` when the file already existed and was left alone.
    pub fn init(path: &Path, force: bool) -> Result<bool> {
        if path.exists() && !force {
            info!("Config exists: {}", path.display());
            return Ok(false);
        }

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }

        fs::write(path, Self::default_config())?;
        info!("Created config: {}", path.display());
        Ok(true)
    }

    // =========================================================================
    // Internal
    // =========================================================================

    /// Generate default config content (TOML)
    fn default_config() -> String {
        r#"# docugenius configuration
# Project settings in ./docugenius.toml override the global file.
# Environment variables override both, e.g. DOCUGENIUS_LLM__MODEL=openai:gpt-4o-mini

[generation]
docstring_format = "google"   # google | numpy | sphinx
include_raises = true
include_returns = true
include_examples = true

[llm]
model = "openai:gpt-4o"       # openai:gpt-4o | openai:gpt-4o-mini
timeout_secs = 300
concurrency = 4
# api_base = "https://api.openai.com/v1"
# max_tokens = 4096
# The API key is read from OPENAI_API_KEY.

[scan]
exclude = []
max_file_size = 1048576
"#
        .to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DocstringFormat, ModelId};
    use tempfile::TempDir;

    #[test]
    fn test_default_config_file_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("docugenius.toml");

        assert!(ConfigLoader::init(&path, false).unwrap());
        let config = ConfigLoader::load_from_file(&path).unwrap();

        assert_eq!(config.llm.model, ModelId::Gpt4o);
        assert_eq!(config.generation.docstring_format, DocstringFormat::Google);
        assert_eq!(config.scan.max_file_size, 1_048_576);
    }

    #[test]
    fn test_init_refuses_overwrite_without_force() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested/config.toml");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "[llm]\nconcurrency = 9\n").unwrap();

        assert!(!ConfigLoader::init(&path, false).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("concurrency = 9"));

        assert!(ConfigLoader::init(&path, true).unwrap());
        assert!(fs::read_to_string(&path).unwrap().contains("concurrency = 4"));
    }

    #[test]
    fn test_project_overrides_global() {
        let dir = TempDir::new().unwrap();
        let global = dir.path().join("global.toml");
        let project = dir.path().join("project.toml");
        fs::write(
            &global,
            "[generation]\ndocstring_format = \"numpy\"\n[llm]\ntimeout_secs = 60\n",
        )
        .unwrap();
        fs::write(&project, "[llm]\ntimeout_secs = 30\n").unwrap();

        let config = ConfigLoader::load_layers(Some(&global), Some(&project)).unwrap();

        assert_eq!(config.generation.docstring_format, DocstringFormat::Numpy);
        assert_eq!(config.llm.timeout_secs, 30);
    }

    #[test]
    fn test_unknown_format_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[generation]\ndocstring_format = \"xml\"\n").unwrap();

        let err = ConfigLoader::load_from_file(&path).unwrap_err();
        assert!(matches!(err, DocError::Config(_)));
    }

    #[test]
    fn test_format_name_is_case_insensitive_in_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("mixed.toml");
        fs::write(&path, "[generation]\ndocstring_format = \"Google\"\n").unwrap();

        let config = ConfigLoader::load_from_file(&path).unwrap();
        assert_eq!(config.generation.docstring_format, DocstringFormat::Google);

        let rendered = ConfigLoader::render(&config, false).unwrap();
        assert!(rendered.contains("docstring_format = \"google\""));
    }

    #[test]
    fn test_unknown_model_is_config_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[llm]\nmodel = \"openai:gpt-2\"\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_zero_concurrency_rejected_at_load() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "[llm]\nconcurrency = 0\n").unwrap();

        assert!(ConfigLoader::load_from_file(&path).is_err());
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let dir = TempDir::new().unwrap();
        let err = ConfigLoader::load(Some(&dir.path().join("nope.toml"))).unwrap_err();
        assert!(err.to_string().contains("not found"));
    }

    #[test]
    fn test_env_override() {
        let dir = TempDir::new().unwrap();
        let project = dir.path().join("project.toml");
        fs::write(&project, "[llm]\nmodel = \"openai:gpt-4o\"\n").unwrap();

        // SAFETY: no other test reads this variable
        unsafe {
            std::env::set_var("DOCUGENIUS_LLM__MODEL", "openai:gpt-4o-mini");
        }
        let config = ConfigLoader::load_layers(None, Some(&project));
        unsafe {
            std::env::remove_var("DOCUGENIUS_LLM__MODEL");
        }

        assert_eq!(config.unwrap().llm.model, ModelId::Gpt4oMini);
    }

    #[test]
    fn test_render_formats() {
        let config = Config::default();
        let toml_out = ConfigLoader::render(&config, false).unwrap();
        assert!(toml_out.contains("[llm]"));

        let json_out = ConfigLoader::render(&config, true).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json_out).unwrap();
        assert_eq!(value["llm"]["model"], "openai:gpt-4o");
    }
}
