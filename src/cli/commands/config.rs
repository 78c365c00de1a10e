//! Config Command
//!
//! Manage docugenius configuration.
//!
//! Usage:
//!   docugenius config show [--format toml|json]
//!   docugenius config path
//!   docugenius config init [--force]

use std::path::Path;

use crate::cli::ui::Output;
use crate::config::ConfigLoader;
use crate::types::{DocError, Result};

/// Show the effective configuration (merged from all sources)
pub fn show(config_path: Option<&Path>, format: &str) -> Result<()> {
    let as_json = match format {
        "json" => true,
        "toml" => false,
        other => {
            return Err(DocError::config(format!(
                "Invalid output format '{}'. Valid values: toml, json",
                other
            )));
        }
    };

    let config = ConfigLoader::load(config_path)?;
    println!("{}", ConfigLoader::render(&config, as_json)?);
    Ok(())
}

/// Show configuration paths
pub fn path(config_path: Option<&Path>) -> Result<()> {
    let mark = |p: &Path| if p.exists() { "✓" } else { "✗" };

    println!("Configuration paths:");
    println!();

    match ConfigLoader::global_config_path() {
        Some(global) => println!("  Global:  {} {}", mark(&global), global.display()),
        None => println!("  Global:  (not available)"),
    }

    let project = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(ConfigLoader::project_config_path);
    println!("  Project: {} {}", mark(&project), project.display());

    Ok(())
}

/// Write a default project config file
pub fn init(config_path: Option<&Path>, force: bool) -> Result<()> {
    let output = Output::new();
    let path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(ConfigLoader::project_config_path);

    if ConfigLoader::init(&path, force)? {
        output.success(&format!("Created {}", path.display()));
    } else {
        output.warning(&format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        ));
    }
    Ok(())
}
