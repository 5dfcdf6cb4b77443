//! Project initialization for `apidoc init`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use apidoc_core::config::CONFIG_FILE;
use apidoc_core::DocConfig;

/// Options for project initialization.
#[derive(Debug, Clone, Default)]
pub struct InitOptions {
    /// Project directory.
    pub path: PathBuf,

    /// Project title (defaults to directory name).
    pub name: Option<String>,
}

/// Write a default `apidoc.toml` into the project directory.
pub fn init_project(options: InitOptions) -> Result<PathBuf> {
    let root = &options.path;
    let config_path = root.join(CONFIG_FILE);
    if config_path.exists() {
        bail!(
            "Cannot initialize: `{}` already exists in {}",
            CONFIG_FILE,
            root.display()
        );
    }

    let name = match options.name {
        Some(name) => name,
        None => infer_project_name(root)?,
    };
    let config = DocConfig::new(name);
    config.validate()?;

    let content = config
        .to_toml_string()
        .context("Failed to serialize configuration")?;
    fs::create_dir_all(root)
        .with_context(|| format!("Failed to create {}", root.display()))?;
    fs::write(&config_path, content)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    Ok(config_path)
}

fn infer_project_name(root: &Path) -> Result<String> {
    let absolute = if root.is_absolute() {
        root.to_path_buf()
    } else {
        std::env::current_dir()
            .context("Failed to get current directory")?
            .join(root)
    };
    absolute
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(name) => name.to_str(),
            _ => None,
        })
        .last()
        .map(str::to_string)
        .context("Cannot infer a project name; pass --name")
}
