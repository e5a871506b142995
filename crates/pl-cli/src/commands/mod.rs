pub mod check;
pub mod generate;
pub mod package;

use anyhow::{Context, Result};
use pl_config::{Config, ConfigLoader};
use std::path::Path;

/// Load the project from an explicit file or the nearest `pl_build.toml`
pub fn load_project(project: Option<&Path>) -> Result<Config> {
    let mut loader = ConfigLoader::new();
    match project {
        Some(path) => loader
            .load_from_file(path)
            .with_context(|| format!("Failed to load project file {}", path.display())),
        None => {
            let cwd = std::env::current_dir().context("Failed to read current directory")?;
            loader
                .load_from_directory(&cwd)
                .context("Failed to load project")
        }
    }
}
