//! Generate command - write the build script for a project

use super::load_project;
use anyhow::{Context, Result};
use colored::Colorize;
use pl_build::{generate_build, ShellDialect};
use std::path::PathBuf;

/// Generate command arguments
#[derive(Debug, Default)]
pub struct GenerateArgs {
    pub project: Option<PathBuf>,
    pub output: Option<PathBuf>,
    pub shell: Option<String>,
    pub indent: Option<usize>,
    pub json: bool,
}

/// Run the generate command
pub fn run(args: GenerateArgs) -> Result<()> {
    let config = load_project(args.project.as_deref())?;

    // CLI flags override env, global and defaults
    let dialect: ShellDialect = args
        .shell
        .as_deref()
        .unwrap_or(config.shell())
        .parse()?;
    let indent = args.indent.unwrap_or_else(|| config.indent());
    let output = args.output.unwrap_or_else(|| config.output_path());
    let backend = dialect.backend_with_indent(indent);

    let mut data = config.script_data;
    let generated = generate_build(&mut data, &output, backend.as_ref())
        .with_context(|| format!("Failed to generate {}", output.display()))?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "project": data.project_name,
                "output": output.display().to_string(),
                "shell": dialect.name(),
                "targets": generated.target_count,
                "hot_reload": generated.hot_reload,
                "empty_configurations": generated.empty_configurations,
            })
        );
        return Ok(());
    }

    println!(
        "{} {} ({} target(s), {})",
        "Generated".green().bold(),
        output.display(),
        generated.target_count,
        dialect
    );
    for name in &generated.empty_configurations {
        println!(
            "{} configuration '{}' has no Linux/gcc targets and was skipped",
            "warning:".yellow().bold(),
            name
        );
    }

    Ok(())
}
