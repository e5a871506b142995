//! Check command - validate a project description without writing a script

use super::load_project;
use anyhow::Result;
use colored::Colorize;
use pl_build::{BuildError, ScriptGenerator};
use std::path::Path;

/// Validate the project and report problems
pub fn run(project: Option<&Path>, json: bool) -> Result<()> {
    let config = load_project(project)?;
    let mut data = config.script_data;

    match ScriptGenerator::default().generate(&mut data) {
        Ok(generated) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": true,
                        "project": data.project_name,
                        "targets": generated.target_count,
                        "empty_configurations": generated.empty_configurations,
                        "errors": [],
                    })
                );
            } else {
                println!(
                    "{}: {} target(s) in {} configuration(s), no errors found",
                    data.project_name,
                    generated.target_count,
                    data.registered_configurations.len() - generated.empty_configurations.len()
                );
                for name in &generated.empty_configurations {
                    println!(
                        "{} configuration '{}' has no Linux/gcc targets",
                        "warning:".yellow().bold(),
                        name
                    );
                }
            }
            Ok(())
        }
        Err(BuildError::InvalidInput(errors)) => {
            if json {
                let messages: Vec<String> = errors.iter().map(ToString::to_string).collect();
                println!(
                    "{}",
                    serde_json::json!({
                        "valid": false,
                        "project": data.project_name,
                        "errors": messages,
                    })
                );
            } else {
                for error in &errors {
                    eprintln!("{} {}", "error:".red().bold(), error);
                }
            }
            Err(anyhow::anyhow!(
                "{} problem(s) found in project '{}'",
                errors.len(),
                data.project_name
            ))
        }
        Err(e) => Err(e.into()),
    }
}
