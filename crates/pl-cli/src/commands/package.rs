//! Package command - zip headers and binaries for distribution

use super::load_project;
use anyhow::{Context, Result};
use colored::Colorize;
use pl_config::loader::DEFAULT_OUT_DIR;
use pl_config::EnvOverrides;
use pl_package::{PackageManifest, Packager};
use std::path::{Path, PathBuf};

/// Package command arguments
#[derive(Debug, Default)]
pub struct PackageArgs {
    pub out_dir: Option<PathBuf>,
    pub root: Option<PathBuf>,
    pub manifest: Option<PathBuf>,
    pub debug: bool,
    pub json: bool,
}

/// Run the package command
pub fn run(args: PackageArgs) -> Result<()> {
    // Packaging works without a project file; it only supplies defaults
    let config = match load_project(None) {
        Ok(config) => Some(config),
        Err(e) => {
            log::debug!("no project configuration: {:#}", e);
            None
        }
    };

    let out_dir = match (args.out_dir, &config) {
        (Some(dir), _) => dir,
        (None, Some(config)) => config.out_dir(),
        (None, None) => EnvOverrides::from_env()?
            .out_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
    };
    let root = args.root.unwrap_or_else(|| default_root(&out_dir));
    let debug = args.debug
        || config
            .as_ref()
            .map(|c| c.global.debug_package())
            .unwrap_or(false);

    let manifest = match &args.manifest {
        Some(path) => PackageManifest::from_file(path)
            .with_context(|| format!("Failed to load package manifest {}", path.display()))?,
        None => PackageManifest::default(),
    };

    let packager = Packager::for_host(&root)?
        .with_out_dir(&out_dir)
        .with_manifest(manifest)
        .with_debug(debug);
    let report = packager.run().context("Packaging failed")?;

    if args.json {
        println!(
            "{}",
            serde_json::json!({
                "success": true,
                "archive": report.archive.display().to_string(),
                "headers": report.headers,
                "binaries": report.binaries,
                "debug_artifacts": report.debug_artifacts,
                "entries": report.archive_entries,
            })
        );
    } else {
        println!(
            "{} {} ({} headers, {} binaries)",
            "Packaged".green().bold(),
            report.archive.display(),
            report.headers,
            report.binaries.len()
        );
    }

    Ok(())
}

/// Parent of the output directory, or `.` when it has none
fn default_root(out_dir: &Path) -> PathBuf {
    match out_dir.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_root() {
        assert_eq!(default_root(Path::new("../out")), PathBuf::from(".."));
        assert_eq!(default_root(Path::new("out")), PathBuf::from("."));
        assert_eq!(
            default_root(Path::new("/work/pl/out")),
            PathBuf::from("/work/pl")
        );
    }
}
