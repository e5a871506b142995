//! Staging and archiving of a distribution

use crate::archive::zip_directory;
use crate::manifest::PackageManifest;
use crate::platform::{DebugArtifact, HostPlatform};
use crate::{PackageError, PackageResult};
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Summary of a packaging run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageReport {
    /// Written zip file
    pub archive: PathBuf,
    /// Number of headers copied into `include/`
    pub headers: usize,
    /// File names moved into `bin/`, in packaging order
    pub binaries: Vec<String>,
    /// Debug symbol files and bundles packaged
    pub debug_artifacts: usize,
    /// Entries written to the archive
    pub archive_entries: usize,
}

/// Assembles a distribution from a built project.
///
/// Headers are copied from the project root. Binaries are *moved* out of the
/// output directory, so a second run requires a rebuild.
#[derive(Debug, Clone)]
pub struct Packager {
    root: PathBuf,
    out_dir: PathBuf,
    manifest: PackageManifest,
    platform: HostPlatform,
    debug: bool,
}

impl Packager {
    /// Package the project at `root`, reading build products from `root/out`
    pub fn new(root: impl Into<PathBuf>, platform: HostPlatform) -> Self {
        let root = root.into();
        Self {
            out_dir: root.join("out"),
            root,
            manifest: PackageManifest::default(),
            platform,
            debug: false,
        }
    }

    /// Like [`Packager::new`] for the platform this process runs on
    pub fn for_host(root: impl Into<PathBuf>) -> PackageResult<Self> {
        Ok(Self::new(root, HostPlatform::detect()?))
    }

    pub fn with_out_dir(mut self, out_dir: impl Into<PathBuf>) -> Self {
        self.out_dir = out_dir.into();
        self
    }

    pub fn with_manifest(mut self, manifest: PackageManifest) -> Self {
        self.manifest = manifest;
        self
    }

    /// Include debug symbols
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn out_dir(&self) -> &Path {
        &self.out_dir
    }

    /// Temporary tree the archive is built from
    pub fn staging_dir(&self) -> PathBuf {
        self.out_dir.join(&self.manifest.name)
    }

    pub fn archive_path(&self) -> PathBuf {
        self.out_dir.join(format!(
            "{}.zip",
            self.platform.archive_stem(&self.manifest.name)
        ))
    }

    /// Stage headers and binaries, write the archive, remove the staging tree
    pub fn run(&self) -> PackageResult<PackageReport> {
        if !self.out_dir.is_dir() {
            return Err(PackageError::NotBuilt(self.out_dir.clone()));
        }
        // nothing is moved until every required file is present
        self.check_artifacts()?;

        let staging = self.staging_dir();
        if staging.exists() {
            fs::remove_dir_all(&staging).map_err(|e| PackageError::io(&staging, e))?;
        }
        let include = staging.join("include");
        let bin = staging.join("bin");
        for dir in [&include, &bin] {
            fs::create_dir_all(dir).map_err(|e| PackageError::io(dir, e))?;
        }

        log::info!(
            "packaging {} for {} into {}",
            self.manifest.name,
            self.platform,
            staging.display()
        );

        let mut report = PackageReport {
            archive: self.archive_path(),
            headers: 0,
            binaries: Vec::new(),
            debug_artifacts: 0,
            archive_entries: 0,
        };

        for group in &self.manifest.headers {
            let source_dir = self.root.join(&group.directory);
            for file in &group.files {
                copy_file(&source_dir.join(file), &include.join(file))?;
                report.headers += 1;
            }
        }

        for library in self.manifest.libraries.iter().chain(&self.manifest.scripts) {
            self.stage_binary(&self.library_file(library), &bin, &mut report)?;
            if self.debug {
                let artifacts = self.platform.library_debug_artifacts(library);
                self.stage_debug_artifacts(&artifacts, &bin, &mut report)?;
            }
        }

        for executable in &self.manifest.executables {
            self.stage_binary(&self.executable_file(executable), &bin, &mut report)?;
            if self.debug {
                let artifacts = self.platform.executable_debug_artifacts(executable);
                self.stage_debug_artifacts(&artifacts, &bin, &mut report)?;
            }
        }

        if self.debug {
            if let Some(database) = self.platform.compiler_debug_database() {
                let source = self.root.join(database);
                if source.is_file() {
                    move_into(&source, &bin)?;
                    report.debug_artifacts += 1;
                } else {
                    log::warn!("debug database {} not found", source.display());
                }
            }
        }

        for pattern in &self.manifest.assets {
            for path in self.glob_out_dir(pattern)? {
                let name = move_into(&path, &bin)?;
                report.binaries.push(name);
            }
        }

        let archive = self.archive_path();
        report.archive_entries = zip_directory(&staging, &archive)?;
        fs::remove_dir_all(&staging).map_err(|e| PackageError::io(&staging, e))?;

        log::info!(
            "wrote {} ({} headers, {} binaries)",
            archive.display(),
            report.headers,
            report.binaries.len()
        );
        Ok(report)
    }

    fn library_file(&self, name: &str) -> String {
        format!("{}{}", name, self.platform.dynamic_library_extension())
    }

    fn executable_file(&self, name: &str) -> String {
        format!("{}{}", name, self.platform.executable_extension())
    }

    /// Fail on the first header or binary the manifest names but the tree lacks
    fn check_artifacts(&self) -> PackageResult<()> {
        let headers = self.manifest.headers.iter().flat_map(|group| {
            let directory = self.root.join(&group.directory);
            group.files.iter().map(move |file| directory.join(file))
        });
        let libraries = self
            .manifest
            .libraries
            .iter()
            .chain(&self.manifest.scripts)
            .map(|name| self.out_dir.join(self.library_file(name)));
        let executables = self
            .manifest
            .executables
            .iter()
            .map(|name| self.out_dir.join(self.executable_file(name)));

        match headers
            .chain(libraries)
            .chain(executables)
            .find(|path| !path.is_file())
        {
            Some(missing) => Err(PackageError::MissingArtifact(missing)),
            None => Ok(()),
        }
    }

    fn stage_binary(
        &self,
        file_name: &str,
        bin: &Path,
        report: &mut PackageReport,
    ) -> PackageResult<()> {
        let source = self.out_dir.join(file_name);
        if !source.is_file() {
            return Err(PackageError::MissingArtifact(source));
        }
        let name = move_into(&source, bin)?;
        report.binaries.push(name);
        Ok(())
    }

    fn stage_debug_artifacts(
        &self,
        artifacts: &[DebugArtifact],
        bin: &Path,
        report: &mut PackageReport,
    ) -> PackageResult<()> {
        for artifact in artifacts {
            match artifact {
                DebugArtifact::Files(pattern) => {
                    for path in self.glob_out_dir(pattern)? {
                        move_into(&path, bin)?;
                        report.debug_artifacts += 1;
                    }
                }
                DebugArtifact::Bundle(name) => {
                    let source = self.out_dir.join(name);
                    if source.is_dir() {
                        copy_tree(&source, &bin.join(name))?;
                        report.debug_artifacts += 1;
                    } else {
                        log::warn!("debug bundle {} not found", source.display());
                    }
                }
            }
        }
        Ok(())
    }

    /// Files in the output directory matching `pattern`, sorted
    fn glob_out_dir(&self, pattern: &str) -> PackageResult<Vec<PathBuf>> {
        let escaped = glob::Pattern::escape(&self.out_dir.to_string_lossy());
        let full = format!("{}/{}", escaped, pattern);
        let paths = glob::glob(&full).map_err(|error| PackageError::InvalidPattern {
            pattern: pattern.to_string(),
            error,
        })?;

        let mut files: Vec<PathBuf> = paths
            .filter_map(Result::ok)
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        Ok(files)
    }
}

fn copy_file(source: &Path, destination: &Path) -> PackageResult<()> {
    if !source.is_file() {
        return Err(PackageError::MissingArtifact(source.to_path_buf()));
    }
    fs::copy(source, destination).map_err(|e| PackageError::io(source, e))?;
    log::debug!("copied {}", source.display());
    Ok(())
}

/// Move a file into `directory`, returning its file name
fn move_into(source: &Path, directory: &Path) -> PackageResult<String> {
    let name = source
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| PackageError::MissingArtifact(source.to_path_buf()))?;
    let destination = directory.join(&name);

    // rename fails across filesystems
    if fs::rename(source, &destination).is_err() {
        fs::copy(source, &destination).map_err(|e| PackageError::io(source, e))?;
        fs::remove_file(source).map_err(|e| PackageError::io(source, e))?;
    }
    log::debug!("moved {}", source.display());
    Ok(name)
}

fn copy_tree(source: &Path, destination: &Path) -> PackageResult<()> {
    for entry in WalkDir::new(source) {
        let entry = entry.map_err(|e| PackageError::io(source, std::io::Error::from(e)))?;
        let rel = entry
            .path()
            .strip_prefix(source)
            .map_err(|e| PackageError::io(entry.path(), std::io::Error::new(std::io::ErrorKind::Other, e)))?;
        let target = destination.join(rel);
        if entry.file_type().is_dir() {
            fs::create_dir_all(&target).map_err(|e| PackageError::io(&target, e))?;
        } else {
            fs::copy(entry.path(), &target).map_err(|e| PackageError::io(entry.path(), e))?;
        }
    }
    Ok(())
}
