//! Package manifest: which headers and binaries go into a distribution

use crate::{PackageError, PackageResult};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Headers copied from one source directory into `include/`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct HeaderGroup {
    /// Directory relative to the project root
    pub directory: String,
    /// Header file names inside `directory`
    pub files: Vec<String>,
}

impl HeaderGroup {
    pub fn new<I, S>(directory: impl Into<String>, files: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directory: directory.into(),
            files: files.into_iter().map(Into::into).collect(),
        }
    }
}

/// Contents of a distribution archive
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PackageManifest {
    /// Name of the staging directory and archive prefix
    pub name: String,
    /// Public headers
    pub headers: Vec<HeaderGroup>,
    /// Dynamic libraries (base names, platform extension appended)
    pub libraries: Vec<String>,
    /// Script extensions, packaged like libraries
    pub scripts: Vec<String>,
    /// Executables (base names, platform extension appended)
    pub executables: Vec<String>,
    /// Glob patterns, relative to the output directory, for extra build products
    pub assets: Vec<String>,
}

impl Default for PackageManifest {
    fn default() -> Self {
        Self {
            name: "pilotlight".to_string(),
            headers: vec![
                HeaderGroup::new("src", ["pl.h", "pl_config.h", "pl_os.h"]),
                HeaderGroup::new(
                    "extensions",
                    [
                        "pl_debug_ext.h",
                        "pl_draw_ext.h",
                        "pl_ecs_ext.h",
                        "pl_gpu_allocators_ext.h",
                        "pl_graphics_ext.h",
                        "pl_image_ext.h",
                        "pl_job_ext.h",
                        "pl_model_loader_ext.h",
                        "pl_rect_pack_ext.h",
                        "pl_renderer_ext.h",
                        "pl_resource_ext.h",
                        "pl_shader_ext.h",
                        "pl_stats_ext.h",
                        "pl_ui_ext.h",
                        "pl_script_ext.h",
                    ],
                ),
                HeaderGroup::new(
                    "libs",
                    [
                        "pl_ds.h",
                        "pl_log.h",
                        "pl_profile.h",
                        "pl_memory.h",
                        "pl_math.h",
                        "pl_json.h",
                        "pl_stl.h",
                        "pl_string.h",
                    ],
                ),
                HeaderGroup::new("dependencies/stb", ["stb_sprintf.h"]),
            ],
            libraries: vec![
                "pilot_light".to_string(),
                "pilot_light_experimental".to_string(),
                "app".to_string(),
            ],
            scripts: vec!["pl_script_camera".to_string()],
            executables: vec!["pilot_light".to_string()],
            assets: vec!["*.spv".to_string()],
        }
    }
}

impl PackageManifest {
    /// Parse a manifest from TOML; omitted fields keep their defaults
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Load a manifest from a TOML file
    pub fn from_file(path: &Path) -> PackageResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| PackageError::io(path, e))?;
        Self::from_str(&content).map_err(|error| PackageError::ManifestParse {
            path: path.to_path_buf(),
            error,
        })
    }

    /// Total number of header files
    pub fn header_count(&self) -> usize {
        self.headers.iter().map(|group| group.files.len()).sum()
    }
}
