//! Project description validation
//!
//! Rejects descriptions that would otherwise produce partial or broken
//! scripts. Configurations without any targets are not errors; the generator
//! reports them separately.

use crate::error::ValidationError;
use crate::toolchain::Toolchain;
use pl_config::{ScriptData, TargetType};
use std::collections::{HashMap, HashSet};

/// Check a project description against a toolchain.
///
/// Only settings belonging to the toolchain are inspected. Every problem is
/// collected; the result is `Ok` only when none were found.
pub fn validate(data: &ScriptData, toolchain: &Toolchain) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if data.project_name.trim().is_empty() {
        errors.push(ValidationError::EmptyProjectName);
    }

    if matches!(&data.reload_target_name, Some(name) if name.trim().is_empty()) {
        errors.push(ValidationError::EmptyReloadTarget);
    }

    if data.registered_configurations.is_empty() {
        errors.push(ValidationError::NoConfigurations);
    }

    let mut seen = HashSet::new();
    for config in &data.registered_configurations {
        if !seen.insert(config.as_str()) {
            errors.push(ValidationError::DuplicateConfiguration(config.clone()));
        }
    }

    // (config, output directory) -> first static library using it
    let mut static_dirs: HashMap<(&str, &str), &str> = HashMap::new();

    for settings in data.current_settings.iter().filter(|s| toolchain.matches(s)) {
        if settings.target_name.trim().is_empty() {
            errors.push(ValidationError::EmptyTargetName {
                platform: settings.platform_name.clone(),
                compiler: settings.name.clone(),
            });
        }

        if settings.output_binary.trim().is_empty() {
            errors.push(ValidationError::EmptyOutputBinary {
                target: settings.target_name.clone(),
            });
        }

        if !data.is_registered(&settings.config_name) {
            errors.push(ValidationError::UnregisteredConfiguration {
                target: settings.target_name.clone(),
                config: settings.config_name.clone(),
            });
        }

        if settings.target_type == TargetType::StaticLibrary && !settings.source_files.is_empty()
        {
            let key = (
                settings.config_name.as_str(),
                settings.output_directory.as_str(),
            );
            match static_dirs.get(&key) {
                Some(first) => errors.push(ValidationError::SharedStaticLibraryDirectory {
                    config: settings.config_name.clone(),
                    directory: settings.output_directory.clone(),
                    first: (*first).to_string(),
                    second: settings.target_name.clone(),
                }),
                None => {
                    static_dirs.insert(key, settings.target_name.as_str());
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pl_config::TargetSettings;

    fn linux(name: &str, target_type: TargetType) -> TargetSettings {
        TargetSettings::new(name, target_type)
            .for_toolchain("Linux", "gcc")
            .with_config("debug")
            .with_output("out", name)
            .with_sources([format!("{}.c", name)])
    }

    fn project() -> ScriptData {
        ScriptData::new("demo").with_configuration("debug")
    }

    #[test]
    fn test_valid_project() {
        let data = project().with_settings(linux("app", TargetType::Executable));
        assert!(validate(&data, &Toolchain::linux_gcc()).is_ok());
    }

    #[test]
    fn test_no_configurations() {
        let data = ScriptData::new("demo");
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::NoConfigurations]);
    }

    #[test]
    fn test_empty_project_name() {
        let data = ScriptData::new(" ").with_configuration("debug");
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyProjectName]);
    }

    #[test]
    fn test_empty_reload_target() {
        let data = project()
            .with_reload_target("")
            .with_settings(linux("app", TargetType::Executable));
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(errors, vec![ValidationError::EmptyReloadTarget]);
    }

    #[test]
    fn test_duplicate_configuration() {
        let data = project().with_configuration("debug");
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::DuplicateConfiguration("debug".into())]
        );
    }

    #[test]
    fn test_unregistered_configuration() {
        let data =
            project().with_settings(linux("app", TargetType::Executable).with_config("profile"));
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::UnregisteredConfiguration {
                target: "app".into(),
                config: "profile".into(),
            }]
        );
    }

    #[test]
    fn test_other_toolchains_are_ignored() {
        let data = project().with_settings(
            TargetSettings::new("", TargetType::Executable)
                .for_toolchain("Windows", "msvc")
                .with_config("unknown"),
        );
        assert!(validate(&data, &Toolchain::linux_gcc()).is_ok());
    }

    #[test]
    fn test_shared_static_library_directory() {
        let data = project()
            .with_settings(linux("math", TargetType::StaticLibrary))
            .with_settings(linux("strings", TargetType::StaticLibrary));
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(
            errors,
            vec![ValidationError::SharedStaticLibraryDirectory {
                config: "debug".into(),
                directory: "out".into(),
                first: "math".into(),
                second: "strings".into(),
            }]
        );
    }

    #[test]
    fn test_static_libraries_in_separate_directories() {
        let data = project()
            .with_settings(linux("math", TargetType::StaticLibrary).with_output("out/math", "math"))
            .with_settings(linux("strings", TargetType::StaticLibrary));
        assert!(validate(&data, &Toolchain::linux_gcc()).is_ok());
    }

    #[test]
    fn test_collects_every_error() {
        let data = ScriptData::new("").with_settings(
            TargetSettings::new("", TargetType::Executable)
                .for_toolchain("Linux", "gcc")
                .with_output("out", ""),
        );
        let errors = validate(&data, &Toolchain::linux_gcc()).unwrap_err();
        assert_eq!(errors.len(), 5);
    }
}
