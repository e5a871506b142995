//! Build script generation
//!
//! Walks the settings of one toolchain and produces a [`Script`] that, for the
//! configuration selected at runtime with `-c <config>`:
//! 1. creates output directories and lock files
//! 2. detects a running hot reload target
//! 3. removes stale artifacts (unless hot reloading)
//! 4. compiles and links every target, reporting a status per target
//! 5. removes the lock files

use crate::backend::{emit_script, render_script, ShellBackend};
use crate::error::{BuildError, BuildResult};
use crate::ir::{Script, Statement, Test};
use crate::toolchain::Toolchain;
use crate::validate::validate;
use pl_config::{ScriptData, TargetSettings, TargetType};
use std::path::Path;

/// Variable holding the active configuration
pub const CONFIG_VAR: &str = "PL_CONFIG";

/// Variable set to 1 when the reload target is already running
pub const HOT_RELOAD_VAR: &str = "PL_HOT_RELOAD_STATUS";

/// Variable holding the per-target status message
pub const RESULT_VAR: &str = "PL_RESULT";

const SUCCESS_MESSAGE: &str = "${BOLD}${GREEN}Successful.${NC}";
const FAILURE_MESSAGE: &str = "${BOLD}${RED}Failed.${NC}";
const LOCK_MARKER: &str = "LOCKING";

const COLORS: [(&str, &str); 10] = [
    ("BOLD", "0;1"),
    ("RED", "0;31"),
    ("RED_BG", "0;41"),
    ("GREEN", "0;32"),
    ("GREEN_BG", "0;42"),
    ("CYAN", "0;36"),
    ("MAGENTA", "0;35"),
    ("YELLOW", "0;33"),
    ("WHITE", "0;97"),
    ("NC", "0"),
];

/// Outcome of a generation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedScript {
    /// Generated statements
    pub script: Script,
    /// Registered configurations without targets for this toolchain, in registration order
    pub empty_configurations: Vec<String>,
    /// Number of target sections emitted
    pub target_count: usize,
    /// Whether the script contains hot reload detection
    pub hot_reload: bool,
}

impl GeneratedScript {
    /// Render with a shell backend
    pub fn render(&self, backend: &dyn ShellBackend) -> String {
        render_script(backend, &self.script)
    }

    /// Render and write to `path`, replacing any existing file
    pub fn write(&self, path: impl AsRef<Path>, backend: &dyn ShellBackend) -> BuildResult<()> {
        let path = path.as_ref();
        emit_script(backend, &self.script).write_file(path)?;
        log::info!(
            "wrote {} build script for {} target(s) to {}",
            backend.dialect(),
            self.target_count,
            path.display()
        );
        Ok(())
    }
}

/// Generates build scripts for one toolchain
#[derive(Debug, Clone, Default)]
pub struct ScriptGenerator {
    toolchain: Toolchain,
}

impl ScriptGenerator {
    /// Create a generator for the given toolchain
    pub fn new(toolchain: Toolchain) -> Self {
        Self { toolchain }
    }

    pub fn toolchain(&self) -> &Toolchain {
        &self.toolchain
    }

    /// Fill in missing output extensions for this toolchain's settings.
    ///
    /// Returns how many records were changed; a second call returns 0.
    pub fn resolve_extensions(&self, data: &mut ScriptData) -> usize {
        let mut resolved = 0;
        for settings in data.current_settings.iter_mut() {
            if self.toolchain.matches(settings) {
                let default = self.toolchain.default_extension(settings.target_type);
                if settings.resolve_extension(default) {
                    resolved += 1;
                }
            }
        }
        resolved
    }

    /// Resolve extensions, validate, and build the script
    pub fn generate(&self, data: &mut ScriptData) -> BuildResult<GeneratedScript> {
        let resolved = self.resolve_extensions(data);
        if resolved > 0 {
            log::debug!("defaulted output extension of {} target(s)", resolved);
        }

        validate(data, &self.toolchain).map_err(BuildError::InvalidInput)?;
        Ok(self.build(data))
    }

    fn build(&self, data: &ScriptData) -> GeneratedScript {
        let settings: Vec<&TargetSettings> = data
            .settings_for(&self.toolchain.platform_name, &self.toolchain.compiler_name)
            .collect();

        let reload_process = data.reload_target_name.as_deref().map(process_name);
        let hot_reload = reload_process.is_some();

        let mut script = Script::new();
        self.emit_intro(data, &mut script);

        let mut empty_configurations = Vec::new();
        let mut target_count = 0;

        for config in &data.registered_configurations {
            let targets: Vec<&TargetSettings> = settings
                .iter()
                .copied()
                .filter(|s| &s.config_name == config)
                .collect();

            if targets.is_empty() {
                log::warn!(
                    "configuration '{}' has no {}/{} targets",
                    config,
                    self.toolchain.platform_name,
                    self.toolchain.compiler_name
                );
                empty_configurations.push(config.clone());
                continue;
            }

            log::debug!("configuration '{}': {} target(s)", config, targets.len());
            target_count += targets.len();

            script.push(Statement::Title(format!("configuration | {}", config)));
            script.push(Statement::Blank);
            script.push(Statement::when(
                Test::StringEquals {
                    variable: CONFIG_VAR.to_string(),
                    value: config.clone(),
                },
                self.configuration_body(config, &targets, reload_process.as_deref()),
            ));
            script.push(Statement::Blank);
        }

        script.push(Statement::Blank);
        script.push(Statement::comment("return CWD to previous CWD"));
        script.push(Statement::LeaveScriptDirectory);

        GeneratedScript {
            script,
            empty_configurations,
            target_count,
            hot_reload,
        }
    }

    fn emit_intro(&self, data: &ScriptData, script: &mut Script) {
        script.push(Statement::Shebang);
        script.push(Statement::Blank);
        script.push(Statement::comment("Auto Generated by:"));
        script.push(Statement::comment(format!(
            "\"pl_build\" version: {}",
            data.version
        )));
        script.push(Statement::Blank);
        script.push(Statement::comment(format!("Project: {}", data.project_name)));
        script.push(Statement::Blank);

        script.push(Statement::Title("Development Setup".to_string()));
        script.push(Statement::Blank);

        script.push(Statement::comment("colors"));
        script.extend(COLORS.iter().map(|(name, code)| Statement::Color {
            name: name.to_string(),
            code: code.to_string(),
        }));
        script.push(Statement::Blank);

        script.push(Statement::comment("find directory of this script"));
        script.push(Statement::EnterScriptDirectory);
        script.push(Statement::Blank);

        if let Some(default) = data.default_configuration() {
            script.push(Statement::comment("default configuration"));
            script.push(Statement::assign(CONFIG_VAR, default));
            script.push(Statement::Blank);
        }

        script.push(Statement::comment("check command line args for configuration"));
        script.push(Statement::ParseConfigurationFlag {
            variable: CONFIG_VAR.to_string(),
        });
        script.push(Statement::Blank);
    }

    fn configuration_body(
        &self,
        config: &str,
        targets: &[&TargetSettings],
        reload_process: Option<&str>,
    ) -> Vec<Statement> {
        let mut body = Vec::new();

        let mut output_dirs: Vec<&str> = Vec::new();
        let mut lock_files: Vec<(&str, &str)> = Vec::new();
        for settings in targets {
            push_unique(&mut output_dirs, settings.output_directory.as_str());
            push_unique(
                &mut lock_files,
                (settings.output_directory.as_str(), settings.lock_file.as_str()),
            );
        }

        body.push(Statement::comment("create output directory(s)"));
        body.extend(
            output_dirs
                .iter()
                .map(|dir| Statement::MakeDirectory(dir.to_string())),
        );
        body.push(Statement::Blank);

        body.push(Statement::comment("create lock file(s)"));
        body.extend(lock_files.iter().map(|(dir, lock)| Statement::WriteMarker {
            text: LOCK_MARKER.to_string(),
            path: join_path(dir, lock),
        }));
        body.push(Statement::Blank);

        let cleanup: Vec<Statement> = targets
            .iter()
            .filter(|s| !s.source_files.is_empty())
            .flat_map(|s| stale_artifacts(s))
            .map(Statement::DeleteFile)
            .collect();

        match reload_process {
            Some(process) => {
                body.push(Statement::comment("check if this is a reload"));
                body.push(Statement::assign(HOT_RELOAD_VAR, "0"));
                body.push(Statement::Blank);

                body.push(Statement::comment("let user know if hot reloading"));
                let mut fresh = vec![
                    Statement::comment("cleanup binaries if not hot reloading"),
                    Statement::assign(HOT_RELOAD_VAR, "0"),
                ];
                fresh.extend(cleanup);
                body.push(Statement::when_else(
                    Test::ProcessRunning {
                        name: process.to_string(),
                    },
                    vec![
                        Statement::assign(HOT_RELOAD_VAR, "1"),
                        Statement::Echo(None),
                        Statement::echo(
                            "${BOLD}${WHITE}${RED_BG}--------${GREEN_BG} HOT RELOADING ${RED_BG}--------${NC}",
                        ),
                        Statement::Echo(None),
                    ],
                    fresh,
                ));
                body.push(Statement::Blank);
            }
            None if !cleanup.is_empty() => {
                body.push(Statement::comment("cleanup binaries"));
                body.extend(cleanup);
                body.push(Statement::Blank);
            }
            None => {}
        }

        for settings in targets {
            body.push(Statement::SubTitle(format!(
                "{} | {}",
                settings.target_name, config
            )));
            body.push(Statement::Blank);

            let section = self.target_section(settings);
            if !settings.reloadable && reload_process.is_some() {
                body.push(Statement::comment("skip during hot reload"));
                body.push(Statement::when(
                    Test::NumberNotEquals {
                        variable: HOT_RELOAD_VAR.to_string(),
                        value: 1,
                    },
                    section,
                ));
                body.push(Statement::Blank);
            } else {
                body.extend(section);
            }
        }

        body.push(Statement::comment("delete lock file(s)"));
        body.extend(
            lock_files
                .iter()
                .map(|(dir, lock)| Statement::DeleteFile(join_path(dir, lock))),
        );
        body.push(Statement::Blank);

        body.push(Statement::comment("~".repeat(40)));
        body.push(Statement::comment(format!("end of {}", config)));

        body
    }

    fn target_section(&self, settings: &TargetSettings) -> Vec<Statement> {
        let mut section = Vec::new();

        if let Some(step) = &settings.pre_build_step {
            section.push(Statement::Raw(step.clone()));
            section.push(Statement::Blank);
        }

        if !settings.source_files.is_empty() {
            section.push(Statement::assign(RESULT_VAR, SUCCESS_MESSAGE));
            section.extend(flag_assignments(settings));

            match settings.target_type {
                TargetType::StaticLibrary => self.compile_static_library(settings, &mut section),
                TargetType::DynamicLibrary => {
                    self.compile_and_link(settings, &["-shared"], &mut section)
                }
                TargetType::Executable => self.compile_and_link(settings, &[], &mut section),
            }

            section.push(Statement::comment("check build status"));
            section.push(Statement::when(
                Test::LastCommandFailed,
                vec![Statement::assign(RESULT_VAR, FAILURE_MESSAGE)],
            ));
            section.push(Statement::Blank);

            section.push(Statement::comment("print results"));
            section.push(Statement::echo("${CYAN}Results: ${NC} ${PL_RESULT}"));
            section.push(Statement::echo("${CYAN}~~~~~~~~~~~~~~~~~~~~~~${NC}"));
            section.push(Statement::Blank);
        }

        if let Some(step) = &settings.post_build_step {
            section.push(Statement::Raw(step.clone()));
            section.push(Statement::Blank);
        }

        section
    }

    fn compile_static_library(&self, settings: &TargetSettings, section: &mut Vec<Statement>) {
        let dir = &settings.output_directory;
        let compiler = &self.toolchain.compiler_command;

        section.push(Statement::comment("run compiler only"));
        section.extend(step_banner(&settings.target_name, "Compiling..."));
        section.push(Statement::Blank);

        section.push(Statement::comment("each file must be compiled separately"));
        for source in &settings.source_files {
            section.push(Statement::command(format!(
                "{} -c $PL_INCLUDE_DIRECTORIES $PL_DEFINES $PL_COMPILER_FLAGS {} -o \"./{}\"",
                compiler,
                source,
                join_path(dir, &format!("{}.o", source_stem(source)))
            )));
        }
        section.push(Statement::Blank);

        section.push(Statement::comment("combine object files into a static lib"));
        section.push(Statement::command(format!(
            "{} ./{} ./{}",
            self.toolchain.archiver_command,
            join_path(dir, &settings.output_filename()),
            join_path(dir, "*.o")
        )));
        section.push(Statement::command(format!("rm ./{}", join_path(dir, "*.o"))));
        section.push(Statement::Blank);
    }

    fn compile_and_link(
        &self,
        settings: &TargetSettings,
        extra: &[&str],
        section: &mut Vec<Statement>,
    ) {
        section.push(Statement::assign_quoted(
            "PL_SOURCES",
            settings.source_files.join(" "),
        ));
        section.push(Statement::Blank);

        section.push(Statement::comment("run compiler (and linker)"));
        section.extend(step_banner(&settings.target_name, "Compiling and Linking..."));

        let mut words: Vec<&str> = vec![self.toolchain.compiler_command.as_str()];
        words.extend_from_slice(extra);
        words.extend_from_slice(&[
            "$PL_SOURCES",
            "$PL_INCLUDE_DIRECTORIES",
            "$PL_DEFINES",
            "$PL_COMPILER_FLAGS",
            "$PL_LINK_DIRECTORIES",
            "$PL_LINKER_FLAGS",
            "$PL_STATIC_LINK_LIBRARIES",
            "$PL_DYNAMIC_LINK_LIBRARIES",
        ]);

        section.push(Statement::command(format!(
            "{} -o \"./{}\"",
            words.join(" "),
            join_path(&settings.output_directory, &settings.output_filename())
        )));
        section.push(Statement::Blank);
    }
}

/// Generate a build script for Linux/gcc and write it to `path`.
///
/// Missing output extensions in `data` are filled in as a side effect.
pub fn generate_build(
    data: &mut ScriptData,
    path: impl AsRef<Path>,
    backend: &dyn ShellBackend,
) -> BuildResult<GeneratedScript> {
    let generated = ScriptGenerator::default().generate(data)?;
    generated.write(path, backend)?;
    Ok(generated)
}

fn flag_assignments(settings: &TargetSettings) -> Vec<Statement> {
    vec![
        Statement::assign_quoted("PL_DEFINES", prefixed(&settings.definitions, "-D", "")),
        Statement::assign_quoted(
            "PL_INCLUDE_DIRECTORIES",
            prefixed(&settings.include_directories, "-I", ""),
        ),
        Statement::assign_quoted(
            "PL_LINK_DIRECTORIES",
            prefixed(&settings.link_directories, "-L", ""),
        ),
        Statement::assign_quoted("PL_COMPILER_FLAGS", prefixed(&settings.compiler_flags, "", "")),
        Statement::assign_quoted("PL_LINKER_FLAGS", prefixed(&settings.linker_flags, "", "")),
        Statement::assign_quoted(
            "PL_STATIC_LINK_LIBRARIES",
            prefixed(&settings.static_link_libraries, "-l:", ".a"),
        ),
        Statement::assign_quoted(
            "PL_DYNAMIC_LINK_LIBRARIES",
            prefixed(&settings.dynamic_link_libraries, "-l", ""),
        ),
    ]
}

fn step_banner(target_name: &str, action: &str) -> Vec<Statement> {
    vec![
        Statement::Echo(None),
        Statement::echo(format!("${{YELLOW}}Step: {}${{NC}}", target_name)),
        Statement::echo("${YELLOW}~~~~~~~~~~~~~~~~~~~${NC}"),
        Statement::echo(format!("${{CYAN}}{}${{NC}}", action)),
    ]
}

/// Artifacts removed before a fresh build
fn stale_artifacts(settings: &TargetSettings) -> Vec<String> {
    let dir = &settings.output_directory;
    match settings.target_type {
        TargetType::DynamicLibrary => vec![
            join_path(dir, &settings.output_filename()),
            join_path(
                dir,
                &format!("{}_*{}", settings.output_binary, settings.extension()),
            ),
        ],
        TargetType::Executable | TargetType::StaticLibrary => {
            vec![join_path(dir, &settings.output_filename())]
        }
    }
}

fn prefixed(items: &[String], prefix: &str, suffix: &str) -> String {
    items
        .iter()
        .map(|item| format!("{}{}{}", prefix, item, suffix))
        .collect::<Vec<_>>()
        .join(" ")
}

fn push_unique<T: PartialEq>(items: &mut Vec<T>, item: T) {
    if !items.contains(&item) {
        items.push(item);
    }
}

fn join_path(dir: &str, file: &str) -> String {
    if dir.is_empty() {
        file.to_string()
    } else {
        format!("{}/{}", dir.trim_end_matches('/'), file)
    }
}

/// File name without directory or extension (`src/pl_ds.c` -> `pl_ds`)
fn source_stem(path: &str) -> &str {
    Path::new(path)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
}

/// Process name looked up for hot reload detection
fn process_name(reload_target: &str) -> String {
    source_stem(reload_target).to_string()
}
