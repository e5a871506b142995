//! End-to-end tests for build script generation

use pl_build::{
    generate_build, BashBackend, BuildError, PosixShBackend, ScriptGenerator, ShellDialect,
    Statement, ValidationError,
};
use pl_config::{ScriptData, TargetSettings, TargetType};
use pretty_assertions::assert_eq;
use rstest::rstest;

fn linux(name: &str, target_type: TargetType, config: &str) -> TargetSettings {
    TargetSettings::new(name, target_type)
        .for_toolchain("Linux", "gcc")
        .with_config(config)
        .with_output("out", name)
}

fn render(data: &mut ScriptData) -> String {
    ScriptGenerator::default()
        .generate(data)
        .unwrap()
        .render(&BashBackend::new())
}

/// Byte offset of `needle` at or after `from`, panicking with context if absent
fn find_after(text: &str, needle: &str, from: usize) -> usize {
    match text[from..].find(needle) {
        Some(pos) => from + pos,
        None => panic!("'{}' not found after offset {} in:\n{}", needle, from, text),
    }
}

fn demo_project() -> ScriptData {
    ScriptData::new("demo").with_configuration("debug").with_settings(
        linux("app", TargetType::Executable, "debug")
            .with_sources(["main.c"])
            .with_lock_file("app.lock")
            .with_reloadable(true),
    )
}

#[test]
fn test_single_executable_script_order() {
    let text = render(&mut demo_project());

    assert!(text.starts_with("#!/bin/bash\n"));
    let mut pos = find_after(&text, "PL_CONFIG=debug\n", 0);
    pos = find_after(&text, "if [[ \"$PL_CONFIG\" == \"debug\" ]]; then", pos);
    pos = find_after(&text, "mkdir -p \"out\"", pos);
    pos = find_after(&text, "echo LOCKING > \"out/app.lock\"", pos);
    pos = find_after(&text, "gcc $PL_SOURCES", pos);
    pos = find_after(&text, "-o \"./out/app\"", pos);
    pos = find_after(&text, "if [ $? -ne 0 ]; then", pos);
    find_after(&text, "rm -f out/app.lock", pos);

    assert!(text.contains("PL_SOURCES=\"main.c\""));
    assert_eq!(text.matches("gcc ").count(), 1);
    assert!(!text.contains("pidof"));
    assert!(!text.contains("PL_HOT_RELOAD_STATUS"));
}

#[test]
fn test_generate_build_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build.sh");
    let mut data = demo_project();

    let generated = generate_build(&mut data, &path, &BashBackend::new()).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, generated.render(&BashBackend::new()));
    assert_eq!(generated.target_count, 1);
    assert!(generated.empty_configurations.is_empty());
}

#[test]
fn test_generate_build_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nope").join("build.sh");
    let err = generate_build(&mut demo_project(), &path, &BashBackend::new()).unwrap_err();
    assert!(matches!(err, BuildError::IoError { .. }));
}

#[rstest]
#[case(1)]
#[case(3)]
fn test_static_library_compiles_each_source(#[case] count: usize) {
    let sources: Vec<String> = (0..count).map(|i| format!("src/unit_{}.c", i)).collect();
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_settings(linux("pl_ds", TargetType::StaticLibrary, "debug").with_sources(sources));

    let text = render(&mut data);

    let mut pos = 0;
    for i in 0..count {
        pos = find_after(
            &text,
            &format!(
                "gcc -c $PL_INCLUDE_DIRECTORIES $PL_DEFINES $PL_COMPILER_FLAGS src/unit_{}.c -o \"./out/unit_{}.o\"",
                i, i
            ),
            pos,
        );
    }
    pos = find_after(&text, "ar rcs ./out/pl_ds.a ./out/*.o", pos);
    find_after(&text, "rm ./out/*.o", pos);

    assert_eq!(text.matches("gcc -c ").count(), count);
    assert_eq!(text.matches("ar rcs ").count(), 1);
    assert_eq!(text.matches("rm ./out/*.o").count(), 1);
}

#[test]
fn test_dynamic_library_single_shared_invocation() {
    let mut data = ScriptData::new("demo").with_configuration("debug").with_settings(
        linux("pl_ext", TargetType::DynamicLibrary, "debug")
            .with_sources(["a.c", "b.c", "c.c"])
            .with_definitions(["PL_DEBUG"])
            .with_include_directories(["../src"])
            .with_static_libraries(["pl_json"])
            .with_dynamic_libraries(["m", "dl"]),
    );

    let text = render(&mut data);

    assert_eq!(text.matches("gcc -shared ").count(), 1);
    assert!(text.contains("PL_SOURCES=\"a.c b.c c.c\""));
    assert!(text.contains("PL_DEFINES=\"-DPL_DEBUG\""));
    assert!(text.contains("PL_INCLUDE_DIRECTORIES=\"-I../src\""));
    assert!(text.contains("PL_STATIC_LINK_LIBRARIES=\"-l:pl_json.a\""));
    assert!(text.contains("PL_DYNAMIC_LINK_LIBRARIES=\"-lm -ldl\""));
    assert!(text.contains("-o \"./out/pl_ext.so\""));
    assert!(text.contains("rm -f out/pl_ext.so\n"));
    assert!(text.contains("rm -f out/pl_ext_*.so\n"));
}

#[test]
fn test_dynamic_library_extension_defaults_once() {
    let mut data = ScriptData::new("demo").with_configuration("debug").with_settings(
        linux("pl_ext", TargetType::DynamicLibrary, "debug").with_sources(["a.c"]),
    );
    let generator = ScriptGenerator::default();

    assert_eq!(generator.resolve_extensions(&mut data), 1);
    assert_eq!(
        data.current_settings[0].output_binary_extension.as_deref(),
        Some(".so")
    );
    assert_eq!(generator.resolve_extensions(&mut data), 0);
}

#[test]
fn test_explicit_extension_is_kept() {
    let mut data = ScriptData::new("demo").with_configuration("debug").with_settings(
        linux("app", TargetType::Executable, "debug")
            .with_sources(["main.c"])
            .with_extension(".bin"),
    );
    let text = render(&mut data);
    assert!(text.contains("-o \"./out/app.bin\""));
}

#[test]
fn test_other_toolchains_do_not_get_extensions() {
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_settings(
            TargetSettings::new("app", TargetType::DynamicLibrary)
                .for_toolchain("Windows", "msvc")
                .with_config("debug"),
        );
    ScriptGenerator::default().generate(&mut data).unwrap();
    assert_eq!(data.current_settings[0].output_binary_extension, None);
}

#[test]
fn test_generation_is_idempotent() {
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_configuration("release")
        .with_reload_target("./out/pilot_light")
        .with_settings(linux("pl_ext", TargetType::DynamicLibrary, "debug").with_sources(["a.c"]))
        .with_settings(linux("app", TargetType::Executable, "release").with_sources(["main.c"]));

    let first = render(&mut data);
    let second = render(&mut data);
    assert_eq!(first, second);
}

#[test]
fn test_empty_configurations_are_reported_not_emitted() {
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_configuration("profile")
        .with_configuration("release")
        .with_settings(linux("app", TargetType::Executable, "debug").with_sources(["main.c"]))
        .with_settings(
            TargetSettings::new("app", TargetType::Executable)
                .for_toolchain("Windows", "msvc")
                .with_config("release"),
        );

    let generated = ScriptGenerator::default().generate(&mut data).unwrap();
    let text = generated.render(&BashBackend::new());

    assert_eq!(generated.empty_configurations, vec!["profile", "release"]);
    assert!(text.contains("\"$PL_CONFIG\" == \"debug\""));
    assert!(!text.contains("\"$PL_CONFIG\" == \"profile\""));
    assert!(!text.contains("\"$PL_CONFIG\" == \"release\""));
    assert!(!text.contains("end of profile"));
}

#[test]
fn test_hot_reload_guards_non_reloadable_targets() {
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_reload_target("./out/pilot_light")
        .with_settings(
            linux("app", TargetType::Executable, "debug")
                .with_output("out", "pilot_light")
                .with_sources(["main.c"]),
        )
        .with_settings(
            linux("pl_ext", TargetType::DynamicLibrary, "debug")
                .with_sources(["ext.c"])
                .with_reloadable(true),
        );

    let generated = ScriptGenerator::default().generate(&mut data).unwrap();
    let text = generated.render(&BashBackend::new());

    assert!(generated.hot_reload);
    assert!(text.contains("if pidof -x \"pilot_light\" -o $$ >/dev/null; then"));
    assert!(text.contains("HOT RELOADING"));
    assert_eq!(text.matches("if [ $PL_HOT_RELOAD_STATUS -ne 1 ]; then").count(), 1);

    // cleanup only happens on a fresh build
    let else_pos = find_after(&text, "else", find_after(&text, "pidof", 0));
    let cleanup = find_after(&text, "rm -f out/pilot_light\n", else_pos);
    assert!(cleanup > else_pos);

    // the guard wraps the executable, not the reloadable library
    let guard = find_after(&text, "PL_HOT_RELOAD_STATUS -ne 1", 0);
    let exe_compile = find_after(&text, "-o \"./out/pilot_light\"", 0);
    let dll_section = find_after(&text, " pl_ext | debug ", 0);
    assert!(guard < exe_compile);
    assert!(exe_compile < dll_section);
}

#[test]
fn test_target_without_sources_keeps_header_and_steps() {
    let mut data = ScriptData::new("demo").with_configuration("debug").with_settings(
        linux("assets", TargetType::Executable, "debug")
            .with_pre_build_step("cp -r ../data out/")
            .with_post_build_step("echo done"),
    );

    let text = render(&mut data);

    assert!(text.contains(" assets | debug "));
    assert!(text.contains("cp -r ../data out/"));
    assert!(text.contains("echo done"));
    assert!(!text.contains("gcc"));
    assert!(!text.contains("rm -f out/assets"));
}

#[rstest]
#[case::bash(ShellDialect::Bash)]
#[case::posix(ShellDialect::Sh)]
fn test_build_steps_are_emitted_verbatim(#[case] dialect: ShellDialect) {
    let pre = "echo pre\n  cat <<X\n  keep\nX";
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_reload_target("./out/pilot_light")
        .with_settings(
            linux("pilot_light", TargetType::Executable, "debug")
                .with_sources(["main.c"])
                .with_pre_build_step(pre)
                .with_post_build_step("  echo post\n"),
        );

    let text = ScriptGenerator::default()
        .generate(&mut data)
        .unwrap()
        .render(dialect.backend().as_ref());

    // inside both the configuration block and the hot reload guard
    assert!(text.contains(&format!("\n{}\n", pre)));
    assert!(text.contains("\n  echo post\n\n"));
    assert!(!text.contains("        X\n"));
}

#[test]
fn test_lock_files_use_their_own_directory() {
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_settings(linux("app", TargetType::Executable, "debug").with_sources(["main.c"]))
        .with_settings(
            linux("tool", TargetType::Executable, "debug")
                .with_output("bin", "tool")
                .with_sources(["tool.c"]),
        );

    let text = render(&mut data);

    assert!(text.contains("echo LOCKING > \"out/lock.tmp\""));
    assert!(text.contains("echo LOCKING > \"bin/lock.tmp\""));
    assert!(text.contains("rm -f out/lock.tmp"));
    assert!(text.contains("rm -f bin/lock.tmp"));
    assert_eq!(text.matches("mkdir -p \"out\"").count(), 1);
}

#[test]
fn test_posix_backend_output() {
    let mut data = demo_project();
    let generated = ScriptGenerator::default().generate(&mut data).unwrap();
    let text = generated.render(&PosixShBackend::new());

    assert!(text.starts_with("#!/bin/sh\n"));
    assert!(text.contains("if [ \"$PL_CONFIG\" = \"debug\" ]; then"));
    assert!(!text.contains("[["));
    assert!(!text.contains("pushd"));
}

#[test]
fn test_dialect_backend_matches_direct_backend() {
    let mut data = demo_project();
    let generated = ScriptGenerator::default().generate(&mut data).unwrap();
    let boxed = ShellDialect::Bash.backend();
    assert_eq!(
        generated.render(boxed.as_ref()),
        generated.render(&BashBackend::new())
    );
}

#[test]
fn test_invalid_input_is_rejected() {
    let mut data = ScriptData::new("demo")
        .with_settings(linux("app", TargetType::Executable, "debug").with_sources(["main.c"]));

    let err = ScriptGenerator::default().generate(&mut data).unwrap_err();
    assert_eq!(
        err.validation_errors(),
        &[
            ValidationError::NoConfigurations,
            ValidationError::UnregisteredConfiguration {
                target: "app".into(),
                config: "debug".into(),
            },
        ]
    );
}

#[test]
fn test_script_has_one_config_block_per_populated_configuration() {
    let mut data = ScriptData::new("demo")
        .with_configuration("debug")
        .with_configuration("release")
        .with_settings(linux("app", TargetType::Executable, "debug").with_sources(["main.c"]))
        .with_settings(linux("app", TargetType::Executable, "release").with_sources(["main.c"]));

    let generated = ScriptGenerator::default().generate(&mut data).unwrap();

    let blocks = generated.script.count(|s| {
        matches!(
            s,
            Statement::If {
                test: pl_build::Test::StringEquals { .. },
                ..
            }
        )
    });
    assert_eq!(blocks, 2);
    assert_eq!(generated.target_count, 2);
}
