//! Banner and buffer properties of the script emitter

use pl_build::emitter::{ScriptEmitter, BANNER_WIDTH};
use pretty_assertions::assert_eq;
use proptest::prelude::*;

fn title_lines(title: &str) -> Vec<String> {
    let mut emitter = ScriptEmitter::new();
    emitter.add_title(title);
    emitter.into_string().lines().map(str::to_string).collect()
}

fn sub_title_line(title: &str) -> String {
    let mut emitter = ScriptEmitter::new();
    emitter.add_sub_title(title);
    emitter.into_string().trim_end_matches('\n').to_string()
}

#[test]
fn test_title_layout() {
    let lines = title_lines("Development Setup");
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], format!("# {}", "#".repeat(BANNER_WIDTH)));
    assert_eq!(lines[2], lines[0]);
    assert!(lines[1].starts_with("# #"));
    assert!(lines[1].ends_with('#'));
}

#[test]
fn test_sub_title_odd_remainder_goes_right() {
    // 78 - 3 = 75 columns of fill: 37 left, 38 right
    let line = sub_title_line("app");
    assert_eq!(line, format!("#{} app {}", "~".repeat(37), "~".repeat(38)));
}

#[test]
fn test_banners_ignore_indentation() {
    let mut emitter = ScriptEmitter::new();
    emitter.set_indent(8);
    emitter.add_sub_title("x");
    emitter.add_comment("y");
    let text = emitter.into_string();
    assert!(text.starts_with("#~"));
    assert!(text.ends_with("        # y\n"));
}

#[test]
fn test_write_file_overwrites() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("build.sh");
    std::fs::write(&path, "old content that is longer than the new one").unwrap();

    let mut emitter = ScriptEmitter::new();
    emitter.add_line("echo hi");
    emitter.write_file(&path).unwrap();

    assert_eq!(std::fs::read_to_string(&path).unwrap(), "echo hi\n");
}

#[test]
fn test_write_file_missing_parent_fails() {
    let dir = tempfile::tempdir().unwrap();
    let emitter = ScriptEmitter::new();
    let err = emitter
        .write_file(dir.path().join("missing").join("build.sh"))
        .unwrap_err();
    assert!(err.to_string().contains("missing"));
}

proptest! {
    #[test]
    fn prop_title_width_is_fixed(title in "[A-Za-z0-9 |_]{0,76}") {
        let lines = title_lines(&title);
        prop_assert_eq!(lines[1].chars().count(), BANNER_WIDTH + 2);
        prop_assert_eq!(lines[0].chars().count(), BANNER_WIDTH + 2);
    }

    #[test]
    fn prop_title_round_trips(title in "[A-Za-z0-9|_][A-Za-z0-9 |_]{0,74}[A-Za-z0-9|_]") {
        let lines = title_lines(&title);
        let inner = &lines[1][3..lines[1].len() - 1];
        prop_assert_eq!(inner.trim(), title.as_str());
    }

    #[test]
    fn prop_sub_title_width_is_fixed(title in "[A-Za-z0-9 |_]{0,76}") {
        prop_assert_eq!(sub_title_line(&title).chars().count(), BANNER_WIDTH + 1);
    }

    #[test]
    fn prop_sub_title_round_trips(title in "[A-Za-z0-9|_][A-Za-z0-9 |_]{0,74}[A-Za-z0-9|_]") {
        let line = sub_title_line(&title);
        let inner = line[1..].trim_matches('~');
        prop_assert_eq!(&inner[1..inner.len() - 1], title.as_str());
    }
}
