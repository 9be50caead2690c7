//! Exit codes of the built binary.

use camino::Utf8PathBuf;
use std::fs;
use std::process::Command;

fn binary() -> Command {
    Command::new(env!("CARGO_BIN_EXE_typed-less-modules-rs"))
}

fn fixture() -> (tempfile::TempDir, Utf8PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
    fs::write(root.join("a.less"), ".first { color: red; }\n").unwrap();
    fs::write(root.join("b.less"), ".second { color: blue; }\n").unwrap();
    (dir, root)
}

#[test]
fn test_write_then_check() {
    let (_dir, root) = fixture();

    let status = binary()
        .current_dir(&root)
        .args([root.as_str(), "--compiler", "native"])
        .status()
        .unwrap();
    assert!(status.success());
    assert!(root.join("a.less.d.ts").exists());
    assert!(root.join("b.less.d.ts.map").exists());

    let status = binary()
        .current_dir(&root)
        .args([root.as_str(), "--compiler", "native", "--listDifferent"])
        .status()
        .unwrap();
    assert!(status.success());
}

#[test]
fn test_check_fails_on_stale_declaration() {
    let (_dir, root) = fixture();
    let status = binary()
        .current_dir(&root)
        .args([root.as_str(), "--compiler", "native"])
        .status()
        .unwrap();
    assert!(status.success());

    fs::write(root.join("b.less"), ".changed { color: blue; }\n").unwrap();
    let output = binary()
        .current_dir(&root)
        .args([root.as_str(), "--compiler", "native", "--listDifferent"])
        .output()
        .unwrap();

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    let invalid: Vec<&str> = stderr
        .lines()
        .filter(|line| line.starts_with("[INVALID TYPES]"))
        .collect();
    assert_eq!(invalid.len(), 1);
    assert!(invalid[0].ends_with("b.less"), "{}", invalid[0]);
}

#[test]
fn test_invalid_export_type_exits_with_error() {
    let (_dir, root) = fixture();
    let status = binary()
        .current_dir(&root)
        .args([root.as_str(), "--exportType", "invalid"])
        .status()
        .unwrap();
    assert!(!status.success());
    assert!(!root.join("a.less.d.ts").exists());
}
