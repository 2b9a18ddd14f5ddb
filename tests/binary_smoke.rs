use assert_fs::prelude::*;
use std::process::Command;

/// Binary with the config pointed at a file that does not exist, so the
/// user's own config never leaks into the test.
fn bin(cfg_dir: &std::path::Path) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("bulk_relocate"));
    cmd.env("BULK_RELOCATE_CONFIG", cfg_dir.join("absent.xml"));
    cmd
}

#[test]
fn binary_print_config_succeeds() {
    let td = assert_fs::TempDir::new().unwrap();
    let out = bin(td.path()).arg("--print-config").output().expect("spawn binary");
    assert!(out.status.success(), "binary should succeed with --print-config");
    assert!(String::from_utf8_lossy(&out.stdout).contains("absent.xml"));
}

#[test]
fn strip_with_yes_renames() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("a_tmp.txt").touch().unwrap();
    td.child("b_TMP.txt").touch().unwrap();
    let out = bin(td.path())
        .args(["--yes", "strip"])
        .arg(td.path())
        .arg("tmp")
        .output()
        .expect("spawn binary");
    assert!(out.status.success(), "stderr: {}", String::from_utf8_lossy(&out.stderr));
    assert!(td.path().join("a.txt").exists());
    assert!(td.path().join("b.txt").exists());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("Moved: a_tmp.txt -> a.txt"), "stdout: {stdout}");
}

#[test]
fn dry_run_leaves_files_alone() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("clip.mp4").touch().unwrap();
    let target = td.path().join("videos");
    let out = bin(td.path())
        .args(["--dry-run", "collect"])
        .arg(td.path())
        .arg(".mp4")
        .arg(&target)
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    assert!(td.path().join("clip.mp4").exists());
    assert!(!target.exists());
    assert!(String::from_utf8_lossy(&out.stdout).contains("clip.mp4 ->"));
}

#[test]
fn declined_prompt_changes_nothing() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("IMG_1.jpg").touch().unwrap();
    let mut cmd = assert_cmd::Command::new(assert_cmd::cargo::cargo_bin!("bulk_relocate"));
    cmd.env("BULK_RELOCATE_CONFIG", td.path().join("absent.xml"))
        .arg("group")
        .arg(td.path())
        .arg("img")
        .arg("photos")
        .write_stdin("n\n")
        .assert()
        .success();
    assert!(td.path().join("IMG_1.jpg").exists());
    assert!(!td.path().join("photos").exists());
}

#[test]
fn json_logs_go_to_stderr() {
    let td = assert_fs::TempDir::new().unwrap();
    td.child("x_old.txt").touch().unwrap();
    let out = bin(td.path())
        .args(["--yes", "--json", "strip"])
        .arg(td.path())
        .arg("old")
        .output()
        .expect("spawn binary");
    assert!(out.status.success());
    let stderr = String::from_utf8_lossy(&out.stderr);
    let events: Vec<serde_json::Value> = stderr
        .lines()
        .filter(|l| l.starts_with('{'))
        .map(|l| serde_json::from_str(l).expect("json log line"))
        .collect();
    assert!(
        events.iter().any(|e| e["fields"]["message"] == "Relocated file"),
        "stderr: {stderr}"
    );
    assert!(!String::from_utf8_lossy(&out.stdout).contains("\"level\""));
}

#[test]
fn failures_give_nonzero_exit() {
    let td = assert_fs::TempDir::new().unwrap();
    let missing = bin(td.path())
        .args(["--yes", "strip"])
        .arg(td.path().join("missing"))
        .arg("x")
        .output()
        .expect("spawn binary");
    assert!(!missing.status.success(), "missing root should fail");

    td.child("tmp.txt").touch().unwrap();
    let empty = bin(td.path())
        .args(["--yes", "strip"])
        .arg(td.path())
        .arg("tmp")
        .output()
        .expect("spawn binary");
    assert!(!empty.status.success(), "empty result should fail the run");
    assert!(td.path().join("tmp.txt").exists());
}

#[test]
fn init_config_writes_template_once() {
    let td = assert_fs::TempDir::new().unwrap();
    let cfg = td.path().join("conf").join("config.xml");
    let first = Command::new(assert_cmd::cargo::cargo_bin!("bulk_relocate"))
        .env("BULK_RELOCATE_CONFIG", &cfg)
        .arg("--init-config")
        .output()
        .expect("spawn binary");
    assert!(first.status.success());
    assert!(std::fs::read_to_string(&cfg).unwrap().contains("<config>"));

    let second = Command::new(assert_cmd::cargo::cargo_bin!("bulk_relocate"))
        .env("BULK_RELOCATE_CONFIG", &cfg)
        .arg("--init-config")
        .output()
        .expect("spawn binary");
    assert!(!second.status.success(), "existing config must not be overwritten");
}
