use assert_cmd::Command;
use flate2::read::GzDecoder;
use predicates::prelude::*;
use std::collections::BTreeSet;
use std::fs;
use std::fs::File;
use std::path::Path;
use tempfile::tempdir;

fn tidyup() -> Command {
    Command::cargo_bin("tidyup").unwrap()
}

/// Creates `<parent>/proj` with a few files worth cleaning.
fn setup_project(parent: &Path) -> std::path::PathBuf {
    let root = parent.join("proj");
    fs::create_dir_all(root.join("src")).unwrap();
    fs::write(root.join("notes.bak"), "old notes").unwrap();
    fs::write(root.join("src/main.c"), "int main() {}").unwrap();
    fs::write(root.join("src/main.c~"), "editor backup").unwrap();
    root
}

fn archive_entries(path: &Path) -> BTreeSet<String> {
    let file = File::open(path).unwrap();
    let mut archive = tar::Archive::new(GzDecoder::new(file));
    archive
        .entries()
        .unwrap()
        .map(|e| e.unwrap().path().unwrap().display().to_string())
        .collect()
}

fn make_available() -> bool {
    std::process::Command::new("make")
        .arg("--version")
        .output()
        .is_ok()
}

#[test]
fn dry_run_announces_but_changes_nothing() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());
    let backup = dir.path().join("out/test.backup");
    fs::create_dir(dir.path().join("out")).unwrap();

    tidyup()
        .arg(&root)
        .args(["-p", "*.bak/*~", "-n", "-b"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.bak -> move to backup archive"))
        .stdout(predicate::str::contains("src/main.c~ -> move to backup archive"))
        .stdout(predicate::str::contains("pack archive").not());

    assert!(root.join("notes.bak").exists());
    assert!(root.join("src/main.c~").exists());
    assert!(!dir.path().join("out/test.backup.tar.gz").exists());
}

#[test]
fn backup_run_moves_matches_into_the_archive() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());
    let backup = dir.path().join("test.backup");

    tidyup()
        .arg(&root)
        .args(["-p", "*.bak/*~", "-b"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("pack archive to"));

    assert!(!root.join("notes.bak").exists());
    assert!(!root.join("src/main.c~").exists());
    assert!(root.join("src/main.c").exists());

    let entries = archive_entries(&dir.path().join("test.backup.tar.gz"));
    assert!(entries.contains("proj/notes.bak"));
    assert!(entries.contains("proj/src/main.c~"));
    assert!(!entries.contains("proj/src/main.c"));
}

#[test]
fn repacked_archive_keeps_previous_generation() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());
    let backup = dir.path().join("test.backup");

    tidyup()
        .arg(&root)
        .args(["-p", "*.bak", "-b"])
        .arg(&backup)
        .assert()
        .success();

    // A later run matches a different file; the old one must survive the
    // repack.
    fs::write(root.join("src/fresh.o"), "obj").unwrap();
    tidyup()
        .arg(&root)
        .args(["-p", "*.o", "-b"])
        .arg(&backup)
        .assert()
        .success();

    let entries = archive_entries(&dir.path().join("test.backup.tar.gz"));
    assert!(entries.contains("proj/notes.bak"));
    assert!(entries.contains("proj/src/fresh.o"));
}

#[test]
fn no_backup_deletes_in_place_without_an_archive() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());
    let backup = dir.path().join("test.backup");

    tidyup()
        .arg(&root)
        .args(["-p", "*.bak", "--no-backup", "-b"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.bak -> remove"));

    assert!(!root.join("notes.bak").exists());
    assert!(!dir.path().join("test.backup.tar.gz").exists());
}

#[test]
fn empty_directories_cascade() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(root.join("a/b")).unwrap();
    fs::write(root.join("keep.txt"), "keep").unwrap();

    tidyup()
        .current_dir(dir.path())
        .arg(&root)
        .args(["-p", "*.nomatch", "--no-backup"])
        .assert()
        .success()
        .stdout(predicate::str::contains("a/b -> remove"))
        .stdout(predicate::str::contains("a -> remove"));

    assert!(!root.join("a").exists());
    assert!(root.join("keep.txt").exists());
    assert!(root.exists());
}

#[test]
fn ignore_empty_folders_keeps_them() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir_all(root.join("empty")).unwrap();
    fs::write(root.join("keep.txt"), "keep").unwrap();

    tidyup()
        .current_dir(dir.path())
        .arg(&root)
        .args(["-p", "*.nomatch", "--no-backup", "--ignore-empty-folders"])
        .assert()
        .success();

    assert!(root.join("empty").is_dir());
}

#[test]
fn patterns_come_from_the_config_file() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());
    fs::write(root.join(".tidyup"), "# cleanup patterns\n*.bak\n").unwrap();
    let backup = dir.path().join("test.backup");

    tidyup()
        .arg(&root)
        .args(["--no-backup", "-b"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains("notes.bak -> remove"));

    assert!(!root.join("notes.bak").exists());
    // Only the config pattern applies.
    assert!(root.join("src/main.c~").exists());
}

#[test]
fn no_config_ignores_the_config_file() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());
    fs::write(root.join(".tidyup"), "*.bak\n").unwrap();

    tidyup()
        .arg(&root)
        .arg("--no-config")
        .assert()
        .failure()
        .stderr(predicate::str::contains("no patterns to use"));

    assert!(root.join("notes.bak").exists());
}

#[test]
fn empty_pattern_set_fails_before_touching_anything() {
    let dir = tempdir().unwrap();
    let root = setup_project(dir.path());

    tidyup()
        .arg(&root)
        .assert()
        .failure()
        .stderr(predicate::str::contains("no patterns to use"));

    assert!(root.join("notes.bak").exists());
}

#[test]
fn nonexistent_path_fails() {
    let dir = tempdir().unwrap();

    tidyup()
        .arg(dir.path().join("missing"))
        .args(["-p", "*.bak"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

#[test]
fn makefile_announcement_in_dry_run() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("Makefile"), "clean:\n").unwrap();
    fs::write(root.join("notes.bak"), "x").unwrap();

    tidyup()
        .current_dir(dir.path())
        .arg(&root)
        .args(["-p", "*.bak", "-n"])
        .assert()
        .success()
        .stdout(predicate::str::contains(". -> make clean"))
        // Dry run stops at the announcement for this directory.
        .stdout(predicate::str::contains("notes.bak").not());

    assert!(root.join("notes.bak").exists());
}

#[test]
fn distclean_runs_before_pattern_matching() {
    if !make_available() {
        eprintln!("make not available, skipping");
        return;
    }

    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("configure"), "#!/bin/sh\n").unwrap();
    fs::write(
        root.join("Makefile"),
        "distclean:\n\trm -f built.bak\n\nclean:\n\ttrue\n",
    )
    .unwrap();
    fs::write(root.join("built.bak"), "built").unwrap();
    fs::write(root.join("notes.bak"), "notes").unwrap();
    let backup = dir.path().join("test.backup");

    tidyup()
        .arg(&root)
        .args(["-p", "*.bak", "-b"])
        .arg(&backup)
        .assert()
        .success()
        .stdout(predicate::str::contains(". -> make distclean"));

    // built.bak was removed by make before the refreshed listing was
    // matched, so only notes.bak ends up in the archive.
    let entries = archive_entries(&dir.path().join("test.backup.tar.gz"));
    assert!(entries.contains("proj/notes.bak"));
    assert!(!entries.contains("proj/built.bak"));
}

#[test]
fn ignore_makefiles_skips_make() {
    let dir = tempdir().unwrap();
    let root = dir.path().join("proj");
    fs::create_dir(&root).unwrap();
    fs::write(root.join("Makefile"), "clean:\n\texit 1\n").unwrap();
    fs::write(root.join("notes.bak"), "x").unwrap();

    tidyup()
        .current_dir(dir.path())
        .arg(&root)
        .args(["-p", "*.bak", "--no-backup", "--ignore-makefiles"])
        .assert()
        .success()
        .stdout(predicate::str::contains("make clean").not())
        .stdout(predicate::str::contains("notes.bak -> remove"));

    assert!(!root.join("notes.bak").exists());
}
