use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use std::fs;
use std::path::Path;

const CONFIG: &str = r#"
[paths]
source_html_root = "html/"
target_mdx_root = "docs/"

[sidebar]
main_category_pages = ["intro/index.mdx"]

[[sidebar.sections]]
key = "intro"
sources = ["intro/index.html"]
index_document_depth = 2
children_base_depth = 2
"#;

const SIDEBAR: &str = r#"<html><body><nav class="navISBDMSection">
<div class="d-flex"><a href="index.html">Introduction</a></div>
<div class="d-flex"><i class="bi bi-arrow-return-right"></i><a href="i001.html">Scope</a></div>
</nav></body></html>"#;

fn seed(root: &Path) {
    fs::write(root.join("isbdm.toml"), CONFIG).unwrap();
    fs::create_dir_all(root.join("html/intro")).unwrap();
    fs::write(root.join("html/intro/index.html"), SIDEBAR).unwrap();
    fs::create_dir_all(root.join("docs/intro")).unwrap();
    fs::write(root.join("docs/intro/index.mdx"), "# Introduction\n").unwrap();
    fs::write(
        root.join("docs/intro/i001.mdx"),
        "---\ntitle: Scope\n---\n# Scope\n",
    )
    .unwrap();
}

fn sidebar_cmd(root: &Path) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("isbdm");
    cmd.current_dir(root)
        .arg("sidebar")
        .arg("--log-file")
        .arg("sidebar.log");
    cmd
}

#[test]
fn test_sidebar_updates_documents() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    sidebar_cmd(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "Processed 2 of 2 documents. Errors/Skipped: 0",
        ));

    let page = fs::read_to_string(dir.path().join("docs/intro/i001.mdx")).unwrap();
    assert!(page.contains("sidebar_label: Scope\n"));
    assert!(page.contains("sidebar_level: 3\n"));
    assert!(page.contains("sidebar_position: 2\n"));
    assert!(page.contains("sidebar_prefix:"));

    let index = fs::read_to_string(dir.path().join("docs/intro/index.mdx")).unwrap();
    assert!(index.contains("sidebar_class_name: menu-item--sidebar-category-page\n"));
    assert!(!index.contains("sidebar_prefix"));
}

#[test]
fn test_sidebar_dry_run_leaves_documents() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    sidebar_cmd(dir.path())
        .arg("--dry-run")
        .assert()
        .success()
        .stdout(predicate::str::contains("Processed 2 of 2"));

    let page = fs::read_to_string(dir.path().join("docs/intro/i001.mdx")).unwrap();
    assert_eq!(page, "---\ntitle: Scope\n---\n# Scope\n");
}

#[test]
fn test_sidebar_missing_single_dir_fails() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    sidebar_cmd(dir.path())
        .args(["--single-dir", "nowhere"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Single directory not found"));
}

#[test]
fn test_inspect_sidebar_tree() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let mut cmd = cargo_bin_cmd!("isbdm");
    cmd.current_dir(dir.path()).args(["inspect-sidebar", "intro"]);

    cmd.assert()
        .success()
        .stdout(predicate::str::contains(
            "Introduction  [intro/index] depth 2 position 1",
        ))
        .stdout(predicate::str::contains("Scope  [intro/i001] depth 3 position 2"));
}

#[test]
fn test_inspect_unknown_section() {
    let dir = tempfile::tempdir().unwrap();
    seed(dir.path());

    let mut cmd = cargo_bin_cmd!("isbdm");
    cmd.current_dir(dir.path()).args(["inspect-sidebar", "nothing"]);

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Unknown section 'nothing'"));
}
