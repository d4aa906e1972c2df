use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

/// A literal-only template generates its bytes verbatim.
#[test]
fn generates_literal_template() {
    let temp_dir = tempdir().expect("failed to create temporary directory");
    let template = temp_dir.path().join("template.txt");
    fs::write(&template, "Hello, World!").unwrap();
    let out = temp_dir.path().join("out.txt");

    Command::cargo_bin("gentmpl-cli")
        .expect("binary not found")
        .arg("--template")
        .arg(&template)
        .arg("--out")
        .arg(&out)
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "Hello, World!");
}

/// `num=N` writes `N` files with a zero-padded index inserted before the
/// final `.` in the output path, each reproducing independently.
#[test]
fn multi_document_generation_splits_output_paths() {
    let temp_dir = tempdir().expect("failed to create temporary directory");
    let template = temp_dir.path().join("template.txt");
    fs::write(&template, "<?gen.value order=random max=1000000 format=#0 ?>").unwrap();
    let out = temp_dir.path().join("doc.txt");

    Command::cargo_bin("gentmpl-cli")
        .expect("binary not found")
        .arg("--template")
        .arg(&template)
        .arg("--out")
        .arg(&out)
        .arg("--num")
        .arg("3")
        .assert()
        .success();

    let doc0 = fs::read_to_string(temp_dir.path().join("doc0.txt")).unwrap();
    let doc1 = fs::read_to_string(temp_dir.path().join("doc1.txt")).unwrap();
    let doc2 = fs::read_to_string(temp_dir.path().join("doc2.txt")).unwrap();
    assert_ne!(doc0, doc1);
    assert_ne!(doc1, doc2);

    // Regenerating just document 1 reproduces the same bytes.
    let out_again = temp_dir.path().join("doc.txt");
    Command::cargo_bin("gentmpl-cli")
        .expect("binary not found")
        .arg("--template")
        .arg(&template)
        .arg("--out")
        .arg(&out_again)
        .arg("--num")
        .arg("3")
        .assert()
        .success();
    let doc1_again = fs::read_to_string(temp_dir.path().join("doc1.txt")).unwrap();
    assert_eq!(doc1, doc1_again);
}

/// `--vars` overrides a declared variable's default before generation.
#[test]
fn vars_flag_overrides_default() {
    let temp_dir = tempdir().expect("failed to create temporary directory");
    let template = temp_dir.path().join("template.txt");
    fs::write(&template, "<?gen.variable name=X default=alpha ?>").unwrap();
    let out = temp_dir.path().join("out.txt");

    Command::cargo_bin("gentmpl-cli")
        .expect("binary not found")
        .arg("--template")
        .arg(&template)
        .arg("--out")
        .arg(&out)
        .arg("--vars")
        .arg("{x=beta}")
        .assert()
        .success();

    assert_eq!(fs::read_to_string(&out).unwrap(), "beta");
}

/// A malformed template (missing `?>`) fails the process with a non-zero
/// exit code rather than writing partial output.
#[test]
fn malformed_template_fails() {
    let temp_dir = tempdir().expect("failed to create temporary directory");
    let template = temp_dir.path().join("template.txt");
    fs::write(&template, "<?gen.value order=serial").unwrap();
    let out = temp_dir.path().join("out.txt");

    Command::cargo_bin("gentmpl-cli")
        .expect("binary not found")
        .arg("--template")
        .arg(&template)
        .arg("--out")
        .arg(&out)
        .assert()
        .failure()
        .stderr(predicate::str::contains("parse error"));

    assert!(!out.exists());
}
