//! Integration tests for the chartmig binary

use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::TempDir;

/// Helper to run chartmig against a directory
fn chartmig(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_chartmig"))
        .args(args)
        .output()
        .expect("Failed to execute chartmig")
}

const DEPLOYMENT: &str = "\
apiVersion: apps/v1
kind: Deployment
metadata:
  name: gateway-green
  labels:
    app: gateway
spec:
  selector:
    matchLabels:
      app: gateway
  template:
    metadata:
      labels:
        app: gateway
    spec:
      containers:
        - name: gateway
          image: registry/gateway:1.2
";

fn create_chart(dir: &Path) {
    fs::create_dir_all(dir.join("gateway/templates")).unwrap();
    fs::write(dir.join("gateway/templates/deployment.yaml"), DEPLOYMENT).unwrap();
    // A deployment.yaml outside templates/ must be ignored.
    fs::write(dir.join("gateway/deployment.yaml"), DEPLOYMENT).unwrap();
}

#[test]
fn test_migrates_deployment_under_templates() {
    let dir = TempDir::new().unwrap();
    create_chart(dir.path());

    let output = chartmig(&[dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("updated"));
    assert!(stdout.contains("templates"));

    let migrated =
        fs::read_to_string(dir.path().join("gateway/templates/deployment.yaml")).unwrap();
    assert!(migrated.starts_with("{{- $base := \"gateway\" -}}\n"));
    assert!(migrated.contains("name: {{ $name }}"));
    assert!(migrated.contains("- name: {{ $base }}"));
    assert!(migrated.contains("include \"common.metaLabels\""));
    assert_eq!(
        migrated.matches("include \"common.selectorLabelsFor\"").count(),
        2
    );

    // The file outside templates/ is untouched.
    let outside = fs::read_to_string(dir.path().join("gateway/deployment.yaml")).unwrap();
    assert_eq!(outside, DEPLOYMENT);
}

#[test]
fn test_backup_preserves_original() {
    let dir = TempDir::new().unwrap();
    create_chart(dir.path());

    chartmig(&[dir.path().to_str().unwrap()]);

    let backup =
        fs::read_to_string(dir.path().join("gateway/templates/deployment.yaml.bak")).unwrap();
    assert_eq!(backup, DEPLOYMENT);
}

#[test]
fn test_second_run_changes_nothing() {
    let dir = TempDir::new().unwrap();
    create_chart(dir.path());

    chartmig(&[dir.path().to_str().unwrap()]);
    let after_first =
        fs::read_to_string(dir.path().join("gateway/templates/deployment.yaml")).unwrap();

    let output = chartmig(&[dir.path().to_str().unwrap()]);
    // Already-migrated files are reported per file, not as a run failure.
    assert!(output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"));
    assert!(stderr.contains("already templated"));

    let after_second =
        fs::read_to_string(dir.path().join("gateway/templates/deployment.yaml")).unwrap();
    assert_eq!(after_first, after_second);
}

#[test]
fn test_no_candidates_is_informational() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join("empty")).unwrap();

    let output = chartmig(&[dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("no templates"));
}

#[test]
fn test_detection_failure_leaves_file_unmodified() {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("svc/templates");
    fs::create_dir_all(&templates).unwrap();
    let service = "kind: Service\nmetadata:\n  name: svc\n";
    fs::write(templates.join("deployment.yaml"), service).unwrap();

    let output = chartmig(&[dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("ERROR"));
    assert!(stderr.contains("metadata.name not found"));

    let content = fs::read_to_string(templates.join("deployment.yaml")).unwrap();
    assert_eq!(content, service);
    assert!(!templates.join("deployment.yaml.bak").exists());
}

#[test]
fn test_dry_run_writes_nothing() {
    let dir = TempDir::new().unwrap();
    create_chart(dir.path());

    let output = chartmig(&["--dry-run", dir.path().to_str().unwrap()]);
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("would update"));

    let content =
        fs::read_to_string(dir.path().join("gateway/templates/deployment.yaml")).unwrap();
    assert_eq!(content, DEPLOYMENT);
    assert!(!dir
        .path()
        .join("gateway/templates/deployment.yaml.bak")
        .exists());
}

#[test]
fn test_all_containers_flag() {
    let dir = TempDir::new().unwrap();
    let templates = dir.path().join("app/templates");
    fs::create_dir_all(&templates).unwrap();
    fs::write(
        templates.join("deployment.yaml"),
        "\
kind: Deployment
metadata:
  name: app
spec:
  template:
    spec:
      containers:
        - name: app
        - name: sidecar
",
    )
    .unwrap();

    chartmig(&["--all-containers", dir.path().to_str().unwrap()]);

    let migrated = fs::read_to_string(templates.join("deployment.yaml")).unwrap();
    assert_eq!(migrated.matches("- name: {{ $base }}").count(), 2);
}

#[test]
fn test_custom_helper_prefix() {
    let dir = TempDir::new().unwrap();
    create_chart(dir.path());

    chartmig(&[
        "--helper-prefix",
        "acme",
        dir.path().to_str().unwrap(),
    ]);

    let migrated =
        fs::read_to_string(dir.path().join("gateway/templates/deployment.yaml")).unwrap();
    assert!(migrated.contains("include \"acme.nameFor\""));
    assert!(migrated.contains("include \"acme.metaLabels\""));
}
