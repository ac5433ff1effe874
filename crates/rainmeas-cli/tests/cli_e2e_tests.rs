//! CLI end-to-end tests that invoke the compiled `rainmeas` binary.
//!
//! Every test runs against a temporary project (`-C`) and a local fixture
//! registry (`--registry`), so nothing touches the network or the user's
//! configuration.

use assert_cmd::Command;
use pretty_assertions::assert_eq;
use predicates::prelude::*;
use rainmeas_test_utils::{RegistryFixture, TestProject};

/// `rainmeas` pointed at `project` and `registry`, isolated from the
/// caller's environment.
fn rainmeas(project: &TestProject, registry: &RegistryFixture) -> Command {
    let mut cmd = Command::cargo_bin("rainmeas").expect("rainmeas binary should be built");
    cmd.env_remove("RAINMEAS_REGISTRY")
        .env_remove("RAINMEAS_TIMEOUT_SECS")
        .env_remove("RUST_LOG")
        .env("NO_COLOR", "1")
        .arg("-C")
        .arg(project.root())
        .arg("--registry")
        .arg(registry.location())
        .arg("--timeout")
        .arg("10");
    cmd
}

fn weather_registry() -> RegistryFixture {
    let mut registry = RegistryFixture::new();
    registry.publish("corelib", "1.0.0", &[]);
    registry.publish("weatherwidget", "1.1.0", &[]);
    registry.publish("weatherwidget", "1.2.0", &[("corelib", "1.0.0")]);
    registry.set_latest("corelib", "1.0.0");
    registry.set_latest("weatherwidget", "1.2.0");
    registry.describe("weatherwidget", "Current conditions and forecast", "Skye");
    registry.describe("corelib", "Shared measures and helpers", "Rain Labs");
    registry
}

fn manifest_pairs(project: &TestProject) -> Vec<(String, String)> {
    project.read_manifest().into_iter().collect()
}

#[test]
fn test_help_exits_zero() {
    Command::cargo_bin("rainmeas")
        .unwrap()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("install"))
        .stdout(predicate::str::contains("clean"));
}

#[test]
fn test_version_command() {
    Command::cargo_bin("rainmeas")
        .unwrap()
        .arg("version")
        .assert()
        .success()
        .stdout(predicate::str::starts_with("rainmeas "));
}

#[test]
fn test_completions_for_bash() {
    Command::cargo_bin("rainmeas")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("rainmeas"));
}

#[test]
fn test_install_weatherwidget_with_dependency() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["install", "weatherwidget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corelib@1.0.0"))
        .stdout(predicate::str::contains("Installed weatherwidget@1.2.0"));

    project.assert_module_exists("corelib");
    project.assert_module_exists("weatherwidget");
    assert_eq!(
        manifest_pairs(&project),
        vec![("weatherwidget".to_string(), "1.2.0".to_string())]
    );
}

#[test]
fn test_install_alias_with_exact_version() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["i", "weatherwidget@1.1.0"])
        .assert()
        .success();

    project.assert_module_exists("weatherwidget");
    project.assert_module_absent("corelib");
    assert_eq!(
        project.read_module_file("weatherwidget", "README.md"),
        "weatherwidget@1.1.0"
    );
}

#[test]
fn test_install_unknown_package_fails() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["install", "nosuchskin"])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("error"))
        .stderr(predicate::str::contains("nosuchskin"));

    assert!(!project.layout().manifest_path().exists());
}

#[test]
fn test_install_unknown_version_lists_available() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["install", "weatherwidget@9.9.9"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("1.1.0, 1.2.0"));
}

#[test]
fn test_install_without_manifest_fails() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("rainmeas init"));
}

#[test]
fn test_install_from_manifest() {
    let project = TestProject::new();
    project.write_manifest(&[("weatherwidget", "1.2.0")]);
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .arg("install")
        .assert()
        .success()
        .stdout(predicate::str::contains("1 packages installed"));

    project.assert_module_exists("corelib");
    project.assert_module_exists("weatherwidget");
}

#[test]
fn test_install_from_manifest_reports_failures() {
    let project = TestProject::new();
    project.write_manifest(&[("weatherwidget", "1.2.0"), ("ghost", "1.0.0")]);
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .arg("install")
        .assert()
        .failure()
        .stderr(predicate::str::contains("ghost"))
        .stderr(predicate::str::contains("1 of 2 packages failed"));

    project.assert_module_exists("weatherwidget");
}

#[test]
fn test_init_then_list_empty() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry).arg("init").assert().success();
    assert!(project.layout().modules_dir().is_dir());
    assert!(project.read_manifest().is_empty());

    rainmeas(&project, &registry)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages installed"));
}

#[test]
fn test_list_all_shows_dependencies() {
    let project = TestProject::new();
    let registry = weather_registry();
    rainmeas(&project, &registry)
        .args(["install", "weatherwidget"])
        .assert()
        .success();

    rainmeas(&project, &registry)
        .arg("list")
        .assert()
        .success()
        .stdout(predicate::str::contains("weatherwidget"))
        .stdout(predicate::str::contains("corelib").not());

    rainmeas(&project, &registry)
        .args(["list", "--all"])
        .assert()
        .success()
        .stdout(predicate::str::contains("corelib"));
}

#[test]
fn test_remove_then_clean() {
    let project = TestProject::new();
    let registry = weather_registry();
    rainmeas(&project, &registry)
        .args(["install", "weatherwidget"])
        .assert()
        .success();

    rainmeas(&project, &registry)
        .args(["remove", "weatherwidget"])
        .assert()
        .success();
    project.assert_module_absent("weatherwidget");
    project.assert_module_exists("corelib");

    rainmeas(&project, &registry)
        .arg("clean")
        .assert()
        .success()
        .stdout(predicate::str::contains("Removed 1 unused module folders"));
    project.assert_module_absent("corelib");
}

#[test]
fn test_remove_not_installed_fails() {
    let project = TestProject::new();
    project.write_manifest(&[]);
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["remove", "corelib"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("corelib"));
}

#[test]
fn test_update_moves_to_latest() {
    let project = TestProject::new();
    let registry = weather_registry();
    rainmeas(&project, &registry)
        .args(["install", "weatherwidget@1.1.0"])
        .assert()
        .success();

    rainmeas(&project, &registry)
        .args(["update", "weatherwidget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.2.0"));

    assert_eq!(
        manifest_pairs(&project),
        vec![("weatherwidget".to_string(), "1.2.0".to_string())]
    );
    project.assert_module_exists("corelib");
}

#[test]
fn test_update_all_when_current() {
    let project = TestProject::new();
    let registry = weather_registry();
    rainmeas(&project, &registry)
        .args(["install", "weatherwidget"])
        .assert()
        .success();

    rainmeas(&project, &registry)
        .arg("update")
        .assert()
        .success()
        .stdout(predicate::str::contains("0 updated, 1 already up to date"));
}

#[test]
fn test_verify_detects_missing_folder() {
    let project = TestProject::new();
    project.write_manifest(&[("corelib", "1.0.0")]);
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .arg("verify")
        .assert()
        .failure()
        .stdout(predicate::str::contains("missing"))
        .stderr(predicate::str::contains("rainmeas install"));

    project.create_module("corelib", "corelib@1.0.0");
    rainmeas(&project, &registry)
        .arg("verify")
        .assert()
        .success();
}

#[test]
fn test_search_is_case_insensitive() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["search", "FORECAST"])
        .assert()
        .success()
        .stdout(predicate::str::contains("weatherwidget"))
        .stdout(predicate::str::contains("corelib").not());

    rainmeas(&project, &registry)
        .args(["search", "nothing-like-this"])
        .assert()
        .success()
        .stdout(predicate::str::contains("No packages match"));
}

#[test]
fn test_info_shows_versions_and_dependencies() {
    let project = TestProject::new();
    let registry = weather_registry();

    rainmeas(&project, &registry)
        .args(["info", "weatherwidget"])
        .assert()
        .success()
        .stdout(predicate::str::contains("1.1.0, 1.2.0"))
        .stdout(predicate::str::contains("corelib"))
        .stdout(predicate::str::contains("Skye"));

    rainmeas(&project, &registry)
        .args(["info", "ghost"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_registry_from_environment() {
    let project = TestProject::new();
    let registry = weather_registry();

    Command::cargo_bin("rainmeas")
        .unwrap()
        .env("RAINMEAS_REGISTRY", registry.location())
        .env("RAINMEAS_TIMEOUT_SECS", "10")
        .env("NO_COLOR", "1")
        .arg("-C")
        .arg(project.root())
        .args(["install", "corelib"])
        .assert()
        .success();

    project.assert_module_exists("corelib");
}

#[test]
fn test_commands_work_from_nested_directory() {
    let project = TestProject::new();
    let registry = weather_registry();
    rainmeas(&project, &registry).arg("init").assert().success();
    let nested = project.root().join("Skins").join("Clock");
    std::fs::create_dir_all(&nested).unwrap();

    Command::cargo_bin("rainmeas")
        .unwrap()
        .env_remove("RAINMEAS_REGISTRY")
        .env("NO_COLOR", "1")
        .arg("-C")
        .arg(&nested)
        .arg("--registry")
        .arg(registry.location())
        .arg("--timeout")
        .arg("10")
        .args(["install", "corelib"])
        .assert()
        .success();

    project.assert_module_exists("corelib");
    assert!(!nested.join("rainmeas-package.json").exists());
}
