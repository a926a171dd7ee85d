//! Tests for config functionality.

use crate::config::{Config, DRY_RUN, FORCE_ANALYSIS, PROJECT_KEY, RunSettings};
use crate::test_support::DirGuard;
use serial_test::serial;
use tempfile::TempDir;

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.store_dir, ".projlock/locks");
    assert_eq!(config.lock_stale_minutes, 120);
    assert_eq!(config.lock_wait_seconds, 0);
    assert!(!config.dry_run);
    assert!(!config.force_analysis);
    assert!(config.project_key.is_none());
    assert!(config.project_name.is_none());
}

#[test]
fn test_parse_minimal_yaml() {
    let config = Config::from_yaml("").unwrap();

    // Should use all defaults
    assert_eq!(config.store_dir, ".projlock/locks");
    assert_eq!(config.lock_stale_minutes, 120);
}

#[test]
fn test_parse_full_yaml() {
    let yaml = r#"
store_dir: /var/lib/projlock
lock_stale_minutes: 30
lock_wait_seconds: 5
dry_run: true
force_analysis: true
project_key: org.acme:core
project_name: Acme Core
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.store_dir, "/var/lib/projlock");
    assert_eq!(config.lock_stale_minutes, 30);
    assert_eq!(config.lock_wait_seconds, 5);
    assert_eq!(config.run_settings(), RunSettings::new(true, true));

    let project = config.project();
    assert_eq!(project.key, "org.acme:core");
    assert_eq!(project.name, "Acme Core");
}

#[test]
fn test_parse_yaml_with_unknown_fields() {
    // Unknown fields should be silently ignored for forward compatibility
    let yaml = r#"
lock_stale_minutes: 45
unknown_field: "some value"
another_unknown:
  nested: true
"#;
    let config = Config::from_yaml(yaml).unwrap();

    assert_eq!(config.lock_stale_minutes, 45);
    assert_eq!(config.store_dir, ".projlock/locks");
}

#[test]
fn test_validate_zero_lock_stale_minutes() {
    let result = Config::from_yaml("lock_stale_minutes: 0");

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("lock_stale_minutes"));
}

#[test]
fn test_validate_empty_store_dir() {
    let result = Config::from_yaml("store_dir: '  '");

    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("store_dir"));
}

#[test]
fn test_to_yaml() {
    let config = Config::default();
    let yaml = config.to_yaml().unwrap();

    let parsed = Config::from_yaml(&yaml).unwrap();
    assert_eq!(parsed.store_dir, config.store_dir);
    assert!(!yaml.contains("project_key"));
}

#[test]
fn test_apply_boolean_properties() {
    let mut config = Config::default();

    config.apply_define("projlock.forceAnalysis=true").unwrap();
    config.apply_property(DRY_RUN, "TRUE").unwrap();

    assert!(config.force_analysis);
    assert!(config.dry_run);

    config.apply_property(FORCE_ANALYSIS, "false").unwrap();
    assert!(!config.force_analysis);
}

#[test]
fn test_apply_project_properties() {
    let mut config = Config::default();

    config.apply_property(PROJECT_KEY, " org.acme:core ").unwrap();
    config.apply_define("projlock.projectName=Acme Core").unwrap();

    let project = config.project();
    assert_eq!(project.key, "org.acme:core");
    assert_eq!(project.name, "Acme Core");
}

#[test]
fn test_apply_define_requires_equals() {
    let mut config = Config::default();
    let err = config.apply_define("projlock.forceAnalysis").unwrap_err();
    assert!(err.to_string().contains("expected key=value"));
}

#[test]
fn test_apply_invalid_boolean_fails() {
    let mut config = Config::default();
    let err = config.apply_property(FORCE_ANALYSIS, "yes").unwrap_err();
    assert!(err.to_string().contains(FORCE_ANALYSIS));
}

#[test]
fn test_apply_unknown_property_is_ignored() {
    let mut config = Config::default();
    config.apply_define("projlock.somethingElse=1").unwrap();
    assert_eq!(config.run_settings(), RunSettings::default());
}

#[test]
fn test_project_without_key_is_blank() {
    let config = Config::default();
    assert!(config.project().is_blank());
}

#[test]
fn test_project_name_defaults_to_key() {
    let mut config = Config::default();
    config.apply_property(PROJECT_KEY, "demo").unwrap();
    assert_eq!(config.project().name, "demo");
}

#[test]
fn test_config_load_from_file() {
    use std::io::Write;
    use tempfile::NamedTempFile;

    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "lock_stale_minutes: 7").unwrap();
    writeln!(file, "project_key: demo").unwrap();

    let config = Config::load(file.path()).unwrap();
    assert_eq!(config.lock_stale_minutes, 7);
    assert_eq!(config.project_key.as_deref(), Some("demo"));
}

#[test]
fn test_config_load_missing_file() {
    let result = Config::load("/nonexistent/path/projlock.yaml");
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("failed to read config file"));
}

#[test]
fn test_resolve_prefers_file_in_dir() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(temp_dir.path().join("projlock.yaml"), "lock_wait_seconds: 3\n").unwrap();

    let config = Config::resolve(None, temp_dir.path()).unwrap();
    assert_eq!(config.lock_wait_seconds, 3);
}

#[test]
fn test_resolve_without_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();

    let config = Config::resolve(None, temp_dir.path()).unwrap();
    assert_eq!(config.lock_wait_seconds, 0);
}

#[test]
fn test_resolve_explicit_path_must_exist() {
    let temp_dir = TempDir::new().unwrap();
    let missing = temp_dir.path().join("other.yaml");

    assert!(Config::resolve(Some(&missing), temp_dir.path()).is_err());
}

#[test]
#[serial]
fn test_discover_reads_working_directory() {
    let temp_dir = TempDir::new().unwrap();
    std::fs::write(
        temp_dir.path().join("projlock.yaml"),
        "project_key: from-cwd\nlock_wait_seconds: 5\n",
    )
    .unwrap();
    let _guard = DirGuard::new(temp_dir.path());

    let config = Config::discover(None).unwrap();

    assert_eq!(config.project_key.as_deref(), Some("from-cwd"));
    assert_eq!(config.lock_wait_seconds, 5);
}

#[test]
#[serial]
fn test_discover_without_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let _guard = DirGuard::new(temp_dir.path());

    let config = Config::discover(None).unwrap();

    assert!(config.project_key.is_none());
}
