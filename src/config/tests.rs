use super::*;
use crate::error::ErrorCode;
use std::time::Duration;
use tempfile::TempDir;

const TOML_MANIFEST: &str = r#"
name = "shop"

[[stages]]
name = "dev"
regions = ["us-east-1"]

[[stages]]
name = "prod"
regions = ["us-east-1", "eu-west-1"]
profile = "shop-prod"

[[functions]]
name = "checkout"
path = "functions/checkout"

[[functions]]
name = "cart"
deployed_name = "${project}-${stage}-${function}"

[prune]
keep = 5
throttle_delay = "250ms"
"#;

#[test]
fn test_parse_toml_manifest() {
    let project = parse_project(TOML_MANIFEST, ManifestFormat::Toml).unwrap();

    assert_eq!(project.name, "shop");
    assert_eq!(project.stages.len(), 2);
    assert_eq!(project.stages[1].profile.as_deref(), Some("shop-prod"));
    assert_eq!(project.functions[1].deployed_name.as_deref(), Some("${project}-${stage}-${function}"));
    assert_eq!(project.prune.keep, 5);
    assert_eq!(project.prune.throttle_delay, Duration::from_millis(250));
    // Unset values fall back to defaults
    assert_eq!(project.prune.unit_concurrency, 3);
    assert_eq!(project.prune.delete_concurrency, 3);
}

#[test]
fn test_parse_yaml_manifest() {
    let yaml = r#"
name: shop
stages:
  - name: dev
    regions: [us-west-2]
functions:
  - name: checkout
"#;
    let project = parse_project(yaml, ManifestFormat::Yaml).unwrap();

    assert_eq!(project.regions("dev"), vec!["us-west-2"]);
    assert_eq!(project.functions.len(), 1);
    assert_eq!(project.prune, PruneSettings::default());
}

#[test]
fn test_manifest_without_stages_parses() {
    // Missing stages is reported by the prune run, not the loader
    let project = parse_project("name = \"shop\"", ManifestFormat::Toml).unwrap();
    assert!(project.stages.is_empty());
}

#[test]
fn test_duplicate_function_rejected() {
    let manifest = r#"
name = "shop"
[[functions]]
name = "checkout"
[[functions]]
name = "checkout"
"#;
    let err = parse_project(manifest, ManifestFormat::Toml).unwrap_err();
    assert_eq!(err.code(), ErrorCode::CONFIG_INVALID_VALUE);
    assert!(err.message().contains("defined more than once"));
}

#[test]
fn test_zero_concurrency_rejected() {
    let manifest = "name = \"shop\"\n[prune]\ndelete_concurrency = 0\n";
    assert!(parse_project(manifest, ManifestFormat::Toml).is_err());
}

#[test]
fn test_syntax_error_is_parse_error() {
    let err = parse_project("name = ", ManifestFormat::Toml).unwrap_err();
    assert!(err.is_config());
    assert_eq!(err.code(), ErrorCode::CONFIG_PARSE_ERROR);
}

#[test]
fn test_find_manifest_walks_up() {
    let dir = TempDir::new().unwrap();
    let nested = dir.path().join("functions").join("checkout");
    std::fs::create_dir_all(&nested).unwrap();
    std::fs::write(dir.path().join("lambda-prune.yml"), "name: shop\n").unwrap();

    let found = find_manifest(&nested).unwrap();
    assert_eq!(found, dir.path().join("lambda-prune.yml"));
    assert_eq!(ManifestFormat::from_path(&found), ManifestFormat::Yaml);
}

#[test]
fn test_find_manifest_prefers_toml() {
    let dir = TempDir::new().unwrap();
    std::fs::write(dir.path().join("lambda-prune.yml"), "name: a\n").unwrap();
    std::fs::write(dir.path().join("lambda-prune.toml"), "name = \"b\"\n").unwrap();

    assert_eq!(
        find_manifest(dir.path()).unwrap(),
        dir.path().join("lambda-prune.toml")
    );
}

#[tokio::test]
async fn test_load_project_sets_root() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lambda-prune.toml");
    std::fs::write(&path, TOML_MANIFEST).unwrap();

    let project = load_project(&path).await.unwrap();

    assert_eq!(project.root, dir.path().canonicalize().unwrap());
    assert_eq!(project.functions_in_context(&project.root).len(), 2);
}

#[tokio::test]
async fn test_load_missing_manifest() {
    let dir = TempDir::new().unwrap();
    let err = load_project(&dir.path().join("lambda-prune.toml"))
        .await
        .unwrap_err();
    assert_eq!(err.code(), ErrorCode::CONFIG_NOT_FOUND);
}

#[tokio::test]
async fn test_load_reports_manifest_path_on_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("lambda-prune.toml");
    std::fs::write(&path, "name = ").unwrap();

    let err = load_project(&path).await.unwrap_err();
    assert!(err.message().contains("lambda-prune.toml"));
}
