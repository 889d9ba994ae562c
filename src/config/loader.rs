//! Locating and parsing the project manifest

use super::project::Project;
use crate::error::{ErrorCode, PruneError};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

/// Manifest file names, in lookup order
pub const MANIFEST_NAMES: &[&str] = &["lambda-prune.toml", "lambda-prune.yml", "lambda-prune.yaml"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManifestFormat {
    Toml,
    Yaml,
}

impl ManifestFormat {
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yml") | Some("yaml") => Self::Yaml,
            _ => Self::Toml,
        }
    }
}

/// Walk up from `start` looking for a manifest
pub fn find_manifest(start: &Path) -> Option<PathBuf> {
    start.ancestors().find_map(|dir| {
        MANIFEST_NAMES
            .iter()
            .map(|name| dir.join(name))
            .find(|candidate| candidate.is_file())
    })
}

/// Read and validate the manifest at `path`
///
/// The project root is the manifest's directory, canonicalized when possible.
pub async fn load_project(path: &Path) -> Result<Project, PruneError> {
    let content = fs::read_to_string(path).await.map_err(|e| {
        PruneError::config_with_code(
            ErrorCode::CONFIG_NOT_FOUND,
            format!("Could not read project manifest {}", path.display()),
        )
        .with_source(e)
    })?;

    let mut project = parse_project(&content, ManifestFormat::from_path(path))
        .map_err(|e| e.with_context(path.display()))?;

    let root = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    project.root = fs::canonicalize(root)
        .await
        .unwrap_or_else(|_| root.to_path_buf());

    debug!(
        "Loaded project {} from {} ({} stages, {} functions)",
        project.name,
        path.display(),
        project.stages.len(),
        project.functions.len()
    );
    Ok(project)
}

/// Parse manifest text and check it for structural mistakes
pub fn parse_project(content: &str, format: ManifestFormat) -> Result<Project, PruneError> {
    let project: Project = match format {
        ManifestFormat::Toml => toml::from_str(content).map_err(|e| {
            PruneError::config_with_code(ErrorCode::CONFIG_PARSE_ERROR, e.to_string())
        })?,
        ManifestFormat::Yaml => serde_yaml::from_str(content).map_err(|e| {
            PruneError::config_with_code(ErrorCode::CONFIG_PARSE_ERROR, e.to_string())
        })?,
    };
    validate_project(&project)?;
    Ok(project)
}

fn validate_project(project: &Project) -> Result<(), PruneError> {
    if project.name.trim().is_empty() {
        return Err(PruneError::config_with_code(
            ErrorCode::CONFIG_INVALID_VALUE,
            "Project name must not be empty",
        ));
    }

    let mut seen = HashSet::new();
    for function in &project.functions {
        if !seen.insert(function.name.as_str()) {
            return Err(PruneError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("Function \"{}\" is defined more than once", function.name),
            ));
        }
    }

    let mut seen = HashSet::new();
    for stage in &project.stages {
        if !seen.insert(stage.name.as_str()) {
            return Err(PruneError::config_with_code(
                ErrorCode::CONFIG_INVALID_VALUE,
                format!("Stage \"{}\" is defined more than once", stage.name),
            ));
        }
        if stage.regions.is_empty() {
            warn!("Stage {} has no regions configured", stage.name);
        }
    }

    if project.prune.unit_concurrency == 0 || project.prune.delete_concurrency == 0 {
        return Err(PruneError::config_with_code(
            ErrorCode::CONFIG_INVALID_VALUE,
            "Prune concurrency must be at least 1",
        ));
    }

    Ok(())
}
