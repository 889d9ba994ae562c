//! Project model: stages, regions and functions to prune

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Deployed name used when a function does not define its own template
pub const DEFAULT_NAME_TEMPLATE: &str = "${project}-${function}";

/// Read-only view of the project the prune engine works against
pub trait ProjectModel: Send + Sync {
    fn stages(&self) -> &[StageConfig];

    /// Regions configured for a stage, empty for an unknown stage
    fn regions(&self, stage: &str) -> Vec<String>;

    fn functions(&self) -> &[FunctionConfig];

    fn function(&self, name: &str) -> Option<&FunctionConfig>;

    /// Provider-level name of `function` when deployed to `stage` in `region`
    fn deployed_name(&self, function: &FunctionConfig, stage: &str, region: &str) -> String;

    /// Functions implied by working from `dir`
    fn functions_in_context(&self, dir: &Path) -> Vec<&FunctionConfig>;
}

/// A deployment stage and the regions it is deployed to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageConfig {
    pub name: String,
    #[serde(default)]
    pub regions: Vec<String>,
    /// AWS profile used for requests on behalf of this stage
    #[serde(default)]
    pub profile: Option<String>,
}

/// A logical function of the project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionConfig {
    pub name: String,
    /// Directory of the function, relative to the project root
    #[serde(default)]
    pub path: Option<PathBuf>,
    /// Template for the deployed name, see [`DEFAULT_NAME_TEMPLATE`]
    #[serde(default)]
    pub deployed_name: Option<String>,
}

impl FunctionConfig {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            path: None,
            deployed_name: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn with_deployed_name(mut self, template: impl Into<String>) -> Self {
        self.deployed_name = Some(template.into());
        self
    }
}

/// Defaults for prune runs, from the `[prune]` manifest section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PruneSettings {
    /// Versions to keep beyond aliased ones and `$LATEST`
    #[serde(default = "default_keep")]
    pub keep: usize,

    /// Delay before retrying a throttled request
    #[serde(default = "default_throttle_delay", with = "humantime_serde")]
    pub throttle_delay: Duration,

    /// Functions pruned at once within a region
    #[serde(default = "default_concurrency")]
    pub unit_concurrency: usize,

    /// Versions deleted at once within a function
    #[serde(default = "default_concurrency")]
    pub delete_concurrency: usize,
}

fn default_keep() -> usize {
    3
}

fn default_throttle_delay() -> Duration {
    crate::prune::retry::DEFAULT_THROTTLE_DELAY
}

fn default_concurrency() -> usize {
    crate::prune::scheduler::DEFAULT_CONCURRENCY
}

impl Default for PruneSettings {
    fn default() -> Self {
        Self {
            keep: default_keep(),
            throttle_delay: default_throttle_delay(),
            unit_concurrency: default_concurrency(),
            delete_concurrency: default_concurrency(),
        }
    }
}

/// A project loaded from a manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    #[serde(default)]
    pub stages: Vec<StageConfig>,
    #[serde(default)]
    pub functions: Vec<FunctionConfig>,
    #[serde(default)]
    pub prune: PruneSettings,
    /// Directory holding the manifest
    #[serde(skip)]
    pub root: PathBuf,
}

impl Project {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            stages: Vec::new(),
            functions: Vec::new(),
            prune: PruneSettings::default(),
            root: root.into(),
        }
    }

    pub fn with_stage(mut self, name: &str, regions: &[&str]) -> Self {
        self.stages.push(StageConfig {
            name: name.to_string(),
            regions: regions.iter().map(|r| r.to_string()).collect(),
            profile: None,
        });
        self
    }

    pub fn with_function(mut self, function: FunctionConfig) -> Self {
        self.functions.push(function);
        self
    }

    /// Stage name to AWS profile, for stages that name one
    pub fn stage_profiles(&self) -> std::collections::HashMap<String, String> {
        self.stages
            .iter()
            .filter_map(|s| s.profile.clone().map(|p| (s.name.clone(), p)))
            .collect()
    }
}

impl ProjectModel for Project {
    fn stages(&self) -> &[StageConfig] {
        &self.stages
    }

    fn regions(&self, stage: &str) -> Vec<String> {
        self.stages
            .iter()
            .find(|s| s.name == stage)
            .map(|s| s.regions.clone())
            .unwrap_or_default()
    }

    fn functions(&self) -> &[FunctionConfig] {
        &self.functions
    }

    fn function(&self, name: &str) -> Option<&FunctionConfig> {
        self.functions.iter().find(|f| f.name == name)
    }

    fn deployed_name(&self, function: &FunctionConfig, stage: &str, region: &str) -> String {
        function
            .deployed_name
            .as_deref()
            .unwrap_or(DEFAULT_NAME_TEMPLATE)
            .replace("${project}", &self.name)
            .replace("${function}", &function.name)
            .replace("${stage}", stage)
            .replace("${region}", region)
    }

    fn functions_in_context(&self, dir: &Path) -> Vec<&FunctionConfig> {
        self.functions
            .iter()
            .filter(|function| match &function.path {
                Some(path) => {
                    let function_dir = self.root.join(path);
                    function_dir.starts_with(dir) || dir.starts_with(&function_dir)
                }
                // Without a directory a function is only implied from the project root
                None => self.root.starts_with(dir),
            })
            .collect()
    }
}
