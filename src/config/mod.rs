//! Project configuration
//!
//! A project manifest (`lambda-prune.toml`, or YAML) describes the stages and
//! regions a project deploys to, its functions, and prune defaults:
//!
//! ```toml
//! name = "shop"
//!
//! [[stages]]
//! name = "prod"
//! regions = ["us-east-1", "eu-west-1"]
//! profile = "shop-prod"
//!
//! [[functions]]
//! name = "checkout"
//! path = "functions/checkout"
//! deployed_name = "${project}-${stage}-${function}"
//!
//! [prune]
//! keep = 3
//! throttle_delay = "5s"
//! ```

pub mod loader;
pub mod project;

pub use loader::{find_manifest, load_project, parse_project, ManifestFormat, MANIFEST_NAMES};
pub use project::{
    FunctionConfig, Project, ProjectModel, PruneSettings, StageConfig, DEFAULT_NAME_TEMPLATE,
};

#[cfg(test)]
mod tests;
