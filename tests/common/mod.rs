//! Common test utilities and helpers

#![allow(dead_code)]

use chrono::{DateTime, TimeZone, Utc};
use lambda_prune::config::{FunctionConfig, Project, PruneSettings};
use lambda_prune::provider::{AliasRecord, VersionRecord};
use std::path::Path;
use std::time::Duration;

/// Timestamp `minute` minutes into the fixture day
pub fn at(minute: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap() + chrono::Duration::minutes(minute as i64)
}

/// Versions "1".."count", each newer than the one before
pub fn versions(count: u32) -> Vec<VersionRecord> {
    (1..=count).map(|n| VersionRecord::new(n.to_string(), at(n))).collect()
}

pub fn alias(name: &str, version: &str) -> AliasRecord {
    AliasRecord::new(name, version)
}

/// Settings with a short throttle delay so retries don't slow tests down
pub fn fast_settings() -> PruneSettings {
    PruneSettings {
        throttle_delay: Duration::from_millis(5),
        ..PruneSettings::default()
    }
}

/// Builder for project fixtures
pub struct ProjectBuilder {
    project: Project,
}

impl ProjectBuilder {
    pub fn new(name: &str) -> Self {
        Self {
            project: Project::new(name, "/work"),
        }
    }

    pub fn stage(mut self, name: &str, regions: &[&str]) -> Self {
        self.project = self.project.with_stage(name, regions);
        self
    }

    pub fn function(mut self, name: &str) -> Self {
        self.project = self.project.with_function(FunctionConfig::new(name));
        self
    }

    /// A function whose deployed name includes the stage
    pub fn staged_function(mut self, name: &str) -> Self {
        self.project = self.project.with_function(
            FunctionConfig::new(name).with_deployed_name("${project}-${stage}-${function}"),
        );
        self
    }

    pub fn root(mut self, root: &Path) -> Self {
        self.project.root = root.to_path_buf();
        self
    }

    pub fn build(self) -> Project {
        self.project
    }
}
