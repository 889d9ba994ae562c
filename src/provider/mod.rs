//! Provider abstraction for listing and deleting function versions
//!
//! The prune engine only depends on the [`LambdaProvider`] trait. The AWS
//! implementation lives in [`aws`], and [`mock`] provides an in-memory
//! provider for tests.

pub mod aws;
pub mod error;
pub mod mock;
pub mod regions;

pub use aws::AwsLambdaProvider;
pub use error::{ProviderError, MALFORMED_RESPONSE, THROTTLE_STATUS};
pub use mock::{CallKind, MockLambdaProvider, ProviderCall};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version identifier the provider uses for the unpublished, always-current code
pub const LATEST_VERSION: &str = "$LATEST";

/// A published version of a deployed function
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionRecord {
    pub version: String,
    pub last_modified: DateTime<Utc>,
}

impl VersionRecord {
    pub fn new(version: impl Into<String>, last_modified: DateTime<Utc>) -> Self {
        Self {
            version: version.into(),
            last_modified,
        }
    }
}

/// A named pointer to a specific version
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AliasRecord {
    pub name: String,
    pub function_version: String,
}

impl AliasRecord {
    pub fn new(name: impl Into<String>, function_version: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            function_version: function_version.into(),
        }
    }
}

/// Region and optional stage a provider request is issued for
///
/// The stage lets a provider pick stage-specific credentials.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RequestScope {
    pub region: String,
    pub stage: Option<String>,
}

impl RequestScope {
    pub fn new(region: impl Into<String>, stage: Option<String>) -> Self {
        Self {
            region: region.into(),
            stage,
        }
    }
}

/// Remote operations the prune engine needs from the provider
#[async_trait]
pub trait LambdaProvider: Send + Sync {
    /// List every alias defined on `lambda_name`
    async fn list_aliases(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
    ) -> Result<Vec<AliasRecord>, ProviderError>;

    /// List every version of `lambda_name`, including `$LATEST`
    async fn list_versions(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
    ) -> Result<Vec<VersionRecord>, ProviderError>;

    /// Delete a single version of `lambda_name`
    async fn delete_version(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
        version: &str,
    ) -> Result<(), ProviderError>;

    /// Region identifiers this provider accepts
    fn valid_regions(&self) -> &[&'static str] {
        regions::LAMBDA_REGIONS
    }

    fn is_valid_region(&self, region: &str) -> bool {
        self.valid_regions().contains(&region)
    }
}
