//! Pruning of a single deployed function

use super::policy;
use super::report::{PruneResult, VersionFailure};
use super::retry::ThrottleRetry;
use super::scheduler::BoundedScheduler;
use crate::error::PruneError;
use crate::provider::{LambdaProvider, RequestScope};
use std::collections::HashSet;
use tracing::{debug, info, warn};

/// A (function, deployed name) pair to prune
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PruneUnit {
    pub function_name: String,
    pub lambda_name: String,
}

impl PruneUnit {
    pub fn new(function_name: impl Into<String>, lambda_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            lambda_name: lambda_name.into(),
        }
    }
}

/// Applies the retention policy to one deployed function
#[derive(Clone, Copy)]
pub struct UnitPruner<'a> {
    provider: &'a dyn LambdaProvider,
    retry: ThrottleRetry,
    deletes: BoundedScheduler,
    keep_count: usize,
    dry_run: bool,
}

impl<'a> UnitPruner<'a> {
    pub fn new(
        provider: &'a dyn LambdaProvider,
        retry: ThrottleRetry,
        deletes: BoundedScheduler,
        keep_count: usize,
        dry_run: bool,
    ) -> Self {
        Self {
            provider,
            retry,
            deletes,
            keep_count,
            dry_run,
        }
    }

    /// Fetch aliases and versions, then delete every version the policy rejects
    ///
    /// Listing failures abort the unit. Delete failures are recorded on the
    /// result and do not stop the remaining deletes.
    pub async fn prune(
        &self,
        scope: &RequestScope,
        unit: &PruneUnit,
    ) -> Result<PruneResult, PruneError> {
        let provider = self.provider;
        let retry = self.retry;
        let lambda_name = unit.lambda_name.as_str();
        let function_name = unit.function_name.as_str();

        let list_aliases = format!("listAliases {}", lambda_name);
        let list_versions = format!("listVersionsByFunction {}", lambda_name);
        let (aliases, versions) = tokio::try_join!(
            retry.call(&list_aliases, move || provider.list_aliases(scope, lambda_name)),
            retry.call(&list_versions, move || provider.list_versions(scope, lambda_name)),
        )
        .map_err(|e| PruneError::provider(lambda_name, e))?;

        debug!(
            "Pruning {}, found {} aliases and {} versions",
            function_name,
            aliases.len(),
            versions.len()
        );

        let decision = policy::decide(&versions, &aliases, self.keep_count);

        let mut seen = HashSet::new();
        let mut doomed = Vec::new();
        for record in &versions {
            if !seen.insert(record.version.as_str()) {
                continue;
            }
            if decision.should_delete(&record.version) {
                debug!("Deleting version {} of {} function", record.version, function_name);
                doomed.push(record.version.clone());
            } else {
                debug!("Keeping version {} of {} function", record.version, function_name);
            }
        }

        let mut result = PruneResult::new(function_name, lambda_name);
        if self.dry_run {
            result.deleted = doomed.len();
            result.deleted_versions = doomed;
            return Ok(result);
        }

        let outcomes = self
            .deletes
            .run(doomed.clone(), move |version: String| async move {
                let description = format!("deleteFunction {}:{}", lambda_name, version);
                let qualifier = version.as_str();
                retry
                    .call(&description, move || {
                        provider.delete_version(scope, lambda_name, qualifier)
                    })
                    .await
            })
            .await;

        for (version, outcome) in doomed.into_iter().zip(outcomes) {
            match outcome {
                Ok(()) => {
                    result.deleted += 1;
                    result.deleted_versions.push(version);
                }
                Err(err) => {
                    warn!(
                        "Failed to delete version {} of {} ({}): {}",
                        version, function_name, lambda_name, err
                    );
                    result.failures.push(VersionFailure {
                        version,
                        error: err.to_string(),
                    });
                }
            }
        }

        info!(
            "{} ({}) in {}: {} versions deleted",
            function_name, lambda_name, scope.region, result.deleted
        );
        Ok(result)
    }
}
