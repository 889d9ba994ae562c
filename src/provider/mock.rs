//! In-memory provider used by tests and dry wiring
//!
//! Functions are registered per (region, lambda name). Throttles and failures
//! can be scripted per operation, and every call is recorded for verification.

use super::{AliasRecord, LambdaProvider, ProviderError, RequestScope, VersionRecord};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

/// Kind of remote operation issued against the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CallKind {
    ListAliases,
    ListVersions,
    DeleteVersion,
}

/// A recorded provider call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderCall {
    pub kind: CallKind,
    pub region: String,
    pub stage: Option<String>,
    pub lambda_name: String,
    pub version: Option<String>,
}

#[derive(Debug, Clone, Default)]
struct MockFunction {
    versions: Vec<VersionRecord>,
    aliases: Vec<AliasRecord>,
}

type FunctionKey = (String, String);
type ScriptKey = (CallKind, String, Option<String>);

#[derive(Default)]
struct MockState {
    functions: HashMap<FunctionKey, MockFunction>,
    throttles: HashMap<ScriptKey, usize>,
    failures: HashMap<ScriptKey, ProviderError>,
    calls: Vec<ProviderCall>,
}

/// Scriptable [`LambdaProvider`] backed by in-memory state
#[derive(Clone, Default)]
pub struct MockLambdaProvider {
    state: Arc<Mutex<MockState>>,
    delete_delay: Option<Duration>,
    active_deletes: Arc<AtomicUsize>,
    max_active_deletes: Arc<AtomicUsize>,
}

impl MockLambdaProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a deployed function in a region
    pub fn with_function(
        self,
        region: &str,
        lambda_name: &str,
        versions: Vec<VersionRecord>,
        aliases: Vec<AliasRecord>,
    ) -> Self {
        self.lock().functions.insert(
            (region.to_string(), lambda_name.to_string()),
            MockFunction { versions, aliases },
        );
        self
    }

    /// Make every delete call sleep, so concurrent deletes overlap
    pub fn with_delete_delay(mut self, delay: Duration) -> Self {
        self.delete_delay = Some(delay);
        self
    }

    /// Throttle the next `times` calls of `kind` against `lambda_name`
    ///
    /// For deletes `version` narrows the script to one version.
    pub fn throttle(
        &self,
        kind: CallKind,
        lambda_name: &str,
        version: Option<&str>,
        times: usize,
    ) {
        self.lock().throttles.insert(
            (kind, lambda_name.to_string(), version.map(str::to_string)),
            times,
        );
    }

    /// Fail every call of `kind` against `lambda_name` with `error`
    pub fn fail(
        &self,
        kind: CallKind,
        lambda_name: &str,
        version: Option<&str>,
        error: ProviderError,
    ) {
        self.lock().failures.insert(
            (kind, lambda_name.to_string(), version.map(str::to_string)),
            error,
        );
    }

    /// All calls issued so far, in issue order
    pub fn calls(&self) -> Vec<ProviderCall> {
        self.lock().calls.clone()
    }

    pub fn calls_of(&self, kind: CallKind) -> Vec<ProviderCall> {
        self.calls().into_iter().filter(|c| c.kind == kind).collect()
    }

    /// Versions still present for a function
    pub fn remaining_versions(&self, region: &str, lambda_name: &str) -> Vec<String> {
        self.lock()
            .functions
            .get(&(region.to_string(), lambda_name.to_string()))
            .map(|f| f.versions.iter().map(|v| v.version.clone()).collect())
            .unwrap_or_default()
    }

    /// Highest number of deletes that were in flight at the same time
    pub fn max_concurrent_deletes(&self) -> usize {
        self.max_active_deletes.load(Ordering::SeqCst)
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        // A panicking test thread must not hide the state from later assertions
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Record the call and apply any scripted throttle or failure
    fn enter(
        &self,
        kind: CallKind,
        scope: &RequestScope,
        lambda_name: &str,
        version: Option<&str>,
    ) -> Result<(), ProviderError> {
        let mut state = self.lock();
        state.calls.push(ProviderCall {
            kind,
            region: scope.region.clone(),
            stage: scope.stage.clone(),
            lambda_name: lambda_name.to_string(),
            version: version.map(str::to_string),
        });

        let keys = [
            (kind, lambda_name.to_string(), version.map(str::to_string)),
            (kind, lambda_name.to_string(), None),
        ];
        for key in &keys {
            if let Some(remaining) = state.throttles.get_mut(key) {
                if *remaining > 0 {
                    *remaining -= 1;
                    return Err(ProviderError::throttled());
                }
            }
        }
        for key in &keys {
            if let Some(error) = state.failures.get(key) {
                return Err(error.clone());
            }
        }
        Ok(())
    }

    fn not_found(scope: &RequestScope, lambda_name: &str) -> ProviderError {
        ProviderError::new(format!(
            "Function not found: {} in {}",
            lambda_name, scope.region
        ))
        .with_status(404)
        .with_error_code("ResourceNotFoundException")
    }
}

#[async_trait]
impl LambdaProvider for MockLambdaProvider {
    async fn list_aliases(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
    ) -> Result<Vec<AliasRecord>, ProviderError> {
        self.enter(CallKind::ListAliases, scope, lambda_name, None)?;
        self.lock()
            .functions
            .get(&(scope.region.clone(), lambda_name.to_string()))
            .map(|f| f.aliases.clone())
            .ok_or_else(|| Self::not_found(scope, lambda_name))
    }

    async fn list_versions(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
    ) -> Result<Vec<VersionRecord>, ProviderError> {
        self.enter(CallKind::ListVersions, scope, lambda_name, None)?;
        self.lock()
            .functions
            .get(&(scope.region.clone(), lambda_name.to_string()))
            .map(|f| f.versions.clone())
            .ok_or_else(|| Self::not_found(scope, lambda_name))
    }

    async fn delete_version(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
        version: &str,
    ) -> Result<(), ProviderError> {
        self.enter(CallKind::DeleteVersion, scope, lambda_name, Some(version))?;

        let active = self.active_deletes.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active_deletes.fetch_max(active, Ordering::SeqCst);
        if let Some(delay) = self.delete_delay {
            tokio::time::sleep(delay).await;
        }
        self.active_deletes.fetch_sub(1, Ordering::SeqCst);

        let mut state = self.lock();
        let function = state
            .functions
            .get_mut(&(scope.region.clone(), lambda_name.to_string()))
            .ok_or_else(|| Self::not_found(scope, lambda_name))?;
        function.versions.retain(|v| v.version != version);
        Ok(())
    }
}
