//! AWS Lambda provider backed by `aws-sdk-lambda`

use super::{AliasRecord, LambdaProvider, ProviderError, RequestScope, VersionRecord};
use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_lambda::config::http::HttpResponse;
use aws_sdk_lambda::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_lambda::Client;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;
use tracing::debug;

type ClientKey = (String, Option<String>);

/// Lambda provider talking to AWS
///
/// Clients are created lazily, one per (region, profile), so constructing the
/// provider never touches the network.
pub struct AwsLambdaProvider {
    /// Stage name to AWS profile
    stage_profiles: HashMap<String, String>,
    clients: Mutex<HashMap<ClientKey, Client>>,
}

impl AwsLambdaProvider {
    pub fn new() -> Self {
        Self::with_stage_profiles(HashMap::new())
    }

    /// Use a named AWS profile for requests issued on behalf of a stage
    pub fn with_stage_profiles(stage_profiles: HashMap<String, String>) -> Self {
        Self {
            stage_profiles,
            clients: Mutex::new(HashMap::new()),
        }
    }

    fn profile_for(&self, scope: &RequestScope) -> Option<String> {
        scope
            .stage
            .as_ref()
            .and_then(|stage| self.stage_profiles.get(stage))
            .cloned()
    }

    async fn client(&self, scope: &RequestScope) -> Client {
        let profile = self.profile_for(scope);
        let key = (scope.region.clone(), profile.clone());

        let mut clients = self.clients.lock().await;
        if let Some(client) = clients.get(&key) {
            return client.clone();
        }

        debug!(
            "Creating Lambda client for region {} (profile: {})",
            scope.region,
            profile.as_deref().unwrap_or("default")
        );
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(scope.region.clone()));
        if let Some(profile) = &profile {
            loader = loader.profile_name(profile);
        }
        let client = Client::new(&loader.load().await);
        clients.insert(key, client.clone());
        client
    }
}

impl Default for AwsLambdaProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LambdaProvider for AwsLambdaProvider {
    async fn list_aliases(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
    ) -> Result<Vec<AliasRecord>, ProviderError> {
        let client = self.client(scope).await;
        let mut aliases = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = client
                .list_aliases()
                .function_name(lambda_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| provider_error("ListAliases", lambda_name, e))?;

            for alias in output.aliases() {
                if let (Some(name), Some(version)) = (alias.name(), alias.function_version()) {
                    aliases.push(AliasRecord::new(name, version));
                }
            }

            match output.next_marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }

        Ok(aliases)
    }

    async fn list_versions(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
    ) -> Result<Vec<VersionRecord>, ProviderError> {
        let client = self.client(scope).await;
        let mut versions = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let output = client
                .list_versions_by_function()
                .function_name(lambda_name)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| provider_error("ListVersionsByFunction", lambda_name, e))?;

            for config in output.versions() {
                let Some(version) = config.version() else {
                    continue;
                };
                let last_modified = parse_last_modified(config.last_modified().unwrap_or_default())
                    .map_err(|e| e.with_context(lambda_name, version))?;
                versions.push(VersionRecord::new(version, last_modified));
            }

            match output.next_marker() {
                Some(next) => marker = Some(next.to_string()),
                None => break,
            }
        }

        Ok(versions)
    }

    async fn delete_version(
        &self,
        scope: &RequestScope,
        lambda_name: &str,
        version: &str,
    ) -> Result<(), ProviderError> {
        let client = self.client(scope).await;
        client
            .delete_function()
            .function_name(lambda_name)
            .qualifier(version)
            .send()
            .await
            .map_err(|e| provider_error("DeleteFunction", lambda_name, e))?;
        Ok(())
    }
}

/// Convert an SDK failure into a [`ProviderError`] carrying the HTTP status
fn provider_error<E>(operation: &str, lambda_name: &str, err: SdkError<E, HttpResponse>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let mut error = ProviderError::new(format!(
        "{} failed for {}: {}",
        operation,
        lambda_name,
        DisplayErrorContext(&err)
    ));
    if let Some(status) = err.raw_response().map(|r| r.status().as_u16()) {
        error = error.with_status(status);
    }
    if let Some(code) = err.code() {
        error = error.with_error_code(code);
    }
    error
}

#[derive(Debug)]
struct TimestampError(String);

impl TimestampError {
    fn with_context(self, lambda_name: &str, version: &str) -> ProviderError {
        ProviderError::malformed(format!(
            "Malformed LastModified for {} version {}: {}",
            lambda_name, version, self.0
        ))
    }
}

/// Parse the provider's `LastModified` format (`2024-01-31T12:00:00.000+0000`)
fn parse_last_modified(raw: &str) -> Result<DateTime<Utc>, TimestampError> {
    DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z")
        .or_else(|_| DateTime::parse_from_rfc3339(raw))
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| TimestampError(format!("'{}' ({})", raw, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_lambda_timestamp() {
        let parsed = parse_last_modified("2024-01-31T12:30:05.123+0000").unwrap();
        assert_eq!(
            parsed.timestamp(),
            Utc.with_ymd_and_hms(2024, 1, 31, 12, 30, 5).unwrap().timestamp()
        );
    }

    #[test]
    fn test_parse_offset_timestamp_normalises_to_utc() {
        let parsed = parse_last_modified("2024-01-31T14:30:05.000+0200").unwrap();
        assert_eq!(parsed.format("%H:%M").to_string(), "12:30");
    }

    #[test]
    fn test_parse_rfc3339_fallback() {
        assert!(parse_last_modified("2024-01-31T12:30:05Z").is_ok());
    }

    #[test]
    fn test_parse_garbage_fails() {
        let err = parse_last_modified("yesterday")
            .err()
            .unwrap()
            .with_context("shop-checkout", "7");
        assert!(err.message.contains("shop-checkout version 7"));
        assert!(err.is_malformed());
        assert!(!err.is_throttle());
    }

    #[test]
    fn test_profile_selected_by_stage() {
        let provider = AwsLambdaProvider::with_stage_profiles(HashMap::from([(
            "prod".to_string(),
            "prod-admin".to_string(),
        )]));
        assert_eq!(
            provider.profile_for(&RequestScope::new("us-east-1", Some("prod".into()))),
            Some("prod-admin".to_string())
        );
        assert_eq!(
            provider.profile_for(&RequestScope::new("us-east-1", Some("dev".into()))),
            None
        );
        assert_eq!(provider.profile_for(&RequestScope::new("us-east-1", None)), None);
    }
}
