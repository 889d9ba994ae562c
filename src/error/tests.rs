use super::*;

#[test]
fn test_config_error_construction() {
    let err = PruneError::config_with_code(
        ErrorCode::CONFIG_NO_STAGES,
        "No existing stages in the project",
    );
    assert!(err.is_config());
    assert_eq!(err.exit_code(), 2);
    assert_eq!(err.code(), ErrorCode::CONFIG_NO_STAGES);
    assert_eq!(err.user_message(), "No existing stages in the project");
    assert_eq!(
        err.to_string(),
        "[E1003] Configuration error: No existing stages in the project"
    );
}

#[test]
fn test_provider_error_keeps_status_and_lambda() {
    let source = ProviderError::new("User is not authorized").with_status(403);
    let err = PruneError::provider("shop-checkout", source);

    assert!(!err.is_config());
    assert_eq!(err.exit_code(), 3);
    assert_eq!(err.code(), ErrorCode::PROVIDER_ACCESS_DENIED);
    assert!(err.user_message().starts_with("Request for shop-checkout failed"));

    let chained = std::error::Error::source(&err).expect("typed source");
    assert!(chained.to_string().contains("not authorized"));
}

#[test]
fn test_provider_error_without_status_is_transport() {
    let err: PruneError = ProviderError::new("connection reset").into();
    assert_eq!(err.code(), ErrorCode::PROVIDER_TRANSPORT);
    assert!(err.user_message().starts_with("Provider request failed"));
}

#[test]
fn test_malformed_response_has_its_own_code() {
    let source = ProviderError::malformed("Malformed LastModified for shop-checkout version 7");
    let err = PruneError::provider("shop-checkout", source);
    assert_eq!(err.code(), ErrorCode::PROVIDER_MALFORMED_RESPONSE);
    assert!(err
        .developer_message()
        .contains("Provider returned a malformed response"));
}

#[test]
fn test_with_context_prefixes_message() {
    let err = PruneError::config_with_code(ErrorCode::CONFIG_INVALID_VALUE, "bad value").with_context("lambda-prune.toml");
    assert_eq!(err.message(), "lambda-prune.toml: bad value");
}

#[test]
fn test_developer_message_includes_description() {
    let err = PruneError::config_with_code(ErrorCode::CONFIG_INVALID_REGION, "Invalid region specified");
    assert!(err
        .developer_message()
        .contains("Region is not a valid provider region"));
}

#[test]
fn test_status_mapping() {
    assert_eq!(provider_code_for_status(Some(429)), ErrorCode::PROVIDER_THROTTLED);
    assert_eq!(provider_code_for_status(Some(404)), ErrorCode::PROVIDER_NOT_FOUND);
    assert_eq!(provider_code_for_status(Some(409)), ErrorCode::PROVIDER_CONFLICT);
    assert_eq!(provider_code_for_status(Some(500)), ErrorCode::PROVIDER_GENERIC);
    assert_eq!(describe_error_code(4242), "Unknown error code");
}
