use crate::provider::ProviderError;

/// Error code registry for lambda-prune
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors (raised before any remote call)
/// - 2000-2999: Provider errors (remote list/delete calls)
/// - 9000-9999: Other errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_GENERIC: u16 = 1000;
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_NO_STAGES: u16 = 1003;
    pub const CONFIG_UNKNOWN_STAGE: u16 = 1004;
    pub const CONFIG_INVALID_REGION: u16 = 1005;
    pub const CONFIG_UNKNOWN_FUNCTION: u16 = 1006;
    pub const CONFIG_NO_FUNCTIONS: u16 = 1007;
    pub const CONFIG_INVALID_VALUE: u16 = 1008;

    // Provider errors (2000-2999)
    pub const PROVIDER_GENERIC: u16 = 2000;
    pub const PROVIDER_THROTTLED: u16 = 2001;
    pub const PROVIDER_NOT_FOUND: u16 = 2002;
    pub const PROVIDER_ACCESS_DENIED: u16 = 2003;
    pub const PROVIDER_CONFLICT: u16 = 2004;
    pub const PROVIDER_MALFORMED_RESPONSE: u16 = 2005;
    pub const PROVIDER_TRANSPORT: u16 = 2006;

    // Other errors (9000-9999)
    pub const OTHER_GENERIC: u16 = 9000;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        // Configuration errors
        1000 => "Generic configuration error",
        1001 => "Project manifest not found",
        1002 => "Failed to parse project manifest",
        1003 => "Project has no stages",
        1004 => "Stage does not exist in the project",
        1005 => "Region is not a valid provider region",
        1006 => "Function does not exist in the project",
        1007 => "No functions selected for pruning",
        1008 => "Invalid value in configuration",

        // Provider errors
        2000 => "Generic provider error",
        2001 => "Provider throttled the request",
        2002 => "Function or version not found",
        2003 => "Access denied by the provider",
        2004 => "Provider rejected the request due to a conflict",
        2005 => "Provider returned a malformed response",
        2006 => "Could not reach the provider",

        9000 => "Generic error",
        _ => "Unknown error code",
    }
}

/// Error code for a provider failure
pub fn provider_code(error: &ProviderError) -> u16 {
    if error.is_malformed() {
        ErrorCode::PROVIDER_MALFORMED_RESPONSE
    } else {
        provider_code_for_status(error.status_code)
    }
}

/// Map an HTTP status reported by the provider to an error code
pub fn provider_code_for_status(status: Option<u16>) -> u16 {
    match status {
        Some(429) => ErrorCode::PROVIDER_THROTTLED,
        Some(404) => ErrorCode::PROVIDER_NOT_FOUND,
        Some(401) | Some(403) => ErrorCode::PROVIDER_ACCESS_DENIED,
        Some(409) => ErrorCode::PROVIDER_CONFLICT,
        Some(_) => ErrorCode::PROVIDER_GENERIC,
        None => ErrorCode::PROVIDER_TRANSPORT,
    }
}
