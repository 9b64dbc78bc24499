//! AWS error classification and handling
//!
//! Classifies ECS SDK errors by their `.code()` instead of string matching
//! on the Debug format.

use aws_sdk_ecs::error::ProvideErrorMetadata;
use ecstatic_common::UpdateOutcome;
use thiserror::Error;

/// ECS error categories the agent acts on
#[derive(Debug, Error)]
pub enum AwsError {
    /// An agent update is already running on the instance
    #[error("Agent update already in progress")]
    UpdateInProgress,

    /// The agent is already at the latest version
    #[error("No agent update available")]
    NoUpdateAvailable,

    /// The cluster does not exist (deleted mid-scan or wrong ARN)
    #[error("Cluster not found: {message}")]
    ClusterNotFound { message: String },

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    Throttled,

    /// Caller lacks the IAM permission for the call
    #[error("Access denied: {message}")]
    AccessDenied { message: String },

    /// Generic AWS SDK error with code and message
    #[error("AWS error: {message}")]
    Sdk {
        code: Option<String>,
        message: String,
    },
}

impl AwsError {
    /// The AWS error code this variant was classified from.
    pub fn code(&self) -> Option<&str> {
        match self {
            AwsError::UpdateInProgress => Some("UpdateInProgressException"),
            AwsError::NoUpdateAvailable => Some("NoUpdateAvailableException"),
            AwsError::ClusterNotFound { .. } => Some("ClusterNotFoundException"),
            AwsError::Throttled => Some("ThrottlingException"),
            AwsError::AccessDenied { .. } => Some("AccessDeniedException"),
            AwsError::Sdk { code, .. } => code.as_deref(),
        }
    }

    /// Get a user-friendly suggestion for resolving this error, if available.
    pub fn suggestion(&self) -> Option<&'static str> {
        self.code().and_then(suggestion_for_code)
    }

    /// Fold an `UpdateContainerAgent` failure into its typed outcome.
    ///
    /// `detail` is the full error rendering kept for unexpected errors.
    pub fn into_update_outcome(self, detail: String) -> UpdateOutcome {
        match self {
            AwsError::UpdateInProgress => UpdateOutcome::AlreadyInProgress,
            AwsError::NoUpdateAvailable => UpdateOutcome::NoUpdateAvailable,
            other => match other.suggestion() {
                Some(hint) => UpdateOutcome::UnexpectedError(format!("{detail} ({hint})")),
                None => UpdateOutcome::UnexpectedError(detail),
            },
        }
    }
}

const UPDATE_IN_PROGRESS_CODES: &[&str] = &["UpdateInProgressException"];

const NO_UPDATE_CODES: &[&str] = &["NoUpdateAvailableException"];

/// Known AWS error codes for throttling/rate limiting
const THROTTLING_CODES: &[&str] = &["Throttling", "ThrottlingException", "RequestLimitExceeded"];

const ACCESS_DENIED_CODES: &[&str] = &["AccessDeniedException", "UnauthorizedOperation"];

/// Classify an AWS SDK error using the error code.
pub fn classify_aws_error(code: Option<&str>, message: Option<&str>) -> AwsError {
    let message = message.unwrap_or("Unknown error").to_string();

    match code {
        Some(c) if UPDATE_IN_PROGRESS_CODES.contains(&c) => AwsError::UpdateInProgress,
        Some(c) if NO_UPDATE_CODES.contains(&c) => AwsError::NoUpdateAvailable,
        Some("ClusterNotFoundException") => AwsError::ClusterNotFound { message },
        Some(c) if THROTTLING_CODES.contains(&c) => AwsError::Throttled,
        Some(c) if ACCESS_DENIED_CODES.contains(&c) => AwsError::AccessDenied { message },
        _ => AwsError::Sdk {
            code: code.map(|s| s.to_string()),
            message,
        },
    }
}

/// Classify any SDK error exposing error metadata (`SdkError<E>` included).
pub fn classify_sdk_error<E: ProvideErrorMetadata>(error: &E) -> AwsError {
    let meta = ProvideErrorMetadata::meta(error);
    classify_aws_error(meta.code(), meta.message())
}

/// Error code to user-friendly suggestion mapping
const SUGGESTIONS: &[(&str, &str)] = &[
    (
        "AccessDeniedException",
        "Grant ecs:ListClusters, ecs:DescribeClusters, ecs:ListContainerInstances, \
         ecs:DescribeContainerInstances and ecs:UpdateContainerAgent to the caller.",
    ),
    (
        "UnauthorizedOperation",
        "Grant ecs:ListClusters, ecs:DescribeClusters, ecs:ListContainerInstances, \
         ecs:DescribeContainerInstances and ecs:UpdateContainerAgent to the caller.",
    ),
    (
        "MissingVersionException",
        "The agent does not report its version; update it on the host instead.",
    ),
    (
        "ClusterNotFoundException",
        "The cluster was deleted during the scan or the ARN is wrong.",
    ),
    (
        "ThrottlingException",
        "ECS API rate limit hit. The next scheduled run will pick this up.",
    ),
    (
        "Throttling",
        "ECS API rate limit hit. The next scheduled run will pick this up.",
    ),
    (
        "ServerException",
        "ECS service-side failure. The next scheduled run will pick this up.",
    ),
];

fn suggestion_for_code(code: &str) -> Option<&'static str> {
    SUGGESTIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map(|(_, s)| *s)
}
