//! Error message conventions of the DevWorkspace API

use dash_core::error::DashError;

/// Reason given when the request never got an answer
pub const NO_RESPONSE_MESSAGE: &str = "no response available due network issue.";

/// The human part of an error: the server's own message when it answered,
/// [`NO_RESPONSE_MESSAGE`] when it did not.
pub fn error_message(error: &DashError) -> String {
    match error {
        DashError::Http { message, .. } => message.clone(),
        DashError::Network { .. } => NO_RESPONSE_MESSAGE.to_string(),
        other => other.to_string(),
    }
}

/// Prefix `error` with `context`, keeping the HTTP status when there is one.
pub fn with_context(error: DashError, context: &str) -> DashError {
    let message = format!("{}: {}", context, error_message(&error));
    match error {
        DashError::Http { status, .. } => DashError::Http { status, message },
        _ => DashError::Workspace { message },
    }
}
