//! # Controller Errors
//!
//! Every failure a source can produce is one [`ApiError`]; the controller
//! converts it into user-facing text with [`ApiError::user_message`] so no
//! screen has to phrase its own messages.

use std::fmt;

/// Errors reported by a [`ResourceSource`](crate::ResourceSource).
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused, timeout, ...).
    #[error("Network failure: {0}")]
    Network(String),

    /// The server answered with a non-success status.
    #[error("Server rejected request ({status}): {}", message.as_deref().unwrap_or("no message"))]
    Validation {
        status: u16,
        message: Option<String>,
    },

    /// The payload could not be decoded.
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// The source has no endpoint for this operation.
    #[error("Operation not supported: {0}")]
    Unsupported(&'static str),
}

/// What the user was trying to do when a call succeeded or failed.
///
/// Drives the wording of notices.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    Create,
    Update,
    Delete,
    SetStatus,
    /// A resource-specific side action; the string is the past participle
    /// used in the success notice (e.g. `"approved"`).
    Custom(&'static str),
}

impl Mutation {
    fn failure_verb(self) -> &'static str {
        match self {
            Mutation::Create | Mutation::Update => "save",
            Mutation::Delete => "delete",
            Mutation::SetStatus => "change the status of",
            Mutation::Custom(_) => "update",
        }
    }

    /// Success text for a resource called `name` (singular).
    pub fn success_message(self, name: &str) -> String {
        match self {
            Mutation::Create => format!("{name} created successfully"),
            Mutation::Update => format!("{name} updated successfully"),
            Mutation::Delete => format!("{name} deleted successfully"),
            Mutation::SetStatus => format!("{name} status updated"),
            Mutation::Custom(done) => format!("{name} {done}"),
        }
    }
}

impl fmt::Display for Mutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mutation::Custom(done) => write!(f, "custom({done})"),
            other => write!(f, "{other:?}"),
        }
    }
}

impl ApiError {
    /// Text shown to the user after a failed load of `plural`.
    pub fn load_message(&self, plural: &str) -> String {
        match self {
            ApiError::Validation {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Validation { message: None, .. } => {
                format!("The server refused to list {plural}")
            }
            _ => format!("Could not load {plural}"),
        }
    }

    /// Text shown to the user after a failed mutation on `plural`.
    pub fn user_message(&self, mutation: Mutation, plural: &str) -> String {
        let verb = mutation.failure_verb();
        match self {
            ApiError::Network(_) => format!("Could not {verb} {plural}. Check your connection"),
            ApiError::Validation {
                message: Some(msg), ..
            } => msg.clone(),
            ApiError::Validation { message: None, .. } => {
                format!("The server rejected the request to {verb} {plural}")
            }
            ApiError::Malformed(_) => format!("Unexpected response while trying to {verb} {plural}"),
            ApiError::Unsupported(_) => format!("Cannot {verb} {plural} from this screen"),
        }
    }
}

/// Why a [`submit`](crate::ResourceListController::submit) did not go through.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SubmitError {
    #[error("A submit is already in flight for this session")]
    InFlight,
    #[error("The session is already closed")]
    Closed,
    #[error("Missing required fields: {}", .0.join(", "))]
    MissingFields(Vec<String>),
    #[error(transparent)]
    Api(#[from] ApiError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn server_message_is_surfaced_verbatim() {
        let err = ApiError::Validation {
            status: 422,
            message: Some("Code already in use".into()),
        };
        assert_eq!(
            err.user_message(Mutation::Create, "faculties"),
            "Code already in use"
        );
        assert_eq!(err.load_message("faculties"), "Code already in use");
    }

    #[test]
    fn fallback_messages_name_the_resource() {
        let network = ApiError::Network("connection refused".into());
        assert_eq!(network.load_message("programs"), "Could not load programs");
        assert_eq!(
            network.user_message(Mutation::Delete, "programs"),
            "Could not delete programs. Check your connection"
        );

        let rejected = ApiError::Validation {
            status: 400,
            message: None,
        };
        assert_eq!(
            rejected.user_message(Mutation::Update, "roles"),
            "The server rejected the request to save roles"
        );
    }

    #[test]
    fn missing_fields_display() {
        let err = SubmitError::MissingFields(vec!["name".into(), "code".into()]);
        assert_eq!(err.to_string(), "Missing required fields: name, code");
    }
}
