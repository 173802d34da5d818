//! Contract error types for the organization settings service
//!
//! These errors are transport-agnostic and used for inter-module communication.

/// Organization settings domain errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SettingsError {
    /// No authenticated caller
    #[error("Authentication required")]
    Unauthenticated,

    /// Caller is not allowed to perform the operation
    #[error("Forbidden: {reason}")]
    Forbidden { reason: String },

    /// Organization not found
    #[error("{resource} not found: {id}")]
    NotFound { resource: String, id: String },

    /// Submitted value is not acceptable
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Submitted keys are not recognized settings
    #[error("Unknown settings: {}", keys.join(", "))]
    UnknownSettings { keys: Vec<String> },

    /// Internal error
    #[error("Internal error")]
    Internal,
}

impl SettingsError {
    pub(crate) fn organization_not_found(id: uuid::Uuid) -> Self {
        Self::NotFound {
            resource: "organization".to_string(),
            id: id.to_string(),
        }
    }
}
