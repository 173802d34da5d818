//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::SettingsError;
use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: SettingsError) -> Problem {
    match error {
        SettingsError::Unauthenticated => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized")
                .with_detail("A valid bearer token is required")
        }

        SettingsError::Forbidden { reason } => {
            Problem::new(StatusCode::FORBIDDEN, "Forbidden").with_detail(reason)
        }

        SettingsError::NotFound { resource, id } => Problem::new(
            StatusCode::NOT_FOUND,
            format!("{} Not Found", resource),
        )
        .with_detail(format!("{} with id '{}' was not found", resource, id)),

        SettingsError::Validation { message } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(message)
        }

        SettingsError::UnknownSettings { keys } => {
            Problem::new(StatusCode::BAD_REQUEST, "Unknown Settings")
                .with_detail(format!("Unknown settings: {}", keys.join(", ")))
        }

        SettingsError::Internal => Problem::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal Server Error",
        )
        .with_detail("An unexpected error occurred"),
    }
}

/// Map a rejected JSON body, keeping the status axum chose
pub fn map_json_rejection(rejection: JsonRejection) -> Problem {
    Problem::new(rejection.status(), "Invalid Request Body").with_detail(rejection.body_text())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn statuses_follow_error_kind() {
        let cases = [
            (SettingsError::Unauthenticated, 401),
            (
                SettingsError::Forbidden {
                    reason: "no".to_string(),
                },
                403,
            ),
            (
                SettingsError::NotFound {
                    resource: "organization".to_string(),
                    id: "x".to_string(),
                },
                404,
            ),
            (
                SettingsError::UnknownSettings {
                    keys: vec!["nope".to_string()],
                },
                400,
            ),
            (SettingsError::Internal, 500),
        ];

        for (error, status) in cases {
            assert_eq!(map_domain_error(error).status, status);
        }
    }

    #[test]
    fn internal_error_hides_details() {
        let problem = map_domain_error(SettingsError::Internal);
        assert_eq!(problem.detail.as_deref(), Some("An unexpected error occurred"));
    }
}
