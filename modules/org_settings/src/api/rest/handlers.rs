//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::{SettingsResponse, UpdateSettingsRequest},
    error::{map_domain_error, map_json_rejection, Problem},
};
use crate::contract::AuthContext;
use crate::domain::Service;
use axum::{extract::rejection::JsonRejection, Json};
use std::sync::Arc;

/// Get the organization's effective settings
#[utoipa::path(
    get,
    path = "/settings",
    tag = "settings",
    responses(
        (status = 200, description = "Effective settings", body = SettingsResponse),
        (status = 401, description = "Missing or unknown credentials", body = Problem),
        (status = 403, description = "Caller is not an organization admin", body = Problem),
        (status = 404, description = "Organization not found", body = Problem),
    ),
    security(("bearer" = []))
)]
pub async fn get_settings(
    service: Arc<Service>,
    ctx: AuthContext,
) -> Result<Json<SettingsResponse>, Problem> {
    let view = service.get_settings(&ctx).await.map_err(map_domain_error)?;

    Ok(Json(view.into()))
}

/// Update some of the organization's settings
#[utoipa::path(
    post,
    path = "/settings",
    tag = "settings",
    request_body = UpdateSettingsRequest,
    responses(
        (status = 200, description = "Settings after the update", body = SettingsResponse),
        (status = 400, description = "Invalid body, value or unknown setting", body = Problem),
        (status = 401, description = "Missing or unknown credentials", body = Problem),
        (status = 403, description = "Caller is not an organization admin", body = Problem),
        (status = 500, description = "The update could not be stored", body = Problem),
    ),
    security(("bearer" = []))
)]
pub async fn update_settings(
    service: Arc<Service>,
    ctx: AuthContext,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<SettingsResponse>, Problem> {
    let Json(UpdateSettingsRequest(patch)) = payload.map_err(map_json_rejection)?;

    let view = service
        .update_settings(&ctx, patch)
        .await
        .map_err(map_domain_error)?;

    Ok(Json(view.into()))
}
