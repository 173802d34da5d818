//! Route registration and OpenAPI document

use super::{auth, dto::*, error::Problem, handlers};
use crate::contract::AuthContext;
use crate::domain::Service;
use axum::{middleware, routing::get, Extension, Json, Router};
use std::sync::Arc;
use utoipa::{
    openapi::security::{Http, HttpAuthScheme, SecurityScheme},
    Modify, OpenApi,
};

/// OpenAPI document of the settings routes
#[derive(OpenApi)]
#[openapi(
    paths(handlers::get_settings, handlers::update_settings),
    components(schemas(SettingsResponse, UpdateSettingsRequest, Problem)),
    modifiers(&BearerAuth),
    tags((name = "settings", description = "Organization settings"))
)]
pub struct ApiDoc;

struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}

/// Register all REST routes
pub fn register_routes(
    router: Router,
    service: Arc<Service>,
    resolver: Arc<dyn auth::CredentialResolver>,
) -> anyhow::Result<Router> {
    let settings = Router::new()
        .route(
            "/settings",
            get(get_settings_handler).post(update_settings_handler),
        )
        .route_layer(middleware::from_fn_with_state(resolver, auth::authenticate))
        .layer(Extension(service));

    let router = router
        .merge(settings)
        .route("/openapi.json", get(openapi_handler));

    Ok(router)
}

// ===== Handler wrappers that extract service and caller from Extension =====

async fn get_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<AuthContext>,
) -> Result<Json<SettingsResponse>, Problem> {
    handlers::get_settings(service, ctx).await
}

async fn update_settings_handler(
    Extension(service): Extension<Arc<Service>>,
    Extension(ctx): Extension<AuthContext>,
    payload: Result<Json<UpdateSettingsRequest>, axum::extract::rejection::JsonRejection>,
) -> Result<Json<SettingsResponse>, Problem> {
    handlers::update_settings(service, ctx, payload).await
}

async fn openapi_handler() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
