//! Bearer-token authentication for the settings routes
//!
//! The middleware resolves the token to an [`AuthContext`] and stores it in
//! the request extensions. Whether the caller may act is decided by the
//! service's admin gate.

use super::error::{map_domain_error, Problem};
use crate::config::ApiKeyConfig;
use crate::contract::{AuthContext, SettingsError};
use axum::{
    extract::{Request, State},
    http::header::AUTHORIZATION,
    middleware::Next,
    response::Response,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Resolves bearer tokens to callers
pub trait CredentialResolver: Send + Sync {
    fn resolve(&self, token: &str) -> Option<AuthContext>;
}

/// Resolver backed by the API keys listed in configuration
#[derive(Debug, Clone, Default)]
pub struct StaticApiKeys {
    keys: HashMap<String, AuthContext>,
}

impl StaticApiKeys {
    pub fn new(keys: &[ApiKeyConfig]) -> Self {
        let keys = keys
            .iter()
            .map(|k| {
                let ctx = AuthContext {
                    user_id: k.user_id,
                    org_id: k.org_id,
                    is_admin: k.admin,
                };
                (k.key.clone(), ctx)
            })
            .collect();
        Self { keys }
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

impl CredentialResolver for StaticApiKeys {
    fn resolve(&self, token: &str) -> Option<AuthContext> {
        self.keys.get(token).cloned()
    }
}

/// Reject requests without a resolvable bearer token
pub async fn authenticate(
    State(resolver): State<Arc<dyn CredentialResolver>>,
    mut request: Request,
    next: Next,
) -> Result<Response, Problem> {
    let ctx = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .and_then(|token| resolver.resolve(token.trim()))
        .ok_or_else(|| map_domain_error(SettingsError::Unauthenticated))?;

    tracing::debug!(user_id = %ctx.user_id, org_id = %ctx.org_id, "request authenticated");
    request.extensions_mut().insert(ctx);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn resolves_configured_keys_only() {
        let org_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let keys = StaticApiKeys::new(&[ApiKeyConfig {
            key: "secret".to_string(),
            user_id,
            org_id,
            admin: true,
        }]);

        assert_eq!(keys.resolve("secret"), Some(AuthContext::admin(user_id, org_id)));
        assert_eq!(keys.resolve("other"), None);
    }
}
