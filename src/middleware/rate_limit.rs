use std::sync::Arc;

use axum::{body::Body, http::Request, http::StatusCode, response::IntoResponse, response::Response};
use tower_governor::{
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor},
    GovernorError, GovernorLayer,
};
use uuid::Uuid;

use crate::utils::jwt::{Claims, PrincipalRole};

pub type PublicGovernorLayer = GovernorLayer<
    PeerIpKeyExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

pub type PrincipalGovernorLayer = GovernorLayer<
    PrincipalIdExtractor,
    governor::middleware::NoOpMiddleware<governor::clock::QuantaInstant>,
    Body,
>;

/// Rate limit login/registration per client IP before any authentication
/// exists: 100 requests per minute.
pub fn create_public_governor() -> PublicGovernorLayer {
    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(600)
            .burst_size(100)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(config).error_handler(rate_limit_error_handler)
}

/// Key extractor that reads the principal id from the JWT claims placed in
/// request extensions by the auth middleware.
#[derive(Debug, Clone, Copy)]
pub struct PrincipalIdExtractor;

impl KeyExtractor for PrincipalIdExtractor {
    type Key = Uuid;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        let claims = req
            .extensions()
            .get::<Claims>()
            .ok_or(GovernorError::UnableToExtractKey)?;

        Ok(claims.sub)
    }
}

/// Per-principal limits on the authenticated route groups. Drivers poll
/// their request and active lists, so they get a higher budget than
/// customers. Admin routes skip this layer entirely.
pub fn create_principal_governor(role: PrincipalRole) -> PrincipalGovernorLayer {
    let (per_ms, burst) = match role {
        PrincipalRole::Driver => (120, 500),    // 500 per minute
        _ => (600, 100),                        // 100 per minute
    };

    let config = Arc::new(
        GovernorConfigBuilder::default()
            .per_millisecond(per_ms)
            .burst_size(burst)
            .key_extractor(PrincipalIdExtractor)
            .finish()
            .unwrap(),
    );

    GovernorLayer::new(config).error_handler(rate_limit_error_handler)
}

fn rate_limit_error_handler(error: GovernorError) -> Response {
    match error {
        GovernorError::TooManyRequests { .. } => {
            tracing::warn!("request rejected by rate limiter");
            (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(serde_json::json!({ "error": "Too many requests" })),
            )
                .into_response()
        }
        GovernorError::UnableToExtractKey => (
            StatusCode::UNAUTHORIZED,
            axum::Json(serde_json::json!({ "error": "No authentication found" })),
        )
            .into_response(),
        GovernorError::Other { code, msg, .. } => {
            let body = msg.unwrap_or_else(|| "Rate limiter error".to_string());
            (code, axum::Json(serde_json::json!({ "error": body }))).into_response()
        }
    }
}
