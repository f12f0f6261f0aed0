//! HTTP routes for the menu service.
//!
//! Defines the Axum router and application state. Public routes are
//! registered directly; each protected route is wrapped with the
//! authorization middleware carrying the permission it requires.

use crate::auth::{JwksClient, TokenVerifier};
use crate::config::Config;
use crate::handlers;
use crate::middleware::{require_permission, AuthState};
use axum::{
    middleware,
    routing::{delete, get, patch, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: SqlitePool,

    /// Service configuration.
    pub config: Config,
}

/// Build the application routes.
///
/// Creates an Axum router with:
/// - `GET /health` - Liveness probe (simple "OK") - public
/// - `GET /drinks` - Menu with recipes in summary form - public
/// - `GET /drinks-detail` - Menu with full recipes - requires `get:drinks-detail`
/// - `POST /drinks` - Create a drink - requires `post:drinks`
/// - `PATCH /drinks/:id` - Update a drink - requires `patch:drinks`
/// - `DELETE /drinks/:id` - Delete a drink - requires `delete:drinks`
/// - JSON 404 fallback for unmatched paths
/// - TraceLayer for request logging
/// - Permissive CORS for browser clients
pub fn build_routes(state: Arc<AppState>) -> Router {
    // Create JWKS client and token verifier, shared by all protected routes
    let verifier = Arc::new(TokenVerifier::new(
        JwksClient::new(state.config.jwks_url.clone()),
        state.config.api_audience.clone(),
        state.config.issuer(),
    ));

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/drinks", get(handlers::list_drinks));

    // Protected routes, one router per required permission
    let detail_routes = permission_gated(
        Router::new().route("/drinks-detail", get(handlers::list_drinks_detail)),
        &verifier,
        "get:drinks-detail",
    );
    let create_routes = permission_gated(
        Router::new().route("/drinks", post(handlers::create_drink)),
        &verifier,
        "post:drinks",
    );
    let update_routes = permission_gated(
        Router::new().route("/drinks/:id", patch(handlers::update_drink)),
        &verifier,
        "patch:drinks",
    );
    let delete_routes = permission_gated(
        Router::new().route("/drinks/:id", delete(handlers::delete_drink)),
        &verifier,
        "delete:drinks",
    );

    // Merge routes and apply global middleware layers
    // Layer order (bottom-to-top execution):
    // 1. TraceLayer - Log request details
    // 2. CorsLayer - Answer preflight requests (outermost)
    public_routes
        .merge(detail_routes)
        .merge(create_routes)
        .merge(update_routes)
        .merge(delete_routes)
        .fallback(handlers::not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Wrap a router with the authorization middleware for one permission.
///
/// `route_layer` applies only to the routes registered on the given
/// router, so a gated method on a path never shadows a public method
/// merged onto the same path.
fn permission_gated(
    router: Router<Arc<AppState>>,
    verifier: &Arc<TokenVerifier>,
    permission: &'static str,
) -> Router<Arc<AppState>> {
    let auth_state = Arc::new(AuthState {
        verifier: verifier.clone(),
        permission,
    });

    router.route_layer(middleware::from_fn_with_state(
        auth_state,
        require_permission,
    ))
}
