use axum::{
    http::HeaderValue,
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::auth;
use crate::handlers;
use crate::AppState;

pub fn build_router(state: AppState) -> Router {
    // Routes behind bearer-token auth
    let protected = Router::new()
        .route("/auth/oauth2/users/me/", get(auth::read_users_me))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth::require_auth,
        ));

    Router::new()
        .route("/", get(handlers::root))
        .route("/foo", get(handlers::foo))
        .route("/health", get(handlers::health_check))
        // Auth routes
        .route("/auth/oauth2/token", post(auth::login_for_access_token))
        .route("/auth/basic/users/me", get(auth::read_basic_user))
        .merge(protected)
        // Utility routes
        .route("/random/:format", get(handlers::random_payload))
        .route("/status/:status", get(handlers::status_code))
        .route("/echo", post(handlers::echo))
        .route("/echo/:wait", post(handlers::echo_with_wait))
        .route("/form", post(handlers::form))
        .route("/multipart-form", post(handlers::multipart_form))
        .route("/upload", post(handlers::upload))
        .route("/download", post(handlers::download))
        .fallback(handlers::not_found)
        .layer(build_cors_layer(state.config.cors_allowed_origins.as_deref()))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Build CORS layer based on configuration.
///
/// With an origin list, only those origins are allowed. Without one, any
/// origin, method and header is accepted and credentials are allowed.
pub fn build_cors_layer(allowed_origins: Option<&[String]>) -> CorsLayer {
    match allowed_origins {
        Some(origins) => {
            let origins: Vec<HeaderValue> =
                origins.iter().filter_map(|s| s.parse().ok()).collect();

            if origins.is_empty() {
                tracing::warn!(
                    "CORS_ALLOWED_ORIGINS is set but has no valid origins, using wide-open CORS"
                );
                CorsLayer::very_permissive()
            } else {
                tracing::info!("CORS configured for origins: {:?}", origins);
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(AllowMethods::mirror_request())
                    .allow_headers(AllowHeaders::mirror_request())
                    .allow_credentials(true)
            }
        }
        None => {
            tracing::info!("CORS_ALLOWED_ORIGINS not set, allowing all origins");
            CorsLayer::very_permissive()
        }
    }
}
