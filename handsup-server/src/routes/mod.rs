use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware,
    routing::{get, post, put},
};
use tower_http::{
    cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer},
    services::ServeDir,
    trace::TraceLayer,
};
use tracing::info;

use crate::auth::{self, auth_middleware, require_admin};
use crate::handlers::{
    events, health, history, matching, notifications, profile,
};
use crate::infra::app_state::AppState;

/// The full application: API routes, static assets, tracing and CORS.
pub fn create_app(state: AppState) -> Router {
    let mut router = create_api_router(state.clone());

    if let Some(dir) = state.config().server.static_dir.clone() {
        info!(path = %dir.display(), "serving static assets");
        let assets = ServeDir::new(dir).append_index_html_on_directories(true);
        router = router.fallback_service(assets);
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
        .with_state(state)
}

/// Every `/api` route, grouped by the access level it needs.
pub fn create_api_router(state: AppState) -> Router<AppState> {
    Router::new()
        .merge(create_public_routes())
        .merge(create_protected_routes(state.clone()))
        .merge(create_admin_routes(state))
}

fn create_public_routes() -> Router<AppState> {
    Router::new()
        .route("/api/health", get(health::health_handler))
        .route("/api/auth/register", post(auth::handlers::register_handler))
        .route("/api/auth/login", post(auth::handlers::login_handler))
        .route("/api/events", get(events::list_events_handler))
        .route("/api/events/{id}", get(events::get_event_handler))
}

fn create_protected_routes(state: AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/profile/{volunteer_id}",
            get(profile::get_profile_handler)
                .post(profile::upsert_profile_handler)
                .put(profile::upsert_profile_handler),
        )
        .route("/api/volunteer-history", get(history::own_history_handler))
        .route(
            "/api/volunteer-history/{volunteer_id}",
            get(history::volunteer_history_handler),
        )
        .route("/api/match/score", post(matching::score_handler))
        .route("/api/match/{volunteer_id}", get(matching::rank_handler))
        .route(
            "/api/notifications/{volunteer_id}",
            get(notifications::list_notifications_handler),
        )
        .route(
            "/api/notifications/{volunteer_id}/stream",
            get(notifications::notification_stream_handler),
        )
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

fn create_admin_routes(state: AppState) -> Router<AppState> {
    // Layers wrap outward: the admin check is added first so the bearer
    // check runs before it.
    Router::new()
        .route("/api/events", post(events::create_event_handler))
        .route(
            "/api/events/{id}",
            put(events::update_event_handler)
                .delete(events::delete_event_handler),
        )
        .route("/api/events/reset", post(events::reset_events_handler))
        .route("/api/volunteer-history", post(history::record_history_handler))
        .route("/api/match/assign", post(matching::assign_handler))
        .route(
            "/api/notifications",
            post(notifications::create_notification_handler),
        )
        .route(
            "/api/notifications/reminders/run",
            post(notifications::run_reminders_handler),
        )
        .route_layer(middleware::from_fn(require_admin))
        .route_layer(middleware::from_fn_with_state(state, auth_middleware))
}

/// Permissive in dev mode, the configured allow-list otherwise. An empty
/// allow-list admits no cross-origin caller.
fn cors_layer(state: &AppState) -> CorsLayer {
    let config = state.config();
    if config.dev_mode {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = config
        .cors
        .explicit_origins()
        .into_iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
        ]))
}
