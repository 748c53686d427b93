// src/routes.rs

use axum::{
    Router,
    http::{HeaderName, HeaderValue, Method, header},
    routing::{get, post},
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    handlers::{analytics, auth, health, session, study_record, timetable},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Merges all sub-routers (auth, study records, analytics, timetable, sessions).
/// * Applies global middleware (Trace, CORS).
/// * Injects global state.
///
/// Mutating routes authenticate through the `AuthUser` extractor in their handlers.
pub fn create_router(state: AppState) -> Router {
    let origin = state
        .config
        .frontend_url
        .trim_end_matches('/')
        .parse::<HeaderValue>()
        .ok();
    if origin.is_none() {
        tracing::warn!(
            "FRONTEND_URL '{}' is not a valid origin; cross-origin requests will be refused",
            state.config.frontend_url
        );
    }

    let cors = CorsLayer::new()
        .allow_origin(AllowOrigin::list(origin))
        .allow_credentials(true)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            HeaderName::from_static("x-requested-with"),
        ]);

    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let record_routes = Router::new()
        .route("/addStudyRecord", post(study_record::create_record))
        .route("/studyRecords", get(study_record::list_records))
        .route(
            "/studyRecord/{id}",
            get(study_record::get_record)
                .put(study_record::update_record)
                .delete(study_record::delete_record),
        );

    let timetable_routes = Router::new()
        .route("/", get(timetable::get_timetable))
        .route("/live", get(timetable::get_live_timetable))
        .route("/{id}", get(timetable::get_record_schedule));

    let session_routes = Router::new()
        .route("/", post(session::start_session))
        .route("/alerts", get(session::list_alerts));

    Router::new()
        .route("/health", get(health::health))
        .nest(
            "/api",
            Router::new()
                .merge(auth_routes)
                .merge(record_routes)
                .route("/analytics", get(analytics::get_analytics))
                .nest("/timetable", timetable_routes)
                .nest("/sessions", session_routes),
        )
        // Global Middleware (applied from outside in)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
