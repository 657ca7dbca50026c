use axum::{
    middleware,
    routing::{delete, get, post},
    Router,
};
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod services;

use auth::rate_limit::RateLimitState;
use config::Config;
use services::sentiment::SentimentModel;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<Config>,
    pub rate_limiter: RateLimitState,
    pub analyzer: Arc<dyn SentimentModel>,
}

pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/api/auth/register", post(handlers::auth::register))
        .route("/api/auth/login", post(handlers::auth::login))
        .route("/api/auth/refresh", post(handlers::auth::refresh))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::rate_limit::rate_limit_auth,
        ));

    let public_routes = Router::new()
        .route("/health", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::readyz))
        .merge(auth_routes);

    let protected_routes = Router::new()
        .route(
            "/api/me",
            get(handlers::auth::me).delete(handlers::auth::delete_account),
        )
        .route("/api/auth/logout", post(handlers::auth::logout))
        .route("/api/dashboard", get(handlers::dashboard::get_dashboard))
        // Plants
        .route(
            "/api/plants",
            get(handlers::plants::list_plants).post(handlers::plants::create_plant),
        )
        .route(
            "/api/plants/:id",
            get(handlers::plants::get_plant)
                .put(handlers::plants::update_plant)
                .delete(handlers::plants::delete_plant),
        )
        // Mood logs
        .route(
            "/api/plants/:id/moods",
            get(handlers::mood_logs::list_mood_logs).post(handlers::mood_logs::create_mood_log),
        )
        .route("/api/moods/:id", delete(handlers::mood_logs::delete_mood_log))
        // Reminders
        .route(
            "/api/plants/:id/reminders",
            post(handlers::reminders::create_reminder),
        )
        .route(
            "/api/reminders/:id/complete",
            post(handlers::reminders::complete_reminder),
        )
        .route(
            "/api/reminders/:id",
            delete(handlers::reminders::delete_reminder),
        )
        // Insights
        .route("/api/insights", get(handlers::insights::get_insights))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::middleware::require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS for the configured front end plus any `CORS_EXTRA_ORIGINS`.
pub fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let mut origins = vec![config.frontend_url.parse::<axum::http::HeaderValue>()?];
    if let Ok(extra) = std::env::var("CORS_EXTRA_ORIGINS") {
        for o in extra.split(',') {
            if let Ok(hv) = o.trim().parse::<axum::http::HeaderValue>() {
                origins.push(hv);
            }
        }
    }

    Ok(CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([
            axum::http::Method::GET,
            axum::http::Method::POST,
            axum::http::Method::PUT,
            axum::http::Method::DELETE,
            axum::http::Method::OPTIONS,
        ])
        .allow_headers([
            axum::http::header::AUTHORIZATION,
            axum::http::header::CONTENT_TYPE,
            axum::http::header::ACCEPT,
        ])
        .allow_credentials(true))
}
