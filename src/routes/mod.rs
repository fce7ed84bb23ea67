pub mod trips;

use axum::{
    http::{
        header::{ACCEPT, CONTENT_TYPE, ORIGIN},
        HeaderValue, Method,
    },
    Router,
};
use tower_http::{cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer};

use crate::{config::AppConfig, error::AppError, state::AppState};

pub fn create_router(state: AppState) -> Result<Router, AppError> {
    let cors = cors_layer(&state.config)?;
    let timeout = TimeoutLayer::new(state.config.request_timeout);
    Ok(Router::new()
        .merge(trips::router())
        .layer(timeout)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state))
}

fn cors_layer(config: &AppConfig) -> Result<CorsLayer, AppError> {
    let origin: HeaderValue = config.cors_allow_origin.parse().map_err(|err| {
        AppError::Config(format!(
            "invalid CORS_ALLOW_ORIGIN {:?}: {err}",
            config.cors_allow_origin
        ))
    })?;
    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([ORIGIN, CONTENT_TYPE, ACCEPT]))
}
