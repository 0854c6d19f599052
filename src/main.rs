//! Maggie - course registration chatbot backend
//!
//! A single-endpoint web backend that forwards chat messages to a completion
//! API, answers weather questions through geocoding + weather services, and
//! emails a registration confirmation when a finished conversation contains
//! an address and course picks.

mod api;
mod config;
mod enrollment;
mod geo;
mod llm;
mod mailer;
mod system_prompt;
mod transcript;
mod weather;

use api::{create_router, AppState};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use config::AppConfig;
use geo::GoogleGeocoder;
use llm::{LlmService, LoggingService, OpenAiService};
use mailer::{Mailer, NoopMailer, SmtpConfig, SmtpMailer};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{
    catch_panic::CatchPanicLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather::OpenWeatherProvider;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "maggie_chat=info,tower_http=debug".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false),
        )
        .init();

    let config = AppConfig::from_env();
    for name in config.missing_secrets() {
        tracing::warn!(secret = name, "Secret not configured; the dependent service will fail at call time");
    }

    // External-service adapters
    let llm: Arc<dyn LlmService> = Arc::new(LoggingService::new(Arc::new(OpenAiService::new(
        config.openai_api_key.clone().unwrap_or_default(),
        &config.model,
        None,
    ))));
    let geocoder = Arc::new(GoogleGeocoder::new(
        config.google_api_key.clone().unwrap_or_default(),
        None,
    ));
    let weather_provider = Arc::new(OpenWeatherProvider::new(
        config.weather_api_key.clone().unwrap_or_default(),
        None,
    ));
    let mailer: Arc<dyn Mailer> = match &config.mail_password {
        Some(password) => Arc::new(SmtpMailer::new(&SmtpConfig {
            relay: config.smtp_relay.clone(),
            port: config.smtp_port,
            username: config.smtp_username.clone(),
            password: password.clone(),
            sender: config.smtp_sender.clone(),
        })?),
        None => Arc::new(NoopMailer),
    };

    let state = AppState::new(llm, geocoder, weather_provider, mailer);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .layer(CatchPanicLayer::custom(panic_response));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!("Maggie chatbot server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Static 500 for anything that panics inside a handler
fn panic_response(_err: Box<dyn std::any::Any + Send + 'static>) -> axum::response::Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "An internal error occurred. Please try again later.",
    )
        .into_response()
}
