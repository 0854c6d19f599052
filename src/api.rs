//! HTTP API for the chatbot backend

mod handlers;
mod types;

pub use handlers::create_router;
pub use types::*;

use crate::enrollment::CourseCatalog;
use crate::geo::Geocoder;
use crate::llm::LlmService;
use crate::mailer::Mailer;
use crate::system_prompt::MAGGIE_PROMPT;
use crate::transcript::Transcript;
use crate::weather::WeatherProvider;
use std::sync::Arc;
use tokio::sync::Mutex;

/// Application state shared across handlers
///
/// The transcript is one process-wide conversation: concurrent callers
/// interleave into the same history.
#[derive(Clone)]
pub struct AppState {
    pub transcript: Arc<Mutex<Transcript>>,
    pub llm: Arc<dyn LlmService>,
    pub geocoder: Arc<dyn Geocoder>,
    pub weather: Arc<dyn WeatherProvider>,
    pub mailer: Arc<dyn Mailer>,
    pub catalog: Arc<CourseCatalog>,
}

impl AppState {
    pub fn new(
        llm: Arc<dyn LlmService>,
        geocoder: Arc<dyn Geocoder>,
        weather: Arc<dyn WeatherProvider>,
        mailer: Arc<dyn Mailer>,
    ) -> Self {
        Self {
            transcript: Arc::new(Mutex::new(Transcript::seeded(MAGGIE_PROMPT))),
            llm,
            geocoder,
            weather,
            mailer,
            catalog: Arc::new(CourseCatalog::standard()),
        }
    }
}
