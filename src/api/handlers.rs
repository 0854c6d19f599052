//! HTTP request handlers
//!
//! One dispatcher route: weather questions short-circuit through the
//! geocoder and weather adapters, everything else flows through the
//! language model against the shared transcript.

use super::types::{ChatbotRequest, ChatbotResponse, ErrorResponse};
use super::AppState;
use crate::weather;
use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};

/// Generated-token cap for each completion call
const MAX_RESPONSE_TOKENS: u32 = 200;

/// Substring (of the lowercased message) that short-circuits to the weather
/// adapters
const WEATHER_TRIGGER: &str = "weather in";

/// Substring (of the lowercased message) that triggers the registration scan
const CHAT_END_TRIGGER: &str = "end of chat";

const LANDING_PAGE: &str = include_str!("../../static/index.html");

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing_page))
        .route("/chatbot", post(chatbot))
        .with_state(state)
}

async fn landing_page() -> Html<&'static str> {
    Html(LANDING_PAGE)
}

async fn chatbot(
    State(state): State<AppState>,
    Json(req): Json<ChatbotRequest>,
) -> Result<Json<ChatbotResponse>, AppError> {
    let message = req.message;
    let lowered = message.to_lowercase();

    if lowered.contains(WEATHER_TRIGGER) {
        let city = city_after_last_in(&message);
        let ai = weather_reply(&state, &city).await;
        return Ok(Json(ChatbotResponse { ai }));
    }

    // Append the user turn and snapshot the history in one critical section;
    // the completion call runs without the lock.
    let history = {
        let mut transcript = state.transcript.lock().await;
        transcript.push_user(&message);
        transcript.snapshot()
    };

    let reply = state
        .llm
        .complete(&history, MAX_RESPONSE_TOKENS)
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let enrollment = {
        let mut transcript = state.transcript.lock().await;
        transcript.push_assistant(&reply);
        lowered
            .contains(CHAT_END_TRIGGER)
            .then(|| state.catalog.scan(transcript.messages()))
    };

    if let Some(result) = enrollment {
        tracing::info!(
            email_found = result.email.is_some(),
            courses = result.courses.len(),
            "Registration scan completed"
        );
        if result.is_complete() {
            if let Some(email) = result.email.as_deref() {
                state
                    .mailer
                    .send_confirmation(email, &result.sorted_courses())
                    .await;
            }
        }
    }

    Ok(Json(ChatbotResponse { ai: reply }))
}

/// Resolve the city through the geocoder, then fetch conditions.
///
/// A geocoding failure answers immediately; the weather adapter is never
/// invoked without coordinates.
async fn weather_reply(state: &AppState, city: &str) -> String {
    let coords = match state.geocoder.resolve(city).await {
        Ok(coords) => coords,
        Err(e) => {
            tracing::warn!(city, error = %e, "Geocoding failed");
            return format!("Sorry, I couldn't find the coordinates for {city}.");
        }
    };

    match state.weather.current(coords).await {
        Ok(observation) => observation.to_sentence(),
        Err(e) => {
            tracing::warn!(city, error = %e, "Weather lookup failed");
            weather::FAILURE_SENTENCE.to_string()
        }
    }
}

/// Everything after the last whitespace-delimited "in" token, trimmed.
/// Without an "in" token the whole message is taken as the city.
fn city_after_last_in(message: &str) -> String {
    let tokens: Vec<&str> = message.split_whitespace().collect();
    match tokens.iter().rposition(|t| t.eq_ignore_ascii_case("in")) {
        Some(idx) => tokens[idx + 1..].join(" "),
        None => message.trim().to_string(),
    }
}

// ============================================================
// Error handling
// ============================================================

enum AppError {
    /// Language-model failure; the error text is exposed to the caller
    BadRequest(String),
    #[allow(dead_code)]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(ErrorResponse::new(message));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Coordinates, GeoError, Geocoder};
    use crate::llm::{LlmError, LlmErrorKind, LlmService};
    use crate::mailer::Mailer;
    use crate::transcript::ChatMessage;
    use crate::weather::{Observation, WeatherError, WeatherProvider};
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{header, Request};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;

    #[test]
    fn test_city_extraction_after_last_in_token() {
        assert_eq!(city_after_last_in("what's the weather in New York"), "New York");
        assert_eq!(city_after_last_in("weather in the city in Oslo"), "Oslo");
        assert_eq!(city_after_last_in("Weather IN Paris"), "Paris");
        assert_eq!(city_after_last_in("weather report"), "weather report");
        assert_eq!(city_after_last_in("weather in"), "");
    }

    // ------------------------------------------------------------
    // Mock adapters
    // ------------------------------------------------------------

    struct ScriptedLlm {
        reply: Result<String, (LlmErrorKind, String)>,
        calls: AtomicUsize,
    }

    impl ScriptedLlm {
        fn replying(reply: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(reply.to_string()),
                calls: AtomicUsize::new(0),
            })
        }

        fn failing(kind: LlmErrorKind, message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err((kind, message.to_string())),
                calls: AtomicUsize::new(0),
            })
        }
    }

    #[async_trait]
    impl LlmService for ScriptedLlm {
        async fn complete(
            &self,
            _messages: &[ChatMessage],
            _max_tokens: u32,
        ) -> Result<String, LlmError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.reply {
                Ok(reply) => Ok(reply.clone()),
                Err((kind, message)) => Err(LlmError::new(*kind, message.clone())),
            }
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    struct FixedGeocoder {
        coords: Option<Coordinates>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl Geocoder for FixedGeocoder {
        async fn resolve(&self, _city: &str) -> Result<Coordinates, GeoError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.coords
                .ok_or_else(|| GeoError::Status("ZERO_RESULTS".to_string()))
        }
    }

    struct FixedWeather {
        observation: Option<Observation>,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl WeatherProvider for FixedWeather {
        async fn current(&self, _coords: Coordinates) -> Result<Observation, WeatherError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.observation
                .clone()
                .ok_or(WeatherError::Status(StatusCode::INTERNAL_SERVER_ERROR))
        }
    }

    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<(String, Vec<String>)>>,
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_confirmation(&self, to: &str, courses: &[String]) {
            self.sent
                .lock()
                .unwrap()
                .push((to.to_string(), courses.to_vec()));
        }
    }

    struct Harness {
        router: Router,
        llm: Arc<ScriptedLlm>,
        geocoder: Arc<FixedGeocoder>,
        weather: Arc<FixedWeather>,
        mailer: Arc<RecordingMailer>,
    }

    fn harness(llm: Arc<ScriptedLlm>, coords: Option<Coordinates>) -> Harness {
        let geocoder = Arc::new(FixedGeocoder {
            coords,
            calls: AtomicUsize::new(0),
        });
        let weather = Arc::new(FixedWeather {
            observation: Some(Observation {
                temp_f: 68.0,
                description: "clear sky".to_string(),
                wind_speed: 4.0,
            }),
            calls: AtomicUsize::new(0),
        });
        let mailer = Arc::new(RecordingMailer::default());
        let state = AppState::new(
            llm.clone(),
            geocoder.clone(),
            weather.clone(),
            mailer.clone(),
        );
        Harness {
            router: create_router(state),
            llm,
            geocoder,
            weather,
            mailer,
        }
    }

    async fn post_chatbot(router: &Router, message: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri("/chatbot")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(
                serde_json::json!({ "message": message }).to_string(),
            ))
            .unwrap();

        let response = router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap();
        (status, value)
    }

    // ------------------------------------------------------------
    // Dispatcher behavior
    // ------------------------------------------------------------

    #[tokio::test]
    async fn test_landing_page_served() {
        let h = harness(ScriptedLlm::replying("hi"), None);
        let response = h
            .router
            .clone()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_weather_query_bypasses_llm() {
        let h = harness(
            ScriptedLlm::replying("should not be used"),
            Some(Coordinates { lat: 1.0, lon: 2.0 }),
        );

        let (status, body) = post_chatbot(&h.router, "What is the weather in San Jose").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["AI"],
            "The current temperature is 68°F with clear sky. It's not windy."
        );
        assert_eq!(h.llm.calls.load(Ordering::SeqCst), 0);
        assert_eq!(h.geocoder.calls.load(Ordering::SeqCst), 1);
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_geocode_failure_skips_weather_adapter() {
        let h = harness(ScriptedLlm::replying("unused"), None);

        let (status, body) = post_chatbot(&h.router, "weather in Atlantis").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(
            body["AI"],
            "Sorry, I couldn't find the coordinates for Atlantis."
        );
        assert_eq!(h.weather.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_chat_returns_reply_and_appends_history() {
        let h = harness(ScriptedLlm::replying("Hello, I'm Maggie!"), None);

        let (status, body) = post_chatbot(&h.router, "hi there").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["AI"], "Hello, I'm Maggie!");
        assert_eq!(h.llm.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_llm_failure_maps_to_400_with_error_text() {
        let h = harness(
            ScriptedLlm::failing(LlmErrorKind::Auth, "Authentication failed: bad key"),
            None,
        );

        let (status, body) = post_chatbot(&h.router, "hi").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Authentication failed: bad key");
    }

    #[tokio::test]
    async fn test_end_of_chat_fires_confirmation_email() {
        let h = harness(
            ScriptedLlm::replying("Sure! Let me know which courses you want."),
            None,
        );

        // First turn plants the email; the scripted reply opens the window.
        let (status, _) = post_chatbot(&h.router, "My address is student@example.com").await;
        assert_eq!(status, StatusCode::OK);

        // Second turn picks courses inside the window and ends the chat.
        let (status, _) =
            post_chatbot(&h.router, "python and security please, end of chat").await;
        assert_eq!(status, StatusCode::OK);

        let sent = h.mailer.sent.lock().unwrap();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].0, "student@example.com");
        assert_eq!(
            sent[0].1,
            vec!["Python For AI".to_string(), "Security (Seminar)".to_string()]
        );
    }

    #[tokio::test]
    async fn test_end_of_chat_without_courses_sends_nothing() {
        let h = harness(ScriptedLlm::replying("Goodbye!"), None);

        let (status, _) =
            post_chatbot(&h.router, "my address is student@example.com, end of chat").await;
        assert_eq!(status, StatusCode::OK);
        assert!(h.mailer.sent.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_no_trigger_no_scan() {
        let h = harness(
            ScriptedLlm::replying("Let me know which courses you want."),
            None,
        );

        let (status, _) = post_chatbot(&h.router, "python please, student@example.com").await;
        assert_eq!(status, StatusCode::OK);
        assert!(h.mailer.sent.lock().unwrap().is_empty());
    }
}
