//! API request and response types

use serde::{Deserialize, Serialize};

/// Body of `POST /chatbot`
#[derive(Debug, Deserialize)]
pub struct ChatbotRequest {
    /// Missing field behaves like an empty message
    #[serde(default)]
    pub message: String,
}

/// Successful chatbot reply
#[derive(Debug, Serialize)]
pub struct ChatbotResponse {
    #[serde(rename = "AI")]
    pub ai: String,
}

/// Error response
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            error: message.into(),
        }
    }
}
