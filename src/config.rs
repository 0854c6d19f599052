//! Process configuration
//!
//! Everything comes from the environment. Missing secrets do not abort
//! startup; the affected adapter degrades at call time.

/// Environment-sourced configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Listen port (`MAGGIE_PORT`, default 8000)
    pub port: u16,
    /// Completion model name (`MAGGIE_MODEL`)
    pub model: String,
    pub openai_api_key: Option<String>,
    pub google_api_key: Option<String>,
    pub weather_api_key: Option<String>,
    pub mail_password: Option<String>,
    pub smtp_relay: String,
    pub smtp_port: u16,
    pub smtp_username: String,
    pub smtp_sender: String,
}

impl AppConfig {
    pub fn from_env() -> Self {
        let port: u16 = std::env::var("MAGGIE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8000);

        let smtp_port: u16 = std::env::var("SMTP_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(587);

        Self {
            port,
            model: std::env::var("MAGGIE_MODEL").unwrap_or_else(|_| "gpt-4o-mini".to_string()),
            openai_api_key: std::env::var("OPENAI_API_KEY").ok(),
            google_api_key: std::env::var("GOOGLE_API_KEY").ok(),
            weather_api_key: std::env::var("WEATHER_API_KEY").ok(),
            mail_password: std::env::var("MAIL_PASSWORD").ok(),
            smtp_relay: std::env::var("SMTP_RELAY").unwrap_or_else(|_| "smtp.gmail.com".to_string()),
            smtp_port,
            smtp_username: std::env::var("SMTP_USERNAME").unwrap_or_else(|_| "cstugpt".to_string()),
            smtp_sender: std::env::var("SMTP_SENDER")
                .unwrap_or_else(|_| "cstugpt@gmail.com".to_string()),
        }
    }

    /// Names of secrets that are not configured, for startup warnings
    pub fn missing_secrets(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.openai_api_key.is_none() {
            missing.push("OPENAI_API_KEY");
        }
        if self.google_api_key.is_none() {
            missing.push("GOOGLE_API_KEY");
        }
        if self.weather_api_key.is_none() {
            missing.push("WEATHER_API_KEY");
        }
        if self.mail_password.is_none() {
            missing.push("MAIL_PASSWORD");
        }
        missing
    }
}
