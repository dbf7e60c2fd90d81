//! Application configuration. Backend credentials, household, delivery channels.
//!
//! Loaded once in `main` and passed into adapter constructors; nothing below
//! `main` reads the environment for settings.

use crate::adapters::ai::gemini_adapter::{DEFAULT_GEMINI_MODEL, DEFAULT_GEMINI_URL};
use crate::adapters::ai::openai_adapter::DEFAULT_OPENAI_URL;
use crate::usecases::plan_generator::{DEFAULT_HOUSEHOLD_SIZE, DEFAULT_TEMPERATURE};
use serde::Deserialize;

pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 120;
pub const DEFAULT_SMTP_PORT: u16 = 587;

/// Which generation backend to call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendProvider {
    #[default]
    Gemini,
    OpenAi,
    Mock,
}

#[derive(Debug, Deserialize, Default)]
pub struct AppConfig {
    /// Backend selection: gemini | openai | mock. Read from MEAL_PLANNER_PROVIDER.
    #[serde(default)]
    pub provider: Option<BackendProvider>,

    /// Number of people to plan for. Read from MEAL_PLANNER_FAMILY_SIZE or FAMILY_SIZE.
    #[serde(default)]
    pub family_size: Option<u32>,

    /// Sampling temperature for the plan request. Read from MEAL_PLANNER_TEMPERATURE.
    #[serde(default)]
    pub temperature: Option<f32>,

    /// Caller-side timeout around the single backend call. Read from MEAL_PLANNER_REQUEST_TIMEOUT_SECS.
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,

    // ─────────────────────────────────────────────────────────────────────────
    // Gemini
    // ─────────────────────────────────────────────────────────────────────────
    /// Gemini API key. Read from MEAL_PLANNER_GEMINI_API_KEY or GEMINI_API_KEY.
    #[serde(default)]
    pub gemini_api_key: Option<String>,

    /// Gemini model. Defaults to "gemini-2.5-flash".
    #[serde(default)]
    pub gemini_model: Option<String>,

    /// Gemini API root. Defaults to the public v1beta endpoint.
    #[serde(default)]
    pub gemini_api_url: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // OpenAI-compatible
    // ─────────────────────────────────────────────────────────────────────────
    /// API key. Read from MEAL_PLANNER_AI_API_KEY.
    #[serde(default)]
    pub ai_api_key: Option<String>,

    /// Chat completions URL. Defaults to OpenAI.
    #[serde(default)]
    pub ai_api_url: Option<String>,

    /// Model name. Defaults to "gpt-4o-mini".
    #[serde(default)]
    pub ai_model: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // Email (SMTP)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub smtp_server: Option<String>,
    #[serde(default)]
    pub smtp_port: Option<u16>,
    /// Sender address, also the SMTP login.
    #[serde(default)]
    pub email_address: Option<String>,
    #[serde(default)]
    pub email_password: Option<String>,
    #[serde(default)]
    pub recipient_email: Option<String>,

    // ─────────────────────────────────────────────────────────────────────────
    // WhatsApp (Twilio)
    // ─────────────────────────────────────────────────────────────────────────
    #[serde(default)]
    pub twilio_account_sid: Option<String>,
    #[serde(default)]
    pub twilio_auth_token: Option<String>,
    #[serde(default)]
    pub whatsapp_sender_number: Option<String>,
    /// Recipient number or group. Read from WHATSAPP_GROUP_ID.
    #[serde(default)]
    pub whatsapp_recipient: Option<String>,
}

fn env_fallback(value: &Option<String>, key: &str) -> Option<String> {
    value
        .clone()
        .or_else(|| std::env::var(key).ok())
        .filter(|v| !v.trim().is_empty())
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        dotenv::dotenv().ok();
        let mut c = config::Config::builder();
        c = c.add_source(config::Environment::with_prefix("MEAL_PLANNER"));
        if let Ok(path) = std::env::var("MEAL_PLANNER_CONFIG") {
            c = c.add_source(config::File::with_name(&path));
        }
        let mut cfg: Self = c.build()?.try_deserialize()?;
        // FAMILY_SIZE is read directly (no prefix) so an existing .env keeps working
        if cfg.family_size.is_none() {
            if let Ok(s) = std::env::var("FAMILY_SIZE") {
                if let Ok(n) = s.trim().parse::<u32>() {
                    cfg.family_size = Some(n);
                }
            }
        }
        if cfg.smtp_port.is_none() {
            if let Ok(s) = std::env::var("SMTP_PORT") {
                if let Ok(port) = s.trim().parse::<u16>() {
                    cfg.smtp_port = Some(port);
                }
            }
        }
        Ok(cfg)
    }

    pub fn provider_or_default(&self) -> BackendProvider {
        self.provider.unwrap_or_default()
    }

    /// Household size. Defaults to 5; zero is treated as unset.
    pub fn family_size_or_default(&self) -> u32 {
        self.family_size
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_HOUSEHOLD_SIZE)
    }

    pub fn temperature_or_default(&self) -> f32 {
        self.temperature.unwrap_or(DEFAULT_TEMPERATURE)
    }

    /// Backend timeout in seconds. Defaults to 120; zero is treated as unset.
    pub fn request_timeout_secs_or_default(&self) -> u64 {
        self.request_timeout_secs
            .filter(|s| *s > 0)
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Backend Helpers
    // ─────────────────────────────────────────────────────────────────────────

    /// Returns the Gemini key from config or GEMINI_API_KEY env.
    pub fn gemini_api_key(&self) -> Option<String> {
        env_fallback(&self.gemini_api_key, "GEMINI_API_KEY")
    }

    pub fn gemini_model_or_default(&self) -> String {
        self.gemini_model
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string())
    }

    pub fn gemini_api_url_or_default(&self) -> String {
        self.gemini_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_GEMINI_URL.to_string())
    }

    pub fn ai_api_key(&self) -> Option<String> {
        env_fallback(&self.ai_api_key, "OPENAI_API_KEY")
    }

    /// Returns the AI API URL. Defaults to OpenAI chat completions endpoint.
    pub fn ai_api_url_or_default(&self) -> String {
        self.ai_api_url
            .clone()
            .unwrap_or_else(|| DEFAULT_OPENAI_URL.to_string())
    }

    /// Returns the AI model name. Defaults to "gpt-4o-mini".
    pub fn ai_model_or_default(&self) -> String {
        self.ai_model
            .clone()
            .unwrap_or_else(|| "gpt-4o-mini".to_string())
    }

    /// Returns true if the selected backend has its credential.
    pub fn is_backend_configured(&self) -> bool {
        match self.provider_or_default() {
            BackendProvider::Gemini => self.gemini_api_key().is_some(),
            BackendProvider::OpenAi => self.ai_api_key().is_some(),
            BackendProvider::Mock => true,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Email Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn smtp_server(&self) -> Option<String> {
        env_fallback(&self.smtp_server, "SMTP_SERVER")
    }

    pub fn smtp_port_or_default(&self) -> u16 {
        self.smtp_port.unwrap_or(DEFAULT_SMTP_PORT)
    }

    pub fn email_address(&self) -> Option<String> {
        env_fallback(&self.email_address, "EMAIL_ADDRESS")
    }

    pub fn email_password(&self) -> Option<String> {
        env_fallback(&self.email_password, "EMAIL_PASSWORD")
    }

    pub fn recipient_email(&self) -> Option<String> {
        env_fallback(&self.recipient_email, "RECIPIENT_EMAIL")
    }

    /// Returns true if SMTP delivery is fully configured.
    pub fn is_email_configured(&self) -> bool {
        self.smtp_server().is_some()
            && self.email_address().is_some()
            && self.email_password().is_some()
            && self.recipient_email().is_some()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // WhatsApp Helpers
    // ─────────────────────────────────────────────────────────────────────────

    pub fn twilio_account_sid(&self) -> Option<String> {
        env_fallback(&self.twilio_account_sid, "TWILIO_ACCOUNT_SID")
    }

    pub fn twilio_auth_token(&self) -> Option<String> {
        env_fallback(&self.twilio_auth_token, "TWILIO_AUTH_TOKEN")
    }

    pub fn whatsapp_sender_number(&self) -> Option<String> {
        env_fallback(&self.whatsapp_sender_number, "WHATSAPP_SENDER_NUMBER")
    }

    pub fn whatsapp_recipient(&self) -> Option<String> {
        env_fallback(&self.whatsapp_recipient, "WHATSAPP_GROUP_ID")
    }

    /// Returns true if Twilio WhatsApp delivery is fully configured.
    pub fn is_whatsapp_configured(&self) -> bool {
        self.twilio_account_sid().is_some()
            && self.twilio_auth_token().is_some()
            && self.whatsapp_sender_number().is_some()
            && self.whatsapp_recipient().is_some()
    }
}
