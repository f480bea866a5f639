use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use shared_kernel::configuration::config;

#[derive(Debug, Deserialize, Clone)]
pub struct BookingSettings {
    pub url: String,
    /// Comma-separated neighborhood names, as in the `.env` of old.
    pub neighborhoods: String,
}

impl BookingSettings {
    pub fn neighborhood_list(&self) -> Vec<String> {
        self.neighborhoods
            .split(',')
            .map(str::trim)
            .filter(|neighborhood| !neighborhood.is_empty())
            .map(str::to_string)
            .collect()
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct TelegramSettings {
    pub bot_token: Secret<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct FirestoreSettings {
    pub project_id: String,
    pub auth_token: Secret<String>,
}

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub booking: BookingSettings,
    pub telegram: TelegramSettings,
    pub firestore: FirestoreSettings,
}

impl Settings {
    pub fn load() -> anyhow::Result<Self> {
        config::<Settings>()
    }

    /// Names every missing required setting. A non-empty result is fatal for
    /// the invocation: the runner reports each entry and exits without
    /// attempting a scrape.
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.booking.url.trim().is_empty() {
            errors.push("booking.url is not set (APP_BOOKING__URL)".to_string());
        }
        if self.booking.neighborhood_list().is_empty() {
            errors.push("booking.neighborhoods is not set (APP_BOOKING__NEIGHBORHOODS)".to_string());
        }
        if self.telegram.bot_token.expose_secret().trim().is_empty() {
            errors.push("telegram.bot_token is not set (APP_TELEGRAM__BOT_TOKEN)".to_string());
        }
        if self.firestore.project_id.trim().is_empty() {
            errors.push("firestore.project_id is not set (APP_FIRESTORE__PROJECT_ID)".to_string());
        }
        if self.firestore.auth_token.expose_secret().trim().is_empty() {
            errors.push("firestore.auth_token is not set (APP_FIRESTORE__AUTH_TOKEN)".to_string());
        }

        errors
    }
}
