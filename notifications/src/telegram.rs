use crate::delivery::{DeliveryStrategy, Notification};
use crate::recipients::{ChatId, RecipientRecord};
use anyhow::{bail, Context};
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use url::Url;

const TELEGRAM_HOST: &str = "https://api.telegram.org";

pub struct TelegramStrategy {
    bot_token: Secret<String>,
}

impl TelegramStrategy {
    pub fn new(bot_token: Secret<String>) -> Self {
        Self { bot_token }
    }

    fn method_url(&self, method: &str) -> anyhow::Result<Url> {
        Url::parse(&format!(
            "{TELEGRAM_HOST}/bot{}/{method}",
            self.bot_token.expose_secret()
        ))
        .context("Invalid Telegram URL")
    }

    /// The chats currently visible to the bot, deduplicated and ordered by
    /// chat id. Feeds the recipient-sync job.
    pub async fn known_chats(&self) -> anyhow::Result<Vec<RecipientRecord>> {
        let url = self.method_url("getUpdates")?;
        let response: UpdatesResponse = HttpClient::get_json(url)
            .await
            .context("Failed to fetch chat updates from the Telegram API")?;
        Ok(chats_from_updates(response))
    }
}

#[async_trait]
impl DeliveryStrategy for TelegramStrategy {
    async fn deliver(
        &self,
        notification: Notification,
        recipients: &[ChatId],
    ) -> anyhow::Result<()> {
        let url = self.method_url("sendMessage")?;

        let mut delivered = 0usize;
        for chat_id in recipients {
            let body = json!({
                "chat_id": chat_id.inner(),
                "text": notification.message,
                "parse_mode": "HTML",
            });
            match HttpClient::post_json::<serde_json::Value>(url.clone(), HashMap::new(), body)
                .await
            {
                Ok(_) => delivered += 1,
                Err(err) => tracing::warn!("Failed to notify chat {chat_id}: {err}"),
            }
        }

        if delivered == 0 && !recipients.is_empty() {
            bail!("Failed to deliver the notification to any recipient");
        }
        tracing::info!("Notification sent to {delivered}/{} chats", recipients.len());
        Ok(())
    }
}

#[derive(Deserialize)]
struct UpdatesResponse {
    #[serde(default)]
    result: Vec<Update>,
}

#[derive(Deserialize)]
struct Update {
    message: Option<Message>,
}

#[derive(Deserialize)]
struct Message {
    chat: Chat,
}

#[derive(Deserialize)]
struct Chat {
    id: i64,
    #[serde(default)]
    first_name: Option<String>,
    #[serde(default)]
    last_name: Option<String>,
}

fn chats_from_updates(response: UpdatesResponse) -> Vec<RecipientRecord> {
    let mut chats: HashMap<i64, RecipientRecord> = HashMap::new();
    for update in response.result {
        let Some(message) = update.message else {
            continue;
        };
        let chat = message.chat;
        let name = [chat.first_name, chat.last_name]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ");
        chats.insert(
            chat.id,
            RecipientRecord {
                chat_id: ChatId::new(chat.id.to_string()),
                name: name.trim().to_string(),
            },
        );
    }

    let mut ids: Vec<i64> = chats.keys().copied().collect();
    ids.sort_unstable();
    ids.into_iter()
        .filter_map(|id| chats.remove(&id))
        .collect()
}
