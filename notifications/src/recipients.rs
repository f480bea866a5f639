use anyhow::Context;
use async_trait::async_trait;
use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use serde_json::json;
use shared_kernel::http_client::HttpClient;
use std::collections::HashMap;
use std::fmt::{Display, Formatter};
use url::Url;

const FIRESTORE_HOST: &str = "https://firestore.googleapis.com/v1";
const RECIPIENTS_COLLECTION: &str = "chat_ids";

/// A Telegram chat identifier, used as the recipient address.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ChatId(String);

impl ChatId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn inner(&self) -> &str {
        &self.0
    }
}

impl Display for ChatId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

/// A recipient as stored in the document store: the chat plus a display name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipientRecord {
    pub chat_id: ChatId,
    pub name: String,
}

/// The recipient set is process-wide external state owned by the document
/// store; the core fetches it once per run and never mutates it.
#[async_trait]
pub trait RecipientRepo: Send + Sync {
    async fn recipients(&self) -> anyhow::Result<Vec<ChatId>>;
}

pub struct FirestoreRecipientRepo {
    project_id: String,
    auth_token: Secret<String>,
}

#[derive(Deserialize)]
struct ListDocumentsResponse {
    #[serde(default)]
    documents: Vec<Document>,
}

#[derive(Deserialize)]
struct Document {
    /// Fully qualified resource name; the chat id is its last path segment.
    name: String,
}

impl FirestoreRecipientRepo {
    pub fn new(project_id: String, auth_token: Secret<String>) -> Self {
        Self {
            project_id,
            auth_token,
        }
    }

    fn collection_url(&self, suffix: &str) -> anyhow::Result<Url> {
        Url::parse(&format!(
            "{FIRESTORE_HOST}/projects/{}/databases/(default)/documents{suffix}",
            self.project_id
        ))
        .context("Invalid Firestore URL")
    }

    fn auth_headers(&self) -> HashMap<&'static str, String> {
        let bearer_token = format!("Bearer {}", self.auth_token.expose_secret());
        HashMap::from([("Authorization", bearer_token)])
    }

    /// Replaces the stored recipient set with the given chats, one document
    /// per chat keyed by its chat id, in a single commit.
    pub async fn replace_recipients(&self, chats: &[RecipientRecord]) -> anyhow::Result<()> {
        let writes: Vec<_> = chats
            .iter()
            .map(|chat| {
                json!({
                    "update": {
                        "name": format!(
                            "projects/{}/databases/(default)/documents/{RECIPIENTS_COLLECTION}/{}",
                            self.project_id, chat.chat_id
                        ),
                        "fields": {
                            "chatId": { "stringValue": chat.chat_id.inner() },
                            "name": { "stringValue": chat.name },
                        }
                    }
                })
            })
            .collect();

        let url = self.collection_url(":commit")?;
        HttpClient::post_json::<serde_json::Value>(
            url,
            self.auth_headers(),
            json!({ "writes": writes }),
        )
        .await
        .context("Failed to commit recipients to Firestore")?;
        tracing::info!("Updated {} chat ids in Firestore", chats.len());
        Ok(())
    }
}

#[async_trait]
impl RecipientRepo for FirestoreRecipientRepo {
    async fn recipients(&self) -> anyhow::Result<Vec<ChatId>> {
        let url = self.collection_url(&format!("/{RECIPIENTS_COLLECTION}"))?;
        let response: ListDocumentsResponse = HttpClient::get_with_headers(url, self.auth_headers())
            .await
            .context("Failed to fetch chat ids from Firestore")?;

        Ok(chat_ids_from_documents(response))
    }
}

fn chat_ids_from_documents(response: ListDocumentsResponse) -> Vec<ChatId> {
    response
        .documents
        .into_iter()
        .filter_map(|document| {
            document
                .name
                .rsplit('/')
                .next()
                .map(|id| ChatId::new(id.to_string()))
        })
        .collect()
}
