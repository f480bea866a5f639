use crate::recipients::ChatId;
use async_trait::async_trait;

/// One formatted availability summary, ready for delivery.
pub struct Notification {
    pub message: String,
}

#[async_trait]
pub trait DeliveryStrategy: Send + Sync {
    /// Delivers the notification to every recipient. Individual recipient
    /// failures must not abort the remaining deliveries; implementations
    /// fail only when nobody could be reached.
    async fn deliver(&self, notification: Notification, recipients: &[ChatId])
        -> anyhow::Result<()>;
}
