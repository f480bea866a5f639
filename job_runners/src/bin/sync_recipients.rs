use job_runners::settings::Settings;
use notifications::recipients::FirestoreRecipientRepo;
use notifications::telegram::TelegramStrategy;
use tracing::info;

/// Refreshes the Firestore recipient list from the chats currently visible
/// to the bot. Run on its own schedule, independently of the availability
/// check.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    shared_kernel::tracing::config_telemetry();

    let settings = Settings::load()?;

    let strategy = TelegramStrategy::new(settings.telegram.bot_token.clone());
    let chats = strategy.known_chats().await?;
    info!("Fetched {} chat ids from the Telegram API", chats.len());

    let recipient_repo = FirestoreRecipientRepo::new(
        settings.firestore.project_id.clone(),
        settings.firestore.auth_token.clone(),
    );
    recipient_repo.replace_recipients(&chats).await
}
