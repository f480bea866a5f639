use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use court_availability::assemble_batch;
use court_availability::page_reader::PageReader;
use job_runners::settings::Settings;
use notifications::delivery::{DeliveryStrategy, Notification};
use notifications::message::build_message;
use notifications::recipients::{FirestoreRecipientRepo, RecipientRepo};
use notifications::telegram::TelegramStrategy;
use std::path::Path;
use tracing::info;

const RESULT_FILE: &str = "data/badminton_results.json";

/// Checks the booking site for bookable badminton slots and notifies the
/// configured Telegram chats.
#[derive(Parser, Debug)]
#[command(name = "court_alerts")]
struct Args {
    /// Run the browser in headless mode.
    #[arg(long)]
    headless: bool,

    /// Delay between browser actions, in milliseconds.
    #[arg(long, default_value_t = 10)]
    slow: u64,

    /// Test mode: write the scraped batch to data/badminton_results.json.
    #[arg(long)]
    test: bool,

    /// Disable notifications (do not send a Telegram message).
    #[arg(long)]
    mute: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    shared_kernel::tracing::config_telemetry();

    let args = Args::parse();

    let settings = Settings::load()?;
    let errors = settings.validate();
    if !errors.is_empty() {
        eprintln!("Configuration errors detected:");
        for error in &errors {
            eprintln!("  - {error}");
        }
        eprintln!("\nPlease set the required settings and try again.");
        std::process::exit(1);
    }

    let reader = PageReader::new(args.headless, args.slow);
    let booking = settings.booking.clone();
    let captured = tokio::task::spawn_blocking(move || {
        reader.capture(&booking.url, &booking.neighborhood_list())
    })
    .await
    .context("Page capture task panicked")??;

    let batch = assemble_batch(&captured.html, &captured.url, Utc::now());

    if args.test {
        batch.write_result_file(Path::new(RESULT_FILE))?;
        info!("Results saved to {RESULT_FILE}");
    }

    let Some(message) = build_message(&batch) else {
        info!("No available reservations found.");
        return Ok(());
    };

    if args.mute {
        info!("Notifications are muted. Skipping notification.");
        return Ok(());
    }

    info!("Sending notification...");
    let recipient_repo = FirestoreRecipientRepo::new(
        settings.firestore.project_id.clone(),
        settings.firestore.auth_token.clone(),
    );
    let recipients = recipient_repo.recipients().await?;
    let strategy = TelegramStrategy::new(settings.telegram.bot_token.clone());
    strategy
        .deliver(Notification { message }, &recipients)
        .await
}
