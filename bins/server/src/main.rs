//! Tally Bot Server
//!
//! Main entry point for the Tally ledger bot.

use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tally_bot::client::TelegramClient;
use tally_bot::reporter::Reporter;
use tally_bot::{AppState, run_polling};
use tally_core::ledger::Ledger;
use tally_core::schedule::ReportSchedule;
use tally_db::{LedgerRepository, connect};
use tally_shared::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "tally=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load().expect("Failed to load configuration");

    // Connect to database
    let db = connect(&config.database.url).await?;
    info!(database = %config.database.database, "Connected to MongoDB");

    let store = Arc::new(LedgerRepository::new(
        &db,
        &config.database.database,
        &config.database.collection,
        config.database.document_id.clone(),
    ));
    let ledger = Arc::new(Ledger::init(store, config.report.timezone).await?);
    info!("Ledger loaded");

    // Verify the bot token before entering the polling loop
    let client = TelegramClient::new(&config.telegram.token)?;
    let identity = client.get_me().await?;
    let bot_username = identity
        .username
        .unwrap_or_else(|| config.telegram.username.clone());
    info!(bot = %bot_username, id = identity.id, "Telegram token verified");

    // Spawn the daily report task
    let schedule = ReportSchedule::new(
        config.report.hour,
        config.report.minute,
        config.report.timezone,
    );
    let reporter = Reporter::new(Arc::clone(&ledger), client.clone(), schedule);
    let report_task = tokio::spawn(reporter.run());

    let state = AppState {
        ledger,
        client,
        bot_username,
        poll_timeout_secs: config.telegram.poll_timeout_secs,
    };

    info!("Entering polling loop");
    tokio::select! {
        () = run_polling(state) => {}
        result = tokio::signal::ctrl_c() => {
            result?;
            info!("Shutdown signal received");
        }
    }
    report_task.abort();

    Ok(())
}
