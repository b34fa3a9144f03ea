use finance_tracker::{bot, config, errors::Error, errors::Result};
use dotenvy::dotenv;
use std::env;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; variables may also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load the application configuration
    let app_config = config::app::load_default_config()
        .inspect_err(|e| error!("Critical error loading application configuration: {}", e))?;
    info!(
        "Loaded configuration with {} spreadsheet(s)",
        app_config.spreadsheets.len()
    );

    // 4. Connect once and open every configured spreadsheet
    let db = config::store::connect(&app_config.store)
        .await
        .inspect_err(|e| error!("Failed to connect to the store: {}", e))?;
    let ledgers = bot::open_ledgers(&db, &app_config)
        .await
        .inspect_err(|e| error!("Failed to open spreadsheets: {}", e))?;

    // 5. Run the bot
    let token = env::var("DISCORD_BOT_TOKEN")
        .inspect_err(|e| error!("DISCORD_BOT_TOKEN not found: {}", e))
        .map_err(Error::EnvVar)?;

    bot::run_bot(token, bot::BotData::new(app_config, ledgers)).await
}
