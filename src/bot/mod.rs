//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord interface for the finance tracker: slash
//! commands for entering expenses, budgets and goals, the monthly dashboard,
//! CSV export, and the autocomplete handlers that back their parameters.

/// Discord command implementations (entry, reports, budgeting, savings, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;

use crate::{
    config::app::AppConfig,
    errors::{Error, Result},
    store::{CachedStore, SqlTableStore, TableCache},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::collections::HashMap;
use tracing::{debug, error, info, instrument, warn};

/// A spreadsheet's tables behind the shared read cache.
pub type Ledger = CachedStore<SqlTableStore>;

/// Shared data available to all bot commands.
///
/// Holds the application configuration and one cached store per configured
/// spreadsheet. All stores share the process-wide database connection.
pub struct BotData {
    /// Loaded configuration
    pub config: AppConfig,
    ledgers: HashMap<String, Ledger>,
}

impl BotData {
    /// Creates a new `BotData` from the configuration and opened ledgers.
    #[must_use]
    pub const fn new(config: AppConfig, ledgers: HashMap<String, Ledger>) -> Self {
        Self { config, ledgers }
    }

    /// The ledger for `spreadsheet`, or the default one when `None`.
    ///
    /// # Errors
    /// `Error::UnknownSpreadsheet` for a name outside the configured list.
    pub fn ledger(&self, spreadsheet: Option<&str>) -> Result<&Ledger> {
        let name = self.config.resolve_spreadsheet(spreadsheet)?;
        self.ledgers
            .get(name)
            .ok_or_else(|| Error::UnknownSpreadsheet {
                name: name.to_string(),
            })
    }
}

/// Opens a cached store for every configured spreadsheet.
///
/// With `store.provision` set, missing worksheets are created first;
/// otherwise a missing worksheet is fatal.
pub async fn open_ledgers(
    db: &DatabaseConnection,
    config: &AppConfig,
) -> Result<HashMap<String, Ledger>> {
    let mut ledgers = HashMap::with_capacity(config.spreadsheets.len());
    for name in &config.spreadsheets {
        if config.store.provision {
            let created = SqlTableStore::provision(db, name).await?;
            if created > 0 {
                info!("Provisioned {} worksheet(s) in '{}'", created, name);
            }
        }
        let store = SqlTableStore::open(db.clone(), name).await?;
        let cache = TableCache::new(config.store.cache_ttl());
        debug!(
            "Caching '{}' for {}s",
            store.spreadsheet(),
            cache.ttl().as_secs()
        );
        ledgers.insert(name.clone(), CachedStore::new(store, cache));
    }
    Ok(ledgers)
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {:?}", error);
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            let reply = if error.is_recoverable() {
                warn!("Rejected `{}`: {}", ctx.command().name, error);
                format!("⚠️ {error}")
            } else {
                error!("Error in command `{}`: {:?}", ctx.command().name, error);
                format!("❌ An error occurred: {error}")
            };
            if let Err(e) = ctx.say(reply).await {
                error!("Failed to send error message: {}", e);
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {}", e);
            }
        }
    }
}

/// Every slash command the bot registers.
#[must_use]
pub fn command_list() -> Vec<poise::Command<BotData, Error>> {
    vec![
        commands::expense(),
        commands::dashboard(),
        commands::export(),
        commands::budget(),
        commands::budgets(),
        commands::goal(),
        commands::goals(),
        commands::ping(),
        commands::help(),
    ]
}

/// Registers the commands and runs the Discord client until it stops.
#[instrument(skip(token, data))]
pub async fn run_bot(token: String, data: BotData) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: command_list(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(|ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                info!("Registering commands globally...");
                poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::Client::builder(&token, intents)
        .framework(framework)
        .await
        .inspect_err(|e| error!("Error creating client: {:?}", e))?;

    info!("Starting bot client...");
    client
        .start()
        .await
        .inspect_err(|e| error!("Client error: {:?}", e))?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
