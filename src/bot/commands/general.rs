//! General Discord commands - ping and help.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::BotData,
        errors::{Error, Result},
    };

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: poise::Context<'_, BotData, Error>) -> Result<()> {
        let help_text = "**Finance Tracker Help**\n\
        Every command takes an optional `spreadsheet`; the first configured one is the default.\n\n\
        **Entry Commands**\n\
        • `/expense <amount> <category> [description] [payment_method] [payer] [notes] [date]` - Records an expense.\n\
        • `/budget <category> <amount>` - Sets the monthly budget of a category.\n\
        • `/goal <name> <target> <saved>` - Adds or updates a savings goal.\n\n\
        **Reports**\n\
        • `/dashboard [start] [end] [month]` - Monthly totals, budget vs actual and transactions.\n\
        • `/export [start] [end] [month]` - Downloads a month's transactions as CSV.\n\
        • `/budgets` - Lists all budgets.\n\
        • `/goals` - Shows progress towards each goal.\n\n\
        **Utility Commands**\n\
        • `/ping` - Checks if the bot is responsive.\n\
        • `/help` - Shows this help message.\n\n\
        Dates are `YYYY-MM-DD`, months are `YYYY-MM`. The range defaults to this month so far.";

        ctx.say(help_text).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
