//! Budget commands - set a category budget and list budgets.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            input::parse_amount,
            normalize,
            report::format_money,
            upsert::{UpsertOutcome, submit_budget},
        },
        errors::{Error, Result},
        store::Table,
    };
    use poise::serenity_prelude as serenity;

    /// Sets the monthly budget for a category, replacing any existing amount.
    #[poise::command(slash_command, prefix_command)]
    pub async fn budget(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Category name"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "Monthly budget, e.g. 500"] amount: String,
        #[description = "Spreadsheet to write to"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let ledger = ctx.data().ledger(spreadsheet.as_deref())?;
        let amount = parse_amount(&amount)?;

        let verb = match submit_budget(ledger, &category, amount).await? {
            UpsertOutcome::Updated { .. } => "Updated",
            UpsertOutcome::Appended { .. } => "Added",
        };
        ctx.say(format!(
            "✅ {verb} budget for **{}**: {}",
            category.trim(),
            format_money(amount)
        ))
        .await?;
        Ok(())
    }

    /// Lists every monthly budget.
    #[poise::command(slash_command, prefix_command)]
    pub async fn budgets(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Spreadsheet to read"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let ledger = ctx.data().ledger(spreadsheet.as_deref())?;
        let budgets = normalize::budgets(&*ledger.load(Table::Budgets).await?);

        if budgets.is_empty() {
            ctx.say("📭 No budgets set yet. Add one with `/budget`.").await?;
            return Ok(());
        }

        let total: rust_decimal::Decimal = budgets.iter().map(|b| b.monthly_budget).sum();
        let lines: Vec<String> = budgets
            .iter()
            .map(|b| format!("**{}**: {}", b.category, format_money(b.monthly_budget)))
            .collect();

        let embed = serenity::CreateEmbed::default()
            .title("💰 Monthly Budgets")
            .description(lines.join("\n"))
            .color(0x0034_98DB)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "Total {} across {} categor{}",
                format_money(total),
                budgets.len(),
                if budgets.len() == 1 { "y" } else { "ies" }
            )));
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
