//! Savings goal commands - add/update a goal and show progress.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            aggregate::goal_progress,
            input::parse_amount,
            normalize,
            report::{format_money, format_progress_bar, more_line},
            upsert::submit_goal,
        },
        errors::{Error, Result},
        store::Table,
    };
    use poise::serenity_prelude as serenity;

    /// Discord accepts at most 25 fields per embed.
    const EMBED_FIELDS: usize = 25;

    /// Adds a savings goal, or updates the target and saved amount of an existing one.
    #[poise::command(slash_command, prefix_command)]
    pub async fn goal(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Goal name"]
        #[autocomplete = "autocomplete::autocomplete_goal_name"]
        name: String,
        #[description = "Target amount"] target: String,
        #[description = "Amount saved so far"] saved: String,
        #[description = "Spreadsheet to write to"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let ledger = ctx.data().ledger(spreadsheet.as_deref())?;
        let target = parse_amount(&target)?;
        let saved = parse_amount(&saved)?;

        submit_goal(ledger, &name, target, saved).await?;
        ctx.say(format!(
            "✅ Saved goal '{}': {} / {}",
            name.trim(),
            format_money(saved),
            format_money(target)
        ))
        .await?;
        Ok(())
    }

    /// Shows progress towards every savings goal.
    #[poise::command(slash_command, prefix_command)]
    pub async fn goals(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Spreadsheet to read"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let ledger = ctx.data().ledger(spreadsheet.as_deref())?;
        let goals = normalize::goals(&*ledger.load(Table::Goals).await?);

        if goals.is_empty() {
            ctx.say("📭 No goals yet. Add one with `/goal`.").await?;
            return Ok(());
        }

        let fields = goals.iter().take(EMBED_FIELDS).map(|g| {
            (
                g.goal_name.clone(),
                format!(
                    "{} / {}\n{}",
                    format_money(g.current_saved),
                    format_money(g.target_amount),
                    format_progress_bar(goal_progress(g), Some(10))
                ),
                false,
            )
        });

        let mut embed = serenity::CreateEmbed::default()
            .title("🎯 Savings Goals")
            .color(0x002E_CC71)
            .fields(fields);
        if let Some(more) = more_line(goals.len().saturating_sub(EMBED_FIELDS)) {
            embed = embed.footer(serenity::CreateEmbedFooter::new(more));
        }
        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

pub use inner::*;
