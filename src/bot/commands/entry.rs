//! Expense entry command.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            expense::{NewExpense, record_expense},
            input::{parse_amount, parse_day},
            report::format_money,
        },
        errors::{Error, Result},
    };

    /// Records an expense in the Transactions sheet.
    ///
    /// Payment method and payer default to the first configured option, the
    /// date to today.
    #[allow(clippy::too_many_arguments)]
    #[poise::command(slash_command, prefix_command)]
    pub async fn expense(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "Amount spent, e.g. 12.50"] amount: String,
        #[description = "Category"]
        #[autocomplete = "autocomplete::autocomplete_category"]
        category: String,
        #[description = "What it was for"] description: Option<String>,
        #[description = "Card, account or cash"]
        #[autocomplete = "autocomplete::autocomplete_payment_method"]
        payment_method: Option<String>,
        #[description = "Who paid"]
        #[autocomplete = "autocomplete::autocomplete_payer"]
        payer: Option<String>,
        #[description = "Optional notes"] notes: Option<String>,
        #[description = "Date as YYYY-MM-DD (default today)"] date: Option<String>,
        #[description = "Spreadsheet to write to"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let ledger = data.ledger(spreadsheet.as_deref())?;
        let form = &data.config.form;

        let date = match date.as_deref() {
            Some(raw) => parse_day(raw)?,
            None => chrono::Local::now().date_naive(),
        };
        let first = |options: &[String]| options.first().cloned().unwrap_or_default();

        let recorded = record_expense(
            ledger,
            NewExpense {
                date,
                category,
                description: description.unwrap_or_default(),
                amount: parse_amount(&amount)?,
                payment_method: payment_method.unwrap_or_else(|| first(&form.payment_methods)),
                notes: notes.unwrap_or_default(),
                payer: payer.unwrap_or_else(|| first(&form.payers)),
            },
        )
        .await?;

        let detail = if recorded.description.is_empty() {
            String::new()
        } else {
            format!(" ({})", recorded.description)
        };
        ctx.say(format!(
            "✅ Added expense of {} in **{}**{} on {}, paid by {} with {}.",
            format_money(recorded.amount),
            recorded.category,
            detail,
            recorded.day(),
            recorded.payer,
            recorded.payment_method
        ))
        .await?;
        Ok(())
    }
}

pub use inner::*;
