//! Dashboard and CSV export commands.
//!
//! Both run one full cycle: load (through the cache), normalize, filter by the
//! date range, partition by month and summarise the selected month. A fatal
//! error aborts the cycle and nothing partial is shown.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{BotData, handlers::autocomplete},
        core::{
            aggregate::CategoryTotal,
            dashboard::{Dashboard, DashboardQuery, MonthView, build_dashboard, load_snapshot},
            export::export_month_csv,
            input::parse_day,
            models::Transaction,
            report::{
                format_budget_line, format_money, format_progress_bar, more_line, sorted_by_usage,
            },
        },
        errors::{Error, Result},
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Discord rejects embed field values longer than this.
    const FIELD_LIMIT: usize = 1024;
    const TRANSACTION_LINES: usize = 15;

    fn read_query(
        start: Option<&str>,
        end: Option<&str>,
        month: Option<&str>,
    ) -> Result<DashboardQuery> {
        let mut query = DashboardQuery::month_to_date(chrono::Local::now().date_naive());
        if let Some(start) = start {
            query.start = parse_day(start)?;
        }
        if let Some(end) = end {
            query.end = parse_day(end)?;
        }
        query.month = month.map(str::parse).transpose()?;
        Ok(query)
    }

    /// Joins lines into one field value, dropping the tail once it would overflow.
    fn clip(lines: &[String]) -> Result<String> {
        let mut value = String::new();
        for (shown, line) in lines.iter().enumerate() {
            if value.len() + line.len() + 1 > FIELD_LIMIT - 24 {
                value.push_str(&more_line(lines.len() - shown).unwrap_or_default());
                break;
            }
            writeln!(value, "{line}")?;
        }
        if value.is_empty() {
            value.push('-');
        }
        Ok(value)
    }

    fn category_lines(totals: &[CategoryTotal]) -> Vec<String> {
        totals
            .iter()
            .map(|c| format!("{}: {}", c.category, format_money(c.total)))
            .collect()
    }

    fn transaction_line(t: &Transaction) -> String {
        let mut line = format!("`{}` {} {}", t.day(), format_money(t.amount), t.category);
        if !t.description.is_empty() {
            line.push_str(" - ");
            line.push_str(&t.description);
        }
        line
    }

    fn month_embed(spreadsheet: &str, query: &DashboardQuery, view: &MonthView) -> Result<serenity::CreateEmbed> {
        let summary = &view.summary;
        let months: Vec<String> = view.months.iter().map(ToString::to_string).collect();

        let budget_lines: Vec<String> = sorted_by_usage(&summary.per_category)
            .into_iter()
            .map(|line| {
                format!(
                    "{}\n{}",
                    format_budget_line(line),
                    format_progress_bar(line.used_pct, Some(10))
                )
            })
            .collect();

        let newest = view.newest_first();
        let mut transaction_lines: Vec<String> = newest
            .iter()
            .take(TRANSACTION_LINES)
            .map(|t| transaction_line(t))
            .collect();
        if newest.len() > TRANSACTION_LINES {
            transaction_lines.push(format!("…and {} more", newest.len() - TRANSACTION_LINES));
        }

        let color = if summary.remaining.is_sign_negative() {
            0x00E7_4C3C
        } else {
            0x0034_98DB
        };

        Ok(serenity::CreateEmbed::default()
            .title(format!("📊 {}: {}", spreadsheet, summary.month))
            .description(format!(
                "Range {} to {} | Months: {}",
                query.start,
                query.end,
                months.join(", ")
            ))
            .color(color)
            .field("Total spent", format_money(summary.total_spent), true)
            .field("Total budget", format_money(summary.total_budget), true)
            .field("Remaining", format_money(summary.remaining), true)
            .field("Spending by category", clip(&category_lines(&summary.by_category))?, false)
            .field("Budget vs actual", clip(&budget_lines)?, false)
            .field("Transactions", clip(&transaction_lines)?, false)
            .footer(serenity::CreateEmbedFooter::new(format!(
                "{} transaction{} this month",
                view.transactions.len(),
                if view.transactions.len() == 1 { "" } else { "s" }
            ))))
    }

    /// Shows a month's totals, budget vs actual and transactions.
    ///
    /// Spending is also broken down by category.
    #[poise::command(slash_command, prefix_command)]
    pub async fn dashboard(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "First day, YYYY-MM-DD (default first of this month)"] start: Option<String>,
        #[description = "Last day, YYYY-MM-DD (default today)"] end: Option<String>,
        #[description = "Month to show, YYYY-MM (default latest in range)"] month: Option<String>,
        #[description = "Spreadsheet to read"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let name = data.config.resolve_spreadsheet(spreadsheet.as_deref())?;
        let ledger = data.ledger(Some(name))?;
        let query = read_query(start.as_deref(), end.as_deref(), month.as_deref())?;

        ctx.defer().await?;

        let snapshot = load_snapshot(ledger).await?;
        match build_dashboard(&snapshot, &query)? {
            Dashboard::NoTransactions => {
                ctx.say("📭 No transactions yet. Add an expense with `/expense`.")
                    .await?;
            }
            Dashboard::NothingInRange => {
                ctx.say(format!(
                    "📭 No transactions between {} and {}.",
                    query.start, query.end
                ))
                .await?;
            }
            Dashboard::Month(view) => {
                let embed = month_embed(name, &query, &view)?;
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
            }
        }
        Ok(())
    }

    /// Exports the selected month's transactions as a CSV attachment.
    #[poise::command(slash_command, prefix_command)]
    pub async fn export(
        ctx: poise::Context<'_, BotData, Error>,
        #[description = "First day, YYYY-MM-DD (default first of this month)"] start: Option<String>,
        #[description = "Last day, YYYY-MM-DD (default today)"] end: Option<String>,
        #[description = "Month to export, YYYY-MM (default latest in range)"] month: Option<String>,
        #[description = "Spreadsheet to read"]
        #[autocomplete = "autocomplete::autocomplete_spreadsheet"]
        spreadsheet: Option<String>,
    ) -> Result<()> {
        let ledger = ctx.data().ledger(spreadsheet.as_deref())?;
        let query = read_query(start.as_deref(), end.as_deref(), month.as_deref())?;

        ctx.defer().await?;

        let snapshot = load_snapshot(ledger).await?;
        let Dashboard::Month(view) = build_dashboard(&snapshot, &query)? else {
            ctx.say("📭 Nothing to export in that range.").await?;
            return Ok(());
        };

        let rows: Vec<&Transaction> = view.transactions.iter().collect();
        let csv = export_month_csv(view.summary.month, &rows)?;
        let attachment = serenity::CreateAttachment::bytes(csv.bytes, csv.file_name.clone());
        ctx.send(
            poise::CreateReply::default()
                .content(format!(
                    "📥 {} ({} transaction{})",
                    csv.file_name,
                    rows.len(),
                    if rows.len() == 1 { "" } else { "s" }
                ))
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }
}

pub use inner::*;
