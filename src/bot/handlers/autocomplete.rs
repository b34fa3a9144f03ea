//! Autocomplete handlers for Discord slash command parameters.
//!
//! Suggestions come from the configuration and from the tables of the
//! spreadsheet already chosen in the command's `spreadsheet` option, or the
//! default one (served through the cache). A failed load just yields fewer
//! suggestions.

use crate::{
    bot::BotData,
    core::{expense::category_options, normalize},
    errors::Error,
    store::Table,
};
use poise::serenity_prelude as serenity;

/// Discord accepts at most 25 autocomplete choices.
const MAX_CHOICES: usize = 25;

fn matching<I>(options: I, partial: &str) -> Vec<String>
where
    I: IntoIterator<Item = String>,
{
    let partial_lower = partial.to_lowercase();
    options
        .into_iter()
        .filter(|option| option.to_lowercase().contains(&partial_lower))
        .take(MAX_CHOICES)
        .collect()
}

/// Name of the command option that selects the spreadsheet.
const SPREADSHEET_OPTION: &str = "spreadsheet";

/// The spreadsheet the user already filled in, if any.
fn selected_spreadsheet<'a>(ctx: poise::Context<'a, BotData, Error>) -> Option<&'a str> {
    let poise::Context::Application(app) = ctx else {
        return None;
    };
    app.args
        .iter()
        .find(|option| option.name == SPREADSHEET_OPTION)
        .and_then(|option| match option.value {
            serenity::ResolvedValue::String(name) => Some(name),
            _ => None,
        })
}

async fn budget_categories(data: &BotData, spreadsheet: Option<&str>) -> Vec<String> {
    let Ok(ledger) = data.ledger(spreadsheet) else {
        return Vec::new();
    };
    match ledger.load(Table::Budgets).await {
        Ok(sheet) => normalize::budgets(&sheet)
            .into_iter()
            .map(|b| b.category)
            .collect(),
        Err(e) => {
            tracing::warn!("Budget autocomplete unavailable: {}", e);
            Vec::new()
        }
    }
}

/// Suggests the configured spreadsheets.
pub async fn autocomplete_spreadsheet(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(ctx.data().config.spreadsheets.iter().cloned(), partial)
}

/// Suggests expense categories: configured defaults plus budgeted categories.
pub async fn autocomplete_category(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    let data = ctx.data();
    let budgeted = budget_categories(data, selected_spreadsheet(ctx)).await;
    let options = category_options(
        data.config.form.categories.iter().map(String::as_str),
        budgeted.iter().map(String::as_str),
    );
    matching(options, partial)
}

/// Suggests the configured payment methods.
pub async fn autocomplete_payment_method(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(ctx.data().config.form.payment_methods.iter().cloned(), partial)
}

/// Suggests the configured payers.
pub async fn autocomplete_payer(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(ctx.data().config.form.payers.iter().cloned(), partial)
}

/// Suggests existing goal names, so an update hits the same row.
pub async fn autocomplete_goal_name(
    ctx: poise::Context<'_, BotData, Error>,
    partial: &str,
) -> Vec<String> {
    matching(goal_names(ctx.data(), selected_spreadsheet(ctx)).await, partial)
}

async fn goal_names(data: &BotData, spreadsheet: Option<&str>) -> Vec<String> {
    let Ok(ledger) = data.ledger(spreadsheet) else {
        return Vec::new();
    };
    let Ok(sheet) = ledger.load(Table::Goals).await else {
        return Vec::new();
    };
    normalize::goals(&sheet)
        .into_iter()
        .map(|g| g.goal_name)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        bot::open_ledgers, config::app::parse_config, errors::Result, test_utils::setup_test_db,
    };
    use rust_decimal::Decimal;

    async fn two_spreadsheets() -> Result<BotData> {
        let db = setup_test_db().await?;
        let config = parse_config(
            r#"
            spreadsheets = ["Household", "Trip"]
            [store]
            provision = true
            "#,
        )?;
        let ledgers = open_ledgers(&db, &config).await?;
        Ok(BotData::new(config, ledgers))
    }

    #[test]
    fn test_matching_is_case_insensitive() {
        let options = ["Food", "Fun", "Rent"].map(String::from);
        assert_eq!(matching(options, "f"), vec!["Food", "Fun"]);
    }

    #[test]
    fn test_matching_caps_choices() {
        let options = (0..40).map(|i| format!("Category {i}"));
        assert_eq!(matching(options, "").len(), MAX_CHOICES);
    }

    #[tokio::test]
    async fn test_suggestions_follow_selected_spreadsheet() -> Result<()> {
        let data = two_spreadsheets().await?;
        let trip = data.ledger(Some("Trip"))?;
        trip.append(
            Table::Budgets,
            vec!["Flights".into(), Decimal::new(800, 0).into()],
        )
        .await?;
        trip.append(
            Table::Goals,
            vec![
                "Hotel".into(),
                Decimal::new(600, 0).into(),
                Decimal::new(100, 0).into(),
            ],
        )
        .await?;

        assert_eq!(budget_categories(&data, Some("Trip")).await, vec!["Flights"]);
        assert!(budget_categories(&data, None).await.is_empty());
        assert_eq!(goal_names(&data, Some("Trip")).await, vec!["Hotel"]);
        assert!(goal_names(&data, Some("Household")).await.is_empty());
        assert!(goal_names(&data, Some("Nope")).await.is_empty());
        Ok(())
    }
}
