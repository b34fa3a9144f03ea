//! One dashboard cycle: load the tables, normalize, filter, partition and
//! summarise the selected month.
//!
//! Nothing is kept between cycles. Every command builds a fresh `Snapshot`
//! (served through the table cache) and derives its view from it.

use super::{
    aggregate::{MonthSummary, filter_by_date_range, latest_month, partition_by_month},
    models::{BudgetEntry, GoalEntry, MonthKey, Transaction},
    normalize,
};
use crate::{
    errors::{Error, Result},
    store::{CachedStore, Table, TableStore},
};
use chrono::{Datelike, NaiveDate};
use std::cmp::Reverse;
use tracing::debug;

/// Normalized contents of all three tables at one point in time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Snapshot {
    /// Transactions in sheet order
    pub transactions: Vec<Transaction>,
    /// Budgets in sheet order
    pub budgets: Vec<BudgetEntry>,
    /// Goals in sheet order
    pub goals: Vec<GoalEntry>,
}

/// Loads and normalizes every table.
///
/// # Errors
/// Any store failure, or `Error::InvalidDate` when a transaction date cannot
/// be parsed. No partial snapshot is returned.
pub async fn load_snapshot<S: TableStore>(store: &CachedStore<S>) -> Result<Snapshot> {
    let transactions = normalize::transactions(&*store.load(Table::Transactions).await?)?;
    let budgets = normalize::budgets(&*store.load(Table::Budgets).await?);
    let goals = normalize::goals(&*store.load(Table::Goals).await?);
    debug!(
        "Snapshot: {} transactions, {} budgets, {} goals",
        transactions.len(),
        budgets.len(),
        goals.len()
    );
    Ok(Snapshot {
        transactions,
        budgets,
        goals,
    })
}

/// User selection for a dashboard view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DashboardQuery {
    /// First day included
    pub start: NaiveDate,
    /// Last day included
    pub end: NaiveDate,
    /// Month to summarise; the latest month in range when `None`
    pub month: Option<MonthKey>,
}

impl DashboardQuery {
    /// From the first of `today`'s month through `today`, latest month selected.
    #[must_use]
    pub fn month_to_date(today: NaiveDate) -> Self {
        Self {
            start: today.with_day(1).unwrap_or(today),
            end: today,
            month: None,
        }
    }
}

/// Result of a dashboard cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dashboard {
    /// The Transactions table has no data rows at all
    NoTransactions,
    /// There are transactions, but none in the selected range
    NothingInRange,
    /// Summary of one month
    Month(MonthView),
}

/// The selected month within the range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    /// Every month present in the range, ascending
    pub months: Vec<MonthKey>,
    /// Totals and budget comparison of the selected month
    pub summary: MonthSummary,
    /// The month's transactions in sheet order
    pub transactions: Vec<Transaction>,
}

impl MonthView {
    /// The month's transactions, most recent first.
    #[must_use]
    pub fn newest_first(&self) -> Vec<&Transaction> {
        let mut sorted: Vec<&Transaction> = self.transactions.iter().collect();
        sorted.sort_by_key(|t| Reverse(t.date));
        sorted
    }
}

/// Runs the aggregation pipeline over `snapshot` for `query`.
///
/// # Errors
/// `Error::MonthNotInRange` when `query.month` names a month with no
/// transactions in the range.
pub fn build_dashboard(snapshot: &Snapshot, query: &DashboardQuery) -> Result<Dashboard> {
    if snapshot.transactions.is_empty() {
        return Ok(Dashboard::NoTransactions);
    }

    let in_range = filter_by_date_range(&snapshot.transactions, query.start, query.end);
    let partitions = partition_by_month(in_range);
    let Some(latest) = latest_month(&partitions) else {
        return Ok(Dashboard::NothingInRange);
    };

    let month = query.month.unwrap_or(latest);
    let Some(members) = partitions.get(&month) else {
        return Err(Error::MonthNotInRange {
            month: month.to_string(),
        });
    };

    let summary = MonthSummary::compute(month, members, &snapshot.budgets);
    Ok(Dashboard::Month(MonthView {
        months: partitions.keys().copied().collect(),
        summary,
        transactions: members.iter().map(|t| (*t).clone()).collect(),
    }))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::core::upsert::upsert_budget;
    use crate::test_utils::{seed_budgets, seed_transactions, setup_test_store};
    use rust_decimal::Decimal;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn query(start: &str, end: &str, month: Option<&str>) -> DashboardQuery {
        DashboardQuery {
            start: day(start),
            end: day(end),
            month: month.map(|m| m.parse().unwrap()),
        }
    }

    #[test]
    fn test_month_to_date_defaults() {
        let q = DashboardQuery::month_to_date(day("2025-10-17"));
        assert_eq!(q.start, day("2025-10-01"));
        assert_eq!(q.end, day("2025-10-17"));
        assert_eq!(q.month, None);
    }

    #[tokio::test]
    async fn test_empty_states_are_distinct() -> Result<()> {
        let store = setup_test_store().await?;
        let empty = load_snapshot(&store).await?;
        assert_eq!(
            build_dashboard(&empty, &query("2025-10-01", "2025-10-31", None))?,
            Dashboard::NoTransactions
        );

        seed_transactions(&store, &[("2025-09-15", "Food", "10")]).await?;
        let snapshot = load_snapshot(&store).await?;
        assert_eq!(
            build_dashboard(&snapshot, &query("2025-10-01", "2025-10-31", None))?,
            Dashboard::NothingInRange
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_defaults_to_latest_month_in_range() -> Result<()> {
        let store = setup_test_store().await?;
        seed_transactions(
            &store,
            &[
                ("2025-09-02", "Food", "25"),
                ("2025-10-01", "Food", "300"),
                ("2025-10-20", "Food", "220"),
                ("2025-10-21", "Snacks", "12.50"),
                ("2025-11-01", "Food", "5"),
            ],
        )
        .await?;
        seed_budgets(&store, &[("Food", 500), ("Rent", 1200)]).await?;
        let snapshot = load_snapshot(&store).await?;

        let Dashboard::Month(view) =
            build_dashboard(&snapshot, &query("2025-09-01", "2025-10-31", None))?
        else {
            panic!("expected a month view");
        };
        let months: Vec<String> = view.months.iter().map(ToString::to_string).collect();
        assert_eq!(months, vec!["2025-09", "2025-10"]);

        let summary = &view.summary;
        assert_eq!(summary.month.to_string(), "2025-10");
        assert_eq!(summary.total_spent, Decimal::new(53_250, 2));
        assert_eq!(summary.total_budget, Decimal::from(1700));
        assert_eq!(summary.remaining, Decimal::new(116_750, 2));
        assert_eq!(summary.per_category[0].used_pct, Decimal::ONE_HUNDRED);
        assert_eq!(summary.per_category[1].spent, Decimal::ZERO);

        let newest: Vec<NaiveDate> = view.newest_first().iter().map(|t| t.day()).collect();
        assert_eq!(
            newest,
            vec![day("2025-10-21"), day("2025-10-20"), day("2025-10-01")]
        );
        Ok(())
    }

    #[tokio::test]
    async fn test_selected_month_must_be_in_range() -> Result<()> {
        let store = setup_test_store().await?;
        seed_transactions(&store, &[("2025-10-01", "Food", "1")]).await?;
        let snapshot = load_snapshot(&store).await?;

        let err = build_dashboard(&snapshot, &query("2025-10-01", "2025-10-31", Some("2025-08")))
            .unwrap_err();
        assert!(matches!(err, Error::MonthNotInRange { .. }));
        assert!(err.is_recoverable());
        Ok(())
    }

    #[tokio::test]
    async fn test_budget_write_is_visible_in_next_cycle() -> Result<()> {
        let store = setup_test_store().await?;
        seed_transactions(&store, &[("2025-10-03", "Food", "50")]).await?;
        let q = query("2025-10-01", "2025-10-31", None);

        let before = build_dashboard(&load_snapshot(&store).await?, &q)?;
        let Dashboard::Month(before) = before else {
            panic!("expected a month view");
        };
        assert!(before.summary.per_category.is_empty());

        upsert_budget(&store, "Food", Decimal::from(100)).await?;
        let Dashboard::Month(after) = build_dashboard(&load_snapshot(&store).await?, &q)? else {
            panic!("expected a month view");
        };
        assert_eq!(after.summary.per_category.len(), 1);
        assert_eq!(after.summary.per_category[0].used_pct, Decimal::from(50));
        Ok(())
    }

    #[tokio::test]
    async fn test_bad_date_fails_the_whole_cycle() -> Result<()> {
        let store = setup_test_store().await?;
        seed_transactions(
            &store,
            &[("2025-10-03", "Food", "50"), ("not a date", "Food", "5")],
        )
        .await?;
        assert!(matches!(
            load_snapshot(&store).await,
            Err(Error::InvalidDate { .. })
        ));
        Ok(())
    }
}
