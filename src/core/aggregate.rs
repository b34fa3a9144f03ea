//! Aggregation over normalized transactions, budgets and goals.
//!
//! Percentages are clamped to `[0, 100]` for display. The clamp is lossy on
//! purpose: a category at 104% of budget reports 100 while `spent` and `budget`
//! keep their true values.

use super::models::{BudgetEntry, GoalEntry, MonthKey, Transaction};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

/// Transactions whose calendar date lies in `start..=end`; time of day is ignored.
#[must_use]
pub fn filter_by_date_range(
    transactions: &[Transaction],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<&Transaction> {
    transactions
        .iter()
        .filter(|t| (start..=end).contains(&t.day()))
        .collect()
}

/// Groups transactions by month, keys ascending. Input order is kept inside a month.
#[must_use]
pub fn partition_by_month<'a, I>(transactions: I) -> BTreeMap<MonthKey, Vec<&'a Transaction>>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut months: BTreeMap<MonthKey, Vec<&Transaction>> = BTreeMap::new();
    for t in transactions {
        months.entry(t.month()).or_default().push(t);
    }
    months
}

/// The most recent month present, the default selection of the dashboard.
#[must_use]
pub fn latest_month<V>(partitions: &BTreeMap<MonthKey, V>) -> Option<MonthKey> {
    partitions.keys().next_back().copied()
}

/// Spend in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    /// Category label as recorded on the transactions
    pub category: String,
    /// Sum of amounts
    pub total: Decimal,
}

/// Sums amounts per category, largest total first (ties by name).
#[must_use]
pub fn sum_by_category<'a, I>(transactions: I) -> Vec<CategoryTotal>
where
    I: IntoIterator<Item = &'a Transaction>,
{
    let mut sums: HashMap<&str, Decimal> = HashMap::new();
    for t in transactions {
        *sums.entry(t.category.as_str()).or_insert(Decimal::ZERO) += t.amount;
    }
    let mut totals: Vec<CategoryTotal> = sums
        .into_iter()
        .map(|(category, total)| CategoryTotal {
            category: category.to_string(),
            total,
        })
        .collect();
    totals.sort_by(|a, b| {
        b.total
            .cmp(&a.total)
            .then_with(|| a.category.cmp(&b.category))
    });
    totals
}

/// One row of the budget-vs-actual table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BudgetLine {
    /// Budget category
    pub category: String,
    /// Actual spend in the period
    pub spent: Decimal,
    /// Monthly budget
    pub budget: Decimal,
    /// `spent / budget` as a percentage clamped to `[0, 100]`; 0 without a budget
    pub used_pct: Decimal,
}

/// `numerator / denominator * 100`, clamped to `[0, 100]`; 0 when the denominator is not positive.
fn clamped_pct(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator <= Decimal::ZERO {
        return Decimal::ZERO;
    }
    numerator
        .checked_mul(Decimal::ONE_HUNDRED)
        .and_then(|scaled| scaled.checked_div(denominator))
        // Overflow only happens for ratios far beyond 100%
        .map_or(Decimal::ONE_HUNDRED, |pct| {
            pct.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED)
        })
}

/// Budget utilisation percentage for display.
#[must_use]
pub fn used_pct(spent: Decimal, budget: Decimal) -> Decimal {
    if budget.is_zero() {
        return Decimal::ZERO;
    }
    clamped_pct(spent, budget)
}

/// Joins category sums onto the budgets table.
///
/// Every budget row yields a line, in budget order, even with no spend.
/// Categories with spend but no budget row are left out; they remain visible
/// in `sum_by_category`.
#[must_use]
pub fn budget_comparison(sums: &[CategoryTotal], budgets: &[BudgetEntry]) -> Vec<BudgetLine> {
    let spent_by_category: HashMap<&str, Decimal> = sums
        .iter()
        .map(|s| (s.category.as_str(), s.total))
        .collect();
    budgets
        .iter()
        .map(|b| {
            let spent = spent_by_category
                .get(b.category.as_str())
                .copied()
                .unwrap_or(Decimal::ZERO);
            BudgetLine {
                category: b.category.clone(),
                spent,
                budget: b.monthly_budget,
                used_pct: used_pct(spent, b.monthly_budget),
            }
        })
        .collect()
}

/// Goal completion percentage, clamped to `[0, 100]`; 0 for a non-positive target.
#[must_use]
pub fn goal_progress(goal: &GoalEntry) -> Decimal {
    clamped_pct(goal.current_saved, goal.target_amount)
}

/// Derived figures for one month. Recomputed on every view, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MonthSummary {
    /// Month summarised
    pub month: MonthKey,
    /// Sum of the month's transaction amounts
    pub total_spent: Decimal,
    /// Sum of every monthly budget
    pub total_budget: Decimal,
    /// `total_budget - total_spent`, negative when over
    pub remaining: Decimal,
    /// Spend per category, largest first, budgeted or not
    pub by_category: Vec<CategoryTotal>,
    /// Budget-vs-actual, one line per budget row
    pub per_category: Vec<BudgetLine>,
}

impl MonthSummary {
    /// Summarises `transactions` (already restricted to `month`) against `budgets`.
    #[must_use]
    pub fn compute(month: MonthKey, transactions: &[&Transaction], budgets: &[BudgetEntry]) -> Self {
        let total_spent: Decimal = transactions.iter().map(|t| t.amount).sum();
        let total_budget: Decimal = budgets.iter().map(|b| b.monthly_budget).sum();
        let by_category = sum_by_category(transactions.iter().copied());
        let per_category = budget_comparison(&by_category, budgets);
        Self {
            month,
            total_spent,
            total_budget,
            remaining: total_budget - total_spent,
            by_category,
            per_category,
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use chrono::NaiveDateTime;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M:%S").unwrap()
    }

    fn txn(date: &str, category: &str, amount: i64) -> Transaction {
        txn_at(date, "00:00:00", category, amount)
    }

    fn txn_at(date: &str, time: &str, category: &str, amount: i64) -> Transaction {
        Transaction {
            date: at(date, time),
            category: category.to_string(),
            description: String::new(),
            amount: Decimal::from(amount),
            payment_method: "Visa".to_string(),
            notes: String::new(),
            payer: "You".to_string(),
        }
    }

    fn budget(category: &str, amount: i64) -> BudgetEntry {
        BudgetEntry {
            category: category.to_string(),
            monthly_budget: Decimal::from(amount),
        }
    }

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn test_filter_single_day_ignores_time_of_day() {
        let txns = vec![
            txn_at("2025-10-06", "23:59:59", "Food", 1),
            txn_at("2025-10-07", "00:00:00", "Food", 2),
            txn_at("2025-10-07", "23:59:59", "Food", 3),
            txn_at("2025-10-08", "00:00:00", "Food", 4),
        ];
        let d = day("2025-10-07");
        let picked = filter_by_date_range(&txns, d, d);
        let amounts: Vec<Decimal> = picked.iter().map(|t| t.amount).collect();
        assert_eq!(amounts, vec![Decimal::from(2), Decimal::from(3)]);
    }

    #[test]
    fn test_filter_inclusive_bounds_and_inverted_range() {
        let txns = vec![
            txn("2025-09-30", "Food", 1),
            txn("2025-10-01", "Food", 2),
            txn("2025-10-31", "Food", 3),
            txn("2025-11-01", "Food", 4),
        ];
        assert_eq!(
            filter_by_date_range(&txns, day("2025-10-01"), day("2025-10-31")).len(),
            2
        );
        assert!(filter_by_date_range(&txns, day("2025-10-31"), day("2025-10-01")).is_empty());
    }

    #[test]
    fn test_partition_covers_every_transaction_once() {
        let txns = vec![
            txn("2025-03-05", "Food", 1),
            txn("2024-12-31", "Food", 2),
            txn("2025-03-01", "Rent", 3),
            txn("2025-01-15", "Fun", 4),
        ];
        let months = partition_by_month(&txns);
        let keys: Vec<String> = months.keys().map(ToString::to_string).collect();
        assert_eq!(keys, vec!["2024-12", "2025-01", "2025-03"]);

        let mut sorted_keys = keys.clone();
        sorted_keys.sort();
        assert_eq!(keys, sorted_keys);

        let count: usize = months.values().map(Vec::len).sum();
        assert_eq!(count, txns.len());
        for (month, members) in &months {
            assert!(members.iter().all(|t| t.month() == *month));
        }
        assert_eq!(months[&MonthKey::new(2025, 3).unwrap()].len(), 2);
        assert_eq!(latest_month(&months), MonthKey::new(2025, 3));
    }

    #[test]
    fn test_latest_month_of_nothing() {
        let empty: Vec<Transaction> = Vec::new();
        let months = partition_by_month(&empty);
        assert_eq!(latest_month(&months), None);
    }

    #[test]
    fn test_sum_by_category_sorted_descending() {
        let txns = vec![
            txn("2025-10-01", "Food", 20),
            txn("2025-10-02", "Rent", 1000),
            txn("2025-10-03", "Food", 30),
            txn("2025-10-04", "Fun", 50),
        ];
        let sums = sum_by_category(&txns);
        let pairs: Vec<(&str, Decimal)> = sums
            .iter()
            .map(|s| (s.category.as_str(), s.total))
            .collect();
        assert_eq!(
            pairs,
            vec![
                ("Rent", Decimal::from(1000)),
                ("Food", Decimal::from(50)),
                ("Fun", Decimal::from(50)),
            ]
        );
    }

    #[test]
    fn test_overspend_is_clamped_to_100() {
        let txns = vec![
            txn("2025-10-01", "Food", 300),
            txn("2025-10-15", "Food", 220),
        ];
        let lines = budget_comparison(&sum_by_category(&txns), &[budget("Food", 500)]);
        assert_eq!(
            lines,
            vec![BudgetLine {
                category: "Food".to_string(),
                spent: Decimal::from(520),
                budget: Decimal::from(500),
                used_pct: Decimal::ONE_HUNDRED,
            }]
        );
    }

    #[test]
    fn test_unbudgeted_category_left_out_of_comparison() {
        let txns = vec![txn("2025-10-01", "Snacks", 12), txn("2025-10-01", "Food", 50)];
        let sums = sum_by_category(&txns);
        assert!(sums.iter().any(|s| s.category == "Snacks"));

        let lines = budget_comparison(&sums, &[budget("Food", 100), budget("Rent", 900)]);
        let categories: Vec<&str> = lines.iter().map(|l| l.category.as_str()).collect();
        assert_eq!(categories, vec!["Food", "Rent"]);
        assert_eq!(lines[0].used_pct, Decimal::from(50));
        assert_eq!(lines[1].spent, Decimal::ZERO);
        assert_eq!(lines[1].used_pct, Decimal::ZERO);
    }

    #[test]
    fn test_used_pct_always_within_bounds() {
        let cases = [
            (0, 0),
            (50, 0),
            (0, 100),
            (50, 100),
            (100, 100),
            (5_000_000, 1),
            (1, 5_000_000),
            (10, -100),
        ];
        for (spent, budget) in cases {
            let pct = used_pct(Decimal::from(spent), Decimal::from(budget));
            assert!(
                pct >= Decimal::ZERO && pct <= Decimal::ONE_HUNDRED,
                "{spent}/{budget} gave {pct}"
            );
        }
        assert_eq!(used_pct(Decimal::from(50), Decimal::ZERO), Decimal::ZERO);
        assert_eq!(used_pct(Decimal::MAX, Decimal::new(1, 2)), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_goal_progress() {
        let goal = |target: i64, saved: i64| GoalEntry {
            goal_name: "Trip".to_string(),
            target_amount: Decimal::from(target),
            current_saved: Decimal::from(saved),
        };
        assert_eq!(goal_progress(&goal(0, 500)), Decimal::ZERO);
        assert_eq!(goal_progress(&goal(-10, 5)), Decimal::ZERO);
        assert_eq!(goal_progress(&goal(2000, 500)), Decimal::from(25));
        assert_eq!(goal_progress(&goal(100, 250)), Decimal::ONE_HUNDRED);
    }

    #[test]
    fn test_month_summary_totals() {
        let txns = vec![
            txn("2025-10-01", "Food", 520),
            txn("2025-10-02", "Snacks", 30),
        ];
        let refs: Vec<&Transaction> = txns.iter().collect();
        let summary = MonthSummary::compute(
            MonthKey::new(2025, 10).unwrap(),
            &refs,
            &[budget("Food", 500), budget("Rent", 1000)],
        );
        assert_eq!(summary.total_spent, Decimal::from(550));
        assert_eq!(summary.total_budget, Decimal::from(1500));
        assert_eq!(summary.remaining, Decimal::from(950));
        assert_eq!(summary.by_category.len(), 2);
        assert_eq!(summary.per_category.len(), 2);
        assert_eq!(summary.per_category[0].used_pct, Decimal::ONE_HUNDRED);
    }
}
