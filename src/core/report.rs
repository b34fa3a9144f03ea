//! Text rendering helpers shared by the dashboard, budget and goal replies.
//!
//! All functions are framework-agnostic and return plain strings; the bot
//! layer decides where they go.

use super::{aggregate::BudgetLine, input::round_money};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use std::fmt;

/// Usage band of a budget line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BudgetStatus {
    /// Budget is zero
    NoBudget,
    /// Used 100% or more
    Over,
    /// Used 90% or more
    Near,
    /// Under 90%
    Ok,
}

impl BudgetStatus {
    /// Classifies a comparison line.
    #[must_use]
    pub fn of(line: &BudgetLine) -> Self {
        if line.budget.is_zero() {
            Self::NoBudget
        } else if line.used_pct >= Decimal::ONE_HUNDRED {
            Self::Over
        } else if line.used_pct >= Decimal::from(90) {
            Self::Near
        } else {
            Self::Ok
        }
    }

    /// Short label shown next to the line.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::NoBudget => "No budget",
            Self::Over => "Over",
            Self::Near => "Near",
            Self::Ok => "OK",
        }
    }

    /// Emoji marker for the status.
    #[must_use]
    pub const fn marker(self) -> &'static str {
        match self {
            Self::NoBudget => "⚪",
            Self::Over => "🔴",
            Self::Near => "🟠",
            Self::Ok => "🟢",
        }
    }
}

impl fmt::Display for BudgetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Comparison lines ordered by usage, highest first. Ties keep budget order.
#[must_use]
pub fn sorted_by_usage(lines: &[BudgetLine]) -> Vec<&BudgetLine> {
    let mut sorted: Vec<&BudgetLine> = lines.iter().collect();
    sorted.sort_by(|a, b| b.used_pct.cmp(&a.used_pct));
    sorted
}

/// Generates a progress bar string for visual representation.
///
/// Creates a text-based progress bar like: `[████████░░] 80.0%`. The
/// percentage is expected in `[0, 100]`; anything outside is clamped for the
/// bar and printed as given.
#[must_use]
pub fn format_progress_bar(progress_percent: Decimal, bar_length: Option<usize>) -> String {
    let length = bar_length.unwrap_or(10);
    let clamped = progress_percent.clamp(Decimal::ZERO, Decimal::ONE_HUNDRED);
    let filled = (clamped * Decimal::from(length) / Decimal::ONE_HUNDRED)
        .round()
        .to_usize()
        .unwrap_or(0)
        .min(length);
    let empty = length - filled;

    format!(
        "[{}{}] {:.1}%",
        "█".repeat(filled),
        "░".repeat(empty),
        progress_percent
    )
}

/// Formats money as `$1,234.56`; negative amounts as `-$1,234.56`.
#[must_use]
pub fn format_money(amount: Decimal) -> String {
    let rounded = round_money(amount.abs());
    let text = format!("{rounded:.2}");
    let (whole, cents) = text.split_once('.').unwrap_or((text.as_str(), "00"));

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    let sign = if amount.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}${grouped}.{cents}")
}

/// One budget comparison line, e.g. `🟠 Food: $460.00 / $500.00 (92.0%) Near`.
#[must_use]
pub fn format_budget_line(line: &BudgetLine) -> String {
    let status = BudgetStatus::of(line);
    format!(
        "{} {}: {} / {} ({:.1}%) {}",
        status.marker(),
        line.category,
        format_money(line.spent),
        format_money(line.budget),
        line.used_pct,
        status
    )
}

/// Note for items left out of a capped list; `None` when nothing was hidden.
#[must_use]
pub fn more_line(hidden: usize) -> Option<String> {
    (hidden > 0).then(|| format!("…and {hidden} more"))
}
