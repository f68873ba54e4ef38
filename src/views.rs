//! Read-side views over a `Document`: history filtering, grouping by month, category totals and
//! the overall summary. These never touch the disk.

use crate::model::{parse_date, Amount, Document, Expense};
use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::{Deserialize, Serialize};

/// The number of expenses shown as recent in the summary.
const RECENT_COUNT: usize = 5;
/// The number of categories shown as top spenders in the summary.
const TOP_CATEGORY_COUNT: usize = 3;
/// Month key for expenses whose date cannot be parsed.
const UNKNOWN_MONTH: &str = "unknown";

/// A time window relative to a reference day.
#[derive(
    Debug,
    Default,
    Clone,
    Copy,
    Eq,
    PartialEq,
    Hash,
    Serialize,
    Deserialize,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    /// Every expense.
    #[default]
    All,
    /// From the first day of the current month.
    ThisMonth,
    /// The whole of the previous calendar month.
    LastMonth,
    /// From the most recent Sunday.
    ThisWeek,
}

serde_plain::derive_display_from_serialize!(Period);
serde_plain::derive_fromstr_from_deserialize!(Period);

impl Period {
    /// Whether an expense dated `date` falls inside this period as seen from `today`. Undated
    /// expenses only match `Period::All`.
    pub fn contains(&self, date: Option<NaiveDate>, today: NaiveDate) -> bool {
        let date = match (self, date) {
            (Period::All, _) => return true,
            (_, None) => return false,
            (_, Some(d)) => d,
        };
        let month_start = today.with_day(1).unwrap_or(today);
        match self {
            Period::All => true,
            Period::ThisMonth => date >= month_start,
            Period::LastMonth => {
                let start = month_start - Months::new(1);
                let end = month_start - Duration::days(1);
                date >= start && date <= end
            }
            Period::ThisWeek => {
                let days = today.weekday().num_days_from_sunday();
                date >= today - Duration::days(i64::from(days))
            }
        }
    }
}

/// Selects expenses for the history list.
#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct HistoryFilter {
    pub period: Period,
    /// When non-empty, only expenses in one of these categories are kept.
    pub category_ids: Vec<String>,
    /// Case-insensitive text matched against the description and the category name.
    pub search: Option<String>,
}

impl HistoryFilter {
    /// The expenses of `document` that pass the filter, in document order (newest first).
    pub fn apply<'a>(&self, document: &'a Document, today: NaiveDate) -> Vec<&'a Expense> {
        let query = self
            .search
            .as_deref()
            .map(str::trim)
            .filter(|q| !q.is_empty())
            .map(str::to_lowercase);

        document
            .expenses
            .iter()
            .filter(|e| self.period.contains(e.naive_date(), today))
            .filter(|e| self.category_ids.is_empty() || self.category_ids.contains(&e.category_id))
            .filter(|e| match &query {
                None => true,
                Some(q) => {
                    e.description.to_lowercase().contains(q)
                        || document
                            .category(&e.category_id)
                            .is_some_and(|c| c.name.to_lowercase().contains(q))
                }
            })
            .collect()
    }
}

/// Expenses that share a calendar month.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthGroup {
    /// `YYYY-MM`, or `unknown` for undated expenses.
    pub key: String,
    /// e.g. `January 2024`.
    pub label: String,
    pub expenses: Vec<Expense>,
    pub total: Amount,
}

/// Groups expenses by month, newest month first. Undated expenses come last.
pub fn group_by_month<'a>(expenses: impl IntoIterator<Item = &'a Expense>) -> Vec<MonthGroup> {
    let mut groups: Vec<MonthGroup> = Vec::new();
    for expense in expenses {
        let date = parse_date(&expense.date);
        let key = date
            .map(|d| d.format("%Y-%m").to_string())
            .unwrap_or_else(|| UNKNOWN_MONTH.to_string());
        let group = match groups.iter().position(|g| g.key == key) {
            Some(ix) => &mut groups[ix],
            None => {
                let label = date
                    .map(|d| d.format("%B %Y").to_string())
                    .unwrap_or_else(|| "Unknown date".to_string());
                groups.push(MonthGroup {
                    key,
                    label,
                    expenses: Vec::new(),
                    total: Amount::ZERO,
                });
                let last = groups.len() - 1;
                &mut groups[last]
            }
        };
        group.total = group.total + expense.amount;
        group.expenses.push(expense.clone());
    }

    groups.sort_by(|a, b| match (a.key == UNKNOWN_MONTH, b.key == UNKNOWN_MONTH) {
        (true, false) => std::cmp::Ordering::Greater,
        (false, true) => std::cmp::Ordering::Less,
        _ => b.key.cmp(&a.key),
    });
    groups
}

/// The amount spent in one category.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct CategoryTotal {
    pub category_id: String,
    pub name: String,
    pub icon: String,
    pub count: usize,
    pub total: Amount,
}

/// Spending per category, in the document's category order. Categories without expenses are
/// left out. Expenses with a dangling `categoryId` count toward the fallback "Others"
/// category; if there is no fallback they are not counted at all.
pub fn category_totals(document: &Document) -> Vec<CategoryTotal> {
    let mut totals: Vec<CategoryTotal> = document
        .categories
        .iter()
        .map(|c| CategoryTotal {
            category_id: c.id.clone(),
            name: c.name.clone(),
            icon: c.icon.clone(),
            count: 0,
            total: Amount::ZERO,
        })
        .collect();

    for expense in &document.expenses {
        let Some(category) = document.category_for(expense) else {
            continue;
        };
        if let Some(t) = totals.iter_mut().find(|t| t.category_id == category.id) {
            t.count += 1;
            t.total = t.total + expense.amount;
        }
    }

    totals.retain(|t| t.count > 0);
    totals
}

/// An overview of a document: overall total, the latest expenses and the biggest categories.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Summary {
    pub currency: String,
    pub count: usize,
    pub total: Amount,
    /// The most recently added expenses.
    pub recent: Vec<Expense>,
    /// The categories with the largest totals, largest first.
    pub top_categories: Vec<CategoryTotal>,
}

pub fn summary(document: &Document) -> Summary {
    let mut top_categories = category_totals(document);
    // Stable, so ties keep category order
    top_categories.sort_by(|a, b| b.total.cmp(&a.total));
    top_categories.truncate(TOP_CATEGORY_COUNT);

    Summary {
        currency: document.settings.currency.clone(),
        count: document.expenses.len(),
        total: document.expenses.iter().map(|e| &e.amount).sum(),
        recent: document.expenses.iter().take(RECENT_COUNT).cloned().collect(),
        top_categories,
    }
}
