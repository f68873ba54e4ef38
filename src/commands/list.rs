use crate::args::ListExpensesArgs;
use crate::commands::{resolve_category, Out};
use crate::model::{Category, Document, Expense, PaymentMethod};
use crate::views::{group_by_month, HistoryFilter, MonthGroup};
use crate::{Config, Result};
use chrono::NaiveDate;
use std::fmt::Write;

/// Lists expenses grouped by month, newest first, after applying the period, category and
/// search filters.
pub async fn list_expenses(
    config: &Config,
    args: &ListExpensesArgs,
    today: NaiveDate,
) -> Result<Out<Vec<MonthGroup>>> {
    let document = config.store().load().await.document;
    let filter = HistoryFilter {
        period: args.period,
        category_ids: args
            .category
            .iter()
            .map(|c| resolve_category(&document, c))
            .collect(),
        search: args.search.clone(),
    };

    let expenses = filter.apply(&document, today);
    if expenses.is_empty() {
        return Ok(Out::new("No expenses found", Vec::new()));
    }
    let count = expenses.len();
    let groups = group_by_month(expenses);

    let currency = &document.settings.currency;
    let mut message = format!("{count} expenses");
    for group in &groups {
        let _ = write!(
            message,
            "\n\n{} ({})",
            group.label,
            group.total.display_with(currency)
        );
        for expense in &group.expenses {
            let _ = write!(message, "\n  {}", expense_line(&document, expense));
        }
    }
    Ok(Out::new(message, groups))
}

/// Lists the payment methods in the order they were added.
pub async fn list_payment_methods(config: &Config) -> Result<Out<Vec<PaymentMethod>>> {
    let payment_methods = config.store().payment_methods().await;
    let mut message = format!("{} payment methods", payment_methods.len());
    for pm in &payment_methods {
        let _ = write!(
            message,
            "\n  {} {} [{}] ({})",
            pm.icon, pm.name, pm.r#type, pm.id
        );
    }
    Ok(Out::new(message, payment_methods))
}

/// Lists the categories in document order.
pub async fn list_categories(config: &Config) -> Result<Out<Vec<Category>>> {
    let categories = config.store().load().await.document.categories;
    let mut message = format!("{} categories", categories.len());
    for c in &categories {
        let _ = write!(message, "\n  {:>3} {} {}", c.id, c.icon, c.name);
    }
    Ok(Out::new(message, categories))
}

fn expense_line(document: &Document, expense: &Expense) -> String {
    let date = expense
        .naive_date()
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| expense.date.clone());
    let category = document
        .category_for(expense)
        .map(|c| format!("{} {}", c.icon, c.name))
        .unwrap_or_else(|| expense.category_id.clone());
    let payment_method = document
        .payment_method_for(expense)
        .map(|p| p.name.as_str())
        .or(expense.payment_method_key())
        .unwrap_or("-");
    let mut line = format!(
        "{date}  {}  {category}  {}  [{payment_method}]",
        expense.amount.display_with(&document.settings.currency),
        expense.description,
    );
    if let Some(location) = expense.location.as_deref().filter(|l| !l.is_empty()) {
        let _ = write!(line, " @ {location}");
    }
    line
}
