use crate::args::ReportArgs;
use crate::commands::Out;
use crate::model::{Amount, Document};
use crate::views::{
    category_totals, group_by_month, summary, CategoryTotal, HistoryFilter, Period, Summary,
};
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Write;

/// Spending totals over one period.
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub period: Period,
    pub summary: Summary,
    pub categories: Vec<CategoryTotal>,
    /// `(label, total)` for each month, newest first.
    pub months: Vec<(String, Amount)>,
}

/// Totals spending per category and per month for the requested period.
pub async fn report(config: &Config, args: &ReportArgs, today: NaiveDate) -> Result<Out<Report>> {
    let loaded = config.store().load().await;
    let mut document = loaded.document;

    let filter = HistoryFilter {
        period: args.period,
        ..HistoryFilter::default()
    };
    document.expenses = filter.apply(&document, today).into_iter().cloned().collect();

    let report = build(&document, args.period);
    let message = render(&report);
    Ok(Out::new(message, report))
}

fn build(document: &Document, period: Period) -> Report {
    let months = group_by_month(&document.expenses)
        .into_iter()
        .map(|g| (g.label, g.total))
        .collect();
    Report {
        period,
        summary: summary(document),
        categories: category_totals(document),
        months,
    }
}

fn render(report: &Report) -> String {
    let currency = &report.summary.currency;
    let mut message = format!(
        "{} expenses totalling {} ({})",
        report.summary.count,
        report.summary.total.display_with(currency),
        report.period
    );
    if report.summary.count == 0 {
        return message;
    }

    message.push_str("\n\nBy category:");
    for c in &report.categories {
        let _ = write!(
            message,
            "\n  {} {:<16} {:>4}  {}",
            c.icon,
            c.name,
            c.count,
            c.total.display_with(currency)
        );
    }

    message.push_str("\n\nBy month:");
    for (label, total) in &report.months {
        let _ = write!(message, "\n  {label:<16} {}", total.display_with(currency));
    }
    message
}
