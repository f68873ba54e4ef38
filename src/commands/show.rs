use crate::args::CurrencyArgs;
use crate::commands::Out;
use crate::store::LoadOutcome;
use crate::views::{summary, Summary};
use crate::{Config, Result};
use anyhow::{bail, Context};
use serde::Serialize;
use std::fmt::Write;
use std::path::PathBuf;
use tracing::warn;

/// What `expense show` reports about the data document.
#[derive(Debug, Clone, Serialize)]
pub struct ShowOutput {
    pub path: PathBuf,
    /// One of `existing`, `created`, `migrated` or `recovered`.
    pub outcome: String,
    pub last_updated: String,
    pub payment_methods: usize,
    pub categories: usize,
    /// Expenses whose category no longer exists.
    pub dangling: usize,
    pub latest_backup: Option<PathBuf>,
    pub summary: Summary,
}

/// Loads the document and reports how it went along with a short summary.
pub async fn show(config: &Config) -> Result<Out<ShowOutput>> {
    let store = config.store();
    let loaded = store.load().await;
    let outcome = match &loaded.outcome {
        LoadOutcome::Existing => "existing",
        LoadOutcome::Created => "created",
        LoadOutcome::Migrated => "migrated",
        LoadOutcome::Recovered(e) => {
            warn!(
                "The data document could not be read, showing defaults instead. The file has \
                not been changed. Import a backup or fix the file by hand: {e}"
            );
            "recovered"
        }
    };

    let document = &loaded.document;
    let latest_backup = match store.backup().latest().await {
        Ok(latest) => latest,
        Err(e) => {
            warn!("Unable to list backups: {e}");
            None
        }
    };
    let output = ShowOutput {
        path: store.path().to_path_buf(),
        outcome: outcome.to_string(),
        last_updated: document.last_updated.clone(),
        payment_methods: document.payment_methods.len(),
        categories: document.categories.len(),
        dangling: document.dangling_expenses().count(),
        latest_backup,
        summary: summary(document),
    };

    let currency = &output.summary.currency;
    let mut message = format!(
        "{} ({}), last updated {}\n{} expenses totalling {}, {} categories, {} payment methods",
        output.path.display(),
        output.outcome,
        output.last_updated,
        output.summary.count,
        output.summary.total.display_with(currency),
        output.categories,
        output.payment_methods,
    );
    if output.dangling > 0 {
        let _ = write!(
            message,
            "\n{} expenses refer to a missing category and are shown under Others",
            output.dangling
        );
    }
    if !output.summary.top_categories.is_empty() {
        message.push_str("\nTop categories:");
        for c in &output.summary.top_categories {
            let _ = write!(
                message,
                "\n  {} {} {}",
                c.icon,
                c.name,
                c.total.display_with(currency)
            );
        }
    }
    if let Some(latest) = &output.latest_backup {
        let _ = write!(message, "\nLatest backup: {}", latest.display());
    }
    Ok(Out::new(message, output))
}

/// Changes the currency symbol shown next to amounts.
pub async fn currency(config: &Config, args: &CurrencyArgs) -> Result<Out<()>> {
    let symbol = args.symbol().trim();
    if symbol.is_empty() {
        bail!("The currency symbol cannot be empty");
    }
    let document = config
        .store()
        .set_currency(symbol)
        .await
        .context("Unable to change the currency")?;
    Ok(format!("Currency set to {}", document.settings.currency).into())
}
