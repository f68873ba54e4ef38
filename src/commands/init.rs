use crate::commands::Out;
use crate::store::LoadOutcome;
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the data directory and:
/// - Creates an initial `config.json` file with default settings
/// - Writes the first-run data document with the default categories and payment method
///
/// # Arguments
/// - `expense_home` - The directory that will be the root of data directory, e.g.
///   `$HOME/expenses`
/// - `backups_dir` - Where exported backups go, see `Config::create`.
///
/// # Errors
/// - Returns an error if the directory is already initialized or any file operation fails.
pub async fn init(expense_home: &Path, backups_dir: Option<&Path>) -> Result<Out<()>> {
    let config = Config::create(expense_home, backups_dir.map(Path::to_path_buf))
        .await
        .context("Unable to create the data directory and configs")?;

    let loaded = config
        .store()
        .load_strict()
        .await
        .context("Unable to create the data document")?;

    let message = match loaded.outcome {
        LoadOutcome::Created => format!(
            "Created {} with {} categories",
            config.data_path().display(),
            loaded.document.categories.len()
        ),
        _ => format!(
            "Using the existing data document at {}",
            config.data_path().display()
        ),
    };
    Ok(message.into())
}
