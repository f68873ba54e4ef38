use crate::args::ImportArgs;
use crate::commands::Out;
use crate::{Config, Result};
use anyhow::{anyhow, Context};
use std::path::PathBuf;

/// Writes a pretty-printed copy of the data document to the backups directory.
pub async fn export(config: &Config) -> Result<Out<PathBuf>> {
    let path = config
        .store()
        .export_backup()
        .await
        .context("Unable to export a backup")?;
    Ok(Out::new(
        format!("Exported a backup to {}", path.display()),
        path,
    ))
}

/// Replaces the data document with a backup. Without a path, the newest backup in the backups
/// directory is used.
pub async fn import(config: &Config, args: &ImportArgs) -> Result<Out<PathBuf>> {
    let store = config.store();
    let path = match args.path() {
        Some(p) => p.to_path_buf(),
        None => store.backup().latest().await?.ok_or_else(|| {
            anyhow!(
                "There are no backups in {}, give the path of the file to import",
                store.backup().dir().display()
            )
        })?,
    };

    let document = store
        .import_backup(&path)
        .await
        .with_context(|| format!("Unable to import {}", path.display()))?;

    let message = format!(
        "Imported {} with {} expenses, {} categories and {} payment methods",
        path.display(),
        document.expenses.len(),
        document.categories.len(),
        document.payment_methods.len()
    );
    Ok(Out::new(message, path))
}
