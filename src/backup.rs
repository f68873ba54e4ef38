//! Backup file management for exporting the document.

use crate::error::StoreError;
use crate::model::Document;
use crate::Config;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Prefix for exported backup files.
pub const BACKUP_PREFIX: &str = "expense_backup_";

/// Extension for exported backup files.
const BACKUP_EXTENSION: &str = ".json";

/// Manages backup file creation and rotation.
///
/// The `Backup` struct is immutable and owns copies of the paths and settings it needs.
/// Create a new instance via `Config::backup()` or `Backup::new()`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Backup {
    backups_dir: PathBuf,
    /// How many backup files to keep. Zero keeps all of them.
    backup_copies: u32,
}

impl Backup {
    /// Creates a new `Backup` instance from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self::with_dir(config.backups(), config.backup_copies())
    }

    pub fn with_dir(backups_dir: impl Into<PathBuf>, backup_copies: u32) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            backup_copies,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Saves the document as a pretty-printed JSON backup file.
    ///
    /// The filename format is `expense_backup_{epoch_millis}.json`. Automatically rotates old
    /// backups, keeping only `backup_copies` files. Problems while rotating are logged and do
    /// not turn a successful save into an error.
    ///
    /// Returns the path to the created backup file.
    pub async fn save_json(&self, epoch_millis: i64, data: &Document) -> Result<PathBuf, StoreError> {
        let path = self
            .backups_dir
            .join(format!("{BACKUP_PREFIX}{epoch_millis}{BACKUP_EXTENSION}"));

        let json = serde_json::to_string_pretty(data).map_err(|source| StoreError::Serialize {
            path: path.clone(),
            source,
        })?;
        tokio::fs::create_dir_all(&self.backups_dir)
            .await
            .map_err(|source| StoreError::Write {
                path: self.backups_dir.clone(),
                source,
            })?;
        tokio::fs::write(&path, json)
            .await
            .map_err(|source| StoreError::Write {
                path: path.clone(),
                source,
            })?;

        // The backup is already on disk, so failing to prune old ones does not fail the export
        if let Err(e) = self.rotate().await {
            warn!("Unable to remove old backups: {e}");
        }

        Ok(path)
    }

    /// Lists the backup files in the backups directory, newest first.
    pub async fn list(&self) -> Result<Vec<PathBuf>, StoreError> {
        let mut files = self.scan().await?;
        files.reverse();
        Ok(files.into_iter().map(|(path, _)| path).collect())
    }

    /// The most recent backup file, if there is one.
    pub async fn latest(&self) -> Result<Option<PathBuf>, StoreError> {
        Ok(self.list().await?.into_iter().next())
    }

    /// Rotates old backup files, keeping only `backup_copies` files. A file that cannot be
    /// removed is logged and skipped.
    async fn rotate(&self) -> Result<(), StoreError> {
        if self.backup_copies == 0 {
            return Ok(());
        }
        let files = self.scan().await?;

        // Delete oldest files if we have more than backup_copies
        let to_delete = files.len().saturating_sub(self.backup_copies as usize);
        for (path, _) in files.into_iter().take(to_delete) {
            debug!("Removing old backup {}", path.display());
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Unable to remove old backup {}: {e}", path.display());
            }
        }

        Ok(())
    }

    /// Collects the backup files and their timestamps, oldest first. A missing directory has no
    /// backups in it.
    async fn scan(&self) -> Result<Vec<(PathBuf, i64)>, StoreError> {
        let read_err = |source: std::io::Error| StoreError::Read {
            path: self.backups_dir.clone(),
            source,
        };
        let mut dir = match tokio::fs::read_dir(&self.backups_dir).await {
            Ok(dir) => dir,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(read_err(e)),
        };

        let mut files = Vec::new();
        while let Some(entry) = dir.next_entry().await.map_err(read_err)? {
            let file_name = entry.file_name();
            let name = file_name.to_string_lossy();
            if let Some(millis) = parse_backup_millis(&name) {
                files.push((entry.path(), millis));
            }
        }

        // Sort by the timestamp in the name, not the name itself, since the digit count can vary
        files.sort_by_key(|(_, millis)| *millis);
        Ok(files)
    }
}

/// Parses the timestamp from a backup filename.
/// Returns None if the filename doesn't match the expected pattern.
fn parse_backup_millis(filename: &str) -> Option<i64> {
    let digits = filename
        .strip_prefix(BACKUP_PREFIX)?
        .strip_suffix(BACKUP_EXTENSION)?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_backup_millis() {
        assert_eq!(
            parse_backup_millis("expense_backup_1705314600123.json"),
            Some(1705314600123)
        );
        assert_eq!(parse_backup_millis("expense_backup_7.json"), Some(7));
        // Wrong prefix
        assert_eq!(parse_backup_millis("backup_1705314600123.json"), None);
        // Wrong extension
        assert_eq!(parse_backup_millis("expense_backup_1705314600123.txt"), None);
        // Not a number
        assert_eq!(parse_backup_millis("expense_backup_latest.json"), None);
        assert_eq!(parse_backup_millis("expense_backup_-5.json"), None);
        assert_eq!(parse_backup_millis("expense_backup_.json"), None);
    }

    #[tokio::test]
    async fn test_save_json_is_pretty() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_dir(dir.path().join("backups"), 0);
        let doc = Document::new_default("2024-01-15T00:00:00.000Z");

        let path = backup.save_json(1705314600123, &doc).await.unwrap();

        assert_eq!(
            path.file_name().unwrap().to_string_lossy(),
            "expense_backup_1705314600123.json"
        );
        let text = tokio::fs::read_to_string(&path).await.unwrap();
        assert!(text.contains("\n  \"version\": \"1.0\""));
        let back: Document = serde_json::from_str(&text).unwrap();
        assert_eq!(back, doc);
    }

    #[tokio::test]
    async fn test_rotation_keeps_newest() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_dir(dir.path(), 2);
        let doc = Document::new_default("");
        // Fewer digits must still sort as older
        for millis in [9, 10, 11] {
            backup.save_json(millis, &doc).await.unwrap();
        }
        // An unrelated file is left alone
        tokio::fs::write(dir.path().join("notes.json"), "{}")
            .await
            .unwrap();

        let files = backup.list().await.unwrap();
        let names: Vec<String> = files
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["expense_backup_11.json", "expense_backup_10.json"]);
        assert!(dir.path().join("notes.json").is_file());
        assert_eq!(
            backup.latest().await.unwrap(),
            Some(dir.path().join("expense_backup_11.json"))
        );
    }

    #[tokio::test]
    async fn test_rotation_failure_keeps_new_backup() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_dir(dir.path(), 1);
        let doc = Document::new_default("");
        // A directory with a backup name cannot be removed as a file
        let stuck = dir.path().join("expense_backup_1.json");
        tokio::fs::create_dir(&stuck).await.unwrap();
        backup.save_json(2, &doc).await.unwrap();

        let path = backup.save_json(3, &doc).await.unwrap();

        assert_eq!(path, dir.path().join("expense_backup_3.json"));
        assert!(path.is_file());
        assert!(stuck.is_dir());
        // The other old backup was still pruned
        assert!(!dir.path().join("expense_backup_2.json").exists());
    }

    #[tokio::test]
    async fn test_zero_copies_keeps_all() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_dir(dir.path(), 0);
        let doc = Document::new_default("");
        for millis in 1..=4 {
            backup.save_json(millis, &doc).await.unwrap();
        }
        assert_eq!(backup.list().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_list_missing_dir() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::with_dir(dir.path().join("nope"), 3);
        assert!(backup.list().await.unwrap().is_empty());
        assert_eq!(backup.latest().await.unwrap(), None);
    }
}
