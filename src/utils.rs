use crate::Result;
use anyhow::Context;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::de::DeserializeOwned;
use std::path::{Path, PathBuf};

/// Write a file.
pub(crate) async fn write(path: impl AsRef<Path>, contents: impl AsRef<[u8]>) -> Result<()> {
    let path = path.as_ref();
    tokio::fs::write(path, contents)
        .await
        .context(format!("Unable to write to {}", path.to_string_lossy()))
}

/// Read a file to a `String`.
pub async fn read(path: &Path) -> Result<String> {
    tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read file at {}", path.display()))
}

/// Deserialize a JSON file into type `T`.
pub async fn deserialize<T>(path: &Path) -> Result<T>
where
    T: DeserializeOwned,
{
    let content = read(path).await?;
    serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse JSON file at {}", path.display()))
}

/// Create a directory and all of its parents.
pub(crate) async fn make_dir(p: impl AsRef<Path>) -> Result<()> {
    let p = p.as_ref();
    tokio::fs::create_dir_all(p)
        .await
        .with_context(|| format!("Unable to create directory at {}", p.to_string_lossy()))
}

pub(crate) async fn canonicalize(p: impl AsRef<Path>) -> Result<PathBuf> {
    let p = p.as_ref();
    tokio::fs::canonicalize(p)
        .await
        .with_context(|| format!("Unable to canonicalize the path {}", p.to_string_lossy()))
}

/// Formats a timestamp the way JavaScript's `Date.toISOString` does, e.g.
/// `2024-01-15T10:30:00.000Z`.
pub(crate) fn iso_timestamp(t: DateTime<Utc>) -> String {
    t.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Mints an id of the form `{prefix}_{epoch milliseconds}`. Two ids minted within the same
/// millisecond collide.
pub(crate) fn mint_id(prefix: &str, t: DateTime<Utc>) -> String {
    format!("{prefix}_{}", t.timestamp_millis())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_iso_timestamp_matches_javascript_format() {
        let t = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(iso_timestamp(t), "2024-01-15T10:30:00.000Z");
    }

    #[test]
    fn test_mint_id() {
        let t = Utc.timestamp_millis_opt(1_705_314_600_123).unwrap();
        assert_eq!(mint_id("exp", t), "exp_1705314600123");
        assert_eq!(mint_id("pm", t), "pm_1705314600123");
    }

    #[tokio::test]
    async fn test_deserialize_reports_bad_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("bad.json");
        write(&path, "not json").await.unwrap();
        let result: Result<serde_json::Value> = deserialize(&path).await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("Failed to parse JSON file"));
    }
}
