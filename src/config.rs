//! Configuration file handling for the expense store.
//!
//! The configuration file is stored at `$EXPENSE_HOME/config.json` and contains settings such
//! as where backups are exported to and how many of them to keep.

use crate::backup::Backup;
use crate::store::Store;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "expense";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 10;
const BACKUPS: &str = "backups";
const CONFIG_JSON: &str = "config.json";
const DATA_JSON: &str = "expense_data.json";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$EXPENSE_HOME` and from there it loads `$EXPENSE_HOME/config.json`. It provides
/// the paths of the data document and the backups directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    data_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the home directory and an initial `config.json` with default settings.
    ///
    /// # Arguments
    /// - `dir` - The directory that will be the root of the data directory, e.g. `$HOME/expenses`
    /// - `backups_dir` - Where exported backups go. When `None`, the user's downloads directory
    ///   is used if there is one, otherwise `$EXPENSE_HOME/backups`.
    ///
    /// # Errors
    /// - Returns an error if a `config.json` already exists or if any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>, backups_dir: Option<PathBuf>) -> Result<Self> {
        // Create the directory if it does not exist
        let maybe_relative = dir.into();
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the expense home directory")?;

        // Canonicalize the directory path
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.is_file() {
            bail!("A config file already exists at '{}'", config_path.display())
        }

        let backups_dir = backups_dir.or_else(|| dirs::download_dir().filter(|d| d.is_dir()));
        let config_file = ConfigFile {
            backups_dir,
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;

        Self::from_parts(root, config_path, config_file).await
    }

    /// This will
    /// - validate that the `expense_home` exists and that the config file exists
    /// - load the config file
    /// - create the backups directory if it does not exist yet
    /// - return the loaded configuration object
    pub async fn load(expense_home: impl Into<PathBuf>) -> Result<Self> {
        let maybe_relative = expense_home.into();
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The expense home directory is missing, run 'expense init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'expense init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;
        Self::from_parts(root, config_path, config_file).await
    }

    async fn from_parts(root: PathBuf, config_path: PathBuf, config_file: ConfigFile) -> Result<Self> {
        let backups = match &config_file.backups_dir {
            Some(p) if p.is_absolute() => p.clone(),
            Some(p) => root.join(p),
            None => root.join(BACKUPS),
        };
        utils::make_dir(&backups)
            .await
            .context("Unable to create the backups directory")?;
        debug!("Backups will be written to {}", backups.display());

        Ok(Self {
            data_path: root.join(DATA_JSON),
            root,
            backups,
            config_path,
            config_file,
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The path of the JSON document that holds all expense data.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Opens the store over this configuration's data document.
    pub fn store(&self) -> Store {
        Store::new(self.data_path(), self.backup())
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "expense",
///   "config_version": 1,
///   "backup_copies": 10,
///   "backups_dir": "/home/me/Downloads"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "expense"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep, zero keeps all of them
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Where exported backups are written (optional, relative to the home directory or absolute)
    /// Defaults to $EXPENSE_HOME/backups if not specified
    #[serde(default, skip_serializing_if = "Option::is_none")]
    backups_dir: Option<PathBuf>,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            backups_dir: None,
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile asynchronously from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        // Validate app_name
        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be written
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}
