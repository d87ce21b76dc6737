//! Configuration loading and representation.
//!
//! Everything comes from environment variables with per-user defaults:
//!
//! | variable | default |
//! |---|---|
//! | `FOODRECORDS_DATA_DIR` | `{app_data_dir}/foodrecords` |
//! | `FOODRECORDS_DATABASE_URL` | unset: the file `{data_dir}/foodrecords.db` |
//! | `FOODRECORDS_PHOTO_DIR` | `{data_dir}/pictures` |
//! | `FOODRECORDS_LOG_FORMAT` | `text` (or `json`) |

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::Context;
use sqlx::sqlite::SqliteConnectOptions;

use foodrecords_observability::LogFormat;

pub const DATA_DIR_VAR: &str = "FOODRECORDS_DATA_DIR";
pub const DATABASE_URL_VAR: &str = "FOODRECORDS_DATABASE_URL";
pub const PHOTO_DIR_VAR: &str = "FOODRECORDS_PHOTO_DIR";
pub const LOG_FORMAT_VAR: &str = "FOODRECORDS_LOG_FORMAT";

/// Where the SQLite database lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    /// A file path, passed to SQLite verbatim.
    File(PathBuf),
    /// An explicit `sqlite:` URL (e.g. `sqlite::memory:`).
    Url(String),
}

impl DatabaseTarget {
    pub fn connect_options(&self) -> anyhow::Result<SqliteConnectOptions> {
        match self {
            DatabaseTarget::File(path) => Ok(SqliteConnectOptions::new().filename(path)),
            DatabaseTarget::Url(url) => SqliteConnectOptions::from_str(url)
                .with_context(|| format!("invalid {DATABASE_URL_VAR} {url}")),
        }
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DatabaseTarget::File(path) => write!(f, "{}", path.display()),
            DatabaseTarget::Url(url) => f.write_str(url),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub data_dir: PathBuf,
    pub database: DatabaseTarget,
    pub photo_dir: PathBuf,
    pub log_format: LogFormat,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source (tests pass a map here).
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let data_dir = match lookup(DATA_DIR_VAR) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };
        Self::for_data_dir_with(data_dir, lookup)
    }

    /// Defaults rooted at `data_dir`, ignoring the environment.
    pub fn for_data_dir(data_dir: impl Into<PathBuf>) -> Self {
        Self::defaults(data_dir.into())
    }

    fn for_data_dir_with<F>(data_dir: PathBuf, lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::defaults(data_dir);

        if let Some(url) = lookup(DATABASE_URL_VAR) {
            config.database = DatabaseTarget::Url(url);
        }
        if let Some(dir) = lookup(PHOTO_DIR_VAR) {
            config.photo_dir = PathBuf::from(dir);
        }
        if let Some(format) = lookup(LOG_FORMAT_VAR) {
            config.log_format = format
                .parse::<LogFormat>()
                .with_context(|| format!("invalid {LOG_FORMAT_VAR}"))?;
        }

        Ok(config)
    }

    fn defaults(data_dir: PathBuf) -> Self {
        Self {
            database: DatabaseTarget::File(data_dir.join("foodrecords.db")),
            photo_dir: data_dir.join("pictures"),
            data_dir,
            log_format: LogFormat::default(),
        }
    }

    /// Install the process-wide tracing subscriber in the configured format.
    pub fn init_logging(&self) {
        foodrecords_observability::init(self.log_format);
    }

    /// Create the data and photo directories if they are missing.
    pub fn ensure_dirs(&self) -> anyhow::Result<()> {
        for dir in [&self.data_dir, &self.photo_dir] {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("failed to create directory at {dir:?}"))?;
        }
        Ok(())
    }
}

/// `{app_data_dir}/foodrecords`, falling back to `~/.local/share/foodrecords`.
fn default_data_dir() -> anyhow::Result<PathBuf> {
    let mut dir = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    dir.push("foodrecords");
    Ok(dir)
}
