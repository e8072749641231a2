//! `[logging]` section
//!
//! Controls the tracing filter and the optional JSON log file. The filter only
//! raises `fichegen` itself; the HTTP stack stays at `warn` unless `RUST_LOG`
//! says otherwise, so a debug session shows our requests and not hyper's.

use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::{self, RollingFileAppender};

const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// Crates whose own logs stay quiet under the default filter
const QUIET_DEPENDENCIES: [&str; 3] = ["reqwest", "hyper", "axum"];

/// How often the JSON log file starts over
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogRotation {
    Hourly,
    #[default]
    Daily,
    /// One file for the lifetime of the install
    Never,
}

impl LogRotation {
    /// Unknown values mean daily
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "hourly" => Self::Hourly,
            "never" | "none" => Self::Never,
            _ => Self::Daily,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Hourly => "hourly",
            Self::Daily => "daily",
            Self::Never => "never",
        }
    }

    pub fn appender(&self, dir: &Path, prefix: &str) -> RollingFileAppender {
        match self {
            Self::Hourly => rolling::hourly(dir, prefix),
            Self::Daily => rolling::daily(dir, prefix),
            Self::Never => rolling::never(dir, prefix),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// One of trace, debug, info, warn, error
    pub level: String,
    pub file_enabled: bool,
    pub file_dir: PathBuf,
    pub file_rotation: LogRotation,
    pub file_prefix: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            file_enabled: false,
            file_dir: default_log_dir(),
            file_rotation: LogRotation::Daily,
            file_prefix: "fichegen".to_string(),
        }
    }
}

/// `~/.local/share/fichegen/logs` or the platform equivalent, `./logs` without a home
fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("fichegen").join("logs"))
        .unwrap_or_else(|| PathBuf::from("./logs"))
}

/// Lowercased level, or `None` when tracing would not understand it
fn normalize_level(raw: &str) -> Option<String> {
    let level = raw.trim().to_lowercase();
    LEVELS.contains(&level.as_str()).then_some(level)
}

#[derive(Debug, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
    pub file_enabled: Option<bool>,
    pub file_dir: Option<String>,
    pub file_rotation: Option<String>,
    pub file_prefix: Option<String>,
}

impl LoggingConfig {
    /// Layer env (`FICHEGEN_LOG_LEVEL`, `FICHEGEN_LOG_DIR`) over the file section
    pub fn from_sources(file: Option<FileLogging>, env: impl Fn(&str) -> Option<String>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        let level = env("FICHEGEN_LOG_LEVEL")
            .or(file.level)
            .and_then(|raw| {
                let level = normalize_level(&raw);
                if level.is_none() {
                    eprintln!("Warning: unknown log level {raw:?}, using info");
                }
                level
            })
            .unwrap_or(defaults.level);

        // Asking for a directory implies wanting the file
        let env_dir = env("FICHEGEN_LOG_DIR").filter(|d| !d.trim().is_empty());
        let file_enabled = env_dir.is_some() || file.file_enabled.unwrap_or(defaults.file_enabled);

        Self {
            level,
            file_enabled,
            file_dir: env_dir
                .or(file.file_dir)
                .map(PathBuf::from)
                .unwrap_or(defaults.file_dir),
            file_rotation: file
                .file_rotation
                .map(|s| LogRotation::parse(&s))
                .unwrap_or(defaults.file_rotation),
            file_prefix: file
                .file_prefix
                .filter(|p| !p.trim().is_empty())
                .unwrap_or(defaults.file_prefix),
        }
    }

    /// Default `EnvFilter` directive when `RUST_LOG` is unset
    pub fn filter_directive(&self) -> String {
        let mut directive = format!("fichegen={}", self.level);
        for dependency in QUIET_DEPENDENCIES {
            directive.push_str(&format!(",{dependency}=warn"));
        }
        directive
    }
}
