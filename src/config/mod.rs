//! Configuration layer: typed settings with layered precedence (file → env).

use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;
use url::Url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "aula";
const ENV_PREFIX: &str = "AULA";

const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::INFO;
const DEFAULT_STORE_URL: &str = "http://127.0.0.1:54321/rest/v1/";
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
const DEFAULT_DRAFT_SLOT_PATH: &str = "course-draft.json";
const DEFAULT_DRAFT_DEBOUNCE_MS: u64 = 1500;
const DEFAULT_QUIZ_FEEDBACK_PAUSE_MS: u64 = 1200;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    Load(#[from] config::ConfigError),
    #[error("invalid configuration: {message}")]
    Invalid { message: String },
}

impl ConfigError {
    fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid {
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Compact,
}

impl FromStr for LogFormat {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "json" => Ok(Self::Json),
            "compact" => Ok(Self::Compact),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub base_url: String,
    pub api_key: String,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone)]
pub struct DraftSettings {
    /// Location of the device-scoped draft slot.
    pub slot_path: PathBuf,
    /// Quiet period before the remote draft upsert fires.
    pub debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct QuizSettings {
    /// How long answer feedback stays on screen before the next question.
    pub feedback_pause: Duration,
}

#[derive(Debug, Clone)]
pub struct AdminSettings {
    /// SHA-256 of the shared course-removal secret, hex-encoded in the
    /// source configuration. An empty value rejects every removal.
    pub removal_secret_hash: Vec<u8>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub logging: LoggingSettings,
    pub store: StoreSettings,
    pub draft: DraftSettings,
    pub quiz: QuizSettings,
    pub admin: AdminSettings,
}

impl Settings {
    /// Load settings with layered precedence: the checked-in defaults
    /// file, then a local `aula.*` file, then an explicit config file,
    /// then `AULA_*` environment variables.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder()
            .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
            .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

        if let Some(path) = config_file {
            builder = builder.add_source(File::from(path.to_path_buf()));
        }

        let raw: RawSettings = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).separator("__"))
            .build()?
            .try_deserialize()?;

        Self::from_raw(raw)
    }

    fn from_raw(raw: RawSettings) -> Result<Self, ConfigError> {
        let level = match raw.logging.level {
            Some(value) => LevelFilter::from_str(&value)
                .map_err(|_| ConfigError::invalid(format!("unknown log level `{value}`")))?,
            None => DEFAULT_LOG_LEVEL,
        };
        let format = match raw.logging.format {
            Some(value) => value
                .parse()
                .map_err(|()| ConfigError::invalid(format!("unknown log format `{value}`")))?,
            None => LogFormat::Compact,
        };

        let base_url = raw
            .store
            .base_url
            .unwrap_or_else(|| DEFAULT_STORE_URL.to_string());
        Url::parse(&base_url)
            .map_err(|err| ConfigError::invalid(format!("store.base_url is not a URL: {err}")))?;

        let request_timeout_seconds = raw
            .store
            .request_timeout_seconds
            .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS);
        if request_timeout_seconds == 0 {
            return Err(ConfigError::invalid(
                "store.request_timeout_seconds must be positive",
            ));
        }

        let debounce_ms = raw.draft.debounce_ms.unwrap_or(DEFAULT_DRAFT_DEBOUNCE_MS);
        if debounce_ms == 0 {
            return Err(ConfigError::invalid("draft.debounce_ms must be positive"));
        }

        let removal_secret_hash = match raw.admin.removal_secret_hash {
            Some(encoded) => hex::decode(encoded.trim()).map_err(|err| {
                ConfigError::invalid(format!("admin.removal_secret_hash is not hex: {err}"))
            })?,
            None => Vec::new(),
        };

        Ok(Self {
            logging: LoggingSettings { level, format },
            store: StoreSettings {
                base_url,
                api_key: raw.store.api_key.unwrap_or_default(),
                request_timeout: Duration::from_secs(request_timeout_seconds),
            },
            draft: DraftSettings {
                slot_path: raw
                    .draft
                    .slot_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_DRAFT_SLOT_PATH)),
                debounce: Duration::from_millis(debounce_ms),
            },
            quiz: QuizSettings {
                feedback_pause: Duration::from_millis(
                    raw.quiz
                        .feedback_pause_ms
                        .unwrap_or(DEFAULT_QUIZ_FEEDBACK_PAUSE_MS),
                ),
            },
            admin: AdminSettings {
                removal_secret_hash,
            },
        })
    }
}

#[derive(Debug, Default, Deserialize)]
struct RawSettings {
    #[serde(default)]
    logging: RawLogging,
    #[serde(default)]
    store: RawStore,
    #[serde(default)]
    draft: RawDraft,
    #[serde(default)]
    quiz: RawQuiz,
    #[serde(default)]
    admin: RawAdmin,
}

#[derive(Debug, Default, Deserialize)]
struct RawLogging {
    level: Option<String>,
    format: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct RawStore {
    base_url: Option<String>,
    api_key: Option<String>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawDraft {
    slot_path: Option<PathBuf>,
    debounce_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawQuiz {
    feedback_pause_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAdmin {
    removal_secret_hash: Option<String>,
}

#[cfg(test)]
mod tests;
