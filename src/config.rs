use eyre::Context;
use http::Uri;

use crate::logging::NotificationTarget;

pub const ENV_DEBUG: &str = "FLARELOG_DEBUG";
pub const ENV_DATETIME_FORMAT: &str = "FLARELOG_DATETIME_FORMAT";
pub const ENV_NO_COLOR: &str = "NO_COLOR";
pub const ENV_NOTIFY_URL: &str = "FLARELOG_NOTIFY_URL";
pub const ENV_NOTIFY_TOKEN: &str = "FLARELOG_NOTIFY_TOKEN";
pub const ENV_NOTIFY_ENTITY: &str = "FLARELOG_NOTIFY_ENTITY";

/// Settings shared by every logger a [`LoggerFactory`](crate::LoggerFactory) creates.
#[derive(Debug, Clone)]
pub struct Config {
    pub debug: bool,
    pub datetime_format: String,
    pub use_ansi: bool,
    pub notification: Option<NotificationTarget>,
}

impl Config {
    pub fn new() -> Self {
        Self {
            debug: false,
            datetime_format: "%H:%M:%S".to_string(),
            use_ansi: true,
            notification: None,
        }
    }

    pub fn with_notification(self, target: NotificationTarget) -> Self {
        Self {
            notification: Some(target),
            ..self
        }
    }

    pub fn from_env() -> eyre::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from `lookup`, which plays the role of the environment.
    pub fn from_lookup<F>(lookup: F) -> eyre::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::new();

        if let Some(debug) = lookup(ENV_DEBUG) {
            config.debug = parse_flag(&debug)
                .ok_or_else(|| eyre::eyre!("{} must be a boolean, got {:?}", ENV_DEBUG, debug))?;
        }

        if let Some(format) = lookup(ENV_DATETIME_FORMAT).filter(|f| !f.is_empty()) {
            config.datetime_format = format;
        }

        // https://no-color.org: any non-empty value disables color.
        if lookup(ENV_NO_COLOR).is_some_and(|v| !v.is_empty()) {
            config.use_ansi = false;
        }

        let url = lookup(ENV_NOTIFY_URL);
        let token = lookup(ENV_NOTIFY_TOKEN);
        let entity = lookup(ENV_NOTIFY_ENTITY);

        config.notification = match (url, token, entity) {
            (None, None, None) => None,
            (Some(url), Some(token), Some(entity)) => {
                let endpoint = url
                    .parse::<Uri>()
                    .with_context(|| format!("{} is not a valid url: {}", ENV_NOTIFY_URL, url))?;
                Some(NotificationTarget::new(entity, endpoint, token))
            }
            _ => {
                return Err(eyre::eyre!(
                    "{}, {} and {} must be set together",
                    ENV_NOTIFY_URL,
                    ENV_NOTIFY_TOKEN,
                    ENV_NOTIFY_ENTITY
                ))
            }
        };

        Ok(config)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" | "" => Some(false),
        _ => None,
    }
}
