use http::{StatusCode, Uri};
use serde_json::{json, Value};

use crate::http::{Builder, JsonClient};

/// Color the alert light switches to.
pub const ALERT_RGB: [u8; 3] = [255, 0, 0];
pub const ALERT_BRIGHTNESS: u8 = 255;

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("failed encoding notification payload")]
    Encode(#[from] serde_json::Error),

    #[error("failed building notification request")]
    Request(#[from] http::Error),

    #[error("cannot reach https endpoint: {0}")]
    Tls(String),

    #[error("failed starting notification runtime")]
    Runtime(#[source] std::io::Error),

    #[error("notification request failed")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("failed reading notification response")]
    Body(#[from] hyper::Error),

    #[error("notification endpoint answered {0}")]
    Status(StatusCode),

    #[error("notification worker panicked")]
    Aborted,
}

/// Side effect fired once for every ERROR line.
pub trait Notifier: Send + Sync {
    fn notify(&self) -> Result<(), NotificationError>;
}

/// Where the error alert is sent: which light, which endpoint and the token for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationTarget {
    pub entity_id: String,
    pub endpoint: Uri,
    pub token: String,
}

impl NotificationTarget {
    pub fn new(entity_id: impl Into<String>, endpoint: Uri, token: impl Into<String>) -> Self {
        Self {
            entity_id: entity_id.into(),
            endpoint,
            token: token.into(),
        }
    }

    pub fn payload(&self) -> Value {
        json!({
            "entity_id": self.entity_id,
            "rgb_color": ALERT_RGB,
            "brightness": ALERT_BRIGHTNESS,
        })
    }
}

/// Turns a light red through an HTTP API.
#[derive(Debug, Clone)]
pub struct HttpNotifier {
    target: NotificationTarget,
    client: JsonClient,
}

impl HttpNotifier {
    pub fn new(target: NotificationTarget) -> Self {
        Self::with_builder(target, Builder::new())
    }

    pub fn with_builder(target: NotificationTarget, builder: Builder) -> Self {
        Self {
            target,
            client: builder.build(),
        }
    }

    pub fn target(&self) -> &NotificationTarget {
        &self.target
    }
}

impl Notifier for HttpNotifier {
    fn notify(&self) -> Result<(), NotificationError> {
        let body = serde_json::to_vec(&self.target.payload())?;
        let status = self
            .client
            .post_json(&self.target.endpoint, &self.target.token, body)?;

        if !status.is_success() {
            return Err(NotificationError::Status(status));
        }

        tracing::trace!(target: "flarelog", "error notification sent to {}", self.target.entity_id);
        Ok(())
    }
}
