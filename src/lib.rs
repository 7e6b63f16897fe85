//! Leveled logging with pluggable sinks.
//!
//! Loggers come from a [`LoggerFactory`] (or [`get_logger`] for the process
//! wide one), format messages with `{}` placeholders, decorate them with a
//! level label, color and timestamp, and write the result to every registered
//! [`LogSink`]. ERROR lines can additionally switch a light red through an
//! HTTP API, see [`NotificationTarget`].
//!
//! ```
//! use std::sync::Arc;
//! use flarelog::{sinks::MemorySink, Config, LoggerFactory};
//!
//! let factory = LoggerFactory::new(Config::new());
//! let logger = factory.get_logger("app");
//! let capture = Arc::new(MemorySink::new());
//! logger.add_output(capture.clone());
//!
//! flarelog::warning!(logger, "disk {name} at {pct}%", "/var", 91).unwrap();
//! assert!(capture.lines()[0].contains("disk /var at 91%"));
//! ```

pub mod config;
pub mod http;
pub mod logging;

pub use config::Config;
pub use logging::sinks;
pub use logging::template::{format, or_null, FormatError, OrNull, NULL};
pub use logging::{
    get_logger, get_logger_with_debug, muted, set_muted, ExceptionReport, HttpNotifier, Level,
    LogBridge, LogSink, Logger, LoggerFactory, MuteSwitch, NotificationError, NotificationTarget,
    Notifier, StackFrame, Throwable,
};
