mod bridge;
mod exception;
mod formatters;
mod level;
mod logger;
mod macros;
mod notify;
pub mod sinks;
pub mod template;

pub use bridge::LogBridge;
pub use exception::{ExceptionReport, StackFrame, Throwable};
pub use formatters::LineFormatter;
pub use level::{Level, ParseLevelError};
pub use logger::{get_logger, get_logger_with_debug, muted, set_muted, Logger, LoggerFactory, MuteSwitch};
pub use notify::{HttpNotifier, NotificationError, NotificationTarget, Notifier};

/// A destination for rendered log lines.
///
/// Sinks are shared as `Arc<dyn LogSink>` and one sink may be registered on
/// several loggers at once.
pub trait LogSink: Sync + Send {
    /// Writes `line` followed by a line terminator.
    fn write_line(&self, line: &str) -> eyre::Result<()>;
    fn flush(&self);
}
