use std::{fmt, str::FromStr};

use yansi::Color;

/// Severity of a log line.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Level {
    Info,
    Warning,
    Error,
    Debug,
    Exception,
    StackTrace,
}

impl Level {
    pub const ALL: [Level; 6] = [
        Level::Info,
        Level::Warning,
        Level::Error,
        Level::Debug,
        Level::Exception,
        Level::StackTrace,
    ];

    /// Text shown between the brackets of a decorated line.
    pub fn label(&self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
            Level::Debug => "DEBUG",
            Level::Exception => "EXCEPTION",
            Level::StackTrace => "  TRACE  ",
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Level::Info => Color::Primary,
            Level::Warning => Color::Yellow,
            Level::Error => Color::Red,
            Level::Debug => Color::Green,
            Level::Exception => Color::Red,
            Level::StackTrace => Color::Red,
        }
    }

    /// Whether logging at this level fires the error notification.
    pub fn notifies(&self) -> bool {
        matches!(self, Level::Error)
    }

    /// Whether this level is only written by loggers created with debug enabled.
    pub fn debug_only(&self) -> bool {
        matches!(self, Level::Debug)
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label().trim())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log level: {0}")]
pub struct ParseLevelError(String);

impl FromStr for Level {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "info" => Ok(Level::Info),
            "warn" | "warning" => Ok(Level::Warning),
            "error" | "err" => Ok(Level::Error),
            "debug" => Ok(Level::Debug),
            "exception" => Ok(Level::Exception),
            "trace" | "stacktrace" | "stack_trace" => Ok(Level::StackTrace),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}
