use yansi::{Condition, Paint};

use super::Level;
use crate::config::Config;

/// Turns a rendered message into the line handed to the sinks.
#[derive(Debug, Clone)]
pub struct LineFormatter {
    datetime_format: String,
    use_ansi: bool,
}

impl LineFormatter {
    pub fn new(config: &Config) -> Self {
        Self {
            datetime_format: config.datetime_format.clone(),
            use_ansi: config.use_ansi,
        }
    }

    fn timestamp(&self) -> String {
        chrono::Local::now()
            .format(&self.datetime_format)
            .to_string()
    }

    fn paint(&self, level: Level, text: String) -> String {
        if self.use_ansi {
            text.paint(level.color())
                .whenever(Condition::ALWAYS)
                .to_string()
        } else {
            text
        }
    }

    /// `[LABEL] [time] message`, wrapped in the level color.
    pub fn decorate(&self, level: Level, message: &str) -> String {
        let line = format!("[{}] [{}] {}", level.label(), self.timestamp(), message);
        self.paint(level, line)
    }

    /// The message alone, still wrapped in the level color.
    pub fn silent(&self, level: Level, message: &str) -> String {
        self.paint(level, format!(" {}", message))
    }
}
