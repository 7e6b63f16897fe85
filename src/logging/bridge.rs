use eyre::Context;
use log::{LevelFilter, Log};

use super::{Level, Logger};

/// Routes records from the `log` facade into a [`Logger`].
///
/// Records arrive already formatted by the `log` macros, so braces in them are
/// written as they are.
pub struct LogBridge {
    filter: LevelFilter,
    logger: Logger,
}

impl LogBridge {
    pub fn new(filter: LevelFilter, logger: Logger) -> Self {
        Self { filter, logger }
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn init(self) -> eyre::Result<()> {
        log::set_max_level(self.filter);
        log::set_boxed_logger(Box::new(self)).context("Failed registering boxed logger")?;

        Ok(())
    }
}

fn level_for(level: log::Level) -> Level {
    match level {
        log::Level::Error => Level::Error,
        log::Level::Warn => Level::Warning,
        log::Level::Info => Level::Info,
        log::Level::Debug | log::Level::Trace => Level::Debug,
    }
}

impl Log for LogBridge {
    fn enabled(&self, metadata: &log::Metadata) -> bool {
        self.filter >= metadata.level()
    }

    fn log(&self, record: &log::Record) {
        if self.enabled(record.metadata()) {
            self.logger
                .log_preformatted(level_for(record.level()), &record.args().to_string());
        }
    }

    fn flush(&self) {
        self.logger.flush()
    }
}
