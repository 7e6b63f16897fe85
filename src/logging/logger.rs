use std::{
    fmt::Display,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex, MutexGuard, OnceLock, PoisonError,
    },
};

use super::{
    formatters::LineFormatter,
    sinks::{self, same_sink},
    template::{self, FormatError},
    HttpNotifier, Level, LogSink, Notifier, Throwable,
};
use crate::config::Config;

/// Shared on/off switch that silences every logger holding a clone of it.
#[derive(Debug, Clone, Default)]
pub struct MuteSwitch(Arc<AtomicBool>);

impl MuteSwitch {
    pub fn new() -> Self {
        Self::default()
    }

    /// The process wide switch behind [`set_muted`] and [`muted`].
    pub fn global() -> Self {
        static GLOBAL: OnceLock<MuteSwitch> = OnceLock::new();
        GLOBAL.get_or_init(MuteSwitch::new).clone()
    }

    pub fn set(&self, muted: bool) {
        self.0.store(muted, Ordering::SeqCst);
    }

    pub fn is_muted(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub fn set_muted(muted: bool) {
    MuteSwitch::global().set(muted);
}

pub fn muted() -> bool {
    MuteSwitch::global().is_muted()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Style {
    Decorated,
    Silent,
}

/// A named logger writing to an ordered list of sinks.
pub struct Logger {
    name: String,
    debug: bool,
    sinks: Mutex<Vec<Arc<dyn LogSink>>>,
    formatter: LineFormatter,
    mute: MuteSwitch,
    notifier: Option<Arc<dyn Notifier>>,
}

impl Logger {
    fn new(
        name: String,
        debug: bool,
        formatter: LineFormatter,
        mute: MuteSwitch,
        notifier: Option<Arc<dyn Notifier>>,
    ) -> Self {
        Self {
            name,
            debug,
            sinks: Mutex::new(vec![sinks::stdout()]),
            formatter,
            mute,
            notifier,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn debug_enabled(&self) -> bool {
        self.debug
    }

    pub fn mute_switch(&self) -> &MuteSwitch {
        &self.mute
    }

    fn enabled(&self, level: Level) -> bool {
        self.debug || !level.debug_only()
    }

    /// Formats `template` with `args` and writes the decorated line to every sink.
    pub fn log(&self, level: Level, template: &str, args: &[&dyn Display]) -> Result<(), FormatError> {
        self.dispatch(level, Style::Decorated, || template::format(template, args))
    }

    /// Like [`log`](Self::log) without the label and timestamp.
    pub fn silent(
        &self,
        level: Level,
        template: &str,
        args: &[&dyn Display],
    ) -> Result<(), FormatError> {
        self.dispatch(level, Style::Silent, || template::format(template, args))
    }

    /// Writes an already formatted message, skipping placeholder substitution.
    pub(crate) fn log_preformatted(&self, level: Level, message: &str) {
        // Infallible: nothing is substituted.
        let _ = self.dispatch(level, Style::Decorated, || Ok(message.to_string()));
    }

    fn dispatch<F>(&self, level: Level, style: Style, body: F) -> Result<(), FormatError>
    where
        F: FnOnce() -> Result<String, FormatError>,
    {
        if !self.enabled(level) {
            return Ok(());
        }

        if level.notifies() {
            self.notify_error();
        }

        if self.mute.is_muted() {
            return Ok(());
        }

        let message = body()?;
        let line = match style {
            Style::Decorated => self.formatter.decorate(level, &message),
            Style::Silent => self.formatter.silent(level, &message),
        };

        self.write_line(&line);
        Ok(())
    }

    fn notify_error(&self) {
        let Some(notifier) = &self.notifier else {
            return;
        };

        // The alert is best effort. Its failure goes to the diagnostic channel
        // and is dropped here so the ERROR line itself is always written.
        if let Err(err) = notifier.notify() {
            tracing::warn!(target: "flarelog", logger = %self.name, "error notification failed: {}", err);
        }
    }

    fn write_line(&self, line: &str) {
        let sinks = self.lock_sinks().clone();

        for sink in sinks {
            // A broken sink only loses this write; the others still get the line.
            if let Err(err) = sink.write_line(line) {
                tracing::warn!(target: "flarelog", logger = %self.name, "failed writing log line: {:#}", err);
            }
        }
    }

    pub fn info(&self, message: &str) -> Result<(), FormatError> {
        self.log(Level::Info, message, &[])
    }

    pub fn info_args(&self, template: &str, args: &[&dyn Display]) -> Result<(), FormatError> {
        self.log(Level::Info, template, args)
    }

    pub fn warning(&self, message: &str) -> Result<(), FormatError> {
        self.log(Level::Warning, message, &[])
    }

    pub fn warning_args(&self, template: &str, args: &[&dyn Display]) -> Result<(), FormatError> {
        self.log(Level::Warning, template, args)
    }

    /// Logs at ERROR, firing the error notification first when one is configured.
    pub fn error(&self, message: &str) -> Result<(), FormatError> {
        self.log(Level::Error, message, &[])
    }

    pub fn error_args(&self, template: &str, args: &[&dyn Display]) -> Result<(), FormatError> {
        self.log(Level::Error, template, args)
    }

    /// Does nothing at all unless the logger was created with debug enabled.
    pub fn debug(&self, message: &str) -> Result<(), FormatError> {
        self.log(Level::Debug, message, &[])
    }

    pub fn debug_args(&self, template: &str, args: &[&dyn Display]) -> Result<(), FormatError> {
        self.log(Level::Debug, template, args)
    }

    /// Logs a summary line for `err` followed by one line per stack frame.
    pub fn exception(&self, err: &(impl Throwable + ?Sized)) -> Result<(), FormatError> {
        let message = template::or_null(err.message());
        self.log(Level::Exception, "{type} {message}", &[&err.kind(), &message])?;

        for frame in err.stack_trace() {
            self.log(
                Level::StackTrace,
                "    at {class}.{method}({file name}:{line})",
                &[
                    &frame.class,
                    &frame.method,
                    &template::or_null(frame.file.as_deref()),
                    &template::or_null(frame.line),
                ],
            )?;
        }

        Ok(())
    }

    pub fn add_output(&self, sink: Arc<dyn LogSink>) {
        self.lock_sinks().push(sink);
    }

    /// Removes the first registration of `sink`, if any.
    pub fn remove_output(&self, sink: &Arc<dyn LogSink>) {
        let mut sinks = self.lock_sinks();
        if let Some(index) = sinks.iter().position(|s| same_sink(s, sink)) {
            sinks.remove(index);
        }
    }

    /// Goes back to writing to standard output only.
    pub fn reset_outputs(&self) {
        *self.lock_sinks() = vec![sinks::stdout()];
    }

    pub fn outputs(&self) -> Vec<Arc<dyn LogSink>> {
        self.lock_sinks().clone()
    }

    pub fn flush(&self) {
        for sink in self.outputs() {
            sink.flush();
        }
    }

    fn lock_sinks(&self) -> MutexGuard<'_, Vec<Arc<dyn LogSink>>> {
        self.sinks.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Hands out loggers sharing one configuration and one mute switch.
///
/// Every call returns a fresh logger, asking twice for the same name gives two
/// loggers with separate sink lists.
#[derive(Clone)]
pub struct LoggerFactory {
    config: Config,
    mute: MuteSwitch,
    notifier: Option<Arc<dyn Notifier>>,
}

impl LoggerFactory {
    /// A factory with its own mute switch, independent of [`set_muted`].
    pub fn new(config: Config) -> Self {
        let notifier = config
            .notification
            .clone()
            .map(|target| Arc::new(HttpNotifier::new(target)) as Arc<dyn Notifier>);

        Self {
            config,
            mute: MuteSwitch::new(),
            notifier,
        }
    }

    /// The factory behind [`get_logger`], default configuration and the global mute switch.
    pub fn global() -> &'static LoggerFactory {
        static GLOBAL: OnceLock<LoggerFactory> = OnceLock::new();
        GLOBAL.get_or_init(|| LoggerFactory::new(Config::new()).with_mute(MuteSwitch::global()))
    }

    pub fn with_mute(self, mute: MuteSwitch) -> Self {
        Self { mute, ..self }
    }

    /// Replaces the notifier built from the configuration.
    pub fn with_notifier(self, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            notifier: Some(notifier),
            ..self
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn mute_switch(&self) -> &MuteSwitch {
        &self.mute
    }

    pub fn get_logger(&self, name: impl Into<String>) -> Logger {
        self.get_logger_with_debug(name, self.config.debug)
    }

    pub fn get_logger_with_debug(&self, name: impl Into<String>, debug: bool) -> Logger {
        Logger::new(
            name.into(),
            debug,
            LineFormatter::new(&self.config),
            self.mute.clone(),
            self.notifier.clone(),
        )
    }

    /// A logger named after `T`.
    pub fn get_logger_for<T: ?Sized>(&self) -> Logger {
        self.get_logger(std::any::type_name::<T>())
    }
}

pub fn get_logger(name: impl Into<String>) -> Logger {
    LoggerFactory::global().get_logger(name)
}

pub fn get_logger_with_debug(name: impl Into<String>, debug: bool) -> Logger {
    LoggerFactory::global().get_logger_with_debug(name, debug)
}
