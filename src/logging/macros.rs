//! Call-site sugar over the [`Logger`](crate::Logger) level methods.
//!
//! Each level macro takes one of three shapes:
//!
//! ```
//! # let logger = flarelog::get_logger("docs");
//! # logger.reset_outputs();
//! # logger.remove_output(&flarelog::sinks::stdout());
//! flarelog::info!(logger).unwrap();
//! flarelog::info!(logger, "starting").unwrap();
//! flarelog::info!(logger, "listening on {addr}", "127.0.0.1:8080").unwrap();
//! ```

/// Formats a template against its arguments, see [`format`](crate::format).
#[macro_export]
macro_rules! render {
    ($template:expr) => {
        $crate::format($template, &[])
    };

    ($template:expr, $($arg:expr),+ $(,)?) => {
        $crate::format($template, &[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! info {
    ($logger:expr) => {
        $logger.info("")
    };

    ($logger:expr, $message:expr) => {
        $logger.info($message)
    };

    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.info_args($template, &[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! warning {
    ($logger:expr) => {
        $logger.warning("")
    };

    ($logger:expr, $message:expr) => {
        $logger.warning($message)
    };

    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.warning_args($template, &[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! error {
    ($logger:expr) => {
        $logger.error("")
    };

    ($logger:expr, $message:expr) => {
        $logger.error($message)
    };

    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.error_args($template, &[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}

#[macro_export]
macro_rules! debug {
    ($logger:expr) => {
        $logger.debug("")
    };

    ($logger:expr, $message:expr) => {
        $logger.debug($message)
    };

    ($logger:expr, $template:expr, $($arg:expr),+ $(,)?) => {
        $logger.debug_args($template, &[$(&$arg as &dyn ::std::fmt::Display),+])
    };
}
