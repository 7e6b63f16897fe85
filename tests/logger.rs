use std::sync::Arc;

use flarelog::{
    render,
    sinks::{self, MemorySink},
    Config, ExceptionReport, FormatError, Logger, LoggerFactory, Throwable,
};

fn plain_factory() -> LoggerFactory {
    LoggerFactory::new(Config {
        use_ansi: false,
        ..Config::new()
    })
}

fn capture(logger: &Logger) -> Arc<MemorySink> {
    let sink = Arc::new(MemorySink::new());
    logger.add_output(sink.clone());
    sink
}

#[test]
fn multiple_outputs() {
    let logger = plain_factory().get_logger("Test");
    let first = capture(&logger);
    let second = capture(&logger);

    flarelog::info!(logger, "This is a test").unwrap();

    assert!(first.contents().contains("This is a test"));
    assert_eq!(first.lines(), second.lines());
}

#[test]
fn macro_shapes() {
    let logger = plain_factory().get_logger_with_debug("Test", true);
    logger.remove_output(&sinks::stdout());
    let sink = capture(&logger);

    flarelog::info!(logger).unwrap();
    flarelog::warning!(logger, "plain").unwrap();
    flarelog::debug!(logger, "{a} + {b}", 1, 2,).unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("[INFO] ") && lines[0].ends_with("] "));
    assert!(lines[1].starts_with("[WARNING] ") && lines[1].ends_with("] plain"));
    assert!(lines[2].starts_with("[DEBUG] ") && lines[2].ends_with("] 1 + 2"));
}

#[test]
fn format_errors_reach_the_caller() {
    let logger = plain_factory().get_logger("Test");
    logger.remove_output(&sinks::stdout());
    let sink = capture(&logger);

    let err = flarelog::info!(logger, "{only}", 1, 2).unwrap_err();
    assert!(matches!(err, FormatError::TooManyArguments { .. }));

    let err = flarelog::error!(logger, "{a} {b}", 1).unwrap_err();
    assert!(matches!(err, FormatError::MissingArgument { .. }));

    assert!(sink.is_empty());
}

#[test]
fn debug_effectiveness() {
    let factory = plain_factory();

    let logger = factory.get_logger_with_debug("Test", false);
    let sink = capture(&logger);
    flarelog::debug!(logger, "This is a test").unwrap();
    assert!(!sink.contents().contains("This is a test"));

    let logger = factory.get_logger_with_debug("Test", true);
    let sink = capture(&logger);
    flarelog::debug!(logger, "This is a test").unwrap();
    assert!(sink.contents().contains("This is a test"));
}

#[test]
fn exception_printer() {
    let logger = plain_factory().get_logger("Test");
    logger.remove_output(&sinks::stdout());
    let sink = capture(&logger);

    let err = std::io::Error::new(std::io::ErrorKind::Other, "This is a test exception!");
    let report = ExceptionReport::capture(&err);
    logger.exception(&report).unwrap();

    let lines = sink.lines();
    assert_eq!(lines.len(), 1 + report.stack_trace().len());
    assert!(lines[0].contains("This is a test exception!"));
    assert!(lines[1..].iter().all(|line| line.starts_with("[  TRACE  ] ")));

    // The frame of this very test shows up as `    at {class}.{method}({file}:{line})`.
    let frame = lines
        .iter()
        .find(|line| line.contains(".exception_printer("))
        .expect("no frame for the calling test");
    let at = frame.find("    at ").expect("frame line without `at`");
    let location = &frame[at + "    at ".len()..];
    let (_, rest) = location.split_once(".exception_printer(").unwrap();
    let (file, line) = rest.strip_suffix(')').unwrap().rsplit_once(':').unwrap();
    assert!(file.ends_with(".rs"), "unexpected file in {frame}");
    assert!(line.parse::<u32>().is_ok(), "unexpected line in {frame}");
}

#[test]
fn same_name_gives_independent_loggers() {
    let factory = plain_factory();
    let first = factory.get_logger("Test");
    let second = factory.get_logger("Test");

    first.add_output(Arc::new(MemorySink::new()));

    assert_eq!(first.outputs().len(), 2);
    assert_eq!(second.outputs().len(), 1);
}

#[test]
fn standalone_formatter() {
    assert_eq!(
        render!("Hello {name}, you have {n} messages", "Ann", 5).unwrap(),
        "Hello Ann, you have 5 messages"
    );
    assert_eq!(
        flarelog::format("Escaped \\{literal} {val}", &[&42]).unwrap(),
        "Escaped {literal} 42"
    );
    assert_eq!(flarelog::format("no args here", &[]).unwrap(), "no args here");
    assert_eq!(render!("{}", flarelog::NULL).unwrap(), "null");
}
