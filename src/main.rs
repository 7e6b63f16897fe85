mod args;

use std::fmt::Display;
use std::io::IsTerminal;
use std::process::ExitCode;
use std::sync::Arc;

use args::{Cli, ColorChoice};
use clap::Parser;
use eyre::Context;
use flarelog::{sinks, Config, Level, LogSink, LoggerFactory, MuteSwitch};
use tracing::level_filters::LevelFilter;

fn diagnostics_filter(verbose: u8) -> LevelFilter {
    match verbose {
        0 => LevelFilter::OFF,
        1 => LevelFilter::ERROR,
        2 => LevelFilter::WARN,
        3 => LevelFilter::INFO,
        4 => LevelFilter::DEBUG,
        _ => LevelFilter::TRACE,
    }
}

fn run(cli: Cli) -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(diagnostics_filter(cli.verbose))
        .init();

    let mut config = Config::from_env().context("Failed reading configuration from environment")?;
    config.debug |= cli.debug;
    config.use_ansi = match cli.color {
        ColorChoice::Always => true,
        ColorChoice::Never => false,
        ColorChoice::Auto => config.use_ansi && std::io::stdout().is_terminal(),
    };

    let mute = MuteSwitch::new();
    mute.set(cli.mute);
    let factory = LoggerFactory::new(config).with_mute(mute);
    let logger = factory.get_logger(cli.name.as_str());

    for path in &cli.file {
        logger.add_output(Arc::new(sinks::FileSink::new(path)?));
    }
    if cli.stderr {
        let stderr: Arc<dyn LogSink> = Arc::new(sinks::StderrSink::new());
        logger.add_output(stderr);
    }

    tracing::debug!(target: "flarelog", "logging through {} sinks", logger.outputs().len());

    let level = Level::from(cli.level);
    let args: Vec<&dyn Display> = cli.args.iter().map(|arg| arg as &dyn Display).collect();
    let result = if cli.silent {
        logger.silent(level, &cli.template, &args)
    } else {
        logger.log(level, &cli.template, &args)
    };
    logger.flush();

    result.with_context(|| format!("Failed formatting {:?}", cli.template))
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Err(err) => {
            let root = err.root_cause();

            eprint!("\x1b[31m");
            eprintln!("Error: {}", err);
            eprintln!();
            eprintln!("Caused by:");
            eprint!("  {}", root);
            eprintln!("\x1b[0m");
            ExitCode::from(1)
        }
        Ok(_) => ExitCode::from(0),
    }
}
