use std::path::PathBuf;

use clap::{Parser, ValueEnum};

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LevelArg {
    Info,
    Warning,
    Error,
    Debug,
}

impl From<LevelArg> for flarelog::Level {
    fn from(level: LevelArg) -> Self {
        match level {
            LevelArg::Info => flarelog::Level::Info,
            LevelArg::Warning => flarelog::Level::Warning,
            LevelArg::Error => flarelog::Level::Error,
            LevelArg::Debug => flarelog::Level::Debug,
        }
    }
}

#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColorChoice {
    #[default]
    Auto,
    Always,
    Never,
}

#[derive(Parser, Debug)]
#[command(version)]
#[command(about = "Write a leveled log line, optionally flashing a light on errors.", long_about = None)]
pub struct Cli {
    #[arg(value_enum, help = "Severity of the line.")]
    pub level: LevelArg,

    #[arg(help = "Message template, every {...} is replaced by the next argument.")]
    pub template: String,

    #[arg(help = "Values for the placeholders, in order.")]
    pub args: Vec<String>,

    #[arg(long, default_value = "flarelog", help = "Name of the logger.")]
    pub name: String,

    #[arg(long, help = "Enable debug lines. Defaults to FLARELOG_DEBUG.")]
    pub debug: bool,

    #[arg(long, help = "Leave out the label and timestamp.")]
    pub silent: bool,

    #[arg(long, value_name = "PATH", help = "Also append the line to this file. Can be repeated.")]
    pub file: Vec<PathBuf>,

    #[arg(long, help = "Also write the line to stderr.")]
    pub stderr: bool,

    #[arg(long, help = "Suppress all output. Error notifications are still sent.")]
    pub mute: bool,

    #[arg(long, value_enum, default_value_t = ColorChoice::Auto)]
    pub color: ColorChoice,

    #[arg(
        long,
        short = 'v',
        action = clap::ArgAction::Count,
        help = "Write diagnostics about flarelog itself to stderr.",
    )]
    pub verbose: u8,
}
