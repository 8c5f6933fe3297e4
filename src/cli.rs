use anyhow::Result;
use camino::Utf8PathBuf;
use clap::{Args, Parser, Subcommand, ValueEnum};

#[derive(Parser, Debug)]
#[command(
    name = env!("CARGO_PKG_NAME"),
    version = env!("CARGO_PKG_VERSION"),
    author = env!("CARGO_PKG_AUTHORS"),
    about = env!("CARGO_PKG_DESCRIPTION"),
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Returns the log level of whichever subcommand was given.
    pub fn log_level(&self) -> LogLevel {
        match &self.command {
            Commands::Apply(opts) => opts.log_level,
            Commands::Teardown(opts) => opts.log_level,
            Commands::Validate(opts) => opts.log_level,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Provision the configured repos on every rpm node
    Apply(ApplyArgs),

    /// Remove previously provisioned repo files from every rpm node
    Teardown(TeardownArgs),

    /// Validate the given YAML manifest
    Validate(ValidateArgs),
}

#[derive(Args, Debug)]
pub struct ApplyArgs {
    /// Path to the YAML manifest defining nodes and repos
    #[arg(short, long, default_value = "manifest.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Do not run remote commands, just show what would be done
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct TeardownArgs {
    /// Path to the YAML manifest defining nodes and repos
    #[arg(short, long, default_value = "manifest.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,

    /// Do not run remote commands, just show what would be done
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Path to the YAML manifest to validate
    #[arg(short, long, default_value = "manifest.yaml")]
    pub file: Utf8PathBuf,

    /// Set the log level
    #[arg(short, long, default_value = "info")]
    pub log_level: LogLevel,
}

/// Represents log levels for controlling the verbosity of logging output.
///
/// Maps directly to the log levels used by the `tracing` crate.
#[derive(Copy, Clone, Debug, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

pub fn parse_args() -> Result<Cli> {
    Ok(Cli::parse())
}
