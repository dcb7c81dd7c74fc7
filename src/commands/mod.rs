use crate::{
    CanvasClient, Config, Fetcher, NotificationScheduler, Result,
    notifier::{DesktopNotifier, LogNotifier, Notifier},
};
use clap::{Parser, Subcommand};

pub mod assignments;
use assignments::{AssignmentsCommand, GradesCommand};
pub mod config;
use config::ConfigCommands;
pub mod watch;
use watch::{CheckCommand, WatchCommand};

#[derive(Debug, Parser)]
#[command(version, author)]
#[command(rename_all = "kebab")]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    pub fn execute(self, config: Config) -> Result<()> {
        self.command.execute(config)
    }
}

impl Default for Cli {
    fn default() -> Self {
        Self::parse()
    }
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum Commands {
    /// List upcoming assignments that haven't been submitted.
    #[command(aliases = ["a", "ls"])]
    Assignments(AssignmentsCommand),
    /// Show current grades.
    #[command(alias = "g")]
    Grades(GradesCommand),
    /// Fetch once and send any notifications that are due.
    Check(CheckCommand),
    /// Keep refreshing in the background and notify as deadlines approach.
    Watch(WatchCommand),
    /// Inspect or change the configuration.
    #[command(subcommand)]
    Config(ConfigCommands),
}

pub trait ExecutableCommand {
    fn execute(self, config: Config) -> Result<()>;
}

impl ExecutableCommand for Commands {
    fn execute(self, config: Config) -> Result<()> {
        match self {
            Self::Assignments(cmd) => cmd.execute(config),
            Self::Grades(cmd) => cmd.execute(config),
            Self::Check(cmd) => cmd.execute(config),
            Self::Watch(cmd) => cmd.execute(config),
            Self::Config(cmd) => cmd.execute(config),
        }
    }
}

pub(crate) fn fetcher(config: &Config) -> Result<Fetcher<CanvasClient>> {
    Ok(Fetcher::new(
        CanvasClient::from_config(config)?,
        config.fetch_window(),
    ))
}

pub(crate) fn scheduler(
    config: &Config,
    dry_run: bool,
) -> Result<NotificationScheduler<CanvasClient, Box<dyn Notifier>>> {
    let notifier: Box<dyn Notifier> = if dry_run {
        Box::new(LogNotifier)
    } else {
        Box::new(DesktopNotifier)
    };
    Ok(NotificationScheduler::new(
        fetcher(config)?,
        notifier,
        config.scheduler_settings(),
    ))
}
