use super::ExecutableCommand;
use crate::{CONFIG_FILE_PATH, Config, Result, config::Threshold};
use clap::{Args, Subcommand};
use std::io;

fn parse_threshold(value: &str) -> std::result::Result<Threshold, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}

#[derive(Debug, Subcommand)]
#[command(rename_all = "kebab")]
pub enum ConfigCommands {
    /// Print the current configuration (the token is redacted).
    Show,
    /// Print where the configuration file lives.
    Path,
    /// Store the API token in the configuration file.
    SetToken(SetTokenCommand),
    /// Change configuration values.
    Set(SetConfigCommand),
}

impl ExecutableCommand for ConfigCommands {
    fn execute(self, config: Config) -> Result<()> {
        match self {
            Self::Show => {
                serde_norway::to_writer(io::stdout(), &config.redacted())?;
                Ok(())
            }
            Self::Path => {
                println!("{}", *CONFIG_FILE_PATH);
                Ok(())
            }
            Self::SetToken(cmd) => cmd.execute(config),
            Self::Set(cmd) => cmd.execute(config),
        }
    }
}

#[derive(Debug, Args)]
pub struct SetTokenCommand {
    #[arg()]
    /// A Canvas access token (Account > Settings > New Access Token).
    pub token: String,
}

impl ExecutableCommand for SetTokenCommand {
    fn execute(self, mut config: Config) -> Result<()> {
        config.set_api_token(self.token.trim());
        config.save()?;
        println!("Saved token to {}", *CONFIG_FILE_PATH);
        Ok(())
    }
}

#[derive(Debug, Args)]
#[command(rename_all = "kebab")]
pub struct SetConfigCommand {
    #[arg(long)]
    /// Base URL of the Canvas instance.
    pub api_url: Option<String>,
    #[arg(long)]
    /// Skip courses that started more than this many days ago.
    pub lookback_days: Option<u32>,
    #[arg(long)]
    /// Only show assignments due within this many days.
    pub lookahead_days: Option<u32>,
    #[arg(long)]
    /// Seconds between refreshes while watching.
    pub refresh_interval: Option<u64>,
    #[arg(short, long = "threshold", value_parser = parse_threshold)]
    /// Hours before a due date to notify at (1, 3, 6, 12 or 24). Repeat for several.
    pub thresholds: Vec<Threshold>,
}

impl SetConfigCommand {
    fn apply(self, config: &mut Config) {
        if let Some(url) = self.api_url {
            config.set_api_url(url);
        }
        if let Some(days) = self.lookback_days {
            config.set_lookback_days(days);
        }
        if let Some(days) = self.lookahead_days {
            config.set_lookahead_days(days);
        }
        if let Some(seconds) = self.refresh_interval {
            config.set_refresh_interval(seconds);
        }
        if !self.thresholds.is_empty() {
            config.set_notification_thresholds(self.thresholds);
        }
    }
}

impl ExecutableCommand for SetConfigCommand {
    fn execute(self, mut config: Config) -> Result<()> {
        self.apply(&mut config);
        config.save()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Cli;
    use clap::{CommandFactory, Parser};
    use pretty_assertions::assert_eq;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn set_only_touches_given_values() {
        let cli = Cli::try_parse_from([
            "canvas-tracker",
            "config",
            "set",
            "--lookahead-days",
            "14",
            "-t",
            "1",
            "-t",
            "24",
        ])
        .unwrap();
        let mut config = Config::default();
        let crate::commands::Commands::Config(ConfigCommands::Set(cmd)) = cli.command else {
            panic!("parsed the wrong command");
        };
        cmd.apply(&mut config);
        assert_eq!(*config.lookahead_days(), 14);
        assert_eq!(*config.lookback_days(), 150);
        assert_eq!(
            config.notification_thresholds().iter().copied().collect::<Vec<_>>(),
            vec![Threshold::One, Threshold::TwentyFour]
        );
    }

    #[test]
    fn rejects_unsupported_threshold() {
        assert!(
            Cli::try_parse_from(["canvas-tracker", "config", "set", "-t", "2"]).is_err()
        );
    }
}
