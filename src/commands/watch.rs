use super::{ExecutableCommand, assignments::assignments_table, fetcher, scheduler};
use crate::{Config, Result, Snapshot, util::format_local};
use clap::Args;
use log::{debug, info, warn};
use std::{
    io::{self, BufRead},
    sync::mpsc::{self, Receiver, RecvTimeoutError, Sender},
    thread,
    time::Duration,
};

const INPUT_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Args)]
pub struct CheckCommand {
    #[arg(short = 'n', long)]
    /// Log notifications instead of showing them.
    pub dry_run: bool,
}

impl ExecutableCommand for CheckCommand {
    fn execute(self, config: Config) -> Result<()> {
        let mut scheduler = scheduler(&config, self.dry_run)?;
        let events = scheduler.run_cycle();
        println!("Sent {} notification(s).", events.len());
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct WatchCommand {
    #[arg(short = 'n', long)]
    /// Log notifications instead of showing them.
    pub dry_run: bool,
    #[arg(short, long)]
    /// Include assignments that were already submitted.
    pub all: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Input {
    Refresh,
    Quit,
}

fn parse_input(line: &str) -> Input {
    match line.trim() {
        "q" | "quit" | "exit" => Input::Quit,
        _ => Input::Refresh,
    }
}

fn spawn_input_reader(inputs: Sender<Input>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let Ok(line) = line else { break };
            if inputs.send(parse_input(&line)).is_err() {
                break;
            }
        }
        debug!("Stopped reading input");
    });
}

impl WatchCommand {
    fn render(&self, snapshot: &Snapshot) -> Result<()> {
        println!();
        println!("Refreshed at {}", format_local(*snapshot.fetched_at()));
        cli_table::print_stdout(assignments_table(snapshot, None, self.all)?)?;
        println!("Press Enter to refresh, q to quit.");
        Ok(())
    }

    /// Runs on the main thread: draws whatever snapshot arrives and handles key presses.
    fn interact(
        &self,
        config: &Config,
        snapshots: Receiver<Snapshot>,
        publisher: Sender<Snapshot>,
        inputs: Receiver<Input>,
    ) -> Result<()> {
        let mut reading_input = true;
        loop {
            if reading_input {
                match inputs.recv_timeout(INPUT_POLL) {
                    Ok(Input::Quit) => break,
                    Ok(Input::Refresh) => {
                        info!("Manual refresh requested");
                        // Not coordinated with the periodic refresh; both may run at once.
                        let fetcher = fetcher(config)?;
                        let publisher = publisher.clone();
                        thread::spawn(move || publisher.send(fetcher.fetch()).ok());
                    }
                    Err(RecvTimeoutError::Timeout) => {}
                    Err(RecvTimeoutError::Disconnected) => reading_input = false,
                }
                while let Ok(snapshot) = snapshots.try_recv() {
                    self.render(&snapshot)?;
                }
            } else {
                match snapshots.recv() {
                    Ok(snapshot) => self.render(&snapshot)?,
                    Err(_) => break,
                }
            }
        }
        Ok(())
    }
}

impl ExecutableCommand for WatchCommand {
    fn execute(self, config: Config) -> Result<()> {
        let (publisher, snapshots) = mpsc::channel();
        let scheduler = scheduler(&config, self.dry_run)?.with_publisher(publisher.clone());
        thread::Builder::new()
            .name(String::from("refresh"))
            .spawn(move || scheduler.run())?;
        let (inputs_tx, inputs) = mpsc::channel();
        spawn_input_reader(inputs_tx);
        if let Err(error) = self.interact(&config, snapshots, publisher, inputs) {
            warn!("Stopped watching: {error}");
            return Err(error);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_commands() {
        assert_eq!(parse_input(""), Input::Refresh);
        assert_eq!(parse_input("r\n"), Input::Refresh);
        assert_eq!(parse_input(" q "), Input::Quit);
        assert_eq!(parse_input("quit"), Input::Quit);
    }
}
