#![cfg_attr(docsrs, feature(doc_cfg))]

#[macro_use]
extern crate lazy_static;

use camino::Utf8PathBuf;

pub mod assignment;
pub use assignment::{Assignment, GradeRecord, NotificationKey, NotifiedSet, Snapshot};
pub mod config;
pub use config::{Config, Threshold};
pub mod commands;
pub use commands::Cli;
pub(crate) mod error;
pub use error::{Error, Result};
pub mod fetcher;
pub use fetcher::{FetchWindow, Fetcher};
pub mod notifier;
pub use notifier::{DesktopNotifier, Notifier};
pub mod remote;
pub use remote::{CanvasClient, RemoteClient};
pub mod scheduler;
pub use scheduler::{NotificationEvent, NotificationScheduler, SchedulerSettings};
pub mod util;

lazy_static! {
    pub static ref CONFIG_FILE_PATH: Utf8PathBuf = {
        let mut path = dirs::config_dir()
            .and_then(|dir| Utf8PathBuf::try_from(dir).ok())
            .unwrap_or_default();
        path.push("canvas-tracker.yaml");
        path
    };
}
