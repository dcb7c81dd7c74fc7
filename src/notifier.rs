use crate::Result;
use log::info;
use notify_rust::{Notification, Timeout};

pub const APP_NAME: &str = "canvas-tracker";

/// Where due-soon notifications go.
#[cfg_attr(test, mockall::automock)]
pub trait Notifier: Send {
    fn notify(&self, title: &str, body: &str) -> Result<()>;
}

impl<N: Notifier + ?Sized> Notifier for Box<N> {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        (**self).notify(title, body)
    }
}

/// Shows a desktop notification.
#[derive(Debug, Clone, Default)]
pub struct DesktopNotifier;

impl Notifier for DesktopNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        Notification::new()
            .appname(APP_NAME)
            .summary(title)
            .body(body)
            .timeout(Timeout::Milliseconds(10_000))
            .show()?;
        Ok(())
    }
}

/// Writes notifications to the log instead, for dry runs.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, title: &str, body: &str) -> Result<()> {
        info!("{title} {body}");
        Ok(())
    }
}
