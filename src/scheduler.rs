use crate::{
    assignment::{Assignment, NotificationKey, NotifiedSet, Snapshot},
    config::Threshold,
    fetcher::Fetcher,
    notifier::Notifier,
    remote::RemoteClient,
    util::{format_due_in, hours_until, now},
};
use log::{debug, info, warn};
use std::{collections::BTreeSet, sync::mpsc::Sender, thread, time::Duration};
use time::OffsetDateTime;

pub const NOTIFICATION_TITLE: &str = "Assignment Due Soon!";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchedulerSettings {
    /// How long to sleep between cycles.
    pub interval: Duration,
    pub thresholds: BTreeSet<Threshold>,
}

impl Default for SchedulerSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_secs(60 * 60),
            thresholds: BTreeSet::from([Threshold::Twelve]),
        }
    }
}

/// One notification that fired during a cycle.
#[derive(Debug, Clone, PartialEq)]
pub struct NotificationEvent {
    pub key: NotificationKey,
    pub hours_remaining: f64,
    pub title: String,
    pub body: String,
}

impl NotificationEvent {
    fn new(course: &str, assignment: &Assignment, threshold: Threshold, hours: f64) -> Self {
        Self {
            key: NotificationKey::new(course, assignment.name().as_str(), threshold),
            hours_remaining: hours,
            title: String::from(NOTIFICATION_TITLE),
            body: format!(
                "{course}: {} is due in {}.",
                assignment.name(),
                format_due_in(hours)
            ),
        }
    }
}

/// Periodically refetches everything and notifies about unsubmitted assignments as they cross
/// the configured thresholds. Each (assignment, threshold) pair fires at most once for the
/// lifetime of the scheduler.
pub struct NotificationScheduler<C, N> {
    fetcher: Fetcher<C>,
    notifier: N,
    settings: SchedulerSettings,
    notified: NotifiedSet,
    publisher: Option<Sender<Snapshot>>,
}

impl<C: RemoteClient, N: Notifier> NotificationScheduler<C, N> {
    pub fn new(fetcher: Fetcher<C>, notifier: N, settings: SchedulerSettings) -> Self {
        Self {
            fetcher,
            notifier,
            settings,
            notified: NotifiedSet::new(),
            publisher: None,
        }
    }

    /// Starts from an existing set of notifications that shouldn't fire again.
    pub fn with_notified(mut self, notified: NotifiedSet) -> Self {
        self.notified = notified;
        self
    }

    /// Every cycle's snapshot gets sent here once it's complete.
    pub fn with_publisher(mut self, publisher: Sender<Snapshot>) -> Self {
        self.publisher = Some(publisher);
        self
    }

    #[inline]
    pub fn notified(&self) -> &NotifiedSet {
        &self.notified
    }

    #[inline]
    pub fn settings(&self) -> &SchedulerSettings {
        &self.settings
    }

    /// Runs until the process exits. A failed fetch just means an empty cycle.
    pub fn run(mut self) {
        info!(
            "Checking for due assignments every {}s",
            self.settings.interval.as_secs()
        );
        loop {
            self.run_cycle();
            thread::sleep(self.settings.interval);
        }
    }

    pub fn run_cycle(&mut self) -> Vec<NotificationEvent> {
        self.run_cycle_at(now())
    }

    pub fn run_cycle_at(&mut self, now: OffsetDateTime) -> Vec<NotificationEvent> {
        let snapshot = self.fetcher.fetch_at(now);
        let events = self.scan(&snapshot, now);
        self.publish(snapshot);
        events
    }

    /// Fires every notification in `snapshot` that's due and hasn't fired yet.
    pub fn scan(&mut self, snapshot: &Snapshot, now: OffsetDateTime) -> Vec<NotificationEvent> {
        let mut events = Vec::new();
        for (course, assignment) in snapshot.pending() {
            let hours = hours_until(*assignment.due_at(), now);
            for &threshold in self.settings.thresholds.iter() {
                if !(hours > 0.0 && hours <= threshold.hours() as f64) {
                    continue;
                }
                let event = NotificationEvent::new(course, assignment, threshold, hours);
                if !self.notified.record(event.key.clone()) {
                    continue;
                }
                // Recorded either way; a notification that failed to show isn't retried.
                if let Err(error) = self.notifier.notify(&event.title, &event.body) {
                    warn!("Could not deliver notification \"{}\": {error}", event.body);
                }
                events.push(event);
            }
        }
        debug!("Cycle fired {} notification(s)", events.len());
        events
    }

    fn publish(&mut self, snapshot: Snapshot) {
        let disconnected = self
            .publisher
            .as_ref()
            .is_some_and(|p| p.send(snapshot).is_err());
        if disconnected {
            debug!("Snapshot receiver is gone; no longer publishing");
            self.publisher = None;
        }
    }
}
