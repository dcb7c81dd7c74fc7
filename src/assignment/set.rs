use crate::config::Threshold;
use std::{collections::BTreeSet, iter::FromIterator, ops::Deref};

/// Identifies one (assignment, threshold) notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NotificationKey {
    pub course: String,
    pub assignment: String,
    pub threshold: Threshold,
}

impl NotificationKey {
    pub fn new<C, A>(course: C, assignment: A, threshold: Threshold) -> Self
    where
        C: Into<String>,
        A: Into<String>,
    {
        Self {
            course: course.into(),
            assignment: assignment.into(),
            threshold,
        }
    }
}

/// Every notification that has already fired. Keys are only ever added.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotifiedSet(BTreeSet<NotificationKey>);

impl NotifiedSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `key`, returning `true` if it wasn't already there.
    #[inline]
    pub fn record(&mut self, key: NotificationKey) -> bool {
        self.0.insert(key)
    }
}

impl FromIterator<NotificationKey> for NotifiedSet {
    fn from_iter<T>(iter: T) -> Self
    where
        T: IntoIterator<Item = NotificationKey>,
    {
        Self(iter.into_iter().collect())
    }
}

impl Deref for NotifiedSet {
    type Target = BTreeSet<NotificationKey>;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}
