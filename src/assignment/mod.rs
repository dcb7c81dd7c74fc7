use crate::util::format_remaining;
use derive_builder::Builder;
use getset::Getters;
use std::{
    collections::BTreeMap,
    fmt::{self, Display},
};
use time::{Duration, OffsetDateTime};

mod set;
pub use set::*;

/// A single upcoming assignment, as of one fetch.
#[derive(Debug, Clone, PartialEq, Builder, Getters)]
#[builder(setter(into))]
#[getset(get = "pub")]
pub struct Assignment {
    course: String,
    name: String,
    due_at: OffsetDateTime,
    #[builder(default)]
    points_possible: f64,
    #[builder(default)]
    submitted: bool,
    #[builder(default)]
    html_url: String,
}

impl Assignment {
    #[inline]
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    #[inline]
    pub fn remaining(&self, now: OffsetDateTime) -> Duration {
        self.due_at - now
    }

    pub fn remaining_display(&self, now: OffsetDateTime) -> String {
        format_remaining(self.remaining(now))
    }
}

/// A course's current score, when the remote has one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradeRecord {
    Score(f64),
    NotAvailable,
}

impl From<Option<f64>> for GradeRecord {
    fn from(value: Option<f64>) -> Self {
        value.map_or(Self::NotAvailable, Self::Score)
    }
}

impl Display for GradeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Score(score) => write!(f, "{score}%"),
            Self::NotAvailable => f.write_str("N/A"),
        }
    }
}

/// The complete result of one fetch cycle. Built in full before anyone else gets to see it.
///
/// An empty snapshot means "unknown", not "nothing due": failed fetches produce one too.
#[derive(Debug, Clone, PartialEq, Getters)]
#[getset(get = "pub")]
pub struct Snapshot {
    fetched_at: OffsetDateTime,
    assignments: BTreeMap<String, Vec<Assignment>>,
    grades: BTreeMap<String, GradeRecord>,
}

impl Snapshot {
    pub fn new(
        fetched_at: OffsetDateTime,
        assignments: BTreeMap<String, Vec<Assignment>>,
        grades: BTreeMap<String, GradeRecord>,
    ) -> Self {
        Self {
            fetched_at,
            assignments,
            grades,
        }
    }

    pub fn empty(fetched_at: OffsetDateTime) -> Self {
        Self::new(fetched_at, BTreeMap::new(), BTreeMap::new())
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty() && self.grades.is_empty()
    }

    pub fn course_names(&self) -> impl Iterator<Item = &str> {
        self.assignments.keys().map(String::as_str)
    }

    pub fn course<S: AsRef<str>>(&self, name: S) -> Option<&[Assignment]> {
        self.assignments.get(name.as_ref()).map(Vec::as_slice)
    }

    pub fn grade<S: AsRef<str>>(&self, course: S) -> GradeRecord {
        self.grades
            .get(course.as_ref())
            .copied()
            .unwrap_or(GradeRecord::NotAvailable)
    }

    /// Every assignment across all courses, in course order.
    pub fn all_assignments(&self) -> impl Iterator<Item = &Assignment> {
        self.assignments.values().flatten()
    }

    /// Assignments that still need to be turned in.
    pub fn pending(&self) -> impl Iterator<Item = (&str, &Assignment)> {
        self.assignments.iter().flat_map(|(course, assignments)| {
            assignments
                .iter()
                .filter(|a| !a.is_submitted())
                .map(move |a| (course.as_str(), a))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    fn assignment(course: &str, name: &str, submitted: bool) -> Assignment {
        AssignmentBuilder::default()
            .course(course)
            .name(name)
            .due_at(datetime!(2024-10-02 12:00 UTC))
            .submitted(submitted)
            .build()
            .unwrap()
    }

    #[test]
    fn grade_display() {
        assert_eq!(GradeRecord::Score(91.5).to_string(), "91.5%");
        assert_eq!(GradeRecord::NotAvailable.to_string(), "N/A");
        assert_eq!(GradeRecord::from(None), GradeRecord::NotAvailable);
        assert_eq!(GradeRecord::from(Some(80.0)), GradeRecord::Score(80.0));
    }

    #[test]
    fn pending_skips_submitted() {
        let snapshot = Snapshot::new(
            datetime!(2024-10-01 12:00 UTC),
            BTreeMap::from([
                (
                    String::from("Biology"),
                    vec![
                        assignment("Biology", "Lab 1", true),
                        assignment("Biology", "Lab 2", false),
                    ],
                ),
                (
                    String::from("Calculus"),
                    vec![assignment("Calculus", "Quiz", true)],
                ),
            ]),
            BTreeMap::new(),
        );
        let pending: Vec<_> = snapshot
            .pending()
            .map(|(course, a)| (course, a.name().as_str()))
            .collect();
        assert_eq!(pending, vec![("Biology", "Lab 2")]);
        assert_eq!(snapshot.all_assignments().count(), 3);
        assert_eq!(snapshot.grade("Biology"), GradeRecord::NotAvailable);
    }

    #[test]
    fn builder_defaults() {
        let a = assignment("Art", "Sketch", false);
        assert_eq!(*a.points_possible(), 0.0);
        assert_eq!(a.html_url(), "");
        assert_eq!(
            a.remaining_display(datetime!(2024-10-01 09:30 UTC)),
            "1d 2h 30m"
        );
    }
}
