//! The course-management API, as far as the tracker cares about it.

use crate::Result;
use serde::Deserialize;
use strum::AsRefStr;
use time::OffsetDateTime;

mod canvas;
pub use canvas::CanvasClient;

pub type UserId = u64;

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Term {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Course {
    pub id: u64,
    // Courses that are restricted by date come back without a name.
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub start_at: Option<OffsetDateTime>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub end_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub term: Option<Term>,
}

impl Course {
    /// When the course starts, falling back to its term's start.
    pub fn effective_start(&self) -> Option<OffsetDateTime> {
        self.start_at
            .or_else(|| self.term.as_ref().and_then(|t| t.start_at))
    }

    /// When the course ends, falling back to its term's end.
    pub fn effective_end(&self) -> Option<OffsetDateTime> {
        self.end_at.or_else(|| self.term.as_ref().and_then(|t| t.end_at))
    }
}

/// An assignment as the remote describes it, before any filtering.
#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct RemoteAssignment {
    pub id: u64,
    pub course_id: u64,
    #[serde(default)]
    pub name: String,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub due_at: Option<OffsetDateTime>,
    #[serde(default)]
    pub points_possible: Option<f64>,
    #[serde(default)]
    pub html_url: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Submission {
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub submitted_at: Option<OffsetDateTime>,
}

impl Submission {
    #[inline]
    pub fn is_submitted(&self) -> bool {
        self.submitted_at.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct EnrollmentGrades {
    #[serde(default)]
    pub current_score: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Default)]
pub struct Enrollment {
    pub user_id: UserId,
    #[serde(default)]
    pub grades: Option<EnrollmentGrades>,
}

impl Enrollment {
    pub fn current_score(&self) -> Option<f64> {
        self.grades.as_ref().and_then(|g| g.current_score)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, AsRefStr)]
pub enum EnrollmentRole {
    #[strum(serialize = "StudentEnrollment")]
    Student,
}

#[derive(Debug, Clone, Deserialize)]
pub(crate) struct User {
    pub id: UserId,
}

/// Everything the fetcher needs from the remote. Every call can fail.
#[cfg_attr(test, mockall::automock)]
pub trait RemoteClient: Send {
    fn list_active_courses(&self, include_term: bool) -> Result<Vec<Course>>;

    /// Assignments for `course`, ordered by due date.
    fn list_assignments(&self, course: &Course) -> Result<Vec<RemoteAssignment>>;

    fn get_submission(&self, assignment: &RemoteAssignment, user_id: UserId)
    -> Result<Submission>;

    fn get_enrollments(&self, course: &Course, role: EnrollmentRole) -> Result<Vec<Enrollment>>;

    fn get_current_user_id(&self) -> Result<UserId>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use time::macros::datetime;

    #[test]
    fn course_falls_back_to_term_dates() {
        let json = r#"{
            "id": 7,
            "name": "Biology 101",
            "start_at": null,
            "end_at": "2024-12-15T06:59:59Z",
            "term": {"start_at": "2024-08-20T07:00:00Z", "end_at": "2025-01-01T00:00:00Z"}
        }"#;
        let course: Course = serde_json::from_str(json).unwrap();
        assert_eq!(course.effective_start(), Some(datetime!(2024-08-20 07:00 UTC)));
        assert_eq!(course.effective_end(), Some(datetime!(2024-12-15 06:59:59 UTC)));
    }

    #[test]
    fn restricted_course_deserializes() {
        let course: Course =
            serde_json::from_str(r#"{"id": 3, "access_restricted_by_date": true}"#).unwrap();
        assert_eq!(course.name, "");
        assert_eq!(course.effective_start(), None);
        assert_eq!(course.effective_end(), None);
    }

    #[test]
    fn assignment_without_points_or_due_date() {
        let json = r#"{"id": 1, "course_id": 7, "name": "Reading", "due_at": null,
            "points_possible": null, "html_url": "https://example.edu/a/1"}"#;
        let assignment: RemoteAssignment = serde_json::from_str(json).unwrap();
        assert_eq!(assignment.due_at, None);
        assert_eq!(assignment.points_possible, None);
    }

    #[test]
    fn submission_state() {
        let unsubmitted: Submission =
            serde_json::from_str(r#"{"submitted_at": null, "workflow_state": "unsubmitted"}"#)
                .unwrap();
        assert!(!unsubmitted.is_submitted());
        let submitted: Submission =
            serde_json::from_str(r#"{"submitted_at": "2024-10-01T10:00:00Z"}"#).unwrap();
        assert!(submitted.is_submitted());
    }

    #[test]
    fn enrollment_score() {
        let enrollment: Enrollment =
            serde_json::from_str(r#"{"user_id": 42, "grades": {"current_score": 88.25}}"#)
                .unwrap();
        assert_eq!(enrollment.current_score(), Some(88.25));
        assert_eq!(EnrollmentRole::Student.as_ref(), "StudentEnrollment");
    }
}
