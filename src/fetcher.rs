use crate::{
    Result,
    assignment::{Assignment, AssignmentBuilder, GradeRecord, Snapshot},
    remote::{Course, EnrollmentRole, RemoteAssignment, RemoteClient, UserId},
    util::now,
};
use log::{debug, error, info, warn};
use std::collections::BTreeMap;
use time::{Duration, OffsetDateTime};

/// Which courses and assignments are worth looking at, relative to "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchWindow {
    /// Courses that started longer ago than this are skipped.
    pub lookback: Duration,
    /// Assignments due further out than this are skipped.
    pub lookahead: Duration,
}

impl Default for FetchWindow {
    fn default() -> Self {
        Self {
            lookback: Duration::days(150),
            lookahead: Duration::days(90),
        }
    }
}

// A window reaching past the representable range has no bound on that side.
impl FetchWindow {
    pub fn includes_course(&self, course: &Course, now: OffsetDateTime) -> bool {
        if let Some(start) = course.effective_start()
            && now
                .checked_sub(self.lookback)
                .is_some_and(|earliest| start < earliest)
        {
            return false;
        }
        if let Some(end) = course.effective_end()
            && end < now
        {
            return false;
        }
        true
    }

    #[inline]
    pub fn includes_due(&self, due: OffsetDateTime, now: OffsetDateTime) -> bool {
        now <= due
            && now
                .checked_add(self.lookahead)
                .is_none_or(|latest| due <= latest)
    }
}

/// Pulls one [`Snapshot`] worth of courses, assignments and grades from a [`RemoteClient`].
#[derive(Debug)]
pub struct Fetcher<C> {
    client: C,
    window: FetchWindow,
}

impl<C: RemoteClient> Fetcher<C> {
    pub fn new(client: C, window: FetchWindow) -> Self {
        Self { client, window }
    }

    #[inline]
    pub fn client(&self) -> &C {
        &self.client
    }

    #[inline]
    pub fn window(&self) -> FetchWindow {
        self.window
    }

    pub fn fetch(&self) -> Snapshot {
        self.fetch_at(now())
    }

    /// Never fails: if anything goes wrong the partial results are thrown away and an empty
    /// snapshot is returned instead.
    pub fn fetch_at(&self, now: OffsetDateTime) -> Snapshot {
        match self.try_fetch(now) {
            Ok(snapshot) => snapshot,
            Err(error) => {
                error!("Error fetching data: {error}");
                Snapshot::empty(now)
            }
        }
    }

    fn try_fetch(&self, now: OffsetDateTime) -> Result<Snapshot> {
        let courses = self.client.list_active_courses(true)?;
        let user_id = self.client.get_current_user_id()?;
        let mut assignments_by_course = BTreeMap::new();
        let mut grades_by_course = BTreeMap::new();
        for course in courses.iter() {
            if !self.window.includes_course(course, now) {
                debug!("Skipping course outside the window: {}", course.name);
                continue;
            }
            let assignments = self.course_assignments(course, user_id, now)?;
            if assignments.is_empty() {
                debug!("Skipping course with nothing due: {}", course.name);
                continue;
            }
            grades_by_course.insert(course.name.clone(), self.current_grade(course, user_id));
            assignments_by_course.insert(course.name.clone(), assignments);
        }
        info!(
            "Fetched {} assignment(s) across {} course(s)",
            assignments_by_course.values().map(Vec::len).sum::<usize>(),
            assignments_by_course.len()
        );
        Ok(Snapshot::new(now, assignments_by_course, grades_by_course))
    }

    fn course_assignments(
        &self,
        course: &Course,
        user_id: UserId,
        now: OffsetDateTime,
    ) -> Result<Vec<Assignment>> {
        self.client
            .list_assignments(course)?
            .into_iter()
            .filter_map(|remote| {
                let due = remote.due_at?;
                self.window
                    .includes_due(due, now)
                    .then_some((remote, due))
            })
            .map(|(remote, due)| -> Result<Assignment> {
                let submitted = self.submitted(&remote, user_id);
                Ok(AssignmentBuilder::default()
                    .course(course.name.clone())
                    .name(remote.name)
                    .due_at(due)
                    .points_possible(remote.points_possible.unwrap_or(0.0))
                    .submitted(submitted)
                    .html_url(remote.html_url)
                    .build()?)
            })
            .collect()
    }

    /// Anything short of a submission we can see counts as not submitted.
    fn submitted(&self, assignment: &RemoteAssignment, user_id: UserId) -> bool {
        match self.client.get_submission(assignment, user_id) {
            Ok(submission) => submission.is_submitted(),
            Err(error) => {
                warn!(
                    "Could not check submission for {}; assuming not submitted: {error}",
                    assignment.name
                );
                false
            }
        }
    }

    fn current_grade(&self, course: &Course, user_id: UserId) -> GradeRecord {
        match self.client.get_enrollments(course, EnrollmentRole::Student) {
            Ok(enrollments) => enrollments
                .into_iter()
                .find(|e| e.user_id == user_id)
                .and_then(|e| e.current_score())
                .into(),
            Err(error) => {
                warn!("Could not read grade for {}: {error}", course.name);
                GradeRecord::NotAvailable
            }
        }
    }
}
