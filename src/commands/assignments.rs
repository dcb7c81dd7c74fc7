use super::{ExecutableCommand, fetcher};
use crate::{
    Config, Error, Result, Snapshot,
    util::{format_local, now},
};
use clap::Args;
use cli_table::{Cell, CellStruct, Style, Table, TableStruct};
use time::OffsetDateTime;

#[derive(Debug, Args)]
pub struct AssignmentsCommand {
    #[arg(short, long)]
    /// Only show this course's assignments.
    pub course: Option<String>,
    #[arg(short, long)]
    /// Include assignments that were already submitted.
    pub all: bool,
}

impl ExecutableCommand for AssignmentsCommand {
    fn execute(self, config: Config) -> Result<()> {
        let snapshot = fetcher(&config)?.fetch();
        let table = assignments_table(&snapshot, self.course.as_deref(), self.all)?;
        cli_table::print_stdout(table)?;
        Ok(())
    }
}

#[derive(Debug, Args)]
pub struct GradesCommand {
    #[arg(short, long)]
    /// Only show this course's grade.
    pub course: Option<String>,
}

impl ExecutableCommand for GradesCommand {
    fn execute(self, config: Config) -> Result<()> {
        let snapshot = fetcher(&config)?.fetch();
        for line in grade_lines(&snapshot, self.course.as_deref())? {
            println!("{line}");
        }
        Ok(())
    }
}

fn assignment_rows(
    snapshot: &Snapshot,
    course: Option<&str>,
    include_submitted: bool,
    now: OffsetDateTime,
) -> Result<Vec<Vec<CellStruct>>> {
    let assignments: Vec<_> = match course {
        Some(name) => snapshot
            .course(name)
            .ok_or_else(|| Error::unknown_course(name))?
            .iter()
            .collect(),
        None => snapshot.all_assignments().collect(),
    };
    Ok(assignments
        .into_iter()
        .filter(|a| include_submitted || !a.is_submitted())
        .map(|a| {
            vec![
                a.course().cell(),
                a.name().cell(),
                format_local(*a.due_at()).cell(),
                a.remaining_display(now).cell(),
                a.points_possible().cell(),
                (if a.is_submitted() { "yes" } else { "no" }).cell(),
                a.html_url().cell(),
            ]
        })
        .collect())
}

/// Unsubmitted assignments (everything, with `include_submitted`) as a table.
pub fn assignments_table(
    snapshot: &Snapshot,
    course: Option<&str>,
    include_submitted: bool,
) -> Result<TableStruct> {
    let rows = assignment_rows(snapshot, course, include_submitted, now())?;
    let table = if rows.is_empty() {
        if snapshot.is_empty() {
            vec![vec!["Nothing fetched (the last refresh may have failed)".cell()]].table()
        } else {
            vec![vec!["Nothing due".cell()]].table()
        }
    } else {
        rows.table().title(vec![
            "Course".cell().bold(true),
            "Assignment".cell().bold(true),
            "Due".cell().bold(true),
            "Due in".cell().bold(true),
            "Points".cell().bold(true),
            "Submitted".cell().bold(true),
            "Link".cell().bold(true),
        ])
    };
    Ok(table)
}

/// One `course: grade` line per course, or just the one course's grade.
pub fn grade_lines(snapshot: &Snapshot, course: Option<&str>) -> Result<Vec<String>> {
    match course {
        Some(name) => {
            if snapshot.course(name).is_none() {
                return Err(Error::unknown_course(name));
            }
            Ok(vec![format!("Current Grade: {}", snapshot.grade(name))])
        }
        None => Ok(snapshot
            .grades()
            .iter()
            .map(|(course, grade)| format!("{course}: {grade}"))
            .collect()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assignment::{AssignmentBuilder, GradeRecord};
    use pretty_assertions::assert_eq;
    use std::collections::BTreeMap;
    use time::{Duration, macros::datetime};

    const NOW: OffsetDateTime = datetime!(2024-10-01 12:00 UTC);

    fn snapshot() -> Snapshot {
        let assignment = |course: &str, name: &str, submitted: bool| {
            AssignmentBuilder::default()
                .course(course)
                .name(name)
                .due_at(NOW + Duration::days(1))
                .points_possible(20.0)
                .submitted(submitted)
                .build()
                .unwrap()
        };
        Snapshot::new(
            NOW,
            BTreeMap::from([
                (
                    String::from("Biology"),
                    vec![
                        assignment("Biology", "Lab 1", false),
                        assignment("Biology", "Lab 2", true),
                    ],
                ),
                (
                    String::from("Calculus"),
                    vec![assignment("Calculus", "Quiz", false)],
                ),
            ]),
            BTreeMap::from([
                (String::from("Biology"), GradeRecord::Score(93.5)),
                (String::from("Calculus"), GradeRecord::NotAvailable),
            ]),
        )
    }

    #[test]
    fn rows_hide_submitted_by_default() {
        let snapshot = snapshot();
        assert_eq!(assignment_rows(&snapshot, None, false, NOW).unwrap().len(), 2);
        assert_eq!(assignment_rows(&snapshot, None, true, NOW).unwrap().len(), 3);
        assert_eq!(
            assignment_rows(&snapshot, Some("Biology"), false, NOW)
                .unwrap()
                .len(),
            1
        );
    }

    #[test]
    fn unknown_course_is_an_error() {
        let snapshot = snapshot();
        assert!(matches!(
            assignment_rows(&snapshot, Some("History"), false, NOW),
            Err(Error::UnknownCourse { .. })
        ));
        assert!(grade_lines(&snapshot, Some("History")).is_err());
    }

    #[test]
    fn grades() {
        let snapshot = snapshot();
        assert_eq!(
            grade_lines(&snapshot, None).unwrap(),
            vec!["Biology: 93.5%", "Calculus: N/A"]
        );
        assert_eq!(
            grade_lines(&snapshot, Some("Biology")).unwrap(),
            vec!["Current Grade: 93.5%"]
        );
    }
}
