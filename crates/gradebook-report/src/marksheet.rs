//! Marksheet for a student's latest attempt.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;

use gradebook_core::model::Student;
use gradebook_core::GradebookError;

use crate::{attempt_label, banner, report_file_name, rule, write_report};

/// File name of a marksheet generated on `date`.
pub fn marksheet_file_name(student_id: &str, date: NaiveDate) -> String {
    report_file_name("Marksheet", student_id, date)
}

/// Render the marksheet text for the student's latest attempt.
pub fn render_marksheet(
    student: &Student,
    generated_on: NaiveDate,
) -> gradebook_core::Result<String> {
    let attempt = student.latest_attempt().ok_or_else(|| {
        GradebookError::Validation(format!(
            "student {} has no attempts to put on a marksheet",
            student.id()
        ))
    })?;

    let mut out = banner("OFFICIAL MARKSHEET");
    out.push_str(&format!("Generated : {}\n\n", generated_on.format("%Y-%m-%d")));
    out.push_str(&format!("Student ID: {}\n", student.id()));
    out.push_str(&format!("Name      : {}\n", student.name()));
    out.push_str(&format!("Attempt   : {}\n", attempt_label(attempt)));
    out.push_str(&format!(
        "Exam date : {}\n\n",
        attempt.timestamp().format("%Y-%m-%d")
    ));

    out.push_str(&format!("{:<20}{:>8}\n", "Subject", "Mark"));
    out.push_str(&rule());
    for (subject, mark) in attempt.marks().iter() {
        out.push_str(&format!("{:<20}{:>8}\n", subject.name(), mark));
    }
    out.push_str(&rule());
    out.push_str(&format!("{:<20}{:>8.2}\n", "Average", attempt.average()));
    out.push_str(&format!("{:<20}{:>8}\n", "Grade", attempt.grade().to_string()));
    out.push_str(&format!("{:<20}{:>8}\n", "Status", attempt.status().to_string()));
    out.push_str(&"=".repeat(crate::RULE_WIDTH));
    out.push('\n');

    Ok(out)
}

/// Render and write a marksheet into `dir`, returning the file path.
pub fn write_marksheet(student: &Student, dir: &Path, generated_on: NaiveDate) -> Result<PathBuf> {
    let content = render_marksheet(student, generated_on)?;
    write_report(
        dir,
        &marksheet_file_name(student.id(), generated_on),
        &content,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};
    use gradebook_core::model::{Attempt, Marks};

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
    }

    fn student() -> Student {
        let tz = FixedOffset::east_opt(0).unwrap();
        let mut s = Student::new("48213907", "Ada Lovelace", None).unwrap();
        s.add_attempt(Attempt::at(
            Marks::new([35, 42, 28, 39, 51, 30]).unwrap(),
            1,
            tz.with_ymd_and_hms(2024, 1, 15, 9, 0, 0).unwrap(),
        ));
        s.add_attempt(Attempt::at(
            Marks::new([85, 90, 78, 92, 88, 76]).unwrap(),
            2,
            tz.with_ymd_and_hms(2024, 6, 3, 9, 0, 0).unwrap(),
        ));
        s
    }

    #[test]
    fn renders_latest_attempt_in_subject_order() {
        let text = render_marksheet(&student(), date()).unwrap();
        assert!(text.contains("OFFICIAL MARKSHEET"));
        assert!(text.contains("Generated : 2024-06-10"));
        assert!(text.contains("Resit 1"));
        assert!(text.contains("Exam date : 2024-06-03"));
        assert!(text.contains("84.83"));

        let subjects = ["Mathematics", "Physics", "Chemistry", "Biology", "English", "Art"];
        let positions: Vec<usize> = subjects.iter().map(|s| text.find(s).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));

        let maths = text.lines().find(|l| l.starts_with("Mathematics")).unwrap();
        assert!(maths.trim_end().ends_with("85"));
    }

    #[test]
    fn student_without_attempts_is_rejected() {
        let s = Student::new("10000000", "New Student", None).unwrap();
        let err = render_marksheet(&s, date()).unwrap_err();
        assert!(matches!(err, GradebookError::Validation(_)));
    }

    #[test]
    fn writes_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_marksheet(&student(), dir.path(), date()).unwrap();
        assert_eq!(
            path.file_name().unwrap().to_str().unwrap(),
            "Marksheet_48213907_20240610.txt"
        );
        let content = std::fs::read_to_string(&path).unwrap();
        assert!(content.contains("Ada Lovelace"));
    }

    #[test]
    fn missing_directory_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = write_marksheet(&student(), &dir.path().join("nope"), date()).unwrap_err();
        assert!(err.to_string().contains("failed to write report"));
    }
}
