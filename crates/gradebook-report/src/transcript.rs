//! Transcript listing every attempt plus the final (best) result.

use std::path::{Path, PathBuf};

use anyhow::Result;
use chrono::NaiveDate;

use gradebook_core::model::Student;
use gradebook_core::GradebookError;

use crate::{attempt_label, banner, report_file_name, rule, write_report};

pub fn transcript_file_name(student_id: &str, date: NaiveDate) -> String {
    report_file_name("Transcript", student_id, date)
}

/// Render the transcript text. Requires at least one attempt.
pub fn render_transcript(
    student: &Student,
    generated_on: NaiveDate,
) -> gradebook_core::Result<String> {
    let best = student.best_attempt().ok_or_else(|| {
        GradebookError::Validation(format!(
            "student {} has no attempts to put on a transcript",
            student.id()
        ))
    })?;

    let mut out = banner("ACADEMIC TRANSCRIPT");
    out.push_str(&format!("Generated : {}\n\n", generated_on.format("%Y-%m-%d")));
    out.push_str(&format!("Student ID: {}\n", student.id()));
    out.push_str(&format!("Name      : {}\n", student.name()));
    out.push_str(&format!("Email     : {}\n\n", student.email().unwrap_or("-")));

    out.push_str("ATTEMPT HISTORY\n");
    out.push_str(&format!(
        "{:<9}{:<12}{:>9}  {:<7}{:<6}\n",
        "Attempt", "Date", "Average", "Grade", "Status"
    ));
    out.push_str(&rule());
    for attempt in student.attempts() {
        out.push_str(&format!(
            "{:<9}{:<12}{:>9.2}  {:<7}{:<6}\n",
            attempt.sequence_number(),
            attempt.timestamp().format("%Y-%m-%d").to_string(),
            attempt.average(),
            attempt.grade().to_string(),
            attempt.status().to_string(),
        ));
    }
    out.push_str(&rule());
    out.push('\n');

    out.push_str("FINAL RESULT (best attempt)\n");
    out.push_str(&format!(
        "Attempt   : {} ({})\n",
        best.sequence_number(),
        attempt_label(best)
    ));
    out.push_str(&format!("Average   : {:.2}\n", best.average()));
    out.push_str(&format!("Grade     : {}\n", best.grade()));
    out.push_str(&format!("Status    : {}\n", best.status()));
    out.push_str(&"=".repeat(crate::RULE_WIDTH));
    out.push('\n');

    Ok(out)
}

/// Render and write a transcript into `dir`, returning the file path.
pub fn write_transcript(
    student: &Student,
    dir: &Path,
    generated_on: NaiveDate,
) -> Result<PathBuf> {
    let content = render_transcript(student, generated_on)?;
    write_report(
        dir,
        &transcript_file_name(student.id(), generated_on),
        &content,
    )
}
