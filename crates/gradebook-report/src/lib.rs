//! Marksheet and transcript generation for gradebook.
//!
//! Both reports are plain UTF-8 text written into their own directory, one
//! file per generation, named after the student and the generation date.

pub mod marksheet;
pub mod transcript;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDate;

use gradebook_core::model::Attempt;

pub use marksheet::{render_marksheet, write_marksheet};
pub use transcript::{render_transcript, write_transcript};

const RULE_WIDTH: usize = 60;

/// Human label for an attempt: "First attempt" or "Resit N".
pub fn attempt_label(attempt: &Attempt) -> String {
    if attempt.is_first() {
        "First attempt".to_string()
    } else {
        format!("Resit {}", attempt.sequence_number() - 1)
    }
}

/// `<prefix>_<studentId>_<YYYYMMDD>.txt`
fn report_file_name(prefix: &str, student_id: &str, date: NaiveDate) -> String {
    format!("{prefix}_{student_id}_{}.txt", date.format("%Y%m%d"))
}

/// Boxed, centered title block.
fn banner(title: &str) -> String {
    let rule = "=".repeat(RULE_WIDTH);
    format!("{rule}\n{title:^width$}\n{rule}\n", width = RULE_WIDTH)
}

fn rule() -> String {
    format!("{}\n", "-".repeat(RULE_WIDTH))
}

fn write_report(dir: &Path, file_name: &str, content: &str) -> Result<PathBuf> {
    let path = dir.join(file_name);
    std::fs::write(&path, content)
        .with_context(|| format!("failed to write report to {}", path.display()))?;
    tracing::info!("wrote {}", path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use gradebook_core::model::Marks;

    #[test]
    fn labels_first_attempt_and_resits() {
        let marks = Marks::new([50; 6]).unwrap();
        assert_eq!(attempt_label(&Attempt::new(marks, 1)), "First attempt");
        assert_eq!(attempt_label(&Attempt::new(marks, 3)), "Resit 2");
    }

    #[test]
    fn file_name_uses_compact_date() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            report_file_name("Marksheet", "48213907", date),
            "Marksheet_48213907_20240307.txt"
        );
    }

    #[test]
    fn banner_centers_title() {
        let b = banner("TITLE");
        let lines: Vec<&str> = b.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[1].trim(), "TITLE");
        assert_eq!(lines[1].len(), RULE_WIDTH);
    }
}
