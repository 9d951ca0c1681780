//! Flat-file student record store.
//!
//! Each student lives in `<dir>/<id>.txt`, one field per line:
//!
//! ```text
//! <id>
//! <name>
//! <email, or an empty line>
//! <attempt count N>
//! N times:
//!   <comma-joined marks>
//!   <average>
//!   <Pass|Fail>
//!   <grade letter>
//!   <RFC 3339 timestamp>
//!   <sequence number>
//! ```
//!
//! Writes always replace the whole file. Bulk loads skip any file that does
//! not parse, or whose name does not match the ID inside it, and keep going.

use std::fmt::Display;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use chrono::{DateTime, SecondsFormat};

use crate::error::{GradebookError, Result};
use crate::model::{Attempt, Grade, Marks, Status, Student};

/// File extension of student record files.
pub const RECORD_EXTENSION: &str = "txt";

/// id, name, email and attempt count.
const HEADER_LINES: usize = 4;

/// Reads and writes student record files in one directory.
#[derive(Debug, Clone)]
pub struct RecordStore {
    dir: PathBuf,
}

impl RecordStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Path of the record file for a student ID.
    pub fn path_for(&self, id: &str) -> PathBuf {
        self.dir.join(format!("{id}.{RECORD_EXTENSION}"))
    }

    /// Rewrite the record file for `student`.
    pub fn write(&self, student: &Student) -> Result<()> {
        let path = self.path_for(student.id());
        std::fs::write(&path, render_record(student))
            .map_err(|e| GradebookError::storage(&path, e))?;
        tracing::debug!(
            "wrote record {} ({} attempts)",
            path.display(),
            student.attempts().len()
        );
        Ok(())
    }

    /// Read a single student's record.
    pub fn read(&self, id: &str) -> Result<Student> {
        read_record_file(&self.path_for(id))
    }

    /// Load every readable record in the directory, ordered by file name.
    ///
    /// Files that fail to read or parse are logged and skipped. A missing
    /// directory yields an empty list.
    pub fn read_all(&self) -> Result<Vec<Student>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!("record directory {} does not exist", self.dir.display());
                return Ok(Vec::new());
            }
            Err(e) => return Err(GradebookError::storage(&self.dir, e)),
        };

        let mut paths: Vec<PathBuf> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file() && path.extension().is_some_and(|ext| ext == RECORD_EXTENSION)
            })
            .collect();
        paths.sort();

        let mut students = Vec::with_capacity(paths.len());
        for path in paths {
            match read_record_file(&path) {
                Ok(student) => {
                    for attempt in student.attempts() {
                        if !attempt.is_consistent() {
                            tracing::warn!(
                                "{}: attempt {} has stored results that disagree with its marks; keeping stored values",
                                path.display(),
                                attempt.sequence_number()
                            );
                        }
                    }
                    students.push(student);
                }
                Err(e) => {
                    tracing::warn!("skipping {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!(
            "loaded {} student records from {}",
            students.len(),
            self.dir.display()
        );
        Ok(students)
    }
}

fn read_record_file(path: &Path) -> Result<Student> {
    let content =
        std::fs::read_to_string(path).map_err(|e| GradebookError::storage(path, e))?;
    let student = parse_record(&content)?;
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem != student.id() {
        return Err(GradebookError::MalformedRecord {
            line: 1,
            reason: format!(
                "file is named '{stem}' but holds student ID '{}'",
                student.id()
            ),
        });
    }
    Ok(student)
}

/// Serialize a student to the record file format.
pub fn render_record(student: &Student) -> String {
    let mut out = String::new();
    out.push_str(&format!("{}\n", student.id()));
    out.push_str(&format!("{}\n", student.name()));
    out.push_str(&format!("{}\n", student.email().unwrap_or("")));
    out.push_str(&format!("{}\n", student.attempts().len()));
    for attempt in student.attempts() {
        out.push_str(&format!("{}\n", attempt.marks()));
        out.push_str(&format!("{}\n", attempt.average()));
        out.push_str(&format!("{}\n", attempt.status()));
        out.push_str(&format!("{}\n", attempt.grade()));
        out.push_str(&format!(
            "{}\n",
            attempt
                .timestamp()
                .to_rfc3339_opts(SecondsFormat::AutoSi, false)
        ));
        out.push_str(&format!("{}\n", attempt.sequence_number()));
    }
    out
}

/// Parse the record file format back into a student.
pub fn parse_record(text: &str) -> Result<Student> {
    let line_count = text.lines().count();
    if line_count < HEADER_LINES {
        return Err(GradebookError::MalformedRecord {
            line: line_count,
            reason: format!("expected at least {HEADER_LINES} lines, found {line_count}"),
        });
    }

    let mut lines = FieldReader::new(text);
    let id = lines.next_field("student id")?.trim();
    if id.is_empty() {
        return Err(lines.malformed("student id is empty"));
    }
    let name = lines.next_field("name")?;
    let email = lines.next_field("email")?;
    let mut student =
        Student::new(id, name, Some(email)).map_err(|e| lines.malformed(e.to_string()))?;

    let count: usize = lines.parse_field("attempt count")?;
    for expected in 1..=count {
        let marks: Marks = lines.parse_field("marks")?;
        let average: f64 = lines.parse_field("average")?;
        if !average.is_finite() {
            return Err(lines.malformed(format!(
                "average must be a finite number, got {average}"
            )));
        }
        let status: Status = lines.parse_field("status")?;
        let grade: Grade = lines.parse_field("grade")?;
        let raw = lines.next_field("timestamp")?;
        let timestamp = DateTime::parse_from_rfc3339(raw.trim())
            .map_err(|e| lines.malformed(format!("invalid timestamp '{raw}': {e}")))?;
        let sequence_number: u32 = lines.parse_field("sequence number")?;
        if sequence_number as usize != expected {
            return Err(lines.malformed(format!(
                "attempt {expected} is numbered {sequence_number}"
            )));
        }
        student.add_attempt(Attempt::from_stored(
            marks,
            average,
            grade,
            status,
            timestamp,
            sequence_number,
        ));
    }

    Ok(student)
}

/// Line cursor that reports the 1-based line of the last field read.
struct FieldReader<'a> {
    lines: std::str::Lines<'a>,
    line: usize,
}

impl<'a> FieldReader<'a> {
    fn new(text: &'a str) -> Self {
        Self {
            lines: text.lines(),
            line: 0,
        }
    }

    fn next_field(&mut self, what: &str) -> Result<&'a str> {
        self.line += 1;
        self.lines.next().ok_or_else(|| GradebookError::MalformedRecord {
            line: self.line,
            reason: format!("unexpected end of record, expected {what}"),
        })
    }

    fn parse_field<T>(&mut self, what: &str) -> Result<T>
    where
        T: FromStr,
        T::Err: Display,
    {
        let raw = self.next_field(what)?;
        raw.trim()
            .parse::<T>()
            .map_err(|e| self.malformed(format!("invalid {what} '{raw}': {e}")))
    }

    fn malformed(&self, reason: impl Into<String>) -> GradebookError {
        GradebookError::MalformedRecord {
            line: self.line,
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, TimeZone};

    fn sample_student() -> Student {
        let tz = FixedOffset::east_opt(2 * 3600).unwrap();
        let mut s = Student::new("48213907", "Ada Lovelace", Some("ada@example.com")).unwrap();
        s.add_attempt(Attempt::at(
            Marks::new([35, 42, 28, 39, 51, 30]).unwrap(),
            1,
            tz.with_ymd_and_hms(2024, 1, 15, 9, 30, 0).unwrap(),
        ));
        s.add_attempt(Attempt::at(
            Marks::new([85, 90, 78, 92, 88, 76]).unwrap(),
            2,
            tz.with_ymd_and_hms(2024, 6, 3, 14, 5, 12).unwrap()
                + chrono::Duration::nanoseconds(123_456_789),
        ));
        s
    }

    #[test]
    fn write_then_read_all_roundtrips() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let student = sample_student();

        store.write(&student).unwrap();
        let loaded = store.read_all().unwrap();

        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0], student);
        let second = &loaded[0].attempts()[1];
        assert_eq!(second.average(), 509.0 / 6.0);
        assert_eq!(second.timestamp(), student.attempts()[1].timestamp());
        assert_eq!(second.sequence_number(), 2);
    }

    #[test]
    fn roundtrips_student_without_email_or_attempts() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let student = Student::new("10000001", "Grace Hopper", None).unwrap();

        store.write(&student).unwrap();
        let content = std::fs::read_to_string(store.path_for("10000001")).unwrap();
        assert_eq!(content, "10000001\nGrace Hopper\n\n0\n");

        assert_eq!(store.read("10000001").unwrap(), student);
    }

    #[test]
    fn rendered_layout_is_line_per_field() {
        let text = render_record(&sample_student());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4 + 2 * 6);
        assert_eq!(lines[3], "2");
        assert_eq!(lines[4], "35,42,28,39,51,30");
        assert_eq!(lines[5], "37.5");
        assert_eq!(lines[6], "Fail");
        assert_eq!(lines[7], "F");
        assert_eq!(lines[8], "2024-01-15T09:30:00+02:00");
        assert_eq!(lines[9], "1");
        assert_eq!(lines[14], "2024-06-03T14:05:12.123456789+02:00");
    }

    #[test]
    fn rewrite_replaces_previous_content() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        let mut student = Student::new("22223333", "Alan Turing", None).unwrap();
        store.write(&student).unwrap();

        student.add_attempt(Attempt::new(Marks::new([70; 6]).unwrap(), 1));
        store.write(&student).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].attempts().len(), 1);
    }

    #[test]
    fn truncated_attempt_block_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        store.write(&sample_student()).unwrap();

        // Attempt count says 1 but the block stops after the status line.
        std::fs::write(
            dir.path().join("55554444.txt"),
            "55554444\nBroken\n\n1\n50,50,50,50,50,50\n50\nPass\n",
        )
        .unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), "48213907");

        let err = store.read("55554444").unwrap_err();
        assert!(matches!(err, GradebookError::MalformedRecord { line: 8, .. }));
    }

    #[test]
    fn short_and_garbled_files_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(dir.path().join("11111111.txt"), "11111111\nShort\n").unwrap();
        std::fs::write(
            dir.path().join("22222222.txt"),
            "22222222\nBad Count\n\nmany\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("33333333.txt"),
            "33333333\nBad Date\n\n1\n50,50,50,50,50,50\n50\nPass\nC\nyesterday\n1\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("44444444.txt"),
            "44444444\nBad Mark\n\n1\n50,50,150,50,50,50\n50\nPass\nC\n2024-01-01T00:00:00+00:00\n1\n",
        )
        .unwrap();

        assert!(store.read_all().unwrap().is_empty());
        assert!(matches!(
            parse_record("11111111\nShort\n"),
            Err(GradebookError::MalformedRecord { line: 2, .. })
        ));
    }

    #[test]
    fn stored_results_are_trusted_verbatim() {
        // Marks average 50 (C) but the file claims an A.
        let text = "12121212\nEdited\n\n1\n50,50,50,50,50,50\n50\nPass\nA\n2024-01-01T00:00:00+00:00\n1\n";
        let student = parse_record(text).unwrap();
        let attempt = &student.attempts()[0];
        assert_eq!(attempt.grade(), Grade::A);
        assert!(!attempt.is_consistent());
    }

    #[test]
    fn file_named_for_another_id_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        std::fs::write(dir.path().join("10000000.txt"), "55555555\nStray Copy\n\n0\n").unwrap();

        assert!(store.read_all().unwrap().is_empty());
        assert!(matches!(
            store.read("10000000"),
            Err(GradebookError::MalformedRecord { line: 1, .. })
        ));

        let mut student = Student::new("55555555", "Stray Copy", None).unwrap();
        student.add_attempt(Attempt::new(Marks::new([70; 6]).unwrap(), 1));
        store.write(&student).unwrap();

        let loaded = store.read_all().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].id(), "55555555");
        assert_eq!(loaded[0].attempts().len(), 1);
    }

    #[test]
    fn sequence_numbers_must_count_up_from_one() {
        let attempt = |seq: u32| {
            format!("50,50,50,50,50,50\n50\nPass\nC\n2024-01-01T00:00:00+00:00\n{seq}\n")
        };
        let repeated = format!("12121212\nRepeat\n\n2\n{}{}", attempt(7), attempt(7));
        assert!(matches!(
            parse_record(&repeated),
            Err(GradebookError::MalformedRecord { line: 10, .. })
        ));

        let skipped = format!("12121212\nGap\n\n2\n{}{}", attempt(1), attempt(3));
        assert!(matches!(
            parse_record(&skipped),
            Err(GradebookError::MalformedRecord { line: 16, .. })
        ));

        let ordered = format!("12121212\nOrdered\n\n2\n{}{}", attempt(1), attempt(2));
        assert_eq!(parse_record(&ordered).unwrap().next_sequence_number(), 3);
    }

    #[test]
    fn non_finite_average_is_rejected() {
        for average in ["NaN", "inf", "-inf"] {
            let text = format!(
                "12121212\nEdited\n\n1\n50,50,50,50,50,50\n{average}\nPass\nC\n2024-01-01T00:00:00+00:00\n1\n"
            );
            assert!(matches!(
                parse_record(&text),
                Err(GradebookError::MalformedRecord { line: 6, .. })
            ));
        }
    }

    #[test]
    fn ignores_other_files_and_sorts_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path());
        for (id, name) in [("30000000", "Carol"), ("10000000", "Alice"), ("20000000", "Bob")] {
            store.write(&Student::new(id, name, None).unwrap()).unwrap();
        }
        std::fs::write(dir.path().join("notes.md"), "not a record").unwrap();
        std::fs::create_dir(dir.path().join("archive.txt")).unwrap();

        let names: Vec<String> = store
            .read_all()
            .unwrap()
            .iter()
            .map(|s| s.name().to_string())
            .collect();
        assert_eq!(names, ["Alice", "Bob", "Carol"]);
    }

    #[test]
    fn missing_directory_loads_nothing_but_write_fails() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("absent"));

        assert!(store.read_all().unwrap().is_empty());

        let err = store
            .write(&Student::new("12345678", "Nobody", None).unwrap())
            .unwrap_err();
        assert!(matches!(err, GradebookError::Storage { .. }));
    }
}
