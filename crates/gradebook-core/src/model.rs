//! Core data model types for gradebook.
//!
//! A [`Student`] owns an ordered history of [`Attempt`]s. Each attempt holds
//! one mark per [`Subject`] plus the results derived from them.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, FixedOffset, Local};

use crate::error::{GradebookError, Result};
use crate::grading::{self, Evaluation};

/// Number of subjects sat in every attempt.
pub const SUBJECT_COUNT: usize = 6;

/// Highest mark a subject can receive.
pub const MAX_MARK: u8 = 100;

/// Exam subjects, in the fixed order marks are stored and printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Subject {
    Mathematics,
    Physics,
    Chemistry,
    Biology,
    English,
    Art,
}

impl Subject {
    /// All subjects in storage order.
    pub const ALL: [Subject; SUBJECT_COUNT] = [
        Subject::Mathematics,
        Subject::Physics,
        Subject::Chemistry,
        Subject::Biology,
        Subject::English,
        Subject::Art,
    ];

    /// Position of this subject within [`Marks`].
    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Subject::Mathematics => "Mathematics",
            Subject::Physics => "Physics",
            Subject::Chemistry => "Chemistry",
            Subject::Biology => "Biology",
            Subject::English => "English",
            Subject::Art => "Art",
        }
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One validated mark per subject.
///
/// Construction is the only place the `[0, 100]` range and the subject count
/// are checked; everything downstream can rely on them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Marks([u8; SUBJECT_COUNT]);

impl Marks {
    /// Build marks from values in subject order.
    pub fn new(values: [u8; SUBJECT_COUNT]) -> Result<Self> {
        for (subject, &value) in Subject::ALL.iter().zip(values.iter()) {
            check_range(*subject, i64::from(value))?;
        }
        Ok(Self(values))
    }

    /// Build marks from an arbitrary slice, rejecting the wrong length or
    /// out-of-range values.
    pub fn from_slice(values: &[i64]) -> Result<Self> {
        if values.len() != SUBJECT_COUNT {
            return Err(GradebookError::validation(format!(
                "expected {SUBJECT_COUNT} marks, got {}",
                values.len()
            )));
        }
        let mut marks = [0u8; SUBJECT_COUNT];
        for (i, &value) in values.iter().enumerate() {
            marks[i] = check_range(Subject::ALL[i], value)?;
        }
        Ok(Self(marks))
    }

    pub fn get(&self, subject: Subject) -> u8 {
        self.0[subject.index()]
    }

    /// Iterate `(subject, mark)` pairs in subject order.
    pub fn iter(&self) -> impl Iterator<Item = (Subject, u8)> + '_ {
        Subject::ALL.iter().map(move |&s| (s, self.get(s)))
    }

    pub fn total(&self) -> u32 {
        self.0.iter().map(|&m| u32::from(m)).sum()
    }
}

fn check_range(subject: Subject, value: i64) -> Result<u8> {
    if (0..=i64::from(MAX_MARK)).contains(&value) {
        Ok(value as u8)
    } else {
        Err(GradebookError::validation(format!(
            "{subject} mark must be between 0 and {MAX_MARK}, got {value}"
        )))
    }
}

impl fmt::Display for Marks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, mark) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            write!(f, "{mark}")?;
        }
        Ok(())
    }
}

impl FromStr for Marks {
    type Err = GradebookError;

    /// Parse the comma-joined form produced by `Display`.
    fn from_str(s: &str) -> Result<Self> {
        let values = s
            .split(',')
            .map(|part| {
                part.trim().parse::<i64>().map_err(|_| {
                    GradebookError::validation(format!("'{}' is not a whole number", part.trim()))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_slice(&values)
    }
}

/// Letter grade. Ordering is alphabetical, so `A` sorts first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Grade {
    A,
    B,
    C,
    D,
    F,
}

impl Grade {
    pub const ALL: [Grade; 5] = [Grade::A, Grade::B, Grade::C, Grade::D, Grade::F];
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Grade::A => "A",
            Grade::B => "B",
            Grade::C => "C",
            Grade::D => "D",
            Grade::F => "F",
        };
        f.write_str(letter)
    }
}

impl FromStr for Grade {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Grade::A),
            "B" => Ok(Grade::B),
            "C" => Ok(Grade::C),
            "D" => Ok(Grade::D),
            "F" => Ok(Grade::F),
            other => Err(format!("unknown grade: {other}")),
        }
    }
}

/// Overall outcome of an attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Pass,
    Fail,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Pass => write!(f, "Pass"),
            Status::Fail => write!(f, "Fail"),
        }
    }
}

impl FromStr for Status {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pass" => Ok(Status::Pass),
            "Fail" => Ok(Status::Fail),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

/// A single exam sitting. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    marks: Marks,
    average: f64,
    grade: Grade,
    status: Status,
    timestamp: DateTime<FixedOffset>,
    sequence_number: u32,
}

impl Attempt {
    /// Create an attempt stamped with the current local time.
    pub fn new(marks: Marks, sequence_number: u32) -> Self {
        Self::at(marks, sequence_number, Local::now().fixed_offset())
    }

    /// Create an attempt with an explicit timestamp, deriving the results
    /// from `marks`.
    pub fn at(marks: Marks, sequence_number: u32, timestamp: DateTime<FixedOffset>) -> Self {
        let Evaluation {
            average,
            grade,
            status,
        } = grading::evaluate(&marks);
        Self {
            marks,
            average,
            grade,
            status,
            timestamp,
            sequence_number,
        }
    }

    /// Rebuild an attempt from persisted fields. The derived values are
    /// taken as stored; see [`Attempt::is_consistent`].
    pub fn from_stored(
        marks: Marks,
        average: f64,
        grade: Grade,
        status: Status,
        timestamp: DateTime<FixedOffset>,
        sequence_number: u32,
    ) -> Self {
        Self {
            marks,
            average,
            grade,
            status,
            timestamp,
            sequence_number,
        }
    }

    pub fn marks(&self) -> &Marks {
        &self.marks
    }

    pub fn average(&self) -> f64 {
        self.average
    }

    pub fn grade(&self) -> Grade {
        self.grade
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn timestamp(&self) -> DateTime<FixedOffset> {
        self.timestamp
    }

    pub fn sequence_number(&self) -> u32 {
        self.sequence_number
    }

    /// `true` for the first sitting, `false` for resits.
    pub fn is_first(&self) -> bool {
        self.sequence_number == 1
    }

    /// Whether the stored average, grade and status still agree with the
    /// marks.
    pub fn is_consistent(&self) -> bool {
        let expected = grading::evaluate(&self.marks);
        (expected.average - self.average).abs() < 1e-9
            && expected.grade == self.grade
            && expected.status == self.status
    }
}

/// A student and their exam history.
#[derive(Debug, Clone, PartialEq)]
pub struct Student {
    id: String,
    name: String,
    email: Option<String>,
    attempts: Vec<Attempt>,
}

impl Student {
    /// Create a student with no attempts.
    ///
    /// The name is trimmed and must not be blank. A blank email is treated
    /// as absent. Neither may span more than one line.
    pub fn new(id: impl Into<String>, name: &str, email: Option<&str>) -> Result<Self> {
        let name = name.trim();
        if name.is_empty() {
            return Err(GradebookError::validation("student name must not be empty"));
        }
        if name.contains(['\n', '\r']) {
            return Err(GradebookError::validation(
                "student name must be a single line",
            ));
        }
        let email = email.map(str::trim).filter(|e| !e.is_empty());
        if email.is_some_and(|e| e.contains(['\n', '\r'])) {
            return Err(GradebookError::validation("email must be a single line"));
        }
        Ok(Self {
            id: id.into(),
            name: name.to_string(),
            email: email.map(str::to_string),
            attempts: Vec::new(),
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn email(&self) -> Option<&str> {
        self.email.as_deref()
    }

    /// Attempts in the order they were sat.
    pub fn attempts(&self) -> &[Attempt] {
        &self.attempts
    }

    pub fn has_attempts(&self) -> bool {
        !self.attempts.is_empty()
    }

    /// Sequence number the next attempt will carry.
    pub fn next_sequence_number(&self) -> u32 {
        self.attempts.len() as u32 + 1
    }

    /// Append an attempt. Does not persist anything.
    pub fn add_attempt(&mut self, attempt: Attempt) {
        self.attempts.push(attempt);
    }

    /// The attempt with the highest average; the earliest one wins a tie.
    pub fn best_attempt(&self) -> Option<&Attempt> {
        self.attempts.iter().fold(None, |best, a| match best {
            Some(b) if b.average >= a.average => Some(b),
            _ => Some(a),
        })
    }

    /// The attempt with the latest timestamp; the earliest one wins a tie.
    pub fn latest_attempt(&self) -> Option<&Attempt> {
        self.attempts.iter().fold(None, |latest, a| match latest {
            Some(l) if l.timestamp >= a.timestamp => Some(l),
            _ => Some(a),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<FixedOffset> {
        FixedOffset::east_opt(0)
            .unwrap()
            .with_ymd_and_hms(2024, 5, 1, hour, 0, 0)
            .unwrap()
    }

    /// Marks whose average is exactly `avg`.
    fn flat(avg: u8) -> Marks {
        Marks::new([avg; SUBJECT_COUNT]).unwrap()
    }

    #[test]
    fn marks_reject_wrong_length() {
        assert!(Marks::from_slice(&[50, 50, 50]).is_err());
        assert!(Marks::from_slice(&[]).is_err());
        assert!(Marks::from_slice(&[50; 7]).is_err());
    }

    #[test]
    fn marks_reject_out_of_range() {
        let err = Marks::from_slice(&[50, 50, 101, 50, 50, 50]).unwrap_err();
        assert!(err.to_string().contains("Chemistry"));
        assert!(Marks::from_slice(&[-1, 50, 50, 50, 50, 50]).is_err());
        assert!(Marks::new([100, 0, 100, 0, 100, 0]).is_ok());
        assert!(Marks::new([100, 0, 100, 0, 100, 255]).is_err());
    }

    #[test]
    fn marks_parse_and_display() {
        let marks: Marks = "85, 90,78,92,88,76".parse().unwrap();
        assert_eq!(marks.get(Subject::Mathematics), 85);
        assert_eq!(marks.get(Subject::Art), 76);
        assert_eq!(marks.to_string(), "85,90,78,92,88,76");
        assert_eq!(marks.total(), 509);
        assert!("85,90,x,92,88,76".parse::<Marks>().is_err());
    }

    #[test]
    fn subjects_follow_storage_order() {
        let names: Vec<_> = Subject::ALL.iter().map(|s| s.name()).collect();
        assert_eq!(
            names,
            ["Mathematics", "Physics", "Chemistry", "Biology", "English", "Art"]
        );
        for (i, s) in Subject::ALL.iter().enumerate() {
            assert_eq!(s.index(), i);
        }
    }

    #[test]
    fn grade_and_status_parse() {
        for grade in Grade::ALL {
            assert_eq!(grade.to_string().parse::<Grade>().unwrap(), grade);
        }
        assert!("E".parse::<Grade>().is_err());
        assert_eq!("Pass".parse::<Status>().unwrap(), Status::Pass);
        assert!("pass".parse::<Status>().is_err());
    }

    #[test]
    fn student_requires_name() {
        assert!(Student::new("12345678", "   ", None).is_err());
        assert!(Student::new("12345678", "Ann\nLee", None).is_err());
        let s = Student::new("12345678", "  Ann Lee ", Some("  ")).unwrap();
        assert_eq!(s.name(), "Ann Lee");
        assert_eq!(s.email(), None);
        assert!(!s.has_attempts());
        assert_eq!(s.next_sequence_number(), 1);
    }

    #[test]
    fn best_attempt_prefers_first_of_ties() {
        let mut s = Student::new("12345678", "Ann", None).unwrap();
        for (i, avg) in [55, 82, 82, 40].into_iter().enumerate() {
            s.add_attempt(Attempt::at(flat(avg), i as u32 + 1, ts(i as u32)));
        }
        let best = s.best_attempt().unwrap();
        assert_eq!(best.average(), 82.0);
        assert_eq!(best.sequence_number(), 2);
    }

    #[test]
    fn latest_attempt_uses_timestamp() {
        let mut s = Student::new("12345678", "Ann", None).unwrap();
        assert!(s.latest_attempt().is_none());
        assert!(s.best_attempt().is_none());

        s.add_attempt(Attempt::at(flat(50), 1, ts(9)));
        s.add_attempt(Attempt::at(flat(60), 2, ts(12)));
        s.add_attempt(Attempt::at(flat(70), 3, ts(12)));
        s.add_attempt(Attempt::at(flat(80), 4, ts(10)));
        assert_eq!(s.latest_attempt().unwrap().sequence_number(), 2);
    }

    #[test]
    fn stored_attempt_consistency() {
        let marks = flat(65);
        let fresh = Attempt::at(marks, 1, ts(8));
        assert!(fresh.is_consistent());
        assert!(fresh.is_first());

        let edited = Attempt::from_stored(marks, 65.0, Grade::A, Status::Pass, ts(8), 1);
        assert!(!edited.is_consistent());
    }
}
