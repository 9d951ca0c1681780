//! Grade calculation.
//!
//! Maps a set of marks to an average, a letter grade and a pass/fail status.

use crate::model::{Grade, Marks, Status, SUBJECT_COUNT};

/// Lowest average that counts as a pass.
pub const PASS_MARK: f64 = 40.0;

/// Inclusive lower bounds, highest first. Anything below the last bound is `F`.
const GRADE_BOUNDARIES: [(f64, Grade); 4] = [
    (70.0, Grade::A),
    (60.0, Grade::B),
    (50.0, Grade::C),
    (40.0, Grade::D),
];

/// Results derived from one attempt's marks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Evaluation {
    pub average: f64,
    pub grade: Grade,
    pub status: Status,
}

/// Evaluate a full set of marks.
pub fn evaluate(marks: &Marks) -> Evaluation {
    let average = f64::from(marks.total()) / SUBJECT_COUNT as f64;
    Evaluation {
        average,
        grade: grade_for(average),
        status: status_for(average),
    }
}

/// Letter grade for an average; the first boundary met wins.
pub fn grade_for(average: f64) -> Grade {
    GRADE_BOUNDARIES
        .iter()
        .find(|(lower, _)| average >= *lower)
        .map(|&(_, grade)| grade)
        .unwrap_or(Grade::F)
}

pub fn status_for(average: f64) -> Status {
    if average >= PASS_MARK {
        Status::Pass
    } else {
        Status::Fail
    }
}
