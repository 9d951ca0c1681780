//! Class-level statistics over each student's best attempt.

use std::collections::BTreeMap;

use crate::model::{Grade, Status, Student};

/// Aggregate results for the class.
///
/// Only students with at least one attempt count; each contributes their
/// best attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassStatistics {
    /// Every student considered, with or without attempts.
    pub total_students: usize,
    /// Students with at least one attempt.
    pub students_with_records: usize,
    pub passed: usize,
    pub failed: usize,
    /// Percentage of `students_with_records` whose best attempt passed.
    pub pass_rate: f64,
    /// Mean of the best averages.
    pub class_average: f64,
    pub highest_average: f64,
    pub lowest_average: f64,
    /// Students per grade, in grade order. Grades nobody holds are absent.
    pub grade_distribution: BTreeMap<Grade, usize>,
}

/// Compute class statistics, or `None` if no student has an attempt yet.
pub fn compute_statistics<'a, I>(students: I) -> Option<ClassStatistics>
where
    I: IntoIterator<Item = &'a Student>,
{
    let mut total_students = 0usize;
    let mut best = Vec::new();
    for student in students {
        total_students += 1;
        if let Some(attempt) = student.best_attempt() {
            best.push(attempt);
        }
    }

    if best.is_empty() {
        return None;
    }

    let n = best.len();
    let passed = best.iter().filter(|a| a.status() == Status::Pass).count();

    let mut sum = 0.0f64;
    let mut highest = f64::NEG_INFINITY;
    let mut lowest = f64::INFINITY;
    let mut grade_distribution = BTreeMap::new();
    for attempt in &best {
        let avg = attempt.average();
        sum += avg;
        highest = highest.max(avg);
        lowest = lowest.min(avg);
        *grade_distribution.entry(attempt.grade()).or_insert(0) += 1;
    }

    Some(ClassStatistics {
        total_students,
        students_with_records: n,
        passed,
        failed: n - passed,
        pass_rate: passed as f64 / n as f64 * 100.0,
        class_average: sum / n as f64,
        highest_average: highest,
        lowest_average: lowest,
        grade_distribution,
    })
}
