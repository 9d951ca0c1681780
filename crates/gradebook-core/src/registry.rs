//! In-memory student registry with write-through persistence.

use std::collections::HashMap;

use uuid::Uuid;

use crate::error::{GradebookError, Result};
use crate::model::{Attempt, Marks, Student};
use crate::store::RecordStore;

/// Smallest generated ID; keeps every ID exactly 8 digits long.
const ID_MIN: u128 = 10_000_000;
const ID_SPAN: u128 = 90_000_000;

/// Whether an attempt is a student's first sitting or a resit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptKind {
    FirstAttempt,
    Resit,
}

/// All students known to this run, backed by a [`RecordStore`].
#[derive(Debug)]
pub struct Registry {
    store: RecordStore,
    students: HashMap<String, Student>,
    /// IDs in listing order.
    order: Vec<String>,
}

impl Registry {
    /// An empty registry writing to `store`.
    pub fn new(store: RecordStore) -> Self {
        Self {
            store,
            students: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// Load every readable record from `store`.
    ///
    /// Unreadable files are skipped by the store. If two files carry the
    /// same ID, the first in listing order is kept.
    pub fn load(store: RecordStore) -> Result<Self> {
        let loaded = store.read_all()?;
        let mut registry = Self::new(store);
        for student in loaded {
            if registry.students.contains_key(student.id()) {
                tracing::warn!("duplicate student ID {}, keeping first record", student.id());
                continue;
            }
            registry.insert(student);
        }
        Ok(registry)
    }

    pub fn store(&self) -> &RecordStore {
        &self.store
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// All students in listing order.
    pub fn list(&self) -> Vec<&Student> {
        self.order
            .iter()
            .filter_map(|id| self.students.get(id))
            .collect()
    }

    /// Create and persist a new student.
    ///
    /// If the write fails the student stays registered in memory and the
    /// storage error is returned.
    pub fn create(&mut self, name: &str, email: Option<&str>) -> Result<&Student> {
        let id = self.generate_id();
        let student = Student::new(id.clone(), name, email)?;
        self.insert(student);
        let student = &self.students[&id];
        self.store.write(student)?;
        tracing::info!("created student {}", id);
        Ok(student)
    }

    /// Exact lookup by ID. Surrounding whitespace is ignored and a blank ID
    /// finds nothing.
    pub fn find_by_id(&self, id: &str) -> Option<&Student> {
        let id = id.trim();
        if id.is_empty() {
            return None;
        }
        self.students.get(id)
    }

    /// Like [`Registry::find_by_id`] but reports a missing student as an error.
    pub fn get(&self, id: &str) -> Result<&Student> {
        self.find_by_id(id)
            .ok_or_else(|| GradebookError::NotFound(id.trim().to_string()))
    }

    /// Case-insensitive substring search over names, in listing order.
    pub fn search_by_name(&self, query: &str) -> Result<Vec<&Student>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(GradebookError::validation("search query must not be empty"));
        }
        let needle = query.to_lowercase();
        Ok(self
            .list()
            .into_iter()
            .filter(|s| s.name().to_lowercase().contains(&needle))
            .collect())
    }

    /// Sequence number an attempt of `kind` would receive, or the reason it
    /// would be refused.
    pub fn next_sequence_number(&self, id: &str, kind: AttemptKind) -> Result<u32> {
        let student = self.get(id)?;
        check_attempt_kind(student, kind)?;
        Ok(student.next_sequence_number())
    }

    /// Append an attempt to a student's history and persist the student.
    ///
    /// A first attempt is refused once the student has any attempt, and a
    /// resit is refused until they have one. Refusals leave everything
    /// untouched.
    pub fn record_attempt(&mut self, id: &str, marks: Marks, kind: AttemptKind) -> Result<Attempt> {
        let id = id.trim();
        let student = self
            .students
            .get_mut(id)
            .ok_or_else(|| GradebookError::NotFound(id.to_string()))?;

        check_attempt_kind(student, kind)?;

        let sequence_number = student.next_sequence_number();
        let attempt = Attempt::new(marks, sequence_number);
        student.add_attempt(attempt.clone());
        self.store.write(student)?;
        tracing::info!("recorded attempt {} for student {}", sequence_number, id);
        Ok(attempt)
    }

    fn insert(&mut self, student: Student) {
        let id = student.id().to_string();
        self.order.push(id.clone());
        self.students.insert(id, student);
    }

    fn generate_id(&self) -> String {
        self.generate_id_with(|| Uuid::new_v4().as_u128())
    }

    /// Draw candidates from `entropy` until one is neither registered nor
    /// already present as a file in the store, loadable or not.
    fn generate_id_with(&self, mut entropy: impl FnMut() -> u128) -> String {
        loop {
            let candidate = format!("{}", ID_MIN + entropy() % ID_SPAN);
            if !self.students.contains_key(&candidate)
                && !self.store.path_for(&candidate).exists()
            {
                return candidate;
            }
            tracing::debug!("generated ID {} already taken, retrying", candidate);
        }
    }
}

fn check_attempt_kind(student: &Student, kind: AttemptKind) -> Result<()> {
    match kind {
        AttemptKind::FirstAttempt if student.has_attempts() => Err(GradebookError::validation(
            format!(
                "student {} already has a first attempt; record a resit instead",
                student.id()
            ),
        )),
        AttemptKind::Resit if !student.has_attempts() => Err(GradebookError::validation(
            format!("student {} has no first attempt to resit", student.id()),
        )),
        _ => Ok(()),
    }
}
