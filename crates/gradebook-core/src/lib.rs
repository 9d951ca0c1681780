//! Student records, grading, and flat-file persistence for gradebook.
//!
//! This crate defines the student/attempt data model, the grade calculator,
//! the line-oriented record store, the in-memory registry built on top of it,
//! and class-level statistics. It performs no terminal rendering.

pub mod config;
pub mod error;
pub mod grading;
pub mod model;
pub mod registry;
pub mod statistics;
pub mod store;

pub use error::{GradebookError, Result};
pub use model::{Attempt, Grade, Marks, Status, Student, Subject};
pub use registry::{AttemptKind, Registry};
pub use store::RecordStore;
