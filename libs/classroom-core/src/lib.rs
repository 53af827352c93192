//! Core classroom library shared by the backend service.
//!
//! Provides:
//! - Exam grading by positional answer comparison
//! - Aggregation of flat schedule rows into per-student, per-day groups
//! - Input validation for user-submitted entities
//! - Shared types (Question, Role, ScheduleEntry, etc.)

pub mod error;
pub mod grading;
pub mod schedule;
pub mod types;
pub mod validation;

pub use error::{Result, ValidationError};
pub use grading::{grade, Grade};
pub use schedule::{aggregate, StudentSchedules};
pub use types::{Question, Role, ScheduleEntry, ScheduleRow};
