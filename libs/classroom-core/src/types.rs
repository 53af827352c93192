//! Core types for the classroom platform.

use serde::{Deserialize, Serialize};

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Student,
}

impl Default for Role {
    fn default() -> Self {
        Self::Student
    }
}

impl Role {
    /// Get the role name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Student => "student",
        }
    }

    /// Parse from string.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Self::Admin),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

/// A multiple-choice exam question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Prompt shown to the student.
    #[serde(rename = "q")]
    pub prompt: String,
    pub choices: Vec<String>,
    /// Zero-based index of the correct choice.
    pub answer: i64,
    #[serde(rename = "type")]
    pub kind: String,
    pub topic: String,
}

/// One slot in a student's weekly timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    pub day: String,
    pub time: String,
    pub subject: String,
    pub teacher: Option<String>,
}

/// Flat schedule row as scanned from storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleRow {
    pub student_id: String,
    pub day: String,
    pub time: String,
    pub subject: String,
    pub teacher: Option<String>,
}

impl ScheduleRow {
    /// Drop the student id, keeping the slot fields.
    pub fn into_entry(self) -> ScheduleEntry {
        ScheduleEntry {
            day: self.day,
            time: self.time,
            subject: self.subject,
            teacher: self.teacher,
        }
    }
}
