//! Aggregation of flat schedule rows into a nested per-student view.

use std::collections::HashMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::types::{ScheduleEntry, ScheduleRow};

/// Entries for one day, in scan order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct DayGroup {
    day: String,
    entries: Vec<ScheduleEntry>,
}

/// Days for one student, in first-occurrence order.
#[derive(Debug, Clone, PartialEq, Eq)]
struct StudentGroup {
    student_id: String,
    days: Vec<DayGroup>,
}

/// Schedules keyed by student then day.
///
/// Serializes as `{studentId: {day: [entry, ...]}}` keeping the order in
/// which students and days first appeared in the input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StudentSchedules {
    students: Vec<StudentGroup>,
}

impl StudentSchedules {
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    /// Number of students with at least one entry.
    pub fn len(&self) -> usize {
        self.students.len()
    }

    /// Student ids in first-occurrence order.
    pub fn students(&self) -> impl Iterator<Item = &str> {
        self.students.iter().map(|s| s.student_id.as_str())
    }

    /// Days for a student in first-occurrence order.
    pub fn days(&self, student_id: &str) -> Vec<&str> {
        self.student(student_id)
            .map(|s| s.days.iter().map(|d| d.day.as_str()).collect())
            .unwrap_or_default()
    }

    /// Entries for a (student, day) pair, empty when absent.
    pub fn entries(&self, student_id: &str, day: &str) -> &[ScheduleEntry] {
        self.student(student_id)
            .and_then(|s| s.days.iter().find(|d| d.day == day))
            .map(|d| d.entries.as_slice())
            .unwrap_or(&[])
    }

    fn student(&self, student_id: &str) -> Option<&StudentGroup> {
        self.students.iter().find(|s| s.student_id == student_id)
    }
}

/// Group rows by student, then by day.
pub fn aggregate(rows: impl IntoIterator<Item = ScheduleRow>) -> StudentSchedules {
    let mut students: Vec<StudentGroup> = Vec::new();
    let mut student_index: HashMap<String, usize> = HashMap::new();
    // (student position, day) -> day position within that student
    let mut day_index: HashMap<(usize, String), usize> = HashMap::new();

    for row in rows {
        let s = *student_index
            .entry(row.student_id.clone())
            .or_insert_with(|| {
                students.push(StudentGroup {
                    student_id: row.student_id.clone(),
                    days: Vec::new(),
                });
                students.len() - 1
            });

        let days = &mut students[s].days;
        let d = *day_index.entry((s, row.day.clone())).or_insert_with(|| {
            days.push(DayGroup {
                day: row.day.clone(),
                entries: Vec::new(),
            });
            days.len() - 1
        });

        days[d].entries.push(row.into_entry());
    }

    StudentSchedules { students }
}

struct DaysMap<'a>(&'a [DayGroup]);

impl Serialize for DaysMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for group in self.0 {
            map.serialize_entry(&group.day, &group.entries)?;
        }
        map.end()
    }
}

impl Serialize for StudentSchedules {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.students.len()))?;
        for student in &self.students {
            map.serialize_entry(&student.student_id, &DaysMap(&student.days))?;
        }
        map.end()
    }
}
