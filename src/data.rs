use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::config::SchedulerConfig;
use crate::error::Rejection;

// Type aliases for clarity
pub type ExamId = u64;
pub type SectionId = u64;
pub type RoomId = u64;
pub type StudentKey = String;
pub type InstructorId = String;

/// A physical room. `kind` is carried through for reporting only.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: RoomId,
    pub number: String,
    #[serde(default)]
    pub kind: String,
    pub capacity: u32,
}

/// A student, keyed by a stable external identifier.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    pub id: StudentKey,
    pub name: String,
}

/// An enrollment group: a cohort that sits at most one exam per day.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: SectionId,
    pub code: String,
    pub students: BTreeSet<StudentKey>,
}

impl Section {
    pub fn headcount(&self) -> usize {
        self.students.len()
    }
}

/// Where and when an exam takes place. Day, time and room are only ever set together.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Placement {
    pub day: NaiveDate,
    pub start: NaiveTime,
    pub room_id: RoomId,
}

/// An exam to be scheduled for exactly one section.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Exam {
    pub id: ExamId,
    pub subject: String,
    pub instructor: InstructorId,
    pub section_id: SectionId,
    #[serde(default)]
    pub placement: Option<Placement>,
}

impl Exam {
    pub fn start(&self) -> Option<NaiveTime> {
        self.placement.map(|p| p.start)
    }

    pub fn room_id(&self) -> Option<RoomId> {
        self.placement.map(|p| p.room_id)
    }
}

/// The complete input for a scheduling run.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingInput {
    pub exams: Vec<Exam>,
    pub sections: Vec<Section>,
    #[serde(default)]
    pub students: Vec<Student>,
    pub rooms: Vec<Room>,
    #[serde(default)]
    pub config: SchedulerConfig,
    /// First candidate day. Defaults to today when absent.
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
}

/// Why a single candidate day was refused for an exam.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DayRejection {
    pub day: NaiveDate,
    pub reason: Rejection,
}

impl fmt::Display for DayRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.day, self.reason)
    }
}

/// An exam that found no admissible day within the horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UnscheduledExam {
    pub exam: Exam,
    pub attempts: Vec<DayRejection>,
}

/// The final output of the scheduler.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchedulingOutput {
    /// Committed exams per day, in commit order.
    pub schedule: BTreeMap<NaiveDate, Vec<Exam>>,
    pub unscheduled: Vec<UnscheduledExam>,
}

impl SchedulingOutput {
    pub fn committed(&self) -> impl Iterator<Item = &Exam> + '_ {
        self.schedule.values().flatten()
    }

    pub fn committed_count(&self) -> usize {
        self.schedule.values().map(Vec::len).sum()
    }
}
