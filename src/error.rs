use serde::Serialize;
use thiserror::Error;

use crate::data::{ExamId, InstructorId, RoomId, SectionId, StudentKey};

/// Malformed input. Any of these aborts the run before an exam is placed.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SchedulingError {
    #[error("exam {exam_id} references unknown section {section_id}")]
    UnknownSection {
        exam_id: ExamId,
        section_id: SectionId,
    },

    #[error("exam {exam_id} references section {code} which has no enrolled students")]
    EmptySection { exam_id: ExamId, code: String },

    #[error("room {room_id} ({number}) has zero capacity")]
    ZeroCapacity { room_id: RoomId, number: String },

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// The rule that refused one candidate day for one exam.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "rule", rename_all = "camelCase")]
pub enum Rejection {
    #[error("day already holds {limit} exams")]
    DailyCapReached { limit: u32 },

    #[error("section {section_id} already sits an exam that day")]
    #[serde(rename_all = "camelCase")]
    SectionAlreadyScheduled { section_id: SectionId },

    #[error("student {student} already sits an exam that day")]
    StudentCollision { student: StudentKey },

    #[error("instructor {instructor} is busy with exam {other_exam} at that time")]
    #[serde(rename_all = "camelCase")]
    InstructorOverlap {
        instructor: InstructorId,
        other_exam: ExamId,
    },

    #[error("no time slot left within working hours")]
    TimeExhausted,

    #[error("no free room seats {headcount} students")]
    RoomExhausted { headcount: usize },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejection_serializes_with_rule_tag() {
        let json = serde_json::to_value(Rejection::InstructorOverlap {
            instructor: "Li".to_string(),
            other_exam: 7,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"rule": "instructorOverlap", "instructor": "Li", "otherExam": 7})
        );
        let json = serde_json::to_value(Rejection::TimeExhausted).unwrap();
        assert_eq!(json, serde_json::json!({"rule": "timeExhausted"}));
    }

    #[test]
    fn errors_name_the_offending_record() {
        let err = SchedulingError::EmptySection {
            exam_id: 3,
            code: "A1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "exam 3 references section A1 which has no enrolled students"
        );
    }
}
