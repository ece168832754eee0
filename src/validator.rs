//! Admissibility rules for placing one exam on one candidate day.
//!
//! Every check is a pure function of its arguments and reports the first rule it finds violated.

use chrono::{NaiveDate, NaiveTime, TimeDelta};
use std::collections::BTreeSet;

use crate::data::{Exam, StudentKey};
use crate::error::Rejection;
use crate::tracker::ConflictTracker;

pub fn check_daily_cap(day_exams: &[Exam], max_exams_per_day: u32) -> Result<(), Rejection> {
    if day_exams.len() >= max_exams_per_day as usize {
        return Err(Rejection::DailyCapReached {
            limit: max_exams_per_day,
        });
    }
    Ok(())
}

/// Section and student rules: a cohort and each of its students sit at most one exam per day.
pub fn check_cohort(
    exam: &Exam,
    students: &BTreeSet<StudentKey>,
    day: NaiveDate,
    tracker: &ConflictTracker,
) -> Result<(), Rejection> {
    if tracker.section_sits_on(exam.section_id, day) {
        return Err(Rejection::SectionAlreadyScheduled {
            section_id: exam.section_id,
        });
    }

    let collision = students
        .iter()
        .find(|student| tracker.student_sits_on(student, day));
    if let Some(student) = collision {
        return Err(Rejection::StudentCollision {
            student: student.clone(),
        });
    }
    Ok(())
}

/// Instructor rule, evaluated against a tentative start time.
///
/// Windows are `[start, start + duration)`. Unless `allow_back_to_back` is set, a window that
/// begins exactly where another of the same instructor ends also counts as an overlap.
pub fn check_instructor(
    exam: &Exam,
    start: NaiveTime,
    day: NaiveDate,
    day_exams: &[Exam],
    duration: TimeDelta,
    allow_back_to_back: bool,
    tracker: &ConflictTracker,
) -> Result<(), Rejection> {
    if tracker.last_instructor_day(&exam.instructor).is_none() {
        return Ok(());
    }

    for other in day_exams.iter().filter(|e| e.instructor == exam.instructor) {
        let Some(placement) = other.placement.filter(|p| p.day == day) else {
            continue;
        };
        if windows_conflict(start, placement.start, duration, allow_back_to_back) {
            return Err(Rejection::InstructorOverlap {
                instructor: exam.instructor.clone(),
                other_exam: other.id,
            });
        }
    }
    Ok(())
}

pub fn windows_conflict(
    a: NaiveTime,
    b: NaiveTime,
    duration: TimeDelta,
    allow_back_to_back: bool,
) -> bool {
    let a_end = a + duration;
    let b_end = b + duration;
    let overlaps = a < b_end && b < a_end;
    let abuts = a == b_end || b == a_end;
    overlaps || (abuts && !allow_back_to_back)
}
