use chrono::NaiveDate;
use std::collections::{BTreeSet, HashMap, HashSet};

use crate::data::{Exam, InstructorId, SectionId, StudentKey};

/// Per-run record of who is already busy on which day.
///
/// One tracker belongs to exactly one run. It starts empty and only grows as exams commit.
#[derive(Debug, Clone, Default)]
pub struct ConflictTracker {
    last_student_day: HashMap<StudentKey, NaiveDate>,
    student_days: HashMap<StudentKey, BTreeSet<NaiveDate>>,
    last_instructor_day: HashMap<InstructorId, NaiveDate>,
    sections_by_day: HashMap<NaiveDate, HashSet<SectionId>>,
}

impl ConflictTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Day of the most recently committed exam for this student.
    pub fn last_student_day(&self, student: &str) -> Option<NaiveDate> {
        self.last_student_day.get(student).copied()
    }

    /// Day of the most recently committed exam for this instructor.
    pub fn last_instructor_day(&self, instructor: &str) -> Option<NaiveDate> {
        self.last_instructor_day.get(instructor).copied()
    }

    pub fn student_sits_on(&self, student: &str, day: NaiveDate) -> bool {
        self.student_days
            .get(student)
            .is_some_and(|days| days.contains(&day))
    }

    pub fn section_sits_on(&self, section_id: SectionId, day: NaiveDate) -> bool {
        self.sections_by_day
            .get(&day)
            .is_some_and(|sections| sections.contains(&section_id))
    }

    /// Records a committed exam for every affected student, its instructor and its section.
    pub fn record<'a>(
        &mut self,
        exam: &Exam,
        students: impl IntoIterator<Item = &'a StudentKey>,
        day: NaiveDate,
    ) {
        for student in students {
            self.last_student_day.insert(student.clone(), day);
            self.student_days
                .entry(student.clone())
                .or_default()
                .insert(day);
        }
        self.last_instructor_day
            .insert(exam.instructor.clone(), day);
        self.sections_by_day
            .entry(day)
            .or_default()
            .insert(exam.section_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 2, d).unwrap()
    }

    fn exam(section_id: SectionId, instructor: &str) -> Exam {
        Exam {
            id: 1,
            subject: "Algebra".to_string(),
            instructor: instructor.to_string(),
            section_id,
            placement: None,
        }
    }

    #[test]
    fn starts_empty() {
        let tracker = ConflictTracker::new();
        assert_eq!(tracker.last_student_day("s1"), None);
        assert_eq!(tracker.last_instructor_day("Li"), None);
        assert!(!tracker.section_sits_on(1, day(24)));
    }

    #[test]
    fn record_updates_every_map() {
        let mut tracker = ConflictTracker::new();
        let students = ["s1".to_string(), "s2".to_string()];
        tracker.record(&exam(4, "Li"), &students, day(24));

        assert_eq!(tracker.last_student_day("s1"), Some(day(24)));
        assert_eq!(tracker.last_student_day("s2"), Some(day(24)));
        assert_eq!(tracker.last_instructor_day("Li"), Some(day(24)));
        assert!(tracker.section_sits_on(4, day(24)));
        assert!(!tracker.section_sits_on(4, day(25)));
        assert!(tracker.student_sits_on("s1", day(24)));
        assert!(!tracker.student_sits_on("s3", day(24)));
    }

    #[test]
    fn earlier_days_stay_visible_after_later_commit() {
        let mut tracker = ConflictTracker::new();
        let students = ["s1".to_string()];
        tracker.record(&exam(1, "Li"), &students, day(26));
        tracker.record(&exam(2, "Li"), &students, day(24));

        // last day follows commit order, not calendar order
        assert_eq!(tracker.last_student_day("s1"), Some(day(24)));
        assert!(tracker.student_sits_on("s1", day(26)));
        assert!(tracker.student_sits_on("s1", day(24)));
    }
}
