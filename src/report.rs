use itertools::Itertools;
use serde::Serialize;
use std::collections::HashMap;

use crate::data::{Room, RoomId, SchedulingOutput, Section, SectionId, Student, StudentKey};

/// One line of the printed timetable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TimetableRow {
    pub date: String,
    pub time: String,
    pub room: String,
    pub exam: String,
    pub subject: String,
    pub instructor: String,
    pub students: String,
}

/// Flattens committed exams into rows ordered by date, start time and exam id.
///
/// Unknown student keys render as the key itself; an unknown room renders as its id.
pub fn timetable_rows(
    output: &SchedulingOutput,
    sections: &[Section],
    students: &[Student],
    rooms: &[Room],
) -> Vec<TimetableRow> {
    let section_map: HashMap<SectionId, &Section> = sections.iter().map(|s| (s.id, s)).collect();
    let names: HashMap<&StudentKey, &str> =
        students.iter().map(|s| (&s.id, s.name.as_str())).collect();
    let room_numbers: HashMap<RoomId, &str> =
        rooms.iter().map(|r| (r.id, r.number.as_str())).collect();

    output
        .committed()
        .filter_map(|exam| exam.placement.map(|p| (exam, p)))
        .sorted_by_key(|(exam, p)| (p.day, p.start, exam.id))
        .map(|(exam, p)| {
            let section = section_map.get(&exam.section_id);
            let roster = section
                .map(|s| {
                    s.students
                        .iter()
                        .map(|key| names.get(key).copied().unwrap_or(key.as_str()))
                        .join(", ")
                })
                .unwrap_or_default();
            TimetableRow {
                date: p.day.format("%d.%m.%Y").to_string(),
                time: p.start.format("%H:%M").to_string(),
                room: room_numbers
                    .get(&p.room_id)
                    .map(|n| n.to_string())
                    .unwrap_or_else(|| p.room_id.to_string()),
                exam: section
                    .map(|s| s.code.clone())
                    .unwrap_or_else(|| exam.section_id.to_string()),
                subject: exam.subject.clone(),
                instructor: exam.instructor.clone(),
                students: roster,
            }
        })
        .collect()
}
