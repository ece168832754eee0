use crate::config::SchedulerConfig;
use crate::data::{
    DayRejection, Exam, Placement, Room, SchedulingInput, SchedulingOutput, Section, SectionId,
    UnscheduledExam,
};
use crate::error::{Rejection, SchedulingError};
use crate::tracker::ConflictTracker;
use crate::{rooms, slots, validator};
use chrono::{Days, Local, NaiveDate, TimeDelta};
use itertools::Itertools;
use log::{debug, info, trace, warn};
use std::cmp::Reverse;
use std::collections::HashMap;
use std::time::Instant;

/// Schedules a request, starting today unless the input names a start date.
pub fn solve(input: &SchedulingInput) -> Result<SchedulingOutput, SchedulingError> {
    let start_date = input
        .start_date
        .unwrap_or_else(|| Local::now().date_naive());
    let mut tracker = ConflictTracker::new();
    schedule(
        input.exams.clone(),
        &input.sections,
        &input.rooms,
        start_date,
        &input.config,
        &mut tracker,
    )
}

/// Greedy largest-cohort-first placement over `config.horizon_days` days from `start_date`.
///
/// Each exam takes the first day on which every rule holds and both a time slot and a room are
/// free. Exams that fit nowhere come back in `unscheduled` with the reason each day refused
/// them. Input is checked up front, so an `Err` means nothing was placed. `tracker` is cleared
/// on entry and holds this run's commitments on return.
pub fn schedule(
    exams: Vec<Exam>,
    sections: &[Section],
    rooms: &[Room],
    start_date: NaiveDate,
    config: &SchedulerConfig,
    tracker: &mut ConflictTracker,
) -> Result<SchedulingOutput, SchedulingError> {
    let start_time = Instant::now();
    *tracker = ConflictTracker::new();
    config.validate()?;
    check_rooms(rooms)?;

    // lookups
    let section_map: HashMap<SectionId, &Section> = sections.iter().map(|s| (s.id, s)).collect();
    let mut queue = exams
        .into_iter()
        .map(|mut exam| -> Result<_, SchedulingError> {
            let section = cohort_of(&exam, &section_map)?;
            exam.placement = None;
            Ok((exam, section))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // stable sort keeps input order among equal headcounts
    queue.sort_by_key(|(_, section)| Reverse(section.headcount()));
    info!(
        "Scheduling {} exams into {} rooms over {} days from {}...",
        queue.len(),
        rooms.len(),
        config.horizon_days,
        start_date
    );
    debug!(
        "Placement order: {}",
        queue
            .iter()
            .map(|(exam, section)| format!("{}({})", exam.id, section.headcount()))
            .join(", ")
    );

    let planner = DayPlanner {
        rooms,
        config,
        duration: config.duration(),
    };
    let mut output = SchedulingOutput::default();

    for (mut exam, section) in queue {
        let mut attempts = Vec::new();
        let mut placement = None;

        for offset in 0..config.horizon_days {
            let Some(day) = start_date.checked_add_days(Days::new(u64::from(offset))) else {
                break;
            };
            let day_exams = output.schedule.get(&day).map(Vec::as_slice).unwrap_or(&[]);
            match planner.propose(&exam, section, day, day_exams, tracker) {
                Ok(proposed) => {
                    placement = Some(proposed);
                    break;
                }
                Err(reason) => {
                    trace!("Exam {} rejected on {}: {}", exam.id, day, reason);
                    attempts.push(DayRejection { day, reason });
                }
            }
        }

        match placement {
            Some(placement) => {
                info!(
                    "Exam {} ({}) for section {} placed on {} at {} in room {}",
                    exam.id,
                    exam.subject,
                    section.code,
                    placement.day,
                    placement.start.format("%H:%M"),
                    placement.room_id
                );
                exam.placement = Some(placement);
                tracker.record(&exam, &section.students, placement.day);
                output.schedule.entry(placement.day).or_default().push(exam);
            }
            None => {
                warn!(
                    "Exam {} ({}) for section {} could not be placed within {} days",
                    exam.id, exam.subject, section.code, config.horizon_days
                );
                debug!("Exam {} refused: {}", exam.id, attempts.iter().join("; "));
                output.unscheduled.push(UnscheduledExam { exam, attempts });
            }
        }
    }

    info!(
        "Scheduled {} exams, {} unscheduled, in {:.2?}",
        output.committed_count(),
        output.unscheduled.len(),
        start_time.elapsed()
    );
    Ok(output)
}

fn check_rooms(rooms: &[Room]) -> Result<(), SchedulingError> {
    match rooms.iter().find(|room| room.capacity == 0) {
        Some(room) => Err(SchedulingError::ZeroCapacity {
            room_id: room.id,
            number: room.number.clone(),
        }),
        None => Ok(()),
    }
}

fn cohort_of<'a>(
    exam: &Exam,
    section_map: &HashMap<SectionId, &'a Section>,
) -> Result<&'a Section, SchedulingError> {
    let section = section_map
        .get(&exam.section_id)
        .copied()
        .ok_or(SchedulingError::UnknownSection {
            exam_id: exam.id,
            section_id: exam.section_id,
        })?;
    if section.students.is_empty() {
        return Err(SchedulingError::EmptySection {
            exam_id: exam.id,
            code: section.code.clone(),
        });
    }
    Ok(section)
}

/// Builds a tentative placement for one exam on one day without touching any state.
struct DayPlanner<'a> {
    rooms: &'a [Room],
    config: &'a SchedulerConfig,
    duration: TimeDelta,
}

impl DayPlanner<'_> {
    fn propose(
        &self,
        exam: &Exam,
        section: &Section,
        day: NaiveDate,
        day_exams: &[Exam],
        tracker: &ConflictTracker,
    ) -> Result<Placement, Rejection> {
        validator::check_daily_cap(day_exams, self.config.max_exams_per_day)?;
        validator::check_cohort(exam, &section.students, day, tracker)?;

        let start = slots::find_start(
            day_exams,
            self.config.work_start,
            self.config.work_end,
            self.duration,
        )
        .ok_or(Rejection::TimeExhausted)?;
        validator::check_instructor(
            exam,
            start,
            day,
            day_exams,
            self.duration,
            self.config.allow_back_to_back,
            tracker,
        )?;

        let headcount = section.headcount();
        let room = rooms::find_room(self.rooms, day_exams, headcount)
            .ok_or(Rejection::RoomExhausted { headcount })?;

        Ok(Placement {
            day,
            start,
            room_id: room.id,
        })
    }
}
