use chrono::{NaiveTime, TimeDelta};
use itertools::Itertools;

use crate::data::Exam;

/// Earliest start on a day that fits one exam of `duration` between the exams already
/// committed there and inside `[work_start, work_end]`.
///
/// Windows are half-open, so an exam may start exactly when the previous one ends. Returns
/// `None` when the day has no room left, including when the window would run past midnight.
pub fn find_start(
    day_exams: &[Exam],
    work_start: NaiveTime,
    work_end: NaiveTime,
    duration: TimeDelta,
) -> Option<NaiveTime> {
    let mut current = work_start;

    for start in day_exams.iter().filter_map(Exam::start).sorted() {
        if fits_before(current, duration, start) {
            break;
        }
        let (taken_until, wrapped) = start.overflowing_add_signed(duration);
        if wrapped != 0 {
            return None;
        }
        current = current.max(taken_until);
    }

    let (end, wrapped) = current.overflowing_add_signed(duration);
    if wrapped != 0 || end > work_end {
        return None;
    }
    Some(current)
}

fn fits_before(current: NaiveTime, duration: TimeDelta, next_start: NaiveTime) -> bool {
    let (end, wrapped) = current.overflowing_add_signed(duration);
    wrapped == 0 && end <= next_start
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::Placement;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn placed(id: u64, start: NaiveTime) -> Exam {
        Exam {
            id,
            subject: "Physics".to_string(),
            instructor: format!("i{id}"),
            section_id: id,
            placement: Some(Placement {
                day: NaiveDate::from_ymd_opt(2025, 2, 24).unwrap(),
                start,
                room_id: id,
            }),
        }
    }

    fn three_hours() -> TimeDelta {
        TimeDelta::minutes(180)
    }

    #[test]
    fn empty_day_starts_at_opening() {
        assert_eq!(
            find_start(&[], at(9, 0), at(19, 30), three_hours()),
            Some(at(9, 0))
        );
    }

    #[test]
    fn packs_after_committed_exams_regardless_of_insert_order() {
        let day = vec![placed(2, at(12, 0)), placed(1, at(9, 0))];
        assert_eq!(
            find_start(&day, at(9, 0), at(19, 30), three_hours()),
            Some(at(15, 0))
        );
    }

    #[test]
    fn uses_a_gap_large_enough_for_one_exam() {
        let day = vec![placed(1, at(12, 0))];
        assert_eq!(
            find_start(&day, at(9, 0), at(19, 30), three_hours()),
            Some(at(9, 0))
        );

        let day = vec![placed(1, at(11, 0))];
        assert_eq!(
            find_start(&day, at(9, 0), at(19, 30), three_hours()),
            Some(at(14, 0))
        );
    }

    #[test]
    fn reports_exhaustion_instead_of_wrapping_to_morning() {
        let day = vec![
            placed(1, at(9, 0)),
            placed(2, at(12, 0)),
            placed(3, at(15, 0)),
        ];
        // 18:00 + 3h overruns 19:30
        assert_eq!(find_start(&day, at(9, 0), at(19, 30), three_hours()), None);
    }

    #[test]
    fn exact_fit_at_closing_is_allowed() {
        let day = vec![placed(1, at(9, 0))];
        assert_eq!(
            find_start(&day, at(9, 0), at(15, 0), three_hours()),
            Some(at(12, 0))
        );
    }

    #[test]
    fn never_runs_past_midnight() {
        assert_eq!(
            find_start(&[], at(22, 0), at(23, 59), three_hours()),
            None
        );
    }
}
