use std::collections::HashSet;

use crate::data::{Exam, Room, RoomId};

/// First room, in input order, that no committed exam uses that day and that seats `headcount`.
///
/// A room serves at most one exam per day, whatever time slots remain free in it.
pub fn find_room<'a>(
    rooms: &'a [Room],
    day_exams: &[Exam],
    headcount: usize,
) -> Option<&'a Room> {
    let used: HashSet<RoomId> = day_exams.iter().filter_map(Exam::room_id).collect();
    rooms
        .iter()
        .find(|room| !used.contains(&room.id) && seats(room.capacity, headcount))
}

// a capacity too large for usize seats any cohort
fn seats(capacity: u32, headcount: usize) -> bool {
    usize::try_from(capacity).map_or(true, |capacity| capacity >= headcount)
}
