//! Resolve which slots are currently free for a consultant on a date.

use crate::error::BookingError;
use crate::repo::Repository;
use crate::slots::SlotConfig;
use crate::time::CalendarDay;

pub const WEEKEND_NOTE: &str = "no service on weekends";

/// Free slots plus the raw counts, for callers that want to show how full
/// a day is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Availability {
    pub date: CalendarDay,
    pub total_slots: usize,
    pub booked_count: usize,
    pub available_slots: Vec<String>,
    pub note: Option<&'static str>,
}

/// Canonical grid minus the slots held by non-cancelled appointments,
/// canonical order preserved. Weekends are a valid query that yields
/// nothing; past dates are an error.
///
/// This is the one code path that defines "is this slot free" - the
/// booking committer checks against it and then claims the same slot
/// index it reads.
pub fn resolve(
    repo: &Repository,
    config: &SlotConfig,
    consultant_id: &str,
    date: CalendarDay,
    today: CalendarDay,
) -> Result<Availability, BookingError> {
    if date < today {
        return Err(BookingError::PastDate);
    }
    if date.is_weekend() {
        return Ok(Availability {
            date,
            total_slots: 0,
            booked_count: 0,
            available_slots: Vec::new(),
            note: Some(WEEKEND_NOTE),
        });
    }

    let booked: Vec<String> = repo
        .held_slots(consultant_id, date)?
        .into_iter()
        .map(|(slot, _)| slot)
        .collect();

    let grid = config.slot_grid();
    let total_slots = grid.len();
    let available_slots: Vec<String> = grid
        .into_iter()
        .filter(|slot| !booked.contains(slot))
        .collect();

    Ok(Availability {
        date,
        total_slots,
        booked_count: booked.len(),
        available_slots,
        note: None,
    })
}
