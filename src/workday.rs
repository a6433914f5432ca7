//! Working-day predicates. Pure, and they fail closed rather than erroring.

use crate::time::CalendarDay;

/// A date accepts new bookings iff it is not before `today` (date-only
/// comparison) and lands on a weekday.
pub fn is_bookable_date(date: CalendarDay, today: CalendarDay) -> bool {
    date >= today && !date.is_weekend()
}
