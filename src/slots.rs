//! The canonical slot grid for a working day.

use crate::error::BookingError;

/// Slot-grid configuration. Slots are `slot_minutes` long, starting on the
/// hour at `start_hour` and running up to but excluding `end_hour`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotConfig {
    start_hour: u32,
    end_hour: u32,
    slot_minutes: u32,
}

impl Default for SlotConfig {
    /// The standard working day: 10:00-18:00 in half-hour slots.
    fn default() -> Self {
        Self {
            start_hour: 10,
            end_hour: 18,
            slot_minutes: 30,
        }
    }
}

impl SlotConfig {
    /// Validated at construction; a bad grid is a startup error, not a
    /// per-request one.
    pub fn new(start_hour: u32, end_hour: u32, slot_minutes: u32) -> Result<Self, BookingError> {
        if start_hour >= end_hour {
            return Err(BookingError::Config(format!(
                "start_hour {start_hour} must be before end_hour {end_hour}"
            )));
        }
        if end_hour > 24 {
            return Err(BookingError::Config(format!(
                "end_hour {end_hour} is past midnight"
            )));
        }
        if slot_minutes == 0 || 60 % slot_minutes != 0 {
            return Err(BookingError::Config(format!(
                "slot_minutes {slot_minutes} must divide 60 evenly"
            )));
        }

        Ok(Self {
            start_hour,
            end_hour,
            slot_minutes,
        })
    }

    /// The ordered sequence of every slot label this configuration can
    /// produce for a working day. Pure and deterministic.
    pub fn slot_grid(&self) -> Vec<String> {
        let mut slots = Vec::with_capacity(self.slot_count());
        let mut minute_of_day = self.start_hour * 60;

        while minute_of_day < self.end_hour * 60 {
            slots.push(format!("{:02}:{:02}", minute_of_day / 60, minute_of_day % 60));
            minute_of_day += self.slot_minutes;
        }

        slots
    }

    pub fn slot_count(&self) -> usize {
        ((self.end_hour - self.start_hour) * 60 / self.slot_minutes) as usize
    }

    /// Whether a label's minute-of-day falls inside `[start, end)`. Guards
    /// against forged or stale client labels; unparsable labels fail closed.
    pub fn is_within_working_hours(&self, label: &str) -> bool {
        match parse_label(label) {
            Some(minute) => minute >= self.start_hour * 60 && minute < self.end_hour * 60,
            None => false,
        }
    }

    /// Whether a label is one the grid would actually emit: within working
    /// hours and aligned to the slot spacing.
    pub fn is_canonical(&self, label: &str) -> bool {
        match parse_label(label) {
            Some(minute) => {
                self.is_within_working_hours(label)
                    && (minute - self.start_hour * 60) % self.slot_minutes == 0
            }
            None => false,
        }
    }
}

/// Parse a strict `HH:MM` label into its minute of day.
fn parse_label(label: &str) -> Option<u32> {
    let (hours, minutes) = label.split_once(':')?;
    if hours.len() != 2 || minutes.len() != 2 {
        return None;
    }
    if !hours.bytes().all(|b| b.is_ascii_digit()) || !minutes.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }

    let hours: u32 = hours.parse().ok()?;
    let minutes: u32 = minutes.parse().ok()?;
    if hours > 23 || minutes > 59 {
        return None;
    }

    Some(hours * 60 + minutes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_grid_spans_the_working_day() {
        let grid = SlotConfig::default().slot_grid();

        assert_eq!(grid.len(), 16);
        assert_eq!(grid.first().map(String::as_str), Some("10:00"));
        assert_eq!(grid.last().map(String::as_str), Some("17:30"));
        // 18:00 is the exclusive upper bound
        assert!(!grid.iter().any(|s| s == "18:00"));
    }

    #[test]
    fn grid_is_strictly_increasing() {
        let grid = SlotConfig::default().slot_grid();

        for pair in grid.windows(2) {
            assert!(pair[0] < pair[1], "{} should sort before {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn grid_length_matches_formula() {
        let config = SlotConfig::new(9, 17, 20).unwrap();
        assert_eq!(config.slot_grid().len(), config.slot_count());
        assert_eq!(config.slot_count(), 24);
    }

    #[test]
    fn rejects_inverted_hours() {
        assert!(matches!(
            SlotConfig::new(18, 10, 30),
            Err(BookingError::Config(_))
        ));
        assert!(matches!(
            SlotConfig::new(10, 10, 30),
            Err(BookingError::Config(_))
        ));
    }

    #[test]
    fn rejects_bad_slot_minutes() {
        assert!(matches!(
            SlotConfig::new(10, 18, 0),
            Err(BookingError::Config(_))
        ));
        // 45 does not divide 60
        assert!(matches!(
            SlotConfig::new(10, 18, 45),
            Err(BookingError::Config(_))
        ));
    }

    #[test]
    fn rejects_hours_past_midnight() {
        assert!(matches!(
            SlotConfig::new(10, 25, 30),
            Err(BookingError::Config(_))
        ));
    }

    #[test]
    fn working_hours_boundaries() {
        let config = SlotConfig::default();

        assert!(config.is_within_working_hours("10:00"));
        assert!(config.is_within_working_hours("17:30"));
        assert!(config.is_within_working_hours("17:59"));
        assert!(!config.is_within_working_hours("18:00"));
        assert!(!config.is_within_working_hours("09:59"));
    }

    #[test]
    fn canonical_requires_grid_alignment() {
        let config = SlotConfig::default();

        assert!(config.is_canonical("10:00"));
        assert!(config.is_canonical("10:30"));
        assert!(!config.is_canonical("10:15"));
        assert!(!config.is_canonical("18:00"));
    }

    #[test]
    fn malformed_labels_fail_closed() {
        let config = SlotConfig::default();

        for label in ["", "10", "10:0", "1000", "aa:bb", "10:300", "-1:00", " 10:00"] {
            assert!(!config.is_within_working_hours(label), "{label:?}");
            assert!(!config.is_canonical(label), "{label:?}");
        }
    }

    #[test]
    fn every_grid_label_is_canonical() {
        let config = SlotConfig::new(8, 20, 15).unwrap();

        for label in config.slot_grid() {
            assert!(config.is_canonical(&label), "{label}");
        }
    }
}
