//! The appointment record and its status vocabulary.

use crate::error::BookingError;
use crate::time::{CalendarDay, TimeStamp};
use crate::utils;
use chrono::Utc;
use std::fmt;
use std::str::FromStr;

/// Appointment lifecycle status. `Cancelled` and `Completed` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub enum Status {
    #[n(0)]
    Pending,
    #[n(1)]
    Confirmed,
    #[n(2)]
    Cancelled,
    #[n(3)]
    Completed,
}

impl Status {
    pub const ALL: [Status; 4] = [
        Status::Pending,
        Status::Confirmed,
        Status::Cancelled,
        Status::Completed,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, Status::Cancelled | Status::Completed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Confirmed => "CONFIRMED",
            Status::Cancelled => "CANCELLED",
            Status::Completed => "COMPLETED",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Status {
    type Err = BookingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(Status::Pending),
            "CONFIRMED" => Ok(Status::Confirmed),
            "CANCELLED" => Ok(Status::Cancelled),
            "COMPLETED" => Ok(Status::Completed),
            other => Err(BookingError::InvalidStatus(other.to_string())),
        }
    }
}

/// Actor role for status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Admin,
}

/// One booking. Identity and the `(user, consultant, date, slot)` facts are
/// immutable after creation; only `status` and `updated_at` ever change,
/// and only through the transition engine.
#[derive(Debug, Clone, PartialEq, Eq, minicbor::Encode, minicbor::Decode)]
pub struct Appointment {
    #[n(0)]
    pub id: String,
    #[n(1)]
    pub user_id: String,
    #[n(2)]
    pub consultant_id: String,
    #[n(3)]
    pub date: CalendarDay,
    #[n(4)]
    pub slot: String,
    #[n(5)]
    pub status: Status,
    #[n(6)]
    pub created_at: TimeStamp<Utc>,
    #[n(7)]
    pub updated_at: TimeStamp<Utc>,
}

impl Appointment {
    /// A freshly booked appointment. Always starts out `Pending`.
    pub fn new(
        user_id: &str,
        consultant_id: &str,
        date: CalendarDay,
        slot: &str,
        created_at: TimeStamp<Utc>,
    ) -> anyhow::Result<Self> {
        let id = utils::mint_id("apt_")?;

        Ok(Self {
            id,
            user_id: user_id.to_owned(),
            consultant_id: consultant_id.to_owned(),
            date,
            slot: slot.to_owned(),
            status: Status::Pending,
            created_at: created_at.clone(),
            updated_at: created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_roundtrip() {
        for status in Status::ALL {
            let parsed: Status = status.as_str().parse().unwrap();
            assert_eq!(parsed, status);
        }
    }

    #[test]
    fn unknown_labels_are_rejected() {
        for label in ["", "pending", "DONE", "Cancelled", "PENDING "] {
            assert!(matches!(
                label.parse::<Status>(),
                Err(BookingError::InvalidStatus(_))
            ));
        }
    }

    #[test]
    fn terminal_statuses() {
        assert!(Status::Cancelled.is_terminal());
        assert!(Status::Completed.is_terminal());
        assert!(!Status::Pending.is_terminal());
        assert!(!Status::Confirmed.is_terminal());
    }

    #[test]
    fn new_appointment_starts_pending() {
        let appointment = Appointment::new(
            "user_abc",
            "cons_def",
            CalendarDay::new_with(2026, 1, 12),
            "10:00",
            TimeStamp::new(),
        )
        .unwrap();

        assert_eq!(appointment.status, Status::Pending);
        assert!(appointment.id.starts_with("apt_1"));
        assert_eq!(appointment.created_at, appointment.updated_at);
    }

    #[test]
    fn appointment_cbor_roundtrip() {
        let original = Appointment::new(
            "user_abc",
            "cons_def",
            CalendarDay::new_with(2026, 1, 12),
            "10:00",
            TimeStamp::new(),
        )
        .unwrap();

        let encoded = minicbor::to_vec(&original).unwrap();
        let decoded: Appointment = minicbor::decode(&encoded).unwrap();

        assert_eq!(original, decoded);
    }
}
