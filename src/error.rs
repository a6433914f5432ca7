use crate::appointment::{Role, Status};

/// Every rejected precondition gets its own variant so callers (and the
/// test suite) can assert on cause. Infrastructure failures keep to the
/// `Storage`/`Codec`/`Internal` variants and never masquerade as a
/// business outcome.
#[derive(thiserror::Error, Debug)]
pub enum BookingError {
    #[error("{0}")]
    Validation(String),
    #[error("no record found for {0}")]
    NotFound(String),
    #[error("cannot book appointments in the past")]
    PastDate,
    #[error("appointments only available Monday to Friday")]
    Weekend,
    #[error("time slot {0:?} is not on the bookable grid")]
    InvalidSlot(String),
    #[error("consultant {0} is not accepting bookings")]
    InactiveConsultant(String),
    #[error("this time slot is already booked")]
    SlotTaken,
    #[error("maximum {0} appointments allowed per day")]
    QuotaExceeded(usize),
    #[error("{role:?} actor may not move this appointment to {target}")]
    ForbiddenTransition { role: Role, target: Status },
    #[error("cannot change status of a {0} appointment")]
    TerminalState(Status),
    #[error("unknown status label {0:?}")]
    InvalidStatus(String),
    #[error("invalid slot grid: {0}")]
    Config(String),

    #[error(transparent)]
    Storage(#[from] sled::Error),
    #[error("failed to decode stored record")]
    Codec(#[from] minicbor::decode::Error),
    #[error("failed to encode record")]
    Encode(#[from] minicbor::encode::Error<std::convert::Infallible>),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
