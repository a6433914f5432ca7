//! Appointment scheduling and conflict-resolution engine.
//!
//! Users book fixed-duration slots with consultants. The engine generates
//! the bookable slot grid for a working day, resolves which slots are free,
//! admits new bookings atomically against overlap and quota constraints,
//! and gates every status change through a role-scoped state machine.

pub mod appointment;
pub mod availability;
pub mod consultant;
pub mod error;
pub mod repo;
pub mod service;
pub mod slots;
pub mod time;
pub mod transition;
pub mod utils;
pub mod workday;
