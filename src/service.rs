//! Service layer API for scheduling operations.

use crate::appointment::{Appointment, Role, Status};
use crate::availability::{self, Availability};
use crate::consultant::Consultant;
use crate::error::BookingError;
use crate::repo::Repository;
use crate::slots::SlotConfig;
use crate::time::{CalendarDay, Clock, SystemClock};
use crate::{transition, workday};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Per-user cap of non-cancelled appointments on a single date.
pub const MAX_DAILY_APPOINTMENTS: usize = 3;

pub struct BookingService {
    repo: Repository,
    config: SlotConfig,
    clock: Arc<dyn Clock>,
}

impl BookingService {
    pub fn new(instance: Arc<sled::Db>) -> Self {
        Self::with_config(instance, SlotConfig::default())
    }

    pub fn with_config(instance: Arc<sled::Db>, config: SlotConfig) -> Self {
        Self {
            repo: Repository::new(instance),
            config,
            clock: Arc::new(SystemClock),
        }
    }

    /// Swap in a pinned clock for deterministic date-boundary behavior.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Add a consultant to the roster, active by default.
    pub fn register_consultant(
        &self,
        name: &str,
        specialization: &str,
    ) -> Result<Consultant, BookingError> {
        if name.trim().is_empty() {
            return Err(BookingError::Validation("consultant name is required".into()));
        }

        let consultant = Consultant::new(name, specialization)?;
        self.repo.put_consultant(&consultant)?;
        info!(consultant = %consultant.id, name, "consultant registered");

        Ok(consultant)
    }

    /// Flip a consultant's availability for new bookings. Existing
    /// appointments are untouched.
    pub fn set_consultant_active(
        &self,
        consultant_id: &str,
        active: bool,
    ) -> Result<Consultant, BookingError> {
        let mut consultant = self.repo.get_consultant(consultant_id)?;
        consultant.is_active = active;
        self.repo.put_consultant(&consultant)?;
        info!(consultant = %consultant.id, active, "consultant roster updated");

        Ok(consultant)
    }

    /// Free slots for a consultant on a date. Weekends resolve to an empty
    /// set with an explanatory note rather than an error.
    pub fn list_available_slots(
        &self,
        consultant_id: &str,
        date: CalendarDay,
    ) -> Result<Availability, BookingError> {
        self.repo.get_consultant(consultant_id)?;

        availability::resolve(&self.repo, &self.config, consultant_id, date, self.clock.today())
    }

    /// Validate and atomically commit a new booking. Checks run in a fixed
    /// order and the first violated precondition wins; nothing is written
    /// unless every check passes.
    pub fn create_booking(
        &self,
        user_id: &str,
        consultant_id: &str,
        date: CalendarDay,
        slot: &str,
    ) -> Result<Appointment, BookingError> {
        if user_id.trim().is_empty() || consultant_id.trim().is_empty() || slot.trim().is_empty() {
            return Err(BookingError::Validation(
                "user, consultant and time slot are required".into(),
            ));
        }

        let consultant = self.repo.get_consultant(consultant_id)?;
        if !consultant.is_active {
            return Err(BookingError::InactiveConsultant(consultant.id));
        }

        let today = self.clock.today();
        if !workday::is_bookable_date(date, today) {
            if date < today {
                return Err(BookingError::PastDate);
            }
            return Err(BookingError::Weekend);
        }

        if !self.config.is_canonical(slot) {
            return Err(BookingError::InvalidSlot(slot.to_string()));
        }

        let open = availability::resolve(&self.repo, &self.config, consultant_id, date, today)?;
        if !open.available_slots.iter().any(|s| s == slot) {
            return Err(BookingError::SlotTaken);
        }

        let held = self.repo.count_user_appointments(user_id, date)?;
        if held >= MAX_DAILY_APPOINTMENTS {
            debug!(user = %user_id, %date, held, "daily quota reached");
            return Err(BookingError::QuotaExceeded(MAX_DAILY_APPOINTMENTS));
        }

        let appointment = Appointment::new(user_id, consultant_id, date, slot, self.clock.now())?;
        // A concurrent booking that claimed the slot between the check
        // above and this commit surfaces here as SlotTaken.
        self.repo.insert_if_slot_free(&appointment)?;
        info!(
            appointment = %appointment.id,
            consultant = %consultant_id,
            date = %date,
            slot = %appointment.slot,
            "booking committed"
        );

        Ok(appointment)
    }

    /// Apply a role-scoped status change. `target` is the caller-supplied
    /// label; unknown labels are rejected before the record is even loaded.
    pub fn change_status(
        &self,
        appointment_id: &str,
        actor_id: &str,
        role: Role,
        target: &str,
    ) -> Result<Appointment, BookingError> {
        let target: Status = target.parse()?;
        let mut appointment = self.repo.get_appointment(appointment_id)?;
        let current = appointment.status;

        if current.is_terminal() {
            if target == current && role == Role::Admin {
                // idempotent no-op
                debug!(appointment = %appointment.id, status = %current, "status unchanged");
                return Ok(appointment);
            }
            if target == current {
                return Err(BookingError::ForbiddenTransition { role, target });
            }
            warn!(appointment = %appointment.id, %current, %target, "transition out of terminal state rejected");
            return Err(BookingError::TerminalState(current));
        }

        if role == Role::User && appointment.user_id != actor_id {
            return Err(BookingError::ForbiddenTransition { role, target });
        }
        if !transition::is_allowed(role, current, target) {
            return Err(BookingError::ForbiddenTransition { role, target });
        }

        appointment.status = target;
        appointment.updated_at = self.clock.now();
        self.repo.update_status(&appointment)?;
        info!(appointment = %appointment.id, from = %current, to = %target, "status changed");

        Ok(appointment)
    }

    /// Convenience specialization of [`change_status`] for the one path
    /// users have: cancelling their own booking.
    ///
    /// [`change_status`]: BookingService::change_status
    pub fn cancel_own_booking(
        &self,
        appointment_id: &str,
        user_id: &str,
    ) -> Result<Appointment, BookingError> {
        self.change_status(appointment_id, user_id, Role::User, "CANCELLED")
    }

    /// Fetch one appointment. Users only see their own; a foreign id
    /// resolves to `NotFound` rather than leaking that it exists.
    pub fn get_appointment(
        &self,
        appointment_id: &str,
        actor_id: &str,
        role: Role,
    ) -> Result<Appointment, BookingError> {
        let appointment = self.repo.get_appointment(appointment_id)?;
        if role == Role::User && appointment.user_id != actor_id {
            return Err(BookingError::NotFound(appointment_id.to_string()));
        }

        Ok(appointment)
    }

    /// All of a user's appointments, cancelled ones included, optionally
    /// narrowed to one status. Most recent date first, then slot order.
    pub fn user_appointments(
        &self,
        user_id: &str,
        status: Option<Status>,
    ) -> Result<Vec<Appointment>, BookingError> {
        let mut list: Vec<Appointment> = self
            .repo
            .all_appointments()?
            .into_iter()
            .filter(|a| a.user_id == user_id)
            .filter(|a| status.is_none_or(|s| a.status == s))
            .collect();
        list.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slot.cmp(&b.slot)));

        Ok(list)
    }

    /// A consultant's live schedule for one day: every appointment still
    /// holding a slot, in slot order.
    pub fn appointments_for_day(
        &self,
        consultant_id: &str,
        date: CalendarDay,
    ) -> Result<Vec<Appointment>, BookingError> {
        let mut out = Vec::new();
        for (_, appointment_id) in self.repo.held_slots(consultant_id, date)? {
            out.push(self.repo.get_appointment(&appointment_id)?);
        }

        Ok(out)
    }
}
