//! Sled-backed repository for appointments and the consultant roster.
//!
//! Everything lives in the default tree under prefixed string keys:
//!
//! - `apt/{id}`                               -> appointment record (CBOR)
//! - `slot/{consultant_id}/{date}/{slot}`     -> appointment id
//! - `user/{user_id}/{date}/{appointment_id}` -> slot label
//! - `cons/{id}`                              -> consultant record (CBOR)
//!
//! The `slot/` index is the single definition of "is this slot free": an
//! entry exists iff the slot is held by a non-cancelled appointment
//! (completed appointments keep theirs forever). Availability scans it,
//! and admission claims its key with a compare-and-swap, so display-time
//! and booking-time answers can never diverge.

use crate::appointment::{Appointment, Status};
use crate::consultant::Consultant;
use crate::error::BookingError;
use crate::time::CalendarDay;
use sled::{Batch, Db};
use std::sync::Arc;

pub struct Repository {
    instance: Arc<Db>,
}

fn appointment_key(id: &str) -> String {
    format!("apt/{id}")
}

fn slot_key(consultant_id: &str, date: CalendarDay, slot: &str) -> String {
    format!("slot/{consultant_id}/{date}/{slot}")
}

fn slot_prefix(consultant_id: &str, date: CalendarDay) -> String {
    format!("slot/{consultant_id}/{date}/")
}

fn user_key(user_id: &str, date: CalendarDay, appointment_id: &str) -> String {
    format!("user/{user_id}/{date}/{appointment_id}")
}

fn user_prefix(user_id: &str, date: CalendarDay) -> String {
    format!("user/{user_id}/{date}/")
}

fn consultant_key(id: &str) -> String {
    format!("cons/{id}")
}

impl Repository {
    pub fn new(instance: Arc<Db>) -> Self {
        Self { instance }
    }

    /// Commit a pending appointment iff its slot is still unclaimed.
    ///
    /// The compare-and-swap on the slot-index key is the admission point:
    /// of two concurrent bookings for the same `(consultant, date, slot)`
    /// exactly one lands the key, and the loser gets `SlotTaken` - the
    /// same outcome as discovering the conflict up front. The record and
    /// the user-day index entry then go in as one batch.
    pub fn insert_if_slot_free(&self, appointment: &Appointment) -> Result<(), BookingError> {
        let key = slot_key(&appointment.consultant_id, appointment.date, &appointment.slot);

        let claimed = self.instance.compare_and_swap(
            key.as_bytes(),
            None as Option<&[u8]>,
            Some(appointment.id.as_bytes()),
        )?;
        if claimed.is_err() {
            return Err(BookingError::SlotTaken);
        }

        let mut batch = Batch::default();
        batch.insert(
            appointment_key(&appointment.id).into_bytes(),
            minicbor::to_vec(appointment)?,
        );
        batch.insert(
            user_key(&appointment.user_id, appointment.date, &appointment.id).into_bytes(),
            appointment.slot.as_bytes(),
        );
        self.instance.apply_batch(batch)?;

        Ok(())
    }

    /// Rewrite an appointment after a status change. Moving to `Cancelled`
    /// releases the slot-index and user-day entries in the same batch, so
    /// the slot is freed atomically with the record update.
    pub fn update_status(&self, appointment: &Appointment) -> Result<(), BookingError> {
        let mut batch = Batch::default();
        batch.insert(
            appointment_key(&appointment.id).into_bytes(),
            minicbor::to_vec(appointment)?,
        );
        if appointment.status == Status::Cancelled {
            batch.remove(
                slot_key(&appointment.consultant_id, appointment.date, &appointment.slot)
                    .into_bytes(),
            );
            batch.remove(
                user_key(&appointment.user_id, appointment.date, &appointment.id).into_bytes(),
            );
        }
        self.instance.apply_batch(batch)?;

        Ok(())
    }

    pub fn get_appointment(&self, id: &str) -> Result<Appointment, BookingError> {
        let bytes = self
            .instance
            .get(appointment_key(id).as_bytes())?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        Ok(minicbor::decode(&bytes)?)
    }

    /// Every `(slot label, appointment id)` pair currently holding a slot
    /// for this consultant/date, in slot order. Zero-padded `HH:MM` labels
    /// make key order chronological.
    pub fn held_slots(
        &self,
        consultant_id: &str,
        date: CalendarDay,
    ) -> Result<Vec<(String, String)>, BookingError> {
        let prefix = slot_prefix(consultant_id, date);
        let mut held = Vec::new();

        for entry in self.instance.scan_prefix(prefix.as_bytes()) {
            let (key, value) = entry?;
            let label = key[prefix.len()..].to_vec();
            held.push((
                String::from_utf8_lossy(&label).into_owned(),
                String::from_utf8_lossy(&value).into_owned(),
            ));
        }

        Ok(held)
    }

    /// Non-cancelled appointments this user holds on the given date.
    pub fn count_user_appointments(
        &self,
        user_id: &str,
        date: CalendarDay,
    ) -> Result<usize, BookingError> {
        let mut count = 0;
        for entry in self.instance.scan_prefix(user_prefix(user_id, date).as_bytes()) {
            entry?;
            count += 1;
        }

        Ok(count)
    }

    /// Full scan of every appointment record, cancelled ones included.
    pub fn all_appointments(&self) -> Result<Vec<Appointment>, BookingError> {
        let mut out = Vec::new();
        for entry in self.instance.scan_prefix(b"apt/") {
            let (_, value) = entry?;
            out.push(minicbor::decode(&value)?);
        }

        Ok(out)
    }

    pub fn put_consultant(&self, consultant: &Consultant) -> Result<(), BookingError> {
        self.instance.insert(
            consultant_key(&consultant.id).into_bytes(),
            minicbor::to_vec(consultant)?,
        )?;

        Ok(())
    }

    pub fn get_consultant(&self, id: &str) -> Result<Consultant, BookingError> {
        let bytes = self
            .instance
            .get(consultant_key(id).as_bytes())?
            .ok_or_else(|| BookingError::NotFound(id.to_string()))?;

        Ok(minicbor::decode(&bytes)?)
    }
}
