//! Booking accessor and the availability engine.
//!
//! A vehicle's calendar is held by its bookings in `confirmed` or `active`
//! status; those must never overlap. `pending` bookings are provisional
//! requests and do not block other requests, so the invariant is enforced
//! at the two points where a blocking booking can appear: reserving with a
//! blocking status, and confirming a pending booking. Both run their check
//! and their write inside the same collection write lock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::{Filter, Paginated, Patch, RecordId, Result, StoreError};
use crate::store::Store;

use super::entity::{BaseRecord, Entity, Repository, decode, to_fields};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    Pending,
    Confirmed,
    Active,
    Completed,
    Cancelled,
}

impl BookingStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Whether a booking in this status holds the vehicle's calendar.
    pub fn blocks_availability(self) -> bool {
        matches!(self, Self::Confirmed | Self::Active)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    /// Legal lifecycle moves: pending -> confirmed -> active -> completed,
    /// with cancellation possible until the booking is terminal.
    pub fn can_transition_to(self, next: BookingStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed)
                | (Self::Confirmed, Self::Active)
                | (Self::Active, Self::Completed)
                | (Self::Pending | Self::Confirmed | Self::Active, Self::Cancelled)
        )
    }
}

impl From<BookingStatus> for JsonValue {
    fn from(status: BookingStatus) -> Self {
        JsonValue::String(status.as_str().to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Booking {
    #[serde(flatten)]
    pub base: BaseRecord,
    pub vehicle_id: RecordId,
    pub renter_id: RecordId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
}

impl Entity for Booking {
    const COLLECTION: &'static str = "bookings";

    fn base(&self) -> &BaseRecord {
        &self.base
    }
}

impl Booking {
    /// Whether this booking blocks the given date range for its vehicle.
    fn blocks(&self, vehicle_id: RecordId, start: NaiveDate, end: NaiveDate) -> bool {
        self.vehicle_id == vehicle_id
            && self.status.blocks_availability()
            && ranges_overlap(start, end, self.start_date, self.end_date)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewBooking {
    pub vehicle_id: RecordId,
    pub renter_id: RecordId,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub status: BookingStatus,
}

/// Half-open interval overlap: `[a1, a2)` and `[b1, b2)` overlap iff
/// `a1 < b2 && a2 > b1`. Equal boundary dates do not overlap, so one
/// rental may end the day another begins.
pub fn ranges_overlap(a1: NaiveDate, a2: NaiveDate, b1: NaiveDate, b2: NaiveDate) -> bool {
    a1 < b2 && a2 > b1
}

fn validate_range(start: NaiveDate, end: NaiveDate) -> Result<()> {
    if start < end {
        Ok(())
    } else {
        Err(StoreError::Invalid(format!(
            "booking start date {start} must be before end date {end}"
        )))
    }
}

/// Accessor for the "bookings" collection. Bookings are only created
/// through [`Bookings::reserve`], which folds the availability check and
/// the insert into one critical section.
#[derive(Clone)]
pub struct Bookings {
    records: Repository<Booking>,
}

impl Bookings {
    pub fn new(store: &Store) -> Self {
        Self {
            records: Repository::new(store),
        }
    }

    pub fn records(&self) -> &Repository<Booking> {
        &self.records
    }

    pub async fn find(&self, id: RecordId) -> Result<Option<Booking>> {
        self.records.find(id).await
    }

    pub async fn delete(&self, id: RecordId) -> Result<Booking> {
        self.records.delete(id).await
    }

    pub async fn find_by_vehicle(&self, vehicle_id: RecordId) -> Result<Vec<Booking>> {
        self.records
            .find_where(&Filter::new().equals("vehicle_id", vehicle_id))
            .await
    }

    pub async fn find_by_renter(&self, renter_id: RecordId) -> Result<Vec<Booking>> {
        self.records
            .find_where(&Filter::new().equals("renter_id", renter_id))
            .await
    }

    pub async fn find_by_status(&self, status: BookingStatus) -> Result<Vec<Booking>> {
        self.records
            .find_where(&Filter::new().equals("status", status))
            .await
    }

    pub async fn paginate(
        &self,
        page: usize,
        per_page: usize,
        filter: &Filter,
    ) -> Result<Paginated<Booking>> {
        self.records.paginate(page, per_page, filter).await
    }

    /// Whether `[start, end)` is free of confirmed/active bookings for the
    /// vehicle. Read-only; it does not hold the slot. Creation flows must
    /// use [`Bookings::reserve`], which re-checks under the write lock.
    pub async fn is_available(
        &self,
        vehicle_id: RecordId,
        start: NaiveDate,
        end: NaiveDate,
    ) -> Result<bool> {
        let bookings = self.records.all().await?;
        Ok(!bookings.iter().any(|b| b.blocks(vehicle_id, start, end)))
    }

    /// Create a booking, atomically with the availability check.
    ///
    /// The bookings write lock is held across check and insert, so two
    /// concurrent reservations of overlapping ranges cannot both pass:
    /// the loser gets `Conflict`. The requested range must also be free
    /// when the draft itself is only `pending`: a renter cannot request
    /// dates already held by a confirmed or active booking.
    pub async fn reserve(&self, draft: &NewBooking) -> Result<Booking> {
        validate_range(draft.start_date, draft.end_date)?;

        let collection = self.records.collection();
        let mut guard = collection.begin_write().await;

        let taken = guard
            .records()
            .await?
            .into_iter()
            .map(decode::<Booking>)
            .collect::<Result<Vec<_>>>()?
            .iter()
            .any(|b| b.blocks(draft.vehicle_id, draft.start_date, draft.end_date));
        if taken {
            return Err(StoreError::Conflict(format!(
                "vehicle {} is already booked between {} and {}",
                draft.vehicle_id, draft.start_date, draft.end_date
            )));
        }

        decode(guard.create(to_fields(draft)?).await?)
    }

    /// Move a booking through its lifecycle, validating the transition.
    ///
    /// Confirming is the moment a provisional booking starts blocking the
    /// calendar, so the overlap check runs again here, under the same
    /// write lock as the status change; a pending booking whose dates were
    /// confirmed to someone else in the meantime gets `Conflict`.
    pub async fn set_status(&self, id: RecordId, next: BookingStatus) -> Result<Booking> {
        let collection = self.records.collection();
        let mut guard = collection.begin_write().await;

        let bookings = guard
            .records()
            .await?
            .into_iter()
            .map(decode::<Booking>)
            .collect::<Result<Vec<_>>>()?;
        let current = bookings
            .iter()
            .find(|b| b.id() == id)
            .ok_or_else(|| StoreError::not_found(Booking::COLLECTION, id))?;

        if !current.status.can_transition_to(next) {
            return Err(StoreError::Invalid(format!(
                "booking {} cannot move from '{}' to '{}'",
                id,
                current.status.as_str(),
                next.as_str()
            )));
        }

        let starts_blocking = next.blocks_availability() && !current.status.blocks_availability();
        if starts_blocking {
            let taken = bookings.iter().any(|b| {
                b.id() != id && b.blocks(current.vehicle_id, current.start_date, current.end_date)
            });
            if taken {
                return Err(StoreError::Conflict(format!(
                    "vehicle {} is already booked between {} and {}",
                    current.vehicle_id, current.start_date, current.end_date
                )));
            }
        }

        decode(guard.update(id, Patch::new().set("status", next)).await?)
    }

    pub async fn confirm(&self, id: RecordId) -> Result<Booking> {
        self.set_status(id, BookingStatus::Confirmed).await
    }

    pub async fn cancel(&self, id: RecordId) -> Result<Booking> {
        self.set_status(id, BookingStatus::Cancelled).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn test_boundary_touch_is_not_overlap() {
        assert!(!ranges_overlap(
            date("2024-01-15"),
            date("2024-01-17"),
            date("2024-01-17"),
            date("2024-01-19"),
        ));
        assert!(!ranges_overlap(
            date("2024-01-10"),
            date("2024-01-15"),
            date("2024-01-15"),
            date("2024-01-17"),
        ));
    }

    #[test]
    fn test_partial_and_contained_overlaps() {
        assert!(ranges_overlap(
            date("2024-01-16"),
            date("2024-01-18"),
            date("2024-01-15"),
            date("2024-01-17"),
        ));
        assert!(ranges_overlap(
            date("2024-01-01"),
            date("2024-02-01"),
            date("2024-01-10"),
            date("2024-01-11"),
        ));
    }

    #[test]
    fn test_status_transitions() {
        use BookingStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Active));
        assert!(Active.can_transition_to(Completed));
        for status in [Pending, Confirmed, Active] {
            assert!(status.can_transition_to(Cancelled));
        }
        assert!(!Pending.can_transition_to(Active));
        assert!(!Confirmed.can_transition_to(Completed));
        assert!(!Completed.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
    }

    #[test]
    fn test_only_confirmed_and_active_block() {
        use BookingStatus::*;
        assert!(Confirmed.blocks_availability());
        assert!(Active.blocks_availability());
        assert!(!Pending.blocks_availability());
        assert!(!Completed.blocks_availability());
        assert!(!Cancelled.blocks_availability());
    }
}
