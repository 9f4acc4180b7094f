use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::booking_details::BookingDetailEntity;
use crate::domain::entities::bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity};
use crate::domain::value_objects::bookings::{ListBookingsFilter, RoomConflict, RoomLine};
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;

#[automock]
#[async_trait]
pub trait BookingRepository {
    /// Inserts the booking and its detail rows in one transaction. The
    /// implementation must lock the candidate room rows and re-run the
    /// overlap check before inserting; a concurrent overlap surfaces as
    /// a `RoomConflictDetected` error.
    async fn create_booking_with_details(
        &self,
        booking: InsertBookingEntity,
        lines: Vec<RoomLine>,
    ) -> Result<Uuid>;

    /// Applies the changeset and, when `lines` is given, replaces the detail
    /// rows. Same transactional locking discipline as creation, with the
    /// booking's own rows excluded from the overlap check.
    async fn update_booking_with_details(
        &self,
        booking_id: Uuid,
        changes: UpdateBookingEntity,
        lines: Option<Vec<RoomLine>>,
    ) -> Result<()>;

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<BookingEntity>>;

    async fn find_details(&self, booking_id: Uuid) -> Result<Vec<BookingDetailEntity>>;

    async fn list_bookings(&self, filter: ListBookingsFilter) -> Result<Vec<BookingEntity>>;

    /// Half-open overlap scan over non-cancelled bookings.
    async fn find_conflicts(
        &self,
        room_ids: Vec<Uuid>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<RoomConflict>>;

    /// Guarded status update: only rows currently in one of `from` move to
    /// `to`. Returns whether a row was updated.
    async fn update_status(
        &self,
        booking_id: Uuid,
        from: Vec<BookingStatus>,
        to: BookingStatus,
    ) -> Result<bool>;

    /// Hard delete cascading detail and payment rows.
    async fn delete_booking(&self, booking_id: Uuid) -> Result<()>;

    async fn bookings_checking_in_on(
        &self,
        date: NaiveDate,
        statuses: Vec<BookingStatus>,
    ) -> Result<Vec<BookingEntity>>;

    async fn bookings_checking_out_on(
        &self,
        date: NaiveDate,
        statuses: Vec<BookingStatus>,
    ) -> Result<Vec<BookingEntity>>;
}
