use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::{Connection, PgConnection, delete, insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::booking_details::{BookingDetailEntity, InsertBookingDetailEntity};
use crate::domain::entities::bookings::{BookingEntity, InsertBookingEntity, UpdateBookingEntity};
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::value_objects::bookings::{
    ListBookingsFilter, RoomConflict, RoomConflictDetected, RoomLine,
};
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::schema::{booking_details, bookings, payments, rooms};

pub struct BookingPostgres {
    db_pool: Arc<PgPool>,
}

impl BookingPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

/// Half-open overlap rule: stays on `[check_in, check_out)` conflict only
/// when they share at least one night. A checkout day equal to another
/// stay's check-in day does not conflict.
fn stays_overlap(
    a_check_in: NaiveDate,
    a_check_out: NaiveDate,
    b_check_in: NaiveDate,
    b_check_out: NaiveDate,
) -> bool {
    a_check_in < b_check_out && b_check_in < a_check_out
}

/// Loads the non-cancelled stays touching the candidate rooms and filters
/// them through [`stays_overlap`]. Cancelled bookings never block a room.
fn scan_conflicts(
    conn: &mut PgConnection,
    room_ids: &[Uuid],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> std::result::Result<Vec<RoomConflict>, diesel::result::Error> {
    let mut query = booking_details::table
        .inner_join(bookings::table)
        .select((
            booking_details::room_id,
            booking_details::booking_id,
            bookings::check_in,
            bookings::check_out,
        ))
        .filter(booking_details::room_id.eq_any(room_ids.to_vec()))
        .filter(bookings::status.ne(BookingStatus::Cancelled.to_string()))
        .into_boxed();

    if let Some(exclude) = exclude_booking_id {
        query = query.filter(bookings::id.ne(exclude));
    }

    let rows = query.load::<(Uuid, Uuid, NaiveDate, NaiveDate)>(conn)?;

    Ok(rows
        .into_iter()
        .filter(|(_, _, existing_in, existing_out)| {
            stays_overlap(*existing_in, *existing_out, check_in, check_out)
        })
        .map(|(room_id, booking_id, _, _)| RoomConflict {
            room_id,
            booking_id,
        })
        .collect())
}

/// Locks the candidate room rows so two transactions booking the same room
/// serialize, then re-runs the overlap scan inside the transaction.
fn lock_rooms_and_check(
    conn: &mut PgConnection,
    lines: &[RoomLine],
    check_in: NaiveDate,
    check_out: NaiveDate,
    exclude_booking_id: Option<Uuid>,
) -> std::result::Result<(), anyhow::Error> {
    let room_ids: Vec<Uuid> = lines.iter().map(|line| line.room_id).collect();

    rooms::table
        .filter(rooms::id.eq_any(&room_ids))
        .select(rooms::id)
        .for_update()
        .load::<Uuid>(conn)?;

    let conflicts = scan_conflicts(conn, &room_ids, check_in, check_out, exclude_booking_id)?;
    if let Some(conflict) = conflicts.first() {
        return Err(RoomConflictDetected {
            room_id: conflict.room_id,
        }
        .into());
    }

    Ok(())
}

fn detail_rows(booking_id: Uuid, lines: &[RoomLine]) -> Vec<InsertBookingDetailEntity> {
    lines
        .iter()
        .map(|line| InsertBookingDetailEntity {
            booking_id,
            room_id: line.room_id,
            price_per_night: line.price_per_night,
            adults: line.adults,
            children: line.children,
        })
        .collect()
}

#[async_trait]
impl BookingRepository for BookingPostgres {
    async fn create_booking_with_details(
        &self,
        booking: InsertBookingEntity,
        lines: Vec<RoomLine>,
    ) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let booking_id = conn.transaction::<Uuid, anyhow::Error, _>(|conn| {
            lock_rooms_and_check(conn, &lines, booking.check_in, booking.check_out, None)?;

            let booking_id = insert_into(bookings::table)
                .values(&booking)
                .returning(bookings::id)
                .get_result::<Uuid>(conn)?;

            insert_into(booking_details::table)
                .values(detail_rows(booking_id, &lines))
                .execute(conn)?;

            Ok(booking_id)
        })?;

        Ok(booking_id)
    }

    async fn update_booking_with_details(
        &self,
        booking_id: Uuid,
        changes: UpdateBookingEntity,
        lines: Option<Vec<RoomLine>>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), anyhow::Error, _>(|conn| {
            if let Some(lines) = &lines {
                lock_rooms_and_check(
                    conn,
                    lines,
                    changes.check_in,
                    changes.check_out,
                    Some(booking_id),
                )?;
            }

            update(bookings::table)
                .filter(bookings::id.eq(booking_id))
                .set(&changes)
                .execute(conn)?;

            if let Some(lines) = &lines {
                delete(booking_details::table)
                    .filter(booking_details::booking_id.eq(booking_id))
                    .execute(conn)?;
                insert_into(booking_details::table)
                    .values(detail_rows(booking_id, lines))
                    .execute(conn)?;
            }

            Ok(())
        })?;

        Ok(())
    }

    async fn find_booking(&self, booking_id: Uuid) -> Result<Option<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = bookings::table
            .filter(bookings::id.eq(booking_id))
            .select(BookingEntity::as_select())
            .first::<BookingEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_details(&self, booking_id: Uuid) -> Result<Vec<BookingDetailEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = booking_details::table
            .filter(booking_details::booking_id.eq(booking_id))
            .select(BookingDetailEntity::as_select())
            .load::<BookingDetailEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_bookings(&self, filter: ListBookingsFilter) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let mut query = bookings::table
            .select(BookingEntity::as_select())
            .into_boxed();
        if let Some(user_id) = filter.user_id {
            query = query.filter(bookings::user_id.eq(user_id));
        }
        if let Some(status) = filter.status {
            query = query.filter(bookings::status.eq(status.to_string()));
        }
        if let Some(from) = filter.from {
            query = query.filter(bookings::check_out.gt(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(bookings::check_in.lt(to));
        }

        let results = query
            .order(bookings::check_in.asc())
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_conflicts(
        &self,
        room_ids: Vec<Uuid>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking_id: Option<Uuid>,
    ) -> Result<Vec<RoomConflict>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let conflicts = scan_conflicts(&mut conn, &room_ids, check_in, check_out, exclude_booking_id)?;

        Ok(conflicts)
    }

    async fn update_status(
        &self,
        booking_id: Uuid,
        from: Vec<BookingStatus>,
        to: BookingStatus,
    ) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let from_values: Vec<String> = from.into_iter().map(|s| s.to_string()).collect();
        let affected = update(bookings::table)
            .filter(bookings::id.eq(booking_id))
            .filter(bookings::status.eq_any(from_values))
            .set(bookings::status.eq(to.to_string()))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn delete_booking(&self, booking_id: Uuid) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        conn.transaction::<(), diesel::result::Error, _>(|conn| {
            delete(payments::table)
                .filter(payments::booking_id.eq(booking_id))
                .execute(conn)?;
            delete(booking_details::table)
                .filter(booking_details::booking_id.eq(booking_id))
                .execute(conn)?;
            delete(bookings::table)
                .filter(bookings::id.eq(booking_id))
                .execute(conn)?;
            Ok(())
        })?;

        Ok(())
    }

    async fn bookings_checking_in_on(
        &self,
        date: NaiveDate,
        statuses: Vec<BookingStatus>,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let status_values: Vec<String> = statuses.into_iter().map(|s| s.to_string()).collect();
        let results = bookings::table
            .filter(bookings::check_in.eq(date))
            .filter(bookings::status.eq_any(status_values))
            .select(BookingEntity::as_select())
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }

    async fn bookings_checking_out_on(
        &self,
        date: NaiveDate,
        statuses: Vec<BookingStatus>,
    ) -> Result<Vec<BookingEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let status_values: Vec<String> = statuses.into_iter().map(|s| s.to_string()).collect();
        let results = bookings::table
            .filter(bookings::check_out.eq(date))
            .filter(bookings::status.eq_any(status_values))
            .select(BookingEntity::as_select())
            .load::<BookingEntity>(&mut conn)?;

        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    #[test]
    fn touching_boundaries_do_not_overlap() {
        // Checkout morning frees the room for that day's arrival.
        assert!(!stays_overlap(day(1), day(3), day(3), day(5)));
        assert!(!stays_overlap(day(3), day(5), day(1), day(3)));
    }

    #[test]
    fn shared_nights_overlap() {
        assert!(stays_overlap(day(1), day(4), day(3), day(6)));
        assert!(stays_overlap(day(3), day(6), day(1), day(4)));
        assert!(stays_overlap(day(1), day(5), day(1), day(5)));
    }

    #[test]
    fn containment_overlaps() {
        assert!(stays_overlap(day(1), day(10), day(4), day(6)));
        assert!(stays_overlap(day(4), day(6), day(1), day(10)));
    }

    #[test]
    fn disjoint_stays_do_not_overlap() {
        assert!(!stays_overlap(day(1), day(3), day(10), day(12)));
        assert!(!stays_overlap(day(10), day(12), day(1), day(3)));
    }
}
