use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::booking_details;

/// One row per reserved room. `price_per_night` is the snapshot taken at
/// booking time; later room-type price changes never touch it.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = booking_details)]
pub struct BookingDetailEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub room_id: Uuid,
    pub price_per_night: i64,
    pub adults: i32,
    pub children: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = booking_details)]
pub struct InsertBookingDetailEntity {
    pub booking_id: Uuid,
    pub room_id: Uuid,
    pub price_per_night: i64,
    pub adults: i32,
    pub children: i32,
}
