use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::bookings;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = bookings)]
pub struct BookingEntity {
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    pub final_price: i64,
    pub discount_id: Option<Uuid>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = bookings)]
pub struct InsertBookingEntity {
    pub user_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    pub final_price: i64,
    pub discount_id: Option<Uuid>,
    pub status: String,
}

/// Changeset for booking updates. `discount_id: None` clears the column so a
/// removed discount does not linger on the row.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = bookings, treat_none_as_null = true)]
pub struct UpdateBookingEntity {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub total_price: i64,
    pub final_price: i64,
    pub discount_id: Option<Uuid>,
}
