use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::domain::entities::booking_details::BookingDetailEntity;
use crate::domain::entities::bookings::BookingEntity;
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct CreateBookingModel {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub room_ids: Vec<Uuid>,
    pub discount_code: Option<String>,
    #[serde(default)]
    pub adults: Option<i32>,
    #[serde(default)]
    pub children: Option<i32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateBookingModel {
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub room_ids: Option<Vec<Uuid>>,
    pub discount_code: Option<String>,
    #[serde(default)]
    pub remove_discount: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListBookingsFilter {
    pub user_id: Option<Uuid>,
    pub status: Option<BookingStatus>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingModel {
    pub id: Uuid,
    pub user_id: Uuid,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub nights: i64,
    pub total_price: i64,
    pub final_price: i64,
    pub discount_id: Option<Uuid>,
    pub status: BookingStatus,
    pub details: Vec<BookingDetailModel>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetailModel {
    pub id: Uuid,
    pub room_id: Uuid,
    pub price_per_night: i64,
    pub adults: i32,
    pub children: i32,
}

impl BookingModel {
    pub fn from_entity(
        entity: BookingEntity,
        details: Vec<BookingDetailEntity>,
    ) -> anyhow::Result<Self> {
        let status = BookingStatus::from_str(&entity.status)
            .ok_or_else(|| anyhow::anyhow!("unknown booking status: {}", entity.status))?;

        Ok(Self {
            id: entity.id,
            user_id: entity.user_id,
            nights: (entity.check_out - entity.check_in).num_days(),
            check_in: entity.check_in,
            check_out: entity.check_out,
            total_price: entity.total_price,
            final_price: entity.final_price,
            discount_id: entity.discount_id,
            status,
            details: details.into_iter().map(BookingDetailModel::from).collect(),
            created_at: entity.created_at,
        })
    }
}

impl From<BookingDetailEntity> for BookingDetailModel {
    fn from(entity: BookingDetailEntity) -> Self {
        Self {
            id: entity.id,
            room_id: entity.room_id,
            price_per_night: entity.price_per_night,
            adults: entity.adults,
            children: entity.children,
        }
    }
}

/// Per-room line passed to the booking repository; the price is the snapshot
/// taken from the room type at booking time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomLine {
    pub room_id: Uuid,
    pub price_per_night: i64,
    pub adults: i32,
    pub children: i32,
}

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct RoomConflict {
    pub room_id: Uuid,
    pub booking_id: Uuid,
}

/// Raised inside the booking insert/update transaction when the in-transaction
/// re-check finds an overlap that the fast-path check missed (two requests
/// racing for the same room). Carried through `anyhow` and downcast at the
/// use-case boundary.
#[derive(Debug, Clone, Copy, Error)]
#[error("room {room_id} was booked concurrently")]
pub struct RoomConflictDetected {
    pub room_id: Uuid,
}
