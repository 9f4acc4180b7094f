use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::room_types;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = room_types)]
pub struct RoomTypeEntity {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub price_per_night: i64,
    pub max_occupancy: i32,
    pub amenities: serde_json::Value,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = room_types)]
pub struct InsertRoomTypeEntity {
    pub name: String,
    pub code: String,
    pub price_per_night: i64,
    pub max_occupancy: i32,
    pub amenities: serde_json::Value,
    pub is_active: bool,
}
