use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::rooms;

/// `status` is a display/maintenance hint only. Availability is derived from
/// booking date overlap, never from this column.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = rooms)]
pub struct RoomEntity {
    pub id: Uuid,
    pub room_number: String,
    pub room_type_id: Uuid,
    pub status: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = rooms)]
pub struct InsertRoomEntity {
    pub room_number: String,
    pub room_type_id: Uuid,
    pub status: String,
    pub is_active: bool,
}
