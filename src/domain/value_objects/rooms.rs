use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::rooms::RoomEntity;
use crate::domain::value_objects::enums::room_statuses::RoomStatus;

#[derive(Debug, Clone, Serialize)]
pub struct RoomModel {
    pub id: Uuid,
    pub room_number: String,
    pub room_type_id: Uuid,
    pub status: RoomStatus,
    pub is_active: bool,
}

impl From<RoomEntity> for RoomModel {
    fn from(entity: RoomEntity) -> Self {
        let status = RoomStatus::from_str(&entity.status).unwrap_or(RoomStatus::Vacant);
        Self {
            id: entity.id,
            room_number: entity.room_number,
            room_type_id: entity.room_type_id,
            status,
            is_active: entity.is_active,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RoomTypeModel {
    pub id: Uuid,
    pub name: String,
    pub code: String,
    pub price_per_night: i64,
    pub max_occupancy: i32,
    pub amenities: serde_json::Value,
    pub is_active: bool,
}

impl From<crate::domain::entities::room_types::RoomTypeEntity> for RoomTypeModel {
    fn from(entity: crate::domain::entities::room_types::RoomTypeEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            code: entity.code,
            price_per_night: entity.price_per_night,
            max_occupancy: entity.max_occupancy,
            amenities: entity.amenities,
            is_active: entity.is_active,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct AvailableRoomsQuery {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomModel {
    pub room_number: String,
    pub room_type_id: Uuid,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateRoomTypeModel {
    pub name: String,
    pub code: String,
    pub price_per_night: i64,
    pub max_occupancy: i32,
    #[serde(default)]
    pub amenities: Vec<String>,
}
