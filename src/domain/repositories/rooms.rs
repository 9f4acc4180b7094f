use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::room_types::{InsertRoomTypeEntity, RoomTypeEntity};
use crate::domain::entities::rooms::{InsertRoomEntity, RoomEntity};
use crate::domain::value_objects::enums::room_statuses::RoomStatus;

#[automock]
#[async_trait]
pub trait RoomRepository {
    async fn find_room(&self, room_id: Uuid) -> Result<Option<RoomEntity>>;

    async fn find_room_type(&self, room_type_id: Uuid) -> Result<Option<RoomTypeEntity>>;

    async fn list_active_rooms(&self) -> Result<Vec<RoomEntity>>;

    async fn list_room_types(&self) -> Result<Vec<RoomTypeEntity>>;

    /// Rooms joined with their types, for price snapshotting.
    async fn find_rooms_with_types(
        &self,
        room_ids: Vec<Uuid>,
    ) -> Result<Vec<(RoomEntity, RoomTypeEntity)>>;

    async fn create_room(&self, room: InsertRoomEntity) -> Result<Uuid>;

    async fn create_room_type(&self, room_type: InsertRoomTypeEntity) -> Result<Uuid>;

    async fn set_room_status(&self, room_id: Uuid, status: RoomStatus) -> Result<bool>;

    async fn deactivate_room(&self, room_id: Uuid) -> Result<bool>;
}
