use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::room_types::{InsertRoomTypeEntity, RoomTypeEntity};
use crate::domain::entities::rooms::{InsertRoomEntity, RoomEntity};
use crate::domain::repositories::rooms::RoomRepository;
use crate::domain::value_objects::enums::room_statuses::RoomStatus;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::schema::{room_types, rooms};

pub struct RoomPostgres {
    db_pool: Arc<PgPool>,
}

impl RoomPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl RoomRepository for RoomPostgres {
    async fn find_room(&self, room_id: Uuid) -> Result<Option<RoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = rooms::table
            .filter(rooms::id.eq(room_id))
            .select(RoomEntity::as_select())
            .first::<RoomEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn find_room_type(&self, room_type_id: Uuid) -> Result<Option<RoomTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = room_types::table
            .filter(room_types::id.eq(room_type_id))
            .select(RoomTypeEntity::as_select())
            .first::<RoomTypeEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn list_active_rooms(&self) -> Result<Vec<RoomEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = rooms::table
            .filter(rooms::is_active.eq(true))
            .order(rooms::room_number.asc())
            .select(RoomEntity::as_select())
            .load::<RoomEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_room_types(&self) -> Result<Vec<RoomTypeEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = room_types::table
            .filter(room_types::is_active.eq(true))
            .order(room_types::code.asc())
            .select(RoomTypeEntity::as_select())
            .load::<RoomTypeEntity>(&mut conn)?;

        Ok(results)
    }

    async fn find_rooms_with_types(
        &self,
        room_ids: Vec<Uuid>,
    ) -> Result<Vec<(RoomEntity, RoomTypeEntity)>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = rooms::table
            .inner_join(room_types::table)
            .filter(rooms::id.eq_any(room_ids))
            .select((RoomEntity::as_select(), RoomTypeEntity::as_select()))
            .load::<(RoomEntity, RoomTypeEntity)>(&mut conn)?;

        Ok(results)
    }

    async fn create_room(&self, room: InsertRoomEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(rooms::table)
            .values(&room)
            .returning(rooms::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn create_room_type(&self, room_type: InsertRoomTypeEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(room_types::table)
            .values(&room_type)
            .returning(room_types::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn set_room_status(&self, room_id: Uuid, status: RoomStatus) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(rooms::table)
            .filter(rooms::id.eq(room_id))
            .set(rooms::status.eq(status.to_string()))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }

    async fn deactivate_room(&self, room_id: Uuid) -> Result<bool> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let affected = update(rooms::table)
            .filter(rooms::id.eq(room_id))
            .filter(rooms::is_active.eq(true))
            .set(rooms::is_active.eq(false))
            .execute(&mut conn)?;

        Ok(affected > 0)
    }
}
