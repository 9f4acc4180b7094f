use std::sync::Arc;

use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::room_types::InsertRoomTypeEntity;
use crate::domain::entities::rooms::InsertRoomEntity;
use crate::domain::repositories::rooms::RoomRepository;
use crate::domain::value_objects::enums::room_statuses::RoomStatus;
use crate::domain::value_objects::rooms::{
    CreateRoomModel, CreateRoomTypeModel, RoomModel, RoomTypeModel,
};

#[derive(Debug, Error)]
pub enum RoomError {
    #[error("room not found")]
    RoomNotFound,
    #[error("room type not found")]
    RoomTypeNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl RoomError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            RoomError::RoomNotFound | RoomError::RoomTypeNotFound => StatusCode::NOT_FOUND,
            RoomError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type RoomResult<T> = std::result::Result<T, RoomError>;

/// Read-mostly room inventory registry.
pub struct RoomRegistryUseCase<R>
where
    R: RoomRepository + Send + Sync + 'static,
{
    room_repo: Arc<R>,
}

impl<R> RoomRegistryUseCase<R>
where
    R: RoomRepository + Send + Sync + 'static,
{
    pub fn new(room_repo: Arc<R>) -> Self {
        Self { room_repo }
    }

    pub async fn get_room(&self, room_id: Uuid) -> RoomResult<RoomModel> {
        let room = self
            .room_repo
            .find_room(room_id)
            .await
            .map_err(RoomError::Internal)?
            .ok_or(RoomError::RoomNotFound)?;

        Ok(RoomModel::from(room))
    }

    pub async fn get_room_type(&self, room_type_id: Uuid) -> RoomResult<RoomTypeModel> {
        let room_type = self
            .room_repo
            .find_room_type(room_type_id)
            .await
            .map_err(RoomError::Internal)?
            .ok_or(RoomError::RoomTypeNotFound)?;

        Ok(RoomTypeModel::from(room_type))
    }

    pub async fn list_active_rooms(&self) -> RoomResult<Vec<RoomModel>> {
        let rooms = self.room_repo.list_active_rooms().await.map_err(|err| {
            error!(db_error = ?err, "rooms: failed to list active rooms");
            RoomError::Internal(err)
        })?;

        Ok(rooms.into_iter().map(RoomModel::from).collect())
    }

    pub async fn list_room_types(&self) -> RoomResult<Vec<RoomTypeModel>> {
        let room_types = self.room_repo.list_room_types().await.map_err(|err| {
            error!(db_error = ?err, "rooms: failed to list room types");
            RoomError::Internal(err)
        })?;

        Ok(room_types.into_iter().map(RoomTypeModel::from).collect())
    }

    pub async fn create_room(&self, model: CreateRoomModel) -> RoomResult<Uuid> {
        self.room_repo
            .find_room_type(model.room_type_id)
            .await
            .map_err(RoomError::Internal)?
            .ok_or(RoomError::RoomTypeNotFound)?;

        let room_id = self
            .room_repo
            .create_room(InsertRoomEntity {
                room_number: model.room_number.clone(),
                room_type_id: model.room_type_id,
                status: RoomStatus::Vacant.to_string(),
                is_active: true,
            })
            .await
            .map_err(|err| {
                error!(
                    room_number = model.room_number,
                    db_error = ?err,
                    "rooms: failed to create room"
                );
                RoomError::Internal(err)
            })?;

        info!(room_number = model.room_number, %room_id, "rooms: room created");
        Ok(room_id)
    }

    pub async fn create_room_type(&self, model: CreateRoomTypeModel) -> RoomResult<Uuid> {
        let room_type_id = self
            .room_repo
            .create_room_type(InsertRoomTypeEntity {
                name: model.name.clone(),
                code: model.code,
                price_per_night: model.price_per_night,
                max_occupancy: model.max_occupancy,
                amenities: serde_json::json!(model.amenities),
                is_active: true,
            })
            .await
            .map_err(|err| {
                error!(name = model.name, db_error = ?err, "rooms: failed to create room type");
                RoomError::Internal(err)
            })?;

        info!(name = model.name, %room_type_id, "rooms: room type created");
        Ok(room_type_id)
    }

    /// Updates the display hint only; availability never consults it.
    pub async fn set_room_status(&self, room_id: Uuid, status: RoomStatus) -> RoomResult<()> {
        let updated = self
            .room_repo
            .set_room_status(room_id, status)
            .await
            .map_err(RoomError::Internal)?;

        if !updated {
            warn!(%room_id, "rooms: status update targeted unknown room");
            return Err(RoomError::RoomNotFound);
        }

        Ok(())
    }

    pub async fn deactivate_room(&self, room_id: Uuid) -> RoomResult<()> {
        let updated = self
            .room_repo
            .deactivate_room(room_id)
            .await
            .map_err(RoomError::Internal)?;

        if !updated {
            return Err(RoomError::RoomNotFound);
        }

        info!(%room_id, "rooms: room deactivated");
        Ok(())
    }
}
