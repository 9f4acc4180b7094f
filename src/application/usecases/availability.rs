use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use thiserror::Error;
use tracing::{error, info};
use uuid::Uuid;

use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::rooms::RoomRepository;
use crate::domain::value_objects::bookings::RoomConflict;
use crate::domain::value_objects::rooms::RoomModel;

#[derive(Debug, Error)]
pub enum AvailabilityError {
    #[error("check-in date must be before check-out date")]
    InvalidDateRange,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AvailabilityError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AvailabilityError::InvalidDateRange => StatusCode::BAD_REQUEST,
            AvailabilityError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type AvailabilityResult<T> = std::result::Result<T, AvailabilityError>;

/// Answers date-range availability questions. Availability is always derived
/// from booking date overlap; the room `status` column plays no part here.
pub struct AvailabilityUseCase<B, R>
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    booking_repo: Arc<B>,
    room_repo: Arc<R>,
}

impl<B, R> AvailabilityUseCase<B, R>
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    pub fn new(booking_repo: Arc<B>, room_repo: Arc<R>) -> Self {
        Self {
            booking_repo,
            room_repo,
        }
    }

    pub async fn find_conflicts(
        &self,
        room_ids: Vec<Uuid>,
        check_in: NaiveDate,
        check_out: NaiveDate,
        exclude_booking_id: Option<Uuid>,
    ) -> AvailabilityResult<Vec<RoomConflict>> {
        if check_in >= check_out {
            return Err(AvailabilityError::InvalidDateRange);
        }

        self.booking_repo
            .find_conflicts(room_ids, check_in, check_out, exclude_booking_id)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "availability: conflict scan failed");
                AvailabilityError::Internal(err)
            })
    }

    pub async fn list_available_rooms(
        &self,
        check_in: NaiveDate,
        check_out: NaiveDate,
    ) -> AvailabilityResult<Vec<RoomModel>> {
        if check_in >= check_out {
            return Err(AvailabilityError::InvalidDateRange);
        }

        let rooms = self.room_repo.list_active_rooms().await.map_err(|err| {
            error!(db_error = ?err, "availability: failed to list active rooms");
            AvailabilityError::Internal(err)
        })?;

        let room_ids: Vec<Uuid> = rooms.iter().map(|room| room.id).collect();
        let conflicts = self
            .booking_repo
            .find_conflicts(room_ids, check_in, check_out, None)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "availability: conflict scan failed");
                AvailabilityError::Internal(err)
            })?;

        let occupied: HashSet<Uuid> = conflicts.iter().map(|c| c.room_id).collect();
        let available: Vec<RoomModel> = rooms
            .into_iter()
            .filter(|room| !occupied.contains(&room.id))
            .map(RoomModel::from)
            .collect();

        info!(
            %check_in,
            %check_out,
            available = available.len(),
            "availability: available rooms resolved"
        );

        Ok(available)
    }
}
