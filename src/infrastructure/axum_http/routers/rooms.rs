use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, put},
};
use serde::Deserialize;
use uuid::Uuid;

use crate::application::usecases::availability::AvailabilityUseCase;
use crate::application::usecases::rooms::RoomRegistryUseCase;
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::rooms::RoomRepository;
use crate::domain::value_objects::enums::room_statuses::RoomStatus;
use crate::domain::value_objects::iam::Actor;
use crate::domain::value_objects::rooms::{
    AvailableRoomsQuery, CreateRoomModel, CreateRoomTypeModel,
};
use crate::infrastructure::axum_http::error_responses::error_response;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::repositories::{
    bookings::BookingPostgres, rooms::RoomPostgres,
};

pub struct RoomsRouterState<B, R>
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    pub registry: Arc<RoomRegistryUseCase<R>>,
    pub availability: Arc<AvailabilityUseCase<B, R>>,
}

impl<B, R> Clone for RoomsRouterState<B, R>
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
            availability: Arc::clone(&self.availability),
        }
    }
}

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let room_repo = Arc::new(RoomPostgres::new(Arc::clone(&db_pool)));
    let booking_repo = Arc::new(BookingPostgres::new(Arc::clone(&db_pool)));

    let state = RoomsRouterState {
        registry: Arc::new(RoomRegistryUseCase::new(Arc::clone(&room_repo))),
        availability: Arc::new(AvailabilityUseCase::new(booking_repo, room_repo)),
    };

    Router::new()
        .route("/", get(list_rooms).post(create_room))
        .route("/available", get(list_available_rooms))
        .route("/types", get(list_room_types).post(create_room_type))
        .route("/types/:room_type_id", get(get_room_type))
        .route("/:room_id", get(get_room).delete(deactivate_room))
        .route("/:room_id/status", put(set_room_status))
        .with_state(state)
}

pub async fn list_rooms<B, R>(State(state): State<RoomsRouterState<B, R>>) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    match state.registry.list_active_rooms().await {
        Ok(rooms) => (StatusCode::OK, Json(rooms)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_available_rooms<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    Query(query): Query<AvailableRoomsQuery>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    match state
        .availability
        .list_available_rooms(query.check_in, query.check_out)
        .await
    {
        Ok(rooms) => (StatusCode::OK, Json(rooms)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_room<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    Path(room_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    match state.registry.get_room(room_id).await {
        Ok(room) => (StatusCode::OK, Json(room)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_room_types<B, R>(State(state): State<RoomsRouterState<B, R>>) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    match state.registry.list_room_types().await {
        Ok(room_types) => (StatusCode::OK, Json(room_types)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_room_type<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    Path(room_type_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    match state.registry.get_room_type(room_type_id).await {
        Ok(room_type) => (StatusCode::OK, Json(room_type)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn create_room<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    actor: Actor,
    Json(model): Json<CreateRoomModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match state.registry.create_room(model).await {
        Ok(room_id) => (StatusCode::CREATED, Json(room_id)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn create_room_type<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    actor: Actor,
    Json(model): Json<CreateRoomTypeModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match state.registry.create_room_type(model).await {
        Ok(room_type_id) => (StatusCode::CREATED, Json(room_type_id)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

#[derive(Debug, Deserialize)]
pub struct SetRoomStatusModel {
    pub status: RoomStatus,
}

pub async fn set_room_status<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    actor: Actor,
    Path(room_id): Path<Uuid>,
    Json(model): Json<SetRoomStatusModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match state.registry.set_room_status(room_id, model.status).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn deactivate_room<B, R>(
    State(state): State<RoomsRouterState<B, R>>,
    actor: Actor,
    Path(room_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match state.registry.deactivate_room(room_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
