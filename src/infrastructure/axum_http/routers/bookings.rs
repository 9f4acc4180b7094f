use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::application::usecases::bookings::{BookingUseCase, Notifier};
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::discounts::DiscountRepository;
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::repositories::rooms::RoomRepository;
use crate::domain::value_objects::bookings::{
    CreateBookingModel, ListBookingsFilter, UpdateBookingModel,
};
use crate::domain::value_objects::iam::Actor;
use crate::infrastructure::axum_http::error_responses::error_response;
use crate::infrastructure::notifier::LogNotifier;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::repositories::{
    bookings::BookingPostgres, discounts::DiscountPostgres, payments::PaymentPostgres,
    rooms::RoomPostgres,
};

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let booking_usecase = BookingUseCase::new(
        Arc::new(BookingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(RoomPostgres::new(Arc::clone(&db_pool))),
        Arc::new(DiscountPostgres::new(Arc::clone(&db_pool))),
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(LogNotifier),
    );

    Router::new()
        .route("/", post(create_booking).get(list_bookings))
        .route(
            "/:booking_id",
            get(get_booking).patch(update_booking).delete(delete_booking),
        )
        .route("/:booking_id/cancel", post(cancel_booking))
        .route("/:booking_id/confirm", post(confirm_booking))
        .route("/:booking_id/check-in", post(check_in))
        .route("/:booking_id/check-out", post(check_out))
        .with_state(Arc::new(booking_usecase))
}

pub async fn create_booking<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Json(model): Json<CreateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.create_booking(actor, model).await {
        Ok(booking) => (StatusCode::CREATED, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn list_bookings<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Query(filter): Query<ListBookingsFilter>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.list_bookings(actor, filter).await {
        Ok(bookings) => (StatusCode::OK, Json(bookings)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn get_booking<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.get_booking(actor, booking_id).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn update_booking<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
    Json(model): Json<UpdateBookingModel>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.update_booking(actor, booking_id, model).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn delete_booking<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.delete_booking(actor, booking_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn cancel_booking<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.cancel_booking(actor, booking_id).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn confirm_booking<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.confirm_booking(actor, booking_id).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn check_in<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.check_in(actor, booking_id).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn check_out<B, R, D, P, N>(
    State(usecase): State<Arc<BookingUseCase<B, R, D, P, N>>>,
    actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    B: BookingRepository + Send + Sync + 'static,
    R: RoomRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    P: PaymentRepository + Send + Sync + 'static,
    N: Notifier + Send + Sync + 'static,
{
    match usecase.check_out(actor, booking_id).await {
        Ok(booking) => (StatusCode::OK, Json(booking)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
