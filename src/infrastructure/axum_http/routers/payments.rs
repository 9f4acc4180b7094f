use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use uuid::Uuid;

use crate::application::usecases::payments::{PaymentGateway, PaymentUseCase};
use crate::config::config_model::DotEnvyConfig;
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::discounts::DiscountRepository;
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::value_objects::iam::Actor;
use crate::domain::value_objects::payments::{GatewayCallbackModel, InitiatePaymentModel};
use crate::infrastructure::axum_http::error_responses::error_response;
use crate::infrastructure::payment_gateway::HttpPaymentGateway;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::repositories::{
    bookings::BookingPostgres, discounts::DiscountPostgres, payments::PaymentPostgres,
};

pub fn routes(config: Arc<DotEnvyConfig>, db_pool: Arc<PgPool>) -> Router {
    let gateway = HttpPaymentGateway::new(
        config.payment_gateway.base_url.clone(),
        config.payment_gateway.timeout_secs,
    );

    let payment_usecase = PaymentUseCase::new(
        Arc::new(PaymentPostgres::new(Arc::clone(&db_pool))),
        Arc::new(BookingPostgres::new(Arc::clone(&db_pool))),
        Arc::new(DiscountPostgres::new(Arc::clone(&db_pool))),
        Arc::new(gateway),
        config.payment_gateway.return_url.clone(),
        config.payment_gateway.expire_minutes,
    );

    Router::new()
        .route("/", post(initiate_payment))
        .route("/callback", get(gateway_callback))
        .route("/bookings/:booking_id", get(payment_status))
        .with_state(Arc::new(payment_usecase))
}

pub async fn initiate_payment<P, B, D, G>(
    State(usecase): State<Arc<PaymentUseCase<P, B, D, G>>>,
    _actor: Actor,
    Json(model): Json<InitiatePaymentModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match usecase.initiate_payment(model.booking_id).await {
        Ok(session) => (StatusCode::CREATED, Json(session)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

/// Return leg of the gateway redirect; authenticated by transaction number,
/// not by user identity.
pub async fn gateway_callback<P, B, D, G>(
    State(usecase): State<Arc<PaymentUseCase<P, B, D, G>>>,
    Query(callback): Query<GatewayCallbackModel>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match usecase.apply_gateway_result(callback).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn payment_status<P, B, D, G>(
    State(usecase): State<Arc<PaymentUseCase<P, B, D, G>>>,
    _actor: Actor,
    Path(booking_id): Path<Uuid>,
) -> impl IntoResponse
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    match usecase.current_status(booking_id).await {
        Ok(payment) => (StatusCode::OK, Json(payment)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
