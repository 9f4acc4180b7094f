use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::post,
};
use chrono::Utc;
use uuid::Uuid;

use crate::application::usecases::discounts::DiscountUseCase;
use crate::domain::repositories::discounts::DiscountRepository;
use crate::domain::value_objects::discounts::{
    CreateDiscountModel, GenerateCodeModel, ValidateDiscountModel,
};
use crate::domain::value_objects::iam::Actor;
use crate::infrastructure::axum_http::error_responses::error_response;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::repositories::discounts::DiscountPostgres;

pub fn routes(db_pool: Arc<PgPool>) -> Router {
    let discount_usecase = DiscountUseCase::new(Arc::new(DiscountPostgres::new(db_pool)));

    Router::new()
        .route("/", post(create_discount))
        .route("/validate", post(validate_discount))
        .route("/generate-code", post(generate_code))
        .route("/:discount_id/reset-usage", post(reset_usage))
        .with_state(Arc::new(discount_usecase))
}

pub async fn validate_discount<D>(
    State(usecase): State<Arc<DiscountUseCase<D>>>,
    _actor: Actor,
    Json(model): Json<ValidateDiscountModel>,
) -> impl IntoResponse
where
    D: DiscountRepository + Send + Sync + 'static,
{
    match usecase.validate(&model.code, Utc::now().date_naive()).await {
        Ok(discount) => (StatusCode::OK, Json(discount)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn create_discount<D>(
    State(usecase): State<Arc<DiscountUseCase<D>>>,
    actor: Actor,
    Json(model): Json<CreateDiscountModel>,
) -> impl IntoResponse
where
    D: DiscountRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match usecase.create_discount(model).await {
        Ok(discount) => (StatusCode::CREATED, Json(discount)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn generate_code<D>(
    State(usecase): State<Arc<DiscountUseCase<D>>>,
    actor: Actor,
    Json(model): Json<GenerateCodeModel>,
) -> impl IntoResponse
where
    D: DiscountRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match usecase.generate_code(model.prefix).await {
        Ok(code) => (StatusCode::OK, Json(code)).into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}

pub async fn reset_usage<D>(
    State(usecase): State<Arc<DiscountUseCase<D>>>,
    actor: Actor,
    Path(discount_id): Path<Uuid>,
) -> impl IntoResponse
where
    D: DiscountRepository + Send + Sync + 'static,
{
    if !actor.is_admin() {
        return error_response(StatusCode::FORBIDDEN, "Operation requires admin role");
    }

    match usecase.reset_usage(discount_id).await {
        Ok(()) => StatusCode::NO_CONTENT.into_response(),
        Err(err) => error_response(err.status_code(), err.to_string()),
    }
}
