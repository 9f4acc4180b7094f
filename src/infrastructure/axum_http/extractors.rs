use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::Response,
};
use uuid::Uuid;

use crate::domain::value_objects::iam::{Actor, Role};
use crate::infrastructure::axum_http::error_responses::error_response;

const USER_ID_HEADER: &str = "x-user-id";
const USER_ROLE_HEADER: &str = "x-user-role";

/// The fronting auth proxy terminates tokens and forwards the verified
/// identity as headers; requests without them are rejected here.
#[async_trait]
impl<S> FromRequestParts<S> for Actor
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| Uuid::parse_str(value).ok())
            .ok_or_else(|| {
                error_response(StatusCode::UNAUTHORIZED, "Missing or invalid user identity")
            })?;

        let role = parts
            .headers
            .get(USER_ROLE_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(Role::from_str)
            .unwrap_or(Role::Guest);

        Ok(Actor { user_id, role })
    }
}
