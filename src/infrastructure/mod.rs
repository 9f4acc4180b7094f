pub mod axum_http;
pub mod notifier;
pub mod payment_gateway;
pub mod postgres;
pub mod scheduler;
