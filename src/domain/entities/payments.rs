use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::infrastructure::postgres::schema::payments;

/// Payments are an append-only log per booking. The "current" payment state
/// is the most recently created row; history is never rewritten.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = payments)]
pub struct PaymentEntity {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub transaction_no: String,
    pub amount: i64,
    pub method: String,
    pub order_info: String,
    pub response_code: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = payments)]
pub struct NewPaymentEntity {
    pub booking_id: Uuid,
    pub transaction_no: String,
    pub amount: i64,
    pub method: String,
    pub order_info: String,
    pub response_code: Option<String>,
    pub status: String,
}
