use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::entities::payments::PaymentEntity;
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;

#[derive(Debug, Clone, Deserialize)]
pub struct InitiatePaymentModel {
    pub booking_id: Uuid,
}

/// Remote session created at the gateway; the guest is redirected to
/// `redirect_url` and the gateway later calls back with `transaction_no`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSessionModel {
    pub redirect_url: String,
    pub transaction_no: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GatewayCallbackModel {
    pub transaction_no: String,
    pub response_code: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PaymentModel {
    pub id: Uuid,
    pub booking_id: Uuid,
    pub transaction_no: String,
    pub amount: i64,
    pub method: String,
    pub response_code: Option<String>,
    pub status: PaymentStatus,
    pub created_at: DateTime<Utc>,
}

impl PaymentModel {
    pub fn from_entity(entity: PaymentEntity) -> anyhow::Result<Self> {
        let status = PaymentStatus::from_str(&entity.status)
            .ok_or_else(|| anyhow::anyhow!("unknown payment status: {}", entity.status))?;

        Ok(Self {
            id: entity.id,
            booking_id: entity.booking_id,
            transaction_no: entity.transaction_no,
            amount: entity.amount,
            method: entity.method,
            response_code: entity.response_code,
            status,
            created_at: entity.created_at,
        })
    }
}
