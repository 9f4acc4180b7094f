use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::domain::entities::payments::{NewPaymentEntity, PaymentEntity};
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;

#[automock]
#[async_trait]
pub trait PaymentRepository {
    async fn record_payment(&self, payment: NewPaymentEntity) -> Result<Uuid>;

    async fn find_by_transaction_no(
        &self,
        transaction_no: String,
    ) -> Result<Option<PaymentEntity>>;

    /// Most recently created row for the booking; rows are append-only so
    /// this is the booking's current payment state.
    async fn latest_for_booking(&self, booking_id: Uuid) -> Result<Option<PaymentEntity>>;

    async fn update_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        response_code: Option<String>,
    ) -> Result<()>;
}
