use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use diesel::{insert_into, prelude::*, update};
use uuid::Uuid;

use crate::domain::entities::payments::{NewPaymentEntity, PaymentEntity};
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
use crate::infrastructure::postgres::postgres_connection::PgPool;
use crate::infrastructure::postgres::schema::payments;

pub struct PaymentPostgres {
    db_pool: Arc<PgPool>,
}

impl PaymentPostgres {
    pub fn new(db_pool: Arc<PgPool>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PaymentRepository for PaymentPostgres {
    async fn record_payment(&self, payment: NewPaymentEntity) -> Result<Uuid> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = insert_into(payments::table)
            .values(&payment)
            .returning(payments::id)
            .get_result::<Uuid>(&mut conn)?;

        Ok(result)
    }

    async fn find_by_transaction_no(
        &self,
        transaction_no: String,
    ) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payments::table
            .filter(payments::transaction_no.eq(transaction_no))
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn latest_for_booking(&self, booking_id: Uuid) -> Result<Option<PaymentEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let result = payments::table
            .filter(payments::booking_id.eq(booking_id))
            .order(payments::created_at.desc())
            .select(PaymentEntity::as_select())
            .first::<PaymentEntity>(&mut conn)
            .optional()?;

        Ok(result)
    }

    async fn update_status(
        &self,
        payment_id: Uuid,
        status: PaymentStatus,
        response_code: Option<String>,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        match response_code {
            Some(code) => {
                update(payments::table)
                    .filter(payments::id.eq(payment_id))
                    .set((
                        payments::status.eq(status.to_string()),
                        payments::response_code.eq(Some(code)),
                    ))
                    .execute(&mut conn)?;
            }
            None => {
                update(payments::table)
                    .filter(payments::id.eq(payment_id))
                    .set(payments::status.eq(status.to_string()))
                    .execute(&mut conn)?;
            }
        }

        Ok(())
    }
}
