use std::sync::Arc;

use anyhow::Result as AnyResult;
use async_trait::async_trait;
use chrono::{Duration, Utc};
use thiserror::Error;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::domain::entities::payments::{NewPaymentEntity, PaymentEntity};
use crate::domain::repositories::bookings::BookingRepository;
use crate::domain::repositories::discounts::DiscountRepository;
use crate::domain::repositories::payments::PaymentRepository;
use crate::domain::value_objects::enums::booking_statuses::BookingStatus;
use crate::domain::value_objects::enums::payment_statuses::PaymentStatus;
use crate::domain::value_objects::payments::{GatewayCallbackModel, PaymentModel, PaymentSessionModel};

pub const GATEWAY_RESPONSE_SUCCESS: &str = "00";
pub const GATEWAY_RESPONSE_CUSTOMER_CANCELLED: &str = "24";

const PAYMENT_METHOD_GATEWAY: &str = "gateway_redirect";

/// Remote payment provider. The implementation talks HTTP; tests mock it.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_payment_session(
        &self,
        amount: i64,
        order_info: String,
        return_url: String,
    ) -> AnyResult<PaymentSessionModel>;
}

#[derive(Debug, Error)]
pub enum PaymentError {
    #[error("payment not found")]
    PaymentNotFound,
    #[error("booking not found")]
    BookingNotFound,
    #[error("booking is not awaiting payment")]
    NotAwaitingPayment,
    #[error("payment gateway unavailable")]
    GatewayUnavailable(#[source] anyhow::Error),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl PaymentError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            PaymentError::PaymentNotFound | PaymentError::BookingNotFound => StatusCode::NOT_FOUND,
            PaymentError::NotAwaitingPayment => StatusCode::CONFLICT,
            PaymentError::GatewayUnavailable(_) => StatusCode::BAD_GATEWAY,
            PaymentError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type PaymentResult<T> = std::result::Result<T, PaymentError>;

pub struct PaymentUseCase<P, B, D, G>
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    payment_repo: Arc<P>,
    booking_repo: Arc<B>,
    discount_repo: Arc<D>,
    gateway: Arc<G>,
    return_url: String,
    expire_minutes: i64,
}

impl<P, B, D, G> PaymentUseCase<P, B, D, G>
where
    P: PaymentRepository + Send + Sync + 'static,
    B: BookingRepository + Send + Sync + 'static,
    D: DiscountRepository + Send + Sync + 'static,
    G: PaymentGateway + Send + Sync + 'static,
{
    pub fn new(
        payment_repo: Arc<P>,
        booking_repo: Arc<B>,
        discount_repo: Arc<D>,
        gateway: Arc<G>,
        return_url: String,
        expire_minutes: i64,
    ) -> Self {
        Self {
            payment_repo,
            booking_repo,
            discount_repo,
            gateway,
            return_url,
            expire_minutes,
        }
    }

    /// Opens a gateway session for a pending booking and records the pending
    /// payment row keyed by the gateway transaction number.
    pub async fn initiate_payment(&self, booking_id: Uuid) -> PaymentResult<PaymentSessionModel> {
        let booking = self
            .booking_repo
            .find_booking(booking_id)
            .await
            .map_err(PaymentError::Internal)?
            .ok_or(PaymentError::BookingNotFound)?;

        if BookingStatus::from_str(&booking.status) != Some(BookingStatus::Pending) {
            warn!(%booking_id, status = %booking.status, "payments: initiation on non-pending booking");
            return Err(PaymentError::NotAwaitingPayment);
        }

        let order_info = format!("booking {booking_id}");
        let session = self
            .gateway
            .create_payment_session(booking.final_price, order_info.clone(), self.return_url.clone())
            .await
            .map_err(|err| {
                error!(%booking_id, gateway_error = ?err, "payments: gateway session creation failed");
                PaymentError::GatewayUnavailable(err)
            })?;

        self.payment_repo
            .record_payment(NewPaymentEntity {
                booking_id,
                transaction_no: session.transaction_no.clone(),
                amount: booking.final_price,
                method: PAYMENT_METHOD_GATEWAY.to_string(),
                order_info,
                response_code: None,
                status: PaymentStatus::Pending.to_string(),
            })
            .await
            .map_err(PaymentError::Internal)?;

        info!(
            %booking_id,
            transaction_no = %session.transaction_no,
            amount = booking.final_price,
            "payments: gateway session opened"
        );

        Ok(session)
    }

    /// Reconciles a gateway callback. Response code "00" settles the payment
    /// and confirms the booking; "24" records a customer cancellation and
    /// cancels the booking; anything else marks the payment failed and leaves
    /// the booking pending for a retry.
    pub async fn apply_gateway_result(
        &self,
        callback: GatewayCallbackModel,
    ) -> PaymentResult<PaymentModel> {
        let payment = self
            .payment_repo
            .find_by_transaction_no(callback.transaction_no.clone())
            .await
            .map_err(PaymentError::Internal)?
            .ok_or(PaymentError::PaymentNotFound)?;

        let status = match callback.response_code.as_str() {
            GATEWAY_RESPONSE_SUCCESS => PaymentStatus::Succeeded,
            GATEWAY_RESPONSE_CUSTOMER_CANCELLED => PaymentStatus::Cancelled,
            _ => PaymentStatus::Failed,
        };

        self.payment_repo
            .update_status(payment.id, status, Some(callback.response_code.clone()))
            .await
            .map_err(PaymentError::Internal)?;

        match status {
            PaymentStatus::Succeeded => {
                self.settle_booking(&payment).await?;
            }
            PaymentStatus::Cancelled => {
                // Guarded: a booking already confirmed or cancelled elsewhere
                // is left alone.
                let cancelled = self
                    .booking_repo
                    .update_status(
                        payment.booking_id,
                        vec![BookingStatus::Pending],
                        BookingStatus::Cancelled,
                    )
                    .await
                    .map_err(PaymentError::Internal)?;
                info!(
                    booking_id = %payment.booking_id,
                    cancelled,
                    "payments: customer cancelled at gateway"
                );
            }
            _ => {
                warn!(
                    booking_id = %payment.booking_id,
                    response_code = %callback.response_code,
                    "payments: gateway reported failure; booking left pending"
                );
            }
        }

        let refreshed = self
            .payment_repo
            .find_by_transaction_no(callback.transaction_no)
            .await
            .map_err(PaymentError::Internal)?
            .ok_or(PaymentError::PaymentNotFound)?;

        PaymentModel::from_entity(refreshed).map_err(PaymentError::Internal)
    }

    /// Current payment state for a booking. A pending payment past the
    /// expiry window is reported (and persisted) as expired; the gateway
    /// never calls back for abandoned sessions.
    pub async fn current_status(&self, booking_id: Uuid) -> PaymentResult<PaymentModel> {
        let payment = self
            .payment_repo
            .latest_for_booking(booking_id)
            .await
            .map_err(PaymentError::Internal)?
            .ok_or(PaymentError::PaymentNotFound)?;

        if PaymentStatus::from_str(&payment.status) == Some(PaymentStatus::Pending) {
            let cutoff = Utc::now() - Duration::minutes(self.expire_minutes);
            if payment.created_at < cutoff {
                self.payment_repo
                    .update_status(payment.id, PaymentStatus::Expired, None)
                    .await
                    .map_err(PaymentError::Internal)?;
                info!(
                    %booking_id,
                    payment_id = %payment.id,
                    "payments: pending payment expired"
                );
                let expired = PaymentEntity {
                    status: PaymentStatus::Expired.to_string(),
                    ..payment
                };
                return PaymentModel::from_entity(expired).map_err(PaymentError::Internal);
            }
        }

        PaymentModel::from_entity(payment).map_err(PaymentError::Internal)
    }

    async fn settle_booking(&self, payment: &PaymentEntity) -> PaymentResult<()> {
        let confirmed = self
            .booking_repo
            .update_status(
                payment.booking_id,
                vec![BookingStatus::Pending],
                BookingStatus::Confirmed,
            )
            .await
            .map_err(PaymentError::Internal)?;

        if !confirmed {
            // Payment is already settled; the booking moved on by other
            // means. Record and move on rather than failing the callback.
            warn!(
                booking_id = %payment.booking_id,
                "payments: settled payment for booking no longer pending"
            );
            return Ok(());
        }

        let booking = self
            .booking_repo
            .find_booking(payment.booking_id)
            .await
            .map_err(PaymentError::Internal)?
            .ok_or(PaymentError::BookingNotFound)?;

        if let Some(discount_id) = booking.discount_id {
            let incremented = self
                .discount_repo
                .increment_usage(discount_id)
                .await
                .map_err(PaymentError::Internal)?;
            if !incremented {
                // The money is taken; an oversold code is an operator
                // problem, not a reason to bounce the callback.
                error!(
                    booking_id = %payment.booking_id,
                    %discount_id,
                    "payments: discount usage cap breached after settlement"
                );
            }
        }

        info!(booking_id = %payment.booking_id, "payments: booking confirmed by settled payment");
        Ok(())
    }
}
