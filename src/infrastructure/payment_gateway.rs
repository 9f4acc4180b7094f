use std::time::Duration;

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::application::usecases::payments::PaymentGateway;
use crate::domain::value_objects::payments::PaymentSessionModel;

/// Hosted-checkout client built on reqwest. The provider returns a redirect
/// URL plus its transaction number; settlement arrives later on the
/// callback route.
pub struct HttpPaymentGateway {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Debug, Serialize)]
struct SessionRequest<'a> {
    amount: i64,
    order_info: &'a str,
    return_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    redirect_url: String,
    transaction_no: String,
}

impl HttpPaymentGateway {
    pub fn new(base_url: String, timeout_secs: u64) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .expect("Failed to build payment gateway HTTP client");

        Self { http, base_url }
    }
}

#[async_trait]
impl PaymentGateway for HttpPaymentGateway {
    async fn create_payment_session(
        &self,
        amount: i64,
        order_info: String,
        return_url: String,
    ) -> Result<PaymentSessionModel> {
        let response = self
            .http
            .post(format!("{}/sessions", self.base_url))
            .json(&SessionRequest {
                amount,
                order_info: &order_info,
                return_url: &return_url,
            })
            .send()
            .await?
            .error_for_status()
            .map_err(|err| {
                error!(gateway_error = ?err, "payment gateway rejected session request");
                err
            })?;

        let body: SessionResponse = response.json().await?;

        Ok(PaymentSessionModel {
            redirect_url: body.redirect_url,
            transaction_no: body.transaction_no,
        })
    }
}
