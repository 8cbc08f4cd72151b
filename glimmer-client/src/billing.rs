//! Billing endpoints
//!
//! Checkout happens on the payment processor's hosted page; the client
//! only obtains the link.

use crate::FlyerClient;
use crate::error::Result;
use glimmer_core::domain::billing::{Subscription, SubscriptionPlan};
use glimmer_core::dto::billing::{CreatePaymentLink, PaymentLink};
use reqwest::Method;

impl FlyerClient {
    /// List purchasable plans
    pub async fn subscription_plans(&self) -> Result<Vec<SubscriptionPlan>> {
        let response = self.request(Method::GET, "/billing/plans")?.send().await?;

        self.handle_response(response).await
    }

    /// Current subscription, `None` when the user never subscribed
    pub async fn my_subscription(&self) -> Result<Option<Subscription>> {
        let response = self
            .request(Method::GET, "/billing/my-subscription")?
            .send()
            .await?;

        match self.handle_response::<Option<Subscription>>(response).await {
            Err(e) if e.is_not_found() => Ok(None),
            other => other,
        }
    }

    /// Create a hosted checkout link for a plan
    pub async fn create_payment_link(&self, plan_id: &str) -> Result<PaymentLink> {
        let response = self
            .request(Method::POST, "/billing/create-payment-link")?
            .json(&CreatePaymentLink {
                plan_id: plan_id.to_string(),
            })
            .send()
            .await?;

        self.handle_response(response).await
    }

    /// Cancel the subscription at the end of the current period
    pub async fn cancel_subscription(&self) -> Result<()> {
        let response = self
            .request(Method::POST, "/billing/cancel-subscription")?
            .send()
            .await?;

        self.handle_empty_response(response).await
    }
}
