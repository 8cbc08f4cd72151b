//! Billing DTOs

use serde::{Deserialize, Serialize};

/// Request body for `POST /billing/create-payment-link`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentLink {
    pub plan_id: String,
}

/// Hosted checkout link returned by the backend
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentLink {
    pub payment_url: String,
}
