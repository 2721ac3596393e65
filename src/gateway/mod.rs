pub mod issuer;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::Result;
use crate::types::TenantId;

pub use issuer::PaymentLinkIssuer;

/// hosted-checkout creation request sent to the external gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRequest {
    pub tenant_id: TenantId,
    pub amount: Money,
    pub description: String,
    /// opaque reference echoed back by the gateway on confirmation
    pub reference_code: String,
    pub success_url: String,
    pub failure_url: String,
}

/// a hosted-checkout session returned by the gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutSession {
    /// redirect URL the payer is sent to
    pub url: String,
    pub session_id: String,
    pub created_at: DateTime<Utc>,
}

/// external payment gateway seam
///
/// implementations must bound each request to the timeout they are handed
/// and surface `GatewayTimeout` when it elapses; the caller decides whether
/// to retry, nothing here retries automatically
pub trait CheckoutGateway {
    fn create_checkout(
        &self,
        request: &CheckoutRequest,
        timeout: std::time::Duration,
    ) -> Result<CheckoutSession>;
}

/// dedup tuple for payment-link creation
///
/// two requests with the same tenant, resolved total and billing cycle are
/// the same intent and must share one link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IdempotencyKey {
    pub tenant_id: TenantId,
    pub total_due: Money,
    pub cycle_offset: u32,
}

impl IdempotencyKey {
    pub fn new(tenant_id: TenantId, total_due: Money, cycle_offset: u32) -> Self {
        Self {
            tenant_id,
            total_due,
            cycle_offset,
        }
    }
}
