use thiserror::Error;
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::PeriodId;

#[derive(Error, Debug)]
pub enum BillingError {
    #[error("invalid lease state: {message}")]
    InvalidLeaseState {
        message: String,
    },

    #[error("ledger inconsistency: payment {payment_id} references unknown period {period}")]
    LedgerInconsistency {
        payment_id: Uuid,
        period: PeriodId,
    },

    #[error("invalid payment amount: {amount}")]
    InvalidPaymentAmount {
        amount: Money,
    },

    #[error("invalid date: {message}")]
    InvalidDate {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("payment gateway unavailable: {message}")]
    GatewayUnavailable {
        message: String,
    },

    #[error("payment gateway did not respond within {timeout_secs}s")]
    GatewayTimeout {
        timeout_secs: u64,
    },

    #[error("payment link already redeemed: {reference}")]
    LinkAlreadyRedeemed {
        reference: String,
    },

    #[error("unknown payment link: {reference}")]
    UnknownPaymentLink {
        reference: String,
    },
}

pub type Result<T> = std::result::Result<T, BillingError>;
