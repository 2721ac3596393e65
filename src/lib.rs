pub mod actions;
pub mod calendar;
pub mod config;
pub mod decimal;
pub mod errors;
pub mod events;
pub mod gateway;
pub mod lease;
pub mod ledger;
pub mod receipt;
pub mod summary;
pub mod types;

// re-export key types
pub use actions::{classify, OptionBuilder, PaymentOption, PaymentPlan};
pub use calendar::{BillingCycle, CycleCalculator, Proration};
pub use config::BillingConfig;
pub use decimal::{Money, Rate};
pub use errors::{BillingError, Result};
pub use events::{Event, EventStore};
pub use gateway::{
    CheckoutGateway, CheckoutRequest, CheckoutSession, IdempotencyKey, PaymentLinkIssuer,
};
pub use lease::LeaseAgreement;
pub use ledger::{LedgerAggregator, LedgerView, ObligationPeriod, PaymentRecord};
pub use receipt::{PaymentReceipt, ReceiptContext};
pub use summary::{OverduePaymentDetail, RentSummary, SummaryAssembler};
pub use types::{LeaseId, PaymentAction, PaymentOptionKind, PeriodId, PeriodStatus, TenantId};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
