pub mod aggregator;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::calendar::BillingCycle;
use crate::decimal::Money;
use crate::types::{PeriodId, PeriodStatus, TenantId};

pub use aggregator::{LedgerAggregator, LedgerView};

/// one calendar month of rent liability
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObligationPeriod {
    pub id: PeriodId,
    pub cycle: BillingCycle,
    pub amount_due: Money,
    pub settled_amount: Money,
    pub status: PeriodStatus,
}

impl ObligationPeriod {
    pub fn new(id: PeriodId, cycle: BillingCycle, amount_due: Money) -> Self {
        Self {
            id,
            cycle,
            amount_due,
            settled_amount: Money::ZERO,
            status: PeriodStatus::Unpaid,
        }
    }

    /// unsettled remainder, floored at zero
    pub fn outstanding(&self) -> Money {
        (self.amount_due - self.settled_amount).max(Money::ZERO)
    }

    pub fn is_settled(&self) -> bool {
        self.settled_amount >= self.amount_due
    }
}

/// an executed payment, created only by a confirmed gateway charge
///
/// never mutated after creation; refunds are separate negative-amount records
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    pub payment_id: Uuid,
    pub tenant_id: TenantId,
    pub amount: Money,
    /// late fee included in `amount`; does not settle rent
    pub late_fee_amount: Money,
    pub paid_date: DateTime<Utc>,
    /// periods this payment settles, oldest first
    pub applies_to_periods: Vec<PeriodId>,
    /// gateway session identifier for receipt lookup
    pub external_reference: Option<String>,
}

impl PaymentRecord {
    /// the portion of the payment that settles rent obligations
    pub fn net_amount(&self) -> Money {
        (self.amount - self.late_fee_amount).max(Money::ZERO)
    }
}
