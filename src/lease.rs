use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{BillingError, Result};
use crate::types::{LeaseId, TenantId};

/// lease agreement record
///
/// immutable until renewed; administrative edits replace the record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaseAgreement {
    pub lease_id: LeaseId,
    pub tenant_id: TenantId,
    pub lease_start: NaiveDate,
    /// open-ended leases carry no end date
    pub lease_end: Option<NaiveDate>,
    pub monthly_rent_amount: Money,
    pub deposit_amount: Money,
}

impl LeaseAgreement {
    pub fn new(
        lease_id: LeaseId,
        tenant_id: TenantId,
        lease_start: NaiveDate,
        lease_end: Option<NaiveDate>,
        monthly_rent_amount: Money,
        deposit_amount: Money,
    ) -> Self {
        Self {
            lease_id,
            tenant_id,
            lease_start,
            lease_end,
            monthly_rent_amount,
            deposit_amount,
        }
    }

    /// reject contradictory lease records before any calendar math runs on them
    pub fn validate(&self) -> Result<()> {
        if !self.monthly_rent_amount.is_positive() {
            return Err(BillingError::InvalidLeaseState {
                message: format!(
                    "monthly rent must be positive, got {}",
                    self.monthly_rent_amount
                ),
            });
        }
        if self.deposit_amount.is_negative() {
            return Err(BillingError::InvalidLeaseState {
                message: format!("deposit must not be negative, got {}", self.deposit_amount),
            });
        }
        if let Some(end) = self.lease_end {
            if end < self.lease_start {
                return Err(BillingError::InvalidLeaseState {
                    message: format!(
                        "lease ends {} before it starts {}",
                        end, self.lease_start
                    ),
                });
            }
        }
        Ok(())
    }

    /// a lease stays active through its end date, or indefinitely when open-ended
    pub fn is_active(&self, on: NaiveDate) -> bool {
        match self.lease_end {
            Some(end) => end >= on,
            None => true,
        }
    }

    pub fn has_started(&self, on: NaiveDate) -> bool {
        on >= self.lease_start
    }

    /// end date set and inside the warning window, measured from `on`
    pub fn is_expiring_soon(&self, on: NaiveDate, window_days: i64) -> bool {
        match self.lease_end {
            Some(end) => end >= on && (end - on).num_days() <= window_days,
            None => false,
        }
    }
}
