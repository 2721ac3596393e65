use serde::{Deserialize, Serialize};

use crate::errors::{BillingError, Result};

/// billing engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingConfig {
    /// how many cycles ahead a tenant may pre-pay
    pub advance_limit_months: u32,
    /// lease-expiry warning window
    pub expiry_warning_days: i64,
    /// hosted-checkout link lifetime
    pub link_ttl_minutes: i64,
    /// bound on a single gateway request
    pub gateway_timeout_secs: u64,
}

impl BillingConfig {
    /// standard residential configuration: one month ahead, 30-day expiry warning
    pub fn standard() -> Self {
        Self {
            advance_limit_months: 1,
            expiry_warning_days: 30,
            link_ttl_minutes: 60,
            gateway_timeout_secs: 30,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.advance_limit_months == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "advance_limit_months must be at least 1".to_string(),
            });
        }
        if self.expiry_warning_days < 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "expiry_warning_days must not be negative".to_string(),
            });
        }
        if self.link_ttl_minutes <= 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "link_ttl_minutes must be positive".to_string(),
            });
        }
        if self.gateway_timeout_secs == 0 {
            return Err(BillingError::InvalidConfiguration {
                message: "gateway_timeout_secs must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self::standard()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_config_is_valid() {
        assert!(BillingConfig::standard().validate().is_ok());
    }

    #[test]
    fn test_zero_advance_limit_rejected() {
        let mut config = BillingConfig::standard();
        config.advance_limit_months = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_nonpositive_link_ttl_rejected() {
        let mut config = BillingConfig::standard();
        config.link_ttl_minutes = 0;
        assert!(config.validate().is_err());
    }
}
