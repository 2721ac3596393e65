use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::decimal::Money;
use crate::types::{LeaseId, PaymentAction, PeriodId, TenantId};

/// all events that can be emitted during billing resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // resolution events
    SummaryComputed {
        tenant_id: TenantId,
        lease_id: LeaseId,
        action: PaymentAction,
        total_due: Money,
        evaluation_date: NaiveDate,
    },
    PeriodSettled {
        period: PeriodId,
        payment_id: Uuid,
        amount_applied: Money,
    },
    LedgerInconsistencyDetected {
        payment_id: Uuid,
        period: PeriodId,
    },

    // payment link events
    PaymentLinkIssued {
        tenant_id: TenantId,
        amount: Money,
        cycle_offset: u32,
        session_id: String,
        timestamp: DateTime<Utc>,
    },
    PaymentLinkReused {
        tenant_id: TenantId,
        amount: Money,
        cycle_offset: u32,
        session_id: String,
        timestamp: DateTime<Utc>,
    },
    PaymentLinkRedeemed {
        session_id: String,
        timestamp: DateTime<Utc>,
    },
    PaymentLinkExpired {
        session_id: String,
        timestamp: DateTime<Utc>,
    },
}

/// event store for collecting events during operations
#[derive(Debug, Default)]
pub struct EventStore {
    events: Vec<Event>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            events: Vec::new(),
        }
    }

    pub fn emit(&mut self, event: Event) {
        self.events.push(event);
    }

    pub fn take_events(&mut self) -> Vec<Event> {
        std::mem::take(&mut self.events)
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
