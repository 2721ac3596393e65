use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Utc};

use crate::config::BillingConfig;
use crate::errors::{BillingError, Result};
use crate::events::{Event, EventStore};
use crate::gateway::{CheckoutGateway, CheckoutRequest, CheckoutSession, IdempotencyKey};

#[derive(Debug, Clone)]
struct IssuedLink {
    session: CheckoutSession,
    redeemed: bool,
}

/// issues hosted-checkout links with at-most-one-active-link semantics
///
/// the resolver's output can be recomputed freely; the chargeable link is
/// where duplication would cost real money, so the whole check-and-create
/// runs under one lock and a second request with an identical pending key
/// gets the existing link back
pub struct PaymentLinkIssuer<G: CheckoutGateway> {
    gateway: G,
    link_ttl: chrono::Duration,
    request_timeout: Duration,
    links: Mutex<HashMap<IdempotencyKey, IssuedLink>>,
}

impl<G: CheckoutGateway> PaymentLinkIssuer<G> {
    pub fn new(gateway: G, config: &BillingConfig) -> Self {
        Self {
            gateway,
            link_ttl: chrono::Duration::minutes(config.link_ttl_minutes),
            request_timeout: Duration::from_secs(config.gateway_timeout_secs),
            links: Mutex::new(HashMap::new()),
        }
    }

    fn is_active(&self, link: &IssuedLink, now: DateTime<Utc>) -> bool {
        !link.redeemed && now < link.session.created_at + self.link_ttl
    }

    /// create a checkout link, or return the active one for the same key
    pub fn issue(
        &self,
        key: IdempotencyKey,
        request: &CheckoutRequest,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<CheckoutSession> {
        if !key.total_due.is_positive() {
            return Err(BillingError::InvalidPaymentAmount {
                amount: key.total_due,
            });
        }

        let mut links = self.links.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        if let Some(existing) = links.get(&key) {
            if self.is_active(existing, now) {
                tracing::info!(
                    tenant_id = %key.tenant_id,
                    amount = %key.total_due,
                    session_id = %existing.session.session_id,
                    "reusing active payment link"
                );
                events.emit(Event::PaymentLinkReused {
                    tenant_id: key.tenant_id,
                    amount: key.total_due,
                    cycle_offset: key.cycle_offset,
                    session_id: existing.session.session_id.clone(),
                    timestamp: now,
                });
                return Ok(existing.session.clone());
            }
        }

        // gateway call stays inside the lock: concurrent identical requests
        // must not both reach the gateway
        let session = match self.gateway.create_checkout(request, self.request_timeout) {
            Ok(session) => session,
            Err(err) => {
                tracing::error!(
                    tenant_id = %key.tenant_id,
                    amount = %key.total_due,
                    error = %err,
                    "checkout creation failed"
                );
                return Err(err);
            }
        };

        events.emit(Event::PaymentLinkIssued {
            tenant_id: key.tenant_id,
            amount: key.total_due,
            cycle_offset: key.cycle_offset,
            session_id: session.session_id.clone(),
            timestamp: now,
        });
        links.insert(
            key,
            IssuedLink {
                session: session.clone(),
                redeemed: false,
            },
        );

        Ok(session)
    }

    /// mark a link spent once the gateway confirms the charge
    pub fn mark_redeemed(
        &self,
        session_id: &str,
        now: DateTime<Utc>,
        events: &mut EventStore,
    ) -> Result<()> {
        let mut links = self.links.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        for link in links.values_mut() {
            if link.session.session_id == session_id {
                if link.redeemed {
                    return Err(BillingError::LinkAlreadyRedeemed {
                        reference: session_id.to_string(),
                    });
                }
                link.redeemed = true;
                events.emit(Event::PaymentLinkRedeemed {
                    session_id: session_id.to_string(),
                    timestamp: now,
                });
                return Ok(());
            }
        }

        Err(BillingError::UnknownPaymentLink {
            reference: session_id.to_string(),
        })
    }

    /// drop links past their ttl, returning how many were removed
    pub fn purge_expired(&self, now: DateTime<Utc>, events: &mut EventStore) -> usize {
        let mut links = self.links.lock().unwrap_or_else(|poisoned| poisoned.into_inner());

        let expired: Vec<IdempotencyKey> = links
            .iter()
            .filter(|(_, link)| !link.redeemed && now >= link.session.created_at + self.link_ttl)
            .map(|(key, _)| *key)
            .collect();

        for key in &expired {
            if let Some(link) = links.remove(key) {
                events.emit(Event::PaymentLinkExpired {
                    session_id: link.session.session_id,
                    timestamp: now,
                });
            }
        }

        expired.len()
    }

    /// the active link for a key, if one exists
    pub fn active_link(&self, key: &IdempotencyKey, now: DateTime<Utc>) -> Option<CheckoutSession> {
        let links = self.links.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        links
            .get(key)
            .filter(|link| self.is_active(link, now))
            .map(|link| link.session.clone())
    }
}
