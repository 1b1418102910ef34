//! Rate-limited gateway for all outbound catalog calls.
//!
//! Every remote request in the crate goes through one shared [`RateGateway`].
//! Holding a [`GatewayTicket`] serializes callers; dropping it records the
//! release time, and the next ticket is only handed out once
//! `minimum_delta` has elapsed since then. After a failed call the gateway
//! is snoozed so a degraded service isn't hammered.
//!
//! Pagination loops acquire one ticket per page, so other callers can
//! interleave between pages of a long listing.

use std::future::Future;
use std::time::{Duration, Instant};

use tokio::sync::{Mutex, MutexGuard};
use tracing::{debug, warn};

use super::domain::{CatalogError, Lookup, Page};

/// Shared serialization point for remote calls.
pub struct RateGateway {
    serial: Mutex<()>,
    timing: parking_lot::Mutex<Timing>,
    minimum_delta: Duration,
    failure_snooze: Duration,
}

#[derive(Debug, Default)]
struct Timing {
    last_release: Option<Instant>,
    snoozed_until: Option<Instant>,
}

impl Timing {
    /// Earliest instant the next call is permitted, if any constraint applies.
    fn next_permitted(&self, minimum_delta: Duration) -> Option<Instant> {
        let after_release = self.last_release.map(|at| at + minimum_delta);
        match (after_release, self.snoozed_until) {
            (Some(a), Some(b)) => Some(a.max(b)),
            (a, b) => a.or(b),
        }
    }
}

/// Permission to make one remote call. Released on drop.
pub struct GatewayTicket<'a> {
    gateway: &'a RateGateway,
    _serial: MutexGuard<'a, ()>,
}

impl GatewayTicket<'_> {
    /// Snooze the gateway while still holding the ticket.
    pub fn snooze(&self, duration: Duration) {
        self.gateway.snooze(duration);
    }
}

impl Drop for GatewayTicket<'_> {
    fn drop(&mut self) {
        self.gateway.timing.lock().last_release = Some(Instant::now());
    }
}

impl RateGateway {
    /// Create a gateway with the given spacing between calls and the cooldown
    /// applied after a failed call.
    pub fn new(minimum_delta: Duration, failure_snooze: Duration) -> Self {
        Self {
            serial: Mutex::new(()),
            timing: parking_lot::Mutex::new(Timing::default()),
            minimum_delta,
            failure_snooze,
        }
    }

    pub fn minimum_delta(&self) -> Duration {
        self.minimum_delta
    }

    /// Wait for our turn, then hand out a ticket.
    pub async fn acquire(&self) -> GatewayTicket<'_> {
        let serial = self.serial.lock().await;

        let next = self.timing.lock().next_permitted(self.minimum_delta);
        if let Some(at) = next {
            let now = Instant::now();
            if at > now {
                debug!(
                    target: "catalog::gateway",
                    wait_ms = (at - now).as_millis() as u64,
                    "Rate limiting"
                );
                tokio::time::sleep_until(tokio::time::Instant::from_std(at)).await;
            }
        }

        GatewayTicket {
            gateway: self,
            _serial: serial,
        }
    }

    /// Push the next permitted call time back by `duration`.
    pub fn snooze(&self, duration: Duration) {
        let mut timing = self.timing.lock();
        let now = Instant::now();
        let base = timing
            .next_permitted(self.minimum_delta)
            .map_or(now, |at| at.max(now));
        timing.snoozed_until = Some(base + duration);
        debug!(
            target: "catalog::gateway",
            secs = duration.as_secs_f64(),
            "Gateway snoozed"
        );
    }

    /// Run one remote request under a ticket.
    ///
    /// `NotFound` from the service becomes [`Lookup::NotFound`]; any other
    /// failure is logged, snoozes the gateway and becomes
    /// [`Lookup::TransportError`].
    pub async fn call<T, Fut>(&self, label: &str, request: Fut) -> Lookup<T>
    where
        Fut: Future<Output = Result<T, CatalogError>>,
    {
        let ticket = self.acquire().await;
        match request.await {
            Ok(value) => Lookup::Found(value),
            Err(CatalogError::NotFound) => {
                debug!(target: "catalog::gateway", call = label, "Nothing found");
                Lookup::NotFound
            }
            Err(e) => {
                warn!(target: "catalog::gateway", call = label, error = %e, "Remote call failed");
                ticket.snooze(self.failure_snooze);
                Lookup::TransportError(e.to_string())
            }
        }
    }

    /// Collect a paginated listing, one ticket per page.
    ///
    /// Stops after the last page, or once `max_items` items are collected.
    /// A failure on any page fails the whole listing.
    pub async fn paginate<T, F, Fut>(
        &self,
        label: &str,
        max_items: Option<usize>,
        mut fetch: F,
    ) -> Lookup<Vec<T>>
    where
        F: FnMut(u32) -> Fut,
        Fut: Future<Output = Result<Page<T>, CatalogError>>,
    {
        let mut items = Vec::new();
        let mut page_number = 1;

        loop {
            let page = match self.call(label, fetch(page_number)).await {
                Lookup::Found(page) => page,
                Lookup::NotFound if page_number == 1 => return Lookup::NotFound,
                Lookup::NotFound => break,
                Lookup::TransportError(detail) => return Lookup::TransportError(detail),
            };

            items.extend(page.items);

            if let Some(max) = max_items
                && items.len() >= max
            {
                items.truncate(max);
                break;
            }
            if page.page >= page.pages {
                break;
            }
            page_number += 1;
        }

        Lookup::Found(items)
    }
}
