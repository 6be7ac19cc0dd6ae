//! Daily request and cost accounting for the chat proxy.
//!
//! Counters cover one calendar day and reset the first time a later date is
//! observed. Gates are checked and a slot is reserved under a single lock, so
//! concurrent callers can never push the committed count past the limit.

use crate::config::BudgetConfig;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Usage for a single day.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct UsageCounter {
    pub day: NaiveDate,
    pub request_count: u32,
    pub estimated_cost_usd: f64,
}

impl UsageCounter {
    pub fn new(day: NaiveDate) -> Self {
        Self {
            day,
            request_count: 0,
            estimated_cost_usd: 0.0,
        }
    }

    fn roll_over(&mut self, today: NaiveDate) {
        if self.day != today {
            tracing::info!(
                previous_day = %self.day,
                requests = self.request_count,
                cost_usd = self.estimated_cost_usd,
                "Resetting daily usage"
            );
            *self = Self::new(today);
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BudgetLimits {
    pub max_daily_requests: u32,
    /// USD.
    pub max_daily_cost: f64,
}

impl From<&BudgetConfig> for BudgetLimits {
    fn from(config: &BudgetConfig) -> Self {
        Self {
            max_daily_requests: config.max_daily_requests,
            max_daily_cost: config.max_daily_cost,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    RequestLimit,
    CostLimit,
}

/// Snapshot returned by `GET /api/usage`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UsageReport {
    pub date: NaiveDate,
    pub requests: u32,
    /// Rounded to cents.
    pub estimated_cost: f64,
    pub max_requests: u32,
    pub max_cost: f64,
    pub remaining_requests: u32,
    pub remaining_budget: f64,
}

struct LedgerInner {
    counter: Mutex<UsageCounter>,
    /// Reserved slots whose provider call has not finished yet.
    in_flight: AtomicU32,
}

/// Shared handle to the day's usage counter.
#[derive(Clone)]
pub struct UsageLedger {
    inner: Arc<LedgerInner>,
    limits: BudgetLimits,
}

impl UsageLedger {
    pub fn new(limits: BudgetLimits, today: NaiveDate) -> Self {
        Self::with_counter(limits, UsageCounter::new(today))
    }

    /// Start from existing usage, e.g. to resume mid-day.
    pub fn with_counter(limits: BudgetLimits, counter: UsageCounter) -> Self {
        Self {
            inner: Arc::new(LedgerInner {
                counter: Mutex::new(counter),
                in_flight: AtomicU32::new(0),
            }),
            limits,
        }
    }

    pub fn limits(&self) -> BudgetLimits {
        self.limits
    }

    /// Apply day rollover, check the request and cost gates, and reserve a
    /// slot for one provider call.
    pub async fn try_reserve(&self, today: NaiveDate) -> Result<UsagePermit, RejectReason> {
        let mut counter = self.inner.counter.lock().await;
        counter.roll_over(today);

        let in_flight = self.inner.in_flight.load(Ordering::SeqCst);
        if counter.request_count.saturating_add(in_flight) >= self.limits.max_daily_requests {
            return Err(RejectReason::RequestLimit);
        }
        if counter.estimated_cost_usd >= self.limits.max_daily_cost {
            return Err(RejectReason::CostLimit);
        }

        self.inner.in_flight.fetch_add(1, Ordering::SeqCst);
        Ok(UsagePermit {
            inner: Arc::clone(&self.inner),
            settled: false,
        })
    }

    pub async fn snapshot(&self) -> UsageCounter {
        *self.inner.counter.lock().await
    }

    pub fn in_flight(&self) -> u32 {
        self.inner.in_flight.load(Ordering::SeqCst)
    }

    /// Usage as of `today`. A stale stored day reads as an empty day; the
    /// ledger itself is left untouched.
    pub async fn report(&self, today: NaiveDate) -> UsageReport {
        let stored = self.snapshot().await;
        let current = if stored.day == today {
            stored
        } else {
            UsageCounter::new(today)
        };

        UsageReport {
            date: current.day,
            requests: current.request_count,
            estimated_cost: (current.estimated_cost_usd * 100.0).round() / 100.0,
            max_requests: self.limits.max_daily_requests,
            max_cost: self.limits.max_daily_cost,
            remaining_requests: self
                .limits
                .max_daily_requests
                .saturating_sub(current.request_count),
            remaining_budget: (self.limits.max_daily_cost - current.estimated_cost_usd).max(0.0),
        }
    }
}

/// A reserved request slot. Commit it after a successful provider call;
/// dropping it releases the slot without counting anything.
#[must_use = "dropping a permit releases the reserved slot"]
pub struct UsagePermit {
    inner: Arc<LedgerInner>,
    settled: bool,
}

impl UsagePermit {
    /// Count one completed request costing `cost_usd` and release the slot.
    /// Returns the updated counter.
    pub async fn commit(mut self, today: NaiveDate, cost_usd: f64) -> UsageCounter {
        let inner = Arc::clone(&self.inner);
        let mut counter = inner.counter.lock().await;
        counter.roll_over(today);
        counter.request_count += 1;
        counter.estimated_cost_usd += cost_usd;
        self.release();
        *counter
    }

    fn release(&mut self) {
        if !self.settled {
            self.settled = true;
            self.inner.in_flight.fetch_sub(1, Ordering::SeqCst);
        }
    }
}

impl Drop for UsagePermit {
    fn drop(&mut self) {
        self.release();
    }
}
