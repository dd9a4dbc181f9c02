//! Per-instance daily usage metering.
//!
//! Each provider client owns its own quota state; nothing is process-global.
//! The counter resets on UTC calendar-day change.

use std::sync::Mutex;

use chrono::{NaiveDate, Utc};

use crate::error::{SearchError, SearchResult};
use crate::providers::ProviderKind;

/// Tracks one provider instance's daily request budget.
#[derive(Debug)]
pub struct DailyQuota {
    limit: u32,
    state: Mutex<QuotaState>,
}

#[derive(Debug)]
struct QuotaState {
    day: NaiveDate,
    used: u32,
}

impl DailyQuota {
    /// Create a quota with the given daily request limit.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            state: Mutex::new(QuotaState {
                day: Utc::now().date_naive(),
                used: 0,
            }),
        }
    }

    /// Consume one request, or fail when today's budget is exhausted.
    pub fn try_acquire(&self, provider: ProviderKind) -> SearchResult<()> {
        self.try_acquire_on(provider, Utc::now().date_naive())
    }

    /// Requests consumed today.
    pub fn used_today(&self) -> u32 {
        let state = self.state.lock().unwrap();
        if state.day == Utc::now().date_naive() {
            state.used
        } else {
            0
        }
    }

    /// The configured daily limit.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    fn try_acquire_on(&self, provider: ProviderKind, today: NaiveDate) -> SearchResult<()> {
        let mut state = self.state.lock().unwrap();

        if state.day != today {
            state.day = today;
            state.used = 0;
        }

        if state.used >= self.limit {
            return Err(SearchError::RateLimited {
                provider,
                limit: self.limit,
            });
        }

        state.used += 1;
        Ok(())
    }
}
