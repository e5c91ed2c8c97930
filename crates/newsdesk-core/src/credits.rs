//! Client-side scraping credits.
//!
//! Credits are advisory: they gate the "new job" action in the UI, while the
//! backend stays authoritative. Each user gets `max` credits per 30-day
//! window; the window resets lazily on the first read after it elapses.

use chrono::{DateTime, Duration, Utc};
use newsdesk_api::UserId;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::storage::LocalStore;

/// Credits granted per window.
pub const DEFAULT_MAX_CREDITS: u32 = 10;

/// Length of a credit window in days.
pub const RESET_WINDOW_DAYS: i64 = 30;

/// Persisted credit state for one user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditRecord {
    /// Credits still available in this window.
    pub remaining: u32,
    /// Credits granted per window.
    pub max: u32,
    /// Start of the current window.
    pub last_reset: DateTime<Utc>,
    /// Credits spent in this window.
    pub used_this_month: u32,
}

impl CreditRecord {
    /// A full allowance starting at `now`.
    #[must_use]
    pub const fn fresh(max: u32, now: DateTime<Utc>) -> Self {
        Self {
            remaining: max,
            max,
            last_reset: now,
            used_this_month: 0,
        }
    }

    /// When the current window ends.
    #[must_use]
    pub fn next_reset(&self) -> DateTime<Utc> {
        self.last_reset + Duration::days(RESET_WINDOW_DAYS)
    }

    /// Whole days until the window ends (0 if already due).
    #[must_use]
    pub fn days_until_reset(&self, now: DateTime<Utc>) -> i64 {
        (self.next_reset() - now).num_days().max(0)
    }

    /// Returns true if no credits are left.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Restores the full allowance if the window has elapsed.
    ///
    /// Returns true if a reset happened.
    pub fn reset_if_due(&mut self, now: DateTime<Utc>) -> bool {
        if now < self.next_reset() {
            return false;
        }
        *self = Self::fresh(self.max, now);
        true
    }

    /// Spends `amount` credits.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientCredits`] if `amount` exceeds what is left;
    /// the record is unchanged in that case.
    pub fn deduct(&mut self, amount: u32) -> Result<()> {
        if amount > self.remaining {
            return Err(Error::InsufficientCredits {
                requested: amount,
                remaining: self.remaining,
            });
        }
        self.remaining -= amount;
        self.used_this_month = self.used_this_month.saturating_add(amount);
        Ok(())
    }
}

/// Reads and updates per-user credit records in local storage.
#[derive(Debug, Clone)]
pub struct CreditLedger {
    store: LocalStore,
    max: u32,
}

impl CreditLedger {
    /// Ledger with the default allowance.
    #[must_use]
    pub const fn new(store: LocalStore) -> Self {
        Self::with_max(store, DEFAULT_MAX_CREDITS)
    }

    /// Ledger with a custom allowance for new records.
    #[must_use]
    pub const fn with_max(store: LocalStore, max: u32) -> Self {
        Self { store, max }
    }

    /// Current record for `user_id`, creating or resetting it as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if a new or reset record cannot be persisted.
    pub fn record(&self, user_id: UserId, now: DateTime<Utc>) -> Result<CreditRecord> {
        match self.store.credits(user_id) {
            Some(mut record) => {
                if record.reset_if_due(now) {
                    info!("Credit window for user {user_id} elapsed, resetting");
                    self.store.set_credits(user_id, &record)?;
                }
                Ok(record)
            }
            None => {
                let record = CreditRecord::fresh(self.max, now);
                debug!("Starting credit record for user {user_id}");
                self.store.set_credits(user_id, &record)?;
                Ok(record)
            }
        }
    }

    /// Returns true if `amount` credits are available.
    ///
    /// # Errors
    ///
    /// Returns an error if the record cannot be persisted.
    pub fn can_afford(&self, user_id: UserId, amount: u32, now: DateTime<Utc>) -> Result<bool> {
        Ok(self.record(user_id, now)?.remaining >= amount)
    }

    /// Spends `amount` credits and persists the result.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InsufficientCredits`] if not enough credits remain, or
    /// a storage error if the record cannot be written.
    pub fn deduct(&self, user_id: UserId, amount: u32, now: DateTime<Utc>) -> Result<CreditRecord> {
        let mut record = self.record(user_id, now)?;
        record.deduct(amount)?;
        self.store.set_credits(user_id, &record)?;
        debug!(
            "User {user_id} spent {amount} credit(s), {} left",
            record.remaining
        );
        Ok(record)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn at(day: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(1_735_689_600, 0).unwrap() + Duration::days(day)
    }

    #[test]
    fn test_new_user_gets_full_allowance() {
        let ledger = CreditLedger::new(LocalStore::in_memory());
        let record = ledger.record(UserId(1), at(0)).unwrap();
        assert_eq!(record.remaining, DEFAULT_MAX_CREDITS);
        assert_eq!(record.used_this_month, 0);
        assert_eq!(record.days_until_reset(at(0)), 30);
    }

    #[test]
    fn test_deduct_persists() {
        let store = LocalStore::in_memory();
        let ledger = CreditLedger::new(store.clone());
        ledger.deduct(UserId(1), 3, at(0)).unwrap();

        let stored = store.credits(UserId(1)).unwrap();
        assert_eq!(stored.remaining, 7);
        assert_eq!(stored.used_this_month, 3);
    }

    #[test]
    fn test_overdraw_is_rejected_without_change() {
        let ledger = CreditLedger::with_max(LocalStore::in_memory(), 2);
        let err = ledger.deduct(UserId(1), 3, at(0)).unwrap_err();
        assert!(matches!(
            err,
            Error::InsufficientCredits {
                requested: 3,
                remaining: 2
            }
        ));
        assert_eq!(ledger.record(UserId(1), at(0)).unwrap().remaining, 2);
        assert!(!ledger.can_afford(UserId(1), 3, at(0)).unwrap());
    }

    #[test]
    fn test_window_resets_on_next_read() {
        let ledger = CreditLedger::new(LocalStore::in_memory());
        ledger.deduct(UserId(1), 10, at(0)).unwrap();
        assert!(ledger.record(UserId(1), at(29)).unwrap().is_exhausted());

        let record = ledger.record(UserId(1), at(30)).unwrap();
        assert_eq!(record.remaining, 10);
        assert_eq!(record.used_this_month, 0);
        assert_eq!(record.last_reset, at(30));
    }

    #[test]
    fn test_records_are_per_user() {
        let ledger = CreditLedger::new(LocalStore::in_memory());
        ledger.deduct(UserId(1), 4, at(0)).unwrap();
        assert_eq!(ledger.record(UserId(2), at(0)).unwrap().remaining, 10);
    }

    proptest! {
        #[test]
        fn prop_deduct_within_balance(max in 0u32..50, amount in 0u32..50) {
            let mut record = CreditRecord::fresh(max, at(0));
            let result = record.deduct(amount);
            if amount <= max {
                prop_assert!(result.is_ok());
                prop_assert_eq!(record.remaining, max - amount);
                prop_assert_eq!(record.used_this_month, amount);
            } else {
                prop_assert!(result.is_err());
                prop_assert_eq!(record.remaining, max);
                prop_assert_eq!(record.used_this_month, 0);
            }
        }
    }
}
