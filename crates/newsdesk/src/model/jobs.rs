//! Jobs page and drawer state.

use std::collections::HashSet;

use newsdesk_api::{Job, JobId};
use newsdesk_core::{ApiConfig, CreditRecord, JobMonitor, JobTransition, RefreshSchedule};

use super::Failure;

/// Job snapshot plus the refresh toggles of both job panels.
#[derive(Debug, Clone)]
pub struct JobsState {
    pub monitor: JobMonitor,
    /// Compact drawer is open.
    pub drawer_open: bool,
    /// Auto-refresh toggle of the drawer.
    pub drawer_auto_refresh: bool,
    /// Auto-refresh toggle of the jobs page.
    pub page_auto_refresh: bool,
    /// Jobs with a cancel or retry in flight.
    pub pending: HashSet<JobId>,
    pub is_loading: bool,
    pub is_submitting: bool,
    pub error: Option<String>,
    /// Credit balance of the signed-in user.
    pub credits: Option<CreditRecord>,
}

impl Default for JobsState {
    fn default() -> Self {
        Self {
            monitor: JobMonitor::default(),
            drawer_open: false,
            drawer_auto_refresh: true,
            page_auto_refresh: true,
            pending: HashSet::new(),
            is_loading: false,
            is_submitting: false,
            error: None,
            credits: None,
        }
    }
}

impl JobsState {
    /// Applies a job list response, returning jobs that just finished.
    pub fn loaded(&mut self, result: Result<Vec<Job>, Failure>) -> Vec<JobTransition> {
        self.is_loading = false;
        match result {
            Ok(jobs) => {
                self.error = None;
                self.monitor.update(jobs)
            }
            Err(failure) => {
                self.error = Some(failure.message);
                Vec::new()
            }
        }
    }

    /// The schedule in force given which panel is on screen.
    ///
    /// The page wins over the drawer when both are visible.
    #[must_use]
    pub const fn schedule(&self, page_visible: bool) -> RefreshSchedule {
        if page_visible {
            RefreshSchedule::page(true, self.page_auto_refresh)
        } else {
            RefreshSchedule::drawer(self.drawer_open, self.drawer_auto_refresh)
        }
    }

    /// Polling schedule for the current screen with the configured intervals.
    ///
    /// Nothing polls while signed out, nor when neither panel is visible.
    #[must_use]
    pub fn poll_schedule(
        &self,
        authenticated: bool,
        on_page: bool,
        config: &ApiConfig,
    ) -> RefreshSchedule {
        let interval = if on_page {
            config.page_interval()
        } else {
            config.drawer_interval()
        };
        let schedule = self.schedule(on_page).with_interval(interval);
        RefreshSchedule {
            visible: authenticated && schedule.visible,
            ..schedule
        }
    }

    /// A new scrape job may be submitted.
    #[must_use]
    pub fn can_submit(&self) -> bool {
        !self.is_submitting && self.credits.as_ref().is_some_and(|c| !c.is_exhausted())
    }

    /// Forgets everything tied to the signed-out user.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::time::Duration;

    use chrono::Utc;
    use newsdesk_core::{DRAWER_INTERVAL, PAGE_INTERVAL};

    #[test]
    fn test_page_schedule_wins() {
        let mut jobs = JobsState {
            drawer_open: true,
            ..JobsState::default()
        };
        assert_eq!(jobs.schedule(true).interval, PAGE_INTERVAL);
        assert_eq!(jobs.schedule(false).interval, DRAWER_INTERVAL);

        jobs.page_auto_refresh = false;
        assert!(!jobs.schedule(true).is_active());
        assert!(jobs.schedule(false).is_active());

        jobs.drawer_open = false;
        assert!(!jobs.schedule(false).is_active());
    }

    #[test]
    fn test_poll_schedule_uses_configured_intervals() {
        let config = ApiConfig {
            drawer_refresh_secs: 7,
            page_refresh_secs: 2,
            ..ApiConfig::default()
        };
        let jobs = JobsState {
            drawer_open: true,
            ..JobsState::default()
        };

        let page = jobs.poll_schedule(true, true, &config);
        assert!(page.is_active());
        assert_eq!(page.interval, Duration::from_secs(2));

        let drawer = jobs.poll_schedule(true, false, &config);
        assert!(drawer.is_active());
        assert_eq!(drawer.interval, Duration::from_secs(7));
    }

    #[test]
    fn test_no_polling_when_hidden_disabled_or_signed_out() {
        let config = ApiConfig::default();
        let mut jobs = JobsState::default();
        // Drawer closed and not on the page.
        assert!(!jobs.poll_schedule(true, false, &config).is_active());

        jobs.drawer_open = true;
        assert!(!jobs.poll_schedule(false, false, &config).is_active());
        assert!(!jobs.poll_schedule(false, true, &config).is_active());

        jobs.drawer_auto_refresh = false;
        assert!(!jobs.poll_schedule(true, false, &config).is_active());
        assert!(jobs.poll_schedule(true, true, &config).is_active());

        jobs.page_auto_refresh = false;
        assert!(!jobs.poll_schedule(true, true, &config).is_active());
    }

    #[test]
    fn test_submit_needs_credits() {
        let mut jobs = JobsState::default();
        assert!(!jobs.can_submit());

        let mut record = CreditRecord::fresh(1, Utc::now());
        jobs.credits = Some(record.clone());
        assert!(jobs.can_submit());

        record.deduct(1).unwrap();
        jobs.credits = Some(record);
        assert!(!jobs.can_submit());
    }

    #[test]
    fn test_failed_load_reports_nothing() {
        let mut jobs = JobsState::default();
        let transitions = jobs.loaded(Err(Failure {
            message: "offline".to_string(),
            ..Failure::default()
        }));
        assert!(transitions.is_empty());
        assert!(!jobs.monitor.is_loaded());
        assert_eq!(jobs.error.as_deref(), Some("offline"));
    }
}
