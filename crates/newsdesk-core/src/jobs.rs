//! Job monitoring.
//!
//! Job status is owned by the backend queue; this module only classifies
//! what the backend reports, decides which actions a row offers and says
//! when the list should refresh itself.

use std::collections::HashMap;
use std::time::Duration;

use newsdesk_api::{Job, JobFilters, JobId, JobStatus};
use tracing::info;

use crate::config::{DRAWER_INTERVAL, PAGE_INTERVAL};
use crate::routes::Route;
use crate::search::SearchFilters;

/// Maximum number of finished jobs shown.
pub const COMPLETED_LIMIT: usize = 10;

/// Jobs split into running and finished.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JobBuckets {
    /// Queued, started or in progress, in backend order.
    pub active: Vec<Job>,
    /// Completed, failed or cancelled, most recent first.
    pub completed: Vec<Job>,
}

impl JobBuckets {
    /// Splits `jobs`, keeping the [`COMPLETED_LIMIT`] most recent finished ones.
    #[must_use]
    pub fn partition(jobs: &[Job]) -> Self {
        Self::partition_with_limit(jobs, COMPLETED_LIMIT)
    }

    /// Splits `jobs`, keeping at most `limit` finished ones.
    #[must_use]
    pub fn partition_with_limit(jobs: &[Job], limit: usize) -> Self {
        let (active, mut completed): (Vec<Job>, Vec<Job>) =
            jobs.iter().cloned().partition(|job| job.status.is_active());
        completed.sort_by_key(|job| std::cmp::Reverse(job.last_activity()));
        completed.truncate(limit);
        Self { active, completed }
    }

    /// Returns true if neither bucket holds anything.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.active.is_empty() && self.completed.is_empty()
    }
}

/// Which buttons a job row shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JobActions {
    /// Cancel is offered.
    pub cancel: bool,
    /// Retry is offered.
    pub retry: bool,
    /// "View results" is offered.
    pub view: bool,
}

impl JobActions {
    /// Cancel only while queued, retry only after failure, view always.
    #[must_use]
    pub const fn for_status(status: JobStatus) -> Self {
        Self {
            cancel: matches!(status, JobStatus::Queued),
            retry: matches!(status, JobStatus::Failed),
            view: true,
        }
    }
}

/// Search route showing what a job scraped for.
#[must_use]
pub fn view_target(filters: &JobFilters) -> Route {
    Route::Search(SearchFilters::from(filters))
}

/// Whether and how often the job list refreshes itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RefreshSchedule {
    /// The panel is on screen.
    pub visible: bool,
    /// The user has auto-refresh on.
    pub auto_refresh: bool,
    /// Time between refreshes.
    pub interval: Duration,
}

impl RefreshSchedule {
    /// Schedule for the compact jobs drawer.
    #[must_use]
    pub const fn drawer(visible: bool, auto_refresh: bool) -> Self {
        Self {
            visible,
            auto_refresh,
            interval: DRAWER_INTERVAL,
        }
    }

    /// Schedule for the full jobs page.
    #[must_use]
    pub const fn page(visible: bool, auto_refresh: bool) -> Self {
        Self {
            visible,
            auto_refresh,
            interval: PAGE_INTERVAL,
        }
    }

    /// Same flags with another interval.
    #[must_use]
    pub const fn with_interval(mut self, interval: Duration) -> Self {
        self.interval = interval;
        self
    }

    /// Polling runs only while visible and enabled.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.visible && self.auto_refresh
    }
}

/// A job that finished between two polls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobTransition {
    /// Status at the earlier poll.
    pub from: JobStatus,
    /// The job as it is now.
    pub job: Job,
}

impl JobTransition {
    /// One-line description for a toast or desktop notification.
    #[must_use]
    pub fn summary(&self) -> String {
        let what = self.job.filters.summary();
        match self.job.status {
            JobStatus::Completed => format!("Scrape finished: {what}"),
            JobStatus::Failed => match &self.job.error_message {
                Some(reason) => format!("Scrape failed: {what} ({reason})"),
                None => format!("Scrape failed: {what}"),
            },
            JobStatus::Cancelled => format!("Scrape cancelled: {what}"),
            _ => format!("Scrape {}: {what}", self.job.status.label().to_lowercase()),
        }
    }
}

/// Jobs that were active in `previous` and are terminal in `current`.
#[must_use]
pub fn detect_transitions(previous: &[Job], current: &[Job]) -> Vec<JobTransition> {
    let before: HashMap<JobId, JobStatus> =
        previous.iter().map(|job| (job.id, job.status)).collect();

    current
        .iter()
        .filter(|job| job.status.is_terminal())
        .filter_map(|job| {
            let from = *before.get(&job.id)?;
            from.is_active().then(|| JobTransition {
                from,
                job: job.clone(),
            })
        })
        .collect()
}

/// Last job snapshot with its buckets.
#[derive(Debug, Clone, Default)]
pub struct JobMonitor {
    jobs: Vec<Job>,
    buckets: JobBuckets,
    loaded: bool,
}

impl JobMonitor {
    /// Replaces the snapshot and reports jobs that finished since the last one.
    ///
    /// The first snapshot never reports transitions.
    pub fn update(&mut self, jobs: Vec<Job>) -> Vec<JobTransition> {
        let transitions = if self.loaded {
            detect_transitions(&self.jobs, &jobs)
        } else {
            Vec::new()
        };
        for transition in &transitions {
            info!(
                "Job {} moved from {} to {}",
                transition.job.id, transition.from, transition.job.status
            );
        }
        self.buckets = JobBuckets::partition(&jobs);
        self.jobs = jobs;
        self.loaded = true;
        transitions
    }

    /// Current buckets.
    #[must_use]
    pub const fn buckets(&self) -> &JobBuckets {
        &self.buckets
    }

    /// Returns true once a snapshot has arrived.
    #[must_use]
    pub const fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Number of running jobs.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.buckets.active.len()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration as ChronoDuration, Utc};
    use proptest::prelude::*;

    fn base() -> DateTime<Utc> {
        DateTime::from_timestamp(1_740_000_000, 0).unwrap()
    }

    fn job(id: i64, status: JobStatus, minutes: i64) -> Job {
        let at = base() + ChronoDuration::minutes(minutes);
        Job {
            id: JobId(id),
            job_type: "scrape".to_string(),
            status,
            filters: JobFilters::default(),
            progress: 0,
            created_at: base(),
            started_at: None,
            completed_at: (status == JobStatus::Completed).then_some(at),
            failed_at: (status == JobStatus::Failed).then_some(at),
            updated_at: Some(at),
            error_message: None,
        }
    }

    #[test]
    fn test_partition_orders_and_caps_completed() {
        let mut jobs = vec![job(1, JobStatus::Queued, 0), job(2, JobStatus::InProgress, 1)];
        for i in 0..12 {
            jobs.push(job(10 + i, JobStatus::Completed, i));
        }
        jobs.push(job(99, JobStatus::Failed, 100));

        let buckets = JobBuckets::partition(&jobs);
        assert_eq!(buckets.active.len(), 2);
        assert_eq!(buckets.completed.len(), COMPLETED_LIMIT);
        assert_eq!(buckets.completed[0].id, JobId(99));
        assert_eq!(buckets.completed[1].id, JobId(21));
    }

    #[test]
    fn test_actions_per_status() {
        let queued = JobActions::for_status(JobStatus::Queued);
        assert!(queued.cancel && !queued.retry && queued.view);

        let failed = JobActions::for_status(JobStatus::Failed);
        assert!(!failed.cancel && failed.retry);

        let completed = JobActions::for_status(JobStatus::Completed);
        assert!(!completed.cancel && !completed.retry && completed.view);

        let running = JobActions::for_status(JobStatus::InProgress);
        assert!(!running.cancel && !running.retry);
    }

    #[test]
    fn test_view_target() {
        assert_eq!(
            view_target(&JobFilters::default()),
            Route::Search(SearchFilters::default())
        );
        let filters = JobFilters {
            category: Some("technology".to_string()),
            ..JobFilters::default()
        };
        match view_target(&filters) {
            Route::Search(search) => {
                assert_eq!(search.category.as_deref(), Some("technology"));
                assert_eq!(search.page, 1);
            }
            other => panic!("unexpected route {other:?}"),
        }
    }

    #[test]
    fn test_schedule_activity() {
        assert!(RefreshSchedule::page(true, true).is_active());
        assert!(!RefreshSchedule::page(true, false).is_active());
        assert!(!RefreshSchedule::drawer(false, true).is_active());
        assert_eq!(RefreshSchedule::drawer(true, true).interval, DRAWER_INTERVAL);
    }

    #[test]
    fn test_detect_transitions() {
        let previous = vec![
            job(1, JobStatus::InProgress, 0),
            job(2, JobStatus::Queued, 0),
            job(3, JobStatus::Completed, 0),
        ];
        let mut failed = job(2, JobStatus::Failed, 5);
        failed.error_message = Some("timeout".to_string());
        let current = vec![
            job(1, JobStatus::Completed, 5),
            failed,
            job(3, JobStatus::Completed, 0),
            job(4, JobStatus::Completed, 5),
        ];

        let transitions = detect_transitions(&previous, &current);
        let ids: Vec<_> = transitions.iter().map(|t| t.job.id).collect();
        assert_eq!(ids, vec![JobId(1), JobId(2)]);
        assert_eq!(transitions[1].summary(), "Scrape failed: All articles (timeout)");
    }

    #[test]
    fn test_monitor_skips_first_snapshot() {
        let mut monitor = JobMonitor::default();
        assert!(monitor.update(vec![job(1, JobStatus::Queued, 0)]).is_empty());
        assert_eq!(monitor.active_count(), 1);
        let transitions = monitor.update(vec![job(1, JobStatus::Cancelled, 1)]);
        assert_eq!(transitions.len(), 1);
        assert_eq!(monitor.buckets().completed.len(), 1);
    }

    fn status_strategy() -> impl Strategy<Value = JobStatus> {
        proptest::sample::select(JobStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn prop_partition_is_exact(statuses in proptest::collection::vec(status_strategy(), 0..40)) {
            let jobs: Vec<Job> = statuses
                .iter()
                .enumerate()
                .map(|(i, s)| job(i64::try_from(i).unwrap(), *s, i64::try_from(i).unwrap()))
                .collect();
            let buckets = JobBuckets::partition_with_limit(&jobs, usize::MAX);

            prop_assert_eq!(buckets.active.len() + buckets.completed.len(), jobs.len());
            prop_assert!(buckets.active.iter().all(|j| j.status.is_active()));
            prop_assert!(buckets.completed.iter().all(|j| j.status.is_terminal()));
            for job in &jobs {
                let in_active = buckets.active.iter().any(|j| j.id == job.id);
                let in_completed = buckets.completed.iter().any(|j| j.id == job.id);
                prop_assert!(in_active != in_completed);
            }

            let capped = JobBuckets::partition(&jobs);
            prop_assert!(capped.completed.len() <= COMPLETED_LIMIT);
            prop_assert_eq!(capped.active.len(), buckets.active.len());
        }
    }
}
