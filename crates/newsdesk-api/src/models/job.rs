//! Background scraping jobs.
//!
//! Job execution and status transitions belong to the backend queue. The
//! client only reads these records and asks for cancel/retry.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Backend job identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(pub i64);

impl std::fmt::Display for JobId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle status. Exactly one of six values; anything else fails to decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum JobStatus {
    /// Waiting for a worker.
    Queued,
    /// Picked up by a worker.
    Started,
    /// Worker is reporting progress.
    InProgress,
    /// Finished successfully.
    Completed,
    /// Finished with an error.
    Failed,
    /// Cancelled before completion.
    Cancelled,
}

impl JobStatus {
    /// Every status, in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Queued,
        Self::Started,
        Self::InProgress,
        Self::Completed,
        Self::Failed,
        Self::Cancelled,
    ];

    /// Queued, started or in progress.
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Queued | Self::Started | Self::InProgress)
    }

    /// Completed, failed or cancelled.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        !self.is_active()
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Queued => "Queued",
            Self::Started => "Started",
            Self::InProgress => "In progress",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Filters a scraping job was submitted with.
///
/// Unknown keys in the backend bag are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct JobFilters {
    /// Free-text keyword.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub keyword: Option<String>,
    /// Category slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// Source slug.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    /// Inclusive lower date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_from: Option<NaiveDate>,
    /// Inclusive upper date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_to: Option<NaiveDate>,
}

impl JobFilters {
    /// Returns true if no filter is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.keyword.is_none()
            && self.category.is_none()
            && self.source.is_none()
            && self.date_from.is_none()
            && self.date_to.is_none()
    }

    /// Short human-readable summary, e.g. `"rust" · technology`.
    #[must_use]
    pub fn summary(&self) -> String {
        let mut parts = Vec::new();
        if let Some(keyword) = &self.keyword {
            parts.push(format!("\"{keyword}\""));
        }
        if let Some(category) = &self.category {
            parts.push(category.clone());
        }
        if let Some(source) = &self.source {
            parts.push(source.clone());
        }
        match (self.date_from, self.date_to) {
            (Some(from), Some(to)) => parts.push(format!("{from} to {to}")),
            (Some(from), None) => parts.push(format!("from {from}")),
            (None, Some(to)) => parts.push(format!("until {to}")),
            (None, None) => {}
        }
        if parts.is_empty() {
            "All articles".to_string()
        } else {
            parts.join(" \u{b7} ")
        }
    }
}

/// A background job as reported by the queue endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    /// Identifier.
    pub id: JobId,
    /// Job kind, e.g. `scrape`.
    #[serde(rename = "type")]
    pub job_type: String,
    /// Current status.
    pub status: JobStatus,
    /// Submitted filters.
    #[serde(default)]
    pub filters: JobFilters,
    /// Progress percentage, 0-100.
    #[serde(default)]
    pub progress: u8,
    /// Submission time.
    pub created_at: DateTime<Utc>,
    /// When a worker picked it up.
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    /// When it completed.
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    /// When it failed.
    #[serde(default)]
    pub failed_at: Option<DateTime<Utc>>,
    /// Last update time.
    #[serde(default)]
    pub updated_at: Option<DateTime<Utc>>,
    /// Failure reason.
    #[serde(default)]
    pub error_message: Option<String>,
}

impl Job {
    /// Time the job reached its current state, for recency ordering.
    #[must_use]
    pub fn last_activity(&self) -> DateTime<Utc> {
        self.completed_at
            .or(self.failed_at)
            .or(self.updated_at)
            .or(self.started_at)
            .unwrap_or(self.created_at)
    }
}

/// Body of `POST /queue/jobs`.
#[derive(Debug, Clone, Serialize)]
pub struct NewJobRequest {
    /// Job kind.
    #[serde(rename = "type")]
    pub job_type: String,
    /// Filters to scrape for.
    pub filters: JobFilters,
}

impl NewJobRequest {
    /// Job kind used for scraping requests.
    pub const SCRAPE: &'static str = "scrape";

    /// A scraping job for the given filters.
    #[must_use]
    pub fn scrape(filters: JobFilters) -> Self {
        Self {
            job_type: Self::SCRAPE.to_string(),
            filters,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_job_deserialization() {
        let json = r#"{
            "id": 9,
            "type": "scrape",
            "status": "in_progress",
            "filters": {"keyword": "rust", "category": "technology", "unknown": 1},
            "progress": 40,
            "created_at": "2025-03-01T08:00:00Z",
            "started_at": "2025-03-01T08:00:05Z"
        }"#;
        let job: Job = serde_json::from_str(json).unwrap();
        assert_eq!(job.status, JobStatus::InProgress);
        assert_eq!(job.filters.keyword.as_deref(), Some("rust"));
        assert_eq!(job.progress, 40);
        assert_eq!(job.last_activity(), job.started_at.unwrap());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let json = r#"{"id": 1, "type": "scrape", "status": "paused", "created_at": "2025-03-01T08:00:00Z"}"#;
        assert!(serde_json::from_str::<Job>(json).is_err());
    }

    #[test]
    fn test_status_classification() {
        let active: Vec<_> = JobStatus::ALL.iter().filter(|s| s.is_active()).collect();
        assert_eq!(active.len(), 3);
        assert!(JobStatus::ALL
            .iter()
            .all(|s| s.is_active() != s.is_terminal()));
    }

    #[test]
    fn test_filters_summary() {
        assert_eq!(JobFilters::default().summary(), "All articles");
        let filters = JobFilters {
            keyword: Some("ai".to_string()),
            source: Some("bbc-news".to_string()),
            ..JobFilters::default()
        };
        assert_eq!(filters.summary(), "\"ai\" \u{b7} bbc-news");
    }
}
