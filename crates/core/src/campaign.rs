//! Campaign lifecycle: the unit of work the pipeline runs end to end.
//!
//! A campaign moves `pending → running → {completed | failed | cancelled}`.
//! Terminal states are sticky — the mutators below never leave one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
    Paused,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CampaignPriority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// What a caller asks for: the research brief.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub topic: String,
    pub seed_keywords: Vec<String>,
    #[serde(default)]
    pub competitor_urls: Vec<String>,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default)]
    pub priority: CampaignPriority,
    #[serde(default)]
    pub persona_focus: Option<String>,
}

fn default_region() -> String {
    "US".to_string()
}

fn default_language() -> String {
    "en".to_string()
}

/// A campaign as tracked by the orchestrator and persisted in the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: Uuid,
    pub request: CampaignRequest,
    pub status: CampaignStatus,
    pub priority: CampaignPriority,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub started_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub total_tasks: u32,
    pub completed_tasks: u32,
    pub failed_tasks: u32,
    #[serde(default)]
    pub keyword_result_id: Option<Uuid>,
    #[serde(default)]
    pub audience_result_id: Option<Uuid>,
    #[serde(default)]
    pub competitor_result_id: Option<Uuid>,
    #[serde(default)]
    pub trend_result_id: Option<Uuid>,
    #[serde(default)]
    pub final_report_id: Option<Uuid>,
    #[serde(default)]
    pub error_message: Option<String>,
}

/// Lightweight projection for listings and status endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CampaignSummary {
    pub id: Uuid,
    pub name: String,
    pub status: CampaignStatus,
    pub priority: CampaignPriority,
    pub progress: f64,
    pub created_at: DateTime<Utc>,
}

impl Campaign {
    /// Create a new pending campaign with the given task budget.
    pub fn new(request: CampaignRequest, total_tasks: u32) -> Self {
        let priority = request.priority;
        Self {
            id: Uuid::new_v4(),
            request,
            status: CampaignStatus::Pending,
            priority,
            created_at: Utc::now(),
            started_at: None,
            completed_at: None,
            total_tasks,
            completed_tasks: 0,
            failed_tasks: 0,
            keyword_result_id: None,
            audience_result_id: None,
            competitor_result_id: None,
            trend_result_id: None,
            final_report_id: None,
            error_message: None,
        }
    }

    /// Still doing work: pending, running, or paused.
    pub fn is_active(&self) -> bool {
        matches!(
            self.status,
            CampaignStatus::Pending | CampaignStatus::Running | CampaignStatus::Paused
        )
    }

    /// Reached a terminal state.
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status,
            CampaignStatus::Completed | CampaignStatus::Failed | CampaignStatus::Cancelled
        )
    }

    /// Transition `pending → running` and stamp `started_at` once.
    /// Calling again while running keeps the original timestamp.
    pub fn start(&mut self) {
        if self.is_finished() {
            return;
        }
        if self.started_at.is_none() {
            self.started_at = Some(Utc::now());
        }
        self.status = CampaignStatus::Running;
    }

    /// Record one unit of finished work. When every task is done the
    /// campaign completes and `completed_at` is stamped.
    ///
    /// Counters are intentionally permissive: callers that over-report
    /// push progress past 100 rather than being clamped.
    pub fn complete_task(&mut self) {
        self.completed_tasks += 1;
        if self.completed_tasks >= self.total_tasks && self.is_active() {
            self.status = CampaignStatus::Completed;
            self.completed_at = Some(Utc::now());
        }
    }

    /// Record one failed unit of work. Once failures exceed half the task
    /// budget (integer division) the campaign fails.
    pub fn fail_task(&mut self) {
        self.failed_tasks += 1;
        if self.failed_tasks > self.total_tasks / 2 && self.is_active() {
            self.status = CampaignStatus::Failed;
            self.completed_at = Some(Utc::now());
        }
    }

    /// Force an active campaign into a terminal state at pipeline end.
    /// Completes when no error is given, fails otherwise. Partial runs
    /// would stay `running` forever without this.
    pub fn finish(&mut self, error: Option<String>) {
        if !self.is_active() {
            return;
        }
        self.completed_at = Some(Utc::now());
        match error {
            None => self.status = CampaignStatus::Completed,
            Some(message) => {
                self.status = CampaignStatus::Failed;
                self.error_message = Some(message);
            }
        }
    }

    /// Cancel an active campaign, recording the reason.
    pub fn cancel(&mut self, reason: impl Into<String>) {
        if !self.is_active() {
            return;
        }
        self.status = CampaignStatus::Cancelled;
        self.completed_at = Some(Utc::now());
        self.error_message = Some(reason.into());
    }

    /// Completed work as a percentage of the task budget. Zero-safe.
    pub fn progress_percentage(&self) -> f64 {
        if self.total_tasks == 0 {
            return 0.0;
        }
        f64::from(self.completed_tasks) / f64::from(self.total_tasks) * 100.0
    }

    pub fn summary(&self) -> CampaignSummary {
        CampaignSummary {
            id: self.id,
            name: self.request.name.clone(),
            status: self.status,
            priority: self.priority,
            progress: self.progress_percentage(),
            created_at: self.created_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CampaignRequest {
        CampaignRequest {
            name: "Launch research".into(),
            description: None,
            topic: "ai agents".into(),
            seed_keywords: vec!["ai agent".into()],
            competitor_urls: vec![],
            region: default_region(),
            language: default_language(),
            priority: CampaignPriority::Medium,
            persona_focus: None,
        }
    }

    #[test]
    fn progress_is_halfway_at_two_of_four() {
        let mut c = Campaign::new(request(), 4);
        c.start();
        c.complete_task();
        c.complete_task();
        assert_eq!(c.progress_percentage(), 50.0);
        assert_eq!(c.status, CampaignStatus::Running);
    }

    #[test]
    fn progress_is_zero_without_tasks() {
        let c = Campaign::new(request(), 0);
        assert_eq!(c.progress_percentage(), 0.0);
    }

    #[test]
    fn completing_every_task_finishes_the_campaign() {
        let mut c = Campaign::new(request(), 4);
        c.start();
        for _ in 0..4 {
            c.complete_task();
        }
        assert_eq!(c.status, CampaignStatus::Completed);
        assert!(c.completed_at.is_some());
        assert_eq!(c.progress_percentage(), 100.0);
    }

    #[test]
    fn new_campaign_starts_pending_with_defaults() {
        let request = CampaignRequest {
            name: "Agent research".into(),
            description: None,
            topic: "ai agents".into(),
            seed_keywords: vec!["ai agent".into(), "generative ai".into()],
            competitor_urls: vec![],
            region: "US".into(),
            language: "en".into(),
            priority: CampaignPriority::default(),
            persona_focus: None,
        };
        let c = Campaign::new(request, 4);
        assert_eq!(c.status, CampaignStatus::Pending);
        assert_eq!(c.priority, CampaignPriority::Medium);
        assert_eq!(c.total_tasks, 4);
        assert_eq!(c.completed_tasks, 0);
        assert!(c.started_at.is_none());
    }

    #[test]
    fn finish_completes_or_fails_based_on_error() {
        let mut c = Campaign::new(request(), 5);
        c.start();
        c.complete_task();
        c.fail_task();
        assert_eq!(c.status, CampaignStatus::Running);
        c.finish(None);
        assert_eq!(c.status, CampaignStatus::Completed);
        assert!(c.completed_at.is_some());

        let mut c = Campaign::new(request(), 5);
        c.start();
        c.finish(Some("no report produced".into()));
        assert_eq!(c.status, CampaignStatus::Failed);
        assert_eq!(c.error_message.as_deref(), Some("no report produced"));

        // Terminal states stay put.
        c.finish(None);
        assert_eq!(c.status, CampaignStatus::Failed);
    }

    #[test]
    fn majority_failures_fail_the_campaign() {
        let mut c = Campaign::new(request(), 4);
        c.start();
        c.fail_task();
        c.fail_task();
        // 2 of 4 is not a majority yet
        assert_eq!(c.status, CampaignStatus::Running);
        c.fail_task();
        assert_eq!(c.status, CampaignStatus::Failed);
        assert!(c.completed_at.is_some());
    }

    #[test]
    fn start_is_idempotent_on_the_timestamp() {
        let mut c = Campaign::new(request(), 2);
        c.start();
        let first = c.started_at;
        c.start();
        assert_eq!(c.started_at, first);
        assert_eq!(c.status, CampaignStatus::Running);
    }

    #[test]
    fn terminal_states_are_sticky() {
        let mut c = Campaign::new(request(), 2);
        c.start();
        c.cancel("operator request");
        assert_eq!(c.status, CampaignStatus::Cancelled);
        c.start();
        c.complete_task();
        c.complete_task();
        c.fail_task();
        c.fail_task();
        assert_eq!(c.status, CampaignStatus::Cancelled);
        assert_eq!(c.error_message.as_deref(), Some("operator request"));
    }

    #[test]
    fn over_reporting_exceeds_one_hundred_percent() {
        let mut c = Campaign::new(request(), 1);
        c.start();
        c.complete_task();
        c.complete_task();
        assert!(c.progress_percentage() > 100.0);
        assert_eq!(c.status, CampaignStatus::Completed);
    }

    #[test]
    fn summary_projects_the_essentials() {
        let mut c = Campaign::new(request(), 4);
        c.start();
        c.complete_task();
        let s = c.summary();
        assert_eq!(s.id, c.id);
        assert_eq!(s.name, "Launch research");
        assert_eq!(s.progress, 25.0);
    }

    #[test]
    fn serde_round_trip() {
        let c = Campaign::new(request(), 5);
        let json = serde_json::to_string(&c).unwrap();
        let back: Campaign = serde_json::from_str(&json).unwrap();
        assert_eq!(back.id, c.id);
        assert_eq!(back.status, CampaignStatus::Pending);
        assert_eq!(back.total_tasks, 5);
    }
}
