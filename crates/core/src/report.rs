//! The aggregated final report: recommendations, calendar, and the
//! section-level validation that drives its quality score.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportFormat {
    Markdown,
    Pdf,
    Docx,
    Html,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStatus {
    Draft,
    InReview,
    Validated,
    Published,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportSection {
    ExecutiveSummary,
    KeywordAnalysis,
    AudienceInsights,
    CompetitorLandscape,
    TrendAnalysis,
    ContentStrategy,
    ContentCalendar,
}

impl ReportSection {
    pub const ALL: [ReportSection; 7] = [
        ReportSection::ExecutiveSummary,
        ReportSection::KeywordAnalysis,
        ReportSection::AudienceInsights,
        ReportSection::CompetitorLandscape,
        ReportSection::TrendAnalysis,
        ReportSection::ContentStrategy,
        ReportSection::ContentCalendar,
    ];

    /// Heading the aggregator uses for this section in the Markdown report.
    pub fn heading(self) -> &'static str {
        match self {
            ReportSection::ExecutiveSummary => "Executive Summary",
            ReportSection::KeywordAnalysis => "Keyword Analysis",
            ReportSection::AudienceInsights => "Audience Insights",
            ReportSection::CompetitorLandscape => "Competitor Landscape",
            ReportSection::TrendAnalysis => "Trend Analysis",
            ReportSection::ContentStrategy => "Content Strategy",
            ReportSection::ContentCalendar => "Content Calendar",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    Low,
    Medium,
    High,
    Critical,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecommendation {
    pub title: String,
    pub content_type: String,
    pub rationale: String,
    pub priority: RecommendationPriority,
    #[serde(default)]
    pub target_keywords: Vec<String>,
    #[serde(default)]
    pub target_persona: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StrategicInsight {
    pub insight: String,
    pub supporting_evidence: String,
    /// Analyst confidence, 0.0 to 1.0.
    pub confidence: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentCalendarEntry {
    pub title: String,
    pub content_type: String,
    pub planned_date: DateTime<Utc>,
    #[serde(default)]
    pub target_keywords: Vec<String>,
}

/// Outcome of validating one report section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionValidation {
    pub section: ReportSection,
    pub is_valid: bool,
    /// Section quality, 0.0 to 1.0.
    pub quality_score: f64,
    #[serde(default)]
    pub issues: Vec<String>,
    #[serde(default)]
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub generated_by: String,
    pub format: ReportFormat,
    #[serde(default)]
    pub output_path: Option<String>,
    #[serde(default)]
    pub word_count: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportSummaryStats {
    pub total_recommendations: usize,
    pub high_priority_recommendations: usize,
    pub total_insights: usize,
    pub calendar_entries: usize,
    pub quality_score: f64,
}

/// The deliverable that ties a campaign's four analyses together.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalReport {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub title: String,
    pub status: ReportStatus,
    #[serde(default)]
    pub keyword_result_id: Option<Uuid>,
    #[serde(default)]
    pub audience_result_id: Option<Uuid>,
    #[serde(default)]
    pub competitor_result_id: Option<Uuid>,
    #[serde(default)]
    pub trend_result_id: Option<Uuid>,
    pub executive_summary: String,
    #[serde(default)]
    pub recommendations: Vec<ContentRecommendation>,
    #[serde(default)]
    pub insights: Vec<StrategicInsight>,
    #[serde(default)]
    pub calendar: Vec<ContentCalendarEntry>,
    #[serde(default)]
    pub validations: Vec<SectionValidation>,
    #[serde(default)]
    pub metadata: Option<ReportMetadata>,
    pub created_at: DateTime<Utc>,
}

impl FinalReport {
    pub fn new(campaign_id: Uuid, title: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            title: title.into(),
            status: ReportStatus::Draft,
            keyword_result_id: None,
            audience_result_id: None,
            competitor_result_id: None,
            trend_result_id: None,
            executive_summary: String::new(),
            recommendations: Vec::new(),
            insights: Vec::new(),
            calendar: Vec::new(),
            validations: Vec::new(),
            metadata: None,
            created_at: Utc::now(),
        }
    }

    pub fn update_status(&mut self, status: ReportStatus) {
        self.status = status;
    }

    /// Blend of section pass rate (weight 0.6) and mean section quality
    /// (weight 0.4). Zero when nothing has been validated yet.
    pub fn overall_quality_score(&self) -> f64 {
        if self.validations.is_empty() {
            return 0.0;
        }
        let total = self.validations.len() as f64;
        let passed = self.validations.iter().filter(|v| v.is_valid).count() as f64;
        let avg_quality =
            self.validations.iter().map(|v| v.quality_score).sum::<f64>() / total;
        0.6 * (passed / total) + 0.4 * avg_quality
    }

    pub fn is_high_quality(&self) -> bool {
        self.overall_quality_score() >= 0.8
    }

    pub fn high_priority_recommendations(&self) -> Vec<&ContentRecommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.priority >= RecommendationPriority::High)
            .collect()
    }

    pub fn recommendations_by_type(&self, content_type: &str) -> Vec<&ContentRecommendation> {
        self.recommendations
            .iter()
            .filter(|r| r.content_type.eq_ignore_ascii_case(content_type))
            .collect()
    }

    pub fn calendar_for_month(&self, year: i32, month: u32) -> Vec<&ContentCalendarEntry> {
        use chrono::Datelike;
        self.calendar
            .iter()
            .filter(|e| e.planned_date.year() == year && e.planned_date.month() == month)
            .collect()
    }

    pub fn summary_stats(&self) -> ReportSummaryStats {
        ReportSummaryStats {
            total_recommendations: self.recommendations.len(),
            high_priority_recommendations: self.high_priority_recommendations().len(),
            total_insights: self.insights.len(),
            calendar_entries: self.calendar.len(),
            quality_score: self.overall_quality_score(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn validation(section: ReportSection, is_valid: bool, quality: f64) -> SectionValidation {
        SectionValidation {
            section,
            is_valid,
            quality_score: quality,
            issues: Vec::new(),
            recommendations: Vec::new(),
        }
    }

    #[test]
    fn quality_score_blends_pass_rate_and_quality() {
        let mut report = FinalReport::new(Uuid::new_v4(), "Q1 research");
        report
            .validations
            .push(validation(ReportSection::ExecutiveSummary, true, 0.9));
        report
            .validations
            .push(validation(ReportSection::KeywordAnalysis, false, 0.3));
        // pass rate 0.5, avg quality 0.6 → 0.6*0.5 + 0.4*0.6 = 0.54
        assert!((report.overall_quality_score() - 0.54).abs() < 1e-9);
        assert!(!report.is_high_quality());
    }

    #[test]
    fn quality_score_is_zero_before_validation() {
        let report = FinalReport::new(Uuid::new_v4(), "empty");
        assert_eq!(report.overall_quality_score(), 0.0);
    }

    #[test]
    fn all_sections_passing_cleanly_is_high_quality() {
        let mut report = FinalReport::new(Uuid::new_v4(), "strong");
        for section in ReportSection::ALL {
            report.validations.push(validation(section, true, 0.85));
        }
        assert!(report.is_high_quality());
    }

    #[test]
    fn high_priority_includes_critical() {
        let mut report = FinalReport::new(Uuid::new_v4(), "recs");
        for priority in [
            RecommendationPriority::Low,
            RecommendationPriority::High,
            RecommendationPriority::Critical,
        ] {
            report.recommendations.push(ContentRecommendation {
                title: "t".into(),
                content_type: "blog_post".into(),
                rationale: "r".into(),
                priority,
                target_keywords: Vec::new(),
                target_persona: None,
            });
        }
        assert_eq!(report.high_priority_recommendations().len(), 2);
    }

    #[test]
    fn calendar_filters_by_month() {
        let mut report = FinalReport::new(Uuid::new_v4(), "calendar");
        for (month, day) in [(1, 15), (1, 30), (2, 5)] {
            report.calendar.push(ContentCalendarEntry {
                title: format!("post {month}-{day}"),
                content_type: "blog_post".into(),
                planned_date: Utc.with_ymd_and_hms(2026, month, day, 9, 0, 0).unwrap(),
                target_keywords: Vec::new(),
            });
        }
        assert_eq!(report.calendar_for_month(2026, 1).len(), 2);
        assert_eq!(report.calendar_for_month(2026, 3).len(), 0);
    }
}
