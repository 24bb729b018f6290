//! Trend research results: time-series trends, seasonality, and the
//! content opportunities they suggest.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendDirection {
    Rising,
    Stable,
    Declining,
    Volatile,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendTimeframe {
    Week,
    Month,
    Quarter,
    Year,
    FiveYears,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendSource {
    SearchData,
    SocialMedia,
    News,
    Industry,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrendCategory {
    Technology,
    Consumer,
    Industry,
    Seasonal,
    Cultural,
}

/// One observation in a trend's time series.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendDataPoint {
    pub date: DateTime<Utc>,
    pub value: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedTopic {
    pub topic: String,
    #[serde(default)]
    pub relevance: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendInsight {
    pub text: String,
    /// How confident the analyst is in this insight, 0.0 to 1.0.
    pub confidence: f64,
}

/// A tracked trend for one keyword or topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trend {
    pub keyword: String,
    pub category: TrendCategory,
    pub direction: TrendDirection,
    pub timeframe: TrendTimeframe,
    pub source: TrendSource,
    #[serde(default)]
    pub data_points: Vec<TrendDataPoint>,
    #[serde(default)]
    pub growth_rate: Option<f64>,
    #[serde(default)]
    pub related_topics: Vec<RelatedTopic>,
    #[serde(default)]
    pub insights: Vec<TrendInsight>,
}

impl Trend {
    /// Recent momentum: the mean relative change between consecutive
    /// observations over the last five data points, clamped to [-1, 1].
    /// Zero when fewer than two points exist.
    pub fn momentum_score(&self) -> f64 {
        let start = self.data_points.len().saturating_sub(5);
        let recent = &self.data_points[start..];
        if recent.len() < 2 {
            return 0.0;
        }
        let mut total = 0.0;
        let mut count = 0u32;
        for pair in recent.windows(2) {
            let prev = pair[0].value;
            if prev.abs() > f64::EPSILON {
                total += (pair[1].value - prev) / prev;
                count += 1;
            }
        }
        if count == 0 {
            return 0.0;
        }
        (total / f64::from(count)).clamp(-1.0, 1.0)
    }

    pub fn is_rising(&self) -> bool {
        self.direction == TrendDirection::Rising
    }
}

/// A recurring pattern worth planning the calendar around.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SeasonalPattern {
    pub name: String,
    pub peak_months: Vec<u32>,
    #[serde(default)]
    pub description: Option<String>,
}

/// A concrete content idea derived from the trends.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentOpportunity {
    pub title: String,
    pub rationale: String,
    /// How promising the opportunity looks, 0.0 to 1.0.
    pub opportunity_score: f64,
    #[serde(default)]
    pub target_keywords: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendSummaryStats {
    pub total_trends: usize,
    pub rising_trends: usize,
    pub total_opportunities: usize,
    pub avg_opportunity_score: f64,
}

/// The trend analyst's full output for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendAnalysisResult {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub topic: String,
    #[serde(default)]
    pub trends: Vec<Trend>,
    #[serde(default)]
    pub seasonal_patterns: Vec<SeasonalPattern>,
    #[serde(default)]
    pub opportunities: Vec<ContentOpportunity>,
    pub created_at: DateTime<Utc>,
}

impl TrendAnalysisResult {
    pub fn new(campaign_id: Uuid, topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            topic: topic.into(),
            trends: Vec::new(),
            seasonal_patterns: Vec::new(),
            opportunities: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn trend_for_keyword(&self, keyword: &str) -> Option<&Trend> {
        self.trends
            .iter()
            .find(|t| t.keyword.eq_ignore_ascii_case(keyword))
    }

    pub fn by_category(&self, category: TrendCategory) -> Vec<&Trend> {
        self.trends.iter().filter(|t| t.category == category).collect()
    }

    pub fn by_direction(&self, direction: TrendDirection) -> Vec<&Trend> {
        self.trends.iter().filter(|t| t.direction == direction).collect()
    }

    pub fn high_opportunity_content(&self, min_score: f64) -> Vec<&ContentOpportunity> {
        self.opportunities
            .iter()
            .filter(|o| o.opportunity_score >= min_score)
            .collect()
    }

    /// Keywords of rising trends whose momentum clears the threshold.
    pub fn trending_keywords(&self, min_momentum: f64) -> Vec<&str> {
        self.trends
            .iter()
            .filter(|t| t.is_rising() && t.momentum_score() >= min_momentum)
            .map(|t| t.keyword.as_str())
            .collect()
    }

    pub fn summary_stats(&self) -> TrendSummaryStats {
        let total_opportunities = self.opportunities.len();
        let avg_opportunity_score = if total_opportunities == 0 {
            0.0
        } else {
            self.opportunities
                .iter()
                .map(|o| o.opportunity_score)
                .sum::<f64>()
                / total_opportunities as f64
        };
        TrendSummaryStats {
            total_trends: self.trends.len(),
            rising_trends: self.by_direction(TrendDirection::Rising).len(),
            total_opportunities,
            avg_opportunity_score,
        }
    }
}
