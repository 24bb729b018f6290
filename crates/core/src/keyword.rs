//! Keyword research results: per-keyword metrics, clusters, and the
//! opportunity scoring used to rank candidates.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordDifficulty {
    VeryEasy,
    Easy,
    Medium,
    Hard,
    VeryHard,
}

impl KeywordDifficulty {
    /// Numeric weight used in opportunity scoring.
    pub fn score(self) -> f64 {
        match self {
            KeywordDifficulty::VeryEasy => 0.2,
            KeywordDifficulty::Easy => 0.4,
            KeywordDifficulty::Medium => 0.6,
            KeywordDifficulty::Hard => 0.8,
            KeywordDifficulty::VeryHard => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeywordIntent {
    Informational,
    Navigational,
    Transactional,
    Commercial,
}

/// One point of historical interest for a keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordTrendPoint {
    pub date: DateTime<Utc>,
    pub interest: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RelatedKeyword {
    pub keyword: String,
    #[serde(default)]
    pub relevance: Option<f64>,
    #[serde(default)]
    pub search_volume: Option<u64>,
}

/// Everything the keyword researcher knows about one keyword.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordMetrics {
    pub keyword: String,
    #[serde(default)]
    pub search_volume: Option<u64>,
    /// Paid competition, 0.0 (none) to 1.0 (saturated).
    #[serde(default)]
    pub competition: Option<f64>,
    #[serde(default)]
    pub cost_per_click: Option<f64>,
    #[serde(default)]
    pub difficulty: Option<KeywordDifficulty>,
    #[serde(default)]
    pub intent: Option<KeywordIntent>,
    #[serde(default)]
    pub trend_points: Vec<KeywordTrendPoint>,
    #[serde(default)]
    pub related_keywords: Vec<RelatedKeyword>,
}

impl KeywordMetrics {
    pub fn new(keyword: impl Into<String>) -> Self {
        Self {
            keyword: keyword.into(),
            search_volume: None,
            competition: None,
            cost_per_click: None,
            difficulty: None,
            intent: None,
            trend_points: Vec::new(),
            related_keywords: Vec::new(),
        }
    }

    /// Numeric difficulty, `None` until a difficulty tier is assigned.
    pub fn difficulty_score(&self) -> Option<f64> {
        self.difficulty.map(KeywordDifficulty::score)
    }

    /// Composite opportunity score in `[0, 1]`.
    ///
    /// Weighted blend of volume (log-scaled, capped at 1M), inverted
    /// competition, and inverted difficulty. A keyword with no known
    /// search volume scores 0.0 outright.
    pub fn opportunity_score(&self) -> f64 {
        let Some(volume) = self.search_volume else {
            return 0.0;
        };
        let volume_factor = (((volume + 1) as f64).log10() / 6.0).min(1.0);
        let competition_factor = 1.0 - self.competition.unwrap_or(0.0);
        let difficulty_factor = 1.0 - self.difficulty_score().unwrap_or(0.0);
        0.4 * volume_factor + 0.3 * competition_factor + 0.3 * difficulty_factor
    }
}

/// A group of semantically related keywords anchored on one main term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordCluster {
    pub name: String,
    pub main_keyword: String,
    pub keywords: Vec<String>,
    #[serde(default)]
    pub total_volume: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordSummaryStats {
    pub total_keywords: usize,
    pub total_clusters: usize,
    pub total_search_volume: u64,
    pub avg_opportunity_score: f64,
}

/// The keyword researcher's full output for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordAnalysisResult {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub seed_keywords: Vec<String>,
    pub region: String,
    pub language: String,
    #[serde(default)]
    pub keyword_metrics: Vec<KeywordMetrics>,
    #[serde(default)]
    pub clusters: Vec<KeywordCluster>,
    pub created_at: DateTime<Utc>,
}

impl KeywordAnalysisResult {
    pub fn new(
        campaign_id: Uuid,
        seed_keywords: Vec<String>,
        region: impl Into<String>,
        language: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            seed_keywords,
            region: region.into(),
            language: language.into(),
            keyword_metrics: Vec::new(),
            clusters: Vec::new(),
            created_at: Utc::now(),
        }
    }

    /// First metrics entry matching the keyword, case-insensitively.
    pub fn metrics_for(&self, keyword: &str) -> Option<&KeywordMetrics> {
        self.keyword_metrics
            .iter()
            .find(|m| m.keyword.eq_ignore_ascii_case(keyword))
    }

    /// Keywords with a known search volume, highest first. Entries with
    /// no volume stay in the collection but never rank.
    pub fn top_by_volume(&self, n: usize) -> Vec<&KeywordMetrics> {
        let mut sorted: Vec<_> = self
            .keyword_metrics
            .iter()
            .filter(|m| m.search_volume.is_some())
            .collect();
        sorted.sort_by(|a, b| b.search_volume.cmp(&a.search_volume));
        sorted.truncate(n);
        sorted
    }

    pub fn top_by_opportunity(&self, n: usize) -> Vec<&KeywordMetrics> {
        let mut sorted: Vec<_> = self.keyword_metrics.iter().collect();
        sorted.sort_by(|a, b| {
            b.opportunity_score()
                .partial_cmp(&a.opportunity_score())
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }

    pub fn by_intent(&self, intent: KeywordIntent) -> Vec<&KeywordMetrics> {
        self.keyword_metrics
            .iter()
            .filter(|m| m.intent == Some(intent))
            .collect()
    }

    pub fn by_difficulty(&self, difficulty: KeywordDifficulty) -> Vec<&KeywordMetrics> {
        self.keyword_metrics
            .iter()
            .filter(|m| m.difficulty == Some(difficulty))
            .collect()
    }

    pub fn summary_stats(&self) -> KeywordSummaryStats {
        let total_keywords = self.keyword_metrics.len();
        let total_search_volume = self
            .keyword_metrics
            .iter()
            .filter_map(|m| m.search_volume)
            .sum();
        let avg_opportunity_score = if total_keywords == 0 {
            0.0
        } else {
            self.keyword_metrics
                .iter()
                .map(KeywordMetrics::opportunity_score)
                .sum::<f64>()
                / total_keywords as f64
        };
        KeywordSummaryStats {
            total_keywords,
            total_clusters: self.clusters.len(),
            total_search_volume,
            avg_opportunity_score,
        }
    }
}
