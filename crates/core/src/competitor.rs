//! Competitor research results: profiles, SWOT items, and content inventory.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompetitorTier {
    Leader,
    Challenger,
    Niche,
    Emerging,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    BlogPost,
    Video,
    Podcast,
    Infographic,
    Whitepaper,
    CaseStudy,
    SocialPost,
    Newsletter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwotCategory {
    Strength,
    Weakness,
    Opportunity,
    Threat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SocialMetrics {
    pub platform: String,
    pub followers: u64,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
    #[serde(default)]
    pub posts_per_week: Option<f64>,
}

/// A published piece in a competitor's content inventory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPiece {
    pub title: String,
    pub url: String,
    pub content_type: ContentType,
    #[serde(default)]
    pub published_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub engagement_score: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwotItem {
    pub category: SwotCategory,
    pub description: String,
    /// Business impact, 1 (negligible) to 10 (decisive).
    pub impact: u8,
}

/// One competitor as researched for a campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorProfile {
    pub name: String,
    pub website: String,
    #[serde(default)]
    pub tier: Option<CompetitorTier>,
    #[serde(default)]
    pub estimated_monthly_traffic: Option<u64>,
    #[serde(default)]
    pub domain_authority: Option<u8>,
    #[serde(default)]
    pub swot: Vec<SwotItem>,
    #[serde(default)]
    pub content_inventory: Vec<ContentPiece>,
    #[serde(default)]
    pub social_metrics: Vec<SocialMetrics>,
}

impl CompetitorProfile {
    pub fn swot_by_category(&self, category: SwotCategory) -> Vec<&SwotItem> {
        self.swot.iter().filter(|i| i.category == category).collect()
    }

    pub fn strengths(&self) -> Vec<&SwotItem> {
        self.swot_by_category(SwotCategory::Strength)
    }

    pub fn weaknesses(&self) -> Vec<&SwotItem> {
        self.swot_by_category(SwotCategory::Weakness)
    }

    pub fn opportunities(&self) -> Vec<&SwotItem> {
        self.swot_by_category(SwotCategory::Opportunity)
    }

    pub fn threats(&self) -> Vec<&SwotItem> {
        self.swot_by_category(SwotCategory::Threat)
    }

    pub fn top_content_by_engagement(&self, n: usize) -> Vec<&ContentPiece> {
        let mut sorted: Vec<_> = self.content_inventory.iter().collect();
        sorted.sort_by(|a, b| {
            b.engagement_score
                .unwrap_or(0.0)
                .partial_cmp(&a.engagement_score.unwrap_or(0.0))
                .unwrap_or(std::cmp::Ordering::Equal)
        });
        sorted.truncate(n);
        sorted
    }

    pub fn social_metrics_for(&self, platform: &str) -> Option<&SocialMetrics> {
        self.social_metrics
            .iter()
            .find(|m| m.platform.eq_ignore_ascii_case(platform))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorSummaryStats {
    pub total_competitors: usize,
    pub total_content_pieces: usize,
    pub total_swot_items: usize,
    pub avg_monthly_traffic: f64,
}

/// The competitor analyst's full output for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompetitorAnalysisResult {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub analyzed_urls: Vec<String>,
    #[serde(default)]
    pub profiles: Vec<CompetitorProfile>,
    pub created_at: DateTime<Utc>,
}

impl CompetitorAnalysisResult {
    pub fn new(campaign_id: Uuid, analyzed_urls: Vec<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            analyzed_urls,
            profiles: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn profile_by_name(&self, name: &str) -> Option<&CompetitorProfile> {
        self.profiles
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    pub fn by_tier(&self, tier: CompetitorTier) -> Vec<&CompetitorProfile> {
        self.profiles
            .iter()
            .filter(|p| p.tier == Some(tier))
            .collect()
    }

    /// Competitors with a known traffic estimate, highest first. Profiles
    /// without one stay in the collection but never rank.
    pub fn top_by_traffic(&self, n: usize) -> Vec<&CompetitorProfile> {
        let mut sorted: Vec<_> = self
            .profiles
            .iter()
            .filter(|p| p.estimated_monthly_traffic.is_some())
            .collect();
        sorted.sort_by(|a, b| b.estimated_monthly_traffic.cmp(&a.estimated_monthly_traffic));
        sorted.truncate(n);
        sorted
    }

    pub fn summary_stats(&self) -> CompetitorSummaryStats {
        let total_competitors = self.profiles.len();
        let with_traffic: Vec<u64> = self
            .profiles
            .iter()
            .filter_map(|p| p.estimated_monthly_traffic)
            .collect();
        let avg_monthly_traffic = if with_traffic.is_empty() {
            0.0
        } else {
            with_traffic.iter().sum::<u64>() as f64 / with_traffic.len() as f64
        };
        CompetitorSummaryStats {
            total_competitors,
            total_content_pieces: self.profiles.iter().map(|p| p.content_inventory.len()).sum(),
            total_swot_items: self.profiles.iter().map(|p| p.swot.len()).sum(),
            avg_monthly_traffic,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn profile(name: &str, traffic: Option<u64>) -> CompetitorProfile {
        CompetitorProfile {
            name: name.into(),
            website: format!("https://{}.example.com", name.to_lowercase()),
            tier: Some(CompetitorTier::Challenger),
            estimated_monthly_traffic: traffic,
            domain_authority: Some(40),
            swot: vec![
                SwotItem {
                    category: SwotCategory::Strength,
                    description: "Strong brand".into(),
                    impact: 8,
                },
                SwotItem {
                    category: SwotCategory::Weakness,
                    description: "Thin long-form content".into(),
                    impact: 5,
                },
            ],
            content_inventory: Vec::new(),
            social_metrics: Vec::new(),
        }
    }

    #[test]
    fn swot_filters_split_by_category() {
        let p = profile("Acme", Some(1000));
        assert_eq!(p.strengths().len(), 1);
        assert_eq!(p.weaknesses().len(), 1);
        assert!(p.opportunities().is_empty());
        assert!(p.threats().is_empty());
    }

    #[test]
    fn top_content_sorts_by_engagement() {
        let mut p = profile("Acme", None);
        p.content_inventory.push(ContentPiece {
            title: "quiet".into(),
            url: "https://a.example.com/1".into(),
            content_type: ContentType::BlogPost,
            published_at: None,
            engagement_score: Some(0.1),
        });
        p.content_inventory.push(ContentPiece {
            title: "viral".into(),
            url: "https://a.example.com/2".into(),
            content_type: ContentType::Video,
            published_at: None,
            engagement_score: Some(0.9),
        });
        assert_eq!(p.top_content_by_engagement(1)[0].title, "viral");
    }

    #[test]
    fn result_lookups_and_stats() {
        let mut result = CompetitorAnalysisResult::new(Uuid::new_v4(), vec![]);
        result.profiles.push(profile("Acme", Some(50_000)));
        result.profiles.push(profile("Globex", Some(150_000)));
        assert!(result.profile_by_name("acme").is_some());
        assert_eq!(result.top_by_traffic(1)[0].name, "Globex");
        assert_eq!(result.by_tier(CompetitorTier::Challenger).len(), 2);
        let stats = result.summary_stats();
        assert_eq!(stats.total_competitors, 2);
        assert_eq!(stats.total_swot_items, 4);
        assert!((stats.avg_monthly_traffic - 100_000.0).abs() < f64::EPSILON);
    }

    #[test]
    fn top_by_traffic_excludes_unknown_estimates() {
        let mut result = CompetitorAnalysisResult::new(Uuid::new_v4(), vec![]);
        result.profiles.push(profile("Unknown Co", None));
        result.profiles.push(profile("Acme", Some(50_000)));
        let top = result.top_by_traffic(10);
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "Acme");
        assert_eq!(result.profiles.len(), 2);
    }
}
