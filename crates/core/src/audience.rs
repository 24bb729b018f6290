//! Audience research results: demographics, buyer personas, and segments.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AgeGroup {
    #[serde(rename = "18-24")]
    From18To24,
    #[serde(rename = "25-34")]
    From25To34,
    #[serde(rename = "35-44")]
    From35To44,
    #[serde(rename = "45-54")]
    From45To54,
    #[serde(rename = "55-64")]
    From55To64,
    #[serde(rename = "65+")]
    Over65,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    NonBinary,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IncomeLevel {
    Low,
    Middle,
    UpperMiddle,
    High,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    HighSchool,
    SomeCollege,
    Bachelors,
    Masters,
    Doctorate,
}

/// Share-of-audience distributions. Shares are fractions, not percents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Demographics {
    #[serde(default)]
    pub age_distribution: HashMap<AgeGroup, f64>,
    #[serde(default)]
    pub gender_distribution: HashMap<Gender, f64>,
    #[serde(default)]
    pub income_level: Option<IncomeLevel>,
    #[serde(default)]
    pub education_level: Option<EducationLevel>,
    #[serde(default)]
    pub top_locations: Vec<String>,
}

impl Demographics {
    /// Age bracket with the largest share, if any distribution is known.
    pub fn dominant_age_group(&self) -> Option<AgeGroup> {
        self.age_distribution
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(group, _)| *group)
    }

    pub fn dominant_gender(&self) -> Option<Gender> {
        self.gender_distribution
            .iter()
            .max_by(|a, b| a.1.partial_cmp(b.1).unwrap_or(std::cmp::Ordering::Equal))
            .map(|(gender, _)| *gender)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Interest {
    pub name: String,
    /// Strength of the interest, 0.0 to 1.0.
    pub affinity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PainPoint {
    pub description: String,
    /// 1 (minor annoyance) to 10 (blocking problem).
    pub severity: u8,
    #[serde(default)]
    pub frequency: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPreference {
    pub format: String,
    pub platform: String,
    /// Preference weight relative to the persona's other preferences.
    pub weight: f64,
}

/// A named, researched persona.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BuyerPersona {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub demographics: Demographics,
    #[serde(default)]
    pub interests: Vec<Interest>,
    #[serde(default)]
    pub pain_points: Vec<PainPoint>,
    #[serde(default)]
    pub content_preferences: Vec<ContentPreference>,
    #[serde(default)]
    pub goals: Vec<String>,
    /// How confident the researcher is in this persona, 0.0 to 1.0.
    pub confidence: f64,
}

/// A slice of the market a persona belongs to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudienceSegment {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Estimated segment size in people.
    pub size_estimate: u64,
    #[serde(default)]
    pub persona_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudienceSummaryStats {
    pub total_personas: usize,
    pub total_segments: usize,
    pub total_audience_size: u64,
    pub avg_persona_confidence: f64,
}

/// The audience researcher's full output for one campaign.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AudienceAnalysisResult {
    pub id: Uuid,
    pub campaign_id: Uuid,
    pub topic: String,
    #[serde(default)]
    pub personas: Vec<BuyerPersona>,
    #[serde(default)]
    pub segments: Vec<AudienceSegment>,
    pub created_at: DateTime<Utc>,
}

impl AudienceAnalysisResult {
    pub fn new(campaign_id: Uuid, topic: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            campaign_id,
            topic: topic.into(),
            personas: Vec::new(),
            segments: Vec::new(),
            created_at: Utc::now(),
        }
    }

    pub fn persona_by_name(&self, name: &str) -> Option<&BuyerPersona> {
        self.personas
            .iter()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }

    /// The persona the researcher trusts most.
    pub fn primary_persona(&self) -> Option<&BuyerPersona> {
        self.personas.iter().max_by(|a, b| {
            a.confidence
                .partial_cmp(&b.confidence)
                .unwrap_or(std::cmp::Ordering::Equal)
        })
    }

    pub fn largest_segment(&self) -> Option<&AudienceSegment> {
        self.segments.iter().max_by_key(|s| s.size_estimate)
    }

    pub fn summary_stats(&self) -> AudienceSummaryStats {
        let total_personas = self.personas.len();
        let avg_persona_confidence = if total_personas == 0 {
            0.0
        } else {
            self.personas.iter().map(|p| p.confidence).sum::<f64>() / total_personas as f64
        };
        AudienceSummaryStats {
            total_personas,
            total_segments: self.segments.len(),
            total_audience_size: self.segments.iter().map(|s| s.size_estimate).sum(),
            avg_persona_confidence,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn persona(name: &str, confidence: f64) -> BuyerPersona {
        BuyerPersona {
            name: name.into(),
            description: None,
            demographics: Demographics::default(),
            interests: Vec::new(),
            pain_points: Vec::new(),
            content_preferences: Vec::new(),
            goals: Vec::new(),
            confidence,
        }
    }

    #[test]
    fn dominant_age_group_is_the_largest_share() {
        let mut demo = Demographics::default();
        demo.age_distribution.insert(AgeGroup::From18To24, 0.2);
        demo.age_distribution.insert(AgeGroup::From25To34, 0.5);
        demo.age_distribution.insert(AgeGroup::From35To44, 0.3);
        assert_eq!(demo.dominant_age_group(), Some(AgeGroup::From25To34));
    }

    #[test]
    fn dominant_lookups_are_none_when_empty() {
        let demo = Demographics::default();
        assert_eq!(demo.dominant_age_group(), None);
        assert_eq!(demo.dominant_gender(), None);
    }

    #[test]
    fn primary_persona_has_the_highest_confidence() {
        let mut result = AudienceAnalysisResult::new(Uuid::new_v4(), "ai agents");
        result.personas.push(persona("Hobbyist Hana", 0.6));
        result.personas.push(persona("Engineer Emil", 0.9));
        assert_eq!(result.primary_persona().unwrap().name, "Engineer Emil");
        assert!(result.persona_by_name("hobbyist hana").is_some());
    }

    #[test]
    fn largest_segment_and_stats() {
        let mut result = AudienceAnalysisResult::new(Uuid::new_v4(), "ai agents");
        result.personas.push(persona("A", 0.5));
        result.personas.push(persona("B", 0.7));
        result.segments.push(AudienceSegment {
            name: "Startups".into(),
            description: None,
            size_estimate: 20_000,
            persona_names: vec!["A".into()],
        });
        result.segments.push(AudienceSegment {
            name: "Enterprise".into(),
            description: None,
            size_estimate: 80_000,
            persona_names: vec!["B".into()],
        });
        assert_eq!(result.largest_segment().unwrap().name, "Enterprise");
        let stats = result.summary_stats();
        assert_eq!(stats.total_audience_size, 100_000);
        assert!((stats.avg_persona_confidence - 0.6).abs() < 1e-9);
    }

    #[test]
    fn age_groups_serialize_with_range_labels() {
        let json = serde_json::to_string(&AgeGroup::Over65).unwrap();
        assert_eq!(json, "\"65+\"");
    }
}
