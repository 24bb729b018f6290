//! Request and data-quality validation.
//!
//! Validators accumulate problems in a [`ValidationOutcome`] instead of
//! failing fast, so callers can report everything wrong with a request
//! at once. Errors invalidate the outcome; warnings do not.

use crate::campaign::CampaignRequest;
use crate::constants::{self, limits};
use serde::{Deserialize, Serialize};
use url::Url;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ValidationOutcome {
    pub is_valid: bool,
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationOutcome {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, message: impl Into<String>) {
        self.is_valid = false;
        self.errors.push(message.into());
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }

    /// Fold another outcome in: validity ANDs, both lists append.
    pub fn merge(&mut self, other: ValidationOutcome) {
        self.is_valid = self.is_valid && other.is_valid;
        self.errors.extend(other.errors);
        self.warnings.extend(other.warnings);
    }
}

/// Tunable limits, defaulting to the shared constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationRules {
    pub min_keywords: usize,
    pub max_keywords: usize,
    pub max_keyword_length: usize,
    pub max_competitors: usize,
    pub max_name_length: usize,
    pub max_description_length: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_keywords: limits::MIN_KEYWORDS,
            max_keywords: limits::MAX_KEYWORDS,
            max_keyword_length: limits::MAX_KEYWORD_LENGTH,
            max_competitors: limits::MAX_COMPETITORS,
            max_name_length: limits::MAX_CAMPAIGN_NAME_LENGTH,
            max_description_length: limits::MAX_DESCRIPTION_LENGTH,
        }
    }
}

/// Absolute http(s) URL with a host.
pub fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https") && url.host_str().is_some()
        }
        Err(_) => false,
    }
}

const FORBIDDEN_KEYWORD_CHARS: &[char] = &['<', '>', '{', '}', '[', ']', '\\'];

/// Keyword list rules: count bounds, per-keyword content, duplicate warning.
pub fn validate_keywords(keywords: &[String], rules: &ValidationRules) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();

    if keywords.len() < rules.min_keywords {
        outcome.add_error(format!(
            "At least {} seed keyword(s) required",
            rules.min_keywords
        ));
    }
    if keywords.len() > rules.max_keywords {
        outcome.add_error(format!(
            "Too many keywords: {} (maximum {})",
            keywords.len(),
            rules.max_keywords
        ));
    }

    for keyword in keywords {
        let trimmed = keyword.trim();
        if trimmed.is_empty() {
            outcome.add_error("Keywords must not be empty");
        } else if trimmed.len() > rules.max_keyword_length {
            outcome.add_error(format!(
                "Keyword too long: '{}' ({} chars, maximum {})",
                trimmed,
                trimmed.len(),
                rules.max_keyword_length
            ));
        }
        if trimmed.chars().any(|c| FORBIDDEN_KEYWORD_CHARS.contains(&c)) {
            outcome.add_error(format!("Keyword contains invalid characters: '{trimmed}'"));
        }
    }

    let mut seen = std::collections::HashSet::new();
    for keyword in keywords {
        if !seen.insert(keyword.trim().to_lowercase()) {
            outcome.add_warning(format!("Duplicate keyword: '{}'", keyword.trim()));
        }
    }

    outcome
}

/// Full campaign-request validation.
pub fn validate_campaign_request(
    request: &CampaignRequest,
    rules: &ValidationRules,
) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();

    if request.name.trim().is_empty() {
        outcome.add_error("Campaign name is required");
    } else if request.name.len() > rules.max_name_length {
        outcome.add_error(format!(
            "Campaign name too long ({} chars, maximum {})",
            request.name.len(),
            rules.max_name_length
        ));
    }

    if let Some(description) = &request.description
        && description.len() > rules.max_description_length
    {
        outcome.add_error(format!(
            "Description too long ({} chars, maximum {})",
            description.len(),
            rules.max_description_length
        ));
    }

    if request.topic.trim().is_empty() {
        outcome.add_error("Campaign topic is required");
    }

    outcome.merge(validate_keywords(&request.seed_keywords, rules));

    if request.competitor_urls.len() > rules.max_competitors {
        outcome.add_error(format!(
            "Too many competitor URLs: {} (maximum {})",
            request.competitor_urls.len(),
            rules.max_competitors
        ));
    }
    for url in &request.competitor_urls {
        if !is_valid_url(url) {
            outcome.add_error(format!("Invalid competitor URL: '{url}'"));
        }
    }

    if !constants::is_supported_region(&request.region) {
        outcome.add_warning(format!(
            "Region '{}' is not in the tuned set; results may be less reliable",
            request.region
        ));
    }
    if !constants::is_supported_language(&request.language) {
        outcome.add_warning(format!(
            "Language '{}' is not in the tuned set; results may be less reliable",
            request.language
        ));
    }

    outcome
}

/// Confidence must sit in [0, 1]; below 0.6 earns a warning.
pub fn validate_confidence(value: f64, field: &str) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();
    if !(0.0..=1.0).contains(&value) {
        outcome.add_error(format!("{field} must be between 0.0 and 1.0, got {value}"));
    } else if value < 0.6 {
        outcome.add_warning(format!("{field} is low ({value})"));
    }
    outcome
}

/// Search volumes: negative is an error, zero a warning.
pub fn validate_search_volume(value: i64, field: &str) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();
    if value < 0 {
        outcome.add_error(format!("{field} must not be negative, got {value}"));
    } else if value == 0 {
        outcome.add_warning(format!("{field} is zero"));
    }
    outcome
}

pub fn validate_percentage(value: f64, field: &str) -> ValidationOutcome {
    let mut outcome = ValidationOutcome::valid();
    if !(0.0..=100.0).contains(&value) {
        outcome.add_error(format!("{field} must be between 0 and 100, got {value}"));
    }
    outcome
}
