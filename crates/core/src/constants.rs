//! Shared constants: collection names, cache keys, limits, defaults.

/// Document store collection names.
pub mod collections {
    pub const CAMPAIGNS: &str = "campaigns";
    pub const KEYWORD_RESULTS: &str = "keyword_results";
    pub const AUDIENCE_RESULTS: &str = "audience_results";
    pub const COMPETITOR_RESULTS: &str = "competitor_results";
    pub const TREND_RESULTS: &str = "trend_results";
    pub const FINAL_REPORTS: &str = "final_reports";
    pub const TASKS: &str = "tasks";
    pub const LOGS: &str = "logs";
}

/// Cache key builders. Keys are namespaced per entity.
pub mod cache_keys {
    use uuid::Uuid;

    pub fn campaign(id: Uuid) -> String {
        format!("campaign:{id}")
    }

    pub fn campaign_status(id: Uuid) -> String {
        format!("campaign_status:{id}")
    }

    pub fn agent_result(campaign_id: Uuid, agent: &str) -> String {
        format!("agent_result:{campaign_id}:{agent}")
    }

    pub fn rate_limit(client_id: &str) -> String {
        format!("rate_limit:{client_id}")
    }
}

/// Cache TTLs in seconds.
pub mod cache_ttl {
    pub const CAMPAIGN: u64 = 3600;
    pub const RESULTS: u64 = 7200;
    pub const REPORTS: u64 = 86400;
    pub const AGENT_STATUS: u64 = 300;
    pub const RATE_LIMIT: u64 = 3600;
}

/// Validation limits for campaign requests.
pub mod limits {
    pub const MIN_KEYWORDS: usize = 1;
    pub const MAX_KEYWORDS: usize = 50;
    pub const MAX_KEYWORD_LENGTH: usize = 100;
    pub const MAX_COMPETITORS: usize = 10;
    pub const MAX_CAMPAIGN_NAME_LENGTH: usize = 255;
    pub const MAX_DESCRIPTION_LENGTH: usize = 1000;
}

/// Retry defaults shared by the runtime and the tools.
pub mod retry_defaults {
    pub const MAX_RETRIES: u32 = 3;
    pub const INITIAL_DELAY_SECS: u64 = 1;
    pub const MAX_DELAY_SECS: u64 = 60;
    pub const BACKOFF_FACTOR: f32 = 2.0;
}

/// Request/agent timeouts in seconds.
pub mod timeouts {
    pub const HTTP_REQUEST: u64 = 30;
    pub const AGENT_RUN: u64 = 300;
    pub const REPORT_CONVERSION: u64 = 120;
}

/// Language codes the research prompts are tuned for.
pub const SUPPORTED_LANGUAGES: &[&str] = &[
    "en", "es", "fr", "de", "it", "pt", "ja", "ko", "zh", "hi",
];

/// Region codes the research prompts are tuned for.
pub const SUPPORTED_REGIONS: &[&str] = &[
    "US", "GB", "CA", "AU", "DE", "FR", "IT", "ES", "BR", "MX", "JP", "KR", "IN", "global",
];

pub fn is_supported_language(code: &str) -> bool {
    SUPPORTED_LANGUAGES.iter().any(|l| l.eq_ignore_ascii_case(code))
}

pub fn is_supported_region(code: &str) -> bool {
    SUPPORTED_REGIONS.iter().any(|r| r.eq_ignore_ascii_case(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn cache_keys_are_namespaced() {
        let id = Uuid::nil();
        assert_eq!(
            cache_keys::campaign(id),
            "campaign:00000000-0000-0000-0000-000000000000"
        );
        assert_eq!(
            cache_keys::agent_result(id, "keyword"),
            "agent_result:00000000-0000-0000-0000-000000000000:keyword"
        );
    }

    #[test]
    fn region_and_language_lookup_ignores_case() {
        assert!(is_supported_region("us"));
        assert!(is_supported_region("global"));
        assert!(!is_supported_region("XX"));
        assert!(is_supported_language("EN"));
        assert!(!is_supported_language("tlh"));
    }
}
