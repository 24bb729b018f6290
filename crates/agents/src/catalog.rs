//! The agent catalog: configuration records for the four researchers and
//! the aggregator. Adding an agent means adding a record here.

use crate::prompts;
use contentscout_config::LlmConfig;
use contentscout_core::agent::AgentSpec;

/// Output keys the orchestrator files agent results under.
pub mod output_keys {
    pub const KEYWORD: &str = "keyword_analysis";
    pub const AUDIENCE: &str = "audience_persona";
    pub const COMPETITOR: &str = "competitor_swot";
    pub const TREND: &str = "trend_analysis";
    pub const FINAL_REPORT: &str = "final_report";
}

pub fn keyword_researcher(llm: &LlmConfig) -> AgentSpec {
    AgentSpec {
        name: "keyword_researcher".into(),
        model: llm.research_model.clone(),
        instruction: prompts::KEYWORD_RESEARCHER.into(),
        tools: vec!["web_search".into()],
        output_key: output_keys::KEYWORD.into(),
    }
}

pub fn audience_researcher(llm: &LlmConfig) -> AgentSpec {
    AgentSpec {
        name: "audience_researcher".into(),
        model: llm.research_model.clone(),
        instruction: prompts::AUDIENCE_RESEARCHER.into(),
        tools: vec!["youtube_search".into()],
        output_key: output_keys::AUDIENCE.into(),
    }
}

pub fn competitor_analyst(llm: &LlmConfig) -> AgentSpec {
    AgentSpec {
        name: "competitor_analyst".into(),
        model: llm.research_model.clone(),
        instruction: prompts::COMPETITOR_ANALYST.into(),
        tools: vec!["web_search".into()],
        output_key: output_keys::COMPETITOR.into(),
    }
}

pub fn trend_analyst(llm: &LlmConfig) -> AgentSpec {
    AgentSpec {
        name: "trend_analyst".into(),
        model: llm.research_model.clone(),
        instruction: prompts::TREND_ANALYST.into(),
        tools: vec!["web_search".into()],
        output_key: output_keys::TREND.into(),
    }
}

/// The aggregator runs after the researchers and gets the stronger model.
pub fn aggregator(llm: &LlmConfig) -> AgentSpec {
    AgentSpec {
        name: "aggregator".into(),
        model: llm.aggregator_model.clone(),
        instruction: prompts::AGGREGATOR.into(),
        tools: vec!["report_writer".into()],
        output_key: output_keys::FINAL_REPORT.into(),
    }
}

/// The four researchers that run concurrently, in catalog order.
pub fn researchers(llm: &LlmConfig) -> Vec<AgentSpec> {
    vec![
        keyword_researcher(llm),
        audience_researcher(llm),
        competitor_analyst(llm),
        trend_analyst(llm),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn researchers_have_distinct_output_keys() {
        let llm = LlmConfig::default();
        let specs = researchers(&llm);
        assert_eq!(specs.len(), 4);
        let mut keys: Vec<_> = specs.iter().map(|s| s.output_key.as_str()).collect();
        keys.sort_unstable();
        keys.dedup();
        assert_eq!(keys.len(), 4);
    }

    #[test]
    fn aggregator_uses_the_stronger_model() {
        let mut llm = LlmConfig::default();
        llm.research_model = "small".into();
        llm.aggregator_model = "large".into();
        assert_eq!(keyword_researcher(&llm).model, "small");
        assert_eq!(aggregator(&llm).model, "large");
        assert_eq!(aggregator(&llm).output_key, "final_report");
    }
}
