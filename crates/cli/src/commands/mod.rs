pub mod run;
pub mod serve;
pub mod status;

use contentscout_agents::{HttpResearchRuntime, build_registry};
use contentscout_config::AppConfig;
use contentscout_orchestrator::CampaignOrchestrator;
use contentscout_store::AppContext;
use std::sync::Arc;

/// Wire the LLM runtime, tools, and storage into an orchestrator.
pub fn build_orchestrator(config: &AppConfig, ctx: AppContext) -> CampaignOrchestrator {
    let tools = build_registry(&config.search, &config.reports, config.retry);
    let runtime = HttpResearchRuntime::new(config.llm.clone(), config.retry, tools.clone());
    CampaignOrchestrator::new(Arc::new(runtime), ctx, config.llm.clone(), tools)
}
