//! `contentscout run` — run one campaign from the command line.

use contentscout_config::AppConfig;
use contentscout_core::campaign::{CampaignPriority, CampaignRequest};
use contentscout_store::AppContext;

#[allow(clippy::too_many_arguments)]
pub async fn run(
    name: String,
    topic: String,
    keywords: Vec<String>,
    competitors: Vec<String>,
    region: String,
    language: String,
    persona_focus: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    let ctx = AppContext::connect(&config).await?;
    let orchestrator = super::build_orchestrator(&config, ctx.clone());

    let request = CampaignRequest {
        name,
        description: None,
        topic,
        seed_keywords: keywords,
        competitor_urls: competitors,
        region,
        language,
        priority: CampaignPriority::default(),
        persona_focus,
    };

    let outcome = orchestrator.run(request).await?;
    let campaign = &outcome.campaign;
    match outcome.report_markdown {
        Some(markdown) => {
            println!("{markdown}");
            eprintln!(
                "campaign {} finished: {}/{} tasks completed, {} failed",
                campaign.id, campaign.completed_tasks, campaign.total_tasks, campaign.failed_tasks
            );
        }
        None => {
            eprintln!(
                "campaign {} failed: {}",
                campaign.id,
                campaign.error_message.as_deref().unwrap_or("unknown error")
            );
            std::process::exit(1);
        }
    }

    ctx.shutdown().await?;
    Ok(())
}
