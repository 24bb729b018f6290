//! Campaign orchestration: the pipeline that turns a [`CampaignRequest`]
//! into a persisted campaign, four research results, and a final report.
//!
//! The four researchers run concurrently; each success is stored as a
//! typed result row and counted as a completed task, each failure as a
//! failed one. The aggregator runs outside the task budget: if the
//! campaign survives the fan-out, it combines the research into the
//! final Markdown report, which is validated section by section and
//! written to disk.

pub mod sections;

use contentscout_agents::catalog::{self, output_keys};
use contentscout_config::LlmConfig;
use contentscout_core::agent::{AgentInput, AgentOutput, AgentSpec, ResearchRuntime};
use contentscout_core::audience::AudienceAnalysisResult;
use contentscout_core::campaign::{Campaign, CampaignRequest, CampaignStatus};
use contentscout_core::competitor::CompetitorAnalysisResult;
use contentscout_core::constants::{cache_keys, cache_ttl, collections};
use contentscout_core::error::{AgentError, Error, Result};
use contentscout_core::keyword::KeywordAnalysisResult;
use contentscout_core::report::{FinalReport, ReportFormat, ReportMetadata, ReportStatus};
use contentscout_core::tool::ToolRegistry;
use contentscout_core::trend::TrendAnalysisResult;
use contentscout_core::validate::{ValidationRules, validate_campaign_request};
use contentscout_store::AppContext;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Units of tracked work per campaign: the four researchers. Aggregation
/// runs after the fan-out and is not part of the task budget.
const CAMPAIGN_TASKS: u32 = 4;

/// What a finished pipeline run hands back to the caller.
#[derive(Debug, Clone)]
pub struct CampaignOutcome {
    pub campaign: Campaign,
    /// The aggregated report, absent when the campaign failed before
    /// aggregation or the aggregator itself failed.
    pub report_markdown: Option<String>,
}

pub struct CampaignOrchestrator {
    runtime: Arc<dyn ResearchRuntime>,
    ctx: AppContext,
    llm: LlmConfig,
    tools: ToolRegistry,
    rules: ValidationRules,
}

impl CampaignOrchestrator {
    pub fn new(
        runtime: Arc<dyn ResearchRuntime>,
        ctx: AppContext,
        llm: LlmConfig,
        tools: ToolRegistry,
    ) -> Self {
        Self {
            runtime,
            ctx,
            llm,
            tools,
            // The keyword researcher derives keywords from the topic when
            // the request carries none, so the pipeline waives the floor.
            rules: ValidationRules {
                min_keywords: 0,
                ..ValidationRules::default()
            },
        }
    }

    /// Run one campaign end to end. Validation errors reject the request
    /// before anything is persisted; after that, the campaign document
    /// always reaches a terminal state in the store.
    pub async fn run(&self, request: CampaignRequest) -> Result<CampaignOutcome> {
        let validation = validate_campaign_request(&request, &self.rules);
        for warning in &validation.warnings {
            warn!(campaign = %request.name, "{warning}");
        }
        if !validation.is_valid {
            return Err(Error::Validation(validation.errors.join("; ")));
        }

        let mut campaign = Campaign::new(request, CAMPAIGN_TASKS);
        info!(campaign_id = %campaign.id, name = %campaign.request.name, "campaign created");
        self.ctx
            .store
            .insert_one(collections::CAMPAIGNS, serde_json::to_value(&campaign)?)
            .await?;
        self.cache_campaign(&campaign).await;

        campaign.start();
        let input = research_input(&campaign);

        let keyword_spec = catalog::keyword_researcher(&self.llm);
        let audience_spec = catalog::audience_researcher(&self.llm);
        let competitor_spec = catalog::competitor_analyst(&self.llm);
        let trend_spec = catalog::trend_analyst(&self.llm);

        let (keyword, audience, competitor, trend) = futures::join!(
            self.runtime.run(&keyword_spec, &input),
            self.runtime.run(&audience_spec, &input),
            self.runtime.run(&competitor_spec, &input),
            self.runtime.run(&trend_spec, &input),
        );

        // Each researcher's Markdown, keyed by output key, for the aggregator.
        let mut research: Vec<(String, String)> = Vec::new();

        if let Some(output) = settle(&mut campaign, &keyword_spec, keyword) {
            let mut result = KeywordAnalysisResult::new(
                campaign.id,
                campaign.request.seed_keywords.clone(),
                campaign.request.region.clone(),
                campaign.request.language.clone(),
            );
            if let Some(structured) = &output.structured {
                fill(&mut result.keyword_metrics, structured, "keyword_metrics");
                fill(&mut result.clusters, structured, "clusters");
            }
            campaign.keyword_result_id = Some(result.id);
            self.store_result(
                collections::KEYWORD_RESULTS,
                &keyword_spec,
                &campaign,
                serde_json::to_value(&result)?,
                &output.markdown,
            )
            .await?;
            campaign.complete_task();
            research.push((keyword_spec.output_key.clone(), output.markdown));
        }

        if let Some(output) = settle(&mut campaign, &audience_spec, audience) {
            let mut result =
                AudienceAnalysisResult::new(campaign.id, campaign.request.topic.clone());
            if let Some(structured) = &output.structured {
                fill(&mut result.personas, structured, "personas");
                fill(&mut result.segments, structured, "segments");
            }
            campaign.audience_result_id = Some(result.id);
            self.store_result(
                collections::AUDIENCE_RESULTS,
                &audience_spec,
                &campaign,
                serde_json::to_value(&result)?,
                &output.markdown,
            )
            .await?;
            campaign.complete_task();
            research.push((audience_spec.output_key.clone(), output.markdown));
        }

        if let Some(output) = settle(&mut campaign, &competitor_spec, competitor) {
            let mut result = CompetitorAnalysisResult::new(
                campaign.id,
                campaign.request.competitor_urls.clone(),
            );
            if let Some(structured) = &output.structured {
                fill(&mut result.profiles, structured, "profiles");
            }
            campaign.competitor_result_id = Some(result.id);
            self.store_result(
                collections::COMPETITOR_RESULTS,
                &competitor_spec,
                &campaign,
                serde_json::to_value(&result)?,
                &output.markdown,
            )
            .await?;
            campaign.complete_task();
            research.push((competitor_spec.output_key.clone(), output.markdown));
        }

        if let Some(output) = settle(&mut campaign, &trend_spec, trend) {
            let mut result = TrendAnalysisResult::new(campaign.id, campaign.request.topic.clone());
            if let Some(structured) = &output.structured {
                fill(&mut result.trends, structured, "trends");
                fill(&mut result.seasonal_patterns, structured, "seasonal_patterns");
                fill(&mut result.opportunities, structured, "opportunities");
            }
            campaign.trend_result_id = Some(result.id);
            self.store_result(
                collections::TREND_RESULTS,
                &trend_spec,
                &campaign,
                serde_json::to_value(&result)?,
                &output.markdown,
            )
            .await?;
            campaign.complete_task();
            research.push((trend_spec.output_key.clone(), output.markdown));
        }

        let report_markdown = if campaign.status == CampaignStatus::Failed {
            if campaign.error_message.is_none() {
                campaign.error_message = Some(format!(
                    "{} of {} research tasks failed",
                    campaign.failed_tasks, campaign.total_tasks
                ));
            }
            warn!(campaign_id = %campaign.id, "skipping aggregation, campaign already failed");
            None
        } else {
            self.aggregate(&mut campaign, research).await?
        };

        if campaign.is_active() {
            match report_markdown {
                Some(_) => campaign.finish(None),
                None => campaign.finish(Some(
                    campaign
                        .error_message
                        .clone()
                        .unwrap_or_else(|| "campaign produced no report".into()),
                )),
            }
        }

        self.persist_campaign(&campaign).await?;
        info!(
            campaign_id = %campaign.id,
            status = ?campaign.status,
            completed = campaign.completed_tasks,
            failed = campaign.failed_tasks,
            "campaign finished"
        );
        Ok(CampaignOutcome {
            campaign,
            report_markdown,
        })
    }

    /// Run the aggregator over the research, validate the report, write
    /// it to disk, and persist the [`FinalReport`] row.
    async fn aggregate(
        &self,
        campaign: &mut Campaign,
        research: Vec<(String, String)>,
    ) -> Result<Option<String>> {
        let mut input = AgentInput::new()
            .with("campaign_name", json!(campaign.request.name))
            .with("topic", json!(campaign.request.topic));
        for (key, markdown) in &research {
            input.push(key.clone(), json!(markdown));
        }

        let spec = catalog::aggregator(&self.llm);
        let output = match self.runtime.run(&spec, &input).await {
            Ok(output) => output,
            Err(e) => {
                error!(campaign_id = %campaign.id, agent = %spec.name, error = %e, "aggregation failed");
                campaign.error_message = Some(format!("aggregation failed: {e}"));
                return Ok(None);
            }
        };

        let mut report = FinalReport::new(
            campaign.id,
            format!("{} Content Strategy Report", campaign.request.name),
        );
        report.keyword_result_id = campaign.keyword_result_id;
        report.audience_result_id = campaign.audience_result_id;
        report.competitor_result_id = campaign.competitor_result_id;
        report.trend_result_id = campaign.trend_result_id;
        report.executive_summary = sections::executive_summary(&output.markdown);
        report.validations = sections::validate_sections(&output.markdown);
        if let Some(structured) = &output.structured {
            fill(&mut report.recommendations, structured, "recommendations");
            fill(&mut report.insights, structured, "insights");
            fill(&mut report.calendar, structured, "calendar");
        }
        report.update_status(if report.is_high_quality() {
            ReportStatus::Validated
        } else {
            ReportStatus::InReview
        });

        let mut metadata = ReportMetadata {
            generated_by: spec.name.clone(),
            format: ReportFormat::Markdown,
            output_path: None,
            word_count: Some(output.markdown.split_whitespace().count()),
        };
        match self
            .tools
            .execute(
                "report_writer",
                json!({
                    "campaign_name": campaign.request.name,
                    "markdown": output.markdown,
                }),
            )
            .await
        {
            Ok(result) if result.success => {
                metadata.output_path = result
                    .data
                    .as_ref()
                    .and_then(|data| data["paths"][0].as_str())
                    .map(String::from);
            }
            Ok(result) => {
                warn!(campaign_id = %campaign.id, output = %result.output, "report writer reported failure");
            }
            Err(e) => {
                warn!(campaign_id = %campaign.id, error = %e, "report writer unavailable");
            }
        }
        report.metadata = Some(metadata);

        campaign.final_report_id = Some(report.id);
        self.ctx
            .store
            .insert_one(collections::FINAL_REPORTS, serde_json::to_value(&report)?)
            .await?;
        self.cache_value(
            &cache_keys::agent_result(campaign.id, output_keys::FINAL_REPORT),
            &json!(&output.markdown),
            cache_ttl::REPORTS,
        )
        .await;
        Ok(Some(output.markdown))
    }

    /// Persist one researcher's typed result row, with the raw Markdown
    /// alongside the structured fields.
    async fn store_result(
        &self,
        collection: &str,
        spec: &AgentSpec,
        campaign: &Campaign,
        mut doc: Value,
        markdown: &str,
    ) -> Result<()> {
        doc["markdown"] = json!(markdown);
        self.ctx.store.insert_one(collection, doc).await?;
        self.cache_value(
            &cache_keys::agent_result(campaign.id, &spec.output_key),
            &json!(markdown),
            cache_ttl::RESULTS,
        )
        .await;
        Ok(())
    }

    /// Write the campaign's current state back to its store row.
    async fn persist_campaign(&self, campaign: &Campaign) -> Result<()> {
        let doc = serde_json::to_value(campaign)?;
        self.ctx
            .store
            .update_one(
                collections::CAMPAIGNS,
                &json!({"id": campaign.id}),
                &doc,
                true,
            )
            .await?;
        self.cache_campaign(campaign).await;
        Ok(())
    }

    async fn cache_campaign(&self, campaign: &Campaign) {
        match serde_json::to_value(campaign) {
            Ok(doc) => {
                self.cache_value(&cache_keys::campaign(campaign.id), &doc, cache_ttl::CAMPAIGN)
                    .await;
                self.cache_value(
                    &cache_keys::campaign_status(campaign.id),
                    &serde_json::to_value(campaign.status).unwrap_or(Value::Null),
                    cache_ttl::AGENT_STATUS,
                )
                .await;
            }
            Err(e) => warn!(campaign_id = %campaign.id, error = %e, "campaign not cacheable"),
        }
    }

    /// Cache writes are best effort; a cold cache never fails a campaign.
    async fn cache_value(&self, key: &str, value: &Value, ttl_secs: u64) {
        if let Err(e) = self.ctx.cache.set(key, value, Some(ttl_secs)).await {
            warn!(key = %key, error = %e, "cache write failed");
        }
    }
}

/// The shared prompt input every researcher receives.
fn research_input(campaign: &Campaign) -> AgentInput {
    let request = &campaign.request;
    let mut input = AgentInput::new()
        .with("campaign_name", json!(request.name))
        .with("topic", json!(request.topic))
        .with("seed_keywords", json!(request.seed_keywords))
        .with("competitor_urls", json!(request.competitor_urls))
        .with("region", json!(request.region))
        .with("language", json!(request.language));
    if let Some(description) = &request.description {
        input.push("description", json!(description));
    }
    if let Some(focus) = &request.persona_focus {
        input.push("persona_focus", json!(focus));
    }
    input
}

/// Log and count one researcher's outcome; failures fail the task but
/// never abort the fan-out.
fn settle(
    campaign: &mut Campaign,
    spec: &AgentSpec,
    outcome: std::result::Result<AgentOutput, AgentError>,
) -> Option<AgentOutput> {
    match outcome {
        Ok(output) => {
            info!(campaign_id = %campaign.id, agent = %spec.name, "research task finished");
            Some(output)
        }
        Err(e) => {
            error!(campaign_id = %campaign.id, agent = %spec.name, error = %e, "research task failed");
            campaign.fail_task();
            None
        }
    }
}

/// Replace `target` with the deserialized `field` of the structured
/// payload, when present and well formed.
fn fill<T: DeserializeOwned>(target: &mut Vec<T>, structured: &Value, field: &str) {
    let Some(raw) = structured.get(field) else {
        return;
    };
    match serde_json::from_value(raw.clone()) {
        Ok(values) => *target = values,
        Err(e) => warn!(field = %field, error = %e, "structured payload ignored"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use contentscout_agents::tools::ReportWriterTool;
    use contentscout_core::campaign::{CampaignPriority, CampaignStatus};
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Runtime that replays canned outputs by agent name and records
    /// which agents were invoked.
    struct ScriptedRuntime {
        outputs: HashMap<String, std::result::Result<AgentOutput, AgentError>>,
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedRuntime {
        fn new() -> Self {
            Self {
                outputs: HashMap::new(),
                calls: Mutex::new(Vec::new()),
            }
        }

        fn ok(mut self, agent: &str, output: AgentOutput) -> Self {
            self.outputs.insert(agent.to_string(), Ok(output));
            self
        }

        fn err(mut self, agent: &str, error: AgentError) -> Self {
            self.outputs.insert(agent.to_string(), Err(error));
            self
        }

        fn called(&self, agent: &str) -> bool {
            self.calls.lock().unwrap().iter().any(|c| c == agent)
        }
    }

    #[async_trait::async_trait]
    impl ResearchRuntime for ScriptedRuntime {
        async fn run(
            &self,
            spec: &AgentSpec,
            _input: &AgentInput,
        ) -> std::result::Result<AgentOutput, AgentError> {
            self.calls.lock().unwrap().push(spec.name.clone());
            match self.outputs.get(&spec.name) {
                Some(outcome) => outcome.clone(),
                None => Err(AgentError::RunFailed {
                    agent: spec.name.clone(),
                    reason: "no scripted output".into(),
                }),
            }
        }
    }

    fn request() -> CampaignRequest {
        CampaignRequest {
            name: "AI Agent Deep Dive".into(),
            description: Some("Quarterly research push".into()),
            topic: "autonomous coding agents".into(),
            seed_keywords: vec!["ai agents".into(), "code review automation".into()],
            competitor_urls: vec!["https://example.com".into()],
            region: "US".into(),
            language: "en".into(),
            priority: CampaignPriority::High,
            persona_focus: Some("engineering managers".into()),
        }
    }

    fn research_output(agent: &str) -> AgentOutput {
        AgentOutput::markdown_only(format!(
            "## Findings\nDetailed {agent} findings covering the campaign topic in depth, \
             with enough substance to stand on its own as a section."
        ))
    }

    fn full_report() -> String {
        let mut report = String::from("# Content Strategy: AI Agent Deep Dive\n\n");
        for section in contentscout_core::report::ReportSection::ALL {
            report.push_str(&format!(
                "## {}\nSubstantial analysis for this part of the strategy, grounded in the \
                 research the team produced and long enough to be useful to a reader.\n\n",
                section.heading()
            ));
        }
        report
    }

    fn scripted_success() -> ScriptedRuntime {
        ScriptedRuntime::new()
            .ok("keyword_researcher", research_output("keyword"))
            .ok("audience_researcher", research_output("audience"))
            .ok("competitor_analyst", research_output("competitor"))
            .ok("trend_analyst", research_output("trend"))
            .ok("aggregator", AgentOutput::markdown_only(full_report()))
    }

    async fn orchestrator(runtime: ScriptedRuntime) -> (CampaignOrchestrator, AppContext) {
        let ctx = AppContext::in_memory().await.unwrap();
        let orch = CampaignOrchestrator::new(
            Arc::new(runtime),
            ctx.clone(),
            LlmConfig::default(),
            ToolRegistry::default(),
        );
        (orch, ctx)
    }

    #[tokio::test]
    async fn full_pipeline_completes_and_persists() {
        let (orch, ctx) = orchestrator(scripted_success()).await;
        let outcome = orch.run(request()).await.unwrap();

        let campaign = &outcome.campaign;
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.total_tasks, 4);
        assert_eq!(campaign.completed_tasks, 4);
        assert_eq!(campaign.failed_tasks, 0);
        assert!(campaign.keyword_result_id.is_some());
        assert!(campaign.audience_result_id.is_some());
        assert!(campaign.competitor_result_id.is_some());
        assert!(campaign.trend_result_id.is_some());
        assert!(campaign.final_report_id.is_some());
        assert!(
            outcome
                .report_markdown
                .as_deref()
                .unwrap()
                .contains("## Executive Summary")
        );

        let stored = ctx
            .store
            .find_one(collections::CAMPAIGNS, &json!({"id": campaign.id}))
            .await
            .unwrap()
            .expect("campaign row");
        assert_eq!(stored["status"], "completed");

        for collection in [
            collections::KEYWORD_RESULTS,
            collections::AUDIENCE_RESULTS,
            collections::COMPETITOR_RESULTS,
            collections::TREND_RESULTS,
            collections::FINAL_REPORTS,
        ] {
            assert_eq!(ctx.store.count(collection, &json!({})).await.unwrap(), 1);
        }

        let cached = ctx
            .cache
            .get(&cache_keys::campaign(campaign.id))
            .await
            .unwrap()
            .expect("cached campaign");
        assert_eq!(cached["status"], "completed");
    }

    #[tokio::test]
    async fn structured_payloads_populate_typed_results() {
        let keyword_output = AgentOutput {
            markdown: research_output("keyword").markdown,
            structured: Some(json!({
                "keyword_metrics": [
                    {"keyword": "ai agents", "search_volume": 12000, "difficulty": "medium"}
                ],
                "clusters": []
            })),
        };
        let runtime = scripted_success().ok("keyword_researcher", keyword_output);
        let (orch, ctx) = orchestrator(runtime).await;
        let outcome = orch.run(request()).await.unwrap();

        let row = ctx
            .store
            .find_one(
                collections::KEYWORD_RESULTS,
                &json!({"campaign_id": outcome.campaign.id}),
            )
            .await
            .unwrap()
            .expect("keyword result row");
        assert_eq!(row["keyword_metrics"][0]["keyword"], "ai agents");
        assert_eq!(row["keyword_metrics"][0]["search_volume"], 12000);
        assert!(row["markdown"].as_str().unwrap().contains("keyword findings"));
        assert_eq!(
            row["id"],
            outcome.campaign.keyword_result_id.unwrap().to_string()
        );
    }

    #[tokio::test]
    async fn single_failure_still_produces_a_report() {
        let runtime = scripted_success().err(
            "audience_researcher",
            AgentError::Network("connection reset".into()),
        );
        let (orch, ctx) = orchestrator(runtime).await;
        let outcome = orch.run(request()).await.unwrap();

        let campaign = &outcome.campaign;
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.completed_tasks, 3);
        assert_eq!(campaign.failed_tasks, 1);
        assert!(campaign.audience_result_id.is_none());
        assert!(campaign.final_report_id.is_some());
        assert!(outcome.report_markdown.is_some());
        assert_eq!(
            ctx.store
                .count(collections::AUDIENCE_RESULTS, &json!({}))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn majority_failure_skips_aggregation() {
        let failing = || AgentError::ApiError {
            status_code: 500,
            message: "upstream down".into(),
        };
        let runtime = Arc::new(
            ScriptedRuntime::new()
                .ok("keyword_researcher", research_output("keyword"))
                .err("audience_researcher", failing())
                .err("competitor_analyst", failing())
                .err("trend_analyst", failing())
                .ok("aggregator", AgentOutput::markdown_only(full_report())),
        );
        let ctx = AppContext::in_memory().await.unwrap();
        let orch = CampaignOrchestrator::new(
            Arc::clone(&runtime) as Arc<dyn ResearchRuntime>,
            ctx.clone(),
            LlmConfig::default(),
            ToolRegistry::default(),
        );
        let outcome = orch.run(request()).await.unwrap();

        let campaign = &outcome.campaign;
        assert_eq!(campaign.status, CampaignStatus::Failed);
        assert_eq!(campaign.failed_tasks, 3);
        assert!(outcome.report_markdown.is_none());
        assert!(
            campaign
                .error_message
                .as_deref()
                .unwrap()
                .contains("research tasks failed")
        );

        assert!(!runtime.called("aggregator"));
        assert!(runtime.called("keyword_researcher"));

        let stored = ctx
            .store
            .find_one(collections::CAMPAIGNS, &json!({"id": campaign.id}))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored["status"], "failed");
        assert_eq!(
            ctx.store
                .count(collections::FINAL_REPORTS, &json!({}))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn aggregator_failure_withholds_the_report() {
        let timeout = || AgentError::Timeout {
            agent: "aggregator".into(),
            timeout_secs: 300,
        };

        // All four research tasks done: the campaign keeps its completed
        // status, but no report exists and the error is recorded.
        let runtime = scripted_success().err("aggregator", timeout());
        let (orch, ctx) = orchestrator(runtime).await;
        let outcome = orch.run(request()).await.unwrap();

        let campaign = &outcome.campaign;
        assert_eq!(campaign.status, CampaignStatus::Completed);
        assert_eq!(campaign.completed_tasks, 4);
        assert!(campaign.final_report_id.is_none());
        assert!(outcome.report_markdown.is_none());
        assert!(
            campaign
                .error_message
                .as_deref()
                .unwrap()
                .contains("aggregation failed")
        );
        assert_eq!(
            ctx.store
                .count(collections::FINAL_REPORTS, &json!({}))
                .await
                .unwrap(),
            0
        );

        // A partial fan-out that then loses the aggregator fails outright.
        let runtime = scripted_success()
            .err(
                "audience_researcher",
                AgentError::Network("connection reset".into()),
            )
            .err("aggregator", timeout());
        let (orch, _ctx) = orchestrator(runtime).await;
        let outcome = orch.run(request()).await.unwrap();
        assert_eq!(outcome.campaign.status, CampaignStatus::Failed);
        assert!(outcome.report_markdown.is_none());
    }

    #[tokio::test]
    async fn invalid_request_is_rejected_before_persisting() {
        let (orch, ctx) = orchestrator(scripted_success()).await;
        let mut bad = request();
        bad.name = String::new();
        bad.seed_keywords.clear();

        let err = orch.run(bad).await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
        assert_eq!(
            ctx.store
                .count(collections::CAMPAIGNS, &json!({}))
                .await
                .unwrap(),
            0
        );
    }

    #[tokio::test]
    async fn report_writer_records_the_output_path() {
        let dir = tempfile::tempdir().unwrap();
        let mut tools = ToolRegistry::default();
        tools.register(Arc::new(ReportWriterTool::new(dir.path(), vec![])));

        let ctx = AppContext::in_memory().await.unwrap();
        let orch = CampaignOrchestrator::new(
            Arc::new(scripted_success()),
            ctx.clone(),
            LlmConfig::default(),
            tools,
        );
        let outcome = orch.run(request()).await.unwrap();

        let report = ctx
            .store
            .find_one(
                collections::FINAL_REPORTS,
                &json!({"campaign_id": outcome.campaign.id}),
            )
            .await
            .unwrap()
            .expect("final report row");
        let path = report["metadata"]["output_path"].as_str().expect("path");
        assert!(std::path::Path::new(path).exists());
        assert!(path.contains("AI Agent Deep Dive_"));
    }
}
