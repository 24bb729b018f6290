//! The LLM-backed research runtime.
//!
//! Interprets an [`AgentSpec`] against any OpenAI-compatible
//! `/v1/chat/completions` endpoint. Research tools named by the spec are
//! executed first and their output is handed to the model as context;
//! retryable failures back off exponentially.

use backon::Retryable;
use contentscout_core::agent::{AgentInput, AgentOutput, AgentSpec, ResearchRuntime};
use contentscout_core::error::AgentError;
use contentscout_core::retry::RetryPolicy;
use contentscout_core::tool::ToolRegistry;
use contentscout_config::LlmConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::time::Duration;
use tracing::{debug, warn};

/// Tool output beyond this is truncated before it reaches the prompt.
const MAX_TOOL_CONTEXT: usize = 4000;

pub struct HttpResearchRuntime {
    client: reqwest::Client,
    config: LlmConfig,
    retry: RetryPolicy,
    tools: ToolRegistry,
}

impl HttpResearchRuntime {
    pub fn new(config: LlmConfig, retry: RetryPolicy, tools: ToolRegistry) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            config,
            retry,
            tools,
        }
    }

    /// Run the spec's research tools and collect their output as prompt
    /// context. A failing tool degrades the context, never the run.
    async fn gather_tool_context(&self, spec: &AgentSpec, input: &AgentInput) -> String {
        let mut context = String::new();
        let query = research_query(input);
        for tool_name in &spec.tools {
            // The report writer runs after aggregation, not as context.
            if tool_name == "report_writer" {
                continue;
            }
            let Some(tool) = self.tools.get(tool_name) else {
                warn!(agent = %spec.name, tool = %tool_name, "tool not registered");
                continue;
            };
            match tool.execute(json!({"query": query})).await {
                Ok(result) if result.success => {
                    let mut output = result.output;
                    clamp_to_char_boundary(&mut output, MAX_TOOL_CONTEXT);
                    context.push_str(&format!("### {tool_name} results\n{output}\n\n"));
                }
                Ok(result) => {
                    warn!(agent = %spec.name, tool = %tool_name, output = %result.output, "tool reported failure");
                }
                Err(e) => {
                    warn!(agent = %spec.name, tool = %tool_name, error = %e, "tool execution error");
                }
            }
        }
        context
    }

    async fn complete(&self, model: &str, system: &str, user: &str) -> Result<String, AgentError> {
        let url = format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        );
        let request = ApiRequest {
            model: model.to_string(),
            messages: vec![
                ApiMessage {
                    role: "system".into(),
                    content: system.to_string(),
                },
                ApiMessage {
                    role: "user".into(),
                    content: user.to_string(),
                },
            ],
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        let mut builder = self.client.post(&url).json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| AgentError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AgentError::ApiError {
                status_code: status.as_u16(),
                message: body.chars().take(500).collect(),
            });
        }

        let parsed: ApiResponse = response
            .json()
            .await
            .map_err(|e| AgentError::Network(format!("bad completion body: {e}")))?;
        parsed
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| AgentError::Network("completion had no choices".into()))
    }
}

#[async_trait::async_trait]
impl ResearchRuntime for HttpResearchRuntime {
    async fn run(&self, spec: &AgentSpec, input: &AgentInput) -> Result<AgentOutput, AgentError> {
        let context = self.gather_tool_context(spec, input).await;
        let mut user = input.to_prompt_block();
        if !context.is_empty() {
            user.push_str("\n## Research context\n");
            user.push_str(&context);
        }

        debug!(agent = %spec.name, model = %spec.model, "running agent");
        let markdown = (|| async { self.complete(&spec.model, &spec.instruction, &user).await })
            .retry(&self.retry.builder())
            .when(AgentError::is_retryable)
            .notify(|err: &AgentError, dur: Duration| {
                warn!(
                    agent = %spec.name,
                    "agent call failed, retrying after {:.2}s: {}",
                    dur.as_secs_f64(),
                    err
                );
            })
            .await
            .map_err(|e| match e {
                retryable @ (AgentError::Network(_)
                | AgentError::Timeout { .. }
                | AgentError::ApiError { .. }) => retryable,
                other => AgentError::RunFailed {
                    agent: spec.name.clone(),
                    reason: other.to_string(),
                },
            })?;

        if markdown.trim().is_empty() {
            return Err(AgentError::MissingOutput(spec.output_key.clone()));
        }

        let structured = extract_json_block(&markdown);
        Ok(AgentOutput {
            markdown,
            structured,
        })
    }
}

/// Cut `text` down to at most `max_bytes`, backing up to the nearest
/// char boundary so multibyte output never splits mid-character.
fn clamp_to_char_boundary(text: &mut String, max_bytes: usize) {
    if text.len() <= max_bytes {
        return;
    }
    let mut end = max_bytes;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    text.truncate(end);
}

/// The query the research tools run for an agent: topic plus seed keywords.
fn research_query(input: &AgentInput) -> String {
    let topic = input
        .get("topic")
        .and_then(Value::as_str)
        .unwrap_or_default();
    let keywords = input
        .get("seed_keywords")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .filter_map(Value::as_str)
                .collect::<Vec<_>>()
                .join(" ")
        })
        .unwrap_or_default();
    format!("{topic} {keywords}").trim().to_string()
}

/// Pull the first fenced ```json block out of a Markdown body.
pub fn extract_json_block(markdown: &str) -> Option<Value> {
    let start = markdown.find("```json")?;
    let rest = &markdown[start + "```json".len()..];
    let end = rest.find("```")?;
    serde_json::from_str(rest[..end].trim()).ok()
}

// --- Wire format ---

#[derive(Debug, Serialize)]
struct ApiRequest {
    model: String,
    messages: Vec<ApiMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ApiMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ApiResponse {
    choices: Vec<ApiChoice>,
}

#[derive(Debug, Deserialize)]
struct ApiChoice {
    message: ApiMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_block_extraction() {
        let markdown = "## Report\n\nSome prose.\n\n```json\n{\"keyword_metrics\": []}\n```\n";
        assert_eq!(
            extract_json_block(markdown),
            Some(json!({"keyword_metrics": []}))
        );
    }

    #[test]
    fn missing_or_malformed_blocks_yield_none() {
        assert_eq!(extract_json_block("no fences here"), None);
        assert_eq!(extract_json_block("```json\n{not json}\n```"), None);
        assert_eq!(extract_json_block("```json\nunclosed"), None);
    }

    #[test]
    fn research_query_combines_topic_and_keywords() {
        let input = AgentInput::new()
            .with("topic", json!("ai agents"))
            .with("seed_keywords", json!(["multi-agent", "llm"]));
        assert_eq!(research_query(&input), "ai agents multi-agent llm");
    }

    #[test]
    fn research_query_tolerates_missing_fields() {
        assert_eq!(research_query(&AgentInput::new()), "");
    }

    #[test]
    fn multibyte_tool_output_is_clamped_on_a_char_boundary() {
        // 1500 euro signs is 4500 bytes and byte 4000 falls mid-character.
        let mut output = "€".repeat(1500);
        clamp_to_char_boundary(&mut output, MAX_TOOL_CONTEXT);
        assert!(output.len() <= MAX_TOOL_CONTEXT);
        assert_eq!(output.len() % 3, 0);
        assert!(output.chars().all(|c| c == '€'));

        let mut short = String::from("plain ascii");
        clamp_to_char_boundary(&mut short, MAX_TOOL_CONTEXT);
        assert_eq!(short, "plain ascii");
    }
}
