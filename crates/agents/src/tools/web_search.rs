//! Web search tool backed by a SerpAPI-style endpoint.
//!
//! Returns a compact result list the runtime feeds into agent prompts.
//! Without an API key the tool reports failure in its output string, so
//! an agent run degrades to model knowledge instead of aborting.

use async_trait::async_trait;
use backon::Retryable;
use contentscout_core::error::ToolError;
use contentscout_core::retry::RetryPolicy;
use contentscout_core::tool::{Tool, ToolResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

const SERPAPI_URL: &str = "https://serpapi.com/search.json";

pub struct WebSearchTool {
    client: reqwest::Client,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl WebSearchTool {
    pub fn new(api_key: Option<String>, retry: RetryPolicy) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");
        Self {
            client,
            api_key,
            retry,
        }
    }

    async fn search(&self, query: &str, key: &str, count: usize) -> Result<Vec<SearchResult>, String> {
        let response = self
            .client
            .get(SERPAPI_URL)
            .query(&[
                ("q", query),
                ("api_key", key),
                ("num", &count.to_string()),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("search API returned {}", response.status()));
        }

        let body: SerpResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body
            .organic_results
            .into_iter()
            .take(count)
            .map(|r| SearchResult {
                title: r.title,
                url: r.link,
                snippet: r.snippet.unwrap_or_default(),
            })
            .collect())
    }
}

#[async_trait]
impl Tool for WebSearchTool {
    fn name(&self) -> &str {
        "web_search"
    }

    fn description(&self) -> &str {
        "Search the web. Returns relevant results with titles, URLs, and snippets."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "query": {
                    "type": "string",
                    "description": "The search query"
                },
                "num_results": {
                    "type": "integer",
                    "description": "Number of results to return (default 5)",
                    "default": 5
                }
            },
            "required": ["query"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let query = arguments["query"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'query' argument".into()))?;
        let count = arguments["num_results"].as_u64().unwrap_or(5).min(10) as usize;

        let Some(key) = &self.api_key else {
            return Ok(ToolResult::failure(
                "web search unavailable: no search API key configured",
            ));
        };

        let results = (|| async { self.search(query, key, count).await })
            .retry(&self.retry.builder())
            .notify(|err: &String, dur: Duration| {
                warn!("web search failed, retrying after {:.2}s: {err}", dur.as_secs_f64());
            })
            .await;

        match results {
            Ok(results) => {
                let output = serde_json::to_string_pretty(&results).unwrap_or_default();
                Ok(ToolResult {
                    success: true,
                    output,
                    data: serde_json::to_value(&results).ok(),
                })
            }
            Err(reason) => Ok(ToolResult::failure(format!("web search failed: {reason}"))),
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchResult {
    title: String,
    url: String,
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct SerpResponse {
    #[serde(default)]
    organic_results: Vec<SerpResult>,
}

#[derive(Debug, Deserialize)]
struct SerpResult {
    title: String,
    link: String,
    #[serde(default)]
    snippet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_query_is_invalid_arguments() {
        let tool = WebSearchTool::new(None, RetryPolicy::none());
        let err = tool.execute(json!({})).await.unwrap_err();
        assert!(matches!(err, ToolError::InvalidArguments(_)));
    }

    #[tokio::test]
    async fn missing_api_key_fails_soft() {
        let tool = WebSearchTool::new(None, RetryPolicy::none());
        let result = tool.execute(json!({"query": "ai agents"})).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("no search API key"));
    }
}
