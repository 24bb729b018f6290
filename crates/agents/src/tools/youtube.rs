//! YouTube search tool used by the audience researcher to see what video
//! content the topic's audience actually watches.

use async_trait::async_trait;
use backon::Retryable;
use contentscout_core::error::ToolError;
use contentscout_core::retry::RetryPolicy;
use contentscout_core::tool::{Tool, ToolResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::warn;

const YOUTUBE_SEARCH_URL: &str = "https://www.googleapis.com/youtube/v3/search";

pub struct YouTubeSearchTool {
    client: reqwest::Client,
    api_key: Option<String>,
    retry: RetryPolicy,
}

impl YouTubeSearchTool {
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

    async fn search(&self, query: &str, key: &str, count: usize) -> Result<Vec<VideoResult>, String> {
        let response = self
            .client
            .get(YOUTUBE_SEARCH_URL)
            .query(&[
                ("part", "snippet"),
                ("type", "video"),
                ("q", query),
                ("maxResults", &count.to_string()),
                ("key", key),
            ])
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !response.status().is_success() {
            return Err(format!("YouTube API returned {}", response.status()));
        }

        let body: YouTubeResponse = response.json().await.map_err(|e| e.to_string())?;
        Ok(body
            .items
            .into_iter()
            .map(|item| VideoResult {
                title: item.snippet.title,
                channel: item.snippet.channel_title,
                description: item.snippet.description,
            })
            .collect())
    }
}

#[async_trait]
impl Tool for YouTubeSearchTool {
    fn name(&self) -> &str {
        "youtube_search"
    }

    fn description(&self) -> &str {
        "Search YouTube for videos on a topic. Returns titles, channels, and descriptions."
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
                    "description": "Number of videos to return (default 5)",
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
                "youtube search unavailable: no API key configured",
            ));
        };

        let results = (|| async { self.search(query, key, count).await })
            .retry(&self.retry.builder())
            .notify(|err: &String, dur: Duration| {
                warn!(
                    "youtube search failed, retrying after {:.2}s: {err}",
                    dur.as_secs_f64()
                );
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
            Err(reason) => Ok(ToolResult::failure(format!("youtube search failed: {reason}"))),
        }
    }
}

#[derive(Debug, Serialize)]
struct VideoResult {
    title: String,
    channel: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct YouTubeResponse {
    #[serde(default)]
    items: Vec<YouTubeItem>,
}

#[derive(Debug, Deserialize)]
struct YouTubeItem {
    snippet: YouTubeSnippet,
}

#[derive(Debug, Deserialize)]
struct YouTubeSnippet {
    title: String,
    #[serde(rename = "channelTitle")]
    channel_title: String,
    #[serde(default)]
    description: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn missing_api_key_fails_soft() {
        let tool = YouTubeSearchTool::new(None, RetryPolicy::none());
        let result = tool.execute(json!({"query": "ai agents"})).await.unwrap();
        assert!(!result.success);
        assert!(result.output.contains("no API key"));
    }
}
