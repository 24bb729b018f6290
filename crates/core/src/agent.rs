//! Agents as configuration.
//!
//! An agent is a data record — name, model, instruction, tool names,
//! output key — interpreted by a single [`ResearchRuntime`]. Adding an
//! agent means adding a record, not a type.

use crate::error::AgentError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Configuration record describing one research agent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentSpec {
    pub name: String,
    pub model: String,
    pub instruction: String,
    /// Names of tools the agent may call, resolved by the runtime.
    #[serde(default)]
    pub tools: Vec<String>,
    /// Key the agent's output is filed under when results are combined.
    pub output_key: String,
}

/// Ordered key/value pairs rendered into the agent prompt.
///
/// Keys are snake_case field names; [`display_key`] turns them into the
/// human-readable labels the prompt uses.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentInput {
    entries: Vec<(String, Value)>,
}

impl AgentInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        self.entries.push((key.into(), value));
    }

    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.push(key, value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Render as the labeled block the prompts expect.
    pub fn to_prompt_block(&self) -> String {
        let mut block = String::new();
        for (key, value) in self.iter() {
            let rendered = match value {
                Value::String(s) => s.clone(),
                Value::Array(items) => items
                    .iter()
                    .map(|v| match v {
                        Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect::<Vec<_>>()
                    .join(", "),
                other => other.to_string(),
            };
            block.push_str(&format!("{}: {}\n", display_key(key), rendered));
        }
        block
    }
}

/// `campaign_name` → `Campaign Name`: underscores to spaces, each word
/// Title Case.
pub fn display_key(key: &str) -> String {
    key.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// What one agent run produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentOutput {
    /// The Markdown analysis, always present.
    pub markdown: String,
    /// Structured payload the runtime extracted from a fenced JSON block,
    /// when the agent emitted one.
    #[serde(default)]
    pub structured: Option<Value>,
}

impl AgentOutput {
    pub fn markdown_only(markdown: impl Into<String>) -> Self {
        Self {
            markdown: markdown.into(),
            structured: None,
        }
    }
}

/// Executes one agent over one input. Implementations call an LLM;
/// tests script the outputs.
#[async_trait]
pub trait ResearchRuntime: Send + Sync {
    async fn run(&self, spec: &AgentSpec, input: &AgentInput) -> Result<AgentOutput, AgentError>;
}
