//! Report writer tool: persists the final Markdown report and converts
//! it to the configured formats with pandoc.
//!
//! Failures come back as messages in the tool output, never as panics or
//! `Err` — a missing pandoc binary should cost the campaign its PDF, not
//! its report.

use async_trait::async_trait;
use chrono::Utc;
use contentscout_core::error::ToolError;
use contentscout_core::tool::{Tool, ToolResult};
use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

pub struct ReportWriterTool {
    output_dir: PathBuf,
    formats: Vec<String>,
}

impl ReportWriterTool {
    pub fn new(output_dir: impl Into<PathBuf>, formats: Vec<String>) -> Self {
        Self {
            output_dir: output_dir.into(),
            formats,
        }
    }

    async fn convert(&self, markdown_path: &Path, format: &str) -> Result<PathBuf, String> {
        let target = markdown_path.with_extension(format);
        let status = Command::new("pandoc")
            .arg(markdown_path)
            .arg("-o")
            .arg(&target)
            .status()
            .await
            .map_err(|e| format!("pandoc not runnable: {e}"))?;
        if status.success() {
            Ok(target)
        } else {
            Err(format!("pandoc exited with {status}"))
        }
    }
}

/// Keep alphanumerics, spaces, and underscores; drop the rest and any
/// trailing whitespace.
pub fn sanitize_name(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .filter(|c| c.is_alphanumeric() || *c == ' ' || *c == '_')
        .collect();
    cleaned.trim_end().to_string()
}

#[async_trait]
impl Tool for ReportWriterTool {
    fn name(&self) -> &str {
        "report_writer"
    }

    fn description(&self) -> &str {
        "Write the final report to disk as Markdown and convert it to the configured formats."
    }

    fn parameters_schema(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "campaign_name": {
                    "type": "string",
                    "description": "Campaign name used in the file name"
                },
                "markdown": {
                    "type": "string",
                    "description": "The full Markdown report body"
                }
            },
            "required": ["campaign_name", "markdown"]
        })
    }

    async fn execute(&self, arguments: serde_json::Value) -> Result<ToolResult, ToolError> {
        let campaign_name = arguments["campaign_name"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'campaign_name'".into()))?;
        let markdown = arguments["markdown"]
            .as_str()
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'markdown'".into()))?;

        let base = sanitize_name(campaign_name);
        let base = if base.is_empty() { "report".to_string() } else { base };
        let stamped = format!("{}_{}", base, Utc::now().format("%Y%m%d_%H%M%S"));
        let markdown_path = self.output_dir.join(format!("{stamped}.md"));

        if let Err(e) = tokio::fs::create_dir_all(&self.output_dir).await {
            return Ok(ToolResult::failure(format!(
                "could not create reports directory {}: {e}",
                self.output_dir.display()
            )));
        }
        if let Err(e) = tokio::fs::write(&markdown_path, markdown).await {
            return Ok(ToolResult::failure(format!(
                "could not write {}: {e}",
                markdown_path.display()
            )));
        }
        info!(path = %markdown_path.display(), "report written");

        let mut written = vec![markdown_path.display().to_string()];
        for format in &self.formats {
            match self.convert(&markdown_path, format).await {
                Ok(path) => written.push(path.display().to_string()),
                Err(reason) => {
                    warn!(format = %format, reason = %reason, "report conversion skipped");
                }
            }
        }

        Ok(ToolResult {
            success: true,
            output: format!("Report written: {}", written.join(", ")),
            data: Some(serde_json::json!({"paths": written})),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn sanitize_keeps_word_characters_only() {
        assert_eq!(sanitize_name("AI Agent Deep Dive"), "AI Agent Deep Dive");
        assert_eq!(sanitize_name("Q1/2026: launch!"), "Q12026 launch");
        assert_eq!(sanitize_name("trailing  "), "trailing");
        assert_eq!(sanitize_name("under_score"), "under_score");
    }

    #[tokio::test]
    async fn writes_markdown_even_without_pandoc_formats() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ReportWriterTool::new(dir.path(), vec![]);
        let result = tool
            .execute(json!({
                "campaign_name": "AI Agent Deep Dive",
                "markdown": "# Content Strategy\n\nBody."
            }))
            .await
            .unwrap();
        assert!(result.success, "output: {}", result.output);

        let entries: Vec<_> = std::fs::read_dir(dir.path()).unwrap().collect();
        assert_eq!(entries.len(), 1);
        let name = entries[0].as_ref().unwrap().file_name();
        let name = name.to_string_lossy();
        assert!(name.starts_with("AI Agent Deep Dive_"));
        assert!(name.ends_with(".md"));
    }

    #[tokio::test]
    async fn empty_name_falls_back_to_report() {
        let dir = tempfile::tempdir().unwrap();
        let tool = ReportWriterTool::new(dir.path(), vec![]);
        let result = tool
            .execute(json!({"campaign_name": "///", "markdown": "x"}))
            .await
            .unwrap();
        assert!(result.success);
        assert!(result.output.contains("report_"));
    }
}
