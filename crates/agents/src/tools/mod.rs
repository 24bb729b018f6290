//! Tools available to research agents and the aggregator.

pub mod report_writer;
pub mod web_search;
pub mod youtube;

pub use report_writer::ReportWriterTool;
pub use web_search::WebSearchTool;
pub use youtube::YouTubeSearchTool;

use contentscout_config::{ReportsConfig, SearchConfig};
use contentscout_core::retry::RetryPolicy;
use contentscout_core::tool::ToolRegistry;
use std::sync::Arc;

/// Build the standard registry wired from configuration.
pub fn build_registry(
    search: &SearchConfig,
    reports: &ReportsConfig,
    retry: RetryPolicy,
) -> ToolRegistry {
    let mut registry = ToolRegistry::default();
    registry.register(Arc::new(WebSearchTool::new(
        search.serpapi_key.clone(),
        retry,
    )));
    registry.register(Arc::new(YouTubeSearchTool::new(
        search.youtube_api_key.clone(),
        retry,
    )));
    registry.register(Arc::new(ReportWriterTool::new(
        reports.output_dir.clone(),
        reports.formats.clone(),
    )));
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn registry_holds_all_standard_tools() {
        let registry = build_registry(
            &SearchConfig::default(),
            &ReportsConfig::default(),
            RetryPolicy::none(),
        );
        let mut names = registry.names();
        names.sort();
        assert_eq!(names, vec!["report_writer", "web_search", "youtube_search"]);
    }
}
