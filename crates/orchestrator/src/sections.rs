//! Section-level checks over the aggregated Markdown report.
//!
//! The aggregator is instructed to emit one `##` heading per
//! [`ReportSection`]; these checks turn what it actually produced into
//! [`SectionValidation`] records that drive the report's quality score.

use contentscout_core::report::{ReportSection, SectionValidation};

/// Sections shorter than this get flagged as thin.
const THIN_SECTION_CHARS: usize = 80;

/// Characters at which a section earns a full quality score.
const FULL_QUALITY_CHARS: usize = 600;

/// Body of the `## {heading}` section, up to the next `#`-level heading.
/// `None` when the heading is absent.
pub fn section_body(markdown: &str, heading: &str) -> Option<String> {
    let mut body = String::new();
    let mut in_section = false;
    for line in markdown.lines() {
        let trimmed = line.trim();
        if let Some(rest) = trimmed.strip_prefix("## ") {
            if in_section {
                break;
            }
            in_section = rest.trim().eq_ignore_ascii_case(heading);
            continue;
        }
        if in_section && trimmed.starts_with("# ") {
            break;
        }
        if in_section {
            body.push_str(line);
            body.push('\n');
        }
    }
    in_section.then(|| body.trim().to_string())
}

/// Validate every expected section of the report.
pub fn validate_sections(markdown: &str) -> Vec<SectionValidation> {
    ReportSection::ALL
        .iter()
        .map(|&section| validate_section(markdown, section))
        .collect()
}

fn validate_section(markdown: &str, section: ReportSection) -> SectionValidation {
    let heading = section.heading();
    let Some(body) = section_body(markdown, heading) else {
        return SectionValidation {
            section,
            is_valid: false,
            quality_score: 0.0,
            issues: vec![format!("Missing section '{heading}'")],
            recommendations: vec![format!("Add a '## {heading}' section")],
        };
    };

    if body.is_empty() {
        return SectionValidation {
            section,
            is_valid: false,
            quality_score: 0.0,
            issues: vec![format!("Section '{heading}' is empty")],
            recommendations: vec![format!("Write content under '## {heading}'")],
        };
    }

    let quality_score = (body.len() as f64 / FULL_QUALITY_CHARS as f64).min(1.0);
    let mut issues = Vec::new();
    let mut recommendations = Vec::new();
    if body.len() < THIN_SECTION_CHARS {
        issues.push(format!("Section '{heading}' is thin ({} chars)", body.len()));
        recommendations.push(format!("Expand '{heading}' with concrete findings"));
    }
    SectionValidation {
        section,
        is_valid: true,
        quality_score,
        issues,
        recommendations,
    }
}

/// The Executive Summary body, falling back to the report's opening
/// characters when the aggregator skipped the heading.
pub fn executive_summary(markdown: &str) -> String {
    section_body(markdown, ReportSection::ExecutiveSummary.heading())
        .filter(|body| !body.is_empty())
        .unwrap_or_else(|| markdown.chars().take(500).collect::<String>().trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const REPORT: &str = "\
# Content Strategy: Demo

## Executive Summary
The campaign targets mid-market teams evaluating automation platforms.

## Keyword Analysis
Twelve keywords cluster around integration and pricing intent, with the
strongest opportunity scores in long-tail comparison queries that the
incumbent competitors have not covered in depth.

## Content Calendar
";

    #[test]
    fn extracts_section_bodies() {
        let body = section_body(REPORT, "Executive Summary").unwrap();
        assert!(body.starts_with("The campaign targets"));
        assert!(!body.contains("Keyword"));
        assert!(section_body(REPORT, "Trend Analysis").is_none());
    }

    #[test]
    fn heading_match_ignores_case() {
        assert!(section_body(REPORT, "executive summary").is_some());
    }

    #[test]
    fn missing_empty_and_thin_sections_are_flagged() {
        let validations = validate_sections(REPORT);
        assert_eq!(validations.len(), ReportSection::ALL.len());

        let summary = &validations[0];
        assert!(summary.is_valid);
        assert!(summary.quality_score > 0.0);

        let keywords = validations
            .iter()
            .find(|v| v.section == ReportSection::KeywordAnalysis)
            .unwrap();
        assert!(keywords.is_valid);
        assert!(keywords.issues.is_empty());

        let calendar = validations
            .iter()
            .find(|v| v.section == ReportSection::ContentCalendar)
            .unwrap();
        assert!(!calendar.is_valid);
        assert_eq!(calendar.quality_score, 0.0);

        let trends = validations
            .iter()
            .find(|v| v.section == ReportSection::TrendAnalysis)
            .unwrap();
        assert!(!trends.is_valid);
        assert!(trends.issues[0].contains("Missing"));
    }

    #[test]
    fn executive_summary_falls_back_to_report_head() {
        let markdown = "No headings at all, just prose about the campaign.";
        assert_eq!(executive_summary(markdown), markdown);
        assert!(executive_summary(REPORT).starts_with("The campaign targets"));
    }
}
