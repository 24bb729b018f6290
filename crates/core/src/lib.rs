//! # ContentScout Core
//!
//! Domain types, traits, and error definitions for the ContentScout content
//! research pipeline. This crate has **zero framework dependencies** — it
//! defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! Every subsystem boundary is defined as a trait here. Implementations live
//! in their respective crates. This enables:
//! - Swapping storage/cache/runtime backends via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod agent;
pub mod audience;
pub mod campaign;
pub mod competitor;
pub mod constants;
pub mod error;
pub mod keyword;
pub mod report;
pub mod retry;
pub mod store;
pub mod tool;
pub mod trend;
pub mod validate;

// Re-export key types at crate root for ergonomics
pub use agent::{AgentInput, AgentOutput, AgentSpec, ResearchRuntime, display_key};
pub use audience::AudienceAnalysisResult;
pub use campaign::{Campaign, CampaignPriority, CampaignRequest, CampaignStatus, CampaignSummary};
pub use competitor::CompetitorAnalysisResult;
pub use error::{AgentError, CacheError, Error, Result, StoreError, ToolError};
pub use keyword::KeywordAnalysisResult;
pub use report::FinalReport;
pub use retry::RetryPolicy;
pub use store::{CacheStore, Document, DocumentStore, FindOptions, SortOrder};
pub use tool::{Tool, ToolRegistry, ToolResult};
pub use trend::TrendAnalysisResult;
pub use validate::{ValidationOutcome, ValidationRules};
