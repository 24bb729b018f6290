//! Research agents for ContentScout.
//!
//! An agent is an [`AgentSpec`](contentscout_core::agent::AgentSpec) from
//! [`catalog`] plus a [`ResearchRuntime`](contentscout_core::agent::ResearchRuntime)
//! that executes it. [`HttpResearchRuntime`] talks to an OpenAI-compatible
//! chat completions API, feeding each agent the output of its configured
//! [`tools`] as research context.

pub mod catalog;
pub mod prompts;
pub mod runtime;
pub mod tools;

pub use catalog::output_keys;
pub use runtime::{HttpResearchRuntime, extract_json_block};
pub use tools::build_registry;
