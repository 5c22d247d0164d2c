//! Generation Orchestrator: obtains a four-section explanation from an
//! external generative provider with bounded retry/backoff, and builds a
//! deterministic substitute when the call cannot be trusted.
//!
//! Nothing here surfaces a generation failure to the caller: every request
//! returns a complete `GenerationResult`, possibly fallback-tagged.

pub mod client;
pub mod fallback;
pub mod orchestrator;
pub mod parser;
pub mod prompt;
pub mod types;

pub use client::*;
pub use fallback::*;
pub use orchestrator::*;
pub use parser::*;
pub use prompt::*;
pub use types::*;

use thiserror::Error;

/// Provider-call failures. Internal to the retry loop; never escapes the
/// orchestrator.
#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("Generation provider is not reachable at {0}")]
    ProviderConnection(String),

    #[error("Generation provider returned error (status {status}): {body}")]
    ProviderStatus { status: u16, body: String },

    #[error("HTTP client error: {0}")]
    HttpClient(String),

    #[error("Response parsing error: {0}")]
    ResponseParsing(String),

    #[error("No compatible generation model available")]
    NoModelAvailable,
}
