//! Provider plumbing: HTTP helpers, wire bodies, schema normalization, and
//! the retrying transport.

pub mod http;
pub mod schema;
pub mod transport;
pub(crate) mod wire;

pub use transport::{RetryingTransport, TransportRequest, TransportResponse};

/// Default provider endpoint (OpenAI-compatible chat completions).
pub const DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
/// General-purpose chat model used when no model is configured.
pub const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
/// Sent as `HTTP-Referer` for provider-side attribution.
pub const DEFAULT_REFERER: &str = "https://github.com/larder-rs/larder";
/// Sent as `X-Title` for provider-side attribution.
pub const DEFAULT_APP_TITLE: &str = "larder";
