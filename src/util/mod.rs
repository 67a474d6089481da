//! Utility modules: retry policy and deadlines.

pub mod retry;
pub mod timeout;
