pub mod probe;
pub mod sample;

use rdtap_core::{ShortfallPolicy, TapError};

/// `--max-retries` absent means the unbounded re-issue loop.
pub fn parse_policy(max_retries: Option<u32>) -> ShortfallPolicy {
    match max_retries {
        Some(n) => ShortfallPolicy::Bounded(n),
        None => ShortfallPolicy::Unbounded,
    }
}

/// One-line user-facing diagnostic for a fatal error.
pub fn diagnostic(err: &TapError) -> String {
    match err {
        // Already a complete sentence.
        TapError::OpenOutput { .. } => err.to_string(),
        _ => format!("Error: {err}"),
    }
}
