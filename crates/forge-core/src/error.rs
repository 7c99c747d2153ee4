//! Parse-stage error types.

use thiserror::Error;

/// Errors produced while turning a raw model response into an
/// [`AgentProfile`](crate::profile::AgentProfile).
///
/// The two variants are deliberately distinct: a missing field names the
/// field so the operator can correct the prompt, while malformed JSON
/// carries the raw offending text for diagnosis.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The response was valid JSON but one of the seven required fields is
    /// absent. Only the first missing field (in canonical order) is named.
    #[error("missing required field: {0}")]
    MissingField(&'static str),

    /// The response was not a JSON object at all. `raw` is the response
    /// text after code-fence stripping.
    #[error("failed to parse model response as JSON: {source}")]
    MalformedJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },

    /// All seven fields are present but one of them has the wrong shape
    /// (e.g. `agent_type` outside the enumerated set, or a non-array
    /// `capabilities`).
    #[error("invalid value for field '{field}': {reason}")]
    InvalidField { field: String, reason: String },
}
