//! Agent profile model and model-response validation.
//!
//! An [`AgentProfile`] is the user-approved description of a desired
//! conversational agent. It is created by the requirement parser from raw
//! model output, may be hand-edited by the operator, and is captured
//! immutably into the deployment record once deployment starts.

use serde::{Deserialize, Serialize};

use crate::error::ParseError;

/// The seven JSON keys the hosted model must return, in canonical order.
///
/// Validation reports the *first* missing field in this order.
pub const REQUIRED_FIELDS: [&str; 7] = [
    "agent_name",
    "agent_type",
    "description",
    "capabilities",
    "tools",
    "personality",
    "instructions",
];

/// Enumerated agent archetype tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgentKind {
    #[serde(rename = "conversational")]
    Conversational,
    #[serde(rename = "task-oriented")]
    TaskOriented,
    #[serde(rename = "qa")]
    Qa,
    #[serde(rename = "creative")]
    Creative,
    #[serde(rename = "analytical")]
    Analytical,
}

impl AgentKind {
    /// The wire tag, as it appears in profile JSON.
    pub fn as_str(&self) -> &'static str {
        match self {
            AgentKind::Conversational => "conversational",
            AgentKind::TaskOriented => "task-oriented",
            AgentKind::Qa => "qa",
            AgentKind::Creative => "creative",
            AgentKind::Analytical => "analytical",
        }
    }
}

impl std::fmt::Display for AgentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A structured agent configuration.
///
/// Serde round-trips with exactly the seven keys of [`REQUIRED_FIELDS`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentProfile {
    /// Identifier-safe name, lowercase with underscores.
    pub agent_name: String,
    /// Archetype tag.
    pub agent_type: AgentKind,
    /// One-to-two sentence description of what the agent does.
    pub description: String,
    /// 3-5 specific capability strings.
    pub capabilities: Vec<String>,
    /// Tool names the agent might need, e.g. `search`, `calculator`.
    pub tools: Vec<String>,
    /// Personality and communication style.
    pub personality: String,
    /// Detailed system instructions.
    pub instructions: String,
}

impl AgentProfile {
    /// Parse and validate a raw model response into a profile.
    ///
    /// The response may be wrapped in a Markdown code fence; a leading
    /// triple-backtick line (with or without a `json` tag) and a trailing
    /// triple-backtick are removed by prefix/suffix matching before JSON
    /// parsing. General Markdown is NOT understood, only that one fence
    /// shape.
    ///
    /// Field presence is checked before deserialization so a missing field
    /// is always reported by name rather than as an opaque serde error.
    pub fn from_model_json(raw: &str) -> Result<Self, ParseError> {
        let stripped = strip_code_fences(raw.trim());

        let value: serde_json::Value =
            serde_json::from_str(stripped).map_err(|source| ParseError::MalformedJson {
                raw: stripped.to_string(),
                source,
            })?;

        let object = value.as_object().ok_or_else(|| ParseError::InvalidField {
            field: "<root>".to_string(),
            reason: "expected a JSON object".to_string(),
        })?;

        for field in REQUIRED_FIELDS {
            if !object.contains_key(field) {
                return Err(ParseError::MissingField(field));
            }
        }

        serde_json::from_value(value).map_err(|e| {
            // All keys exist, so a failure here is a shape problem on one of
            // them; serde's message names the offending field.
            ParseError::InvalidField {
                field: "<profile>".to_string(),
                reason: e.to_string(),
            }
        })
    }
}

/// Remove an optional surrounding Markdown code fence.
///
/// Handles exactly the shape hosted models emit: an opening triple-backtick
/// line (optionally tagged `json`) and a closing triple-backtick. Anything
/// else is returned unchanged.
fn strip_code_fences(text: &str) -> &str {
    let Some(rest) = text.strip_prefix("```") else {
        return text;
    };
    let rest = rest.strip_prefix("json").unwrap_or(rest);
    let rest = rest.strip_prefix('\n').unwrap_or(rest);
    let rest = rest.strip_suffix("```").unwrap_or(rest);
    rest.strip_suffix('\n').unwrap_or(rest).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_profile_json() -> serde_json::Value {
        serde_json::json!({
            "agent_name": "customer_support_agent",
            "agent_type": "conversational",
            "description": "Handles order status and product questions.",
            "capabilities": ["check order status", "answer product questions", "escalate issues"],
            "tools": ["search", "order_lookup"],
            "personality": "Helpful and professional",
            "instructions": "You are a customer support agent. Be concise and accurate."
        })
    }

    #[test]
    fn well_formed_response_parses() {
        let raw = full_profile_json().to_string();
        let profile = AgentProfile::from_model_json(&raw).expect("should parse");
        assert_eq!(profile.agent_name, "customer_support_agent");
        assert_eq!(profile.agent_type, AgentKind::Conversational);
        assert_eq!(profile.capabilities.len(), 3);
    }

    #[test]
    fn each_missing_field_is_reported_by_name() {
        for field in REQUIRED_FIELDS {
            let mut value = full_profile_json();
            value.as_object_mut().unwrap().remove(field);
            let err = AgentProfile::from_model_json(&value.to_string())
                .expect_err("missing field must fail");
            match err {
                ParseError::MissingField(name) => {
                    assert_eq!(name, field, "wrong field reported");
                }
                other => panic!("expected MissingField({field}), got {other:?}"),
            }
        }
    }

    #[test]
    fn fenced_response_parses_identically_to_unfenced() {
        let plain = full_profile_json().to_string();
        let fenced = format!("```json\n{plain}\n```");
        let bare_fence = format!("```\n{plain}\n```");

        let a = AgentProfile::from_model_json(&plain).unwrap();
        let b = AgentProfile::from_model_json(&fenced).unwrap();
        let c = AgentProfile::from_model_json(&bare_fence).unwrap();

        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&b).unwrap()
        );
        assert_eq!(
            serde_json::to_value(&a).unwrap(),
            serde_json::to_value(&c).unwrap()
        );
    }

    #[test]
    fn malformed_response_carries_raw_text() {
        let raw = "I'm sorry, I cannot produce JSON today.";
        let err = AgentProfile::from_model_json(raw).expect_err("must fail");
        match err {
            ParseError::MalformedJson { raw: carried, .. } => {
                assert!(carried.contains("cannot produce JSON"));
            }
            other => panic!("expected MalformedJson, got {other:?}"),
        }
    }

    #[test]
    fn unknown_agent_type_is_an_invalid_field_not_a_panic() {
        let mut value = full_profile_json();
        value["agent_type"] = serde_json::json!("telepathic");
        let err = AgentProfile::from_model_json(&value.to_string()).expect_err("must fail");
        assert!(matches!(err, ParseError::InvalidField { .. }));
    }

    #[test]
    fn agent_kind_round_trips_all_five_tags() {
        for tag in ["conversational", "task-oriented", "qa", "creative", "analytical"] {
            let kind: AgentKind = serde_json::from_value(serde_json::json!(tag)).unwrap();
            assert_eq!(kind.as_str(), tag);
        }
    }
}
