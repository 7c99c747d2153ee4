//! Prompt templates, sample requests, and operator-facing output.

use crate::profile::AgentProfile;

/// Example requests surfaced to operators in both API and interactive mode.
pub const SAMPLE_PROMPTS: [&str; 5] = [
    "Create a customer support agent that can check order status and answer product questions. Make it helpful and professional.",
    "Build a coding assistant that can explain code, debug issues, and suggest improvements. Make it patient and educational.",
    "Create a travel planning agent that can research destinations, suggest itineraries, and provide local tips. Make it enthusiastic and knowledgeable.",
    "Build a data analysis assistant that can interpret charts, explain statistics, and suggest insights. Make it precise and thorough.",
    "Create a writing helper that can proofread, suggest improvements, and help with creative writing. Make it encouraging and constructive.",
];

/// Instruction template sent to the hosted model by the requirement parser.
///
/// `{user_request}` is replaced with the operator's free text. The template
/// demands bare JSON; the fence-stripping in
/// [`AgentProfile::from_model_json`](crate::profile::AgentProfile::from_model_json)
/// tolerates models that wrap it anyway.
pub const PARSING_PROMPT_TEMPLATE: &str = r#"You are a configuration parser for hosted AI agents. Parse the following user request and extract a structured JSON configuration for creating an AI agent.

User Request: {user_request}

Extract the following fields and return ONLY valid JSON (no markdown, no code blocks, just pure JSON):
{
    "agent_name": "A short, descriptive name for the agent (alphanumeric and underscores only, max 50 chars)",
    "agent_type": "One of: 'conversational', 'task-oriented', 'qa', 'creative', 'analytical'",
    "description": "A clear 1-2 sentence description of what the agent does",
    "capabilities": ["List of 3-5 specific capabilities the agent should have"],
    "tools": ["List of tools the agent might need, e.g., 'search', 'calculator', 'code_execution'"],
    "personality": "A brief description of the agent's personality and communication style",
    "instructions": "Detailed system instructions for how the agent should behave and respond"
}

Rules:
- agent_name should be lowercase with underscores, no spaces (e.g., "customer_support_agent")
- Be specific and detailed in the instructions field
- Choose appropriate tools based on the agent's purpose
- Keep the personality consistent with the user's requirements
- Return ONLY valid JSON, nothing else"#;

/// Build the full parsing prompt for one user request.
pub fn parsing_prompt(user_request: &str) -> String {
    PARSING_PROMPT_TEMPLATE.replace("{user_request}", user_request)
}

/// Construct the system instruction that fixes the deployed agent's
/// behaviour.
///
/// The concatenation order (instructions, personality, type, description)
/// is fixed; the same string is captured into the deployment outcome so the
/// raw-API fallback can replay it verbatim.
pub fn system_instruction(profile: &AgentProfile) -> String {
    format!(
        "{}\n\nYour personality: {}\nAgent type: {}\nDescription: {}\n\nYou are a helpful AI assistant. Answer user questions thoughtfully and thoroughly.",
        profile.instructions, profile.personality, profile.agent_type, profile.description
    )
}

/// Render the sample authenticated curl call for operators who want to hit
/// the raw content-generation endpoint without the built-in tester.
pub fn curl_example(endpoint_url: &str) -> String {
    format!(
        r#"curl -X POST \
  "{endpoint_url}" \
  -H "Authorization: Bearer $(gcloud auth print-access-token)" \
  -H "Content-Type: application/json" \
  -d '{{
    "contents": [{{
      "role": "user",
      "parts": [{{"text": "YOUR_QUERY_HERE"}}]
    }}],
    "systemInstruction": {{
      "parts": [{{"text": "YOUR_AGENT_SYSTEM_INSTRUCTION"}}]
    }},
    "generationConfig": {{
      "temperature": 0.7,
      "maxOutputTokens": 2048
    }}
  }}'
"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::AgentKind;

    #[test]
    fn parsing_prompt_embeds_the_user_request() {
        let prompt = parsing_prompt("Build me a pirate chatbot");
        assert!(prompt.contains("User Request: Build me a pirate chatbot"));
        assert!(!prompt.contains("{user_request}"));
    }

    #[test]
    fn system_instruction_concatenates_in_fixed_order() {
        let profile = AgentProfile {
            agent_name: "helper".into(),
            agent_type: AgentKind::Analytical,
            description: "Crunches numbers.".into(),
            capabilities: vec![],
            tools: vec![],
            personality: "Precise".into(),
            instructions: "Always show your working.".into(),
        };
        let text = system_instruction(&profile);

        let i = text.find("Always show your working.").unwrap();
        let p = text.find("Your personality: Precise").unwrap();
        let t = text.find("Agent type: analytical").unwrap();
        let d = text.find("Description: Crunches numbers.").unwrap();
        assert!(i < p && p < t && t < d, "concatenation order is fixed");
    }

    #[test]
    fn curl_example_carries_the_generation_parameters() {
        let text = curl_example("https://example.test/v1/models/m:generateContent");
        assert!(text.contains("https://example.test/v1/models/m:generateContent"));
        assert!(text.contains("\"temperature\": 0.7"));
        assert!(text.contains("\"maxOutputTokens\": 2048"));
        assert!(text.contains("systemInstruction"));
    }
}
