use std::sync::Arc;

use tracing::{debug, error, info, warn};

use shared_config::AppConfig;

use crate::models::{AssistantError, BookingQuery, Intent};
use crate::services::gemini::GeminiClient;
use crate::services::llm::{Content, LanguageModel, ModelRequest, Part};
use crate::services::prompts::{error_reply, CLASSIFY_PROMPT, EXTRACT_PROMPT, FALLBACK_REPLY, HELP_TEXT, SYSTEM_PROMPT};
use crate::services::tools::Toolbox;

pub const MAX_TURNS: usize = 5;

/// "Lia": one reply per inbound message, no conversation memory.
pub struct Assistant {
    model: Arc<dyn LanguageModel>,
    tools: Toolbox,
}

impl Assistant {
    pub fn new(model: Arc<dyn LanguageModel>, tools: Toolbox) -> Self {
        Self { model, tools }
    }

    pub fn from_config(config: &AppConfig) -> Result<Self, AssistantError> {
        let client = GeminiClient::new(config)?;
        Ok(Self::new(Arc::new(client), Toolbox::default()))
    }

    pub fn help_text() -> &'static str {
        HELP_TEXT
    }

    /// Always produces text: model failures become an apology carrying the error.
    pub async fn reply(&self, message: &str) -> String {
        match self.run_agent(message).await {
            Ok(Some(text)) => text,
            Ok(None) => FALLBACK_REPLY.to_string(),
            Err(e) => {
                error!("Assistant failed to answer: {}", e);
                error_reply(&e.to_string())
            }
        }
    }

    /// Lets the model call tools until it answers with text, for at most `MAX_TURNS` model calls.
    async fn run_agent(&self, message: &str) -> Result<Option<String>, AssistantError> {
        let mut request = ModelRequest {
            system_instruction: Some(SYSTEM_PROMPT.to_string()),
            contents: vec![Content::user(message)],
            tools: self.tools.declarations(),
        };

        for turn in 1..=MAX_TURNS {
            let reply = self.model.generate(&request).await?;

            let outputs: Vec<Part> = reply
                .function_calls()
                .into_iter()
                .map(|call| Part::function_response(call.name.clone(), self.tools.execute(&call.name, &call.args)))
                .collect();

            if outputs.is_empty() {
                let text = reply.text();
                debug!("Assistant answered on turn {}", turn);
                return Ok(if text.is_empty() { None } else { Some(text) });
            }

            debug!("Turn {}: executed {} tool call(s)", turn, outputs.len());
            request.contents.push(reply);
            request.contents.push(Content::function_responses(outputs));
        }

        warn!("Assistant gave up after {} turns without a final answer", MAX_TURNS);
        Ok(None)
    }

    pub async fn classify_intent(&self, message: &str) -> Result<Intent, AssistantError> {
        let request = ModelRequest {
            system_instruction: Some(CLASSIFY_PROMPT.to_string()),
            contents: vec![Content::user(format!("Mensagem: {}", message))],
            tools: Vec::new(),
        };

        let label = self.model.generate(&request).await?.text();
        let intent = Intent::from_label(&label);
        info!("Classified message as {}", intent.as_str());
        Ok(intent)
    }

    /// Unparsable model output yields an empty query.
    pub async fn extract_booking(&self, message: &str) -> Result<BookingQuery, AssistantError> {
        let request = ModelRequest {
            system_instruction: Some(EXTRACT_PROMPT.to_string()),
            contents: vec![Content::user(format!("Mensagem: {}", message))],
            tools: Vec::new(),
        };

        let raw = self.model.generate(&request).await?.text();
        match serde_json::from_str(strip_code_fence(&raw)) {
            Ok(query) => Ok(query),
            Err(e) => {
                warn!("Could not parse booking data from model output: {}", e);
                Ok(BookingQuery::default())
            }
        }
    }
}

fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    match trimmed.strip_prefix("```") {
        Some(rest) => rest
            .trim_start_matches("json")
            .trim_end()
            .trim_end_matches("```")
            .trim(),
        None => trimmed,
    }
}
