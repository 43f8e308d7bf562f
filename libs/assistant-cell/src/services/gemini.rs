use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::{debug, error};

use shared_config::AppConfig;

use crate::models::AssistantError;
use crate::services::llm::{Content, FunctionDeclaration, LanguageModel, ModelRequest, Part};

const TEMPERATURE: f64 = 0.1;

/// Google Gemini client for the REST `generateContent` endpoint.
/// Based on: https://ai.google.dev/api/generate-content
#[derive(Debug)]
pub struct GeminiClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<Content>,
    contents: &'a [Content],
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<ToolSet<'a>>,
    generation_config: serde_json::Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ToolSet<'a> {
    function_declarations: &'a [FunctionDeclaration],
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

impl GeminiClient {
    pub fn new(config: &AppConfig) -> Result<Self, AssistantError> {
        if !config.is_assistant_configured() {
            return Err(AssistantError::NotConfigured);
        }

        Ok(Self {
            client: Client::new(),
            api_key: config.google_api_key.clone(),
            model: config.gemini_model.clone(),
            base_url: config.gemini_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.base_url, self.model)
    }
}

#[async_trait]
impl LanguageModel for GeminiClient {
    async fn generate(&self, request: &ModelRequest) -> Result<Content, AssistantError> {
        let body = GenerateContentRequest {
            system_instruction: request.system_instruction.as_ref().map(|text| Content {
                role: String::new(),
                parts: vec![Part::text(text.clone())],
            }),
            contents: &request.contents,
            tools: if request.tools.is_empty() {
                Vec::new()
            } else {
                vec![ToolSet { function_declarations: &request.tools }]
            },
            generation_config: json!({ "temperature": TEMPERATURE }),
        };

        let url = self.endpoint();
        debug!("Sending {} message(s) to {}", request.contents.len(), url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        if !status.is_success() {
            error!("Gemini request failed: {} - {}", status, response_text);
            return Err(AssistantError::Api {
                status: status.as_u16(),
                message: response_text,
            });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&response_text)
            .map_err(|e| AssistantError::InvalidResponse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .ok_or_else(|| AssistantError::InvalidResponse("no candidates returned".to_string()))
    }
}
