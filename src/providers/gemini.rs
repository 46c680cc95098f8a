//! Google Gemini provider implementation for Wanderlust
//!
//! Talks to the `generateContent` REST endpoint. Conversation state lives in
//! the caller's message list; every call resends the full transcript with the
//! system instruction and function declarations.

use crate::config::GeminiConfig;
use crate::error::{Result, WanderlustError};
use crate::providers::{
    CompletionResponse, FunctionCall, GenerateRequest, GenerateResponse, Grounding, Message,
    Provider, TokenUsage, ToolCall,
};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Default REST base for the Gemini API
pub const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Google Gemini API provider
///
/// # Examples
///
/// ```no_run
/// use wanderlust::config::GeminiConfig;
/// use wanderlust::providers::{GeminiProvider, Provider, Message};
///
/// # async fn example() -> wanderlust::error::Result<()> {
/// let provider = GeminiProvider::new(GeminiConfig::default(), "my-key")?;
/// let completion = provider.complete(&[Message::user("Plan my trip.")], &[]).await?;
/// # Ok(())
/// # }
/// ```
pub struct GeminiProvider {
    client: Client,
    config: GeminiConfig,
    api_key: String,
    temperature: Option<f32>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<GeminiContent>,
    contents: Vec<GeminiContent>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_config: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Default, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    thinking_config: Option<ThinkingConfig>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThinkingConfig {
    thinking_budget: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct GeminiContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<GeminiPart>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiPart {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    inline_data: Option<GeminiInlineData>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_call: Option<GeminiFunctionCall>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    function_response: Option<GeminiFunctionResponse>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    thought_signature: Option<String>,
}

impl GeminiPart {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiInlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionCall {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    #[serde(default)]
    args: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct GeminiFunctionResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    name: String,
    response: serde_json::Value,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<GeminiCandidate>,
    #[serde(default)]
    usage_metadata: Option<GeminiUsage>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiCandidate {
    #[serde(default)]
    content: Option<GeminiContent>,
    #[serde(default)]
    finish_reason: Option<String>,
    #[serde(default)]
    grounding_metadata: Option<GeminiGroundingMetadata>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiGroundingMetadata {
    #[serde(default)]
    grounding_chunks: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GeminiUsage {
    #[serde(default)]
    prompt_token_count: usize,
    #[serde(default)]
    candidates_token_count: usize,
}

impl GenerateContentResponse {
    fn first_candidate(&self) -> Option<&GeminiCandidate> {
        self.candidates.first()
    }

    fn parts(&self) -> &[GeminiPart] {
        self.first_candidate()
            .and_then(|candidate| candidate.content.as_ref())
            .map(|content| content.parts.as_slice())
            .unwrap_or(&[])
    }

    /// Concatenated non-thought text parts
    fn text(&self) -> Option<String> {
        let text: String = self
            .parts()
            .iter()
            .filter(|part| part.thought != Some(true))
            .filter_map(|part| part.text.as_deref())
            .collect();
        Some(text).filter(|text| !text.is_empty())
    }

    fn usage(&self) -> Option<TokenUsage> {
        self.usage_metadata.as_ref().map(|usage| {
            TokenUsage::new(usage.prompt_token_count, usage.candidates_token_count)
        })
    }
}

impl GeminiProvider {
    /// Create a new Gemini provider instance
    ///
    /// # Errors
    ///
    /// Returns `MissingCredentials` if the API key is empty, or a provider
    /// error if the HTTP client cannot be built
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::config::GeminiConfig;
    /// use wanderlust::providers::GeminiProvider;
    ///
    /// assert!(GeminiProvider::new(GeminiConfig::default(), "key").is_ok());
    /// assert!(GeminiProvider::new(GeminiConfig::default(), "").is_err());
    /// ```
    pub fn new(config: GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(WanderlustError::MissingCredentials("gemini".to_string()).into());
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("wanderlust/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| WanderlustError::Provider(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized Gemini provider: model={}, api_base={}",
            config.model,
            config.api_base.as_deref().unwrap_or(DEFAULT_GEMINI_API_BASE)
        );

        Ok(Self {
            client,
            config,
            api_key,
            temperature: None,
        })
    }

    /// Set the sampling temperature used for conversation turns
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Get the configured model name
    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn endpoint(&self, model: &str) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_GEMINI_API_BASE)
            .trim_end_matches('/');
        format!("{}/models/{}:generateContent", base, model)
    }

    /// Split the transcript into a system instruction and Gemini contents
    ///
    /// Consecutive tool results are grouped into one user turn so that a
    /// batch of function responses is sent back together.
    fn convert_messages(&self, messages: &[Message]) -> (Option<GeminiContent>, Vec<GeminiContent>) {
        let mut system_parts = Vec::new();
        let mut contents: Vec<GeminiContent> = Vec::new();

        for message in crate::providers::validate_message_sequence(messages) {
            match message.role.as_str() {
                "system" => {
                    if let Some(text) = message.content {
                        system_parts.push(GeminiPart::text(text));
                    }
                }
                "user" => {
                    let mut parts = Vec::new();
                    if let Some(text) = message.content {
                        parts.push(GeminiPart::text(text));
                    }
                    parts.extend(message.images.into_iter().map(|image| GeminiPart {
                        inline_data: Some(GeminiInlineData {
                            mime_type: image.mime_type,
                            data: image.data,
                        }),
                        ..GeminiPart::default()
                    }));
                    contents.push(GeminiContent {
                        role: Some("user".to_string()),
                        parts,
                    });
                }
                "assistant" => {
                    let mut parts = Vec::new();
                    if let Some(text) = message.content.filter(|text| !text.is_empty()) {
                        parts.push(GeminiPart::text(text));
                    }
                    for call in message.tool_calls.unwrap_or_default() {
                        parts.push(GeminiPart {
                            function_call: Some(GeminiFunctionCall {
                                id: Some(call.id),
                                name: call.function.name,
                                args: serde_json::from_str(&call.function.arguments)
                                    .unwrap_or(serde_json::Value::Object(serde_json::Map::new())),
                            }),
                            thought_signature: call.thought_signature,
                            ..GeminiPart::default()
                        });
                    }
                    contents.push(GeminiContent {
                        role: Some("model".to_string()),
                        parts,
                    });
                }
                "tool" => {
                    let content = message.content.unwrap_or_default();
                    let result = serde_json::from_str::<serde_json::Value>(&content)
                        .unwrap_or(serde_json::Value::String(content));
                    let part = GeminiPart {
                        function_response: Some(GeminiFunctionResponse {
                            id: message.tool_call_id,
                            name: message.tool_name.unwrap_or_default(),
                            response: serde_json::json!({ "result": result }),
                        }),
                        ..GeminiPart::default()
                    };

                    match contents.last_mut() {
                        Some(last) if is_function_response_turn(last) => last.parts.push(part),
                        _ => contents.push(GeminiContent {
                            role: Some("user".to_string()),
                            parts: vec![part],
                        }),
                    }
                }
                other => tracing::warn!("Skipping message with unsupported role: {}", other),
            }
        }

        let system_instruction = if system_parts.is_empty() {
            None
        } else {
            Some(GeminiContent {
                role: None,
                parts: system_parts,
            })
        };

        (system_instruction, contents)
    }

    /// Wrap tool schemas in a single function declarations block
    fn convert_tools(&self, tools: &[serde_json::Value]) -> Vec<serde_json::Value> {
        let declarations: Vec<serde_json::Value> = tools
            .iter()
            .filter_map(|t| {
                let obj = t.as_object()?;
                Some(serde_json::json!({
                    "name": obj.get("name")?.as_str()?,
                    "description": obj.get("description")?.as_str()?,
                    "parameters": obj.get("parameters")?.clone(),
                }))
            })
            .collect();

        if declarations.is_empty() {
            Vec::new()
        } else {
            vec![serde_json::json!({ "functionDeclarations": declarations })]
        }
    }

    /// Convert the first candidate back to a Wanderlust message
    fn convert_response(&self, response: &GenerateContentResponse) -> Message {
        let tool_calls: Vec<ToolCall> = response
            .parts()
            .iter()
            .filter_map(|part| {
                part.function_call
                    .as_ref()
                    .map(|call| (call, part.thought_signature.clone()))
            })
            .enumerate()
            .map(|(idx, (call, thought_signature))| ToolCall {
                id: call
                    .id
                    .clone()
                    .filter(|id| !id.is_empty())
                    .unwrap_or_else(|| format!("call_{}", idx)),
                function: FunctionCall {
                    name: call.name.clone(),
                    arguments: call.args.to_string(),
                },
                thought_signature,
            })
            .collect();

        if tool_calls.is_empty() {
            if let Some(reason) = response
                .first_candidate()
                .and_then(|candidate| candidate.finish_reason.as_deref())
            {
                tracing::debug!("Gemini finish reason: {}", reason);
            }
            Message::assistant(response.text().unwrap_or_default())
        } else {
            let mut message = Message::assistant_with_tools(tool_calls);
            message.content = response.text();
            message
        }
    }

    async fn send(&self, model: &str, body: &GenerateContentRequest) -> Result<GenerateContentResponse> {
        tracing::debug!(
            "Sending Gemini request: model={}, {} contents, {} tool blocks",
            model,
            body.contents.len(),
            body.tools.len()
        );

        let response = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::error!("Gemini request failed: {}", e);
                WanderlustError::Provider(format!("Gemini request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Gemini returned error {}: {}", status, error_text);
            return Err(WanderlustError::Provider(format!(
                "Gemini returned error {}: {}",
                status, error_text
            ))
            .into());
        }

        let parsed: GenerateContentResponse = response.json().await.map_err(|e| {
            tracing::error!("Failed to parse Gemini response: {}", e);
            WanderlustError::Provider(format!("Failed to parse Gemini response: {}", e))
        })?;

        if parsed.candidates.is_empty() {
            tracing::warn!(
                "Gemini returned no candidates (prompt feedback: {})",
                parsed
                    .prompt_feedback
                    .as_ref()
                    .map(|f| f.to_string())
                    .unwrap_or_else(|| "none".to_string())
            );
        }

        Ok(parsed)
    }
}

fn is_function_response_turn(content: &GeminiContent) -> bool {
    content.role.as_deref() == Some("user")
        && !content.parts.is_empty()
        && content
            .parts
            .iter()
            .all(|part| part.function_response.is_some())
}

#[async_trait]
impl Provider for GeminiProvider {
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<CompletionResponse> {
        let (system_instruction, contents) = self.convert_messages(messages);
        let body = GenerateContentRequest {
            system_instruction,
            contents,
            tools: self.convert_tools(tools),
            tool_config: None,
            generation_config: self.temperature.map(|temperature| GenerationConfig {
                temperature: Some(temperature),
                thinking_config: None,
            }),
        };

        let response = self.send(&self.config.model, &body).await?;
        let message = self.convert_response(&response);

        Ok(match response.usage() {
            Some(usage) => CompletionResponse::with_usage(message, usage),
            None => CompletionResponse::new(message),
        })
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse> {
        let mut parts = Vec::new();
        if let Some(image) = &request.image {
            parts.push(GeminiPart {
                inline_data: Some(GeminiInlineData {
                    mime_type: image.mime_type.clone(),
                    data: image.data.clone(),
                }),
                ..GeminiPart::default()
            });
        }
        parts.push(GeminiPart::text(request.prompt.clone()));

        let (tools, tool_config) = match &request.grounding {
            Some(Grounding::Maps { location }) => (
                vec![serde_json::json!({ "googleMaps": {} })],
                location.map(|loc| {
                    serde_json::json!({
                        "retrievalConfig": {
                            "latLng": {
                                "latitude": loc.latitude,
                                "longitude": loc.longitude
                            }
                        }
                    })
                }),
            ),
            None => (Vec::new(), None),
        };

        let body = GenerateContentRequest {
            system_instruction: None,
            contents: vec![GeminiContent {
                role: Some("user".to_string()),
                parts,
            }],
            tools,
            tool_config,
            generation_config: request.thinking_budget.map(|budget| GenerationConfig {
                temperature: None,
                thinking_config: Some(ThinkingConfig {
                    thinking_budget: budget,
                }),
            }),
        };

        let model = request.model.as_deref().unwrap_or(&self.config.model);
        let response = self.send(model, &body).await?;

        Ok(GenerateResponse {
            text: response.text(),
            grounding_chunks: response
                .first_candidate()
                .and_then(|candidate| candidate.grounding_metadata.as_ref())
                .map(|metadata| metadata.grounding_chunks.clone())
                .unwrap_or_default(),
            usage: response.usage(),
        })
    }

    fn get_current_model(&self) -> Result<String> {
        Ok(self.config.model.clone())
    }
}
