//! Base provider trait and common types for Wanderlust
//!
//! This module defines the Provider trait that all AI providers must implement,
//! along with the provider-neutral message, tool call, and single-shot request
//! types the planner speaks.

use crate::error::{Result, WanderlustError};
use async_trait::async_trait;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;

/// Inline image attached to a user message
///
/// Carries the MIME type and base64-encoded bytes, which is the shape both
/// Gemini (`inlineData`) and Ollama (`images`) accept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InlineImage {
    /// MIME type such as `image/png`
    pub mime_type: String,
    /// Base64-encoded image bytes
    pub data: String,
}

impl InlineImage {
    /// Build an inline image from raw bytes, sniffing the format
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::InvalidInput` if the bytes are not a
    /// recognized image format
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::providers::InlineImage;
    ///
    /// let png = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
    /// let image = InlineImage::from_bytes(png).unwrap();
    /// assert_eq!(image.mime_type, "image/png");
    /// ```
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        let format = image::guess_format(bytes).map_err(|e| {
            WanderlustError::InvalidInput(format!("Unrecognized image format: {}", e))
        })?;

        Ok(Self {
            mime_type: format.to_mime_type().to_string(),
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
        })
    }

    /// Read an image file and encode it for inline transmission
    ///
    /// # Errors
    ///
    /// Returns error if the file cannot be read or is not an image
    pub async fn from_path(path: &Path) -> Result<Self> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            WanderlustError::InvalidInput(format!(
                "Failed to read image {}: {}",
                path.display(),
                e
            ))
        })?;
        tracing::debug!("Encoding image {} ({} bytes)", path.display(), bytes.len());
        Self::from_bytes(&bytes)
    }
}

/// Message structure for conversation
///
/// Represents a message in the conversation with the AI provider.
/// Messages can be from the user, assistant, system, or tool results.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system, tool)
    pub role: String,
    /// Content of the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Optional tool calls in the message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Optional tool call ID (for tool result messages)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
    /// Name of the tool that produced a tool result
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Images attached to a user message
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<InlineImage>,
}

impl Message {
    fn with_role(role: &str, content: Option<String>) -> Self {
        Self {
            role: role.to_string(),
            content,
            tool_calls: None,
            tool_call_id: None,
            tool_name: None,
            images: Vec::new(),
        }
    }

    /// Creates a new user message
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::providers::Message;
    ///
    /// let msg = Message::user("Plan my trip.");
    /// assert_eq!(msg.role, "user");
    /// ```
    pub fn user(content: impl Into<String>) -> Self {
        Self::with_role("user", Some(content.into()))
    }

    /// Creates a user message carrying an inline image
    pub fn user_with_image(content: impl Into<String>, image: InlineImage) -> Self {
        let mut message = Self::user(content);
        message.images.push(image);
        message
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::with_role("assistant", Some(content.into()))
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self::with_role("system", Some(content.into()))
    }

    /// Creates a new tool result message
    ///
    /// # Arguments
    ///
    /// * `tool_call_id` - The ID of the tool call this result corresponds to
    /// * `tool_name` - Name of the tool that was invoked
    /// * `content` - The tool execution result content (JSON text)
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::providers::Message;
    ///
    /// let msg = Message::tool_result("call_1", "search_food", r#"{"options":[]}"#);
    /// assert_eq!(msg.role, "tool");
    /// assert_eq!(msg.tool_call_id.as_deref(), Some("call_1"));
    /// assert_eq!(msg.tool_name.as_deref(), Some("search_food"));
    /// ```
    pub fn tool_result(
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        let mut message = Self::with_role("tool", Some(content.into()));
        message.tool_call_id = Some(tool_call_id.into());
        message.tool_name = Some(tool_name.into());
        message
    }

    /// Creates an assistant message with tool calls
    pub fn assistant_with_tools(tool_calls: Vec<ToolCall>) -> Self {
        let mut message = Self::with_role("assistant", None);
        message.tool_calls = Some(tool_calls);
        message
    }

    /// Returns the requested tool calls, or an empty slice
    pub fn requested_tool_calls(&self) -> &[ToolCall] {
        self.tool_calls.as_deref().unwrap_or(&[])
    }
}

/// Function call information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    /// Name of the function/tool to call
    pub name: String,
    /// Arguments for the function (as JSON string)
    pub arguments: String,
}

/// Tool call structure
///
/// Represents a request from the AI to execute a tool with specific arguments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Function call details
    pub function: FunctionCall,
    /// Opaque signature some providers attach to a call and expect back
    /// verbatim in the next request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thought_signature: Option<String>,
}

impl ToolCall {
    /// Convenience constructor taking arguments as a JSON value
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::providers::ToolCall;
    ///
    /// let call = ToolCall::new("call_1", "search_food", serde_json::json!({"destination": "Goa"}));
    /// assert_eq!(call.function.name, "search_food");
    /// assert!(call.function.arguments.contains("Goa"));
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>, args: serde_json::Value) -> Self {
        Self {
            id: id.into(),
            function: FunctionCall {
                name: name.into(),
                arguments: args.to_string(),
            },
            thought_signature: None,
        }
    }
}

/// Token usage information from a completion
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    /// Number of tokens in the prompt
    pub prompt_tokens: usize,
    /// Number of tokens in the completion
    pub completion_tokens: usize,
    /// Total tokens used (prompt + completion)
    pub total_tokens: usize,
}

impl TokenUsage {
    /// Create a new TokenUsage instance
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::providers::TokenUsage;
    ///
    /// let usage = TokenUsage::new(100, 50);
    /// assert_eq!(usage.total_tokens, 150);
    /// ```
    pub fn new(prompt_tokens: usize, completion_tokens: usize) -> Self {
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

impl std::ops::AddAssign for TokenUsage {
    fn add_assign(&mut self, other: Self) {
        self.prompt_tokens += other.prompt_tokens;
        self.completion_tokens += other.completion_tokens;
        self.total_tokens += other.total_tokens;
    }
}

/// Completion response with message and optional token usage
#[derive(Debug, Clone)]
pub struct CompletionResponse {
    /// The response message from the AI
    pub message: Message,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

impl CompletionResponse {
    /// Create a new CompletionResponse
    pub fn new(message: Message) -> Self {
        Self {
            message,
            usage: None,
        }
    }

    /// Create a new CompletionResponse with token usage
    pub fn with_usage(message: Message, usage: TokenUsage) -> Self {
        Self {
            message,
            usage: Some(usage),
        }
    }
}

/// Geographic coordinate used to ground location queries
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
}

/// Grounding source for a single-shot request
#[derive(Debug, Clone, PartialEq)]
pub enum Grounding {
    /// Ground answers in map data, optionally around a user location
    Maps {
        /// Optional user coordinates
        location: Option<LatLng>,
    },
}

/// Stateless single-shot generation request
///
/// No conversation state and no tools; one outbound call.
#[derive(Debug, Clone, Default)]
pub struct GenerateRequest {
    /// Model override; the provider's configured model is used when `None`
    pub model: Option<String>,
    /// Prompt text
    pub prompt: String,
    /// Optional inline image or video frame to analyze
    pub image: Option<InlineImage>,
    /// Optional reasoning token budget
    pub thinking_budget: Option<u32>,
    /// Optional grounding source
    pub grounding: Option<Grounding>,
}

impl GenerateRequest {
    /// Create a text-only request
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            ..Self::default()
        }
    }

    /// Use a specific model for this request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Attach an inline image
    pub fn with_image(mut self, image: InlineImage) -> Self {
        self.image = Some(image);
        self
    }

    /// Grant a reasoning token budget
    pub fn with_thinking_budget(mut self, budget: u32) -> Self {
        self.thinking_budget = Some(budget);
        self
    }

    /// Ground the answer in a data source
    pub fn with_grounding(mut self, grounding: Grounding) -> Self {
        self.grounding = Some(grounding);
        self
    }
}

/// Response to a single-shot request
#[derive(Debug, Clone, Default)]
pub struct GenerateResponse {
    /// Concatenated text parts, if any
    pub text: Option<String>,
    /// Grounding chunks reported by the provider, passed through untouched
    pub grounding_chunks: Vec<serde_json::Value>,
    /// Optional token usage information
    pub usage: Option<TokenUsage>,
}

/// Provider trait for AI providers
///
/// All AI providers (Gemini, Ollama) must implement this trait.
///
/// # Examples
///
/// ```no_run
/// use wanderlust::providers::{Provider, Message, CompletionResponse};
/// use wanderlust::error::Result;
/// use async_trait::async_trait;
///
/// struct MyProvider;
///
/// #[async_trait]
/// impl Provider for MyProvider {
///     async fn complete(
///         &self,
///         messages: &[Message],
///         tools: &[serde_json::Value],
///     ) -> Result<CompletionResponse> {
///         Ok(CompletionResponse::new(Message::assistant("{}")))
///     }
/// }
/// ```
#[async_trait]
pub trait Provider: Send + Sync {
    /// Completes a conversation with the given messages and available tools
    ///
    /// # Arguments
    ///
    /// * `messages` - Conversation history
    /// * `tools` - Available tools for the assistant to use (as JSON schemas
    ///   of the form `{name, description, parameters}`)
    ///
    /// # Errors
    ///
    /// Returns error if the API call fails or response is invalid
    async fn complete(
        &self,
        messages: &[Message],
        tools: &[serde_json::Value],
    ) -> Result<CompletionResponse>;

    /// Run a stateless single-shot request
    ///
    /// The default implementation reports that single-shot queries are not
    /// supported.
    async fn generate(&self, _request: &GenerateRequest) -> Result<GenerateResponse> {
        Err(WanderlustError::Provider(
            "Single-shot generation is not supported by this provider".to_string(),
        )
        .into())
    }

    /// Get the name of the currently active model
    fn get_current_model(&self) -> Result<String> {
        Err(WanderlustError::Provider(
            "Current model information is not available from this provider".to_string(),
        )
        .into())
    }
}

/// Validates message sequence and removes orphan tool messages
///
/// An orphan tool message is one with role="tool" whose `tool_call_id` is
/// missing or does not match a tool call issued by a preceding assistant
/// message. Providers reject such sequences, so they are dropped with a
/// warning.
///
/// # Examples
///
/// ```
/// use wanderlust::providers::{Message, validate_message_sequence};
///
/// let messages = vec![
///     Message::user("Plan my trip."),
///     Message::tool_result("call_123", "search_food", "{}"),
/// ];
/// let validated = validate_message_sequence(&messages);
/// assert_eq!(validated.len(), 1);
/// ```
pub fn validate_message_sequence(messages: &[Message]) -> Vec<Message> {
    let mut valid_tool_ids: HashSet<&str> = HashSet::new();

    messages
        .iter()
        .filter_map(|message| {
            if message.role == "assistant" {
                for tool_call in message.requested_tool_calls() {
                    valid_tool_ids.insert(tool_call.id.as_str());
                }
            }

            if message.role == "tool" {
                match &message.tool_call_id {
                    Some(id) if valid_tool_ids.contains(id.as_str()) => {}
                    Some(id) => {
                        tracing::warn!("Dropping orphan tool message with tool_call_id: {}", id);
                        return None;
                    }
                    None => {
                        tracing::warn!("Dropping tool message without tool_call_id");
                        return None;
                    }
                }
            }

            Some(message.clone())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_user() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, Some("Hello".to_string()));
        assert!(msg.tool_calls.is_none());
        assert!(msg.images.is_empty());
    }

    #[test]
    fn test_message_user_with_image() {
        let image = InlineImage {
            mime_type: "image/jpeg".to_string(),
            data: "abcd".to_string(),
        };
        let msg = Message::user_with_image("Plan my trip.", image.clone());
        assert_eq!(msg.images, vec![image]);
    }

    #[test]
    fn test_message_assistant_with_tools() {
        let call = ToolCall::new("call_1", "search_transport", serde_json::json!({}));
        let msg = Message::assistant_with_tools(vec![call]);
        assert_eq!(msg.role, "assistant");
        assert!(msg.content.is_none());
        assert_eq!(msg.requested_tool_calls().len(), 1);
    }

    #[test]
    fn test_requested_tool_calls_empty_by_default() {
        assert!(Message::assistant("done").requested_tool_calls().is_empty());
    }

    #[test]
    fn test_message_serialization_skips_empty_fields() {
        let msg = Message::user("Test");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(!json.contains("images"));
        assert!(!json.contains("tool_name"));
    }

    #[test]
    fn test_inline_image_from_png_bytes() {
        let bytes = b"\x89PNG\r\n\x1a\n\0\0\0\rIHDR";
        let image = InlineImage::from_bytes(bytes).unwrap();
        assert_eq!(image.mime_type, "image/png");
        assert!(!image.data.is_empty());
    }

    #[test]
    fn test_inline_image_rejects_text() {
        assert!(InlineImage::from_bytes(b"definitely not an image").is_err());
    }

    #[tokio::test]
    async fn test_inline_image_from_missing_path() {
        let result = InlineImage::from_path(Path::new("/nonexistent/beach.png")).await;
        assert!(result.is_err());
    }

    #[test]
    fn test_token_usage_accumulates() {
        let mut usage = TokenUsage::new(10, 5);
        usage += TokenUsage::new(1, 2);
        assert_eq!(usage, TokenUsage::new(11, 7));
    }

    #[test]
    fn test_generate_request_builder() {
        let request = GenerateRequest::new("Best beaches near me")
            .with_model("gemini-2.5-flash")
            .with_thinking_budget(10)
            .with_grounding(Grounding::Maps { location: None });
        assert_eq!(request.model.as_deref(), Some("gemini-2.5-flash"));
        assert_eq!(request.thinking_budget, Some(10));
        assert!(request.image.is_none());
        assert_eq!(request.grounding, Some(Grounding::Maps { location: None }));
    }

    #[test]
    fn test_validate_message_sequence_keeps_matched_results() {
        let messages = vec![
            Message::user("Plan my trip."),
            Message::assistant_with_tools(vec![ToolCall::new(
                "call_1",
                "search_food",
                serde_json::json!({"destination": "Goa"}),
            )]),
            Message::tool_result("call_1", "search_food", "{}"),
        ];
        assert_eq!(validate_message_sequence(&messages).len(), 3);
    }

    #[test]
    fn test_validate_message_sequence_drops_orphans() {
        let mut untagged = Message::tool_result("x", "search_food", "{}");
        untagged.tool_call_id = None;
        let messages = vec![
            Message::user("Plan my trip."),
            Message::tool_result("call_9", "search_food", "{}"),
            untagged,
        ];
        let validated = validate_message_sequence(&messages);
        assert_eq!(validated.len(), 1);
        assert_eq!(validated[0].role, "user");
    }

    struct TextOnlyProvider;

    #[async_trait]
    impl Provider for TextOnlyProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[serde_json::Value],
        ) -> Result<CompletionResponse> {
            Ok(CompletionResponse::new(Message::assistant("ok")))
        }
    }

    #[tokio::test]
    async fn test_generate_not_supported_by_default() {
        let provider = TextOnlyProvider;
        let err = provider
            .generate(&GenerateRequest::new("hi"))
            .await
            .unwrap_err();
        assert!(err.to_string().contains("not supported"));
        assert!(provider.get_current_model().is_err());
    }
}
