//! Conversation transcript for a planning session
//!
//! The transcript is append-only: one session owns it and appends turns in
//! order. Token accounting prefers provider-reported usage and falls back to a
//! characters / 4 estimate.

use crate::providers::{Message, TokenUsage};

/// Append-only conversation history
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    messages: Vec<Message>,
    provider_token_usage: Option<TokenUsage>,
}

impl Conversation {
    /// Creates an empty conversation
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::agent::Conversation;
    ///
    /// let conversation = Conversation::new();
    /// assert!(conversation.is_empty());
    /// ```
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a system instruction
    pub fn add_system_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::system(content));
    }

    /// Adds a plain user turn
    pub fn add_user_message(&mut self, content: impl Into<String>) {
        self.messages.push(Message::user(content));
    }

    /// Appends an arbitrary message (for example a user turn with an image)
    pub fn push(&mut self, message: Message) {
        self.messages.push(message);
    }

    /// Adds one tool result correlated to a tool call
    ///
    /// # Examples
    ///
    /// ```
    /// use wanderlust::agent::Conversation;
    ///
    /// let mut conversation = Conversation::new();
    /// conversation.add_tool_result("call_1", "search_food", "{}");
    /// assert_eq!(conversation.messages()[0].role, "tool");
    /// ```
    pub fn add_tool_result(
        &mut self,
        tool_call_id: impl Into<String>,
        tool_name: impl Into<String>,
        content: impl Into<String>,
    ) {
        self.messages
            .push(Message::tool_result(tool_call_id, tool_name, content));
    }

    /// All messages in order
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Number of messages
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Whether the transcript is empty
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Number of tool result messages answering the given call ids
    pub fn count_results_for(&self, call_ids: &[&str]) -> usize {
        self.messages
            .iter()
            .filter(|m| m.role == "tool")
            .filter(|m| {
                m.tool_call_id
                    .as_deref()
                    .map(|id| call_ids.contains(&id))
                    .unwrap_or(false)
            })
            .count()
    }

    /// Accumulate provider-reported usage for one request
    pub fn record_usage(&mut self, usage: TokenUsage) {
        match self.provider_token_usage.as_mut() {
            Some(total) => *total += usage,
            None => self.provider_token_usage = Some(usage),
        }
    }

    /// Provider-reported usage accumulated so far, if any was reported
    pub fn provider_token_usage(&self) -> Option<TokenUsage> {
        self.provider_token_usage
    }

    /// Token count: provider total if known, otherwise an estimate
    pub fn token_count(&self) -> usize {
        self.provider_token_usage
            .map(|usage| usage.total_tokens)
            .unwrap_or_else(|| self.estimated_tokens())
    }

    fn estimated_tokens(&self) -> usize {
        self.messages
            .iter()
            .map(|m| {
                let content = m.content.as_deref().map(str::len).unwrap_or(0);
                let calls: usize = m
                    .requested_tool_calls()
                    .iter()
                    .map(|c| c.function.name.len() + c.function.arguments.len())
                    .sum();
                (content + calls) / 4
            })
            .sum()
    }
}
