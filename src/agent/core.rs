//! Agent core implementation with the tool dispatch loop
//!
//! This module implements the planning conversation loop that:
//! - Sends the conversation and tool manifest to the provider
//! - Dispatches every requested tool call of a step concurrently
//! - Appends one correlated tool result per call before the next request
//! - Stops on a response without tool calls or at the step ceiling

use crate::error::{Result, WanderlustError};
use crate::providers::{Message, Provider, TokenUsage, ToolCall};
use crate::tools::{ToolRegistry, ToolResult};
use futures::future::join_all;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

use super::Conversation;

/// Record of one tool invocation made during a run
#[derive(Debug, Clone, PartialEq)]
pub struct ToolInvocation {
    /// Correlation id of the call
    pub id: String,
    /// Tool name as requested by the model
    pub name: String,
    /// Raw JSON arguments
    pub arguments: String,
    /// Whether the tool produced a result (false means an error payload was sent)
    pub success: bool,
    /// Dispatch round the call belonged to, starting at 1
    pub step: usize,
}

/// Terminal state of an agent run
#[derive(Debug, Clone)]
pub struct AgentOutcome {
    /// Text of the final model response, if it had any
    pub text: Option<String>,
    /// Number of tool dispatch rounds performed
    pub steps: usize,
    /// Whether the run stopped because the step ceiling was reached
    pub hit_step_limit: bool,
    /// Every tool invocation in dispatch order
    pub invocations: Vec<ToolInvocation>,
    /// Full transcript including the final response
    pub conversation: Conversation,
}

impl AgentOutcome {
    /// Provider-reported token usage summed over the run
    pub fn usage(&self) -> Option<TokenUsage> {
        self.conversation.provider_token_usage()
    }

    /// Invocations of one tool, in dispatch order
    pub fn invocations_of<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a ToolInvocation> {
        self.invocations.iter().filter(move |inv| inv.name == name)
    }
}

/// Drives a function-calling conversation to a terminal response
///
/// The agent alternates between waiting on the model and waiting on tool
/// results. A step is one round of tool dispatch; after `max_steps` rounds the
/// most recent model response is taken as final even if it still asks for
/// tools.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use wanderlust::agent::{Agent, Conversation};
/// use wanderlust::config::OllamaConfig;
/// use wanderlust::providers::OllamaProvider;
/// use wanderlust::tools::{StubCatalog, ToolRegistry};
///
/// # async fn example() -> wanderlust::error::Result<()> {
/// let provider = Arc::new(OllamaProvider::new(OllamaConfig::default())?);
/// let tools = ToolRegistry::trip_tools(Arc::new(StubCatalog::new()?));
/// let agent = Agent::new(provider, tools, 7)?;
///
/// let mut conversation = Conversation::new();
/// conversation.add_user_message("Plan my trip.");
/// let outcome = agent.run(conversation).await?;
/// println!("{} steps", outcome.steps);
/// # Ok(())
/// # }
/// ```
pub struct Agent {
    provider: Arc<dyn Provider>,
    tools: ToolRegistry,
    max_steps: usize,
}

impl Agent {
    /// Creates a new agent
    ///
    /// # Arguments
    ///
    /// * `provider` - The model provider
    /// * `tools` - Tools offered to the model
    /// * `max_steps` - Maximum number of tool dispatch rounds
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::Config` if `max_steps` is zero
    pub fn new(provider: Arc<dyn Provider>, tools: ToolRegistry, max_steps: usize) -> Result<Self> {
        if max_steps == 0 {
            return Err(
                WanderlustError::Config("max_steps must be greater than 0".to_string()).into(),
            );
        }

        Ok(Self {
            provider,
            tools,
            max_steps,
        })
    }

    /// Runs the conversation until the model stops calling tools
    ///
    /// # Errors
    ///
    /// Provider failures are returned as is. Tool failures never are: they
    /// become `{"error": ...}` payloads and the conversation continues.
    pub async fn run(&self, mut conversation: Conversation) -> Result<AgentOutcome> {
        let start_time = Instant::now();
        let definitions = self.tools.all_definitions();
        let mut invocations = Vec::new();
        let mut steps = 0;
        let mut hit_step_limit = false;

        info!(
            "Starting agent run with {} tools, step limit {}",
            definitions.len(),
            self.max_steps
        );

        let mut response = self.request(&mut conversation, &definitions).await?;

        loop {
            let calls = response.requested_tool_calls().to_vec();
            if calls.is_empty() {
                debug!("Provider returned final response after {} steps", steps);
                break;
            }

            if steps >= self.max_steps {
                warn!(
                    "Step limit ({}) reached with {} pending tool calls, using last response as final",
                    self.max_steps,
                    calls.len()
                );
                hit_step_limit = true;
                break;
            }

            steps += 1;
            debug!(
                "Step {}/{}: dispatching {} tool calls, tokens: {}",
                steps,
                self.max_steps,
                calls.len(),
                conversation.token_count()
            );

            conversation.push(response);

            let results = join_all(calls.iter().map(|call| self.dispatch(call))).await;
            for (call, result) in calls.iter().zip(results) {
                invocations.push(ToolInvocation {
                    id: call.id.clone(),
                    name: call.function.name.clone(),
                    arguments: call.function.arguments.clone(),
                    success: result.success,
                    step: steps,
                });
                conversation.add_tool_result(&call.id, &call.function.name, result.to_payload());
            }

            response = self.request(&mut conversation, &definitions).await?;
        }

        let text = response.content.clone();
        conversation.push(response);

        info!(
            "Agent run completed in {} steps, {} tool calls, {} ms",
            steps,
            invocations.len(),
            start_time.elapsed().as_millis()
        );

        Ok(AgentOutcome {
            text,
            steps,
            hit_step_limit,
            invocations,
            conversation,
        })
    }

    async fn request(
        &self,
        conversation: &mut Conversation,
        definitions: &[serde_json::Value],
    ) -> Result<Message> {
        let completion = self
            .provider
            .complete(conversation.messages(), definitions)
            .await?;
        if let Some(usage) = completion.usage {
            conversation.record_usage(usage);
        }
        Ok(completion.message)
    }

    /// Executes one tool call, turning any failure into an error result
    async fn dispatch(&self, call: &ToolCall) -> ToolResult {
        match self.execute_tool_call(call).await {
            Ok(result) => result,
            Err(e) => {
                warn!("Tool call {} ({}) failed: {}", call.id, call.function.name, e);
                ToolResult::error(e.to_string())
            }
        }
    }

    async fn execute_tool_call(&self, tool_call: &ToolCall) -> Result<ToolResult> {
        let tool_name = &tool_call.function.name;
        debug!("Executing tool: {} ({})", tool_name, tool_call.id);

        let tool_executor = self.tools.resolve(tool_name)?;

        let raw = tool_call.function.arguments.trim();
        let args: serde_json::Value = if raw.is_empty() {
            serde_json::json!({})
        } else {
            serde_json::from_str(raw).map_err(|e| {
                WanderlustError::Tool(format!(
                    "Failed to parse tool arguments for '{}': {}",
                    tool_name, e
                ))
            })?
        };

        tool_executor.execute(args).await.map_err(|e| {
            anyhow::Error::from(WanderlustError::Tool(format!(
                "Tool '{}' execution failed: {}",
                tool_name, e
            )))
        })
    }

    /// Returns the number of registered tools
    pub fn num_tools(&self) -> usize {
        self.tools.len()
    }

    /// Returns the step ceiling
    pub fn max_steps(&self) -> usize {
        self.max_steps
    }
}
