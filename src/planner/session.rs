//! Planning session
//!
//! A session validates the trip parameters, opens the conversation with the
//! instruction block and the optional inspiration image, runs the agent loop
//! and extracts the final plan.

use super::extract::extract_trip;
use super::input::TripInput;
use super::result::TripResult;
use crate::agent::{Agent, AgentOutcome, Conversation};
use crate::config::{Config, PlannerConfig};
use crate::error::{Result, WanderlustError};
use crate::prompts::{self, PLAN_REQUEST};
use crate::providers::{create_provider, Message, Provider};
use crate::tools::{StubCatalog, ToolRegistry};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// A finished planning session
#[derive(Debug, Clone)]
pub struct PlanOutcome {
    /// The extracted plan
    pub trip: TripResult,
    /// How the conversation went
    pub run: AgentOutcome,
}

/// Runs planning sessions against one provider and tool set
pub struct TripPlanner {
    provider: Arc<dyn Provider>,
    tools: ToolRegistry,
    config: PlannerConfig,
}

impl TripPlanner {
    /// Create a planner from its collaborators
    pub fn new(provider: Arc<dyn Provider>, tools: ToolRegistry, config: PlannerConfig) -> Self {
        Self {
            provider,
            tools,
            config,
        }
    }

    /// Create a planner with the configured provider and the stub catalog
    ///
    /// # Errors
    ///
    /// Returns `WanderlustError::MissingCredentials` if the provider needs an
    /// API key that is not available
    pub fn from_config(config: &Config) -> Result<Self> {
        let provider = create_provider(config)?;
        let tools = ToolRegistry::trip_tools(Arc::new(StubCatalog::new()?));
        Ok(Self::new(provider, tools, config.planner.clone()))
    }

    /// Opening turns of a session: the instruction block, then the request
    /// with the inspiration image when one was given
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use wanderlust::planner::{TripInput, TripPlanner};
    ///
    /// let input = TripInput::new(
    ///     "Austin",
    ///     "Lisbon",
    ///     NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
    ///     NaiveDate::from_ymd_opt(2026, 5, 6).unwrap(),
    ///     4500.0,
    /// );
    /// let conversation = TripPlanner::opening_conversation(&input);
    /// assert_eq!(conversation.len(), 2);
    /// assert_eq!(conversation.messages()[1].content.as_deref(), Some("Plan my trip."));
    /// ```
    pub fn opening_conversation(input: &TripInput) -> Conversation {
        let mut conversation = Conversation::new();
        conversation.add_system_message(prompts::build_system_prompt(input));
        match &input.image {
            Some(image) => conversation.push(Message::user_with_image(PLAN_REQUEST, image.clone())),
            None => conversation.add_user_message(PLAN_REQUEST),
        }
        conversation
    }

    /// Plan a trip
    ///
    /// # Errors
    ///
    /// - `WanderlustError::InvalidInput` if the parameters are rejected
    ///   before any request is sent
    /// - `WanderlustError::Provider` if a model request fails or the session
    ///   timeout elapses
    /// - `WanderlustError::Parse` if the final response is not a plan
    pub async fn plan(&self, input: &TripInput) -> Result<PlanOutcome> {
        input.validate()?;

        info!(
            "Planning trip {} -> {} ({} to {}, {} people)",
            input.from_location, input.destination, input.start_date, input.end_date, input.people
        );
        if input.image.is_some() {
            info!("Analyzing request and inspiration image");
        }

        let agent = Agent::new(
            Arc::clone(&self.provider),
            self.tools.clone(),
            self.config.max_steps,
        )?;
        let conversation = Self::opening_conversation(input);

        let run = if self.config.timeout_seconds > 0 {
            let limit = Duration::from_secs(self.config.timeout_seconds);
            tokio::time::timeout(limit, agent.run(conversation))
                .await
                .map_err(|_| {
                    WanderlustError::Provider(format!(
                        "Planning session timed out after {} seconds",
                        self.config.timeout_seconds
                    ))
                })??
        } else {
            agent.run(conversation).await?
        };

        if run.hit_step_limit {
            warn!(
                "Finalizing itinerary after hitting the step limit of {}",
                self.config.max_steps
            );
        } else {
            info!("Finalizing itinerary after {} steps", run.steps);
        }

        let trip = extract_trip(run.text.as_deref(), self.config.strict_validation)?;
        info!("Planned trip {} to {}", trip.trip_id, trip.destination);

        Ok(PlanOutcome { trip, run })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{CompletionResponse, InlineImage};
    use async_trait::async_trait;
    use chrono::NaiveDate;

    struct ScriptedProvider(Vec<Message>, std::sync::Mutex<usize>);

    #[async_trait]
    impl Provider for ScriptedProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[serde_json::Value],
        ) -> Result<CompletionResponse> {
            let mut index = self.1.lock().unwrap();
            let message = self.0.get(*index).cloned().unwrap_or_else(|| Message::assistant(""));
            *index += 1;
            Ok(CompletionResponse::new(message))
        }
    }

    fn planner(responses: Vec<Message>) -> TripPlanner {
        TripPlanner::new(
            Arc::new(ScriptedProvider(responses, std::sync::Mutex::new(0))),
            ToolRegistry::trip_tools(Arc::new(StubCatalog::new().unwrap())),
            PlannerConfig::default(),
        )
    }

    fn input() -> TripInput {
        TripInput::new(
            "Austin",
            "Lisbon",
            NaiveDate::from_ymd_opt(2026, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2026, 5, 3).unwrap(),
            3000.0,
        )
    }

    #[test]
    fn test_opening_conversation_attaches_image() {
        let mut trip = input();
        trip.image = Some(InlineImage {
            mime_type: "image/png".to_string(),
            data: "aGVsbG8=".to_string(),
        });
        let conversation = TripPlanner::opening_conversation(&trip);
        assert_eq!(conversation.messages()[0].role, "system");
        assert_eq!(conversation.messages()[1].images.len(), 1);
    }

    #[tokio::test]
    async fn test_plan_extracts_fenced_answer() {
        let planner = planner(vec![Message::assistant(
            "```json\n{\"tripId\": \"generate_uuid\", \"destination\": \"Lisbon\"}\n```",
        )]);
        let outcome = planner.plan(&input()).await.unwrap();
        assert_eq!(outcome.trip.destination, "Lisbon");
        assert_ne!(outcome.trip.trip_id, "generate_uuid");
        assert_eq!(outcome.run.steps, 0);
    }

    #[tokio::test]
    async fn test_invalid_input_sends_no_request() {
        let planner = planner(vec![]);
        let mut trip = input();
        trip.people = 0;
        let err = planner.plan(&trip).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<WanderlustError>(),
            Some(WanderlustError::InvalidInput(_))
        ));
    }

    #[tokio::test]
    async fn test_empty_answer_is_parse_error() {
        let planner = planner(vec![Message::assistant("   ")]);
        let err = planner.plan(&input()).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<WanderlustError>(),
            Some(WanderlustError::Parse(_))
        ));
    }

    struct StalledProvider;

    #[async_trait]
    impl Provider for StalledProvider {
        async fn complete(
            &self,
            _messages: &[Message],
            _tools: &[serde_json::Value],
        ) -> Result<CompletionResponse> {
            tokio::time::sleep(Duration::from_secs(30)).await;
            Ok(CompletionResponse::new(Message::assistant("{}")))
        }
    }

    #[tokio::test]
    async fn test_session_timeout_is_provider_error() {
        let config = PlannerConfig {
            timeout_seconds: 1,
            ..PlannerConfig::default()
        };
        let planner = TripPlanner::new(
            Arc::new(StalledProvider),
            ToolRegistry::trip_tools(Arc::new(StubCatalog::new().unwrap())),
            config,
        );
        let err = planner.plan(&input()).await.err().unwrap();
        assert!(matches!(
            err.downcast_ref::<WanderlustError>(),
            Some(WanderlustError::Provider(msg)) if msg.contains("timed out")
        ));
    }
}
