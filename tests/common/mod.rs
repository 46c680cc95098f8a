//! Shared fixtures for the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::NaiveDate;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;
use tempfile::TempDir;
use wanderlust::error::{Result, WanderlustError};
use wanderlust::planner::{Currency, FoodOption, TransportOption, TripInput};
use wanderlust::providers::{CompletionResponse, Message, Provider, ToolCall};
use wanderlust::storage::SqliteTripStore;
use wanderlust::tools::catalog::{StayListing, StayQuery, TransportQuery, TravelCatalog};

/// Provider replaying a fixed script of assistant turns
///
/// Once the script is exhausted the fallback turn is repeated. Every
/// transcript the provider is asked to complete is recorded.
pub struct ScriptedProvider {
    replies: Mutex<VecDeque<Message>>,
    fallback: Message,
    seen: Mutex<Vec<Vec<Message>>>,
}

impl ScriptedProvider {
    pub fn new(replies: Vec<Message>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            fallback: Message::assistant(""),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub fn repeating(reply: Message) -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            fallback: reply,
            seen: Mutex::new(Vec::new()),
        }
    }

    /// Number of completion requests received
    pub fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }

    /// Transcript sent with the n-th request
    pub fn transcript(&self, n: usize) -> Vec<Message> {
        self.seen.lock().unwrap()[n].clone()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    async fn complete(&self, messages: &[Message], _tools: &[Value]) -> Result<CompletionResponse> {
        self.seen.lock().unwrap().push(messages.to_vec());
        let reply = self
            .replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());
        Ok(CompletionResponse::new(reply))
    }
}

/// Catalog whose every lookup fails
pub struct FailingCatalog;

#[async_trait]
impl TravelCatalog for FailingCatalog {
    async fn search_transport(&self, _query: &TransportQuery) -> Result<Vec<TransportOption>> {
        Err(WanderlustError::Provider("Failed to fetch data".to_string()).into())
    }

    async fn search_accommodation(&self, _query: &StayQuery) -> Result<Vec<StayListing>> {
        Err(WanderlustError::Provider("Failed to fetch data".to_string()).into())
    }

    async fn search_food(&self, _destination: &str) -> Result<Vec<FoodOption>> {
        Err(WanderlustError::Provider("Failed to fetch data".to_string()).into())
    }
}

pub fn call(id: &str, name: &str, args: Value) -> ToolCall {
    ToolCall::new(id, name, args)
}

/// The three lookups a planning model typically issues in one turn
pub fn goa_lookups() -> Message {
    Message::assistant_with_tools(vec![
        call(
            "call_1",
            "search_transport",
            json!({"from": "Delhi", "to": "Goa, India", "date": "2026-12-20", "mode": "train"}),
        ),
        call(
            "call_2",
            "search_accommodation",
            json!({"destination": "Goa, India", "type": "hotel", "budgetLevel": "mid_range"}),
        ),
        call("call_3", "search_food", json!({"destination": "Goa, India"})),
    ])
}

pub fn goa_input() -> TripInput {
    let mut input = TripInput::new(
        "Delhi",
        "Goa, India",
        NaiveDate::from_ymd_opt(2026, 12, 20).unwrap(),
        NaiveDate::from_ymd_opt(2026, 12, 23).unwrap(),
        80000.0,
    );
    input.currency = Currency::Inr;
    input.people = 2;
    input
}

/// A complete final answer for the Goa trip, without markdown
pub fn goa_plan_json() -> String {
    json!({
        "tripId": "generate_uuid",
        "destination": "Goa, India",
        "people": 2,
        "currency": "INR",
        "vibeAnalysis": "Beaches and seafood",
        "status": "draft",
        "transportOptions": [
            {"id": "t_1", "type": "train", "provider": "Vande Bharat Exp", "cost": 3000, "booked": false},
            {"id": "t_2", "type": "train", "provider": "Rajdhani Express", "cost": 3600, "booked": false},
            {"id": "t_3", "type": "train", "provider": "Shatabdi Express", "cost": 2550, "booked": false}
        ],
        "accommodationOptions": [
            {"id": "a_1", "name": "Grand Goa, India Hotel", "costPerNight": 6000, "totalCost": 18000},
            {"id": "a_2", "name": "Goa, India Boutique Stay", "costPerNight": 5100, "totalCost": 15300},
            {"id": "a_3", "name": "Cozy Corner Goa, India", "costPerNight": 3900, "totalCost": 11700}
        ],
        "foodOptions": [
            {"id": "f_1", "name": "The Spice Route", "costPerPerson": 3000},
            {"id": "f_2", "name": "Coastal Flavors", "costPerPerson": 1500},
            {"id": "f_3", "name": "Chaat Bazaar", "costPerPerson": 500}
        ],
        "selectedTransportId": "t_1",
        "selectedAccommodationId": "a_1",
        "selectedFoodId": "f_2",
        "estimatedCosts": {"food": 9000, "activities": 4000},
        "itinerary": [
            {"day": 1, "date": "2026-12-20", "theme": "Arrival", "items": [
                {"id": "i_1", "time": "Morning", "activity": "Breakfast at a beach shack", "costEstimate": 400},
                {"id": "i_2", "time": "1:00 PM", "activity": "Lunch at Coastal Flavors", "costEstimate": 1500},
                {"id": "i_3", "time": "8:00 PM", "activity": "Dinner at The Spice Route", "costEstimate": 3000}
            ]}
        ]
    })
    .to_string()
}

pub fn create_temp_store() -> (SqliteTripStore, TempDir) {
    let tmp = TempDir::new().expect("failed to create tempdir");
    let db_path = tmp.path().join("trips.db");
    let store = SqliteTripStore::new_with_path(db_path).expect("failed to create sqlite store with path");
    (store, tmp)
}

pub fn temp_config_file(contents: &str) -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().expect("failed to create tempdir");
    let config_path = temp_dir.path().join("config.yaml");
    fs::write(&config_path, contents).expect("failed to write config file");
    (temp_dir, config_path)
}
