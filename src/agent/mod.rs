//! Agent module for Wanderlust
//!
//! This module contains the conversation transcript and the tool dispatch
//! loop that drives a planning session.

pub mod conversation;
pub mod core;

pub use conversation::Conversation;
pub use core::{Agent, AgentOutcome, ToolInvocation};
