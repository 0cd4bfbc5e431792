//! # cortex-core
//!
//! Foundation types shared by every Cortex crate:
//!
//! - **Content items**: `ContentItem` tagged union (text, tool use, tool results, chart)
//! - **Messages**: `Message` with `User` / `Assistant` roles, `ConversationInput`
//! - **Events**: `AgentEvent` decoded from the agent's event stream, `RawEvent` audit records
//! - **Turn results**: `TurnResult` per round trip, `CombinedResponse` across rounds
//! - **Identifiers**: `QueryId` newtype, tool-use id and pseudo query id generation
//! - **Logging**: `tracing` subscriber initialization

#![deny(unsafe_code)]

pub mod content;
pub mod events;
pub mod ids;
pub mod logging;
pub mod messages;
pub mod text;
pub mod turn;

pub use content::{ContentItem, ResultContent, ToolResult, ToolUse};
pub use events::{AgentEvent, EventError, RawEvent};
pub use ids::QueryId;
pub use messages::{ConversationInput, Message, Role};
pub use turn::{CombinedResponse, Termination, TurnResult};
