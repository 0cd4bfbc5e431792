//! # cortex-agent
//!
//! Everything needed for one round trip to the agent endpoint:
//!
//! - [`records`]: the two-line `event:` / `data:` record reader
//! - [`parser`]: records decoded into [`AgentEvent`](cortex_core::AgentEvent)s
//! - [`aggregator`]: events folded into one [`TurnResult`](cortex_core::TurnResult)
//! - [`request`]: the request body and its settings-derived template
//! - [`client`]: the [`AgentTransport`] seam and its reqwest implementation

#![deny(unsafe_code)]

pub mod aggregator;
pub mod client;
pub mod errors;
pub mod parser;
pub mod records;
pub mod request;

pub use aggregator::aggregate;
pub use client::{AgentTransport, CortexAgentClient, TOKEN_TYPE_HEADER};
pub use errors::{AgentError, ApiErrorInfo, parse_api_error};
pub use parser::parse_event_stream;
pub use records::{EventRecord, RecordReader, SENTINEL};
pub use request::{AgentRequest, AgentRequestTemplate, RequestOptions, Tool, ToolChoice, ToolSpec};
