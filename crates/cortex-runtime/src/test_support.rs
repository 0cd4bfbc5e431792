//! Scripted fakes for the agent and query engine seams.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use cortex_agent::{AgentError, AgentRequest, AgentTransport};
use cortex_core::QueryId;
use cortex_sql::{QueryEngine, QueryError, QueryResult};
use serde_json::{Value, json};

/// One `message.delta` record carrying `content`.
pub fn delta(content: Value) -> String {
    format!(
        "event: message.delta\ndata: {}\n\n",
        json!({"delta": {"content": content}})
    )
}

/// Records followed by the termination sentinel.
pub fn stream(records: &[String]) -> String {
    let mut body = records.concat();
    body.push_str("event: done\ndata: [DONE]\n");
    body
}

/// Body of a round that only says `text`.
pub fn text_turn(text: &str) -> String {
    stream(&[delta(json!([{"type": "text", "text": text}]))])
}

/// Agent that replays scripted bodies and records every request.
pub struct ScriptedAgent {
    script: Mutex<VecDeque<Result<String, AgentError>>>,
    requests: Mutex<Vec<AgentRequest>>,
}

impl ScriptedAgent {
    pub fn new(script: Vec<Result<String, AgentError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn requests(&self) -> Vec<AgentRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl AgentTransport for ScriptedAgent {
    async fn send(&self, request: &AgentRequest) -> Result<String, AgentError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok(text_turn("script exhausted")))
    }
}

/// Query engine returning a fixed id and an optional fixed result.
pub struct StubQueryEngine {
    query_id: Option<String>,
    result: Option<QueryResult>,
    executed: Mutex<Vec<String>>,
    fetched: Mutex<Vec<(String, usize)>>,
}

impl StubQueryEngine {
    pub fn ok(query_id: &str) -> Self {
        Self {
            query_id: Some(query_id.into()),
            result: None,
            executed: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            query_id: None,
            ..Self::ok("")
        }
    }

    pub fn with_result(mut self, result: QueryResult) -> Self {
        self.result = Some(result);
        self
    }

    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<(String, usize)> {
        self.fetched.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryEngine for StubQueryEngine {
    async fn execute(&self, sql: &str) -> Result<QueryId, QueryError> {
        self.executed.lock().unwrap().push(sql.to_owned());
        match &self.query_id {
            Some(id) => Ok(QueryId::new(id.clone())),
            None => Err(QueryError::Api {
                status: 422,
                code: Some("001003".into()),
                message: "SQL compilation error".into(),
            }),
        }
    }

    async fn fetch(&self, query_id: &QueryId, limit: usize) -> Option<QueryResult> {
        self.fetched
            .lock()
            .unwrap()
            .push((query_id.to_string(), limit));
        self.result.clone()
    }
}
