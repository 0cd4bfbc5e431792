//! Content item types.
//!
//! These are the building blocks of both agent responses (`message.delta`
//! events) and the messages sent back to the agent. The serde layout matches
//! the Cortex Agents wire format, where each item nests its payload under a
//! key named after its type:
//!
//! ```json
//! {"type": "tool_use", "tool_use": {"tool_use_id": "t1", "name": "DATA_BETA", "input": {}}}
//! ```

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

fn empty_object() -> Value {
    Value::Object(Map::new())
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool use
// ─────────────────────────────────────────────────────────────────────────────

/// The agent's declared intent to invoke a named tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ToolUse {
    /// Tool use ID, unique within the assistant turn that introduces it.
    #[serde(rename = "tool_use_id")]
    pub id: String,
    /// Tool name (e.g. `DATA_BETA`, `sql_execution_tool`).
    pub name: String,
    /// Tool input.
    #[serde(default = "empty_object")]
    pub input: Value,
    /// Any additional fields the agent attached.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolUse {
    /// Create a tool use with no extra fields.
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
            extra: Map::new(),
        }
    }

    /// Copy reduced to `{id, name, input}`, dropping extra fields.
    #[must_use]
    pub fn reduced(&self) -> Self {
        Self::new(self.id.clone(), self.name.clone(), self.input.clone())
    }

    /// The `sql` string in this tool use's input, if any.
    pub fn input_sql(&self) -> Option<&str> {
        self.input.get("sql").and_then(Value::as_str)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tool result
// ─────────────────────────────────────────────────────────────────────────────

/// Status value the agent uses for successful tool results.
pub const STATUS_SUCCESS: &str = "success";

/// The outcome of a tool use, correlated by `tool_use_id`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ToolResult {
    /// ID of the tool use this result answers.
    #[serde(default)]
    pub tool_use_id: String,
    /// Tool name, when the producer included it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Execution status (`"success"`, `"error"`, ...).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Ordered result content.
    #[serde(default)]
    pub content: Vec<ResultContent>,
    /// Any additional fields, carried through unchanged.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ToolResult {
    /// Create a named tool result with JSON content.
    #[must_use]
    pub fn json(tool_use_id: impl Into<String>, name: impl Into<String>, value: Value) -> Self {
        Self {
            tool_use_id: tool_use_id.into(),
            name: Some(name.into()),
            status: None,
            content: vec![ResultContent::Json(value)],
            extra: Map::new(),
        }
    }

    /// Whether the status is absent or `"success"`.
    pub fn is_success(&self) -> bool {
        self.status.as_deref().is_none_or(|s| s == STATUS_SUCCESS)
    }

    /// Iterate over the JSON content values in order.
    pub fn json_values(&self) -> impl Iterator<Item = &Value> {
        self.content.iter().filter_map(ResultContent::as_json)
    }

    /// First `sql` string found in the JSON content.
    pub fn sql(&self) -> Option<&str> {
        self.json_values()
            .find_map(|v| v.get("sql").and_then(Value::as_str))
    }

    /// Every `query_id` string found in the JSON content, in order.
    pub fn query_ids(&self) -> impl Iterator<Item = &str> {
        self.json_values()
            .filter_map(|v| v.get("query_id").and_then(Value::as_str))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Result content
// ─────────────────────────────────────────────────────────────────────────────

/// One entry of a tool result's `content` list.
///
/// Shapes other than `json` / `text` are kept verbatim in [`ResultContent::Other`]
/// so results can be echoed back to the agent without loss.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(from = "Value", into = "Value")]
pub enum ResultContent {
    /// `{"type": "json", "json": ...}`
    Json(Value),
    /// `{"type": "text", "text": ...}`
    Text(String),
    /// Any other shape.
    Other(Value),
}

impl ResultContent {
    /// The JSON payload, if this is JSON content.
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Self::Json(v) => Some(v),
            Self::Text(_) | Self::Other(_) => None,
        }
    }
}

impl From<Value> for ResultContent {
    fn from(value: Value) -> Self {
        match value.get("type").and_then(Value::as_str) {
            Some("json") if value.get("json").is_some() => {
                Self::Json(value.get("json").cloned().unwrap_or_default())
            }
            Some("text") => match value.get("text").and_then(Value::as_str) {
                Some(text) => Self::Text(text.to_owned()),
                None => Self::Other(value),
            },
            _ => Self::Other(value),
        }
    }
}

impl From<ResultContent> for Value {
    fn from(content: ResultContent) -> Self {
        match content {
            ResultContent::Json(v) => json!({"type": "json", "json": v}),
            ResultContent::Text(t) => json!({"type": "text", "text": t}),
            ResultContent::Other(v) => v,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Content item
// ─────────────────────────────────────────────────────────────────────────────

/// A content item inside a `message.delta` event or a conversation message.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentItem {
    /// Narrative text.
    Text {
        /// The text.
        text: String,
    },
    /// Tool use intent.
    ToolUse {
        /// The tool use.
        tool_use: ToolUse,
    },
    /// Tool result (the wire tag is plural).
    #[serde(rename = "tool_results")]
    ToolResult {
        /// The tool result.
        tool_results: ToolResult,
    },
    /// Chart specification.
    Chart {
        /// Opaque chart payload.
        chart: Value,
    },
}

impl ContentItem {
    /// Create a text item.
    #[must_use]
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    /// Wrap a tool use.
    #[must_use]
    pub fn tool_use(tool_use: ToolUse) -> Self {
        Self::ToolUse { tool_use }
    }

    /// Wrap a tool result.
    #[must_use]
    pub fn tool_result(tool_results: ToolResult) -> Self {
        Self::ToolResult { tool_results }
    }

    /// The tool use, if this item is one.
    pub fn as_tool_use(&self) -> Option<&ToolUse> {
        match self {
            Self::ToolUse { tool_use } => Some(tool_use),
            _ => None,
        }
    }

    /// The tool result, if this item is one.
    pub fn as_tool_result(&self) -> Option<&ToolResult> {
        match self {
            Self::ToolResult { tool_results } => Some(tool_results),
            _ => None,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    #[test]
    fn tool_use_wire_format() {
        let item: ContentItem = serde_json::from_value(json!({
            "type": "tool_use",
            "tool_use": {"tool_use_id": "t1", "name": "DATA_BETA", "input": {"query": "q"}}
        }))
        .unwrap();
        let tool_use = item.as_tool_use().unwrap();
        assert_eq!(tool_use.id, "t1");
        assert_eq!(tool_use.name, "DATA_BETA");
        assert_eq!(tool_use.input["query"], "q");
    }

    #[test]
    fn tool_use_missing_input_defaults_to_object() {
        let tool_use: ToolUse =
            serde_json::from_value(json!({"tool_use_id": "t1", "name": "x"})).unwrap();
        assert_eq!(tool_use.input, json!({}));
    }

    #[test]
    fn tool_use_reduced_drops_extra_fields() {
        let tool_use: ToolUse = serde_json::from_value(json!({
            "tool_use_id": "t1", "name": "x", "input": {}, "client_side_execute": true
        }))
        .unwrap();
        assert!(tool_use.extra.contains_key("client_side_execute"));
        let reduced = tool_use.reduced();
        assert!(reduced.extra.is_empty());
        assert_eq!(
            serde_json::to_value(&reduced).unwrap(),
            json!({"tool_use_id": "t1", "name": "x", "input": {}})
        );
    }

    #[test]
    fn tool_results_tag_is_plural() {
        let item = ContentItem::tool_result(ToolResult::json("t1", "sql_execution_tool", json!({"query_id": "Q1"})));
        let value = serde_json::to_value(&item).unwrap();
        assert_eq!(value["type"], "tool_results");
        assert_eq!(value["tool_results"]["tool_use_id"], "t1");
        assert_eq!(value["tool_results"]["content"][0], json!({"type": "json", "json": {"query_id": "Q1"}}));
        assert!(value["tool_results"].get("status").is_none());
    }

    #[test]
    fn tool_result_keeps_unknown_fields() {
        let raw = json!({
            "tool_use_id": "t1",
            "status": "success",
            "content": [{"type": "json", "json": {"sql": "SELECT 1"}}],
            "trace_id": "abc"
        });
        let result: ToolResult = serde_json::from_value(raw.clone()).unwrap();
        assert_eq!(serde_json::to_value(&result).unwrap(), raw);
    }

    #[test]
    fn tool_result_sql_and_query_ids() {
        let result: ToolResult = serde_json::from_value(json!({
            "tool_use_id": "t1",
            "content": [
                {"type": "text", "text": "ignored"},
                {"type": "json", "json": {"sql": "SELECT 1", "query_id": "Q1"}},
                {"type": "json", "json": {"query_id": "Q2"}}
            ]
        }))
        .unwrap();
        assert_eq!(result.sql(), Some("SELECT 1"));
        assert_eq!(result.query_ids().collect::<Vec<_>>(), vec!["Q1", "Q2"]);
    }

    #[test]
    fn tool_result_success_status() {
        let mut result = ToolResult::default();
        assert!(result.is_success());
        result.status = Some("success".into());
        assert!(result.is_success());
        result.status = Some("error".into());
        assert!(!result.is_success());
    }

    #[test]
    fn unknown_result_content_is_preserved() {
        let raw = json!({"type": "image", "url": "https://x"});
        let content: ResultContent = serde_json::from_value(raw.clone()).unwrap();
        assert_matches!(content, ResultContent::Other(_));
        assert_eq!(serde_json::to_value(&content).unwrap(), raw);
    }

    #[test]
    fn text_result_content() {
        let content: ResultContent =
            serde_json::from_value(json!({"type": "text", "text": "hi"})).unwrap();
        assert_eq!(content, ResultContent::Text("hi".into()));
    }

    #[test]
    fn chart_item() {
        let item: ContentItem = serde_json::from_value(json!({
            "type": "chart", "chart": {"chart_spec": "{}"}
        }))
        .unwrap();
        assert_matches!(item, ContentItem::Chart { .. });
    }

    #[test]
    fn unknown_item_type_fails_to_decode() {
        let result = serde_json::from_value::<ContentItem>(json!({"type": "thinking", "thinking": {}}));
        assert!(result.is_err());
    }
}
