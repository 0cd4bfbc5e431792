//! Agent request body.
//!
//! ```json
//! {
//!   "model": "llama3.1-70b",
//!   "response_instruction": "...",
//!   "experimental": {},
//!   "tools": [{"tool_spec": {"type": "cortex_analyst_text_to_sql", "name": "DATA_BETA"}}],
//!   "tool_resources": {"DATA_BETA": {"semantic_view": "DB.SCHEMA.VIEW"}},
//!   "tool_choice": {"type": "auto"},
//!   "messages": [...]
//! }
//! ```

use cortex_core::Message;
use cortex_settings::AgentSettings;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};

/// Tool type of the text-to-SQL tool.
pub const TEXT_TO_SQL_TYPE: &str = "cortex_analyst_text_to_sql";
/// Tool type of the SQL execution tool.
pub const SQL_EXEC_TYPE: &str = "sql_exec";
/// Tool type of the chart tool.
pub const CHART_TYPE: &str = "data_to_chart";

/// Tool declaration.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolSpec {
    /// Tool type.
    #[serde(rename = "type")]
    pub kind: String,
    /// Tool name, as referenced by `tool_use.name` and `tool_resources`.
    pub name: String,
}

/// Entry of the `tools` array.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tool {
    /// The declaration.
    pub tool_spec: ToolSpec,
}

impl Tool {
    /// Tool of the given type and name.
    pub fn new(kind: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            tool_spec: ToolSpec {
                kind: kind.into(),
                name: name.into(),
            },
        }
    }
}

/// `tool_choice` object.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolChoice {
    /// Choice mode.
    #[serde(rename = "type")]
    pub kind: String,
}

impl Default for ToolChoice {
    fn default() -> Self {
        Self {
            kind: "auto".to_string(),
        }
    }
}

/// One request to the agent endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AgentRequest {
    /// Model name.
    pub model: String,
    /// Answer-shaping instruction.
    pub response_instruction: String,
    /// Experimental flags, passed through.
    pub experimental: Value,
    /// Tools offered to the agent.
    pub tools: Vec<Tool>,
    /// Per-tool resources keyed by tool name.
    pub tool_resources: Value,
    /// Tool choice mode.
    pub tool_choice: ToolChoice,
    /// Full conversation so far.
    pub messages: Vec<Message>,
}

/// Per-call overrides of the settings-derived request fields.
#[derive(Clone, Debug, Default)]
pub struct RequestOptions {
    /// Replaces the configured experimental flags.
    pub experimental: Option<Value>,
    /// Replaces the tool list.
    pub tools: Option<Vec<Tool>>,
    /// Replaces the tool resources.
    pub tool_resources: Option<Value>,
    /// Replaces the response instruction.
    pub response_instruction: Option<String>,
}

/// Every request field except `messages`, fixed for one engine run.
#[derive(Clone, Debug, PartialEq)]
pub struct AgentRequestTemplate {
    model: String,
    response_instruction: String,
    experimental: Value,
    tools: Vec<Tool>,
    tool_resources: Value,
}

impl AgentRequestTemplate {
    /// Template from settings: text-to-SQL and SQL execution tools, plus
    /// the chart tool when enabled.
    pub fn from_settings(settings: &AgentSettings) -> Self {
        let mut tools = vec![
            Tool::new(TEXT_TO_SQL_TYPE, &settings.text_to_sql_tool),
            Tool::new(SQL_EXEC_TYPE, &settings.sql_exec_tool),
        ];
        if settings.enable_chart_tool {
            tools.push(Tool::new(CHART_TYPE, &settings.chart_tool));
        }

        let mut resources = Map::new();
        let _ = resources.insert(
            settings.text_to_sql_tool.clone(),
            json!({"semantic_view": settings.semantic_view}),
        );

        Self {
            model: settings.model.clone(),
            response_instruction: settings.response_instruction.clone(),
            experimental: settings.experimental.clone(),
            tools,
            tool_resources: Value::Object(resources),
        }
    }

    /// Apply per-call overrides.
    #[must_use]
    pub fn with_options(mut self, options: &RequestOptions) -> Self {
        if let Some(experimental) = &options.experimental {
            self.experimental = experimental.clone();
        }
        if let Some(tools) = &options.tools {
            self.tools = tools.clone();
        }
        if let Some(tool_resources) = &options.tool_resources {
            self.tool_resources = tool_resources.clone();
        }
        if let Some(instruction) = &options.response_instruction {
            self.response_instruction = instruction.clone();
        }
        self
    }

    /// Tools currently offered.
    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    /// Request carrying `messages`.
    pub fn build(&self, messages: Vec<Message>) -> AgentRequest {
        AgentRequest {
            model: self.model.clone(),
            response_instruction: self.response_instruction.clone(),
            experimental: self.experimental.clone(),
            tools: self.tools.clone(),
            tool_resources: self.tool_resources.clone(),
            tool_choice: ToolChoice::default(),
            messages,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_request_wire_shape() {
        let template = AgentRequestTemplate::from_settings(&AgentSettings::default());
        let request = template.build(vec![Message::user_text("quantos clientes?")]);
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "llama3.1-70b");
        assert_eq!(body["experimental"], json!({}));
        assert_eq!(body["tool_choice"], json!({"type": "auto"}));
        assert_eq!(
            body["tools"],
            json!([
                {"tool_spec": {"type": "cortex_analyst_text_to_sql", "name": "DATA_BETA"}},
                {"tool_spec": {"type": "sql_exec", "name": "sql_execution_tool"}}
            ])
        );
        assert_eq!(
            body["tool_resources"],
            json!({"DATA_BETA": {"semantic_view": "SNOWFLAKE_INTELLIGENCE.DATA.DATA_BETA"}})
        );
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"][0]["text"], "quantos clientes?");
        assert!(
            body["response_instruction"]
                .as_str()
                .unwrap()
                .contains("brazilian portuguese")
        );
    }

    #[test]
    fn chart_tool_added_when_enabled() {
        let settings = AgentSettings {
            enable_chart_tool: true,
            ..AgentSettings::default()
        };
        let template = AgentRequestTemplate::from_settings(&settings);
        assert_eq!(template.tools().len(), 3);
        assert_eq!(template.tools()[2], Tool::new("data_to_chart", "data_to_chart"));
    }

    #[test]
    fn options_override_fields() {
        let template = AgentRequestTemplate::from_settings(&AgentSettings::default()).with_options(
            &RequestOptions {
                experimental: Some(json!({"EnableRelatedQueries": true})),
                tools: Some(vec![Tool::new(SQL_EXEC_TYPE, "sql_execution_tool")]),
                tool_resources: None,
                response_instruction: Some("answer in English".into()),
            },
        );
        let request = template.build(Vec::new());
        assert_eq!(request.experimental["EnableRelatedQueries"], true);
        assert_eq!(request.tools.len(), 1);
        assert_eq!(request.response_instruction, "answer in English");
        assert!(request.tool_resources.get("DATA_BETA").is_some());
    }
}
