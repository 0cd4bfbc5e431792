//! Agent request settings.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default response instruction sent with every agent request.
pub const DEFAULT_RESPONSE_INSTRUCTION: &str = "You will always maintain a friendly tone and provide concise response, use only our database to answer the question, answer always in brazilian portuguese";

/// Agent endpoint, model, and tool wiring.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AgentSettings {
    /// Full URL of the agent run endpoint.
    pub endpoint: String,
    /// Model name.
    pub model: String,
    /// Instruction shaping the agent's answers.
    pub response_instruction: String,
    /// Hard cap on round trips per request.
    pub max_iterations: u32,
    /// Name of the text-to-SQL tool.
    pub text_to_sql_tool: String,
    /// Name of the SQL execution tool.
    pub sql_exec_tool: String,
    /// Name of the chart tool.
    pub chart_tool: String,
    /// Whether the chart tool is offered to the agent.
    pub enable_chart_tool: bool,
    /// Semantic view backing the text-to-SQL tool.
    pub semantic_view: String,
    /// Experimental flags passed through verbatim.
    pub experimental: Value,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            model: "llama3.1-70b".to_string(),
            response_instruction: DEFAULT_RESPONSE_INSTRUCTION.to_string(),
            max_iterations: 10,
            text_to_sql_tool: "DATA_BETA".to_string(),
            sql_exec_tool: "sql_execution_tool".to_string(),
            chart_tool: "data_to_chart".to_string(),
            enable_chart_tool: false,
            semantic_view: "SNOWFLAKE_INTELLIGENCE.DATA.DATA_BETA".to_string(),
            experimental: Value::Object(serde_json::Map::new()),
        }
    }
}
