//! Snowflake SQL REST API client.
//!
//! - `execute`: `POST /api/v2/statements`, returns `statementHandle`
//! - `fetch`: runs `SELECT * FROM TABLE(RESULT_SCAN('<id>'))` and reads the
//!   first result partition
//!
//! A `202 Accepted` response means the statement is still running; `fetch`
//! polls `GET /api/v2/statements/<handle>` until the statement timeout.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use cortex_auth::CredentialProvider;
use cortex_core::QueryId;
use cortex_core::text::truncate_str;
use cortex_settings::SnowflakeSettings;
use reqwest::StatusCode;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::engine::{QueryEngine, QueryResult, validate_query_id};
use crate::errors::QueryError;

const STATEMENTS_PATH: &str = "/api/v2/statements";
const TOKEN_TYPE_HEADER: &str = "x-snowflake-authorization-token-type";
const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Session context sent with every statement. Empty fields are omitted.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SessionContext {
    /// Database.
    pub database: String,
    /// Schema.
    pub schema: String,
    /// Warehouse.
    pub warehouse: String,
    /// Role.
    pub role: String,
    /// Server-side statement timeout in seconds.
    pub timeout_secs: u64,
}

impl SessionContext {
    /// Context from connection settings.
    pub fn from_settings(settings: &SnowflakeSettings) -> Self {
        Self {
            database: settings.database.clone(),
            schema: settings.schema.clone(),
            warehouse: settings.warehouse.clone(),
            role: settings.role.clone(),
            timeout_secs: settings.statement_timeout_secs,
        }
    }
}

#[derive(Serialize)]
struct StatementRequest<'a> {
    statement: &'a str,
    timeout: u64,
    #[serde(skip_serializing_if = "is_unset")]
    database: &'a str,
    #[serde(skip_serializing_if = "is_unset")]
    schema: &'a str,
    #[serde(skip_serializing_if = "is_unset")]
    warehouse: &'a str,
    #[serde(skip_serializing_if = "is_unset")]
    role: &'a str,
}

fn is_unset(value: &&str) -> bool {
    value.is_empty()
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct StatementResponse {
    statement_handle: Option<String>,
    code: Option<String>,
    message: Option<String>,
    result_set_meta_data: Option<ResultSetMetaData>,
    data: Vec<Vec<Value>>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct ResultSetMetaData {
    num_rows: Option<u64>,
    row_type: Vec<RowType>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RowType {
    name: String,
}

/// [`QueryEngine`] over the SQL REST API.
pub struct SnowflakeSqlApi {
    client: reqwest::Client,
    base_url: String,
    credentials: Arc<dyn CredentialProvider>,
    session: SessionContext,
    poll_interval: Duration,
}

impl std::fmt::Debug for SnowflakeSqlApi {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SnowflakeSqlApi")
            .field("base_url", &self.base_url)
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

impl SnowflakeSqlApi {
    /// Client for `base_url` (scheme and host, no path).
    pub fn new(
        base_url: impl Into<String>,
        credentials: Arc<dyn CredentialProvider>,
        session: SessionContext,
    ) -> Result<Self, QueryError> {
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(30))
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            credentials,
            session,
            poll_interval: DEFAULT_POLL_INTERVAL,
        })
    }

    /// Client from connection settings.
    pub fn from_settings(
        settings: &SnowflakeSettings,
        credentials: Arc<dyn CredentialProvider>,
    ) -> Result<Self, QueryError> {
        Self::new(
            settings.api_base_url(),
            credentials,
            SessionContext::from_settings(settings),
        )
    }

    /// Interval between status polls of a running statement.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    fn build_headers(&self) -> Result<HeaderMap, QueryError> {
        let token = self.credentials.bearer_token()?;
        let mut headers = HeaderMap::new();
        let _ = headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let _ = headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {token}")).map_err(|e| QueryError::Api {
                status: 0,
                code: None,
                message: format!("invalid authorization header: {e}"),
            })?,
        );
        let _ = headers.insert(
            TOKEN_TYPE_HEADER,
            HeaderValue::from_static(self.credentials.token_type()),
        );
        Ok(headers)
    }

    /// Submit a statement. Returns the HTTP status and parsed body.
    async fn submit(&self, sql: &str) -> Result<(StatusCode, StatementResponse), QueryError> {
        let body = StatementRequest {
            statement: sql,
            timeout: self.session.timeout_secs,
            database: &self.session.database,
            schema: &self.session.schema,
            warehouse: &self.session.warehouse,
            role: &self.session.role,
        };
        let response = self
            .client
            .post(format!("{}{STATEMENTS_PATH}", self.base_url))
            .headers(self.build_headers()?)
            .json(&body)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn status(&self, handle: &str) -> Result<(StatusCode, StatementResponse), QueryError> {
        let response = self
            .client
            .get(format!("{}{STATEMENTS_PATH}/{handle}", self.base_url))
            .headers(self.build_headers()?)
            .send()
            .await?;
        Self::read_response(response).await
    }

    async fn read_response(
        response: reqwest::Response,
    ) -> Result<(StatusCode, StatementResponse), QueryError> {
        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            let parsed: StatementResponse = serde_json::from_str(&text).unwrap_or_default();
            return Err(QueryError::Api {
                status: status.as_u16(),
                code: parsed.code,
                message: parsed
                    .message
                    .unwrap_or_else(|| format!("HTTP {}: {}", status.as_u16(), truncate_str(&text, 200))),
            });
        }
        Ok((status, serde_json::from_str(&text)?))
    }

    /// Run `sql` to completion, polling while the server reports it running.
    async fn run_to_completion(&self, sql: &str) -> Result<StatementResponse, QueryError> {
        let (mut status, mut response) = self.submit(sql).await?;
        let max_polls = poll_budget(self.session.timeout_secs, self.poll_interval);
        let mut polls = 0;
        while status == StatusCode::ACCEPTED {
            let handle = response
                .statement_handle
                .clone()
                .ok_or(QueryError::MissingHandle)?;
            if polls >= max_polls {
                return Err(QueryError::Api {
                    status: status.as_u16(),
                    code: response.code,
                    message: format!("statement {handle} still running after timeout"),
                });
            }
            polls += 1;
            debug!(%handle, polls, "statement still running");
            tokio::time::sleep(self.poll_interval).await;
            (status, response) = self.status(&handle).await?;
        }
        Ok(response)
    }
}

/// Number of status polls that fit in the statement timeout.
fn poll_budget(timeout_secs: u64, interval: Duration) -> u64 {
    let interval_ms = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX).max(1);
    timeout_secs.max(1).saturating_mul(1000).div_ceil(interval_ms)
}

/// Build a bounded result from the first partition.
fn into_result(response: StatementResponse, limit: usize) -> QueryResult {
    let meta = response.result_set_meta_data.unwrap_or_default();
    let columns: Vec<String> = meta.row_type.into_iter().map(|c| c.name).collect();
    let total_rows = meta
        .num_rows
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(response.data.len());
    let rows = response.data.into_iter().take(limit).collect();
    QueryResult {
        columns,
        rows,
        total_rows,
    }
}

#[async_trait]
impl QueryEngine for SnowflakeSqlApi {
    #[instrument(skip_all, fields(sql = truncate_str(sql, 80)))]
    async fn execute(&self, sql: &str) -> Result<QueryId, QueryError> {
        let (status, response) = self.submit(sql).await?;
        let handle = response.statement_handle.ok_or(QueryError::MissingHandle)?;
        debug!(%handle, status = status.as_u16(), "statement submitted");
        Ok(QueryId::new(handle))
    }

    #[instrument(skip_all, fields(query_id = %query_id, limit = limit))]
    async fn fetch(&self, query_id: &QueryId, limit: usize) -> Option<QueryResult> {
        if let Err(e) = validate_query_id(query_id) {
            warn!(error = %e, "refusing to fetch results");
            return None;
        }
        let sql = format!("SELECT * FROM TABLE(RESULT_SCAN('{query_id}'))");
        match self.run_to_completion(&sql).await {
            Ok(response) => {
                let result = into_result(response, limit);
                debug!(
                    columns = result.columns.len(),
                    rows = result.rows.len(),
                    total_rows = result.total_rows,
                    "fetched query result"
                );
                Some(result)
            }
            Err(e) => {
                warn!(error = %e, category = e.category(), "result fetch failed");
                None
            }
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
    use cortex_auth::StaticCredentialProvider;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn api(server: &MockServer) -> SnowflakeSqlApi {
        SnowflakeSqlApi::new(
            server.uri(),
            Arc::new(StaticCredentialProvider::keypair_jwt("jwt")),
            SessionContext {
                database: "SALES".into(),
                schema: "PUBLIC".into(),
                warehouse: "WH".into(),
                role: "ANALYST".into(),
                timeout_secs: 2,
            },
        )
        .unwrap()
        .with_poll_interval(Duration::from_millis(10))
    }

    fn result_body(rows: &Value, num_rows: u64) -> Value {
        json!({
            "statementHandle": "01b2-scan",
            "code": "090001",
            "message": "Statement executed successfully.",
            "resultSetMetaData": {
                "numRows": num_rows,
                "rowType": [{"name": "REGION"}, {"name": "TOTAL"}]
            },
            "data": rows
        })
    }

    #[tokio::test]
    async fn execute_returns_statement_handle() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v2/statements"))
            .and(header("authorization", "Bearer jwt"))
            .and(header("x-snowflake-authorization-token-type", "KEYPAIR_JWT"))
            .and(body_partial_json(json!({
                "statement": "SELECT 1",
                "timeout": 2,
                "database": "SALES",
                "role": "ANALYST"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "statementHandle": "01b2c3d4-0000-1a2b-0000-0001234abcd5"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let id = api(&server).execute("SELECT 1").await.unwrap();
        assert_eq!(id.as_str(), "01b2c3d4-0000-1a2b-0000-0001234abcd5");
    }

    #[tokio::test]
    async fn execute_failure_is_distinguishable() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(422).set_body_json(json!({
                "code": "002003",
                "message": "Object 'ORDERS' does not exist or not authorized."
            })))
            .mount(&server)
            .await;

        let err = api(&server).execute("SELECT * FROM ORDERS").await.unwrap_err();
        assert_matches!(err, QueryError::Api { status: 422, ref code, .. }
            if code.as_deref() == Some("002003"));
    }

    #[tokio::test]
    async fn execute_without_handle_fails() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"code": "090001"})))
            .mount(&server)
            .await;

        let err = api(&server).execute("SELECT 1").await.unwrap_err();
        assert_matches!(err, QueryError::MissingHandle);
    }

    #[tokio::test]
    async fn fetch_reads_result_scan_and_truncates() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(body_partial_json(json!({
                "statement": "SELECT * FROM TABLE(RESULT_SCAN('Q123'))"
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(result_body(
                &json!([["Sul", "10"], ["Norte", "7"], ["Leste", null]]),
                120,
            )))
            .expect(1)
            .mount(&server)
            .await;

        let result = api(&server).fetch(&QueryId::new("Q123"), 2).await.unwrap();
        assert_eq!(result.columns, vec!["REGION", "TOTAL"]);
        assert_eq!(result.rows.len(), 2);
        assert_eq!(result.rows[0], vec![json!("Sul"), json!("10")]);
        assert_eq!(result.total_rows, 120);
    }

    #[tokio::test]
    async fn fetch_polls_running_statement() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(202).set_body_json(json!({
                "statementHandle": "01b2-scan",
                "code": "333334",
                "message": "Asynchronous execution in progress."
            })))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v2/statements/01b2-scan"))
            .respond_with(
                ResponseTemplate::new(200).set_body_json(result_body(&json!([["Sul", "10"]]), 1)),
            )
            .expect(1)
            .mount(&server)
            .await;

        let result = api(&server).fetch(&QueryId::new("Q123"), 50).await.unwrap();
        assert_eq!(result.rows.len(), 1);
        assert_eq!(result.total_rows, 1);
    }

    #[tokio::test]
    async fn fetch_failure_is_none() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&server)
            .await;

        assert!(api(&server).fetch(&QueryId::new("Q123"), 50).await.is_none());
    }

    #[tokio::test]
    async fn fetch_rejects_unsafe_id_without_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let id = QueryId::new("x')); DROP TABLE t; --");
        assert!(api(&server).fetch(&id, 50).await.is_none());
    }

    #[test]
    fn total_rows_falls_back_to_data_length() {
        let response = StatementResponse {
            data: vec![vec![json!("a")], vec![json!("b")]],
            ..StatementResponse::default()
        };
        assert_eq!(into_result(response, 1).total_rows, 2);
    }

    #[test]
    fn poll_budget_covers_timeout() {
        assert_eq!(poll_budget(2, Duration::from_millis(500)), 4);
        assert_eq!(poll_budget(0, Duration::from_millis(500)), 2);
    }

    #[test]
    fn poll_budget_saturates_on_huge_timeout() {
        assert_eq!(poll_budget(u64::MAX, Duration::from_millis(1)), u64::MAX);
        assert_eq!(
            poll_budget(u64::MAX, Duration::from_secs(1)),
            u64::MAX.div_ceil(1000)
        );
    }
}
