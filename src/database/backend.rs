use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// The request never produced a response (DNS, connect, timeout).
    #[error("{0}")]
    Transport(String),

    /// The backend answered with a non-success status.
    #[error("{message}")]
    Status { status: u16, message: String },

    /// The body did not have the expected shape.
    #[error("응답 형식 오류: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for BackendError {
    fn from(e: serde_json::Error) -> Self {
        BackendError::Decode(e.to_string())
    }
}

pub type BackendResult<T> = Result<T, BackendError>;

/// Row filter in PostgREST syntax, e.g. `status=eq.활성`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RowQuery {
    pub columns: Option<String>,
    pub filters: Vec<(String, String)>,
    pub order: Vec<String>,
    pub limit: Option<usize>,
}

impl RowQuery {
    pub fn select(columns: &str) -> Self {
        Self {
            columns: Some(columns.to_string()),
            ..Self::default()
        }
    }

    pub fn eq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("eq.{}", value)));
        self
    }

    pub fn neq(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("neq.{}", value)));
        self
    }

    pub fn gte(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("gte.{}", value)));
        self
    }

    pub fn lte(mut self, column: &str, value: impl std::fmt::Display) -> Self {
        self.filters
            .push((column.to_string(), format!("lte.{}", value)));
        self
    }

    /// Case-insensitive substring match on any of `columns`.
    pub fn any_ilike(mut self, columns: &[&str], needle: &str) -> Self {
        let needle = sanitize_like(needle);
        let parts = columns
            .iter()
            .map(|c| format!("{}.ilike.*{}*", c, needle))
            .collect::<Vec<_>>()
            .join(",");
        self.filters.push(("or".to_string(), format!("({})", parts)));
        self
    }

    pub fn order_asc(mut self, column: &str) -> Self {
        self.order.push(format!("{}.asc", column));
        self
    }

    pub fn order_desc(mut self, column: &str) -> Self {
        self.order.push(format!("{}.desc", column));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    pub fn to_params(&self) -> Vec<(String, String)> {
        let mut params = Vec::new();
        if let Some(cols) = &self.columns {
            params.push(("select".to_string(), cols.clone()));
        }
        params.extend(self.filters.iter().cloned());
        if !self.order.is_empty() {
            params.push(("order".to_string(), self.order.join(",")));
        }
        if let Some(limit) = self.limit {
            params.push(("limit".to_string(), limit.to_string()));
        }
        params
    }
}

// Characters with meaning inside an `or=(...)` group would break the filter.
fn sanitize_like(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '*' | '%'))
        .collect()
}

/// Everything the portal needs from the backend-as-a-service: read rows,
/// append rows and invoke stored procedures by name.
#[async_trait]
pub trait Backend: Send + Sync {
    async fn select(&self, table: &str, query: &RowQuery) -> BackendResult<Value>;
    async fn insert(&self, table: &str, rows: Value) -> BackendResult<()>;
    async fn rpc(&self, function: &str, params: Value) -> BackendResult<Value>;
}

pub struct RestBackend {
    client: reqwest::Client,
    base_url: String,
    anon_key: String,
}

impl RestBackend {
    pub fn new(base_url: &str, anon_key: &str, timeout: Duration) -> BackendResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Transport(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        })
    }

    fn headers(&self) -> BackendResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        let key = HeaderValue::from_str(&self.anon_key)
            .map_err(|e| BackendError::Transport(format!("invalid api key: {}", e)))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.anon_key))
            .map_err(|e| BackendError::Transport(format!("invalid api key: {}", e)))?;
        headers.insert("apikey", key);
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        Ok(headers)
    }

    async fn read_body(url: &str, resp: reqwest::Response) -> BackendResult<Value> {
        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| BackendError::Transport(e.to_string()))?;

        if !status.is_success() {
            let message = upstream_message(&text).unwrap_or_else(|| status.to_string());
            warn!(url = %url, status = status.as_u16(), message = %message, "backend_non_ok");
            return Err(BackendError::Status {
                status: status.as_u16(),
                message,
            });
        }

        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        Ok(serde_json::from_str(&text)?)
    }
}

fn upstream_message(body: &str) -> Option<String> {
    let parsed: Value = serde_json::from_str(body).ok()?;
    parsed
        .get("message")
        .or_else(|| parsed.get("error"))
        .and_then(|v| v.as_str())
        .map(|s| s.to_string())
}

#[async_trait]
impl Backend for RestBackend {
    async fn select(&self, table: &str, query: &RowQuery) -> BackendResult<Value> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self
            .client
            .get(&url)
            .headers(self.headers()?)
            .query(&query.to_params())
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "backend_unreachable");
                BackendError::Transport(e.to_string())
            })?;
        Self::read_body(&url, resp).await
    }

    async fn insert(&self, table: &str, rows: Value) -> BackendResult<()> {
        let url = format!("{}/rest/v1/{}", self.base_url, table);
        let resp = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .header("Prefer", "return=minimal")
            .json(&rows)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "backend_unreachable");
                BackendError::Transport(e.to_string())
            })?;
        Self::read_body(&url, resp).await.map(|_| ())
    }

    async fn rpc(&self, function: &str, params: Value) -> BackendResult<Value> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, function);
        let resp = self
            .client
            .post(&url)
            .headers(self.headers()?)
            .json(&params)
            .send()
            .await
            .map_err(|e| {
                warn!(url = %url, error = %e, "backend_unreachable");
                BackendError::Transport(e.to_string())
            })?;
        Self::read_body(&url, resp).await
    }
}
