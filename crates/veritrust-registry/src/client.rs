//! HTTP transport for registry requests.

use serde_json::Value;

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use crate::operation::{ItemParameters, Operation, OperationKind, SearchFilters};
use crate::request::RegistryRequest;

/// Sends registry requests with a fixed set of credentials.
///
/// No retries, caching or pagination: one operation is one HTTP call.
#[derive(Debug, Clone)]
pub struct RegistryClient {
    http: reqwest::Client,
    credentials: Credentials,
}

impl RegistryClient {
    pub fn new(credentials: Credentials) -> Self {
        Self::with_http_client(reqwest::Client::new(), credentials)
    }

    /// Use a caller-configured client (timeouts, proxies, TLS roots).
    pub fn with_http_client(http: reqwest::Client, credentials: Credentials) -> Self {
        Self { http, credentials }
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    /// Build the request for `operation` without sending it.
    pub fn prepare(&self, operation: &Operation) -> Result<RegistryRequest> {
        RegistryRequest::build(&self.credentials, operation)
    }

    pub async fn execute(&self, operation: &Operation) -> Result<Value> {
        let request = self.prepare(operation)?;
        self.send(request).await
    }

    /// Send a prepared request and parse the response body.
    pub async fn send(&self, request: RegistryRequest) -> Result<Value> {
        tracing::debug!(method = %request.method, url = %request.url, "sending registry request");

        let mut builder = self
            .http
            .request(request.method, &request.url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let resp = builder.send().await?;
        let status = resp.status();
        let text = resp.text().await?;

        if !status.is_success() {
            tracing::warn!(%status, url = %request.url, "registry returned an error status");
            return Err(Error::Api { status, body: text });
        }

        Ok(parse_body(&text))
    }

    /// Resolve `kind` against `params` (enforcing required parameters) and run it.
    pub async fn run(&self, kind: OperationKind, params: &ItemParameters) -> Result<Value> {
        self.execute(&Operation::resolve(kind, params)?).await
    }

    pub async fn list(&self, verified: bool) -> Result<Value> {
        self.execute(&Operation::List { verified }).await
    }

    pub async fn get(&self, uuid: impl Into<String>) -> Result<Value> {
        let params = ItemParameters {
            uuid: uuid.into(),
            ..Default::default()
        };
        self.run(OperationKind::Get, &params).await
    }

    pub async fn search(&self, filters: SearchFilters) -> Result<Value> {
        self.execute(&Operation::Search(filters)).await
    }

    pub async fn register(&self, agent_card_url: impl Into<String>) -> Result<Value> {
        let params = ItemParameters {
            agent_card_url: agent_card_url.into(),
            ..Default::default()
        };
        self.run(OperationKind::Register, &params).await
    }

    pub async fn reverify(&self, uuid: impl Into<String>) -> Result<Value> {
        let params = ItemParameters {
            uuid: uuid.into(),
            ..Default::default()
        };
        self.run(OperationKind::Reverify, &params).await
    }
}

/// Empty bodies become `null`; bodies that are not JSON are kept as a string.
fn parse_body(text: &str) -> Value {
    if text.trim().is_empty() {
        return Value::Null;
    }
    serde_json::from_str(text).unwrap_or_else(|_| Value::String(text.to_string()))
}
