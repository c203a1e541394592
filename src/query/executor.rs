//! Query Execution
//!
//! Sends built queries to an Arweave GraphQL gateway. The executor is a
//! trait so the API layer and tests can swap the HTTP client out.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::error::{QueryError, QueryResult};
use super::render::GraphqlRequest;

/// Something that can run a GraphQL request and hand back the raw response
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    async fn execute(&self, request: &GraphqlRequest) -> QueryResult<Value>;
}

/// Gateway connection settings
#[derive(Debug, Clone, Deserialize)]
pub struct GatewayConfig {
    /// Base URL, e.g. "https://arweave.net"
    #[serde(default = "default_gateway_url")]
    pub url: String,
    /// Request timeout in milliseconds
    #[serde(default = "default_gateway_timeout")]
    pub request_timeout_ms: u64,
}

fn default_gateway_url() -> String {
    "https://arweave.net".to_string()
}

fn default_gateway_timeout() -> u64 {
    15_000
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            url: default_gateway_url(),
            request_timeout_ms: default_gateway_timeout(),
        }
    }
}

impl GatewayConfig {
    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.url.trim_end_matches('/'))
    }
}

/// HTTP client for an Arweave GraphQL gateway
pub struct GatewayClient {
    client: Client,
    config: GatewayConfig,
}

impl GatewayClient {
    pub fn new(config: GatewayConfig) -> QueryResult<Self> {
        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(config.request_timeout_ms))
            .build()?;

        Ok(Self { client, config })
    }

    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }
}

fn classify(e: reqwest::Error) -> QueryError {
    if e.is_timeout() {
        QueryError::Timeout
    } else if e.is_connect() {
        QueryError::Unavailable
    } else {
        QueryError::Request(e)
    }
}

#[async_trait]
impl QueryExecutor for GatewayClient {
    async fn execute(&self, request: &GraphqlRequest) -> QueryResult<Value> {
        let url = self.config.graphql_url();
        tracing::debug!(url = %url, "Executing gateway query");

        let response = self
            .client
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(QueryError::Gateway {
                status: status.as_u16(),
                message: text,
            });
        }

        let body: Value = response.json().await.map_err(classify)?;

        // Partial results are passed through for display
        let has_data = body.get("data").map(|d| !d.is_null()).unwrap_or(false);
        if !has_data {
            if let Some(errors) = body.get("errors") {
                return Err(QueryError::Graphql(errors.to_string()));
            }
        }

        Ok(body)
    }
}

/// What the user sees after pressing "Query"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ExecutionOutcome {
    Response(Value),
    Failed { error: String },
}

impl ExecutionOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Run a request, turning any failure into an `{error}` payload.
pub async fn execute_for_display(
    executor: &dyn QueryExecutor,
    request: &GraphqlRequest,
) -> ExecutionOutcome {
    match executor.execute(request).await {
        Ok(value) => ExecutionOutcome::Response(value),
        Err(e) => {
            tracing::warn!(error = %e, "Query execution failed");
            ExecutionOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{build_query, QueryFields, QueryFilters};
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(server: &MockServer) -> GatewayClient {
        GatewayClient::new(GatewayConfig {
            url: server.uri(),
            request_timeout_ms: 2_000,
        })
        .unwrap()
    }

    fn sample_request() -> GraphqlRequest {
        let filters = QueryFilters {
            owner: "owner-1".to_string(),
            ..Default::default()
        };
        build_query(&filters, &QueryFields::default(), 5).to_request()
    }

    #[test]
    fn test_graphql_url_trims_slash() {
        let config = GatewayConfig {
            url: "https://arweave.net/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.graphql_url(), "https://arweave.net/graphql");
    }

    #[tokio::test]
    async fn test_execute_returns_raw_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/graphql"))
            .and(body_string_contains("owner-1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "data": { "transactions": { "edges": [] } }
            })))
            .mount(&server)
            .await;

        let body = client_for(&server).execute(&sample_request()).await.unwrap();
        assert_eq!(body["data"]["transactions"]["edges"], json!([]));
    }

    #[tokio::test]
    async fn test_execute_maps_http_status() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(502).set_body_string("bad gateway"))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .execute(&sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Gateway { status: 502, .. }));
    }

    #[tokio::test]
    async fn test_execute_graphql_errors_without_data() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errors": [{ "message": "bad query" }]
            })))
            .mount(&server)
            .await;

        let err = client_for(&server)
            .execute(&sample_request())
            .await
            .unwrap_err();
        assert!(matches!(err, QueryError::Graphql(msg) if msg.contains("bad query")));
    }

    #[tokio::test]
    async fn test_execute_for_display_wraps_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let client = client_for(&server);
        let outcome = execute_for_display(&client, &sample_request()).await;

        assert!(outcome.is_failed());
        let json = serde_json::to_value(&outcome).unwrap();
        assert!(json["error"].as_str().unwrap().contains("500"));
    }
}
