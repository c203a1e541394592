//! Notice-fetch collaborator
//!
//! The service that knows about credit notices is external. The timeline only
//! needs `fetch_notices(process_id, payment_method)`.

use async_trait::async_trait;
use reqwest::Client;

use super::error::{CreditsError, CreditsResult};
use super::types::CreditNotice;

/// Retrieves credit notices for one process / payment-method pair
#[async_trait]
pub trait NoticeFetcher: Send + Sync {
    async fn fetch_notices(
        &self,
        process_id: &str,
        payment_method: &str,
    ) -> CreditsResult<Vec<CreditNotice>>;
}

/// HTTP implementation
///
/// `GET {base_url}/credit-notices?process=..&payment_method=..` returning a
/// JSON array of notices.
pub struct HttpNoticeFetcher {
    client: Client,
    base_url: String,
}

impl HttpNoticeFetcher {
    pub fn new(base_url: impl Into<String>, request_timeout_ms: u64) -> CreditsResult<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(CreditsError::Config(
                "notice service URL is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()?;

        Ok(Self { client, base_url })
    }
}

#[async_trait]
impl NoticeFetcher for HttpNoticeFetcher {
    async fn fetch_notices(
        &self,
        process_id: &str,
        payment_method: &str,
    ) -> CreditsResult<Vec<CreditNotice>> {
        let url = format!("{}/credit-notices", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[("process", process_id), ("payment_method", payment_method)])
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CreditsError::Timeout
                } else if e.is_connect() {
                    CreditsError::Unavailable
                } else {
                    CreditsError::Request(e)
                }
            })?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(CreditsError::Api {
                status: status.as_u16(),
                message: text,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_notices() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/credit-notices"))
            .and(query_param("process", "proc-1"))
            .and(query_param("payment_method", "usda"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([
                {
                    "id": "n1",
                    "recipient": "r",
                    "quantity": "12",
                    "sender": "s",
                    "fromProcess": "src",
                    "ingestedAt": 1700000000
                }
            ])))
            .mount(&server)
            .await;

        let fetcher = HttpNoticeFetcher::new(server.uri(), 2_000).unwrap();
        let notices = fetcher.fetch_notices("proc-1", "usda").await.unwrap();

        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].quantity, "12");
    }

    #[test]
    fn test_empty_base_url_rejected() {
        assert!(matches!(
            HttpNoticeFetcher::new("  ", 1_000),
            Err(CreditsError::Config(_))
        ));
    }

    #[tokio::test]
    async fn test_fetch_notices_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503).set_body_string("down"))
            .mount(&server)
            .await;

        let fetcher = HttpNoticeFetcher::new(server.uri(), 2_000).unwrap();
        let err = fetcher.fetch_notices("p", "m").await.unwrap_err();

        assert!(matches!(err, CreditsError::Api { status: 503, .. }));
    }
}
