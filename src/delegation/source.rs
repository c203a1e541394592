//! Delegation data source
//!
//! The delegation service pages through every delegating wallet. Pages are
//! flattened into one list before any totals are computed.

use std::collections::HashSet;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use super::breakdown::DelegatorAccount;
use super::error::{DelegationError, DelegationResult};

/// One page of delegator accounts
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DelegationPage {
    #[serde(default)]
    pub items: Vec<DelegatorAccount>,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Paged access to delegator accounts
#[async_trait]
pub trait DelegationSource: Send + Sync {
    async fn fetch_page(&self, cursor: Option<&str>) -> DelegationResult<DelegationPage>;
}

/// Walk every page and flatten the results.
///
/// Fails with [`DelegationError::Pagination`] if the service hands back any
/// cursor it already returned.
pub async fn collect_all(source: &dyn DelegationSource) -> DelegationResult<Vec<DelegatorAccount>> {
    let mut accounts = Vec::new();
    let mut cursor: Option<String> = None;
    let mut seen: HashSet<String> = HashSet::new();
    let mut pages = 0usize;

    loop {
        let page = source.fetch_page(cursor.as_deref()).await?;
        pages += 1;
        accounts.extend(page.items);

        match page.next_cursor {
            Some(next) => {
                if !seen.insert(next.clone()) {
                    return Err(DelegationError::Pagination(format!(
                        "cursor {} repeated after {} pages",
                        next, pages
                    )));
                }
                cursor = Some(next);
            }
            None => break,
        }
    }

    tracing::debug!(pages, accounts = accounts.len(), "Collected delegation pages");
    Ok(accounts)
}

/// HTTP implementation
///
/// `GET {base_url}/delegations?limit=..[&cursor=..]` returning a
/// [`DelegationPage`].
pub struct HttpDelegationSource {
    client: Client,
    base_url: String,
    page_size: usize,
}

impl HttpDelegationSource {
    pub fn new(
        base_url: impl Into<String>,
        page_size: usize,
        request_timeout_ms: u64,
    ) -> DelegationResult<Self> {
        let base_url = base_url.into();
        if base_url.trim().is_empty() {
            return Err(DelegationError::Config(
                "delegation service URL is not set".to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_millis(request_timeout_ms))
            .build()?;

        Ok(Self {
            client,
            base_url,
            page_size,
        })
    }
}

#[async_trait]
impl DelegationSource for HttpDelegationSource {
    async fn fetch_page(&self, cursor: Option<&str>) -> DelegationResult<DelegationPage> {
        let url = format!("{}/delegations", self.base_url.trim_end_matches('/'));

        let mut request = self
            .client
            .get(&url)
            .query(&[("limit", self.page_size.to_string())]);
        if let Some(cursor) = cursor {
            request = request.query(&[("cursor", cursor)]);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                DelegationError::Timeout
            } else if e.is_connect() {
                DelegationError::Unavailable
            } else {
                DelegationError::Request(e)
            }
        })?;

        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            Err(DelegationError::Api {
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
    use std::sync::atomic::{AtomicUsize, Ordering};
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_collect_all_follows_cursor() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/delegations"))
            .and(query_param("cursor", "page-2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "wallet": "w2", "balance": 2, "delegationPrefs": [] }]
            })))
            .with_priority(1)
            .mount(&server)
            .await;

        Mock::given(method("GET"))
            .and(path("/delegations"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [{ "wallet": "w1", "balance": 1, "delegationPrefs": [] }],
                "nextCursor": "page-2"
            })))
            .with_priority(2)
            .mount(&server)
            .await;

        let source = HttpDelegationSource::new(server.uri(), 100, 2_000).unwrap();
        let accounts = collect_all(&source).await.unwrap();

        let wallets: Vec<&str> = accounts.iter().map(|a| a.wallet.as_str()).collect();
        assert_eq!(wallets, vec!["w1", "w2"]);
    }

    #[tokio::test]
    async fn test_collect_all_rejects_repeated_cursor() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "items": [],
                "nextCursor": "same"
            })))
            .mount(&server)
            .await;

        let source = HttpDelegationSource::new(server.uri(), 10, 2_000).unwrap();
        let err = collect_all(&source).await.unwrap_err();

        assert!(matches!(err, DelegationError::Pagination(_)));
    }

    struct CyclingSource {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl DelegationSource for CyclingSource {
        async fn fetch_page(&self, cursor: Option<&str>) -> DelegationResult<DelegationPage> {
            if self.calls.fetch_add(1, Ordering::SeqCst) > 10 {
                return Err(DelegationError::Unavailable);
            }
            let next = match cursor {
                Some("b") => "a",
                _ => "b",
            };
            Ok(DelegationPage {
                items: Vec::new(),
                next_cursor: Some(next.to_string()),
            })
        }
    }

    #[tokio::test]
    async fn test_collect_all_rejects_cursor_cycle() {
        let source = CyclingSource {
            calls: AtomicUsize::new(0),
        };

        let err = collect_all(&source).await.unwrap_err();

        assert!(matches!(err, DelegationError::Pagination(_)));
        assert_eq!(source.calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_fetch_page_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;

        let source = HttpDelegationSource::new(server.uri(), 10, 2_000).unwrap();
        let err = source.fetch_page(None).await.unwrap_err();

        assert!(matches!(err, DelegationError::Api { status: 500, .. }));
    }
}
