//! Fetching a registry index

use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use dash_core::error::DashError;
use crate::api::DevfileMetaData;
use crate::client::{HttpClient, HttpResponse};
use crate::RegistryResult;

/// Loads the list of devfile records published at `href`.
///
/// Network and decoding failures are returned to the caller as they are.
#[async_trait]
pub trait FetchData: Send + Sync {
    async fn fetch_data(&self, href: &str) -> RegistryResult<Vec<DevfileMetaData>>;
}

#[async_trait]
impl<T: FetchData + ?Sized> FetchData for Arc<T> {
    async fn fetch_data(&self, href: &str) -> RegistryResult<Vec<DevfileMetaData>> {
        (**self).fetch_data(href).await
    }
}

/// [`FetchData`] over any client yielding [`HttpResponse`]s
#[derive(Debug, Clone)]
pub struct HttpFetcher<C> {
    client: C,
}

impl<C> HttpFetcher<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }
}

#[async_trait]
impl<C> FetchData for HttpFetcher<C>
where
    C: HttpClient<Response = HttpResponse, Error = DashError>,
{
    async fn fetch_data(&self, href: &str) -> RegistryResult<Vec<DevfileMetaData>> {
        debug!(href, "fetching registry index");
        let response = self.client.get(href).await?;
        response.json()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ReqwestClient;
    use wiremock::{MockServer, Mock, ResponseTemplate};
    use wiremock::matchers::{method, path};

    #[tokio::test]
    async fn test_fetch_index() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/devfiles/index.json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!([
                {
                    "displayName": "java-maven",
                    "icon": "/icon.png",
                    "tags": ["Java"],
                    "links": { "self": "/devfiles/java-maven/1.2.0" }
                },
                {
                    "displayName": "python",
                    "icon": "/python.svg",
                    "tags": ["Python"],
                    "links": {}
                }
            ])))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(ReqwestClient::new().unwrap());
        let records = fetcher
            .fetch_data(&format!("{}/devfiles/index.json", mock_server.uri()))
            .await
            .unwrap();

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].display_name, "java-maven");
        assert_eq!(records[1].display_name, "python");
    }

    #[tokio::test]
    async fn test_fetch_invalid_body() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(ReqwestClient::new().unwrap());
        let error = fetcher
            .fetch_data(&format!("{}/index", mock_server.uri()))
            .await
            .unwrap_err();

        assert!(matches!(error, DashError::JsonParse { .. }));
    }

    #[tokio::test]
    async fn test_fetch_propagates_http_error() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/index"))
            .respond_with(ResponseTemplate::new(500).set_body_string("registry down"))
            .mount(&mock_server)
            .await;

        let fetcher = HttpFetcher::new(ReqwestClient::new().unwrap());
        let error = fetcher
            .fetch_data(&format!("{}/index", mock_server.uri()))
            .await
            .unwrap_err();

        assert_eq!(error.status(), Some(500));
        assert_eq!(error.to_string(), "registry down");
    }
}
