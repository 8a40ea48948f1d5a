//! Network client for a running directory service

use super::error::{DirectoryError, DirectoryResult};
use super::DirectoryClient;
use crate::config::ApiConfig;
use crate::filter::FilterCriteria;
use crate::member::{Member, MemberId};
use crate::search::{ResultGroup, SearchResponse};
use async_trait::async_trait;
use reqwest::header::AUTHORIZATION;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Body of `GET /api/status`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceStatus {
    pub status: String,
    pub version: String,
    #[serde(default)]
    pub roster: Option<RosterStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStats {
    pub members: usize,
}

/// HTTP client for the directory service
///
/// Every request carries the configured key in `Authorization`.
pub struct RemoteClient {
    config: ApiConfig,
    http_client: Client,
}

impl RemoteClient {
    pub fn new(config: ApiConfig) -> Self {
        Self {
            config,
            http_client: Client::new(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder.header(AUTHORIZATION, self.config.api_key.as_str())
    }

    async fn read_json<T: DeserializeOwned>(response: Response) -> DirectoryResult<T> {
        let body = response.text().await?;
        Ok(serde_json::from_str(&body)?)
    }

    /// Turn a non-success reply into `DirectoryError::Api`
    async fn api_error(response: Response) -> DirectoryError {
        let status = response.status();
        let body: serde_json::Value = response
            .json()
            .await
            .unwrap_or_else(|_| serde_json::json!({}));
        let message = body
            .get("message")
            .or_else(|| body.get("error"))
            .and_then(|v| v.as_str())
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("Unknown error"))
            .to_string();

        DirectoryError::Api {
            status: status.as_u16(),
            message,
        }
    }

    pub async fn status(&self) -> DirectoryResult<ServiceStatus> {
        let response = self
            .http_client
            .get(self.config.endpoint("/api/status"))
            .send()
            .await?;

        if response.status().is_success() {
            Self::read_json(response).await
        } else {
            Err(Self::api_error(response).await)
        }
    }
}

#[async_trait]
impl DirectoryClient for RemoteClient {
    async fn search(&self, question: &str) -> DirectoryResult<Vec<ResultGroup>> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DirectoryError::EmptyQuestion);
        }

        let response = self
            .authorized(self.http_client.post(self.config.endpoint("/search")))
            .body(question.to_string())
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => {
                debug!("no experts matched the question");
                Ok(Vec::new())
            }
            s if s.is_success() => {
                let body: SearchResponse = Self::read_json(response).await?;
                Ok(body.into())
            }
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn list_members(&self) -> DirectoryResult<Vec<Member>> {
        let response = self
            .authorized(self.http_client.get(self.config.endpoint("/users")))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(Vec::new()),
            s if s.is_success() => Self::read_json(response).await,
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn get_member(&self, id: MemberId) -> DirectoryResult<Option<Member>> {
        let response = self
            .authorized(self.http_client.get(self.config.endpoint(&format!("/users/{id}"))))
            .send()
            .await?;

        match response.status() {
            StatusCode::NOT_FOUND => Ok(None),
            s if s.is_success() => Ok(Some(Self::read_json(response).await?)),
            _ => Err(Self::api_error(response).await),
        }
    }

    async fn filter_members(&self, criteria: &FilterCriteria) -> DirectoryResult<Vec<Member>> {
        let response = self
            .authorized(self.http_client.post(self.config.endpoint("/filter")))
            .json(&criteria.to_query_payload())
            .send()
            .await?;

        if response.status().is_success() {
            Self::read_json(response).await
        } else {
            Err(Self::api_error(response).await)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::http::HttpServer;
    use crate::roster::Roster;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    async fn spawn_service(members: Vec<Member>) -> String {
        let mut roster = Roster::new();
        for m in members {
            roster.insert(m);
        }
        let config = ServerConfig {
            api_key: "s3cret".to_string(),
            ..Default::default()
        };
        let server = HttpServer::new(Arc::new(RwLock::new(roster)), config);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = server.router();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn member(first: &str, org: &str) -> Member {
        let mut m = Member::new(0, first, "Test", format!("{}@example.org", first.to_lowercase()));
        m.affiliation_organization = org.to_string();
        m
    }

    #[tokio::test]
    async fn test_list_and_filter() {
        let url = spawn_service(vec![member("Ana", "Mila"), member("Bob", "CHUM")]).await;
        let client = RemoteClient::new(ApiConfig::new(url, "s3cret"));

        let all = client.list_members().await.unwrap();
        assert_eq!(all.len(), 2);

        let criteria = FilterCriteria::new().with_organizations(["chum"]);
        let filtered = client.filter_members(&criteria).await.unwrap();
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].first_name, "Bob");

        assert_eq!(client.get_member(MemberId::new(1)).await.unwrap().unwrap().first_name, "Ana");
        assert!(client.get_member(MemberId::new(42)).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_directory_is_empty_list() {
        let url = spawn_service(vec![]).await;
        let client = RemoteClient::new(ApiConfig::new(url, "s3cret"));
        assert!(client.list_members().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_wrong_key_is_unauthorized() {
        let url = spawn_service(vec![member("Ana", "Mila")]).await;
        let client = RemoteClient::new(ApiConfig::new(url, "wrong"));

        let err = client.list_members().await.unwrap_err();
        assert!(err.is_unauthorized());
        assert_eq!(err.to_string(), "API error (401): Unauthorized");
    }

    #[tokio::test]
    async fn test_status_is_public() {
        let url = spawn_service(vec![member("Ana", "Mila")]).await;
        let client = RemoteClient::new(ApiConfig::new(url, ""));

        let status = client.status().await.unwrap();
        assert_eq!(status.status, "healthy");
        assert_eq!(status.roster.unwrap().members, 1);
    }

    #[tokio::test]
    async fn test_search_not_found_is_no_experts() {
        // this service has no search route, so every search is a 404
        let url = spawn_service(vec![]).await;
        let client = RemoteClient::new(ApiConfig::new(url, "s3cret"));

        assert!(client.search("vision par ordinateur").await.unwrap().is_empty());
        assert!(matches!(client.search("  ").await, Err(DirectoryError::EmptyQuestion)));
    }
}
