//! Client for the unified recommendation endpoints.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

use super::fallback::FallbackPolicy;
use super::models::*;
use super::FetchOutcome;
use crate::wizard::{Domain, Preferences};

/// Message used when a failed response carries no `detail`.
const GENERIC_FAILURE: &str = "Failed to get recommendations";

/// API client errors.
#[derive(Debug, Error)]
pub enum ApiClientError {
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Server returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Client for `POST /recommendations/{,anime/,movies/}`.
#[derive(Debug, Clone)]
pub struct RecommendationClient {
    /// HTTP client
    client: Client,

    /// Base server URL
    base_url: String,

    /// What to substitute when a request fails
    fallback: FallbackPolicy,
}

impl RecommendationClient {
    /// Create a new client.
    pub fn new(base_url: impl Into<String>, fallback: FallbackPolicy) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            fallback,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, domain: Domain) -> String {
        format!("{}{}", self.base_url, domain.endpoint())
    }

    /// POST a JSON body and decode a JSON reply.
    async fn post<B: Serialize, T: DeserializeOwned>(
        &self,
        url: &str,
        body: &B,
    ) -> Result<T, ApiClientError> {
        let response = self.client.post(url).json(body).send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorBody>(&text)
                .ok()
                .and_then(|body| body.message())
                .unwrap_or_else(|| String::from(GENERIC_FAILURE));
            return Err(ApiClientError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str(&text).map_err(|e| {
            ApiClientError::InvalidResponse(format!(
                "Failed to parse response: {}. Body: {}",
                e,
                text.chars().take(500).collect::<String>()
            ))
        })
    }

    /// Fetch recommendations for `titles` in `domain`.
    pub async fn fetch_recommendations(
        &self,
        domain: Domain,
        titles: &[String],
        preferences: &Preferences,
    ) -> Result<Vec<Recommendation>, ApiClientError> {
        let url = self.url(domain);
        let request = RecommendationRequest::new(domain, titles.to_vec(), preferences.clone());

        let recommendations = match domain {
            Domain::Books => {
                let response: RecommendationsResponse<BookRecommendation> =
                    self.post(&url, &request).await?;
                response
                    .recommendations
                    .into_iter()
                    .map(Recommendation::Book)
                    .collect()
            }
            Domain::Anime => {
                let response: RecommendationsResponse<AnimeRecommendation> =
                    self.post(&url, &request).await?;
                response
                    .recommendations
                    .into_iter()
                    .map(Recommendation::Anime)
                    .collect()
            }
            Domain::Movies => {
                let response: RecommendationsResponse<MovieRecommendation> =
                    self.post(&url, &request).await?;
                response
                    .recommendations
                    .into_iter()
                    .map(Recommendation::Movie)
                    .collect()
            }
        };

        Ok(recommendations)
    }

    /// Fetch recommendations, substituting the fallback list on any failure.
    /// Always resolves.
    pub async fn recommend(
        &self,
        domain: Domain,
        titles: &[String],
        preferences: &Preferences,
    ) -> FetchOutcome {
        match self.fetch_recommendations(domain, titles, preferences).await {
            Ok(recommendations) => {
                tracing::info!(
                    "Received {} {} recommendations",
                    recommendations.len(),
                    domain.name()
                );
                FetchOutcome::Fresh(recommendations)
            }
            Err(e) => {
                tracing::warn!("Error getting {} recommendations: {}", domain.name(), e);
                FetchOutcome::ServiceUnavailable {
                    reason: failure_reason(&e),
                    fallback: self.fallback.records(domain),
                }
            }
        }
    }
}

/// The message a failed request is reported with: the service `detail` when
/// there was one.
fn failure_reason(error: &ApiClientError) -> String {
    match error {
        ApiClientError::Status { message, .. } => message.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_server::{closed_url, serve_once};
    use crate::wizard::PreferenceField;

    fn titles() -> Vec<String> {
        vec![String::from("Dune"), String::from("1984")]
    }

    #[tokio::test]
    async fn test_books_request_and_response() {
        let body = r#"{"recommendations": [
            {"id": "b1", "title": "Hyperion", "author": "Dan Simmons", "rating": 4.2,
             "image": "https://example.com/h.jpg", "year": 1989}
        ], "domain": "book"}"#;
        let (url, request) = serve_once("200 OK", body).await;
        let client = RecommendationClient::new(url, FallbackPolicy::Sample);

        let mut prefs = Preferences::default();
        prefs.set(PreferenceField::Genre, "scifi");
        let recs = client
            .fetch_recommendations(Domain::Books, &titles(), &prefs)
            .await
            .unwrap();

        assert_eq!(recs.len(), 1);
        assert_eq!(recs[0].title(), "Hyperion");

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /recommendations/ HTTP/1.1"));
        assert!(raw.to_ascii_lowercase().contains("content-type: application/json"));
        let json_start = raw.find("\r\n\r\n").unwrap() + 4;
        let sent: serde_json::Value = serde_json::from_str(&raw[json_start..]).unwrap();
        assert_eq!(sent["book_titles"], serde_json::json!(["Dune", "1984"]));
        assert_eq!(sent["genre"], "scifi");
        assert!(sent["era"].is_null());
    }

    #[tokio::test]
    async fn test_anime_endpoint_path() {
        let (url, request) = serve_once("200 OK", r#"{"recommendations": []}"#).await;
        let client = RecommendationClient::new(format!("{}/", url), FallbackPolicy::Sample);

        let outcome = client
            .recommend(Domain::Anime, &titles(), &Preferences::default())
            .await;

        assert_eq!(outcome, FetchOutcome::Fresh(Vec::new()));
        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /recommendations/anime/ HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_error_detail_is_reported() {
        let (url, _request) =
            serve_once("400 Bad Request", r#"{"detail": "No movie titles provided"}"#).await;
        let client = RecommendationClient::new(url, FallbackPolicy::Sample);

        let err = client
            .fetch_recommendations(Domain::Movies, &titles(), &Preferences::default())
            .await
            .unwrap_err();

        match err {
            ApiClientError::Status { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "No movie titles provided");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_error_without_detail_uses_generic_message() {
        let (url, _request) = serve_once("500 Internal Server Error", "oops").await;
        let client = RecommendationClient::new(url, FallbackPolicy::Sample);

        let outcome = client
            .recommend(Domain::Books, &titles(), &Preferences::default())
            .await;

        match outcome {
            FetchOutcome::ServiceUnavailable { reason, fallback } => {
                assert_eq!(reason, GENERIC_FAILURE);
                assert_eq!(fallback.len(), 5);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_malformed_json_falls_back() {
        let (url, _request) = serve_once("200 OK", "{not json").await;
        let client = RecommendationClient::new(url, FallbackPolicy::Sample);

        let outcome = client
            .recommend(Domain::Anime, &titles(), &Preferences::default())
            .await;

        match outcome {
            FetchOutcome::ServiceUnavailable { fallback, .. } => {
                assert_eq!(fallback[0].title(), "Death Note");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_network_failure_falls_back() {
        let client = RecommendationClient::new(closed_url().await, FallbackPolicy::Sample);

        let outcome = client
            .recommend(Domain::Books, &titles(), &Preferences::default())
            .await;

        match outcome {
            FetchOutcome::ServiceUnavailable { fallback, .. } => {
                assert_eq!(fallback.len(), 5);
                assert_eq!(fallback[0].title(), "The Great Gatsby");
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_none_policy_yields_empty_fallback() {
        let client = RecommendationClient::new(closed_url().await, FallbackPolicy::None);

        let outcome = client
            .recommend(Domain::Movies, &titles(), &Preferences::default())
            .await;

        assert!(matches!(
            outcome,
            FetchOutcome::ServiceUnavailable { ref fallback, .. } if fallback.is_empty()
        ));
    }
}
