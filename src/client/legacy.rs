//! Client for the older TV recommendation service.
//!
//! This service predates the unified `/recommendations/` API and uses its own
//! payload shape, so it stays a separate client.

use reqwest::Client;

use super::api::ApiClientError;
use super::models::{LegacyPreferences, LegacyRecommendRequest, Recommendation, TvShow};
use super::FetchOutcome;
use crate::wizard::Preferences;

/// Media type sent with every legacy request.
const MEDIA_TYPE: &str = "tvshows";

/// Client for `POST /recommend` and `GET /search`.
#[derive(Debug, Clone)]
pub struct LegacyTvClient {
    client: Client,
    base_url: String,
}

impl LegacyTvClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Ask for shows similar to `favorites`.
    pub async fn fetch_recommendations(
        &self,
        favorites: &[String],
        preferences: &Preferences,
    ) -> Result<Vec<TvShow>, ApiClientError> {
        let url = format!("{}/recommend", self.base_url);
        let request = LegacyRecommendRequest {
            kind: String::from(MEDIA_TYPE),
            favorites: favorites.to_vec(),
            preferences: LegacyPreferences::from(preferences),
        };

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(ApiClientError::Status {
                status: response.status().as_u16(),
                message: String::from("Failed to get recommendations"),
            });
        }

        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiClientError::InvalidResponse(format!("Failed to parse shows: {}", e)))
    }

    /// Fetch recommendations as a wizard outcome. Failures carry no fallback.
    pub async fn recommend(
        &self,
        favorites: &[String],
        preferences: &Preferences,
    ) -> FetchOutcome {
        match self.fetch_recommendations(favorites, preferences).await {
            Ok(shows) => {
                tracing::info!("Received {} legacy TV recommendations", shows.len());
                FetchOutcome::Fresh(shows.into_iter().map(Recommendation::Show).collect())
            }
            Err(e) => {
                tracing::warn!("Error getting legacy TV recommendations: {}", e);
                FetchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Search show titles. An empty query returns nothing without a request.
    pub async fn search(&self, query: &str) -> Result<Vec<String>, ApiClientError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!(
            "{}/search?type={}&query={}",
            self.base_url,
            MEDIA_TYPE,
            urlencoding::encode(query)
        );
        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            return Err(ApiClientError::Status {
                status: response.status().as_u16(),
                message: String::from("Failed to search"),
            });
        }

        let text = response.text().await?;
        let value: serde_json::Value = serde_json::from_str(&text).map_err(|e| {
            ApiClientError::InvalidResponse(format!("Failed to parse search: {}", e))
        })?;

        Ok(search_titles(&value))
    }
}

/// Pull titles out of a search reply. The service answers either with a list
/// of strings or a list of objects carrying `title`.
fn search_titles(value: &serde_json::Value) -> Vec<String> {
    let items: &[serde_json::Value] = match value {
        serde_json::Value::Array(items) => items.as_slice(),
        serde_json::Value::Object(map) => map
            .get("results")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default(),
        _ => &[],
    };

    items
        .iter()
        .filter_map(|item| match item {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Object(obj) => obj
                .get("title")
                .and_then(|t| t.as_str())
                .map(String::from),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::test_server::{closed_url, serve_once};
    use crate::wizard::PreferenceField;

    #[tokio::test]
    async fn test_recommend_payload_shape() {
        let body = r#"[{"id": 1, "title": "The Wire", "rating": 9.3, "network": "HBO",
                        "year": 2002, "seasons": 5, "image": "https://example.com/w.jpg"}]"#;
        let (url, request) = serve_once("200 OK", body).await;
        let client = LegacyTvClient::new(url);

        let mut prefs = Preferences::default();
        prefs.set(PreferenceField::Genre, "crime");
        let outcome = client.recommend(&[String::from("The Sopranos")], &prefs).await;

        match outcome {
            FetchOutcome::Fresh(shows) => {
                assert_eq!(shows.len(), 1);
                assert_eq!(shows[0].details().as_deref(), Some("2002 • 5 seasons"));
            }
            other => panic!("unexpected outcome: {other:?}"),
        }

        let raw = request.await.unwrap();
        assert!(raw.starts_with("POST /recommend HTTP/1.1"));
        let json_start = raw.find("\r\n\r\n").unwrap() + 4;
        let sent: serde_json::Value = serde_json::from_str(&raw[json_start..]).unwrap();
        assert_eq!(sent["type"], "tvshows");
        assert_eq!(sent["favorites"], serde_json::json!(["The Sopranos"]));
        assert_eq!(sent["preferences"]["genre"], "crime");
        assert_eq!(sent["preferences"]["era"], "");
    }

    #[tokio::test]
    async fn test_failure_has_no_fallback() {
        let client = LegacyTvClient::new(closed_url().await);

        let outcome = client
            .recommend(&[String::from("Lost")], &Preferences::default())
            .await;

        assert!(matches!(outcome, FetchOutcome::Failed { .. }));
    }

    #[tokio::test]
    async fn test_search_encodes_query() {
        let (url, request) =
            serve_once("200 OK", r#"[{"title": "Breaking Bad"}, "Better Call Saul"]"#).await;
        let client = LegacyTvClient::new(url);

        let titles = client.search("breaking bad&co").await.unwrap();

        assert_eq!(titles, vec!["Breaking Bad", "Better Call Saul"]);
        let raw = request.await.unwrap();
        assert!(raw.starts_with("GET /search?type=tvshows&query=breaking%20bad%26co HTTP/1.1"));
    }

    #[tokio::test]
    async fn test_empty_search_skips_request() {
        let client = LegacyTvClient::new(closed_url().await);
        assert!(client.search("   ").await.unwrap().is_empty());
    }

    #[test]
    fn test_search_titles_shapes() {
        let value = serde_json::json!({"results": [{"title": "Dark"}, {"name": "x"}]});
        assert_eq!(search_titles(&value), vec!["Dark"]);
        assert!(search_titles(&serde_json::json!(42)).is_empty());
    }
}
