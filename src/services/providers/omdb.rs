/// OMDb poster provider
///
/// Title lookup by name; only the poster URL is consumed. OMDb reports a
/// missing poster as the literal string "N/A".
use reqwest::Client as HttpClient;
use serde::Deserialize;

use crate::{
    error::{AppError, AppResult},
    services::providers::PosterLookup,
};

#[derive(Clone)]
pub struct OmdbPosters {
    http_client: HttpClient,
    api_key: String,
    api_url: String,
}

#[derive(Deserialize)]
struct OmdbTitle {
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

impl OmdbPosters {
    pub fn new(api_key: String, api_url: String) -> Self {
        Self {
            http_client: HttpClient::new(),
            api_key,
            api_url,
        }
    }
}

#[async_trait::async_trait]
impl PosterLookup for OmdbPosters {
    async fn poster_url(&self, title: &str) -> AppResult<Option<String>> {
        let response = self
            .http_client
            .get(&self.api_url)
            .query(&[("t", title), ("apikey", self.api_key.as_str())])
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::ExternalApi(format!(
                "OMDb API returned status {}: {}",
                status, body
            )));
        }

        let data: OmdbTitle = response.json().await?;
        let poster = data.poster.filter(|p| !p.is_empty() && p != "N/A");

        tracing::debug!(
            title = %title,
            found = poster.is_some(),
            provider = "omdb",
            "poster lookup completed"
        );

        Ok(poster)
    }

    fn name(&self) -> &'static str {
        "omdb"
    }
}
