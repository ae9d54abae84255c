use anyhow::{Context, Result, anyhow};
use async_trait::async_trait;
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::{
    Config,
    model::{ForecastResponse, Place},
};

use super::{ForecastProvider, GeocodingProvider};

/// Open-Meteo geocoding and forecast APIs. Neither needs an API key.
#[derive(Debug, Clone)]
pub struct OpenMeteoProvider {
    http: Client,
    geocoding_url: Url,
    forecast_url: Url,
    language: String,
    candidate_count: u8,
}

impl OpenMeteoProvider {
    pub fn from_config(config: &Config) -> Result<Self> {
        let geocoding_url = Url::parse(&config.endpoints.geocoding_url).with_context(|| {
            format!("Invalid geocoding URL: {}", config.endpoints.geocoding_url)
        })?;
        let forecast_url = Url::parse(&config.endpoints.forecast_url)
            .with_context(|| format!("Invalid forecast URL: {}", config.endpoints.forecast_url))?;

        let http = Client::builder()
            .user_agent(concat!("meteo/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            geocoding_url,
            forecast_url,
            language: config.search.language.clone(),
            candidate_count: config.search.candidate_count,
        })
    }

    async fn get_text(&self, url: Url, query: &[(&str, String)], what: &str) -> Result<String> {
        tracing::debug!(%url, ?query, "requesting {what}");

        let res = self
            .http
            .get(url)
            .query(query)
            .send()
            .await
            .with_context(|| format!("{what} failed"))?;

        let status = res.status();
        let body = res
            .text()
            .await
            .with_context(|| format!("{what} failed: could not read response body"))?;

        if !status.is_success() {
            tracing::warn!(%status, body = %truncate_body(&body), "{what} returned non-success status");
            return Err(anyhow!("{what} failed (status {status})"));
        }

        Ok(body)
    }
}

#[derive(Debug, Deserialize)]
struct GeoSearchResponse {
    #[serde(default)]
    results: Option<Vec<Place>>,
}

#[async_trait]
impl GeocodingProvider for OpenMeteoProvider {
    async fn resolve(&self, name: &str) -> Result<Option<Place>> {
        let query = [
            ("name", name.to_string()),
            ("count", self.candidate_count.to_string()),
            ("language", self.language.clone()),
            ("format", "json".to_string()),
        ];

        let body = self.get_text(self.geocoding_url.clone(), &query, "Geocoding").await?;

        let parsed: GeoSearchResponse =
            serde_json::from_str(&body).context("Failed to parse geocoding response")?;

        // Ranking is the service's business; take its first candidate.
        let place = parsed.results.and_then(|r| r.into_iter().next());
        match &place {
            Some(p) => tracing::info!(query = name, place = %p.label(), "resolved place"),
            None => tracing::info!(query = name, "no geocoding candidates"),
        }

        Ok(place)
    }
}

#[async_trait]
impl ForecastProvider for OpenMeteoProvider {
    async fn fetch_current(
        &self,
        latitude: f64,
        longitude: f64,
        timezone: &str,
    ) -> Result<ForecastResponse> {
        let query = [
            ("latitude", latitude.to_string()),
            ("longitude", longitude.to_string()),
            ("current_weather", "true".to_string()),
            // Requested but not displayed yet.
            ("hourly", "relativehumidity_2m".to_string()),
            ("timezone", timezone.to_string()),
        ];

        let body = self.get_text(self.forecast_url.clone(), &query, "Weather API").await?;

        serde_json::from_str(&body).context("Failed to parse forecast response")
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    if body.chars().count() > MAX {
        format!("{}...", body.chars().take(MAX).collect::<String>())
    } else {
        body.to_string()
    }
}
