use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use std::{fmt::Debug, sync::Arc, time::Duration};

use crate::config::Config;
use crate::model::{
    CurrentConditions, ExportFormat, Forecast, HistoryRecord, LocationQuery, RawForecast,
    RawVideos, SaveReceipt, TravelVideo, TripRange,
};

/// Errors raised by backend calls. Callers translate these into user-facing messages.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("Invalid backend URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Request to backend failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Backend returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Failed to parse backend response: {0}")]
    Decode(#[from] serde_json::Error),
}

pub type ClientResult<T> = Result<T, ClientError>;

/// One method per backend capability.
#[async_trait]
pub trait WeatherBackend: Send + Sync + Debug {
    async fn current_conditions(&self, location: &LocationQuery) -> ClientResult<CurrentConditions>;

    async fn forecast(&self, location: &LocationQuery) -> ClientResult<Forecast>;

    /// Persist a search (conditions and forecast) with an optional trip range.
    async fn save(&self, location: &str, trip: Option<TripRange>) -> ClientResult<SaveReceipt>;

    async fn history(&self) -> ClientResult<Vec<HistoryRecord>>;

    async fn history_forecast(&self, id: i64) -> ClientResult<Forecast>;

    /// Delete a record together with its forecast entries.
    async fn delete_record(&self, id: i64) -> ClientResult<()>;

    async fn update_conditions(&self, id: i64, location: &str) -> ClientResult<()>;

    async fn refresh_forecast(&self, id: i64) -> ClientResult<()>;

    /// Never fails: an unavailable video service yields an empty list.
    async fn travel_videos(&self, location: &str) -> Vec<TravelVideo>;

    /// Download link for a bulk export. No request is made.
    fn export_url(&self, format: ExportFormat) -> String;
}

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// [`WeatherBackend`] over HTTP.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    base: Url,
    http: Client,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> ClientResult<Self> {
        let invalid = |reason: String| ClientError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason,
        };

        let base = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_string()));
        }

        let http = Client::builder().timeout(timeout).build()?;

        Ok(Self { base, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    fn url(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    fn request(&self, method: Method, segments: &[&str]) -> RequestBuilder {
        let url = self.url(segments);
        tracing::debug!(method = method.as_str(), url = url.as_str(), "backend request");
        self.http.request(method, url)
    }

    async fn send(&self, req: RequestBuilder) -> ClientResult<String> {
        let res = req.send().await?;
        let status = res.status();
        let body = res.text().await?;

        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    async fn fetch<T: DeserializeOwned>(&self, req: RequestBuilder) -> ClientResult<T> {
        let body = self.send(req).await?;
        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl WeatherBackend for HttpBackend {
    async fn current_conditions(&self, location: &LocationQuery) -> ClientResult<CurrentConditions> {
        let req = self
            .request(Method::GET, &["weather"])
            .query(&[("location", location.as_str())]);
        self.fetch(req).await
    }

    async fn forecast(&self, location: &LocationQuery) -> ClientResult<Forecast> {
        let req = self
            .request(Method::GET, &["forecast"])
            .query(&[("location", location.as_str())]);
        let raw: RawForecast = self.fetch(req).await?;
        Ok(raw.into())
    }

    async fn save(&self, location: &str, trip: Option<TripRange>) -> ClientResult<SaveReceipt> {
        let mut query = vec![("location", location.to_string())];
        if let Some(trip) = trip {
            query.push(("start_date", trip.start.to_string()));
            query.push(("end_date", trip.end.to_string()));
        }

        let req = self.request(Method::POST, &["forecast", "save"]).query(&query);
        self.fetch(req).await
    }

    async fn history(&self) -> ClientResult<Vec<HistoryRecord>> {
        self.fetch(self.request(Method::GET, &["weather", "history"]))
            .await
    }

    async fn history_forecast(&self, id: i64) -> ClientResult<Forecast> {
        let id = id.to_string();
        let raw: RawForecast = self
            .fetch(self.request(Method::GET, &["forecast", "history", &id]))
            .await?;
        Ok(raw.into())
    }

    async fn delete_record(&self, id: i64) -> ClientResult<()> {
        let id = id.to_string();
        self.send(self.request(Method::DELETE, &["forecast", &id]))
            .await?;
        Ok(())
    }

    async fn update_conditions(&self, id: i64, location: &str) -> ClientResult<()> {
        let id = id.to_string();
        let req = self
            .request(Method::PUT, &["weather", "update", &id])
            .query(&[("location", location)]);
        self.send(req).await?;
        Ok(())
    }

    async fn refresh_forecast(&self, id: i64) -> ClientResult<()> {
        let id = id.to_string();
        self.send(self.request(Method::PUT, &["forecast", "refresh", &id]))
            .await?;
        Ok(())
    }

    async fn travel_videos(&self, location: &str) -> Vec<TravelVideo> {
        let req = self
            .request(Method::GET, &["media", "youtube"])
            .query(&[("location", location)]);

        match self.fetch::<RawVideos>(req).await {
            Ok(raw) => raw.into(),
            Err(e) => {
                tracing::warn!(location, error = %e, "travel videos unavailable");
                Vec::new()
            }
        }
    }

    fn export_url(&self, format: ExportFormat) -> String {
        let mut url = self.url(&["export", "weather"]);
        url.query_pairs_mut().append_pair("format", format.as_str());
        url.to_string()
    }
}

/// Construct the HTTP backend from config, with an optional URL override.
pub fn backend_from_config(
    config: &Config,
    override_url: Option<&str>,
) -> anyhow::Result<Arc<dyn WeatherBackend>> {
    let url = override_url.unwrap_or_else(|| config.backend_url());
    let backend = HttpBackend::new(url, config.timeout()).map_err(|e| {
        anyhow::anyhow!(
            "{e}\n\
             Hint: run `weather configure` or pass `--backend <url>`."
        )
    })?;
    tracing::debug!(url = backend.base_url().as_str(), "using backend");

    Ok(Arc::new(backend))
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
