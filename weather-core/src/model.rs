use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// A free-text location (city, postal code, "lat,lon" or landmark).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationQuery(String);

impl LocationQuery {
    /// Trim the raw input; blank input is not a query.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for LocationQuery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Point-in-time conditions, either from a live search or a saved record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentConditions {
    /// The query the backend resolved; used as the key for save, refresh and videos.
    pub location: String,
    #[serde(default)]
    pub city: Option<String>,
    pub temperature: f64,
    pub feels_like: f64,
    pub humidity: f64,
    #[serde(rename = "weather")]
    pub condition_text: String,
    #[serde(rename = "icon", default, deserialize_with = "null_as_empty")]
    pub condition_code: String,
    #[serde(rename = "lat", default)]
    pub latitude: Option<f64>,
    #[serde(rename = "lon", default)]
    pub longitude: Option<f64>,
}

impl CurrentConditions {
    pub fn display_name(&self) -> &str {
        match self.city.as_deref() {
            Some(city) if !city.is_empty() => city,
            _ => &self.location,
        }
    }

    pub fn coordinates(&self) -> Option<(f64, f64)> {
        self.latitude.zip(self.longitude)
    }
}

/// One sub-daily forecast sample.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastEntry {
    /// "YYYY-MM-DD HH:MM:SS" from the live endpoint, ISO "T" form from saved rows.
    #[serde(rename = "datetime")]
    pub timestamp: String,
    pub temperature: f64,
    #[serde(default)]
    pub feels_like: Option<f64>,
    #[serde(default)]
    pub humidity: Option<f64>,
    #[serde(rename = "weather")]
    pub condition_text: String,
    #[serde(rename = "icon", default, deserialize_with = "null_as_empty")]
    pub condition_code: String,
}

/// The single forecast shape the rest of the crate works with.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Forecast {
    pub entries: Vec<ForecastEntry>,
}

impl Forecast {
    pub fn new(entries: Vec<ForecastEntry>) -> Self {
        Self { entries }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Every forecast payload the backend is known to return.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawForecast {
    Wrapped {
        #[serde(alias = "list")]
        forecast: Vec<ForecastEntry>,
    },
    Bare(Vec<ForecastEntry>),
}

impl From<RawForecast> for Forecast {
    fn from(raw: RawForecast) -> Self {
        match raw {
            RawForecast::Wrapped { forecast } => Forecast::new(forecast),
            RawForecast::Bare(entries) => Forecast::new(entries),
        }
    }
}

/// A persisted search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryRecord {
    pub id: i64,
    #[serde(flatten)]
    pub conditions: CurrentConditions,
    #[serde(rename = "date_searched", default)]
    pub searched_at: Option<String>,
    #[serde(default)]
    pub start_date: Option<NaiveDate>,
    #[serde(default)]
    pub end_date: Option<NaiveDate>,
}

impl HistoryRecord {
    pub fn trip(&self) -> Option<TripRange> {
        match (self.start_date, self.end_date) {
            (Some(start), Some(end)) => Some(TripRange { start, end }),
            _ => None,
        }
    }
}

/// Trip dates attached to a saved search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TripRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

/// Why a date range entered in the save prompt was refused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum TripRangeError {
    #[error("Please select both dates.")]
    Missing,
    #[error("Dates must use the YYYY-MM-DD format.")]
    Malformed,
    #[error("Start date cannot be after end date.")]
    Inverted,
}

impl TripRange {
    /// Days of forecast the backend can supply, used for the default range.
    pub const FORECAST_DAYS: u64 = 5;

    pub fn parse(start: &str, end: &str) -> Result<Self, TripRangeError> {
        let (start, end) = (start.trim(), end.trim());
        if start.is_empty() || end.is_empty() {
            return Err(TripRangeError::Missing);
        }

        let parse = |s: &str| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d").map_err(|_| TripRangeError::Malformed)
        };
        let (start, end) = (parse(start)?, parse(end)?);

        if start > end {
            return Err(TripRangeError::Inverted);
        }

        Ok(Self { start, end })
    }

    /// Today through the end of the forecast window.
    pub fn default_from(today: NaiveDate) -> Self {
        let end = today
            .checked_add_days(Days::new(Self::FORECAST_DAYS))
            .unwrap_or(today);
        Self { start: today, end }
    }
}

impl std::fmt::Display for TripRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} → {}", self.start, self.end)
    }
}

/// A travel video suggestion. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelVideo {
    #[serde(rename = "videoId")]
    pub id: String,
    pub title: String,
    #[serde(rename = "thumbnail", default)]
    pub thumbnail_url: String,
}

impl TravelVideo {
    pub fn watch_url(&self) -> String {
        format!("https://www.youtube.com/watch?v={}", self.id)
    }
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RawVideos {
    Wrapped { videos: Vec<TravelVideo> },
    Bare(Vec<TravelVideo>),
}

impl From<RawVideos> for Vec<TravelVideo> {
    fn from(raw: RawVideos) -> Self {
        match raw {
            RawVideos::Wrapped { videos } => videos,
            RawVideos::Bare(videos) => videos,
        }
    }
}

/// Acknowledgement returned by the save endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SaveReceipt {
    #[serde(default)]
    pub weather_id: Option<i64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    Csv,
    Json,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
        }
    }

    pub const fn all() -> &'static [ExportFormat] {
        &[ExportFormat::Csv, ExportFormat::Json]
    }
}

impl std::fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for ExportFormat {
    type Error = anyhow::Error;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value.to_lowercase().as_str() {
            "csv" => Ok(ExportFormat::Csv),
            "json" => Ok(ExportFormat::Json),
            _ => Err(anyhow::anyhow!(
                "Unknown export format '{value}'. Supported formats: csv, json."
            )),
        }
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}
