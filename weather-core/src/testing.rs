//! In-memory backend for orchestrator and history tests.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::client::{ClientError, ClientResult, WeatherBackend};
use crate::model::{
    CurrentConditions, ExportFormat, Forecast, ForecastEntry, HistoryRecord, LocationQuery,
    SaveReceipt, TravelVideo, TripRange,
};

#[derive(Debug, Default)]
pub(crate) struct MockBackend {
    pub conditions: Option<CurrentConditions>,
    pub forecast: Option<Forecast>,
    pub videos: Vec<TravelVideo>,
    pub history: Mutex<Vec<HistoryRecord>>,
    pub history_forecast: Option<Forecast>,
    pub fail_save: bool,
    pub fail_history: bool,
    pub fail_update: bool,
    /// Conditions stored into the matching record by `update_conditions`.
    pub updated_conditions: Option<CurrentConditions>,
    pub(crate) calls: Mutex<Vec<String>>,
}

impl MockBackend {
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, prefix: &str) -> usize {
        self.calls().iter().filter(|c| c.starts_with(prefix)).count()
    }

    fn record(&self, call: String) {
        self.calls.lock().unwrap().push(call);
    }
}

pub(crate) fn not_found() -> ClientError {
    ClientError::Status {
        status: 404,
        body: "Location not found or weather service error".to_string(),
    }
}

pub(crate) fn conditions(location: &str, temperature: f64) -> CurrentConditions {
    CurrentConditions {
        location: location.to_string(),
        city: Some(location.to_string()),
        temperature,
        feels_like: temperature - 1.0,
        humidity: 55.0,
        condition_text: "clear sky".to_string(),
        condition_code: "01d".to_string(),
        latitude: Some(48.85),
        longitude: Some(2.35),
    }
}

pub(crate) fn forecast(days: u32) -> Forecast {
    let entries = (1..=days)
        .flat_map(|d| {
            [9, 12, 15].map(|h| ForecastEntry {
                timestamp: format!("2024-06-{d:02} {h:02}:00:00"),
                temperature: 20.0 + f64::from(d),
                feels_like: None,
                humidity: None,
                condition_text: "few clouds".to_string(),
                condition_code: "02d".to_string(),
            })
        })
        .collect();
    Forecast::new(entries)
}

pub(crate) fn record(id: i64, location: &str) -> HistoryRecord {
    HistoryRecord {
        id,
        conditions: conditions(location, 15.0),
        searched_at: None,
        start_date: None,
        end_date: None,
    }
}

pub(crate) fn video(id: &str) -> TravelVideo {
    TravelVideo {
        id: id.to_string(),
        title: format!("Travel guide {id}"),
        thumbnail_url: format!("https://i.ytimg.com/vi/{id}/hqdefault.jpg"),
    }
}

#[async_trait]
impl WeatherBackend for MockBackend {
    async fn current_conditions(&self, location: &LocationQuery) -> ClientResult<CurrentConditions> {
        self.record(format!("current {location}"));
        self.conditions.clone().ok_or_else(not_found)
    }

    async fn forecast(&self, location: &LocationQuery) -> ClientResult<Forecast> {
        self.record(format!("forecast {location}"));
        self.forecast.clone().ok_or_else(not_found)
    }

    async fn save(&self, location: &str, trip: Option<TripRange>) -> ClientResult<SaveReceipt> {
        let range = trip.map(|t| t.to_string()).unwrap_or_default();
        self.record(format!("save {location} {range}"));
        if self.fail_save {
            return Err(not_found());
        }

        let mut history = self.history.lock().unwrap();
        let id = history.iter().map(|r| r.id).max().unwrap_or(0) + 1;
        history.push(record(id, location));

        Ok(SaveReceipt {
            weather_id: Some(id),
        })
    }

    async fn history(&self) -> ClientResult<Vec<HistoryRecord>> {
        self.record("history".to_string());
        if self.fail_history {
            return Err(not_found());
        }
        Ok(self.history.lock().unwrap().clone())
    }

    async fn history_forecast(&self, id: i64) -> ClientResult<Forecast> {
        self.record(format!("history_forecast {id}"));
        self.history_forecast.clone().ok_or_else(not_found)
    }

    async fn delete_record(&self, id: i64) -> ClientResult<()> {
        self.record(format!("delete {id}"));
        self.history.lock().unwrap().retain(|r| r.id != id);
        Ok(())
    }

    async fn update_conditions(&self, id: i64, location: &str) -> ClientResult<()> {
        self.record(format!("update {id} {location}"));
        if self.fail_update {
            return Err(not_found());
        }
        if let Some(updated) = &self.updated_conditions {
            let mut history = self.history.lock().unwrap();
            if let Some(r) = history.iter_mut().find(|r| r.id == id) {
                r.conditions = updated.clone();
            }
        }
        Ok(())
    }

    async fn refresh_forecast(&self, id: i64) -> ClientResult<()> {
        self.record(format!("refresh {id}"));
        Ok(())
    }

    async fn travel_videos(&self, location: &str) -> Vec<TravelVideo> {
        self.record(format!("videos {location}"));
        self.videos.clone()
    }

    fn export_url(&self, format: ExportFormat) -> String {
        format!("mock://export/weather?format={format}")
    }
}
