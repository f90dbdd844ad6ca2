//! View orchestration: the single owner of view state.
//!
//! State is an immutable [`ViewState`] snapshot. Every transition is an
//! [`Action`] applied by the pure [`reduce`] function; the [`Orchestrator`]
//! performs backend calls and dispatches their results as actions.
//!
//! Searches and history selections are tagged with a generation number.
//! Results carrying an older generation are dropped so a slow stale
//! response can never overwrite a newer one.

use chrono::Local;
use std::sync::Arc;

use crate::client::{ClientError, WeatherBackend};
use crate::model::{
    CurrentConditions, ExportFormat, Forecast, HistoryRecord, LocationQuery, TravelVideo,
    TripRange, TripRangeError,
};

pub const SEARCH_FAILED: &str = "Could not fetch weather data. Please check the city name.";
pub const SELECT_FAILED: &str = "Could not load saved forecast.";
pub const REFRESH_FAILED: &str = "Failed to refresh data.";
pub const SAVE_FAILED: &str = "Failed to save to history.";
pub const SAVED: &str = "Location and date range saved to history!";
pub const REFRESHED: &str = "Weather data updated!";

/// Open date-range prompt.
#[derive(Debug, Clone, PartialEq)]
pub struct SavePrompt {
    pub defaults: TripRange,
    /// Validation message shown inside the prompt only.
    pub error: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Loaded,
    Error,
}

/// Everything the renderers need.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ViewState {
    pub weather: Option<CurrentConditions>,
    pub forecast: Option<Forecast>,
    /// Set iff `weather` came from a saved record.
    pub history_id: Option<i64>,
    pub loading: bool,
    pub error: Option<String>,
    /// Bumped whenever the saved-search list should reload itself.
    pub history_reload: u64,
    pub videos: Vec<TravelVideo>,
    pub save_prompt: Option<SavePrompt>,
    pub notice: Option<String>,
    pub generation: u64,
}

impl ViewState {
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.error.is_some() {
            Phase::Error
        } else if self.weather.is_some() || self.forecast.is_some() {
            Phase::Loaded
        } else {
            Phase::Idle
        }
    }

    pub fn is_from_history(&self) -> bool {
        self.history_id.is_some()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    SearchStart,
    SearchDidLoad {
        generation: u64,
        weather: CurrentConditions,
        forecast: Forecast,
    },
    SearchDidFail {
        generation: u64,
    },
    VideosDidLoad {
        generation: u64,
        videos: Vec<TravelVideo>,
    },
    SavePromptOpen {
        defaults: TripRange,
    },
    SavePromptReject(TripRangeError),
    SavePromptClose,
    SaveStart,
    SaveDidComplete,
    SaveDidFail,
    HistorySelect(HistoryRecord),
    HistoryForecastDidLoad {
        generation: u64,
        forecast: Forecast,
    },
    HistoryDidFail {
        generation: u64,
    },
    RefreshStart,
    RefreshDidLoad {
        weather: Option<CurrentConditions>,
        forecast: Forecast,
    },
    RefreshDidFail,
    NoticeDismiss,
}

impl Action {
    pub fn name(&self) -> &'static str {
        match self {
            Action::SearchStart => "SearchStart",
            Action::SearchDidLoad { .. } => "SearchDidLoad",
            Action::SearchDidFail { .. } => "SearchDidFail",
            Action::VideosDidLoad { .. } => "VideosDidLoad",
            Action::SavePromptOpen { .. } => "SavePromptOpen",
            Action::SavePromptReject(_) => "SavePromptReject",
            Action::SavePromptClose => "SavePromptClose",
            Action::SaveStart => "SaveStart",
            Action::SaveDidComplete => "SaveDidComplete",
            Action::SaveDidFail => "SaveDidFail",
            Action::HistorySelect(_) => "HistorySelect",
            Action::HistoryForecastDidLoad { .. } => "HistoryForecastDidLoad",
            Action::HistoryDidFail { .. } => "HistoryDidFail",
            Action::RefreshStart => "RefreshStart",
            Action::RefreshDidLoad { .. } => "RefreshDidLoad",
            Action::RefreshDidFail => "RefreshDidFail",
            Action::NoticeDismiss => "NoticeDismiss",
        }
    }
}

/// Pure transition function: returns the next snapshot.
pub fn reduce(state: &ViewState, action: Action) -> ViewState {
    let mut next = state.clone();

    match action {
        Action::SearchStart => {
            next.generation += 1;
            next.loading = true;
            next.error = None;
            next.notice = None;
            next.history_id = None;
            next.weather = None;
            next.forecast = None;
            next.videos.clear();
        }

        Action::SearchDidLoad {
            generation,
            weather,
            forecast,
        } if generation == state.generation => {
            next.loading = false;
            next.weather = Some(weather);
            next.forecast = Some(forecast);
        }

        Action::SearchDidFail { generation } if generation == state.generation => {
            next.loading = false;
            next.error = Some(SEARCH_FAILED.to_string());
            next.weather = None;
            next.forecast = None;
        }

        Action::VideosDidLoad { generation, videos } if generation == state.generation => {
            next.videos = videos;
        }

        Action::SavePromptOpen { defaults } => {
            next.save_prompt = Some(SavePrompt {
                defaults,
                error: None,
            });
        }

        Action::SavePromptReject(err) => {
            if let Some(prompt) = next.save_prompt.as_mut() {
                prompt.error = Some(err.to_string());
            }
        }

        Action::SavePromptClose => {
            next.save_prompt = None;
        }

        Action::SaveStart => {
            next.save_prompt = None;
            next.loading = true;
            next.notice = None;
        }

        Action::SaveDidComplete => {
            next.loading = false;
            next.history_reload += 1;
            next.notice = Some(SAVED.to_string());
        }

        Action::SaveDidFail => {
            next.loading = false;
            next.error = Some(SAVE_FAILED.to_string());
        }

        Action::HistorySelect(record) => {
            next.generation += 1;
            next.loading = true;
            next.error = None;
            next.notice = None;
            next.history_id = Some(record.id);
            next.weather = Some(record.conditions);
            next.forecast = None;
            next.videos.clear();
        }

        Action::HistoryForecastDidLoad {
            generation,
            forecast,
        } if generation == state.generation => {
            next.loading = false;
            next.forecast = Some(forecast);
        }

        Action::HistoryDidFail { generation } if generation == state.generation => {
            next.loading = false;
            next.error = Some(SELECT_FAILED.to_string());
        }

        Action::RefreshStart => {
            next.loading = true;
            next.error = None;
            next.notice = None;
        }

        Action::RefreshDidLoad { weather, forecast } => {
            next.loading = false;
            if weather.is_some() {
                next.weather = weather;
            }
            next.forecast = Some(forecast);
            next.history_reload += 1;
            next.notice = Some(REFRESHED.to_string());
        }

        Action::RefreshDidFail => {
            next.loading = false;
            next.error = Some(REFRESH_FAILED.to_string());
        }

        Action::NoticeDismiss => {
            next.notice = None;
        }

        stale => {
            tracing::debug!(action = stale.name(), "dropping stale result");
        }
    }

    next
}

/// Drives backend calls for user actions and owns the resulting view state.
#[derive(Debug)]
pub struct Orchestrator {
    backend: Arc<dyn WeatherBackend>,
    state: ViewState,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn WeatherBackend>) -> Self {
        Self {
            backend,
            state: ViewState::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn backend(&self) -> Arc<dyn WeatherBackend> {
        Arc::clone(&self.backend)
    }

    pub fn export_url(&self, format: ExportFormat) -> String {
        self.backend.export_url(format)
    }

    fn dispatch(&mut self, action: Action) {
        tracing::debug!(action = action.name(), "dispatch");
        self.state = reduce(&self.state, action);
    }

    fn busy(&self, what: &str) -> bool {
        if self.state.loading {
            tracing::debug!(what, "ignored while a request is in flight");
        }
        self.state.loading
    }

    /// Look up current conditions and forecast for a location.
    ///
    /// Both requests are issued together and applied together. Videos are
    /// fetched afterwards and never affect the error state.
    pub async fn search(&mut self, input: &str) {
        if self.busy("search") {
            return;
        }
        let Some(query) = LocationQuery::parse(input) else {
            return;
        };

        self.dispatch(Action::SearchStart);
        let generation = self.state.generation;
        let backend = self.backend();

        let pair = tokio::try_join!(
            backend.current_conditions(&query),
            backend.forecast(&query)
        );

        match pair {
            Ok((weather, forecast)) => {
                self.dispatch(Action::SearchDidLoad {
                    generation,
                    weather,
                    forecast,
                });
                let videos = backend.travel_videos(query.as_str()).await;
                self.dispatch(Action::VideosDidLoad { generation, videos });
            }
            Err(e) => {
                tracing::warn!(location = query.as_str(), error = %e, "search failed");
                self.dispatch(Action::SearchDidFail { generation });
            }
        }
    }

    /// Open the date-range prompt for the displayed location.
    pub fn request_save(&mut self) {
        if self.busy("save") || self.state.weather.is_none() {
            return;
        }
        let today = Local::now().date_naive();
        self.dispatch(Action::SavePromptOpen {
            defaults: TripRange::default_from(today),
        });
    }

    pub fn cancel_save(&mut self) {
        self.dispatch(Action::SavePromptClose);
    }

    /// Validate the chosen dates and persist the displayed location.
    ///
    /// Invalid dates keep the prompt open with a prompt-local message and
    /// issue no request.
    pub async fn confirm_save(&mut self, start: &str, end: &str) {
        if self.busy("save") || self.state.save_prompt.is_none() {
            return;
        }
        let Some(location) = self.state.weather.as_ref().map(|w| w.location.clone()) else {
            return;
        };

        let trip = match TripRange::parse(start, end) {
            Ok(trip) => trip,
            Err(e) => {
                self.dispatch(Action::SavePromptReject(e));
                return;
            }
        };

        self.dispatch(Action::SaveStart);
        match self.backend.save(&location, Some(trip)).await {
            Ok(receipt) => {
                tracing::info!(location = location.as_str(), id = ?receipt.weather_id, "saved search");
                self.dispatch(Action::SaveDidComplete);
            }
            Err(e) => {
                tracing::warn!(location = location.as_str(), error = %e, "save failed");
                self.dispatch(Action::SaveDidFail);
            }
        }
    }

    /// Show a saved record and its stored forecast.
    pub async fn select_history(&mut self, record: HistoryRecord) {
        if self.busy("select") {
            return;
        }
        let id = record.id;
        let location = record.conditions.location.clone();

        self.dispatch(Action::HistorySelect(record));
        let generation = self.state.generation;
        let backend = self.backend();

        match backend.history_forecast(id).await {
            Ok(forecast) => {
                self.dispatch(Action::HistoryForecastDidLoad {
                    generation,
                    forecast,
                });
                let videos = backend.travel_videos(&location).await;
                self.dispatch(Action::VideosDidLoad { generation, videos });
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "loading saved forecast failed");
                self.dispatch(Action::HistoryDidFail { generation });
            }
        }
    }

    /// Re-fetch the displayed saved record on the backend and reload it.
    pub async fn refresh(&mut self) {
        if self.busy("refresh") {
            return;
        }
        let Some(id) = self.state.history_id else {
            return;
        };
        let Some(location) = self.state.weather.as_ref().map(|w| w.location.clone()) else {
            return;
        };

        self.dispatch(Action::RefreshStart);
        let backend = self.backend();

        let reloaded = async {
            backend.update_conditions(id, &location).await?;
            backend.refresh_forecast(id).await?;

            let forecast = backend.history_forecast(id).await?;
            let weather = backend
                .history()
                .await?
                .into_iter()
                .find(|r| r.id == id)
                .map(|r| r.conditions);

            Ok::<_, ClientError>((weather, forecast))
        }
        .await;

        match reloaded {
            Ok((weather, forecast)) => {
                self.dispatch(Action::RefreshDidLoad { weather, forecast })
            }
            Err(e) => {
                tracing::warn!(id, error = %e, "refresh failed");
                self.dispatch(Action::RefreshDidFail);
            }
        }
    }

    pub fn dismiss_notice(&mut self) {
        self.dispatch(Action::NoticeDismiss);
    }
}
