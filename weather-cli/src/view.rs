//! Stateless text renderers. Each takes its props by reference and returns
//! the text to print; components with nothing to show return `None`.

use weather_core::{ExportFormat, Phase, ViewState, WeatherBackend};

mod current;
mod forecast;
mod history;
mod media;
mod prompt;

pub use current::current_card;
pub use forecast::forecast_strip;
pub use history::history_list;
pub use media::{map_link, video_gallery};
pub use prompt::{SEARCH_PLACEHOLDER, date_range_prompt};

/// Whole temperatures, never "-0°".
pub fn fmt_temp(celsius: f64) -> String {
    format!("{}°", celsius.round() as i64)
}

/// Main screen: status line, current card, forecast, map and videos.
pub fn screen(state: &ViewState) -> String {
    let mut sections = Vec::new();

    if let Some(error) = &state.error {
        sections.push(format!("✗ {error}"));
    }
    if let Some(notice) = &state.notice {
        sections.push(format!("✓ {notice}"));
    }
    if state.phase() == Phase::Loading {
        sections.push("… loading".to_string());
    }

    if let Some(weather) = &state.weather {
        sections.push(current_card(weather));
        sections.push(if state.is_from_history() {
            "[Refresh Data]".to_string()
        } else {
            "[Save to History]".to_string()
        });
    }
    if let Some(strip) = state.forecast.as_ref().and_then(forecast_strip) {
        sections.push(strip);
    }
    if let Some(map) = state.weather.as_ref().and_then(map_link) {
        sections.push(map);
    }
    if let Some(videos) = video_gallery(&state.videos) {
        sections.push(videos);
    }

    sections.join("\n\n")
}

pub fn export_links(backend: &dyn WeatherBackend) -> String {
    ExportFormat::all()
        .iter()
        .map(|f| format!("Export {}: {}", f.as_str().to_uppercase(), backend.export_url(*f)))
        .collect::<Vec<_>>()
        .join("\n")
}
