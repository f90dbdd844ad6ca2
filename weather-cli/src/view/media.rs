use weather_core::{CurrentConditions, TravelVideo};

const MAP_ZOOM: u8 = 13;

/// OpenStreetMap link centred on the location; omitted without coordinates.
pub fn map_link(weather: &CurrentConditions) -> Option<String> {
    let (lat, lon) = weather.coordinates()?;
    Some(format!(
        "Map of {name}: https://www.openstreetmap.org/?mlat={lat}&mlon={lon}#map={MAP_ZOOM}/{lat}/{lon}",
        name = weather.display_name(),
    ))
}

pub fn video_gallery(videos: &[TravelVideo]) -> Option<String> {
    if videos.is_empty() {
        return None;
    }

    let mut out = String::from("Travel Guides");
    for video in videos {
        out.push_str(&format!("\n▶ {}\n  {}", video.title, video.watch_url()));
        if !video.thumbnail_url.is_empty() {
            out.push_str(&format!("\n  thumbnail: {}", video.thumbnail_url));
        }
    }
    Some(out)
}
