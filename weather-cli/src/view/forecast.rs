use weather_core::{Forecast, WeatherIcon, forecast};

use super::fmt_temp;

/// One line per reduced day.
pub fn forecast_strip(data: &Forecast) -> Option<String> {
    if data.is_empty() {
        return None;
    }

    let days = forecast::daily(&data.entries);
    if days.is_empty() {
        return None;
    }

    let mut out = format!("{}-Day Forecast", days.len());
    for day in &days {
        let name = forecast::weekday_name(day).unwrap_or("?");
        let glyph = WeatherIcon::resolve(&day.condition_code).glyph();
        out.push_str(&format!(
            "\n{name:<10} {glyph}  {temp:>4}  {text}",
            temp = fmt_temp(day.temperature),
            text = day.condition_text,
        ));
    }

    Some(out)
}
