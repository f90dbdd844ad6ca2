use weather_core::{CurrentConditions, WeatherIcon};

use super::fmt_temp;

pub fn current_card(weather: &CurrentConditions) -> String {
    let icon = WeatherIcon::resolve(&weather.condition_code);

    format!(
        "Current Weather\n{name}\n{glyph}  {temp}  {text}\nFeels like {feels}  ·  Humidity {humidity}%",
        name = weather.display_name(),
        glyph = icon.glyph(),
        temp = fmt_temp(weather.temperature),
        text = weather.condition_text,
        feels = fmt_temp(weather.feels_like),
        humidity = weather.humidity.round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::view::tests::paris;

    #[test]
    fn renders_all_fields() {
        let out = current_card(&paris());
        assert_eq!(
            out,
            "Current Weather\nParis\n☀  21°  clear sky\nFeels like 21°  ·  Humidity 55%"
        );
    }

    #[test]
    fn night_code_uses_night_glyph() {
        let mut w = paris();
        w.condition_code = "01n".into();
        assert!(current_card(&w).contains('☾'));
    }
}
