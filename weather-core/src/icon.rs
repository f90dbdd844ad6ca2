//! Condition code → icon mapping.
//!
//! Codes follow the "two digits + optional day/night letter" convention
//! (`01d`, `10n`, ...). The mapping is total: anything unrecognized
//! renders as a clear day.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DayPart {
    Day,
    Night,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Clear(DayPart),
    PartlyCloudy(DayPart),
    Cloudy,
    Drizzle,
    Rain,
    Thunderstorm,
    Snow,
    Fog,
}

impl Default for WeatherIcon {
    fn default() -> Self {
        WeatherIcon::Clear(DayPart::Day)
    }
}

impl WeatherIcon {
    /// Resolve a raw condition code.
    ///
    /// Non-digit characters are stripped to get the numeric code, and an
    /// `n` anywhere in the input selects the night variant. Only clear and
    /// partly-cloudy have night variants.
    pub fn resolve(code: &str) -> Self {
        let digits: String = code.chars().filter(char::is_ascii_digit).collect();
        let part = if code.contains('n') {
            DayPart::Night
        } else {
            DayPart::Day
        };

        match digits.as_str() {
            "01" => WeatherIcon::Clear(part),
            "02" => WeatherIcon::PartlyCloudy(part),
            "03" | "04" => WeatherIcon::Cloudy,
            "09" => WeatherIcon::Drizzle,
            "10" => WeatherIcon::Rain,
            "11" => WeatherIcon::Thunderstorm,
            "13" => WeatherIcon::Snow,
            "50" => WeatherIcon::Fog,
            _ => WeatherIcon::default(),
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            WeatherIcon::Clear(DayPart::Day) => "sun",
            WeatherIcon::Clear(DayPart::Night) => "moon",
            WeatherIcon::PartlyCloudy(DayPart::Day) => "cloud-sun",
            WeatherIcon::PartlyCloudy(DayPart::Night) => "cloud-moon",
            WeatherIcon::Cloudy => "cloud",
            WeatherIcon::Drizzle => "cloud-drizzle",
            WeatherIcon::Rain => "cloud-rain",
            WeatherIcon::Thunderstorm => "cloud-lightning",
            WeatherIcon::Snow => "cloud-snow",
            WeatherIcon::Fog => "cloud-fog",
        }
    }

    /// Single glyph for terminal output.
    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Clear(DayPart::Day) => "☀",
            WeatherIcon::Clear(DayPart::Night) => "☾",
            WeatherIcon::PartlyCloudy(_) => "⛅",
            WeatherIcon::Cloudy => "☁",
            WeatherIcon::Drizzle => "🌦",
            WeatherIcon::Rain => "🌧",
            WeatherIcon::Thunderstorm => "⛈",
            WeatherIcon::Snow => "❄",
            WeatherIcon::Fog => "🌫",
        }
    }
}
