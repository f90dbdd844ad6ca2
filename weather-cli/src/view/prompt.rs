use weather_core::orchestrator::SavePrompt;

pub const SEARCH_PLACEHOLDER: &str = "Search city, zip, or coordinates...";

pub fn date_range_prompt(prompt: &SavePrompt) -> String {
    let mut out = String::from(
        "Save Trip Dates\nSelect the date range for your trip to save this forecast.",
    );
    if let Some(error) = &prompt.error {
        out.push_str(&format!("\n✗ {error}"));
    }
    out
}
