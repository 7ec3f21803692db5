//! Plain-text views of records and history.

use std::fmt::{Display, Write};

use weather_core::WeatherRecord;

const UNAVAILABLE: &str = "N/A";
const POPULAR_CITIES: &[&str] = &["London", "New York", "Tokyo", "Dubai", "Sydney"];

fn or_na<T: Display>(value: Option<T>) -> String {
    value.map_or_else(|| UNAVAILABLE.to_string(), |v| v.to_string())
}

/// Full view: headline followed by the details block.
pub fn record(record: &WeatherRecord) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "{}  {}", record.pictogram(), record.full_location());
    let _ = writeln!(out, "{}°C", or_na(record.temperature_c()));
    let _ = writeln!(
        out,
        "Feels like {}°C • {}",
        or_na(record.feels_like_c()),
        record.description()
    );
    out.push('\n');
    let _ = writeln!(out, "Humidity:     {}%", or_na(record.humidity_pct()));
    let _ = writeln!(out, "Pressure:     {} hPa", or_na(record.pressure_hpa()));
    let _ = writeln!(out, "Wind Speed:   {} m/s", or_na(record.wind_speed_ms()));
    let _ = writeln!(out, "Visibility:   {} km", or_na(record.visibility_km()));
    let _ = writeln!(out, "Cloudiness:   {}%", record.cloudiness_pct());
    let _ = write!(out, "Last Updated: {}", record.observed_at());

    out
}

/// One line per city, used by `compare`.
pub fn summary(record: &WeatherRecord) -> String {
    format!(
        "{} {:<24} {:>6}°C  {}",
        record.pictogram(),
        record.full_location(),
        or_na(record.temperature_c()),
        record.description()
    )
}

pub fn history(entries: &[String], limit: Option<usize>) -> String {
    let mut out = String::new();

    if entries.is_empty() {
        out.push_str("No recent searches.\n");
        let _ = writeln!(out, "Popular cities: {}", POPULAR_CITIES.join(", "));
        return out;
    }

    let shown = limit.unwrap_or(entries.len()).min(entries.len());
    for (idx, city) in entries.iter().take(shown).enumerate() {
        let _ = writeln!(out, "{:>2}. {city}", idx + 1);
    }

    out
}
