use chrono::Local;
use serde::{Deserialize, Serialize};
use serde_json::Value;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const MISSING_DESCRIPTION: &str = "N/A";
const UNKNOWN_CITY: &str = "Unknown";

/// Coarse weather condition used to pick a pictogram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Clear,
    Clouds,
    Rain,
    Storm,
    Snow,
    Fog,
    Wind,
    PartlyCloudy,
}

/// Substring table checked in order; the first key contained in the
/// description wins.
const CONDITION_TABLE: &[(&str, Condition)] = &[
    ("clear", Condition::Clear),
    ("sunny", Condition::Clear),
    ("cloud", Condition::Clouds),
    ("cloudy", Condition::Clouds),
    ("rain", Condition::Rain),
    ("rainy", Condition::Rain),
    ("storm", Condition::Storm),
    ("thunderstorm", Condition::Storm),
    ("snow", Condition::Snow),
    ("snowy", Condition::Snow),
    ("mist", Condition::Fog),
    ("fog", Condition::Fog),
    ("wind", Condition::Wind),
    ("windy", Condition::Wind),
];

impl Condition {
    /// Resolve a free-text description, e.g. "light rain".
    pub fn from_description(description: &str) -> Self {
        let lower = description.to_lowercase();

        CONDITION_TABLE
            .iter()
            .find(|(key, _)| lower.contains(key))
            .map(|(_, condition)| *condition)
            .unwrap_or(Condition::PartlyCloudy)
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Condition::Clear => "☀️",
            Condition::Clouds => "☁️",
            Condition::Rain => "🌧️",
            Condition::Storm => "⛈️",
            Condition::Snow => "❄️",
            Condition::Fog => "🌫️",
            Condition::Wind => "💨",
            Condition::PartlyCloudy => "🌤️",
        }
    }
}

/// Normalized snapshot of one successful lookup.
///
/// All derived values are computed once in the constructor. Optional
/// measurements are `None` when the API omitted them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherRecord {
    city: String,
    country: String,
    #[serde(rename = "temperature")]
    temperature_c: Option<f64>,
    #[serde(rename = "feels_like")]
    feels_like_c: Option<f64>,
    #[serde(rename = "humidity")]
    humidity_pct: Option<u8>,
    #[serde(rename = "pressure")]
    pressure_hpa: Option<u32>,
    description: String,
    #[serde(rename = "wind_speed")]
    wind_speed_ms: Option<f64>,
    #[serde(rename = "cloudiness")]
    cloudiness_pct: u8,
    #[serde(rename = "visibility")]
    visibility_km: Option<f64>,
    #[serde(rename = "timestamp")]
    observed_at: String,
    #[serde(skip)]
    condition: Condition,
}

impl WeatherRecord {
    /// Build a record from an arbitrary JSON value shaped like the
    /// OpenWeather "current weather" payload.
    pub fn from_value(value: Value) -> serde_json::Result<Self> {
        let raw: OwCurrentResponse = serde_json::from_value(value)?;
        Ok(Self::from_raw(raw))
    }

    /// Build a record from a raw response body.
    pub fn from_json_str(body: &str) -> serde_json::Result<Self> {
        let raw: OwCurrentResponse = serde_json::from_str(body)?;
        Ok(Self::from_raw(raw))
    }

    pub fn city(&self) -> &str {
        &self.city
    }

    pub fn country(&self) -> &str {
        &self.country
    }

    /// "City, Country".
    pub fn full_location(&self) -> String {
        format!("{}, {}", self.city, self.country)
    }

    pub fn temperature_c(&self) -> Option<f64> {
        self.temperature_c
    }

    pub fn feels_like_c(&self) -> Option<f64> {
        self.feels_like_c
    }

    pub fn humidity_pct(&self) -> Option<u8> {
        self.humidity_pct
    }

    pub fn pressure_hpa(&self) -> Option<u32> {
        self.pressure_hpa
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn wind_speed_ms(&self) -> Option<f64> {
        self.wind_speed_ms
    }

    pub fn cloudiness_pct(&self) -> u8 {
        self.cloudiness_pct
    }

    pub fn visibility_km(&self) -> Option<f64> {
        self.visibility_km
    }

    /// Local wall-clock time the record was built, `YYYY-MM-DD HH:MM:SS`.
    pub fn observed_at(&self) -> &str {
        &self.observed_at
    }

    pub fn condition(&self) -> Condition {
        self.condition
    }

    pub fn pictogram(&self) -> &'static str {
        self.condition.symbol()
    }

    /// Display fields keyed by stable names, in declaration order.
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }

    fn from_raw(raw: OwCurrentResponse) -> Self {
        let main = raw.main.unwrap_or_default();

        let raw_description = raw
            .weather
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|w| w.description);

        let (description, condition) = match raw_description {
            Some(text) => (capitalize(&text), Condition::from_description(&text)),
            None => (MISSING_DESCRIPTION.to_string(), Condition::PartlyCloudy),
        };

        let visibility_km = raw
            .visibility
            .filter(|meters| *meters != 0.0)
            .map(|meters| round1(meters / 1000.0));

        Self {
            city: raw.name.unwrap_or_else(|| UNKNOWN_CITY.to_string()),
            country: raw.sys.and_then(|s| s.country).unwrap_or_default(),
            temperature_c: main.temp.map(round1),
            feels_like_c: main.feels_like.map(round1),
            humidity_pct: main.humidity,
            pressure_hpa: main.pressure,
            description,
            wind_speed_ms: raw.wind.and_then(|w| w.speed).map(round1),
            cloudiness_pct: raw.clouds.and_then(|c| c.all).unwrap_or(0),
            visibility_km,
            observed_at: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            condition,
        }
    }
}

/// One decimal place, rounding the exact binary value half-to-even.
fn round1(value: f64) -> f64 {
    format!("{value:.1}").parse().unwrap_or(value)
}

/// Upper-case the first character and lower-case the rest.
fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => {
            let rest = chars.as_str().to_lowercase();
            first.to_uppercase().chain(rest.chars()).collect()
        }
        None => String::new(),
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwMain {
    temp: Option<f64>,
    feels_like: Option<f64>,
    humidity: Option<u8>,
    pressure: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWeather {
    description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwWind {
    speed: Option<f64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwClouds {
    all: Option<u8>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwSys {
    country: Option<String>,
}

/// OpenWeather "current weather" payload; every field may be missing.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct OwCurrentResponse {
    name: Option<String>,
    sys: Option<OwSys>,
    main: Option<OwMain>,
    weather: Option<Vec<OwWeather>>,
    wind: Option<OwWind>,
    clouds: Option<OwClouds>,
    visibility: Option<f64>,
}
