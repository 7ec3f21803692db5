use anyhow::Context;
use reqwest::{Client, StatusCode};
use tracing::{debug, warn};

use crate::{config::Config, error::LookupError, model::WeatherRecord};

/// Single-city current-weather lookups against OpenWeather.
///
/// Each call performs at most one request and never retries. The outcome of
/// the most recent call is kept as [`WeatherClient::last_error`].
#[derive(Debug)]
pub struct WeatherClient {
    api_key: String,
    endpoint: String,
    http: Client,
    last_error: Option<LookupError>,
}

impl WeatherClient {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let http = Client::builder()
            .timeout(config.timeout())
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            api_key: config.api_key.clone(),
            endpoint: config.base_url.clone(),
            http,
            last_error: None,
        })
    }

    /// Fetch current weather for `city`.
    ///
    /// Sets the last error on failure and clears it on success.
    pub async fn lookup(&mut self, city: &str) -> Result<WeatherRecord, LookupError> {
        let outcome = self.fetch_current(city).await;

        match &outcome {
            Ok(record) => {
                debug!(city = record.city(), "weather lookup succeeded");
                self.last_error = None;
            }
            Err(err) => {
                warn!(city, error = %err, "weather lookup failed");
                self.last_error = Some(err.clone());
            }
        }

        outcome
    }

    /// Look up each city in turn, keeping only the successes in input order.
    pub async fn lookup_many<S: AsRef<str>>(&mut self, cities: &[S]) -> Vec<WeatherRecord> {
        let mut records = Vec::with_capacity(cities.len());

        for city in cities {
            if let Ok(record) = self.lookup(city.as_ref()).await {
                records.push(record);
            }
        }

        records
    }

    pub fn last_error(&self) -> Option<&LookupError> {
        self.last_error.as_ref()
    }

    /// User-facing text for the last failure, if any.
    pub fn last_error_message(&self) -> Option<String> {
        self.last_error.as_ref().map(ToString::to_string)
    }

    async fn fetch_current(&self, city: &str) -> Result<WeatherRecord, LookupError> {
        let city = city.trim();
        if city.is_empty() {
            return Err(LookupError::InvalidInput);
        }

        debug!(city, endpoint = %self.endpoint, "requesting current weather");

        let res = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("q", city),
                ("appid", self.api_key.as_str()),
                ("units", "metric"),
            ])
            .send()
            .await?;

        let status = res.status();
        if status != StatusCode::OK {
            return Err(LookupError::from_status(status.as_u16(), city));
        }

        let body = res.text().await?;

        WeatherRecord::from_json_str(&body).map_err(|err| {
            LookupError::Unknown(format!("Failed to parse weather response: {err}"))
        })
    }
}
