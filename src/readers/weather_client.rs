//! Hourly outside temperature from the Open-Meteo historical archive.

use crate::error::{ProcessingError, Result};
use crate::settings::WeatherSettings;
use crate::utils::constants::WEATHER_HOURLY_VARIABLE;
use chrono::{DateTime, NaiveDateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use std::future::Future;
use std::time::Duration;
use tracing::{debug, warn};

/// One hourly reading; `None` when the archive has no value for that hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyTemperature {
    pub time: DateTime<Utc>,
    pub value: Option<f64>,
}

/// Anything able to provide hourly outside temperature for a UTC range.
pub trait TemperatureSource {
    fn fetch_hourly(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> impl Future<Output = Result<Vec<HourlyTemperature>>> + Send;
}

/// Used when weather fetching is disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NoTemperatureSource;

impl TemperatureSource for NoTemperatureSource {
    async fn fetch_hourly(
        &self,
        _start: DateTime<Utc>,
        _end: DateTime<Utc>,
    ) -> Result<Vec<HourlyTemperature>> {
        Ok(Vec::new())
    }
}

#[derive(Debug, Deserialize)]
struct ArchiveResponse {
    #[serde(default)]
    hourly: Option<HourlyBlock>,
}

#[derive(Debug, Deserialize)]
struct HourlyBlock {
    #[serde(default)]
    time: Vec<String>,
    #[serde(default)]
    temperature_2m: Vec<Option<f64>>,
}

pub struct OpenMeteoClient {
    client: Client,
    base_url: String,
    latitude: f64,
    longitude: f64,
}

impl OpenMeteoClient {
    pub fn new(settings: &WeatherSettings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()?;
        Ok(Self {
            client,
            base_url: settings.base_url.clone(),
            latitude: settings.latitude,
            longitude: settings.longitude,
        })
    }

    async fn request(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Result<String> {
        let start_date = start.date_naive().format("%Y-%m-%d").to_string();
        let end_date = end.date_naive().format("%Y-%m-%d").to_string();

        debug!(%start_date, %end_date, "Requesting hourly temperature");

        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("latitude", self.latitude.to_string()),
                ("longitude", self.longitude.to_string()),
                ("start_date", start_date),
                ("end_date", end_date),
                ("hourly", WEATHER_HOURLY_VARIABLE.to_string()),
                ("timezone", "UTC".to_string()),
            ])
            .send()
            .await?
            .error_for_status()?;

        Ok(resp.text().await?)
    }
}

impl TemperatureSource for OpenMeteoClient {
    async fn fetch_hourly(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Result<Vec<HourlyTemperature>> {
        let body = self.request(start, end).await?;
        parse_archive_response(&body)
    }
}

/// Parse the archive JSON body into readings sorted by time
pub fn parse_archive_response(body: &str) -> Result<Vec<HourlyTemperature>> {
    let response: ArchiveResponse = serde_json::from_str(body)?;
    let Some(hourly) = response.hourly else {
        return Ok(Vec::new());
    };

    let mut readings = Vec::with_capacity(hourly.time.len());
    for (time, value) in hourly.time.iter().zip(hourly.temperature_2m) {
        readings.push(HourlyTemperature {
            time: parse_archive_time(time)?,
            value,
        });
    }
    readings.sort_by_key(|r| r.time);
    Ok(readings)
}

/// The archive returns `2024-01-01T00:00` when asked for UTC
fn parse_archive_time(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M") {
        return Ok(naive.and_utc());
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| ProcessingError::InvalidFormat(format!("Invalid archive time: '{}'", raw)))
}

/// Fetch, degrading any failure to an empty result
pub async fn fetch_or_empty<S: TemperatureSource>(
    source: &S,
    start: DateTime<Utc>,
    end: DateTime<Utc>,
) -> Vec<HourlyTemperature> {
    match source.fetch_hourly(start, end).await {
        Ok(readings) => readings,
        Err(e) => {
            warn!(%start, %end, error = %e, "Could not fetch outside temperature");
            Vec::new()
        }
    }
}

/// Forward-fill hourly readings onto the grid; uncovered instants become 0.0.
///
/// `grid` must be sorted ascending.
pub fn expand_to_grid(readings: &[HourlyTemperature], grid: &[DateTime<Utc>]) -> Vec<f64> {
    let mut out = Vec::with_capacity(grid.len());
    let mut next = 0usize;
    let mut current: Option<f64> = None;

    for instant in grid {
        while next < readings.len() && readings[next].time <= *instant {
            current = readings[next].value;
            next += 1;
        }
        out.push(current.unwrap_or(0.0));
    }
    out
}
