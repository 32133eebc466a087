//! Normalization of decoded upstream documents into canonical entries.
//!
//! Everything here is a pure function of its input: no I/O, no clock, no logging.
//! Temperatures are truncated toward zero, not rounded.

use chrono::{DateTime, TimeZone};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt::Display;

use crate::error::TransformError;
use crate::model::{CityCandidate, Pollutant, PollutantReading, WeatherEntry};
use crate::response::{
    AirQualityResponse, CurrentWeather, GeocodingResult, WeatherApiResponse, WeatherCondition,
};

/// Hourly outlook length.
pub const HOURLY_LIMIT: usize = 12;

/// Default number of geocoding candidates.
pub const DEFAULT_SEARCH_LIMIT: usize = 5;

pub const UNKNOWN_ICON: &str = "questionmark.circle";

const ICON_TABLE: [(&str, &str); 18] = [
    ("01d", "sun.max.fill"),
    ("01n", "sun.max.fill"),
    ("02d", "cloud.sun.fill"),
    ("02n", "cloud.sun.fill"),
    ("03d", "cloud.fill"),
    ("03n", "cloud.fill"),
    ("04d", "smoke.fill"),
    ("04n", "smoke.fill"),
    ("09d", "cloud.drizzle.fill"),
    ("09n", "cloud.drizzle.fill"),
    ("10d", "cloud.rain.fill"),
    ("10n", "cloud.rain.fill"),
    ("11d", "cloud.bolt.fill"),
    ("11n", "cloud.bolt.fill"),
    ("13d", "snow"),
    ("13n", "snow"),
    ("50d", "wind"),
    ("50n", "wind"),
];

const COMPASS: [&str; 8] = ["N", "NE", "E", "SE", "S", "SW", "W", "NW"];

const DAY_LABEL: &str = "%a";
const HOUR_LABEL: &str = "%-I %p";
const CLOCK_TIME: &str = "%-I:%M %p";

/// Daily and hourly outlooks from one weather document.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Outlook {
    pub daily: Vec<WeatherEntry>,
    pub hourly: Vec<WeatherEntry>,
}

impl Outlook {
    /// The entry describing current conditions, if upstream sent any daily records.
    pub fn today(&self) -> Option<&WeatherEntry> {
        self.daily.first()
    }
}

pub fn transform_weather<Tz>(
    response: &WeatherApiResponse,
    tz: &Tz,
) -> Result<Outlook, TransformError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    Ok(Outlook {
        daily: transform_daily(response, tz)?,
        hourly: transform_hourly(response, tz)?,
    })
}

/// One entry per daily record, in upstream order.
///
/// The first entry stands for "now": it carries the current temperature,
/// the composed long description, and visibility/pressure taken from the
/// current-conditions record.
pub fn transform_daily<Tz>(
    response: &WeatherApiResponse,
    tz: &Tz,
) -> Result<Vec<WeatherEntry>, TransformError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let current = &response.current;

    response
        .daily
        .iter()
        .enumerate()
        .map(|(index, daily)| -> Result<WeatherEntry, TransformError> {
            let is_now = index == 0;
            let condition = daily.weather.first();

            let long_description = if is_now {
                Some(long_description(current, tz)?)
            } else {
                None
            };

            Ok(WeatherEntry {
                time_label: format_timestamp(daily.dt, tz, DAY_LABEL, "daily.dt")?,
                icon: icon_for(condition).to_string(),
                low_temp: Some(truncate(daily.temp.min)),
                high_temp: truncate(daily.temp.max),
                current_temp: is_now.then(|| truncate(current.temp)),
                wind_gust_kph: daily.wind_gust,
                wind_direction: Some(bucket_direction(daily.wind_deg)),
                short_description: condition.map(|c| capitalize_words(&c.description)),
                long_description,
                humidity: Some(daily.humidity),
                precipitation_mm: daily.precipitation,
                visibility_km: if is_now { current.visibility.map(meters_to_km) } else { None },
                pressure_hpa: if is_now { current.pressure } else { None },
            })
        })
        .collect()
}

/// The first [`HOURLY_LIMIT`] hourly records; the rest are dropped.
pub fn transform_hourly<Tz>(
    response: &WeatherApiResponse,
    tz: &Tz,
) -> Result<Vec<WeatherEntry>, TransformError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    response
        .hourly
        .iter()
        .take(HOURLY_LIMIT)
        .map(|hourly| -> Result<WeatherEntry, TransformError> {
            let condition = hourly.weather.first();

            Ok(WeatherEntry {
                time_label: format_timestamp(hourly.dt, tz, HOUR_LABEL, "hourly.dt")?,
                icon: icon_for(condition).to_string(),
                low_temp: None,
                high_temp: truncate(hourly.temp),
                current_temp: None,
                wind_gust_kph: None,
                wind_direction: None,
                short_description: condition.map(|c| capitalize_words(&c.description)),
                long_description: None,
                humidity: Some(hourly.humidity),
                precipitation_mm: hourly.precipitation,
                visibility_km: Some(meters_to_km(hourly.visibility)),
                pressure_hpa: Some(hourly.pressure),
            })
        })
        .collect()
}

/// Provider icon code to display symbol; unmapped codes give [`UNKNOWN_ICON`].
pub fn map_icon(code: &str) -> &'static str {
    ICON_TABLE
        .iter()
        .find(|(upstream, _)| *upstream == code)
        .map(|(_, symbol)| *symbol)
        .unwrap_or(UNKNOWN_ICON)
}

/// 8-point compass label for a wind bearing. Any finite input is wrapped into [0, 360).
pub fn bucket_direction(degrees: f64) -> &'static str {
    let normalized = degrees.rem_euclid(360.0);
    // NaN casts to 0, i.e. "N".
    let index = ((normalized + 22.5) / 45.0).floor() as usize % COMPASS.len();
    COMPASS[index]
}

/// First pollution sample reduced to CO, NO2 and O3. `None` when upstream sent no samples.
pub fn transform_air_quality(response: &AirQualityResponse) -> Option<PollutantReading> {
    let sample = response.list.first()?;
    let components = &sample.components;

    let concentrations = BTreeMap::from([
        (Pollutant::Co, components.co),
        (Pollutant::No2, components.no2),
        (Pollutant::O3, components.o3),
    ]);

    Some(PollutantReading {
        index: sample.main.aqi,
        concentrations,
    })
}

/// At most `limit` candidates, in upstream rank order.
pub fn transform_geocoding(results: &[GeocodingResult], limit: usize) -> Vec<CityCandidate> {
    results
        .iter()
        .take(limit)
        .map(|result| CityCandidate {
            display_name: display_name(result),
            latitude: result.lat,
            longitude: result.lon,
        })
        .collect()
}

fn display_name(result: &GeocodingResult) -> String {
    [Some(&result.name), result.state.as_ref(), result.country.as_ref()]
        .into_iter()
        .flatten()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn long_description<Tz>(current: &CurrentWeather, tz: &Tz) -> Result<String, TransformError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let condition = current
        .weather
        .first()
        .map(|c| capitalize_words(&c.description))
        .unwrap_or_else(|| "Clear".to_string());
    let time = format_timestamp(current.dt, tz, CLOCK_TIME, "current.dt")?;
    let gust = truncate(current.wind_gust.unwrap_or(0.0));

    Ok(format!(
        "{condition} conditions expected around {time}. Wind gusts are up to {gust} km/h."
    ))
}

fn icon_for(condition: Option<&WeatherCondition>) -> &'static str {
    condition.map_or(UNKNOWN_ICON, |c| map_icon(&c.icon))
}

fn format_timestamp<Tz>(
    timestamp: i64,
    tz: &Tz,
    pattern: &str,
    field: &'static str,
) -> Result<String, TransformError>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let utc = DateTime::from_timestamp(timestamp, 0)
        .ok_or(TransformError::InvalidTimestamp { field, value: timestamp })?;
    Ok(utc.with_timezone(tz).format(pattern).to_string())
}

/// Upper-cases the first letter of every word and lower-cases the rest.
pub fn capitalize_words(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut word_start = true;

    for ch in text.chars() {
        if ch.is_whitespace() {
            word_start = true;
            out.push(ch);
        } else if word_start {
            word_start = false;
            out.extend(ch.to_uppercase());
        } else {
            out.extend(ch.to_lowercase());
        }
    }

    out
}

fn truncate(value: f64) -> i32 {
    value as i32
}

fn meters_to_km(meters: f64) -> f64 {
    meters / 1000.0
}
