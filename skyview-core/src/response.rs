//! Typed shapes of the upstream JSON payloads.
//!
//! Optional upstream fields stay `Option` here; defaults are a normalization concern.

use chrono::{FixedOffset, Offset, Utc};
use serde::Deserialize;

use crate::error::{DecodeError, Document, decode_json};

/// One-call weather document: current conditions plus daily and hourly outlooks.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherApiResponse {
    /// Seconds east of UTC for the requested location.
    pub timezone_offset: Option<i32>,
    pub current: CurrentWeather,
    pub daily: Vec<DailyWeather>,
    pub hourly: Vec<HourlyWeather>,
}

impl WeatherApiResponse {
    /// UTC offset of the forecast location, or UTC when upstream omits it.
    pub fn local_offset(&self) -> FixedOffset {
        self.timezone_offset
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WeatherCondition {
    pub icon: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CurrentWeather {
    pub temp: f64,
    pub weather: Vec<WeatherCondition>,
    pub wind_speed: f64,
    pub wind_gust: Option<f64>,
    pub dt: i64,
    pub humidity: u8,
    pub precipitation: Option<f64>,
    /// Meters.
    pub visibility: Option<f64>,
    /// hPa.
    pub pressure: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyTemp {
    pub min: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DailyWeather {
    pub dt: i64,
    pub temp: DailyTemp,
    pub weather: Vec<WeatherCondition>,
    pub wind_deg: f64,
    pub wind_gust: Option<f64>,
    pub humidity: u8,
    pub precipitation: Option<f64>,
    pub visibility: Option<f64>,
    pub pressure: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct HourlyWeather {
    pub dt: i64,
    pub temp: f64,
    pub weather: Vec<WeatherCondition>,
    pub humidity: u8,
    pub precipitation: Option<f64>,
    /// Meters; required for hourly records.
    pub visibility: f64,
    pub pressure: i32,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualityResponse {
    pub list: Vec<AirQualitySample>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualitySample {
    pub main: AirQualityMain,
    pub components: Pollutants,
    pub dt: i64,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AirQualityMain {
    /// 1 (good) to 5 (very poor).
    pub aqi: u8,
}

/// Concentrations in µg/m³. Other upstream components are ignored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Pollutants {
    pub co: f64,
    pub no2: f64,
    pub o3: f64,
}

/// One entry of a direct or reverse geocoding response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct GeocodingResult {
    pub name: String,
    pub lat: f64,
    pub lon: f64,
    pub country: Option<String>,
    pub state: Option<String>,
}

pub fn decode_weather(bytes: &[u8]) -> Result<WeatherApiResponse, DecodeError> {
    decode_json(Document::Weather, bytes)
}

pub fn decode_air_quality(bytes: &[u8]) -> Result<AirQualityResponse, DecodeError> {
    decode_json(Document::AirQuality, bytes)
}

pub fn decode_geocoding(bytes: &[u8]) -> Result<Vec<GeocodingResult>, DecodeError> {
    decode_json(Document::Geocoding, bytes)
}

pub fn decode_reverse_geocoding(bytes: &[u8]) -> Result<Vec<GeocodingResult>, DecodeError> {
    decode_json(Document::ReverseGeocoding, bytes)
}
