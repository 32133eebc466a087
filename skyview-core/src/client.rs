//! HTTP access to the OpenWeather endpoints.
//!
//! One request per call: no retry, no caching. Bodies are decoded with the
//! functions in [`crate::response`] so decode failures stay distinguishable
//! from transport failures.

use async_trait::async_trait;
use reqwest::Client;
use tracing::{debug, warn};

use crate::config::Config;
use crate::error::FetchError;
use crate::geocode::GeocodeService;
use crate::response::{self, AirQualityResponse, GeocodingResult, WeatherApiResponse};

const WEATHER_PATH: &str = "/data/3.0/onecall";
const AIR_QUALITY_PATH: &str = "/data/2.5/air_pollution";
const DIRECT_GEOCODING_PATH: &str = "/geo/1.0/direct";
const REVERSE_GEOCODING_PATH: &str = "/geo/1.0/reverse";

/// Gusts and temperatures in the canonical model assume metric input.
const UNITS: &str = "metric";

/// Weather and air quality for one location, fetched independently.
#[derive(Debug)]
pub struct ForecastFetch {
    pub weather: Result<WeatherApiResponse, FetchError>,
    pub air_quality: Result<AirQualityResponse, FetchError>,
}

#[derive(Debug, Clone)]
pub struct OpenWeatherClient {
    api_key: String,
    base_url: String,
    http: Client,
}

impl OpenWeatherClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, crate::config::DEFAULT_BASE_URL)
    }

    pub fn with_base_url(api_key: String, base_url: &str) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            http: Client::new(),
        }
    }

    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.api_key()?;
        Ok(Self::with_base_url(api_key, config.base_url()))
    }

    pub async fn fetch_weather(&self, lat: f64, lon: f64) -> Result<WeatherApiResponse, FetchError> {
        debug!(lat, lon, "fetching weather");
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let body = self
            .get(
                "weather",
                WEATHER_PATH,
                &[
                    ("lat", lat.as_str()),
                    ("lon", lon.as_str()),
                    ("units", UNITS),
                    ("exclude", "minutely,alerts"),
                ],
            )
            .await?;

        Ok(response::decode_weather(&body)?)
    }

    pub async fn fetch_air_quality(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<AirQualityResponse, FetchError> {
        debug!(lat, lon, "fetching air quality");
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let body = self
            .get(
                "air quality",
                AIR_QUALITY_PATH,
                &[("lat", lat.as_str()), ("lon", lon.as_str())],
            )
            .await?;

        Ok(response::decode_air_quality(&body)?)
    }

    /// Issues the weather and air-quality requests concurrently.
    /// Neither failure affects the other result.
    pub async fn fetch_forecast(&self, lat: f64, lon: f64) -> ForecastFetch {
        let (weather, air_quality) =
            tokio::join!(self.fetch_weather(lat, lon), self.fetch_air_quality(lat, lon));
        ForecastFetch { weather, air_quality }
    }

    pub async fn search_cities(
        &self,
        query: &str,
        limit: usize,
    ) -> Result<Vec<GeocodingResult>, FetchError> {
        debug!(query, limit, "searching cities");
        let limit = limit.to_string();
        let body = self
            .get(
                "geocoding",
                DIRECT_GEOCODING_PATH,
                &[("q", query), ("limit", limit.as_str())],
            )
            .await?;

        Ok(response::decode_geocoding(&body)?)
    }

    pub async fn reverse_geocode(
        &self,
        lat: f64,
        lon: f64,
    ) -> Result<Vec<GeocodingResult>, FetchError> {
        debug!(lat, lon, "reverse geocoding");
        let (lat, lon) = (lat.to_string(), lon.to_string());
        let body = self
            .get(
                "reverse geocoding",
                REVERSE_GEOCODING_PATH,
                &[("lat", lat.as_str()), ("lon", lon.as_str()), ("limit", "1")],
            )
            .await?;

        Ok(response::decode_reverse_geocoding(&body)?)
    }

    async fn get(
        &self,
        endpoint: &'static str,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Vec<u8>, FetchError> {
        let url = format!("{}{}", self.base_url, path);

        let res = self
            .http
            .get(&url)
            .query(query)
            .query(&[("appid", self.api_key.as_str())])
            .send()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        let status = res.status();
        let body = res
            .bytes()
            .await
            .map_err(|source| FetchError::Network { endpoint, source })?;

        if !status.is_success() {
            warn!(endpoint, %status, "upstream request failed");
            return Err(FetchError::Status {
                endpoint,
                status,
                body: truncate_body(&String::from_utf8_lossy(&body)),
            });
        }

        Ok(body.to_vec())
    }
}

#[async_trait]
impl GeocodeService for OpenWeatherClient {
    async fn reverse_lookup(&self, lat: f64, lon: f64) -> anyhow::Result<Option<String>> {
        let results = self.reverse_geocode(lat, lon).await?;
        Ok(results.into_iter().next().map(|place| place.name))
    }
}

fn truncate_body(body: &str) -> String {
    const MAX: usize = 200;
    match body.char_indices().nth(MAX) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
