//! Core library for the `skyview` CLI.
//!
//! This crate defines:
//! - Typed upstream response models (weather, air quality, geocoding)
//! - The normalization pipeline producing UI-ready forecast entries
//! - Configuration & credentials handling
//! - An HTTP client for the upstream endpoints
//! - Favorites persistence and reverse geocoding capabilities
//!
//! The `response` and `normalize` modules are pure: no I/O, no logging.

pub mod client;
pub mod config;
pub mod error;
pub mod favorites;
pub mod geocode;
pub mod model;
pub mod normalize;
pub mod response;

pub use client::{ForecastFetch, OpenWeatherClient};
pub use config::Config;
pub use error::{DecodeError, Document, FavoritesError, FetchError, TransformError};
pub use favorites::{Favorites, FavoritesStore, JsonFileStore, MemoryStore};
pub use geocode::GeocodeService;
pub use model::{CityCandidate, FavoriteCity, Pollutant, PollutantReading, WeatherEntry};
pub use normalize::{
    Outlook, bucket_direction, map_icon, transform_air_quality, transform_daily,
    transform_geocoding, transform_hourly, transform_weather,
};
pub use response::{AirQualityResponse, GeocodingResult, WeatherApiResponse};
