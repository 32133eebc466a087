use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Canonical forecast record consumed by presentation layers.
///
/// Daily and hourly entries share this shape; fields that do not apply to
/// a period are `None` rather than zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeatherEntry {
    /// "Mon" for daily entries, "9 AM" for hourly entries.
    pub time_label: String,
    pub icon: String,
    /// Daily entries only.
    pub low_temp: Option<i32>,
    /// Hourly temperature, or the daily maximum.
    pub high_temp: i32,
    /// Only on the entry representing "now".
    pub current_temp: Option<i32>,
    pub wind_gust_kph: Option<f64>,
    pub wind_direction: Option<&'static str>,
    pub short_description: Option<String>,
    /// Only on the entry representing "now".
    pub long_description: Option<String>,
    pub humidity: Option<u8>,
    pub precipitation_mm: Option<f64>,
    pub visibility_km: Option<f64>,
    pub pressure_hpa: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Pollutant {
    #[serde(rename = "CO")]
    Co,
    #[serde(rename = "NO2")]
    No2,
    #[serde(rename = "O3")]
    O3,
}

impl Pollutant {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pollutant::Co => "CO",
            Pollutant::No2 => "NO2",
            Pollutant::O3 => "O3",
        }
    }

    pub const fn all() -> &'static [Pollutant] {
        &[Pollutant::Co, Pollutant::No2, Pollutant::O3]
    }
}

impl fmt::Display for Pollutant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PollutantReading {
    /// Upstream air quality index, 1 (good) to 5 (very poor).
    pub index: u8,
    /// µg/m³ per pollutant.
    pub concentrations: BTreeMap<Pollutant, f64>,
}

impl PollutantReading {
    pub fn concentration(&self, pollutant: Pollutant) -> Option<f64> {
        self.concentrations.get(&pollutant).copied()
    }

    /// Human label for the index, "Unknown" outside 1..=5.
    pub fn index_label(&self) -> &'static str {
        match self.index {
            1 => "Good",
            2 => "Fair",
            3 => "Moderate",
            4 => "Poor",
            5 => "Very Poor",
            _ => "Unknown",
        }
    }
}

/// A ranked result of a city search.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CityCandidate {
    /// "City, State, Country" with absent parts omitted.
    pub display_name: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// A saved location. Two favorites are the same city when their coordinates match exactly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteCity {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl FavoriteCity {
    pub fn new(name: impl Into<String>, latitude: f64, longitude: f64) -> Self {
        Self { name: name.into(), latitude, longitude }
    }

    pub fn same_coordinates(&self, latitude: f64, longitude: f64) -> bool {
        self.latitude == latitude && self.longitude == longitude
    }
}

impl fmt::Display for CityCandidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({:.4}, {:.4})", self.display_name, self.latitude, self.longitude)
    }
}

impl From<CityCandidate> for FavoriteCity {
    fn from(candidate: CityCandidate) -> Self {
        Self {
            name: candidate.display_name,
            latitude: candidate.latitude,
            longitude: candidate.longitude,
        }
    }
}
