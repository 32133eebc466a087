//! Reverse geocoding: coordinates to a place name for saved favorites.

use async_trait::async_trait;
use std::fmt::Debug;

pub const UNKNOWN_LOCATION: &str = "Unknown Location";
pub const UNNAMED_LOCATION: &str = "Unnamed Location";

#[async_trait]
pub trait GeocodeService: Send + Sync + Debug {
    /// `Ok(None)` when the lookup succeeded but found no named place.
    async fn reverse_lookup(&self, lat: f64, lon: f64) -> anyhow::Result<Option<String>>;
}

/// Name for a coordinate pair. Never fails: lookup errors give
/// [`UNKNOWN_LOCATION`], an empty result gives [`UNNAMED_LOCATION`].
pub async fn resolve_place_name(service: &dyn GeocodeService, lat: f64, lon: f64) -> String {
    match service.reverse_lookup(lat, lon).await {
        Ok(Some(name)) => name,
        Ok(None) => UNNAMED_LOCATION.to_string(),
        Err(err) => {
            tracing::warn!(lat, lon, "reverse geocoding failed: {err:#}");
            UNKNOWN_LOCATION.to_string()
        }
    }
}
