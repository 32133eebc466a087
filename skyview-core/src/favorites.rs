//! Saved cities.
//!
//! The list is flat and persisted whole on every change through a
//! [`FavoritesStore`]. Uniqueness is by exact coordinates, never by name.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use crate::error::{Document, FavoritesError, decode_json};
use crate::geocode::{GeocodeService, resolve_place_name};
use crate::model::FavoriteCity;

pub trait FavoritesStore {
    fn load(&self) -> Result<Vec<FavoriteCity>, FavoritesError>;
    fn save(&self, cities: &[FavoriteCity]) -> Result<(), FavoritesError>;
}

/// JSON array on disk. A missing file is an empty list.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> FavoritesError {
        FavoritesError::Io {
            path: self.path.display().to_string(),
            source,
        }
    }
}

impl FavoritesStore for JsonFileStore {
    fn load(&self) -> Result<Vec<FavoriteCity>, FavoritesError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let bytes = fs::read(&self.path).map_err(|e| self.io_error(e))?;
        if bytes.is_empty() {
            return Ok(Vec::new());
        }

        let cities: Vec<FavoriteCity> = decode_json(Document::Favorites, &bytes)?;

        tracing::debug!(path = %self.path.display(), count = cities.len(), "loaded favorites");
        Ok(cities)
    }

    fn save(&self, cities: &[FavoriteCity]) -> Result<(), FavoritesError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }

        let json = serde_json::to_vec_pretty(cities).map_err(FavoritesError::Encode)?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))?;

        tracing::debug!(path = %self.path.display(), count = cities.len(), "saved favorites");
        Ok(())
    }
}

/// Keeps the list in memory only.
#[derive(Debug, Default)]
pub struct MemoryStore {
    cities: Mutex<Vec<FavoriteCity>>,
}

impl MemoryStore {
    pub fn new(cities: Vec<FavoriteCity>) -> Self {
        Self { cities: Mutex::new(cities) }
    }

    pub fn snapshot(&self) -> Vec<FavoriteCity> {
        self.cities.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

impl FavoritesStore for MemoryStore {
    fn load(&self) -> Result<Vec<FavoriteCity>, FavoritesError> {
        Ok(self.snapshot())
    }

    fn save(&self, cities: &[FavoriteCity]) -> Result<(), FavoritesError> {
        *self.cities.lock().unwrap_or_else(PoisonError::into_inner) = cities.to_vec();
        Ok(())
    }
}

/// The favorites list bound to its store.
#[derive(Debug)]
pub struct Favorites<S: FavoritesStore> {
    store: S,
    cities: Vec<FavoriteCity>,
}

impl<S: FavoritesStore> Favorites<S> {
    pub fn load(store: S) -> Result<Self, FavoritesError> {
        let cities = store.load()?;
        Ok(Self { store, cities })
    }

    pub fn cities(&self) -> &[FavoriteCity] {
        &self.cities
    }

    pub fn iter(&self) -> impl Iterator<Item = &FavoriteCity> {
        self.cities.iter()
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    pub fn get(&self, index: usize) -> Result<&FavoriteCity, FavoritesError> {
        self.cities.get(index).ok_or(FavoritesError::IndexOutOfRange {
            index,
            len: self.cities.len(),
        })
    }

    pub fn contains_coordinates(&self, latitude: f64, longitude: f64) -> bool {
        self.cities.iter().any(|c| c.same_coordinates(latitude, longitude))
    }

    /// Appends `city` unless a favorite already sits at the same coordinates.
    /// The list is left unchanged when the store fails to save.
    pub fn add(&mut self, city: FavoriteCity) -> Result<&FavoriteCity, FavoritesError> {
        if self.contains_coordinates(city.latitude, city.longitude) {
            return Err(FavoritesError::Duplicate(city.name));
        }

        let mut next = self.cities.clone();
        next.push(city);
        self.commit(next)?;

        let index = self.cities.len() - 1;
        Ok(&self.cities[index])
    }

    /// Adds a favorite named by reverse geocoding the coordinates.
    pub async fn add_by_coordinates(
        &mut self,
        geocoder: &dyn GeocodeService,
        latitude: f64,
        longitude: f64,
    ) -> Result<&FavoriteCity, FavoritesError> {
        if let Some(existing) = self.cities.iter().find(|c| c.same_coordinates(latitude, longitude)) {
            return Err(FavoritesError::Duplicate(existing.name.clone()));
        }

        let name = resolve_place_name(geocoder, latitude, longitude).await;
        self.add(FavoriteCity::new(name, latitude, longitude))
    }

    pub fn remove(&mut self, index: usize) -> Result<FavoriteCity, FavoritesError> {
        if index >= self.cities.len() {
            return Err(FavoritesError::IndexOutOfRange {
                index,
                len: self.cities.len(),
            });
        }

        let mut next = self.cities.clone();
        let removed = next.remove(index);
        self.commit(next)?;
        Ok(removed)
    }

    fn commit(&mut self, next: Vec<FavoriteCity>) -> Result<(), FavoritesError> {
        self.store.save(&next)?;
        self.cities = next;
        Ok(())
    }

    pub fn into_store(self) -> S {
        self.store
    }
}
