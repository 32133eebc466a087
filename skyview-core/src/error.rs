use serde::de::DeserializeOwned;
use std::fmt;
use thiserror::Error;

/// Which upstream (or local) JSON document a decode failure came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Document {
    Weather,
    AirQuality,
    Geocoding,
    ReverseGeocoding,
    Favorites,
}

impl Document {
    pub fn as_str(&self) -> &'static str {
        match self {
            Document::Weather => "weather",
            Document::AirQuality => "air quality",
            Document::Geocoding => "geocoding",
            Document::ReverseGeocoding => "reverse geocoding",
            Document::Favorites => "favorites",
        }
    }
}

impl fmt::Display for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Malformed or incomplete JSON: a required field is missing or has the wrong type.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Failed to decode {document} document at `{path}` (line {line}, column {column}): {reason}")]
pub struct DecodeError {
    pub document: Document,
    /// Location of the offending value, e.g. `hourly[0].visibility`; `.` for the root.
    pub path: String,
    pub line: usize,
    pub column: usize,
    pub reason: String,
}

impl DecodeError {
    pub fn from_path_error(
        document: Document,
        err: &serde_path_to_error::Error<serde_json::Error>,
    ) -> Self {
        let inner = err.inner();
        let mut decode = Self::at_root(document, inner);
        decode.path = field_path(&err.path().to_string(), &decode.reason);
        decode
    }

    /// A failure not tied to any value, such as trailing characters.
    pub fn at_root(document: Document, err: &serde_json::Error) -> Self {
        Self {
            document,
            path: ".".to_string(),
            line: err.line(),
            column: err.column(),
            reason: strip_position(&err.to_string()),
        }
    }
}

/// Decodes `bytes`, recording the path to the value that failed.
pub(crate) fn decode_json<T: DeserializeOwned>(
    document: Document,
    bytes: &[u8],
) -> Result<T, DecodeError> {
    let mut de = serde_json::Deserializer::from_slice(bytes);
    let value = serde_path_to_error::deserialize(&mut de)
        .map_err(|err| DecodeError::from_path_error(document, &err))?;
    de.end().map_err(|err| DecodeError::at_root(document, &err))?;
    Ok(value)
}

// serde_json appends " at line X column Y"; we carry those as fields.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(idx) => message[..idx].to_string(),
        None => message.to_string(),
    }
}

// A missing field is reported at its parent; point at the field itself.
fn field_path(path: &str, reason: &str) -> String {
    let missing = reason
        .strip_prefix("missing field `")
        .and_then(|rest| rest.strip_suffix('`'));

    match missing {
        Some(field) if path == "." => field.to_string(),
        Some(field) if !path.ends_with(&format!(".{field}")) => format!("{path}.{field}"),
        _ => path.to_string(),
    }
}

/// A required value was unusable after a successful decode.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransformError {
    #[error("Timestamp {value} in `{field}` is outside the representable date range")]
    InvalidTimestamp { field: &'static str, value: i64 },
}

/// Failure of a single upstream fetch.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Request to {endpoint} failed")]
    Network {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{endpoint} request failed with status {status}: {body}")]
    Status {
        endpoint: &'static str,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),
}

impl FetchError {
    pub fn is_decode(&self) -> bool {
        matches!(self, FetchError::Decode(_))
    }
}

#[derive(Debug, Error)]
pub enum FavoritesError {
    #[error("{0} is already in your favorites")]
    Duplicate(String),

    #[error("No favorite at position {index} (list has {len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Failed to access favorites file '{path}'")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error("Failed to encode favorites")]
    Encode(#[source] serde_json::Error),
}
