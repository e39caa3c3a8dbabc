//! Pluggable trip distance lookup.
//!
//! Two implementations:
//!
//! - **`FixedDistanceLookup`**: returns a preset distance. Zero dependencies.
//! - **`DistanceMatrixClient`** (feature `distance-matrix`): calls the Google
//!   Distance Matrix HTTP API.
//!
//! Response parsing lives in [`parse_matrix_response`] so it can be exercised
//! without network access.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Default Distance Matrix endpoint.
pub const DEFAULT_MATRIX_ENDPOINT: &str =
    "https://maps.googleapis.com/maps/api/distancematrix/json";

/// Origin, destination and optional intermediate stops, as free-text places.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TripQuery {
    pub pickup: String,
    pub drop: String,
    #[serde(default)]
    pub stops: Vec<String>,
}

impl TripQuery {
    pub fn new(pickup: impl Into<String>, drop: impl Into<String>) -> Self {
        Self {
            pickup: pickup.into(),
            drop: drop.into(),
            stops: Vec::new(),
        }
    }

    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stops.push(stop.into());
        self
    }

    pub fn validate(&self) -> Result<(), LookupError> {
        if self.pickup.trim().is_empty() || self.drop.trim().is_empty() {
            return Err(LookupError::InvalidQuery(
                "Pickup and drop locations are required".to_string(),
            ));
        }
        Ok(())
    }

    /// Stops joined the way the Distance Matrix `waypoints` parameter expects.
    pub fn waypoints(&self) -> Option<String> {
        if self.stops.is_empty() {
            None
        } else {
            Some(self.stops.join("|"))
        }
    }
}

/// Representative distance and duration for a trip.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripDistance {
    #[serde(rename = "distance")]
    pub distance_km: f64,
    #[serde(rename = "duration")]
    pub duration_minutes: u32,
    pub distance_text: String,
    pub duration_text: String,
}

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("{0}")]
    InvalidQuery(String),

    #[error("distance lookup endpoint is not configured")]
    MissingEndpoint,

    #[error("distance lookup request failed: {0}")]
    Http(String),

    #[error("Failed to calculate distance: {details}")]
    Api { status: String, details: String },

    #[error("No valid route found between these locations ({status})")]
    NoRoute { status: String },

    #[error("malformed distance lookup response: {0}")]
    MalformedResponse(String),
}

/// Trait for distance backends. Implementations must be `Send + Sync` so a
/// single lookup can be shared across request handlers.
pub trait DistanceLookup: Send + Sync {
    fn lookup(&self, query: &TripQuery) -> Result<TripDistance, LookupError>;
}

/// Always answers with the same distance. Useful offline and in tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedDistanceLookup {
    pub distance_km: f64,
    pub average_speed_kmh: f64,
}

impl FixedDistanceLookup {
    pub fn new(distance_km: f64) -> Self {
        Self {
            distance_km,
            average_speed_kmh: 25.0,
        }
    }
}

impl DistanceLookup for FixedDistanceLookup {
    fn lookup(&self, query: &TripQuery) -> Result<TripDistance, LookupError> {
        query.validate()?;
        let duration_minutes = (self.distance_km / self.average_speed_kmh * 60.0).round() as u32;
        Ok(TripDistance {
            distance_km: self.distance_km,
            duration_minutes,
            distance_text: format!("{:.1} km", self.distance_km),
            duration_text: format!("{duration_minutes} mins"),
        })
    }
}

fn field<'a>(value: &'a Value, key: &str) -> Result<&'a Value, LookupError> {
    value
        .get(key)
        .ok_or_else(|| LookupError::MalformedResponse(format!("missing '{key}'")))
}

fn measurement(element: &Value, key: &str) -> Result<(f64, String), LookupError> {
    let section = field(element, key)?;
    let amount = field(section, "value")?
        .as_f64()
        .ok_or_else(|| LookupError::MalformedResponse(format!("'{key}.value' is not a number")))?;
    let text = section
        .get("text")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    Ok((amount, text))
}

/// Extract the first origin/destination pair from a Distance Matrix response.
pub fn parse_matrix_response(response: &Value) -> Result<TripDistance, LookupError> {
    let status = response
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN");
    if status != "OK" {
        let details = response
            .get("error_message")
            .and_then(Value::as_str)
            .unwrap_or(status)
            .to_string();
        return Err(LookupError::Api {
            status: status.to_string(),
            details,
        });
    }

    let element = response
        .get("rows")
        .and_then(|rows| rows.get(0))
        .and_then(|row| row.get("elements"))
        .and_then(|elements| elements.get(0));
    let element = match element {
        Some(element) => element,
        None => {
            return Err(LookupError::NoRoute {
                status: "MISSING".to_string(),
            })
        }
    };

    let element_status = element
        .get("status")
        .and_then(Value::as_str)
        .unwrap_or("UNKNOWN");
    if element_status != "OK" {
        return Err(LookupError::NoRoute {
            status: element_status.to_string(),
        });
    }

    let (metres, distance_text) = measurement(element, "distance")?;
    let (seconds, duration_text) = measurement(element, "duration")?;

    Ok(TripDistance {
        distance_km: metres / 1000.0,
        duration_minutes: (seconds / 60.0).round() as u32,
        distance_text,
        duration_text,
    })
}

// ---------------------------------------------------------------------------
// Distance Matrix provider (behind `distance-matrix` feature)
// ---------------------------------------------------------------------------

#[cfg(feature = "distance-matrix")]
pub mod matrix {
    use super::*;
    use reqwest::blocking::Client;
    use std::time::Duration;
    use tracing::{debug, warn};

    /// Looks up trip distance via the Google Distance Matrix API.
    pub struct DistanceMatrixClient {
        client: Client,
        endpoint: String,
        api_key: String,
    }

    impl DistanceMatrixClient {
        pub fn new(api_key: &str) -> Result<Self, LookupError> {
            Self::with_endpoint(DEFAULT_MATRIX_ENDPOINT, api_key)
        }

        pub fn with_endpoint(endpoint: &str, api_key: &str) -> Result<Self, LookupError> {
            if endpoint.trim().is_empty() || api_key.trim().is_empty() {
                return Err(LookupError::MissingEndpoint);
            }
            let client = Client::builder()
                .timeout(Duration::from_secs(5))
                .build()
                .map_err(|error| LookupError::Http(error.to_string()))?;
            Ok(Self {
                client,
                endpoint: endpoint.trim_end_matches('/').to_string(),
                api_key: api_key.to_string(),
            })
        }
    }

    impl DistanceLookup for DistanceMatrixClient {
        fn lookup(&self, query: &TripQuery) -> Result<TripDistance, LookupError> {
            query.validate()?;

            let mut params = vec![
                ("origins", query.pickup.clone()),
                ("destinations", query.drop.clone()),
            ];
            if let Some(waypoints) = query.waypoints() {
                params.push(("waypoints", waypoints));
            }
            params.push(("key", self.api_key.clone()));
            params.push(("units", "metric".to_string()));

            debug!(pickup = %query.pickup, drop = %query.drop, stops = query.stops.len(), "calling distance matrix");
            let response: Value = self
                .client
                .get(&self.endpoint)
                .query(&params)
                .send()
                .and_then(|response| response.json())
                .map_err(|error| LookupError::Http(error.to_string()))?;

            parse_matrix_response(&response).map_err(|error| {
                warn!(%error, "distance matrix lookup failed");
                error
            })
        }
    }
}
