//! Provider and vehicle class identifiers shared by every pipeline stage.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Ride-booking brand (e.g. `Uber`, `Ola`, `Rapido`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProviderId(String);

impl ProviderId {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ProviderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Category of ride offering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VehicleClass {
    /// Two-wheeler.
    Bike,
    /// Three-wheeler auto-rickshaw.
    Auto,
    Car,
}

impl VehicleClass {
    pub const ALL: [VehicleClass; 3] = [VehicleClass::Bike, VehicleClass::Auto, VehicleClass::Car];

    pub fn label(self) -> &'static str {
        match self {
            VehicleClass::Bike => "Bike",
            VehicleClass::Auto => "Auto",
            VehicleClass::Car => "Car",
        }
    }
}

impl fmt::Display for VehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Returned when a vehicle class name is not recognised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownVehicleClass(pub String);

impl fmt::Display for UnknownVehicleClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown vehicle class '{}' (expected bike, auto or car)", self.0)
    }
}

impl std::error::Error for UnknownVehicleClass {}

impl FromStr for VehicleClass {
    type Err = UnknownVehicleClass;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "bike" => Ok(VehicleClass::Bike),
            "auto" => Ok(VehicleClass::Auto),
            "car" => Ok(VehicleClass::Car),
            _ => Err(UnknownVehicleClass(value.to_string())),
        }
    }
}
