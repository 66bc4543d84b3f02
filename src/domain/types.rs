use serde::{Deserialize, Serialize};

/// Geographic coordinate in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub lat: f64,
    pub lon: f64,
}

impl Point {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Urgency tier of a delivery.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Priority {
    /// Must be served as early as possible within its route.
    Critical,
    Regular,
}

impl Priority {
    pub fn is_critical(self) -> bool {
        matches!(self, Priority::Critical)
    }
}

/// A stop that must be served by exactly one vehicle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Delivery {
    pub id: String,
    pub location: Point,
    /// Load weight in kilograms.
    pub weight: f64,
    pub priority: Priority,
}

impl Delivery {
    pub fn new(id: impl Into<String>, location: Point, weight: f64, priority: Priority) -> Self {
        Self {
            id: id.into(),
            location,
            weight,
            priority,
        }
    }
}

/// A vehicle available at the depot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    /// Maximum load weight in kilograms.
    pub max_capacity: f64,
    /// Maximum route distance in kilometers.
    pub max_range: f64,
    pub cost_per_km: f64,
}

impl Vehicle {
    pub fn new(id: impl Into<String>, max_capacity: f64, max_range: f64, cost_per_km: f64) -> Self {
        Self {
            id: id.into(),
            max_capacity,
            max_range,
            cost_per_km,
        }
    }
}
