pub mod distance;

pub use distance::{DistanceUnit, distance_between, format_distance, haversine_meters};

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
///
/// The zero position (0, 0) doubles as the "not placed yet" marker for tee
/// and pin positions on a freshly created hole.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Position {
            latitude,
            longitude,
        }
    }

    /// Finite latitude in [-90, 90] and longitude in [-180, 180].
    pub fn is_valid(&self) -> bool {
        (-90.0..=90.0).contains(&self.latitude) && (-180.0..=180.0).contains(&self.longitude)
    }

    /// True once the position has been placed on the map.
    pub fn is_set(&self) -> bool {
        self.latitude != 0.0 || self.longitude != 0.0
    }
}
