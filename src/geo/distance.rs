//! Great-circle distances between GPS positions.
//!
//! Uses the haversine formula on a spherical Earth. At golf-course scale the
//! error against an ellipsoidal model is well under a metre per hundred.

use serde::{Deserialize, Serialize};

use super::Position;

/// Mean Earth radius in metres.
pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

const YARDS_PER_METER: f64 = 1.093_613_3;
const YARDS_PER_MILE: f64 = 1760.0;

/// Unit system used when rendering distances for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistanceUnit {
    #[default]
    Metric,
    Imperial,
}

impl std::str::FromStr for DistanceUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "metric" => Ok(DistanceUnit::Metric),
            "imperial" => Ok(DistanceUnit::Imperial),
            other => Err(format!(
                "unknown distance unit '{}', expected 'metric' or 'imperial'",
                other
            )),
        }
    }
}

/// Haversine distance in metres between two (lat, lon) pairs given in degrees.
pub fn haversine_meters(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let d_phi = (lat2 - lat1).to_radians();
    let d_lambda = (lon2 - lon1).to_radians();

    let a = (d_phi / 2.0).sin().powi(2)
        + phi1.cos() * phi2.cos() * (d_lambda / 2.0).sin().powi(2);

    // Rounding can push `a` just past 1.0 for antipodal points
    let c = 2.0 * a.sqrt().clamp(-1.0, 1.0).asin();
    EARTH_RADIUS_M * c
}

/// Surface distance in metres between two positions.
pub fn distance_between(a: &Position, b: &Position) -> f64 {
    haversine_meters(a.latitude, a.longitude, b.latitude, b.longitude)
}

/// Render a distance in metres for display.
///
/// Metric: whole metres below one kilometre, otherwise kilometres with two
/// decimals. Imperial: whole yards below one mile, otherwise miles with two
/// decimals.
pub fn format_distance(meters: f64, unit: DistanceUnit) -> String {
    match unit {
        DistanceUnit::Metric => {
            if meters < 1000.0 {
                format!("{:.0}m", meters)
            } else {
                format!("{:.2}km", meters / 1000.0)
            }
        }
        DistanceUnit::Imperial => {
            let yards = meters * YARDS_PER_METER;
            if yards < YARDS_PER_MILE {
                format!("{:.0}yd", yards)
            } else {
                format!("{:.2}mi", yards / YARDS_PER_MILE)
            }
        }
    }
}
