use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geo::Position;

pub const DEFAULT_PAR: u32 = 4;

// === Enums ===

/// Hazard categories a player can place on a hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ObstacleKind {
    Water,
    Bunker,
    Trees,
    OutOfBounds,
}

impl ObstacleKind {
    pub const ALL: [ObstacleKind; 4] = [
        ObstacleKind::Water,
        ObstacleKind::Bunker,
        ObstacleKind::Trees,
        ObstacleKind::OutOfBounds,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ObstacleKind::Water => "water",
            ObstacleKind::Bunker => "bunker",
            ObstacleKind::Trees => "trees",
            ObstacleKind::OutOfBounds => "out-of-bounds",
        }
    }
}

impl std::fmt::Display for ObstacleKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected obstacle type input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObstacleKindError(pub String);

impl std::fmt::Display for ObstacleKindError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Unknown obstacle type '{}', expected one of: water, bunker, trees, out-of-bounds",
            self.0
        )
    }
}

impl std::error::Error for ObstacleKindError {}

impl std::str::FromStr for ObstacleKind {
    type Err = ObstacleKindError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        ObstacleKind::ALL
            .into_iter()
            .find(|kind| kind.as_str() == wanted)
            .ok_or_else(|| ObstacleKindError(s.trim().to_string()))
    }
}

// === Shot / Obstacle ===

/// A recorded stroke location. Stored with the coordinates inline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shot {
    pub id: Uuid,
    #[serde(flatten)]
    pub position: Position,
    pub timestamp: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub club: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
}

/// Shot data supplied by the caller; the store assigns the identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct NewShot {
    pub position: Position,
    pub timestamp: DateTime<Utc>,
    pub club: Option<String>,
    pub notes: Option<String>,
    pub distance: Option<f64>,
}

impl NewShot {
    pub fn at(position: Position, timestamp: DateTime<Utc>) -> Self {
        NewShot {
            position,
            timestamp,
            club: None,
            notes: None,
            distance: None,
        }
    }

    pub fn now(position: Position) -> Self {
        Self::at(position, Utc::now())
    }

    pub(crate) fn into_shot(self, id: Uuid) -> Shot {
        Shot {
            id,
            position: self.position,
            timestamp: self.timestamp,
            club: self.club,
            notes: self.notes,
            distance: self.distance,
        }
    }
}

/// Circular approximation of the putting green.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GreenArea {
    pub center: Position,
    /// Radius in metres.
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Obstacle {
    pub id: Uuid,
    #[serde(rename = "type")]
    pub kind: ObstacleKind,
    pub position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Obstacle {
    /// Name shown on the map; falls back to the hazard type.
    pub fn title(&self) -> &str {
        self.name.as_deref().unwrap_or(self.kind.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NewObstacle {
    pub kind: ObstacleKind,
    pub position: Position,
    pub name: Option<String>,
}

// === Hole ===

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hole {
    pub id: Uuid,
    pub number: u8,
    pub par: u32,
    pub tee_position: Position,
    pub hole_position: Position,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub green_area: Option<GreenArea>,
    #[serde(default)]
    pub obstacles: Vec<Obstacle>,
    #[serde(default)]
    pub shots: Vec<Shot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<u32>,
}

impl Hole {
    /// A blank hole: default par, unplaced tee and pin, no shots, no score.
    pub fn blank(number: u8) -> Self {
        Hole {
            id: Uuid::new_v4(),
            number,
            par: DEFAULT_PAR,
            tee_position: Position::default(),
            hole_position: Position::default(),
            green_area: None,
            obstacles: Vec::new(),
            shots: Vec::new(),
            score: None,
        }
    }

    pub fn shot_count(&self) -> usize {
        self.shots.len()
    }

    pub fn is_completed(&self) -> bool {
        self.score.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn obstacle_kind_accepts_closed_set() {
        assert_eq!("water".parse::<ObstacleKind>(), Ok(ObstacleKind::Water));
        assert_eq!("Bunker".parse::<ObstacleKind>(), Ok(ObstacleKind::Bunker));
        assert_eq!(" trees ".parse::<ObstacleKind>(), Ok(ObstacleKind::Trees));
        assert_eq!(
            "out-of-bounds".parse::<ObstacleKind>(),
            Ok(ObstacleKind::OutOfBounds)
        );
    }

    #[test]
    fn obstacle_kind_rejects_anything_else() {
        for input in ["", "lava", "outOfBounds", "water bunker", "rough"] {
            let err = input.parse::<ObstacleKind>().unwrap_err();
            assert!(err.to_string().contains("expected one of"), "{}", err);
        }
    }

    #[test]
    fn obstacle_kind_serializes_kebab_case() {
        let json = serde_json::to_string(&ObstacleKind::OutOfBounds).unwrap();
        assert_eq!(json, "\"out-of-bounds\"");
        let back: ObstacleKind = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ObstacleKind::OutOfBounds);
    }

    #[test]
    fn shot_and_obstacle_record_shape() {
        let shot = NewShot::at(Position::new(43.45, -80.49), Utc::now()).into_shot(Uuid::new_v4());
        let json = serde_json::to_value(&shot).unwrap();
        assert_eq!(json["latitude"], 43.45);
        assert_eq!(json["longitude"], -80.49);
        assert!(json.get("position").is_none());
        let back: Shot = serde_json::from_value(json).unwrap();
        assert_eq!(back, shot);

        let obstacle = Obstacle {
            id: Uuid::new_v4(),
            kind: ObstacleKind::OutOfBounds,
            position: Position::new(1.0, 2.0),
            name: None,
        };
        let json = serde_json::to_value(&obstacle).unwrap();
        assert_eq!(json["type"], "out-of-bounds");
        assert!(json.get("name").is_none());
    }

    #[test]
    fn blank_hole_defaults() {
        let hole = Hole::blank(7);
        assert_eq!(hole.number, 7);
        assert_eq!(hole.par, DEFAULT_PAR);
        assert!(!hole.tee_position.is_set());
        assert!(!hole.hole_position.is_set());
        assert!(hole.green_area.is_none());
        assert!(hole.obstacles.is_empty());
        assert_eq!(hole.shot_count(), 0);
        assert!(!hole.is_completed());
    }

    #[test]
    fn obstacle_title_falls_back_to_kind() {
        let mut obstacle = Obstacle {
            id: Uuid::new_v4(),
            kind: ObstacleKind::Water,
            position: Position::new(1.0, 1.0),
            name: None,
        };
        assert_eq!(obstacle.title(), "water");
        obstacle.name = Some("Pond".to_string());
        assert_eq!(obstacle.title(), "Pond");
    }
}
