pub mod hole;
pub mod summary;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use crate::geo::Position;
pub use hole::{
    GreenArea, Hole, NewObstacle, NewShot, Obstacle, ObstacleKind, ObstacleKindError, Shot,
};

pub const HOLES_PER_ROUND: u8 = 18;

/// How the next map click is interpreted. `None` in the store means a click
/// records a shot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SetupMode {
    Tee,
    Hole,
    Green,
    Obstacles,
}

impl std::str::FromStr for SetupMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tee" => Ok(SetupMode::Tee),
            "hole" => Ok(SetupMode::Hole),
            "green" => Ok(SetupMode::Green),
            "obstacles" => Ok(SetupMode::Obstacles),
            other => Err(format!(
                "unknown setup mode '{}', expected tee, hole, green or obstacles",
                other
            )),
        }
    }
}

/// One 18-hole playing session.
///
/// `holes[i]` is hole number `i + 1`. `total_score` is only meaningful once
/// `completed` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Round {
    pub id: Uuid,
    pub course_name: String,
    pub date: DateTime<Utc>,
    pub holes: Vec<Hole>,
    pub total_score: u32,
    pub completed: bool,
}

impl Round {
    pub fn new(course_name: impl Into<String>, date: DateTime<Utc>) -> Self {
        Round {
            id: Uuid::new_v4(),
            course_name: course_name.into(),
            date,
            holes: (1..=HOLES_PER_ROUND).map(Hole::blank).collect(),
            total_score: 0,
            completed: false,
        }
    }

    pub fn hole(&self, number: u8) -> Option<&Hole> {
        self.holes.iter().find(|h| h.number == number)
    }

    pub fn hole_mut(&mut self, number: u8) -> Option<&mut Hole> {
        self.holes.iter_mut().find(|h| h.number == number)
    }

    /// Sum of hole scores, unscored holes counting as zero. Saturates at
    /// `u32::MAX`.
    pub fn score_sum(&self) -> u32 {
        self.holes
            .iter()
            .map(|h| h.score.unwrap_or(0))
            .fold(0u32, |total, score| total.saturating_add(score))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_round_has_eighteen_numbered_holes() {
        let round = Round::new("Pebble", Utc::now());
        assert_eq!(round.course_name, "Pebble");
        assert_eq!(round.holes.len(), 18);
        for (i, hole) in round.holes.iter().enumerate() {
            assert_eq!(hole.number as usize, i + 1);
            assert_eq!(hole.par, 4);
            assert!(hole.shots.is_empty());
            assert!(hole.score.is_none());
        }
        assert!(!round.completed);
        assert_eq!(round.total_score, 0);
    }

    #[test]
    fn hole_ids_are_distinct() {
        let round = Round::new("Pebble", Utc::now());
        let mut ids: Vec<_> = round.holes.iter().map(|h| h.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 18);
    }

    #[test]
    fn hole_lookup_by_number() {
        let mut round = Round::new("Pebble", Utc::now());
        assert_eq!(round.hole(1).map(|h| h.number), Some(1));
        assert_eq!(round.hole(18).map(|h| h.number), Some(18));
        assert!(round.hole(0).is_none());
        assert!(round.hole(19).is_none());
        assert!(round.hole_mut(19).is_none());
    }

    #[test]
    fn score_sum_treats_unscored_as_zero() {
        let mut round = Round::new("Pebble", Utc::now());
        round.holes[0].score = Some(4);
        round.holes[9].score = Some(6);
        assert_eq!(round.score_sum(), 10);
    }

    #[test]
    fn score_sum_saturates_instead_of_overflowing() {
        let mut round = Round::new("Pebble", Utc::now());
        round.holes[0].score = Some(u32::MAX);
        round.holes[1].score = Some(1);
        assert_eq!(round.score_sum(), u32::MAX);
    }

    #[test]
    fn serializes_camel_case_record() {
        let mut round = Round::new("Pebble", Utc::now());
        round.holes[0].score = Some(4);
        let json = serde_json::to_value(&round).unwrap();
        assert_eq!(json["courseName"], "Pebble");
        assert_eq!(json["totalScore"], 0);
        let hole = &json["holes"][0];
        assert!(hole.get("teePosition").is_some());
        assert!(hole.get("holePosition").is_some());
        assert_eq!(hole["score"], 4);
        assert!(json.get("course_name").is_none());
    }

    #[test]
    fn setup_mode_parses() {
        assert_eq!("tee".parse::<SetupMode>(), Ok(SetupMode::Tee));
        assert_eq!("GREEN".parse::<SetupMode>(), Ok(SetupMode::Green));
        assert!("bunker".parse::<SetupMode>().is_err());
    }
}
