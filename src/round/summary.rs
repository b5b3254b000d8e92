use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::geo::distance_between;
use crate::round::{Hole, Round};

/// Distances for one shot, in metres.
#[derive(Debug, Clone, PartialEq)]
pub struct ShotDetail {
    /// Zero-based position in the hole's shot sequence.
    pub index: usize,
    /// Tee to this shot; first shot only, when the tee is placed.
    pub from_tee: Option<f64>,
    /// Previous shot to this one; every shot after the first.
    pub from_previous: Option<f64>,
    /// This shot to the pin, when the pin is placed.
    pub to_hole: Option<f64>,
}

/// Compute per-shot distances for a hole, in shot order.
pub fn shot_details(hole: &Hole) -> Vec<ShotDetail> {
    let tee = hole.tee_position.is_set().then_some(hole.tee_position);
    let pin = hole.hole_position.is_set().then_some(hole.hole_position);

    hole.shots
        .iter()
        .enumerate()
        .map(|(index, shot)| {
            let from_tee = if index == 0 {
                tee.map(|t| distance_between(&t, &shot.position))
            } else {
                None
            };
            let from_previous = index
                .checked_sub(1)
                .map(|prev| distance_between(&hole.shots[prev].position, &shot.position));
            let to_hole = pin.map(|p| distance_between(&shot.position, &p));

            ShotDetail {
                index,
                from_tee,
                from_previous,
                to_hole,
            }
        })
        .collect()
}

/// Score and stroke count for a single hole.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoleResult {
    pub number: u8,
    pub par: u32,
    pub score: Option<u32>,
    pub shots: usize,
}

pub fn hole_result(hole: &Hole) -> HoleResult {
    HoleResult {
        number: hole.number,
        par: hole.par,
        score: hole.score,
        shots: hole.shots.len(),
    }
}

/// One line of a round history listing.
#[derive(Debug, Clone, PartialEq)]
pub struct RoundSummary {
    pub id: Uuid,
    pub course_name: String,
    pub date: DateTime<Utc>,
    pub total_score: u32,
    pub holes_scored: usize,
    pub total_shots: usize,
}

pub fn summarize_round(round: &Round) -> RoundSummary {
    RoundSummary {
        id: round.id,
        course_name: round.course_name.clone(),
        date: round.date,
        total_score: round.total_score,
        holes_scored: round.holes.iter().filter(|h| h.score.is_some()).count(),
        total_shots: round.holes.iter().map(|h| h.shots.len()).sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{Position, haversine_meters};
    use crate::round::NewShot;
    use uuid::Uuid;

    fn hole_with_shots(tee: Position, pin: Position, shots: &[Position]) -> Hole {
        let mut hole = Hole::blank(1);
        hole.tee_position = tee;
        hole.hole_position = pin;
        hole.shots = shots
            .iter()
            .map(|p| NewShot::now(*p).into_shot(Uuid::new_v4()))
            .collect();
        hole
    }

    #[test]
    fn empty_hole_has_no_details() {
        assert!(shot_details(&Hole::blank(3)).is_empty());
    }

    #[test]
    fn first_shot_measured_from_tee_later_from_previous() {
        let tee = Position::new(0.0, 0.001);
        let pin = Position::new(0.0, 0.004);
        let shots = [Position::new(0.0, 0.002), Position::new(0.0, 0.003)];
        let hole = hole_with_shots(tee, pin, &shots);

        let details = shot_details(&hole);
        assert_eq!(details.len(), 2);

        let first = &details[0];
        assert_eq!(first.index, 0);
        assert!(first.from_previous.is_none());
        let expected = haversine_meters(0.0, 0.001, 0.0, 0.002);
        assert!((first.from_tee.unwrap() - expected).abs() < 1e-6);

        let second = &details[1];
        assert!(second.from_tee.is_none());
        assert!((second.from_previous.unwrap() - expected).abs() < 1e-3);
        assert!((second.to_hole.unwrap() - expected).abs() < 1e-3);
    }

    #[test]
    fn unplaced_tee_and_pin_skip_those_distances() {
        let shots = [Position::new(10.0, 10.0), Position::new(10.001, 10.0)];
        let hole = hole_with_shots(Position::default(), Position::default(), &shots);

        let details = shot_details(&hole);
        assert!(details[0].from_tee.is_none());
        assert!(details.iter().all(|d| d.to_hole.is_none()));
        assert!(details[1].from_previous.is_some());
    }

    #[test]
    fn summary_counts_scored_holes_and_shots() {
        let mut round = Round::new("Glen Abbey", Utc::now());
        round.holes[0].score = Some(5);
        round.holes[1].score = Some(3);
        round.holes[0].shots = vec![
            NewShot::now(Position::new(1.0, 1.0)).into_shot(Uuid::new_v4()),
            NewShot::now(Position::new(1.0, 1.001)).into_shot(Uuid::new_v4()),
        ];
        round.total_score = round.score_sum();

        let summary = summarize_round(&round);
        assert_eq!(summary.id, round.id);
        assert_eq!(summary.course_name, "Glen Abbey");
        assert_eq!(summary.total_score, 8);
        assert_eq!(summary.holes_scored, 2);
        assert_eq!(summary.total_shots, 2);
    }

    #[test]
    fn hole_result_reports_score_and_shots() {
        let mut hole = Hole::blank(12);
        hole.par = 3;
        hole.score = Some(2);
        let result = hole_result(&hole);
        assert_eq!(result.number, 12);
        assert_eq!(result.par, 3);
        assert_eq!(result.score, Some(2));
        assert_eq!(result.shots, 0);
    }
}
