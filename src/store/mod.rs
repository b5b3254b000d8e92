//! The round state store.
//!
//! Owns the round being played, the archived history and the UI pointers
//! (active hole, setup mode, viewed historical round). Every operation is a
//! single synchronous mutation; operations that need a current round leave
//! the state untouched when there is none.

use chrono::Utc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::geo::Position;
use crate::persistence::RoundArchive;
use crate::round::{GreenArea, Hole, NewObstacle, NewShot, Obstacle, Round, SetupMode};

pub struct GolfStore<A: RoundArchive> {
    current_round: Option<Round>,
    rounds: Vec<Round>,
    active_hole: u8,
    setup_mode: Option<SetupMode>,
    selected_round: Option<Uuid>,
    archive: A,
}

impl<A: RoundArchive> GolfStore<A> {
    /// Create a store, loading the round history from `archive`.
    pub fn new(archive: A) -> Self {
        let rounds = archive.load();
        debug!(count = rounds.len(), "Round history loaded");
        GolfStore {
            current_round: None,
            rounds,
            active_hole: 1,
            setup_mode: None,
            selected_round: None,
            archive,
        }
    }

    // === Accessors ===

    pub fn current_round(&self) -> Option<&Round> {
        self.current_round.as_ref()
    }

    /// Completed rounds, newest first.
    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn active_hole(&self) -> u8 {
        self.active_hole
    }

    pub fn setup_mode(&self) -> Option<SetupMode> {
        self.setup_mode
    }

    pub fn selected_historical_round(&self) -> Option<&Round> {
        let id = self.selected_round?;
        self.rounds.iter().find(|r| r.id == id)
    }

    pub fn is_historical_view(&self) -> bool {
        self.selected_historical_round().is_some()
    }

    /// The round on display: a viewed historical round takes precedence
    /// over the round in progress.
    pub fn active_round(&self) -> Option<&Round> {
        self.selected_historical_round()
            .or(self.current_round.as_ref())
    }

    /// The active hole of the round on display.
    pub fn active_round_hole(&self) -> Option<&Hole> {
        self.active_round()?.hole(self.active_hole)
    }

    pub fn archive(&self) -> &A {
        &self.archive
    }

    // === Round lifecycle ===

    /// Start a fresh 18-hole round. An unfinished current round is
    /// discarded.
    pub fn start_new_round(&mut self, course_name: &str) -> Uuid {
        if let Some(previous) = &self.current_round {
            info!(round = %previous.id, "Discarding unfinished round");
        }
        let round = Round::new(course_name, Utc::now());
        let id = round.id;
        info!(round = %id, course = course_name, "Started new round");
        self.current_round = Some(round);
        self.active_hole = 1;
        id
    }

    /// Append a shot to a hole of the current round. Returns the new shot id.
    pub fn add_shot(&mut self, hole_number: u8, shot: NewShot) -> Option<Uuid> {
        let hole = self.current_hole_mut(hole_number)?;
        let id = Uuid::new_v4();
        hole.shots.push(shot.into_shot(id));
        Some(id)
    }

    /// Record a score for a hole. The score is not checked against the
    /// number of recorded shots.
    pub fn complete_hole(&mut self, hole_number: u8, score: u32) {
        if let Some(hole) = self.current_hole_mut(hole_number) {
            hole.score = Some(score);
        }
    }

    /// Score a hole with the number of shots recorded so far.
    pub fn save_hole(&mut self, hole_number: u8) -> Option<u32> {
        let hole = self.current_hole_mut(hole_number)?;
        let score = hole.shots.len() as u32;
        hole.score = Some(score);
        Some(score)
    }

    /// Hole out: add a final shot at the pin, then score the hole with the
    /// resulting shot count.
    pub fn finish_hole_at_pin(&mut self, hole_number: u8) -> Option<u32> {
        let pin = self.current_hole_mut(hole_number)?.hole_position;
        self.add_shot(hole_number, NewShot::now(pin))?;
        self.save_hole(hole_number)
    }

    /// Finish the current round: total the hole scores, move it to the front
    /// of the history and persist the history. Returns the round id.
    pub fn complete_round(&mut self) -> Option<Uuid> {
        let mut round = self.current_round.take()?;
        round.completed = true;
        round.total_score = round.score_sum();
        let id = round.id;

        info!(
            round = %id,
            course = %round.course_name,
            total_score = round.total_score,
            "Round completed"
        );

        self.rounds.insert(0, round);
        self.archive.save(&self.rounds);
        self.active_hole = 1;
        Some(id)
    }

    // === UI pointers ===

    pub fn set_active_hole(&mut self, hole_number: u8) {
        self.active_hole = hole_number;
    }

    pub fn set_setup_mode(&mut self, mode: Option<SetupMode>) {
        self.setup_mode = mode;
    }

    /// View an archived round, or clear the view with `None`. An unknown id
    /// also clears the view. The active hole resets to 1 either way.
    pub fn select_historical_round(&mut self, round_id: Option<Uuid>) {
        self.selected_round =
            round_id.filter(|id| self.rounds.iter().any(|r| r.id == *id));
        self.active_hole = 1;
    }

    // === Course setup ===

    pub fn set_tee_position(&mut self, hole_number: u8, position: Position) {
        if let Some(hole) = self.current_hole_mut(hole_number) {
            hole.tee_position = position;
        }
    }

    pub fn set_hole_position(&mut self, hole_number: u8, position: Position) {
        if let Some(hole) = self.current_hole_mut(hole_number) {
            hole.hole_position = position;
        }
    }

    pub fn set_green_area(&mut self, hole_number: u8, green_area: GreenArea) {
        if let Some(hole) = self.current_hole_mut(hole_number) {
            hole.green_area = Some(green_area);
        }
    }

    /// Add an obstacle to a hole of the current round. Returns its id.
    pub fn add_obstacle(&mut self, hole_number: u8, obstacle: NewObstacle) -> Option<Uuid> {
        let hole = self.current_hole_mut(hole_number)?;
        let id = Uuid::new_v4();
        hole.obstacles.push(Obstacle {
            id,
            kind: obstacle.kind,
            position: obstacle.position,
            name: obstacle.name,
        });
        Some(id)
    }

    pub fn remove_obstacle(&mut self, hole_number: u8, obstacle_id: Uuid) {
        if let Some(hole) = self.current_hole_mut(hole_number) {
            hole.obstacles.retain(|o| o.id != obstacle_id);
        }
    }

    fn current_hole_mut(&mut self, hole_number: u8) -> Option<&mut Hole> {
        self.current_round.as_mut()?.hole_mut(hole_number)
    }
}
