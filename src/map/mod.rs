//! Map interaction wiring.
//!
//! Translates map events (clicks with a position, pin-marker clicks) into
//! store mutations according to the setup mode, and keeps the transient
//! multi-step state those interactions need: the green center picked by the
//! first of two clicks, and a click position waiting for obstacle details.

pub mod draw;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::geo::{Position, distance_between};
use crate::persistence::RoundArchive;
use crate::round::{GreenArea, NewObstacle, NewShot, ObstacleKind, ObstacleKindError, SetupMode};
use crate::store::GolfStore;

/// What a map click did.
#[derive(Debug, Clone, PartialEq)]
pub enum ClickOutcome {
    /// Historical view, no round in progress, or an invalid position.
    Ignored,
    TeePlaced,
    /// Pin placed; the UI should offer to set up the green next.
    GreenSetupOffered,
    GreenCenterPicked,
    GreenPlaced(GreenArea),
    /// The UI should collect the obstacle type and optional name.
    ObstacleFormRequested,
    ShotRecorded,
}

/// Transient interaction state for one map view.
#[derive(Debug, Clone, Default)]
pub struct MapSession {
    pending_green_center: Option<Position>,
    pending_obstacle: Option<Position>,
}

impl MapSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn pending_green_center(&self) -> Option<Position> {
        self.pending_green_center
    }

    pub fn pending_obstacle(&self) -> Option<Position> {
        self.pending_obstacle
    }

    /// Interpret a click on the map at `position`.
    pub fn handle_click<A: RoundArchive>(
        &mut self,
        store: &mut GolfStore<A>,
        position: Position,
    ) -> ClickOutcome {
        if store.is_historical_view() || store.current_round().is_none() {
            return ClickOutcome::Ignored;
        }
        if !position.is_valid() {
            warn!(
                latitude = position.latitude,
                longitude = position.longitude,
                "Ignoring click outside valid coordinates"
            );
            return ClickOutcome::Ignored;
        }

        let hole = store.active_hole();
        match store.setup_mode() {
            Some(SetupMode::Tee) => {
                store.set_tee_position(hole, position);
                ClickOutcome::TeePlaced
            }
            Some(SetupMode::Hole) => {
                store.set_hole_position(hole, position);
                ClickOutcome::GreenSetupOffered
            }
            Some(SetupMode::Green) => match self.pending_green_center.take() {
                None => {
                    self.pending_green_center = Some(position);
                    ClickOutcome::GreenCenterPicked
                }
                Some(center) => {
                    let green = GreenArea {
                        center,
                        radius: distance_between(&center, &position),
                    };
                    store.set_green_area(hole, green);
                    store.set_setup_mode(None);
                    debug!(hole, radius = green.radius, "Green area placed");
                    ClickOutcome::GreenPlaced(green)
                }
            },
            Some(SetupMode::Obstacles) => {
                self.pending_obstacle = Some(position);
                ClickOutcome::ObstacleFormRequested
            }
            None => {
                store.add_shot(hole, NewShot::now(position));
                ClickOutcome::ShotRecorded
            }
        }
    }

    /// Complete the obstacle form for the last obstacle click.
    ///
    /// The type must be one of the closed obstacle set; anything else is
    /// rejected and nothing is added. A blank name counts as no name.
    pub fn submit_obstacle<A: RoundArchive>(
        &mut self,
        store: &mut GolfStore<A>,
        kind: &str,
        name: Option<&str>,
    ) -> Result<Option<Uuid>, ObstacleKindError> {
        let kind: ObstacleKind = kind.parse().inspect_err(|e| {
            warn!(error = %e, "Rejected obstacle input");
        })?;
        let Some(position) = self.pending_obstacle.take() else {
            return Ok(None);
        };
        let name = name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .map(str::to_string);
        let hole = store.active_hole();
        Ok(store.add_obstacle(
            hole,
            NewObstacle {
                kind,
                position,
                name,
            },
        ))
    }

    pub fn cancel_obstacle(&mut self) {
        self.pending_obstacle = None;
    }

    /// Answer "set up the green?" with yes.
    pub fn accept_green_setup<A: RoundArchive>(&mut self, store: &mut GolfStore<A>) {
        self.pending_green_center = None;
        store.set_setup_mode(Some(SetupMode::Green));
    }

    /// Answer "set up the green?" with no.
    pub fn decline_green_setup<A: RoundArchive>(&mut self, store: &mut GolfStore<A>) {
        self.pending_green_center = None;
        store.set_setup_mode(None);
    }

    /// Switch setup mode, dropping any half-finished interaction.
    pub fn change_setup_mode<A: RoundArchive>(
        &mut self,
        store: &mut GolfStore<A>,
        mode: Option<SetupMode>,
    ) {
        self.pending_green_center = None;
        self.pending_obstacle = None;
        store.set_setup_mode(mode);
    }
}

/// Whether a click on the pin marker should ask to complete the hole.
pub fn hole_marker_clicked<A: RoundArchive>(store: &GolfStore<A>) -> bool {
    !store.is_historical_view() && store.current_round().is_some() && store.setup_mode().is_none()
}

/// Map center at startup: the device location when available, otherwise
/// the configured default.
pub fn initial_center<E: std::fmt::Display>(
    geolocation: Result<Position, E>,
    default_center: Position,
) -> Position {
    match geolocation {
        Ok(position) => position,
        Err(e) => {
            warn!(error = %e, "Geolocation unavailable, using default map center");
            default_center
        }
    }
}

/// Where the map should be centered for the current view. Viewing history
/// recenters on the first shot of the active hole.
pub fn view_center<A: RoundArchive>(store: &GolfStore<A>, fallback: Position) -> Position {
    if !store.is_historical_view() {
        return fallback;
    }
    store
        .active_round_hole()
        .and_then(|hole| hole.shots.first())
        .map(|shot| shot.position)
        .unwrap_or(fallback)
}
