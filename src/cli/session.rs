//! Line-oriented round recording.
//!
//! Each input line is one interaction: selecting a hole, switching setup
//! mode, clicking the map at a coordinate, filling in the obstacle form or
//! holing out. Blank lines and `#` comments are skipped.

use uuid::Uuid;

use crate::geo::{DistanceUnit, Position, format_distance};
use crate::map::{self, ClickOutcome, MapSession};
use crate::persistence::RoundArchive;
use crate::round::summary::shot_details;
use crate::round::{HOLES_PER_ROUND, SetupMode};
use crate::store::GolfStore;

#[derive(Debug, Clone, PartialEq)]
pub enum RecordCommand {
    Hole(u8),
    Mode(Option<SetupMode>),
    Click(Position),
    Obstacle { kind: String, name: Option<String> },
    RemoveObstacle(Uuid),
    Green(bool),
    Pin,
    Score(u32),
    Save,
    Complete,
    Status,
}

/// A coordinate within `-limit..=limit`. NaN and infinities are rejected.
fn parse_coord(value: Option<&str>, what: &str, limit: f64) -> Result<f64, String> {
    let raw = value.ok_or_else(|| format!("missing {}", what))?;
    let coord = raw
        .parse::<f64>()
        .map_err(|_| format!("invalid {} '{}'", what, raw))?;
    if !(-limit..=limit).contains(&coord) {
        return Err(format!(
            "{} must be between -{} and {}, got '{}'",
            what, limit, limit, raw
        ));
    }
    Ok(coord)
}

/// Parse one input line. `Ok(None)` for blank lines and comments.
pub fn parse_command(line: &str) -> Result<Option<RecordCommand>, String> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }

    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "hole" => {
            let raw = words.next().ok_or("usage: hole <1-18>")?;
            let number = raw
                .parse::<u8>()
                .ok()
                .filter(|n| (1..=HOLES_PER_ROUND).contains(n))
                .ok_or_else(|| format!("hole must be 1-{}, got '{}'", HOLES_PER_ROUND, raw))?;
            RecordCommand::Hole(number)
        }
        "mode" => match words.next() {
            Some("off") | Some("none") => RecordCommand::Mode(None),
            Some(mode) => RecordCommand::Mode(Some(mode.parse()?)),
            None => return Err("usage: mode tee|hole|green|obstacles|off".to_string()),
        },
        "click" => {
            let lat = parse_coord(words.next(), "latitude", 90.0)?;
            let lon = parse_coord(words.next(), "longitude", 180.0)?;
            RecordCommand::Click(Position::new(lat, lon))
        }
        "obstacle" => {
            let kind = words
                .next()
                .ok_or("usage: obstacle <water|bunker|trees|out-of-bounds> [name]")?
                .to_string();
            let name = words.collect::<Vec<_>>().join(" ");
            RecordCommand::Obstacle {
                kind,
                name: (!name.is_empty()).then_some(name),
            }
        }
        "remove-obstacle" => {
            let raw = words.next().ok_or("usage: remove-obstacle <id>")?;
            let id = Uuid::parse_str(raw).map_err(|_| format!("invalid obstacle id '{}'", raw))?;
            RecordCommand::RemoveObstacle(id)
        }
        "green" => match words.next() {
            Some("yes") => RecordCommand::Green(true),
            Some("no") => RecordCommand::Green(false),
            _ => return Err("usage: green yes|no".to_string()),
        },
        "pin" => RecordCommand::Pin,
        "score" => {
            let raw = words.next().ok_or("usage: score <strokes>")?;
            let score = raw
                .parse::<u32>()
                .map_err(|_| format!("invalid score '{}'", raw))?;
            RecordCommand::Score(score)
        }
        "save" => RecordCommand::Save,
        "complete" => RecordCommand::Complete,
        "status" => RecordCommand::Status,
        other => return Err(format!("unknown command '{}'", other)),
    };

    Ok(Some(command))
}

/// Drives a store and map session from parsed commands.
pub struct Recorder<A: RoundArchive> {
    store: GolfStore<A>,
    map: MapSession,
    unit: DistanceUnit,
}

impl<A: RoundArchive> Recorder<A> {
    pub fn start(mut store: GolfStore<A>, course_name: &str, unit: DistanceUnit) -> Self {
        store.start_new_round(course_name);
        Recorder {
            store,
            map: MapSession::new(),
            unit,
        }
    }

    pub fn store(&self) -> &GolfStore<A> {
        &self.store
    }

    /// Apply a command and describe what happened.
    pub fn apply(&mut self, command: RecordCommand) -> Result<String, String> {
        let hole = self.store.active_hole();
        match command {
            RecordCommand::Hole(n) => {
                self.store.set_active_hole(n);
                Ok(format!("Hole {}", n))
            }
            RecordCommand::Mode(mode) => {
                self.map.change_setup_mode(&mut self.store, mode);
                Ok(match mode {
                    Some(m) => format!("Setup mode: {:?}", m),
                    None => "Setup mode off".to_string(),
                })
            }
            RecordCommand::Click(position) => {
                let outcome = self.map.handle_click(&mut self.store, position);
                Ok(self.describe_click(hole, outcome))
            }
            RecordCommand::Obstacle { kind, name } => {
                match self
                    .map
                    .submit_obstacle(&mut self.store, &kind, name.as_deref())
                {
                    Ok(Some(id)) => Ok(format!("Obstacle {} added on hole {}", id, hole)),
                    Ok(None) => Err("Click the obstacle location first".to_string()),
                    Err(e) => Err(e.to_string()),
                }
            }
            RecordCommand::RemoveObstacle(id) => {
                self.store.remove_obstacle(hole, id);
                Ok(format!("Obstacle {} removed from hole {}", id, hole))
            }
            RecordCommand::Green(accept) => {
                if accept {
                    self.map.accept_green_setup(&mut self.store);
                    Ok("Click the green center, then its edge".to_string())
                } else {
                    self.map.decline_green_setup(&mut self.store);
                    Ok("Green setup skipped".to_string())
                }
            }
            RecordCommand::Pin => {
                if !map::hole_marker_clicked(&self.store) {
                    return Err("Cannot complete the hole right now".to_string());
                }
                let score = self
                    .store
                    .finish_hole_at_pin(hole)
                    .ok_or("No round in progress")?;
                Ok(format!("Hole {} completed in {} shots", hole, score))
            }
            RecordCommand::Score(score) => {
                self.store.complete_hole(hole, score);
                Ok(format!("Hole {} score set to {}", hole, score))
            }
            RecordCommand::Save => {
                let score = self.store.save_hole(hole).ok_or("No round in progress")?;
                Ok(format!("Hole {} saved with {} shots", hole, score))
            }
            RecordCommand::Complete => {
                self.store.complete_round().ok_or("No round in progress")?;
                let total = self.store.rounds().first().map_or(0, |r| r.total_score);
                Ok(format!("Round completed, total score {}", total))
            }
            RecordCommand::Status => Ok(self.status()),
        }
    }

    fn describe_click(&self, hole: u8, outcome: ClickOutcome) -> String {
        match outcome {
            ClickOutcome::Ignored => {
                "Click ignored: no round in progress or invalid position".to_string()
            }
            ClickOutcome::TeePlaced => format!("Tee set on hole {}", hole),
            ClickOutcome::GreenSetupOffered => {
                format!("Pin set on hole {}. Set up the green? (green yes|no)", hole)
            }
            ClickOutcome::GreenCenterPicked => "Green center set, click the edge".to_string(),
            ClickOutcome::GreenPlaced(green) => format!(
                "Green set on hole {} (radius {})",
                hole,
                format_distance(green.radius, self.unit)
            ),
            ClickOutcome::ObstacleFormRequested => {
                "Obstacle location set (obstacle <type> [name])".to_string()
            }
            ClickOutcome::ShotRecorded => {
                let shots = self.store.active_round_hole().map_or(0, |h| h.shots.len());
                format!("Shot {} on hole {}", shots, hole)
            }
        }
    }

    fn status(&self) -> String {
        let Some(hole) = self.store.active_round_hole() else {
            return "No round in progress".to_string();
        };
        let mut lines = vec![format!(
            "Hole {} (par {}) - shots: {}, score: {}",
            hole.number,
            hole.par,
            hole.shots.len(),
            hole.score.map_or("-".to_string(), |s| s.to_string())
        )];
        lines.extend(describe_shots(hole, self.unit));
        lines.join("\n")
    }
}

/// One line per shot with its distances.
pub fn describe_shots(hole: &crate::round::Hole, unit: DistanceUnit) -> Vec<String> {
    shot_details(hole)
        .into_iter()
        .map(|d| {
            let mut line = format!("  Shot {}", d.index + 1);
            if let Some(m) = d.from_tee {
                line.push_str(&format!("  from tee: {}", format_distance(m, unit)));
            }
            if let Some(m) = d.from_previous {
                line.push_str(&format!("  from previous: {}", format_distance(m, unit)));
            }
            if let Some(m) = d.to_hole {
                line.push_str(&format!("  to hole: {}", format_distance(m, unit)));
            }
            line
        })
        .collect()
}
