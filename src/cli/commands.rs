use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tracing::{info, warn};
use uuid::Uuid;

use crate::cli::session::{Recorder, describe_shots, parse_command};
use crate::config::AppConfig;
use crate::geo::{DistanceUnit, Position, format_distance, haversine_meters};
use crate::map::{self, draw};
use crate::persistence::{JsonFileArchive, RoundArchive};
use crate::round::Round;
use crate::round::summary::{hole_result, summarize_round};
use crate::search::{CourseSearchClient, GolfCourse, SearchError, SearchSession, debounced_search};
use crate::store::GolfStore;

fn open_store(config: &AppConfig) -> GolfStore<JsonFileArchive> {
    GolfStore::new(JsonFileArchive::new(&config.storage_path))
}

/// Print archived rounds, newest first.
pub fn history(config: &AppConfig) -> Result<(), String> {
    let store = open_store(config);
    if store.rounds().is_empty() {
        println!("No rounds recorded in {}", config.storage_path);
        return Ok(());
    }
    print!("{}", format_history(store.rounds()));
    Ok(())
}

pub fn format_history(rounds: &[Round]) -> String {
    let mut out = format!(
        "{:<36}  {:<16}  {:<24} {:>5} {:>6} {:>5}\n",
        "Id", "Date", "Course", "Score", "Holes", "Shots"
    );
    out.push_str(&"-".repeat(99));
    out.push('\n');
    for round in rounds {
        let s = summarize_round(round);
        out.push_str(&format!(
            "{:<36}  {:<16}  {:<24} {:>5} {:>6} {:>5}\n",
            s.id,
            s.date.format("%Y-%m-%d %H:%M"),
            s.course_name,
            s.total_score,
            s.holes_scored,
            s.total_shots
        ));
    }
    out.push_str(&format!("\n{} round(s)\n", rounds.len()));
    out
}

/// Show one archived round: the score grid, then the selected hole's shots.
/// With `plan`, print the map drawing plan for the hole as JSON instead.
pub fn show(config: &AppConfig, round_id: &str, hole: u8, plan: bool) -> Result<(), String> {
    let id = Uuid::parse_str(round_id).map_err(|_| format!("Invalid round id '{}'", round_id))?;

    let mut store = open_store(config);
    store.select_historical_round(Some(id));
    if !store.is_historical_view() {
        return Err(format!("No round with id {} in {}", id, config.storage_path));
    }
    store.set_active_hole(hole);

    let active_hole = store
        .active_round_hole()
        .ok_or_else(|| format!("Round {} has no hole {}", id, hole))?;

    if plan {
        let requests = draw::draw_plan(Some(active_hole), None, None);
        let json = serde_json::to_string_pretty(&requests)
            .map_err(|e| format!("Cannot encode drawing plan: {}", e))?;
        println!("{}", json);
        return Ok(());
    }

    let round = store
        .selected_historical_round()
        .ok_or_else(|| format!("No round with id {}", id))?;
    print!("{}", format_scorecard(round));

    let center = map::view_center(&store, config.default_center());
    println!(
        "\nHole {} (par {}), map centered at {:.5}, {:.5}",
        active_hole.number, active_hole.par, center.latitude, center.longitude
    );
    if active_hole.shots.is_empty() {
        println!("  No shots recorded");
    }
    for line in describe_shots(active_hole, config.distance_unit()) {
        println!("{}", line);
    }
    for obstacle in &active_hole.obstacles {
        println!("  Obstacle: {} ({})", obstacle.title(), obstacle.kind);
    }
    Ok(())
}

pub fn format_scorecard(round: &Round) -> String {
    let mut out = format!(
        "{} - {}\n",
        round.course_name,
        round.date.format("%Y-%m-%d %H:%M")
    );
    out.push_str(&format!("{:<6}{:>5}{:>7}{:>7}\n", "Hole", "Par", "Score", "Shots"));
    for hole in &round.holes {
        let r = hole_result(hole);
        let score = r.score.map_or("-".to_string(), |s| s.to_string());
        out.push_str(&format!("{:<6}{:>5}{:>7}{:>7}\n", r.number, r.par, score, r.shots));
    }
    out.push_str(&format!("Total: {}\n", round.total_score));
    out
}

/// Search the course directory and print the matches.
pub async fn search(config: &AppConfig, query: &str) -> Result<(), String> {
    if config.course_api_key.trim().is_empty() {
        return Err(SearchError::MissingApiKey.to_string());
    }
    let client = CourseSearchClient::new(
        config.course_api_url.as_str(),
        config.course_api_key.as_str(),
        Duration::from_secs(config.request_timeout_secs),
    )
    .map_err(|e| e.to_string())?;

    if query.trim().is_empty() {
        return Err("Search query must not be empty".to_string());
    }

    let session = Arc::new(Mutex::new(SearchSession::new()));
    let delay = Duration::from_millis(config.search_debounce_ms);
    debounced_search(&client, &session, query, delay).await;
    let session = session.lock().await;

    if let Some(message) = session.error() {
        return Err(message.to_string());
    }
    if session.results().is_empty() {
        println!("No courses found for '{}'", query.trim());
        return Ok(());
    }
    for course in session.results() {
        println!("{}", format_course(course));
    }
    Ok(())
}

pub fn format_course(course: &GolfCourse) -> String {
    let name = if course.course_name.is_empty() || course.course_name == course.club_name {
        course.club_name.clone()
    } else {
        format!("{} - {}", course.club_name, course.course_name)
    };
    let place: Vec<&str> = [
        course.location.city.as_str(),
        course.location.state.as_str(),
        course.location.country.as_str(),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();

    if place.is_empty() {
        format!("[{}] {}", course.id, name)
    } else {
        format!("[{}] {} ({})", course.id, name, place.join(", "))
    }
}

pub fn distance(unit: DistanceUnit, from: Position, to: Position) -> Result<(), String> {
    for (label, p) in [("first", from), ("second", to)] {
        if !p.is_valid() {
            return Err(format!(
                "The {} point is out of range: {}, {}",
                label, p.latitude, p.longitude
            ));
        }
    }
    let meters = haversine_meters(from.latitude, from.longitude, to.latitude, to.longitude);
    println!("{}", format_distance(meters, unit));
    Ok(())
}

/// Record a round from line commands read from `script`, or stdin.
/// Completed rounds are written to the archive; an unfinished round is
/// discarded at the end of input.
pub fn record(
    config: &AppConfig,
    course: &str,
    script: Option<&str>,
    location: Option<Position>,
) -> Result<(), String> {
    let reader: Box<dyn BufRead> = match script {
        Some(path) => {
            let file = std::fs::File::open(Path::new(path))
                .map_err(|e| format!("Cannot open script {}: {}", path, e))?;
            Box::new(std::io::BufReader::new(file))
        }
        None => Box::new(std::io::stdin().lock()),
    };

    let center = map::initial_center(
        location.ok_or("no device location given"),
        config.default_center(),
    );
    println!(
        "Recording at {} (map centered at {:.5}, {:.5})",
        course, center.latitude, center.longitude
    );

    let recorder = Recorder::start(open_store(config), course, config.distance_unit());
    let recorder = run_session(recorder, reader)?;

    if recorder.store().current_round().is_some() {
        warn!(course, "Input ended before the round was completed");
        println!("Round not completed; nothing saved");
    } else {
        info!(path = %config.storage_path, "Round archived");
    }
    Ok(())
}

/// Feed every line of `reader` to the recorder, printing results.
/// Bad lines are reported and skipped.
pub fn run_session<A: RoundArchive>(
    mut recorder: Recorder<A>,
    reader: impl BufRead,
) -> Result<Recorder<A>, String> {
    for (number, line) in reader.lines().enumerate() {
        let line = line.map_err(|e| format!("Cannot read input: {}", e))?;
        let command = match parse_command(&line) {
            Ok(Some(command)) => command,
            Ok(None) => continue,
            Err(e) => {
                eprintln!("line {}: {}", number + 1, e);
                continue;
            }
        };
        match recorder.apply(command) {
            Ok(message) => println!("{}", message),
            Err(e) => eprintln!("line {}: {}", number + 1, e),
        }
    }
    Ok(recorder)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryArchive;
    use crate::round::NewShot;
    use crate::search::CourseLocation;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn played_round() -> Round {
        let date = chrono::Utc.with_ymd_and_hms(2024, 6, 1, 14, 30, 0).unwrap();
        let mut round = Round::new("Glen Abbey", date);
        let hole = round.hole_mut(1).unwrap();
        hole.shots.push(NewShot::at(Position::new(43.0, -79.0), date).into_shot(Uuid::new_v4()));
        hole.score = Some(5);
        round.total_score = 5;
        round.completed = true;
        round
    }

    #[test]
    fn history_lists_summary_columns() {
        let round = played_round();
        let out = format_history(&[round.clone()]);
        assert!(out.contains(&round.id.to_string()));
        assert!(out.contains("2024-06-01 14:30"));
        assert!(out.contains("Glen Abbey"));
        assert!(out.ends_with("1 round(s)\n"));
    }

    #[test]
    fn scorecard_shows_every_hole() {
        let out = format_scorecard(&played_round());
        assert!(out.starts_with("Glen Abbey - 2024-06-01 14:30\n"));
        // header + 18 holes + title + total
        assert_eq!(out.lines().count(), 21);
        assert!(out.contains("Total: 5"));
    }

    #[test]
    fn course_line_includes_location() {
        let course = GolfCourse {
            id: 12,
            club_name: "Pebble Beach Golf Links".to_string(),
            course_name: "Pebble Beach".to_string(),
            location: CourseLocation {
                city: "Pebble Beach".to_string(),
                state: "CA".to_string(),
                ..CourseLocation::default()
            },
            tees: Default::default(),
        };
        assert_eq!(
            format_course(&course),
            "[12] Pebble Beach Golf Links - Pebble Beach (Pebble Beach, CA)"
        );

        let bare = GolfCourse {
            id: 3,
            club_name: "Muni".to_string(),
            course_name: String::new(),
            location: CourseLocation::default(),
            tees: Default::default(),
        };
        assert_eq!(format_course(&bare), "[3] Muni");
    }

    #[tokio::test]
    async fn search_reports_user_facing_failure() {
        use wiremock::matchers::{method, path};
        use wiremock::{Mock, MockServer, ResponseTemplate};

        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/search"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&server)
            .await;

        let config = AppConfig {
            course_api_url: server.uri(),
            course_api_key: "secret".to_string(),
            search_debounce_ms: 0,
            ..AppConfig::default()
        };
        let err = search(&config, "pebble").await.unwrap_err();
        assert_eq!(err, crate::search::SEARCH_FAILED_MESSAGE);
        assert!(search(&config, "   ").await.is_err());

        let no_key = AppConfig {
            course_api_key: String::new(),
            ..config
        };
        let err = search(&no_key, "pebble").await.unwrap_err();
        assert!(err.contains("API key"));
    }

    #[test]
    fn distance_rejects_out_of_range_points() {
        let bad = Position::new(95.0, 0.0);
        assert!(distance(DistanceUnit::Metric, bad, Position::default()).is_err());
        let nan = Position::new(f64::NAN, 0.0);
        assert!(distance(DistanceUnit::Metric, Position::default(), nan).is_err());
        assert!(distance(DistanceUnit::Metric, Position::default(), Position::new(1.0, 1.0)).is_ok());
    }

    #[test]
    fn session_skips_bad_lines_and_archives_round() {
        let script = "\
# front nine
hole 1
mode tee
click 43.45 -80.49
mode off
bogus command
click 43.451 -80.489
save
complete
";
        let recorder = Recorder::start(
            GolfStore::new(MemoryArchive::new()),
            "Muni",
            DistanceUnit::Metric,
        );
        let recorder = run_session(recorder, script.as_bytes()).unwrap();

        let store = recorder.store();
        assert!(store.current_round().is_none());
        assert_eq!(store.rounds().len(), 1);
        assert_eq!(store.rounds()[0].total_score, 1);
        assert_eq!(store.archive().save_count(), 1);
    }

    #[test]
    fn show_rejects_unknown_round() {
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            storage_path: dir.path().join("rounds.json").display().to_string(),
            ..AppConfig::default()
        };
        let err = show(&config, &Uuid::new_v4().to_string(), 1, false).unwrap_err();
        assert!(err.contains("No round with id"));
        assert!(show(&config, "not-a-uuid", 1, false).is_err());
    }

    #[test]
    fn record_from_script_writes_archive() {
        let dir = TempDir::new().unwrap();
        let storage = dir.path().join("rounds.json");
        let script = dir.path().join("round.txt");
        std::fs::write(&script, "click 43.45 -80.49\nscore 4\ncomplete\n").unwrap();
        let config = AppConfig {
            storage_path: storage.display().to_string(),
            ..AppConfig::default()
        };

        record(&config, "Muni", Some(script.to_str().unwrap()), None).unwrap();

        let rounds = crate::persistence::read_rounds(&storage).unwrap();
        assert_eq!(rounds.len(), 1);
        assert_eq!(rounds[0].course_name, "Muni");
        assert_eq!(rounds[0].total_score, 4);
        assert!(show(&config, &rounds[0].id.to_string(), 1, false).is_ok());
        assert!(show(&config, &rounds[0].id.to_string(), 1, true).is_ok());
    }
}
