use serde::Serialize;

use crate::geo::Position;
use crate::round::{Hole, ObstacleKind};

/// Radius of the placeholder circle shown after the green center is picked.
pub const GREEN_PREVIEW_RADIUS_M: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum MarkerKind {
    UserLocation,
    Tee,
    Pin,
    Obstacle { obstacle: ObstacleKind },
    Shot { number: usize, last: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LineStyle {
    /// Dashed line from the tee to the first shot.
    TeeShot,
    /// Solid line through all shots in order.
    ShotPath,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CircleStyle {
    Green,
    GreenPreview,
}

/// One thing for the map widget to draw.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case", tag = "type")]
pub enum DrawRequest {
    Marker {
        marker: MarkerKind,
        position: Position,
        #[serde(skip_serializing_if = "Option::is_none")]
        label: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Polyline {
        style: LineStyle,
        path: Vec<Position>,
    },
    Circle {
        style: CircleStyle,
        center: Position,
        radius: f64,
    },
}

fn marker(marker: MarkerKind, position: Position, label: Option<String>) -> DrawRequest {
    DrawRequest::Marker {
        marker,
        position,
        label,
        title: None,
    }
}

/// Everything to draw for one hole, in back-to-front order.
///
/// Tee and pin are only drawn once placed. Shots are numbered from 1 and
/// the most recent one is flagged so it can be highlighted.
pub fn draw_plan(
    hole: Option<&Hole>,
    user_location: Option<Position>,
    pending_green_center: Option<Position>,
) -> Vec<DrawRequest> {
    let mut requests = Vec::new();

    if let Some(location) = user_location {
        requests.push(marker(MarkerKind::UserLocation, location, None));
    }

    let Some(hole) = hole else {
        return requests;
    };

    let tee = hole.tee_position;
    let pin = hole.hole_position;

    if tee.is_set() {
        requests.push(marker(MarkerKind::Tee, tee, Some("T".to_string())));
        if let Some(first) = hole.shots.first() {
            requests.push(DrawRequest::Polyline {
                style: LineStyle::TeeShot,
                path: vec![tee, first.position],
            });
        }
    }

    if pin.is_set() {
        requests.push(marker(MarkerKind::Pin, pin, Some("H".to_string())));
    }

    if let Some(green) = hole.green_area {
        requests.push(DrawRequest::Circle {
            style: CircleStyle::Green,
            center: green.center,
            radius: green.radius,
        });
    }

    if let Some(center) = pending_green_center {
        requests.push(DrawRequest::Circle {
            style: CircleStyle::GreenPreview,
            center,
            radius: GREEN_PREVIEW_RADIUS_M,
        });
    }

    for obstacle in &hole.obstacles {
        requests.push(DrawRequest::Marker {
            marker: MarkerKind::Obstacle {
                obstacle: obstacle.kind,
            },
            position: obstacle.position,
            label: None,
            title: Some(obstacle.title().to_string()),
        });
    }

    let last = hole.shots.len().saturating_sub(1);
    for (i, shot) in hole.shots.iter().enumerate() {
        requests.push(marker(
            MarkerKind::Shot {
                number: i + 1,
                last: i == last,
            },
            shot.position,
            Some((i + 1).to_string()),
        ));
    }

    if hole.shots.len() > 1 {
        requests.push(DrawRequest::Polyline {
            style: LineStyle::ShotPath,
            path: hole.shots.iter().map(|s| s.position).collect(),
        });
    }

    requests
}
