use anyhow::{Context, Error as AnyError};
use elevation::{geo::geometry::Coord, TrackFix};
use gpx::Waypoint;
use serde::Deserialize;
use std::{
    fs::{self, File},
    io::{BufReader, Read},
    path::Path,
};

/// One entry of a track file, as written by `geopath json`.
#[derive(Debug, Deserialize)]
struct JsonEntry {
    /// `[longitude, latitude]` in degrees.
    location: [f64; 2],
    elevation: f32,
}

impl From<JsonEntry> for TrackFix {
    fn from(
        JsonEntry {
            location: [x, y],
            elevation,
        }: JsonEntry,
    ) -> Self {
        Self {
            location: Coord { x, y },
            elevation_m: elevation,
        }
    }
}

/// Reads a GPX file if `path` ends in `.gpx`, geopath JSON otherwise.
pub fn read_fixes(path: &Path) -> Result<Vec<TrackFix>, AnyError> {
    let fixes = if is_gpx(path) {
        let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
        parse_gpx(BufReader::new(file))
    } else {
        let json =
            fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
        parse_fixes(&json)
    };
    fixes.with_context(|| format!("parsing {}", path.display()))
}

fn is_gpx(path: &Path) -> bool {
    path.extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("gpx"))
}

fn parse_fixes(json: &str) -> Result<Vec<TrackFix>, AnyError> {
    let entries: Vec<JsonEntry> = serde_json::from_str(json)?;
    Ok(entries.into_iter().map(TrackFix::from).collect())
}

/// Track points in segment order, then route points. Points without
/// an elevation are dropped.
fn parse_gpx<R: Read>(reader: R) -> Result<Vec<TrackFix>, AnyError> {
    let gpx = gpx::read(reader)?;
    let track_points = gpx
        .tracks
        .iter()
        .flat_map(|track| &track.segments)
        .flat_map(|segment| &segment.points);
    let route_points = gpx.routes.iter().flat_map(|route| &route.points);
    Ok(track_points
        .chain(route_points)
        .filter_map(waypoint_fix)
        .collect())
}

fn waypoint_fix(waypoint: &Waypoint) -> Option<TrackFix> {
    let elevation = waypoint.elevation?;
    let point = waypoint.point();
    #[allow(clippy::cast_possible_truncation)]
    let elevation_m = elevation as f32;
    Some(TrackFix {
        location: Coord {
            x: point.x(),
            y: point.y(),
        },
        elevation_m,
    })
}
