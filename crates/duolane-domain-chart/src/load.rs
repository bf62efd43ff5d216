use crate::model::{Chart, ChartFile, Note, NoteRow};
use duolane_ports::types::Lane;

#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("invalid chart json: {0}")]
    Json(String),
}

/// What to do with a note whose lane is neither 0 nor 1.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LanePolicy {
    #[default]
    Drop,
    Clamp,
}

/// Changes made while turning a chart file into a playable `Chart`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SanitizeReport {
    pub reordered: bool,
    pub dropped_lane: usize,
    pub clamped_lane: usize,
    pub dropped_time: usize,
}

impl SanitizeReport {
    pub fn is_clean(&self) -> bool {
        *self == Self::default()
    }
}

#[derive(Clone, Debug)]
pub struct LoadedChart {
    pub chart: Chart,
    pub report: SanitizeReport,
}

pub fn parse_chart_bytes(bytes: &[u8], policy: LanePolicy) -> Result<LoadedChart, ChartError> {
    let file: ChartFile =
        serde_json::from_slice(bytes).map_err(|e| ChartError::Json(e.to_string()))?;
    Ok(sanitize_chart(file, policy))
}

/// Never fails: bad rows are dropped or repaired and counted in the report.
pub fn sanitize_chart(file: ChartFile, policy: LanePolicy) -> LoadedChart {
    let mut report = SanitizeReport::default();
    let mut rows: Vec<(f64, Lane)> = Vec::with_capacity(file.notes.len());

    for NoteRow { time_sec, lane } in file.notes {
        if !time_sec.is_finite() {
            report.dropped_time += 1;
            continue;
        }
        let lane = match (exact_lane(lane), policy) {
            (Some(lane), _) => lane,
            (None, LanePolicy::Clamp) if lane.is_finite() => {
                report.clamped_lane += 1;
                Lane::clamped(lane.round() as i64)
            }
            (None, _) => {
                report.dropped_lane += 1;
                continue;
            }
        };
        rows.push((time_sec, lane));
    }

    report.reordered = rows.windows(2).any(|w| w[0].0 > w[1].0);
    // Stable: equal times keep their file order.
    rows.sort_by(|a, b| a.0.total_cmp(&b.0));

    let notes = rows
        .into_iter()
        .enumerate()
        .map(|(index, (time_sec, lane))| Note {
            index,
            time_sec,
            lane,
        })
        .collect();

    LoadedChart {
        chart: Chart::from_sorted(file.bpm, file.grid_subdiv, notes),
        report,
    }
}

fn exact_lane(value: f64) -> Option<Lane> {
    if value == 0.0 {
        Some(Lane::Left)
    } else if value == 1.0 {
        Some(Lane::Right)
    } else {
        None
    }
}
