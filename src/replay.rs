//! Drive a tracker from a recorded JSON-lines sample stream.

use log::debug;
use serde::Serialize;
use std::io::BufRead;
use thiserror::Error;

use crate::config::ClickConfig;
use crate::tracker::{PointerAction, PointerSample, PointerTracker};

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("failed to read sample stream: {0}")]
    Io(#[from] std::io::Error),
    #[error("line {line}: invalid sample: {source}")]
    Parse {
        line: usize,
        #[source]
        source: serde_json::Error,
    },
}

/// Tracker state right after one sample was processed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReplayRow {
    pub action: PointerAction,
    pub current: (f32, f32),
    pub delta: (f32, f32),
    pub delta_from_start: (f32, f32),
    pub angle: (f64, f64),
    pub angle_from_start: (f64, f64),
    pub click: bool,
}

impl ReplayRow {
    fn capture(tracker: &PointerTracker, sample: &PointerSample, cfg: &ClickConfig) -> Self {
        Self {
            action: sample.action,
            current: (tracker.current_x(), tracker.current_y()),
            delta: (tracker.delta_x(), tracker.delta_y()),
            delta_from_start: (tracker.delta_x_from_start(), tracker.delta_y_from_start()),
            angle: (tracker.angle_x(), tracker.angle_y()),
            angle_from_start: (tracker.angle_x_from_start(), tracker.angle_y_from_start()),
            click: tracker.is_click(sample, cfg),
        }
    }
}

pub fn replay<R: BufRead>(
    reader: R,
    tracker: &mut PointerTracker,
    cfg: &ClickConfig,
) -> Result<Vec<ReplayRow>, ReplayError> {
    let mut rows = Vec::new();
    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        let sample: PointerSample =
            serde_json::from_str(&line).map_err(|source| ReplayError::Parse {
                line: idx + 1,
                source,
            })?;
        tracker.process_sample(&sample);
        rows.push(ReplayRow::capture(tracker, &sample, cfg));
    }
    debug!("replayed {} samples", rows.len());
    Ok(rows)
}
