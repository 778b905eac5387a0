//! Single-pointer gesture tracking: current, last and down positions.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::ClickConfig;
use crate::logging::{DebugSink, LogSink};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerAction {
    Start,
    Move,
    End,
    Cancel,
    /// Host action code this helper does not interpret.
    Other(i32),
}

impl fmt::Display for PointerAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PointerAction::Start => f.write_str("start"),
            PointerAction::Move => f.write_str("move"),
            PointerAction::End => f.write_str("end"),
            PointerAction::Cancel => f.write_str("cancel"),
            PointerAction::Other(code) => write!(f, "other({code})"),
        }
    }
}

/// One pointer event as delivered by the host, in absolute screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct PointerSample {
    pub action: PointerAction,
    pub x: f32,
    pub y: f32,
    #[serde(default)]
    pub event_time_ms: u64,
    #[serde(default)]
    pub down_time_ms: u64,
}

impl PointerSample {
    pub fn new(action: PointerAction, x: f32, y: f32) -> Self {
        Self {
            action,
            x,
            y,
            event_time_ms: 0,
            down_time_ms: 0,
        }
    }

    pub fn with_times(mut self, down_time_ms: u64, event_time_ms: u64) -> Self {
        self.down_time_ms = down_time_ms;
        self.event_time_ms = event_time_ms;
        self
    }

    pub fn duration_ms(&self) -> u64 {
        self.event_time_ms.saturating_sub(self.down_time_ms)
    }
}

pub struct PointerTracker {
    current_x: f32,
    current_y: f32,
    last_x: f32,
    last_y: f32,
    down_x: f32,
    down_y: f32,
    debug: bool,
    sink: Box<dyn DebugSink>,
}

impl fmt::Debug for PointerTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PointerTracker")
            .field("current", &(self.current_x, self.current_y))
            .field("last", &(self.last_x, self.last_y))
            .field("down", &(self.down_x, self.down_y))
            .field("debug", &self.debug)
            .finish()
    }
}

impl Default for PointerTracker {
    fn default() -> Self {
        Self::new()
    }
}

/// Angle in degrees between `(along, across)` and the `along` axis.
/// A zero `along` component yields 0 rather than 90.
fn axis_angle(along: f32, across: f32) -> f64 {
    if along == 0.0 {
        return 0.0;
    }
    let ratio = across.abs() / along.abs();
    f64::from(ratio).atan().to_degrees()
}

impl PointerTracker {
    pub fn new() -> Self {
        Self {
            current_x: 0.0,
            current_y: 0.0,
            last_x: 0.0,
            last_y: 0.0,
            down_x: 0.0,
            down_y: 0.0,
            debug: false,
            sink: Box::new(LogSink),
        }
    }

    pub fn with_sink(sink: Box<dyn DebugSink>) -> Self {
        Self {
            sink,
            ..Self::new()
        }
    }

    pub fn set_sink(&mut self, sink: Box<dyn DebugSink>) {
        self.sink = sink;
    }

    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn is_debug(&self) -> bool {
        self.debug
    }

    /// Zeroes every position; the debug flag and sink are kept.
    pub fn reset(&mut self) {
        self.current_x = 0.0;
        self.current_y = 0.0;
        self.last_x = 0.0;
        self.last_y = 0.0;
        self.down_x = 0.0;
        self.down_y = 0.0;
    }

    pub fn process_sample(&mut self, sample: &PointerSample) {
        self.last_x = self.current_x;
        self.last_y = self.current_y;

        self.current_x = sample.x;
        self.current_y = sample.y;

        if sample.action == PointerAction::Start {
            self.down_x = self.current_x;
            self.down_y = self.current_y;
        }

        if self.debug {
            let tag = format!("event {}", sample.action);
            self.sink.record(&tag, &self.debug_info());
        }
    }

    pub fn current_x(&self) -> f32 {
        self.current_x
    }

    pub fn current_y(&self) -> f32 {
        self.current_y
    }

    pub fn last_x(&self) -> f32 {
        self.last_x
    }

    pub fn last_y(&self) -> f32 {
        self.last_y
    }

    pub fn down_x(&self) -> f32 {
        self.down_x
    }

    pub fn down_y(&self) -> f32 {
        self.down_y
    }

    // --- deltas ---

    pub fn delta_x(&self) -> f32 {
        self.current_x - self.last_x
    }

    pub fn delta_y(&self) -> f32 {
        self.current_y - self.last_y
    }

    pub fn delta_x_from_start(&self) -> f32 {
        self.current_x - self.down_x
    }

    pub fn delta_y_from_start(&self) -> f32 {
        self.current_y - self.down_y
    }

    // --- angles, unsigned, in degrees ---

    /// Angle of the latest movement against the horizontal axis.
    pub fn angle_x(&self) -> f64 {
        axis_angle(self.delta_x(), self.delta_y())
    }

    /// Angle of the latest movement against the vertical axis.
    pub fn angle_y(&self) -> f64 {
        axis_angle(self.delta_y(), self.delta_x())
    }

    pub fn angle_x_from_start(&self) -> f64 {
        axis_angle(self.delta_x_from_start(), self.delta_y_from_start())
    }

    pub fn angle_y_from_start(&self) -> f64 {
        axis_angle(self.delta_y_from_start(), self.delta_x_from_start())
    }

    /// True for an `End` sample that arrives quickly and close to where the
    /// gesture started. Movement is truncated to whole pixels first.
    pub fn is_click(&self, sample: &PointerSample, cfg: &ClickConfig) -> bool {
        if sample.action != PointerAction::End {
            return false;
        }
        let dx = (self.delta_x_from_start() as i32).unsigned_abs();
        let dy = (self.delta_y_from_start() as i32).unsigned_abs();
        let slop = u32::try_from(cfg.touch_slop).unwrap_or(0);
        sample.duration_ms() < cfg.click_timeout_ms() && dx < slop && dy < slop
    }

    pub fn debug_info(&self) -> String {
        format!(
            "\nDown:{},{}\nCurrent:{},{}\nDelta from down:{},{}\nDelta from last:{},{}\nDegree from down:{},{}\nDegree from last:{},{}\n",
            self.down_x,
            self.down_y,
            self.current_x,
            self.current_y,
            self.delta_x_from_start(),
            self.delta_y_from_start(),
            self.delta_x(),
            self.delta_y(),
            self.angle_x_from_start(),
            self.angle_y_from_start(),
            self.angle_x(),
            self.angle_y(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    const EPS: f64 = 1e-3;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < EPS
    }

    fn sample(action: PointerAction, x: f32, y: f32) -> PointerSample {
        PointerSample::new(action, x, y)
    }

    /// Tracker whose last move is (dx, dy) and whose from-start delta is the same.
    fn moved_by(dx: f32, dy: f32) -> PointerTracker {
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 100.0, 100.0));
        t.process_sample(&sample(PointerAction::Move, 100.0 + dx, 100.0 + dy));
        t
    }

    #[derive(Clone, Default)]
    struct Recorded(Rc<RefCell<Vec<(String, String)>>>);

    impl DebugSink for Recorded {
        fn record(&self, tag: &str, message: &str) {
            self.0.borrow_mut().push((tag.to_string(), message.to_string()));
        }
    }

    #[test]
    fn starts_at_origin() {
        let t = PointerTracker::new();
        assert_eq!((t.current_x(), t.current_y()), (0.0, 0.0));
        assert_eq!((t.last_x(), t.last_y()), (0.0, 0.0));
        assert_eq!((t.down_x(), t.down_y()), (0.0, 0.0));
        assert!(!t.is_debug());
    }

    #[test]
    fn process_shifts_current_into_last() {
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 10.0, 20.0));
        assert_eq!((t.current_x(), t.current_y()), (10.0, 20.0));
        assert_eq!((t.last_x(), t.last_y()), (0.0, 0.0));

        t.process_sample(&sample(PointerAction::Move, 13.5, 18.0));
        assert_eq!((t.current_x(), t.current_y()), (13.5, 18.0));
        assert_eq!((t.last_x(), t.last_y()), (10.0, 20.0));
    }

    #[test]
    fn down_is_fixed_after_start() {
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 5.0, 6.0));
        assert_eq!((t.down_x(), t.down_y()), (5.0, 6.0));

        for action in [
            PointerAction::Move,
            PointerAction::End,
            PointerAction::Cancel,
            PointerAction::Other(5),
        ] {
            t.process_sample(&sample(action, 50.0, 60.0));
            assert_eq!((t.down_x(), t.down_y()), (5.0, 6.0));
        }

        // a new gesture re-anchors
        t.process_sample(&sample(PointerAction::Start, 1.0, 2.0));
        assert_eq!((t.down_x(), t.down_y()), (1.0, 2.0));
    }

    #[test]
    fn deltas_are_signed_differences() {
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 10.0, 10.0));
        t.process_sample(&sample(PointerAction::Move, 7.0, 15.0));
        t.process_sample(&sample(PointerAction::Move, 4.0, 16.0));
        assert_eq!(t.delta_x(), -3.0);
        assert_eq!(t.delta_y(), 1.0);
        assert_eq!(t.delta_x_from_start(), -6.0);
        assert_eq!(t.delta_y_from_start(), 6.0);
    }

    #[test]
    fn zero_horizontal_delta_gives_zero_angle_x() {
        let t = moved_by(0.0, 7.0);
        assert_eq!(t.angle_x(), 0.0);
        assert_eq!(t.angle_x_from_start(), 0.0);
        assert!(close(t.angle_y(), 0.0));
    }

    #[test]
    fn zero_vertical_delta_gives_zero_angle_y() {
        let t = moved_by(5.0, 0.0);
        assert_eq!(t.angle_y(), 0.0);
        assert_eq!(t.angle_x(), 0.0);

        let t = moved_by(0.0, 5.0);
        assert_eq!(t.angle_y(), 0.0);
    }

    #[test]
    fn diagonal_is_forty_five_degrees() {
        let t = moved_by(3.0, 3.0);
        assert!(close(t.angle_x(), 45.0));
        assert!(close(t.angle_y(), 45.0));
    }

    #[test]
    fn three_four_five_angles() {
        let t = moved_by(4.0, 3.0);
        assert!(close(t.angle_x(), 36.8699));
        assert!(close(t.angle_y(), 53.1301));
        assert!(close(t.angle_x() + t.angle_y(), 90.0));
        assert!(close(t.angle_x_from_start(), 36.8699));
        assert!(close(t.angle_y_from_start(), 53.1301));
    }

    #[test]
    fn angles_ignore_direction() {
        let a = moved_by(4.0, 3.0);
        let b = moved_by(-4.0, -3.0);
        assert!(close(a.angle_x(), b.angle_x()));
        assert!(close(a.angle_y(), b.angle_y()));
    }

    #[test]
    fn from_start_angles_use_down_anchor() {
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 0.0, 0.0));
        t.process_sample(&sample(PointerAction::Move, 4.0, 0.0));
        t.process_sample(&sample(PointerAction::Move, 4.0, 3.0));
        // last move is straight down, overall is the 3-4-5 diagonal
        assert_eq!(t.angle_x(), 0.0);
        assert!(close(t.angle_x_from_start(), 36.8699));
    }

    #[test]
    fn repeated_position_has_no_delta_or_angle() {
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 42.0, 17.0));
        t.process_sample(&sample(PointerAction::Move, 42.0, 17.0));
        t.process_sample(&sample(PointerAction::Move, 42.0, 17.0));
        assert_eq!((t.delta_x(), t.delta_y()), (0.0, 0.0));
        assert_eq!((t.angle_x(), t.angle_y()), (0.0, 0.0));
    }

    fn release(x: f32, y: f32, duration: u64) -> PointerSample {
        sample(PointerAction::End, x, y).with_times(1_000, 1_000 + duration)
    }

    #[test]
    fn quick_still_release_is_a_click() {
        let cfg = ClickConfig::new(500, 10);
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 100.0, 100.0));
        let up = release(102.0, 101.0, 50);
        t.process_sample(&up);
        assert!(t.is_click(&up, &cfg));
    }

    #[test]
    fn release_beyond_slop_is_not_a_click() {
        let cfg = ClickConfig::new(500, 10);
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 100.0, 100.0));
        let up = release(115.0, 101.0, 50);
        t.process_sample(&up);
        assert!(!t.is_click(&up, &cfg));

        t.process_sample(&sample(PointerAction::Start, 100.0, 100.0));
        let up = release(85.0, 100.0, 50);
        t.process_sample(&up);
        assert!(!t.is_click(&up, &cfg));
    }

    #[test]
    fn far_negative_release_is_not_a_click() {
        let cfg = ClickConfig::new(500, 10);
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 0.0, 0.0));
        let up = release(-3.0e9, 0.0, 10);
        t.process_sample(&up);
        assert!(!t.is_click(&up, &cfg));

        t.process_sample(&sample(PointerAction::Start, 0.0, 0.0));
        let up = release(0.0, f32::NEG_INFINITY, 10);
        t.process_sample(&up);
        assert!(!t.is_click(&up, &cfg));
    }

    #[test]
    fn slow_release_is_not_a_click() {
        let cfg = ClickConfig::new(500, 10);
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 0.0, 0.0));
        let up = release(0.0, 0.0, 500);
        t.process_sample(&up);
        assert!(!t.is_click(&up, &cfg));
    }

    #[test]
    fn only_end_samples_can_click() {
        let cfg = ClickConfig::new(500, 10);
        let mut t = PointerTracker::new();
        let down = sample(PointerAction::Start, 0.0, 0.0).with_times(0, 0);
        t.process_sample(&down);
        assert!(!t.is_click(&down, &cfg));
        let cancel = sample(PointerAction::Cancel, 0.0, 0.0).with_times(0, 10);
        assert!(!t.is_click(&cancel, &cfg));
    }

    #[test]
    fn sub_pixel_movement_truncates_before_slop_check() {
        let cfg = ClickConfig::new(500, 1);
        let mut t = PointerTracker::new();
        t.process_sample(&sample(PointerAction::Start, 10.0, 10.0));
        let up = release(10.9, 9.2, 10);
        t.process_sample(&up);
        assert!(t.is_click(&up, &cfg));
    }

    #[test]
    fn debug_records_go_to_sink_tagged_with_action() {
        let rec = Recorded::default();
        let mut t = PointerTracker::with_sink(Box::new(rec.clone()));
        t.process_sample(&sample(PointerAction::Start, 1.0, 1.0));
        assert!(rec.0.borrow().is_empty());

        t.set_debug(true);
        t.process_sample(&sample(PointerAction::Move, 4.0, 5.0));
        let records = rec.0.borrow();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].0, "event move");
        assert!(records[0].1.contains("Current:4,5"));
        assert!(records[0].1.contains("Delta from last:3,4"));
    }

    #[test]
    fn debug_does_not_change_metrics() {
        let mut plain = PointerTracker::new();
        let mut noisy = PointerTracker::with_sink(Box::new(Recorded::default()));
        noisy.set_debug(true);
        for s in [
            sample(PointerAction::Start, 3.0, 4.0),
            sample(PointerAction::Move, 9.0, 1.0),
        ] {
            plain.process_sample(&s);
            noisy.process_sample(&s);
        }
        assert_eq!(plain.delta_x(), noisy.delta_x());
        assert_eq!(plain.angle_y_from_start(), noisy.angle_y_from_start());
    }

    #[test]
    fn reset_zeroes_positions() {
        let mut t = moved_by(3.0, 4.0);
        t.set_debug(true);
        t.set_sink(Box::new(Recorded::default()));
        t.reset();
        assert_eq!((t.current_x(), t.last_x(), t.down_x()), (0.0, 0.0, 0.0));
        assert!(t.is_debug());
    }

    #[test]
    fn samples_deserialize_from_json() {
        let s: PointerSample = serde_json::from_str(
            r#"{"action":"end","x":1.5,"y":2.0,"event_time_ms":120,"down_time_ms":100}"#,
        )
        .unwrap();
        assert_eq!(s.action, PointerAction::End);
        assert_eq!(s.duration_ms(), 20);

        let s: PointerSample =
            serde_json::from_str(r#"{"action":{"other":7},"x":0,"y":0}"#).unwrap();
        assert_eq!(s.action, PointerAction::Other(7));
        assert_eq!(s.duration_ms(), 0);
    }
}
