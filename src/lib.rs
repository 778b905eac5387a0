//! Pointer tracking for a single gesture plus the layout and hit-test
//! helpers gesture code uses alongside it.

pub mod config;
pub mod geometry;
pub mod logging;
pub mod replay;
pub mod tracker;

pub use config::{ClickConfig, Settings};
pub use tracker::{PointerAction, PointerSample, PointerTracker};
