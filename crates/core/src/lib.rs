//! Scroll-driven voyage animation for the portfolio timeline: a zig-zag
//! path sampled by arc length, a tracker that maps scroll position onto it,
//! light/dark theme tables, and render-command views of the section.

pub mod config;
pub mod curve;
pub mod layout;
pub mod svg;
pub mod theme;
pub mod timeline;
pub mod tracker;
pub mod views;

pub use config::{ConfigError, CurveConfig, TrackerConfig, WakeConfig};
pub use curve::{CurveSpec, PathSampler, QuadSegment, build_curve, build_curve_with};
pub use layout::{PageLayout, PageViewport};
pub use theme::{StyleSink, ThemeMode, ThemeSwitcher, ThemeTable, apply_theme};
pub use timeline::{Side, TimelineEntry, TimelineError};
pub use tracker::{
    GeometryProvider, MarkerSink, ScrollTracker, ViewportEvent, compute_progress,
};
