//! Scroll-progress tracking: turns viewport geometry into a progress
//! fraction and keeps the ship marker on the voyage path.
//!
//! The tracker never looks anything up globally. Geometry comes from a
//! [`GeometryProvider`] and marker writes go to a [`MarkerSink`], so the
//! same code drives the DOM bridge, the terminal preview and the tests.

use shipwake_protocol::{MarkerPosition, Point, Rect};

use crate::config::{DEFAULT_SCROLL_OFFSET, WakeConfig};
use crate::curve::{PathSampler, build_curve_with, clamp01};

/// On-demand access to the layout, in viewport coordinates.
pub trait GeometryProvider {
    fn viewport_height(&self) -> f64;

    /// Region whose scroll position drives the progress.
    fn anchor_rect(&self) -> Option<Rect>;

    /// Element the marker is positioned in.
    fn container_rect(&self) -> Option<Rect>;

    /// Element the path is drawn in. When absent the path is assumed to
    /// start at the first entry's centre, horizontally centred in the
    /// container.
    fn path_rect(&self) -> Option<Rect> {
        None
    }

    /// Timeline entry cards, in document order.
    fn entry_rects(&self) -> Vec<Rect>;
}

/// Receives marker positions.
pub trait MarkerSink {
    fn place_marker(&mut self, position: &MarkerPosition);
}

impl MarkerSink for Option<MarkerPosition> {
    fn place_marker(&mut self, position: &MarkerPosition) {
        *self = Some(*position);
    }
}

impl MarkerSink for Vec<MarkerPosition> {
    fn place_marker(&mut self, position: &MarkerPosition) {
        self.push(*position);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportEvent {
    /// The timeline section became active.
    Mount,
    Scroll,
    Resize,
    /// Entry cards moved or changed size.
    LayoutChanged,
}

/// Progress with the default 100 px lead-in.
pub fn compute_progress(anchor: &Rect, viewport_height: f64) -> f64 {
    compute_progress_with_offset(anchor, viewport_height, DEFAULT_SCROLL_OFFSET)
}

/// `1 - clamp01((bottom - offset) / (viewport_height + height - offset))`.
///
/// 0 while the anchor's bottom edge is far below the viewport top, rising
/// to 1 once the anchor has scrolled past. Non-increasing in
/// `anchor.bottom()`.
pub fn compute_progress_with_offset(anchor: &Rect, viewport_height: f64, offset: f64) -> f64 {
    let remaining = anchor.bottom() - offset;
    let span = viewport_height + anchor.height() - offset;
    if span.is_nan() || span <= 0.0 {
        return if remaining <= 0.0 { 1.0 } else { 0.0 };
    }
    clamp01(1.0 - clamp01(remaining / span))
}

#[derive(Debug)]
pub struct ScrollTracker {
    config: WakeConfig,
    sampler: Option<PathSampler>,
    /// Path start relative to the container, measured at the last relayout.
    origin: Point,
    layout_dirty: bool,
    /// Bumped on every successful rebuild.
    generation: u64,
    progress: f64,
    last: Option<MarkerPosition>,
}

impl ScrollTracker {
    pub fn new(config: WakeConfig) -> Self {
        Self {
            config,
            sampler: None,
            origin: Point::ORIGIN,
            layout_dirty: true,
            generation: 0,
            progress: 0.0,
            last: None,
        }
    }

    /// Current progress in `[0, 1]`.
    pub fn progress(&self) -> f64 {
        self.progress
    }

    pub fn last_position(&self) -> Option<MarkerPosition> {
        self.last
    }

    /// Number of times the curve has been rebuilt. Front ends that draw the
    /// path compare it with the value they last drew, since a rebuild can
    /// happen inside any event once the layout is dirty.
    pub fn layout_generation(&self) -> u64 {
        self.generation
    }

    pub fn sampler(&self) -> Option<&PathSampler> {
        self.sampler.as_ref()
    }

    /// Path start point in container coordinates.
    pub fn path_origin(&self) -> Point {
        self.origin
    }

    /// Index of the last entry the ship has reached.
    pub fn active_entry(&self) -> Option<usize> {
        let sampler = self.sampler.as_ref()?;
        let count = sampler.curve().entry_count;
        (0..count)
            .take_while(|&i| {
                sampler
                    .entry_fraction(i)
                    .is_some_and(|f| f <= self.progress + 1e-9)
            })
            .last()
    }

    /// Mark the curve stale. It is rebuilt at the start of the next
    /// event, before that event samples the path.
    pub fn invalidate_layout(&mut self) {
        self.layout_dirty = true;
    }

    /// Initial computation when the timeline section becomes active.
    pub fn mount<G, M>(&mut self, geometry: &G, marker: &mut M) -> Option<MarkerPosition>
    where
        G: GeometryProvider + ?Sized,
        M: MarkerSink + ?Sized,
    {
        self.handle_event(ViewportEvent::Mount, geometry, marker)
    }

    /// Process one viewport event. Returns the marker position written, or
    /// `None` when geometry is missing and nothing was updated.
    pub fn handle_event<G, M>(
        &mut self,
        event: ViewportEvent,
        geometry: &G,
        marker: &mut M,
    ) -> Option<MarkerPosition>
    where
        G: GeometryProvider + ?Sized,
        M: MarkerSink + ?Sized,
    {
        if matches!(event, ViewportEvent::Mount | ViewportEvent::LayoutChanged) {
            self.layout_dirty = true;
        }
        if self.layout_dirty && !self.relayout(geometry) {
            tracing::debug!(?event, "timeline geometry not ready, skipping update");
            return None;
        }
        self.reposition(geometry, marker)
    }

    /// Rebuild the curve from the current card positions. Returns `false`
    /// (and leaves the layout dirty) when fewer than two cards or no
    /// container can be measured.
    pub fn relayout<G: GeometryProvider + ?Sized>(&mut self, geometry: &G) -> bool {
        let rects = geometry.entry_rects();
        let (Some(first), Some(last)) = (rects.first(), rects.last()) else {
            return false;
        };
        if rects.len() < 2 {
            return false;
        }
        let Some(container) = geometry.container_rect() else {
            return false;
        };

        let extent = last.center_y() - first.center_y();
        let curve = build_curve_with(&self.config.curve, rects.len(), extent);
        let sampler = PathSampler::new(curve, self.config.curve.flatten_steps);
        tracing::debug!(
            entries = rects.len(),
            extent,
            length = sampler.path_length(),
            "voyage path rebuilt"
        );

        self.origin = Point::new(container.w / 2.0, first.center_y() - container.y);
        self.sampler = Some(sampler);
        self.layout_dirty = false;
        self.generation += 1;
        true
    }

    fn reposition<G, M>(&mut self, geometry: &G, marker: &mut M) -> Option<MarkerPosition>
    where
        G: GeometryProvider + ?Sized,
        M: MarkerSink + ?Sized,
    {
        let sampler = self.sampler.as_ref()?;
        let (Some(anchor), Some(container)) = (geometry.anchor_rect(), geometry.container_rect())
        else {
            tracing::trace!("anchor or container missing, skipping update");
            return None;
        };

        let origin = match geometry.path_rect() {
            Some(path) => Point::new(path.center_x() - container.x, path.y - container.y),
            None => self.origin,
        };
        let progress = compute_progress_with_offset(
            &anchor,
            geometry.viewport_height(),
            self.config.tracker.scroll_offset,
        );
        let point = sampler.sample_at(progress);
        let position = MarkerPosition {
            x: origin.x + point.x,
            y: origin.y + point.y,
            offset_y: self.config.tracker.marker_offset_y,
            heading_deg: sampler.heading_at(progress),
            progress,
        };

        marker.place_marker(&position);
        tracing::trace!(progress, x = position.x, y = position.y, "marker moved");
        self.progress = progress;
        self.last = Some(position);
        Some(position)
    }
}
