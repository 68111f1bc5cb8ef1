//! The voyage path: a zig-zag of quadratic Béziers running down the
//! timeline, and an arc-length sampler that maps scroll progress onto it.
//!
//! Curves are built in path-local coordinates: the path starts at the
//! origin, `y` grows down the page and `x = 0` is the horizontal centre of
//! the element the path is drawn in.

use kurbo::{BezPath, ParamCurve, ParamCurveDeriv, QuadBez};
use serde::{Deserialize, Serialize};
use shipwake_protocol::Point;

use crate::config::{CurveConfig, MAX_FLATTEN_STEPS};

/// Upper bound on the number of bends in one curve.
pub const MAX_SEGMENTS: usize = 2048;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadSegment {
    pub start: Point,
    pub control: Point,
    pub end: Point,
}

impl QuadSegment {
    fn to_kurbo(self) -> QuadBez {
        QuadBez::new(to_kurbo(self.start), to_kurbo(self.control), to_kurbo(self.end))
    }
}

/// Contiguous sequence of quadratic segments: every segment starts where
/// the previous one ended, and the first starts at `anchor`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSpec {
    pub anchor: Point,
    pub segments: Vec<QuadSegment>,
    /// Number of timeline entries the curve was laid out for.
    pub entry_count: usize,
    /// Vertical distance covered; 0 for a degenerate curve.
    pub extent: f64,
}

impl CurveSpec {
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    pub fn end(&self) -> Point {
        self.segments.last().map_or(self.anchor, |s| s.end)
    }

    fn to_bez_path(&self) -> BezPath {
        let mut path = BezPath::new();
        path.move_to(to_kurbo(self.anchor));
        for seg in &self.segments {
            path.quad_to(to_kurbo(seg.control), to_kurbo(seg.end));
        }
        path
    }

    /// SVG path data (`d` attribute) for this curve.
    pub fn to_svg_path(&self) -> String {
        self.to_bez_path().to_svg()
    }
}

/// Build the zig-zag using the default amplitude and period.
pub fn build_curve(entry_count: usize, vertical_extent: f64) -> CurveSpec {
    build_curve_with(&CurveConfig::default(), entry_count, vertical_extent)
}

/// Build a zig-zag from `y = 0` to `y = vertical_extent`.
///
/// Each segment covers one period and bends alternately right and left,
/// peaking at `config.amplitude` from the centre line. The last segment is
/// cut at `vertical_extent` and its bend scaled down with it. A
/// non-positive or non-finite extent yields an empty curve.
pub fn build_curve_with(config: &CurveConfig, entry_count: usize, vertical_extent: f64) -> CurveSpec {
    let anchor = Point::ORIGIN;
    if !vertical_extent.is_finite() || vertical_extent <= 0.0 || config.period <= 0.0 {
        return CurveSpec {
            anchor,
            segments: Vec::new(),
            entry_count,
            extent: 0.0,
        };
    }

    // Bends stretch once the extent would need more than MAX_SEGMENTS.
    let period = config.period.max(vertical_extent / MAX_SEGMENTS as f64);
    let mut segments = Vec::with_capacity(MAX_SEGMENTS.min((vertical_extent / period).ceil() as usize));
    let mut i = 0usize;
    loop {
        let y0 = i as f64 * period;
        if y0 >= vertical_extent || i == MAX_SEGMENTS {
            break;
        }
        let y1 = if i + 1 == MAX_SEGMENTS {
            vertical_extent
        } else {
            (y0 + period).min(vertical_extent)
        };
        let start = segments.last().map_or(anchor, |s: &QuadSegment| s.end);
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        // A quadratic peaks halfway to its control point.
        let bend = 2.0 * config.amplitude * (y1 - y0) / period;
        segments.push(QuadSegment {
            start,
            control: Point::new(side * bend, (y0 + y1) / 2.0),
            end: Point::new(0.0, y1),
        });
        i += 1;
    }

    CurveSpec {
        anchor,
        segments,
        entry_count,
        extent: vertical_extent,
    }
}

#[derive(Debug, Clone, Copy)]
struct ArcSample {
    /// Cumulative arc length from the anchor.
    s: f64,
    point: Point,
    segment: usize,
    t: f64,
}

/// Arc-length lookup over a [`CurveSpec`].
///
/// Each segment is flattened into a fixed number of chords; the cumulative
/// chord lengths form a lookup table that is built once and reused for
/// every sample. Build a new sampler when the curve changes.
#[derive(Debug, Clone)]
pub struct PathSampler {
    curve: CurveSpec,
    table: Vec<ArcSample>,
    total_length: f64,
}

impl PathSampler {
    pub fn new(curve: CurveSpec, flatten_steps: usize) -> Self {
        let steps = flatten_steps.clamp(1, MAX_FLATTEN_STEPS);
        let mut table = Vec::with_capacity(curve.segments.len() * steps + 1);
        table.push(ArcSample {
            s: 0.0,
            point: curve.anchor,
            segment: 0,
            t: 0.0,
        });

        let mut s = 0.0;
        let mut prev = curve.anchor;
        for (segment, seg) in curve.segments.iter().enumerate() {
            let quad = seg.to_kurbo();
            for k in 1..=steps {
                let t = k as f64 / steps as f64;
                let point = from_kurbo(quad.eval(t));
                s += prev.distance(point);
                table.push(ArcSample {
                    s,
                    point,
                    segment,
                    t,
                });
                prev = point;
            }
        }

        Self {
            curve,
            table,
            total_length: s,
        }
    }

    pub fn curve(&self) -> &CurveSpec {
        &self.curve
    }

    /// Total arc length, in px.
    pub fn path_length(&self) -> f64 {
        self.total_length
    }

    /// Arc-length offset for a progress fraction (clamped to `[0, 1]`).
    pub fn arc_length_at(&self, fraction: f64) -> f64 {
        clamp01(fraction) * self.total_length
    }

    /// Point at `fraction` of the total arc length.
    pub fn sample_at(&self, fraction: f64) -> Point {
        match self.locate(self.arc_length_at(fraction)) {
            Some((a, b, u)) => a.point.lerp(b.point, u),
            None => self.table[0].point,
        }
    }

    /// Direction of travel at `fraction`, in degrees: 0 points down the
    /// page, positive angles turn towards +x.
    pub fn heading_at(&self, fraction: f64) -> f64 {
        let Some((a, b, u)) = self.locate(self.arc_length_at(fraction)) else {
            return 0.0;
        };
        let t_start = if a.segment == b.segment { a.t } else { 0.0 };
        let t = t_start + (b.t - t_start) * u;
        let quad = self.curve.segments[b.segment].to_kurbo();
        let d = quad.deriv().eval(t);
        if d.x == 0.0 && d.y == 0.0 {
            return 0.0;
        }
        d.x.atan2(d.y).to_degrees()
    }

    /// Fraction at which the path passes the centre of timeline entry
    /// `index`, assuming entries are evenly spaced from the first card
    /// centre (`y = 0`) to the last (`y = extent`).
    pub fn entry_fraction(&self, index: usize) -> Option<f64> {
        let count = self.curve.entry_count;
        if index >= count {
            return None;
        }
        if count == 1 || self.total_length <= 0.0 {
            return Some(0.0);
        }
        let target_y = self.curve.extent * index as f64 / (count - 1) as f64;
        // y is non-decreasing along the table.
        let idx = self.table.partition_point(|a| a.point.y < target_y);
        if idx == 0 {
            return Some(0.0);
        }
        let Some(b) = self.table.get(idx) else {
            return Some(1.0);
        };
        let a = &self.table[idx - 1];
        let dy = b.point.y - a.point.y;
        let u = if dy > 0.0 { (target_y - a.point.y) / dy } else { 0.0 };
        Some(clamp01((a.s + (b.s - a.s) * u) / self.total_length))
    }

    /// The flattened path, anchor first.
    pub fn polyline(&self) -> Vec<Point> {
        self.table.iter().map(|a| a.point).collect()
    }

    /// Table entries bracketing arc length `s`, plus the interpolation
    /// weight between them. `None` for an empty curve.
    fn locate(&self, s: f64) -> Option<(&ArcSample, &ArcSample, f64)> {
        if self.table.len() < 2 || self.total_length <= 0.0 {
            return None;
        }
        let idx = self
            .table
            .partition_point(|a| a.s < s)
            .clamp(1, self.table.len() - 1);
        let a = &self.table[idx - 1];
        let b = &self.table[idx];
        let span = b.s - a.s;
        let u = if span > 0.0 { clamp01((s - a.s) / span) } else { 0.0 };
        Some((a, b, u))
    }
}

/// Clamp to `[0, 1]`; NaN maps to 0.
pub fn clamp01(v: f64) -> f64 {
    if v.is_nan() { 0.0 } else { v.clamp(0.0, 1.0) }
}

fn to_kurbo(p: Point) -> kurbo::Point {
    kurbo::Point::new(p.x, p.y)
}

fn from_kurbo(p: kurbo::Point) -> Point {
    Point::new(p.x, p.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_FLATTEN_STEPS;
    use kurbo::ParamCurveArclen;

    fn sampler(entries: usize, extent: f64) -> PathSampler {
        PathSampler::new(build_curve(entries, extent), DEFAULT_FLATTEN_STEPS)
    }

    #[test]
    fn segments_are_contiguous_and_reach_extent() {
        let curve = build_curve(5, 1000.0);
        assert_eq!(curve.anchor, Point::ORIGIN);
        assert_eq!(curve.segments[0].start, curve.anchor);
        for pair in curve.segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
        assert_eq!(curve.end(), Point::new(0.0, 1000.0));
        // 1000 / 160 = 6.25 -> six full bends plus a partial one
        assert_eq!(curve.segments.len(), 7);
    }

    #[test]
    fn bends_alternate_direction() {
        let curve = build_curve(3, 640.0);
        let signs: Vec<f64> = curve.segments.iter().map(|s| s.control.x.signum()).collect();
        assert_eq!(signs, vec![1.0, -1.0, 1.0, -1.0]);
    }

    #[test]
    fn partial_last_segment_is_clamped_and_flattened() {
        let curve = build_curve(2, 240.0);
        let last = curve.segments.last().unwrap();
        assert_eq!(last.end.y, 240.0);
        assert!(last.control.x.abs() < curve.segments[0].control.x.abs());
    }

    #[test]
    fn peak_deflection_matches_amplitude() {
        let s = sampler(2, 160.0);
        let mid = s.curve().segments[0].to_kurbo().eval(0.5);
        assert!((mid.x - crate::config::DEFAULT_AMPLITUDE).abs() < 1e-9);
    }

    #[test]
    fn degenerate_extent_samples_origin() {
        for extent in [0.0, -50.0, f64::NAN] {
            let s = sampler(4, extent);
            assert!(s.curve().is_empty());
            assert_eq!(s.path_length(), 0.0);
            for f in [0.0, 0.25, 0.5, 1.0] {
                assert_eq!(s.sample_at(f), Point::ORIGIN);
            }
            assert_eq!(s.heading_at(0.5), 0.0);
        }
    }

    #[test]
    fn endpoints() {
        let s = sampler(5, 900.0);
        assert_eq!(s.sample_at(0.0), Point::ORIGIN);
        let end = s.sample_at(1.0);
        assert!((end.y - 900.0).abs() < 1e-9);
        assert!(end.x.abs() < 1e-9);
    }

    #[test]
    fn out_of_range_fractions_clamp() {
        let s = sampler(5, 900.0);
        for f in [-3.0, -0.01, f64::NEG_INFINITY] {
            assert_eq!(s.sample_at(f), s.sample_at(0.0));
        }
        for f in [1.01, 7.5, f64::INFINITY] {
            assert_eq!(s.sample_at(f), s.sample_at(1.0));
        }
        assert_eq!(s.sample_at(f64::NAN), s.sample_at(0.0));
    }

    #[test]
    fn arc_length_is_monotonic() {
        let s = sampler(6, 1234.5);
        let mut prev_s = -1.0;
        let mut prev_y = -1.0;
        for i in 0..=1000 {
            let f = i as f64 / 1000.0;
            let arc = s.arc_length_at(f);
            assert!(arc >= prev_s);
            // y never decreases along this curve, so a forward scroll
            // never moves the ship up the page.
            let y = s.sample_at(f).y;
            assert!(y >= prev_y - 1e-9, "y went backwards at f={f}");
            prev_s = arc;
            prev_y = y;
        }
    }

    #[test]
    fn flattened_length_tracks_exact_arc_length() {
        let curve = build_curve(4, 700.0);
        let exact: f64 = curve
            .segments
            .iter()
            .map(|s| s.to_kurbo().arclen(1e-9))
            .sum();
        let s = PathSampler::new(curve, DEFAULT_FLATTEN_STEPS);
        assert!(s.path_length() <= exact + 1e-6);
        assert!((exact - s.path_length()) / exact < 0.005);
    }

    #[test]
    fn heading_points_down_at_bend_peaks() {
        let s = sampler(2, 320.0);
        // First bend starts heading right of straight down, second left.
        assert!(s.heading_at(0.0) > 0.0);
        let mid_first = s.heading_at(0.25);
        assert!(mid_first.abs() < 5.0, "heading {mid_first}");
        assert!(s.heading_at(0.55) < 0.0);
    }

    #[test]
    fn entry_fractions_are_ordered() {
        let s = sampler(5, 800.0);
        let fractions: Vec<f64> = (0..5).map(|i| s.entry_fraction(i).unwrap()).collect();
        assert_eq!(fractions[0], 0.0);
        assert!((fractions[4] - 1.0).abs() < 1e-9);
        assert!(fractions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(s.entry_fraction(5), None);
    }

    #[test]
    fn huge_extent_caps_segment_count() {
        let curve = build_curve(5, 1e300);
        assert_eq!(curve.segments.len(), MAX_SEGMENTS);
        assert_eq!(curve.end(), Point::new(0.0, 1e300));
        let s = PathSampler::new(curve, DEFAULT_FLATTEN_STEPS);
        assert!(s.path_length().is_finite());
    }

    #[test]
    fn tiny_period_stretches_bends() {
        let config = CurveConfig {
            period: 1e-9,
            ..CurveConfig::default()
        };
        let curve = build_curve_with(&config, 5, 1000.0);
        assert!(curve.segments.len() <= MAX_SEGMENTS);
        assert!((curve.end().y - 1000.0).abs() < 1e-6);
        for pair in curve.segments.windows(2) {
            assert_eq!(pair[0].end, pair[1].start);
        }
    }

    #[test]
    fn flatten_steps_are_capped() {
        let s = PathSampler::new(build_curve(2, 320.0), usize::MAX);
        let capped = PathSampler::new(build_curve(2, 320.0), MAX_FLATTEN_STEPS);
        assert_eq!(s.path_length(), capped.path_length());
    }

    #[test]
    fn svg_path_data() {
        let d = build_curve(2, 160.0).to_svg_path();
        assert!(d.starts_with('M'));
        assert_eq!(d.matches('Q').count(), 1);
        let empty = build_curve(0, 0.0).to_svg_path();
        assert!(empty.starts_with('M'));
        assert!(!empty.contains('Q'));
    }
}
