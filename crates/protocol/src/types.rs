use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (other.x - self.x).hypot(other.y - self.y)
    }

    /// Linear interpolation towards `other`; `t` is not clamped.
    pub fn lerp(self, other: Point, t: f64) -> Point {
        Point::new(
            self.x + (other.x - self.x) * t,
            self.y + (other.y - self.y) * t,
        )
    }
}

/// Axis-aligned rectangle. For DOM geometry the origin is the viewport's
/// top-left corner, matching `getBoundingClientRect()`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Build from the `top`/`bottom` pair reported by layout engines.
    pub fn from_edges(left: f64, top: f64, right: f64, bottom: f64) -> Self {
        Self::new(left, top, right - left, bottom - top)
    }

    #[inline]
    pub fn top(&self) -> f64 {
        self.y
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    #[inline]
    pub fn height(&self) -> f64 {
        self.h
    }

    #[inline]
    pub fn center_x(&self) -> f64 {
        self.x + self.w / 2.0
    }

    #[inline]
    pub fn center_y(&self) -> f64 {
        self.y + self.h / 2.0
    }

    /// Same rectangle shifted vertically, e.g. to follow a scroll offset.
    pub fn translated_y(&self, dy: f64) -> Self {
        Self { y: self.y + dy, ..*self }
    }
}

/// Opaque sRGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// CSS hex notation, e.g. `#0a2540`.
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_edges() {
        let r = Rect::from_edges(10.0, 800.0, 110.0, 1400.0);
        assert_eq!(r.top(), 800.0);
        assert_eq!(r.bottom(), 1400.0);
        assert_eq!(r.height(), 600.0);
        assert_eq!(r.center_x(), 60.0);
        assert_eq!(r.translated_y(-50.0).top(), 750.0);
    }

    #[test]
    fn color_hex() {
        assert_eq!(Color::rgb(0x0a, 0x25, 0x40).to_hex(), "#0a2540");
        assert_eq!(Color::rgb(255, 255, 255).to_hex(), "#ffffff");
    }

    #[test]
    fn point_lerp_and_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(3.0, 4.0);
        assert_eq!(a.distance(b), 5.0);
        assert_eq!(a.lerp(b, 0.5), Point::new(1.5, 2.0));
    }
}
