use serde::{Deserialize, Serialize};

/// Where the ship marker should be drawn for the current frame, in pixels
/// relative to the positioning container.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MarkerPosition {
    pub x: f64,
    pub y: f64,
    /// Extra vertical shift applied on top of `y`, e.g. half the icon height.
    pub offset_y: Option<f64>,
    /// Path tangent in degrees; 0 points down the page, positive turns
    /// towards +x.
    pub heading_deg: f64,
    /// Scroll progress this position was sampled at.
    pub progress: f64,
}

impl MarkerPosition {
    /// Final top coordinate including the optional offset.
    pub fn top(&self) -> f64 {
        self.y + self.offset_y.unwrap_or(0.0)
    }

    pub fn left(&self) -> f64 {
        self.x
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn top_applies_offset() {
        let mut m = MarkerPosition {
            x: 12.0,
            y: 40.0,
            ..Default::default()
        };
        assert_eq!(m.top(), 40.0);
        m.offset_y = Some(-16.0);
        assert_eq!(m.top(), 24.0);
        assert_eq!(m.left(), 12.0);
    }

    #[test]
    fn serializes_as_plain_json() {
        let m = MarkerPosition {
            x: 1.0,
            y: 2.0,
            offset_y: None,
            heading_deg: 0.0,
            progress: 0.5,
        };
        let json = serde_json::to_string(&m).unwrap();
        let back: MarkerPosition = serde_json::from_str(&json).unwrap();
        assert_eq!(back, m);
    }
}
