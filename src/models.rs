use imageproc::point::Point;
use serde::{Deserialize, Serialize};
use std::fmt;

/// One closed outer boundary traced from an edge map.
#[derive(Debug, Clone)]
pub struct Contour {
    pub points: Vec<Point<i32>>,
}

impl Contour {
    pub fn new(points: Vec<Point<i32>>) -> Self {
        Self { points }
    }

    /// Axis-aligned bounding box, inclusive of both end pixels.
    pub fn bounding_box(&self) -> BoundingBox {
        let Some(first) = self.points.first() else {
            return BoundingBox::default();
        };

        let (mut min_x, mut min_y, mut max_x, mut max_y) = (first.x, first.y, first.x, first.y);
        for p in &self.points[1..] {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }

        BoundingBox {
            x: min_x.max(0) as u32,
            y: min_y.max(0) as u32,
            width: (max_x - min_x + 1) as u32,
            height: (max_y - min_y + 1) as u32,
        }
    }

    /// Enclosed polygon area (shoelace formula over the traced points).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }

        let mut twice_area = 0i64;
        for i in 0..n {
            let a = self.points[i];
            let b = self.points[(i + 1) % n];
            twice_area += a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64;
        }

        (twice_area.abs() as f64) / 2.0
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Bounding box in the canonical-resolution image
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoundingBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// How the meters-per-pixel factor of an estimate was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationMode {
    /// Known reference object measured in pixels.
    ReferenceObject,
    /// Assumed pixel size of the reference object; low accuracy.
    Fallback,
}

/// Result of measuring the dominant silhouette of one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeightEstimate {
    pub source_image: String,
    pub pixel_height: u32,
    pub real_height_m: f64,
    /// `None` when no contour was detected.
    pub bounding_box: Option<BoundingBox>,
    pub calibration_mode: CalibrationMode,
}

impl HeightEstimate {
    pub fn object_detected(&self) -> bool {
        self.bounding_box.is_some()
    }

    /// Hub height derived from this estimate, never below `min_hub_height_m`.
    pub fn hub_height_m(&self, min_hub_height_m: f64) -> f64 {
        self.real_height_m.max(min_hub_height_m)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Suitability {
    #[serde(rename = "High Potential")]
    High,
    #[serde(rename = "Moderate/Low Potential")]
    ModerateOrLow,
}

impl Suitability {
    pub fn label(&self) -> &'static str {
        match self {
            Suitability::High => "High Potential",
            Suitability::ModerateOrLow => "Moderate/Low Potential",
        }
    }
}

impl fmt::Display for Suitability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindProfileResult {
    pub reference_height_m: f64,
    pub reference_speed_m_s: f64,
    pub shear_exponent: f64,
    pub hub_height_m: f64,
    pub projected_speed_m_s: f64,
    pub suitability: Suitability,
}

/// One report row: the height estimate and wind projection of a single image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyRecord {
    pub image: String,
    pub height: HeightEstimate,
    /// Estimated hub height after the minimum floor is applied.
    pub estimated_hub_height_m: f64,
    pub wind: WindProfileResult,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: i32, y0: i32, x1: i32, y1: i32) -> Contour {
        Contour::new(vec![
            Point::new(x0, y0),
            Point::new(x1, y0),
            Point::new(x1, y1),
            Point::new(x0, y1),
        ])
    }

    #[test]
    fn bounding_box_is_inclusive() {
        let bbox = rect(10, 20, 19, 219).bounding_box();
        assert_eq!(
            bbox,
            BoundingBox {
                x: 10,
                y: 20,
                width: 10,
                height: 200
            }
        );
    }

    #[test]
    fn area_ignores_winding_direction() {
        let clockwise = rect(0, 0, 10, 20);
        let mut points = clockwise.points.clone();
        points.reverse();
        let counter = Contour::new(points);

        assert_eq!(clockwise.area(), 200.0);
        assert_eq!(counter.area(), 200.0);
    }

    #[test]
    fn degenerate_contours_have_zero_area() {
        let line = Contour::new(vec![Point::new(0, 0), Point::new(0, 50)]);
        assert_eq!(line.area(), 0.0);
        assert_eq!(line.bounding_box().height, 51);
        assert_eq!(Contour::new(vec![]).bounding_box(), BoundingBox::default());
    }

    #[test]
    fn hub_height_is_floored() {
        let estimate = HeightEstimate {
            source_image: "sky.png".to_string(),
            pixel_height: 0,
            real_height_m: 0.0,
            bounding_box: None,
            calibration_mode: CalibrationMode::ReferenceObject,
        };
        assert!(!estimate.object_detected());
        assert_eq!(estimate.hub_height_m(30.0), 30.0);

        let tall = HeightEstimate {
            real_height_m: 95.5,
            ..estimate
        };
        assert_eq!(tall.hub_height_m(30.0), 95.5);
    }

    #[test]
    fn suitability_labels() {
        assert_eq!(Suitability::High.to_string(), "High Potential");
        assert_eq!(
            serde_json::to_string(&Suitability::ModerateOrLow).unwrap(),
            "\"Moderate/Low Potential\""
        );
    }
}
