use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::detection::contours::largest_by_area;
use crate::error::{Result, SurveyError};
use crate::models::{CalibrationMode, Contour, HeightEstimate};

/// Meters-per-pixel ratio shared by every image of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CalibrationScale {
    meters_per_pixel: f64,
    mode: CalibrationMode,
}

impl CalibrationScale {
    /// Scale from a reference object of `known_height_m` spanning
    /// `reference_pixel_height` pixels at canonical resolution.
    pub fn from_reference(known_height_m: f64, reference_pixel_height: f64) -> Result<Self> {
        if !(reference_pixel_height > 0.0) || !reference_pixel_height.is_finite() {
            return Err(SurveyError::InvalidCalibration(format!(
                "reference pixel height must be positive, got {reference_pixel_height}"
            )));
        }
        if !(known_height_m > 0.0) || !known_height_m.is_finite() {
            return Err(SurveyError::InvalidCalibration(format!(
                "known reference height must be positive, got {known_height_m}"
            )));
        }

        Ok(Self {
            meters_per_pixel: known_height_m / reference_pixel_height,
            mode: CalibrationMode::ReferenceObject,
        })
    }

    /// Uncalibrated scale: the reference object is assumed to span
    /// `assumed_pixels` at canonical resolution.
    pub fn fallback(known_height_m: f64, assumed_pixels: f64) -> Result<Self> {
        let scale = Self::from_reference(known_height_m, assumed_pixels)?;
        Ok(Self {
            mode: CalibrationMode::Fallback,
            ..scale
        })
    }

    pub fn meters_per_pixel(&self) -> f64 {
        self.meters_per_pixel
    }

    pub fn mode(&self) -> CalibrationMode {
        self.mode
    }
}

/// Converts the dominant silhouette of an image into a physical height.
#[derive(Debug, Clone)]
pub struct HeightEstimator {
    scale: CalibrationScale,
}

impl HeightEstimator {
    pub fn new(scale: CalibrationScale) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> CalibrationScale {
        self.scale
    }

    /// Measure the largest-area contour.
    ///
    /// The largest *area* is selected, not the tallest outline, so a wide
    /// low structure can win over a slender mast.
    pub fn estimate(&self, source_image: &str, contours: &[Contour]) -> HeightEstimate {
        let Some(contour) = largest_by_area(contours) else {
            warn!("No significant objects/contours detected in {source_image}");
            return HeightEstimate {
                source_image: source_image.to_string(),
                pixel_height: 0,
                real_height_m: 0.0,
                bounding_box: None,
                calibration_mode: self.scale.mode,
            };
        };

        if self.scale.mode == CalibrationMode::Fallback {
            warn!(
                "{source_image}: estimating height without a ground reference \
                 ({} m/px assumed), accuracy may be low",
                self.scale.meters_per_pixel
            );
        }

        let bbox = contour.bounding_box();
        HeightEstimate {
            source_image: source_image.to_string(),
            pixel_height: bbox.height,
            real_height_m: bbox.height as f64 * self.scale.meters_per_pixel,
            bounding_box: Some(bbox),
            calibration_mode: self.scale.mode,
        }
    }
}
