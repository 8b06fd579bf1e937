use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::warn;

use crate::error::{Result, SurveyError};
use crate::wind::WindShearModel;

/// Batch-wide settings. Read-only once a run starts.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyConfig {
    pub extraction: ExtractionConfig,
    pub calibration: CalibrationConfig,
    pub wind: WindConfig,
    /// Process images on the rayon pool; report order is unaffected.
    pub parallel: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    pub canonical_width: u32,
    pub canonical_height: u32,
    /// Sigma of the smoothing pass. 1.1 matches a 5x5 kernel with automatic sigma.
    pub blur_sigma: f32,
    pub canny_low: f32,
    pub canny_high: f32,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            canonical_width: 800,
            canonical_height: 600,
            blur_sigma: 1.1,
            canny_low: 50.0,
            canny_high: 150.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalibrationSource {
    /// Pixel height of the reference object at canonical resolution.
    ReferencePixels(f64),
    /// Measure the dominant contour of the first image in the batch.
    FirstImage,
    /// Assume the reference object spans `fallback_reference_pixels`.
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CalibrationConfig {
    pub known_reference_object_height_m: f64,
    pub source: CalibrationSource,
    pub fallback_reference_pixels: f64,
    pub min_hub_height_m: f64,
}

impl Default for CalibrationConfig {
    fn default() -> Self {
        Self {
            known_reference_object_height_m: 1.0,
            source: CalibrationSource::ReferencePixels(50.0),
            fallback_reference_pixels: 100.0,
            min_hub_height_m: 30.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HubHeightSource {
    /// Project to `turbine_hub_height_m`.
    #[default]
    Configured,
    /// Project to the floored hub height estimated from each image.
    Estimated,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindConfig {
    pub reference_measurement_height_m: f64,
    pub average_reference_wind_speed_m_s: f64,
    pub shear_exponent: f64,
    pub turbine_hub_height_m: f64,
    pub suitability_threshold_m_s: f64,
    pub hub_height_source: HubHeightSource,
}

impl Default for WindConfig {
    fn default() -> Self {
        Self {
            reference_measurement_height_m: 10.0,
            average_reference_wind_speed_m_s: 6.5,
            shear_exponent: 0.20,
            turbine_hub_height_m: 80.0,
            suitability_threshold_m_s: 6.0,
            hub_height_source: HubHeightSource::Configured,
        }
    }
}

/// Empirical shear exponent band for the modelled terrain classes.
pub const PLAUSIBLE_SHEAR_EXPONENT: (f64, f64) = (0.05, 0.40);

impl SurveyConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let data = fs::read_to_string(path)
            .map_err(|e| SurveyError::Config(format!("failed to read {}: {e}", path.display())))?;
        Self::from_json(&data)
            .map_err(|e| SurveyError::Config(format!("failed to parse {}: {e}", path.display())))
    }

    pub fn from_json(data: &str) -> std::result::Result<Self, serde_json::Error> {
        serde_json::from_str(data)
    }

    /// Reject settings that would make every image fail.
    pub fn validate(&self) -> Result<()> {
        self.extraction.validate()?;
        self.calibration.validate()?;
        self.wind.validate()
    }
}

impl ExtractionConfig {
    pub fn validate(&self) -> Result<()> {
        if self.canonical_width == 0 || self.canonical_height == 0 {
            return Err(SurveyError::InvalidParameter(format!(
                "canonical resolution must be non-zero, got {}x{}",
                self.canonical_width, self.canonical_height
            )));
        }
        if !(self.blur_sigma > 0.0) {
            return Err(SurveyError::InvalidParameter(format!(
                "blur sigma must be positive, got {}",
                self.blur_sigma
            )));
        }
        if self.canny_low < 0.0 || self.canny_low > self.canny_high {
            return Err(SurveyError::InvalidParameter(format!(
                "edge thresholds must satisfy 0 <= low <= high, got low={} high={}",
                self.canny_low, self.canny_high
            )));
        }
        Ok(())
    }
}

impl CalibrationConfig {
    pub fn validate(&self) -> Result<()> {
        if !(self.known_reference_object_height_m > 0.0)
            || !self.known_reference_object_height_m.is_finite()
        {
            return Err(SurveyError::InvalidCalibration(format!(
                "known reference object height must be positive, got {}",
                self.known_reference_object_height_m
            )));
        }
        if let CalibrationSource::ReferencePixels(px) = self.source {
            if !(px > 0.0) || !px.is_finite() {
                return Err(SurveyError::InvalidCalibration(format!(
                    "reference pixel height must be positive, got {px}"
                )));
            }
        }
        if !(self.fallback_reference_pixels > 0.0) {
            return Err(SurveyError::InvalidCalibration(format!(
                "fallback reference pixel height must be positive, got {}",
                self.fallback_reference_pixels
            )));
        }
        if !(self.min_hub_height_m >= 0.0) {
            return Err(SurveyError::InvalidParameter(format!(
                "minimum hub height must be non-negative, got {}",
                self.min_hub_height_m
            )));
        }
        Ok(())
    }
}

impl WindConfig {
    pub fn validate(&self) -> Result<()> {
        WindShearModel::from_config(self)?;

        let z1 = self.reference_measurement_height_m;
        if self.hub_height_source == HubHeightSource::Configured
            && !(self.turbine_hub_height_m > z1)
        {
            return Err(SurveyError::InvalidParameter(format!(
                "hub height {} m must be above the reference height {z1} m",
                self.turbine_hub_height_m
            )));
        }

        let alpha = self.shear_exponent;
        let (low, high) = PLAUSIBLE_SHEAR_EXPONENT;
        if alpha < low || alpha > high {
            warn!(
                "shear exponent {alpha} is outside the usual {low}-{high} range \
                 for open or hilly terrain"
            );
        }
        Ok(())
    }
}
