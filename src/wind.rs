use crate::config::WindConfig;
use crate::error::{Result, SurveyError};
use crate::models::{Suitability, WindProfileResult};

/// Power-law wind profile: `V2 = V1 * (Z2 / Z1) ^ alpha`.
///
/// Stateless once built; safe to share across threads.
#[derive(Debug, Clone, PartialEq)]
pub struct WindShearModel {
    reference_height_m: f64,
    reference_speed_m_s: f64,
    shear_exponent: f64,
    suitability_threshold_m_s: f64,
}

impl WindShearModel {
    pub fn new(
        reference_height_m: f64,
        reference_speed_m_s: f64,
        shear_exponent: f64,
        suitability_threshold_m_s: f64,
    ) -> Result<Self> {
        if !(reference_height_m > 0.0) || !reference_height_m.is_finite() {
            return Err(SurveyError::InvalidParameter(format!(
                "reference height must be positive, got {reference_height_m}"
            )));
        }
        if !(reference_speed_m_s >= 0.0) || !reference_speed_m_s.is_finite() {
            return Err(SurveyError::InvalidParameter(format!(
                "reference wind speed must be a non-negative number, got {reference_speed_m_s}"
            )));
        }
        if !(shear_exponent >= 0.0) || !shear_exponent.is_finite() {
            return Err(SurveyError::InvalidParameter(format!(
                "shear exponent must be a non-negative number, got {shear_exponent}"
            )));
        }
        if !suitability_threshold_m_s.is_finite() {
            return Err(SurveyError::InvalidParameter(format!(
                "suitability threshold must be finite, got {suitability_threshold_m_s}"
            )));
        }

        Ok(Self {
            reference_height_m,
            reference_speed_m_s,
            shear_exponent,
            suitability_threshold_m_s,
        })
    }

    pub fn from_config(config: &WindConfig) -> Result<Self> {
        Self::new(
            config.reference_measurement_height_m,
            config.average_reference_wind_speed_m_s,
            config.shear_exponent,
            config.suitability_threshold_m_s,
        )
    }

    pub fn reference_height_m(&self) -> f64 {
        self.reference_height_m
    }

    /// Wind speed at `hub_height_m`, which must lie above the reference height.
    pub fn projected_speed(&self, hub_height_m: f64) -> Result<f64> {
        if !(hub_height_m > self.reference_height_m) || !hub_height_m.is_finite() {
            return Err(SurveyError::InvalidParameter(format!(
                "hub height {hub_height_m} m must be above the reference height {} m",
                self.reference_height_m
            )));
        }

        Ok(self.reference_speed_m_s
            * (hub_height_m / self.reference_height_m).powf(self.shear_exponent))
    }

    /// Threshold is inclusive.
    pub fn classify(&self, projected_speed_m_s: f64) -> Suitability {
        if projected_speed_m_s >= self.suitability_threshold_m_s {
            Suitability::High
        } else {
            Suitability::ModerateOrLow
        }
    }

    pub fn project(&self, hub_height_m: f64) -> Result<WindProfileResult> {
        let projected_speed_m_s = self.projected_speed(hub_height_m)?;
        Ok(WindProfileResult {
            reference_height_m: self.reference_height_m,
            reference_speed_m_s: self.reference_speed_m_s,
            shear_exponent: self.shear_exponent,
            hub_height_m,
            projected_speed_m_s,
            suitability: self.classify(projected_speed_m_s),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_model() -> WindShearModel {
        WindShearModel::from_config(&WindConfig::default()).unwrap()
    }

    #[test]
    fn power_law_is_reproduced_exactly() {
        let result = default_model().project(80.0).unwrap();
        assert_eq!(result.projected_speed_m_s, 6.5 * (80.0f64 / 10.0).powf(0.20));
        assert!((result.projected_speed_m_s - 9.852).abs() < 1e-3);
        assert_eq!(result.suitability, Suitability::High);
        assert_eq!(result.hub_height_m, 80.0);
        assert_eq!(result.reference_height_m, 10.0);
    }

    #[test]
    fn speed_increases_with_hub_height() {
        let model = default_model();
        let mut previous = model.projected_speed(10.5).unwrap();
        for hub in [12.0, 20.0, 30.0, 55.5, 80.0, 120.0, 200.0] {
            let speed = model.projected_speed(hub).unwrap();
            assert!(speed > previous, "speed at {hub} m did not increase");
            previous = speed;
        }
    }

    #[test]
    fn hub_at_or_below_reference_is_rejected() {
        let model = default_model();
        for hub in [10.0, 9.99, 0.0, -20.0, f64::NAN] {
            assert!(matches!(
                model.project(hub),
                Err(SurveyError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn non_positive_reference_height_is_rejected() {
        assert!(WindShearModel::new(0.0, 6.5, 0.2, 6.0).is_err());
        assert!(WindShearModel::new(-10.0, 6.5, 0.2, 6.0).is_err());
    }

    #[test]
    fn negative_speed_and_exponent_are_rejected() {
        assert!(WindShearModel::new(10.0, -1.0, 0.2, 6.0).is_err());
        assert!(WindShearModel::new(10.0, f64::NAN, 0.2, 6.0).is_err());
        assert!(WindShearModel::new(10.0, 6.5, -0.1, 6.0).is_err());
        assert!(WindShearModel::new(10.0, 6.5, f64::INFINITY, 6.0).is_err());
        assert!(WindShearModel::new(10.0, 0.0, 0.0, 6.0).is_ok());
    }

    #[test]
    fn non_finite_threshold_is_rejected() {
        for threshold in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(matches!(
                WindShearModel::new(10.0, 6.5, 0.2, threshold),
                Err(SurveyError::InvalidParameter(_))
            ));
        }
    }

    #[test]
    fn threshold_boundary_is_inclusive() {
        let model = default_model();
        assert_eq!(model.classify(6.0), Suitability::High);
        assert_eq!(model.classify(5.999_999_999), Suitability::ModerateOrLow);
        assert_eq!(model.classify(0.0), Suitability::ModerateOrLow);
    }

    #[test]
    fn calm_site_is_moderate() {
        let model = WindShearModel::new(10.0, 4.0, 0.14, 6.0).unwrap();
        let result = model.project(50.0).unwrap();
        assert!(result.projected_speed_m_s < 6.0);
        assert_eq!(result.suitability, Suitability::ModerateOrLow);
    }
}
