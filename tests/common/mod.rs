mod fixtures;
pub use fixtures::*;

// Re-export commonly used types from mastsurvey for tests
pub use mastsurvey::{
    CalibrationSource, HubHeightSource, Suitability, SurveyConfig, SurveyError, SurveyRecord,
};
