pub mod config;
pub mod debug;
pub mod detection;
pub mod error;
pub mod height;
pub mod models;
pub mod pipeline;
pub mod report;
pub mod wind;

pub use config::{CalibrationSource, HubHeightSource, SurveyConfig};
pub use detection::ContourExtractor;
pub use error::SurveyError;
pub use height::{CalibrationScale, HeightEstimator};
pub use models::{
    BoundingBox, CalibrationMode, Contour, HeightEstimate, Suitability, SurveyRecord,
    WindProfileResult,
};
pub use pipeline::{BatchOutcome, SkippedImage, SurveyPipeline, run_survey};
pub use wind::WindShearModel;
