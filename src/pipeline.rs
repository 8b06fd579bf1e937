use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::{CalibrationSource, HubHeightSource, SurveyConfig};
use crate::debug::DebugWriter;
use crate::detection::ContourExtractor;
use crate::detection::contours::largest_by_area;
use crate::error::{Result, SurveyError};
use crate::height::{CalibrationScale, HeightEstimator};
use crate::models::SurveyRecord;
use crate::wind::WindShearModel;

/// File extensions picked up from the survey directory (case-insensitive).
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

/// An image left out of the report, with the reason it was skipped.
#[derive(Debug, Clone)]
pub struct SkippedImage {
    pub path: PathBuf,
    pub reason: String,
}

/// Records in input order plus the images that could not be processed.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub records: Vec<SurveyRecord>,
    pub skipped: Vec<SkippedImage>,
}

/// List the survey images of `dir`, sorted by file name.
pub fn collect_image_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(SurveyError::Config(format!(
            "'{}' is not a valid directory",
            dir.display()
        )));
    }

    let mut files = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file() && has_image_extension(&path) {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    Ok(files)
}

fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
        .unwrap_or(false)
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Build the batch-wide scale from the configured calibration source.
///
/// `FirstImage` measures the dominant contour of `images[0]`; failure to do
/// so is a calibration error, since every estimate depends on it.
pub fn resolve_calibration(
    config: &SurveyConfig,
    extractor: &ContourExtractor,
    images: &[PathBuf],
) -> Result<CalibrationScale> {
    let known = config.calibration.known_reference_object_height_m;
    match config.calibration.source {
        CalibrationSource::ReferencePixels(px) => CalibrationScale::from_reference(known, px),
        CalibrationSource::Fallback => {
            CalibrationScale::fallback(known, config.calibration.fallback_reference_pixels)
        }
        CalibrationSource::FirstImage => {
            let first = images.first().ok_or_else(|| {
                SurveyError::InvalidCalibration("no image to calibrate from".to_string())
            })?;
            let extraction = extractor.extract_file(first).map_err(|e| {
                SurveyError::InvalidCalibration(format!(
                    "cannot calibrate from {}: {e}",
                    first.display()
                ))
            })?;
            let contour = largest_by_area(&extraction.contours).ok_or_else(|| {
                SurveyError::InvalidCalibration(format!(
                    "no reference object detected in {}",
                    first.display()
                ))
            })?;

            let px = contour.bounding_box().height as f64;
            info!(
                "Calibrated from {}: {known} m reference spans {px} px",
                display_name(first)
            );
            CalibrationScale::from_reference(known, px)
        }
    }
}

/// Per-image survey: contours -> height estimate -> wind projection.
#[derive(Debug, Clone)]
pub struct SurveyPipeline {
    extractor: ContourExtractor,
    estimator: HeightEstimator,
    wind: WindShearModel,
    min_hub_height_m: f64,
    turbine_hub_height_m: f64,
    hub_height_source: HubHeightSource,
    parallel: bool,
    debug: Option<DebugWriter>,
}

impl SurveyPipeline {
    pub fn new(config: &SurveyConfig, scale: CalibrationScale) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            extractor: ContourExtractor::new(config.extraction.clone()),
            estimator: HeightEstimator::new(scale),
            wind: WindShearModel::from_config(&config.wind)?,
            min_hub_height_m: config.calibration.min_hub_height_m,
            turbine_hub_height_m: config.wind.turbine_hub_height_m,
            hub_height_source: config.wind.hub_height_source,
            parallel: config.parallel,
            debug: None,
        })
    }

    pub fn with_debug(mut self, debug: DebugWriter) -> Self {
        self.debug = Some(debug);
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn scale(&self) -> CalibrationScale {
        self.estimator.scale()
    }

    /// Survey one image file
    pub fn process_image(&self, path: &Path) -> Result<SurveyRecord> {
        let name = display_name(path);
        let extraction = self.extractor.extract_file(path)?;
        let height = self.estimator.estimate(&name, &extraction.contours);

        if let Some(debug) = &self.debug {
            if let Err(e) = debug.save(&name, &extraction, &height) {
                warn!("{name}: {e}");
            }
        }

        let estimated_hub_height_m = height.hub_height_m(self.min_hub_height_m);
        let target_height_m = match self.hub_height_source {
            HubHeightSource::Configured => self.turbine_hub_height_m,
            HubHeightSource::Estimated => estimated_hub_height_m,
        };
        let wind = self.wind.project(target_height_m)?;

        info!(
            "Image: {name} | est. hub height {:.2} m | projected wind speed {:.2} m/s @ {} m | {}",
            estimated_hub_height_m, wind.projected_speed_m_s, wind.hub_height_m, wind.suitability
        );

        Ok(SurveyRecord {
            image: name,
            height,
            estimated_hub_height_m,
            wind,
        })
    }

    /// Survey every path. Failed images are skipped, never fatal.
    pub fn process_batch(&self, paths: &[PathBuf]) -> BatchOutcome {
        let results: Vec<Result<SurveyRecord>> = if self.parallel {
            paths.par_iter().map(|p| self.process_image(p)).collect()
        } else {
            paths.iter().map(|p| self.process_image(p)).collect()
        };

        let mut outcome = BatchOutcome::default();
        for (path, result) in paths.iter().zip(results) {
            match result {
                Ok(record) => outcome.records.push(record),
                Err(e) => {
                    warn!("Skipping {}: {e}", path.display());
                    outcome.skipped.push(SkippedImage {
                        path: path.clone(),
                        reason: e.to_string(),
                    });
                }
            }
        }

        outcome
    }
}

/// Survey every image in `dir`.
///
/// Configuration and calibration are checked before any image is processed;
/// an empty directory is an error.
pub fn run_survey(
    config: &SurveyConfig,
    dir: &Path,
    debug: Option<DebugWriter>,
) -> Result<BatchOutcome> {
    config.validate()?;

    let images = collect_image_files(dir)?;
    if images.is_empty() {
        return Err(SurveyError::EmptyBatch {
            dir: dir.to_path_buf(),
        });
    }
    info!("Found {} images. Starting analysis...", images.len());

    let extractor = ContourExtractor::new(config.extraction.clone());
    let scale = resolve_calibration(config, &extractor, &images)?;

    let mut pipeline = SurveyPipeline::new(config, scale)?;
    if let Some(debug) = debug {
        pipeline = pipeline.with_debug(debug);
    }

    Ok(pipeline.process_batch(&images))
}
