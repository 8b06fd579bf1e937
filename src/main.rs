use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, warn};

use mastsurvey::config::{CalibrationSource, HubHeightSource, SurveyConfig};
use mastsurvey::debug::DebugWriter;
use mastsurvey::{SurveyError, report, run_survey};

#[derive(Parser)]
#[command(name = "mastsurvey")]
#[command(about = "Estimate mast heights from site photos and project wind speed to hub height")]
struct Cli {
    /// Directory containing .jpg, .jpeg or .png site photos
    #[arg(value_name = "IMAGE_DIR")]
    image_dir: PathBuf,

    /// JSON configuration file; flags below override it
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Pixel height of the reference object at 800x600
    #[arg(
        long,
        value_name = "PX",
        conflicts_with_all = ["calibrate_from_first_image", "fallback_calibration"]
    )]
    reference_pixel_height: Option<f64>,

    /// Measure the reference object in the first image
    #[arg(long, conflicts_with = "fallback_calibration")]
    calibrate_from_first_image: bool,

    /// Use the uncalibrated 100 px-per-reference fallback (low accuracy)
    #[arg(long)]
    fallback_calibration: bool,

    /// Real height of the reference object in meters
    #[arg(long, value_name = "M")]
    known_reference_height: Option<f64>,

    /// Height of the wind measurement in meters
    #[arg(long, value_name = "M")]
    reference_height: Option<f64>,

    /// Average wind speed at the reference height in m/s
    #[arg(long, value_name = "V")]
    reference_speed: Option<f64>,

    /// Power-law shear exponent (alpha)
    #[arg(long, value_name = "ALPHA")]
    shear_exponent: Option<f64>,

    /// Turbine hub height in meters
    #[arg(long, value_name = "M")]
    hub_height: Option<f64>,

    /// Minimum projected speed for "High Potential" in m/s
    #[arg(long, value_name = "V")]
    threshold: Option<f64>,

    /// Project to each image's estimated hub height instead of --hub-height
    #[arg(long)]
    project_at_estimated_height: bool,

    /// Process images in parallel
    #[arg(long)]
    parallel: bool,

    /// Report file (.csv or .json)
    #[arg(
        short,
        long,
        value_name = "FILE",
        default_value = "wind_farm_survey_report.csv"
    )]
    output: PathBuf,

    /// Save edge maps and annotated images to directory (must be empty)
    #[arg(long, value_name = "DIR")]
    debug_out: Option<PathBuf>,

    /// TTF/OTF font used to label annotated debug images with the height
    #[arg(long, value_name = "FILE", requires = "debug_out")]
    debug_font: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn survey_config(&self) -> Result<SurveyConfig, SurveyError> {
        let mut config = match &self.config {
            Some(path) => SurveyConfig::load(path)?,
            None => SurveyConfig::default(),
        };

        if let Some(px) = self.reference_pixel_height {
            config.calibration.source = CalibrationSource::ReferencePixels(px);
        } else if self.calibrate_from_first_image {
            config.calibration.source = CalibrationSource::FirstImage;
        } else if self.fallback_calibration {
            config.calibration.source = CalibrationSource::Fallback;
        }
        if let Some(height) = self.known_reference_height {
            config.calibration.known_reference_object_height_m = height;
        }

        let wind = &mut config.wind;
        if let Some(height) = self.reference_height {
            wind.reference_measurement_height_m = height;
        }
        if let Some(speed) = self.reference_speed {
            wind.average_reference_wind_speed_m_s = speed;
        }
        if let Some(alpha) = self.shear_exponent {
            wind.shear_exponent = alpha;
        }
        if let Some(height) = self.hub_height {
            wind.turbine_hub_height_m = height;
        }
        if let Some(threshold) = self.threshold {
            wind.suitability_threshold_m_s = threshold;
        }
        if self.project_at_estimated_height {
            wind.hub_height_source = HubHeightSource::Estimated;
        }
        config.parallel |= self.parallel;

        Ok(config)
    }
}

fn main() -> anyhow::Result<()> {
    let args = Cli::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt().with_max_level(level).init();

    let config = args.survey_config()?;
    let debug = match &args.debug_out {
        Some(dir) => {
            let writer = DebugWriter::new(dir.clone())?;
            match &args.debug_font {
                Some(font) => Some(writer.with_font(font)?),
                None => Some(writer),
            }
        }
        None => None,
    };

    let outcome = match run_survey(&config, &args.image_dir, debug) {
        Ok(outcome) => outcome,
        Err(e) => {
            error!("{e}");
            return Err(e.into());
        }
    };

    if outcome.records.is_empty() {
        warn!("No image could be processed; no report written");
        return Ok(());
    }

    report::write_report(&args.output, &outcome.records)?;

    info!("--- Analysis Complete ---");
    info!(
        "Processed {} images, skipped {}",
        outcome.records.len(),
        outcome.skipped.len()
    );
    info!("Detailed report saved to: {}", args.output.display());

    Ok(())
}
