pub mod contours;
pub mod edges;
pub mod preprocessing;

use image::{DynamicImage, GrayImage};
use std::path::Path;
use tracing::debug;

use crate::config::ExtractionConfig;
use crate::error::{Result, SurveyError};
use crate::models::Contour;

/// Intermediate products of one extraction run.
#[derive(Debug)]
pub struct Extraction {
    /// Input resized to the canonical resolution
    pub canonical: DynamicImage,
    /// Binary edge map the contours were traced from
    pub edges: GrayImage,
    pub contours: Vec<Contour>,
}

/// Turns a decoded photo into outer object silhouettes.
///
/// resize -> grayscale -> blur -> Canny -> external contour tracing.
#[derive(Debug, Clone)]
pub struct ContourExtractor {
    config: ExtractionConfig,
}

impl ContourExtractor {
    pub fn new(config: ExtractionConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Run the full preprocessing chain on an image
    pub fn extract(&self, img: &DynamicImage) -> Result<Extraction> {
        if img.width() == 0 || img.height() == 0 {
            return Err(SurveyError::InvalidParameter(
                "cannot extract contours from an empty image".to_string(),
            ));
        }

        let cfg = &self.config;
        debug!(
            "Resizing {}x{} to {}x{}",
            img.width(),
            img.height(),
            cfg.canonical_width,
            cfg.canonical_height
        );
        let canonical =
            preprocessing::resize_canonical(img, cfg.canonical_width, cfg.canonical_height);

        let gray = preprocessing::to_grayscale(&canonical);
        let blurred = preprocessing::apply_blur(&gray, cfg.blur_sigma);

        debug!(
            "Detecting edges (low={}, high={})",
            cfg.canny_low, cfg.canny_high
        );
        let edges = preprocessing::detect_edges(&blurred, cfg.canny_low, cfg.canny_high);

        let contours = contours::find_external_contours(&edges);
        debug!("Found {} external contours", contours.len());

        Ok(Extraction {
            canonical,
            edges,
            contours,
        })
    }

    /// Decode `path` and extract its contours
    pub fn extract_file(&self, path: &Path) -> Result<Extraction> {
        let img = preprocessing::load_image(path)?;
        self.extract(&img)
    }
}

impl Default for ContourExtractor {
    fn default() -> Self {
        Self::new(ExtractionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn output_is_canonical_size() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(320, 240, Rgb([10, 20, 30])));
        let extraction = ContourExtractor::default().extract(&img).unwrap();

        assert_eq!(extraction.canonical.width(), 800);
        assert_eq!(extraction.canonical.height(), 600);
        assert_eq!(extraction.edges.dimensions(), (800, 600));
        assert!(extraction.contours.is_empty());
    }

    #[test]
    fn input_image_is_not_modified() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(400, 300, |x, _| {
            if x > 200 { Rgb([255, 255, 255]) } else { Rgb([0, 0, 0]) }
        }));
        let before = img.clone();
        ContourExtractor::default().extract(&img).unwrap();
        assert_eq!(img.as_bytes(), before.as_bytes());
    }

    #[test]
    fn empty_image_is_rejected() {
        let img = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        assert!(ContourExtractor::default().extract(&img).is_err());
    }

    #[test]
    fn missing_file_is_a_decode_error() {
        let err = ContourExtractor::default()
            .extract_file(Path::new("/nonexistent/mast.jpg"))
            .unwrap_err();
        assert!(matches!(err, SurveyError::Decode { .. }));
    }
}
