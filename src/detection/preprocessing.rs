use image::imageops::FilterType;
use image::{DynamicImage, GrayImage, ImageError, ImageReader};
use imageproc::filter::gaussian_blur_f32;
use std::path::Path;

use super::edges::canny_edges;
use crate::error::{Result, SurveyError};

/// Decode an image file, guessing the format from its contents
pub fn load_image(path: &Path) -> Result<DynamicImage> {
    let decode_error = |source: ImageError| SurveyError::Decode {
        path: path.to_path_buf(),
        source,
    };

    ImageReader::open(path)
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_error(ImageError::IoError(e)))?
        .decode()
        .map_err(decode_error)
}

/// Resize to the canonical resolution, ignoring aspect ratio
pub fn resize_canonical(img: &DynamicImage, width: u32, height: u32) -> DynamicImage {
    if img.width() == width && img.height() == height {
        return img.clone();
    }
    img.resize_exact(width, height, FilterType::Triangle)
}

/// Convert image to grayscale
pub fn to_grayscale(img: &DynamicImage) -> GrayImage {
    img.to_luma8()
}

/// Apply Gaussian blur to reduce noise
pub fn apply_blur(img: &GrayImage, sigma: f32) -> GrayImage {
    gaussian_blur_f32(img, sigma)
}

/// Detect edges using Canny edge detector.
///
/// `img` must already be blurred; no further smoothing is applied.
pub fn detect_edges(img: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    canny_edges(img, low_threshold, high_threshold)
}
