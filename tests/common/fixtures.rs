#![allow(dead_code)]

use image::{ImageBuffer, Rgb, RgbImage};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub const BACKGROUND: Rgb<u8> = Rgb([20, 30, 40]);
pub const FOREGROUND: Rgb<u8> = Rgb([240, 240, 240]);

/// Dark image with one bright filled rectangle spanning
/// `x..x+width` and `y..y+height`.
pub fn rectangle_image(
    image_width: u32,
    image_height: u32,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
) -> RgbImage {
    ImageBuffer::from_fn(image_width, image_height, |px, py| {
        if px >= x && px < x + width && py >= y && py < y + height {
            FOREGROUND
        } else {
            BACKGROUND
        }
    })
}

/// Featureless image, e.g. clear sky
pub fn blank_image(image_width: u32, image_height: u32) -> RgbImage {
    ImageBuffer::from_pixel(image_width, image_height, BACKGROUND)
}

/// Canonical-size image with a 200 px tall rectangle
pub fn mast_image() -> RgbImage {
    rectangle_image(800, 600, 380, 150, 40, 200)
}

pub fn save_png(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Png)
        .expect("Failed to save test image");
    path
}

pub fn save_jpeg(dir: &Path, name: &str, img: &RgbImage) -> PathBuf {
    let path = dir.join(name);
    img.save_with_format(&path, image::ImageFormat::Jpeg)
        .expect("Failed to save test image");
    path
}

/// A file with an image extension but no image inside
pub fn save_corrupt(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, b"definitely not a jpeg").expect("Failed to write corrupt file");
    path
}

/// Survey directory with three valid photos and one unreadable file.
/// Returns the temp directory (keep alive) and the valid file names in order.
pub fn mixed_survey_dir() -> (TempDir, Vec<&'static str>) {
    let dir = TempDir::new().expect("Failed to create temp directory");
    save_png(dir.path(), "a_site.png", &mast_image());
    save_corrupt(dir.path(), "b_broken.jpg");
    save_png(dir.path(), "c_site.PNG", &rectangle_image(800, 600, 100, 50, 60, 300));
    save_png(dir.path(), "d_site.png", &rectangle_image(800, 600, 500, 300, 120, 100));
    std::fs::write(dir.path().join("notes.txt"), "field notes").expect("Failed to write notes");
    (dir, vec!["a_site.png", "c_site.PNG", "d_site.png"])
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "expected {expected} +/- {tolerance}, got {actual}"
    );
}
