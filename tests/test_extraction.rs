mod common;

use common::*;
use image::DynamicImage;
use mastsurvey::{CalibrationScale, ContourExtractor, HeightEstimator};

fn measure(img: image::RgbImage) -> mastsurvey::HeightEstimate {
    let extraction = ContourExtractor::default()
        .extract(&DynamicImage::ImageRgb8(img))
        .expect("extraction failed");
    let scale = CalibrationScale::from_reference(1.0, 50.0).unwrap();
    HeightEstimator::new(scale).estimate("synthetic.png", &extraction.contours)
}

#[test]
fn rectangle_height_is_recovered_at_canonical_size() {
    let estimate = measure(mast_image());

    assert!(estimate.object_detected());
    let px = estimate.pixel_height as i64;
    assert!((198..=202).contains(&px), "measured {px} px, expected 200 +/- 2");
}

#[test]
fn rectangle_height_is_recovered_after_resize() {
    // 400 px tall at 1600x1200 becomes 200 px at 800x600
    let estimate = measure(rectangle_image(1600, 1200, 700, 300, 100, 400));

    let px = estimate.pixel_height as i64;
    assert!((198..=202).contains(&px), "measured {px} px, expected 200 +/- 2");
}

#[test]
fn featureless_image_has_no_contours() {
    let extraction = ContourExtractor::default()
        .extract(&DynamicImage::ImageRgb8(blank_image(1024, 768)))
        .unwrap();
    assert!(extraction.contours.is_empty());

    let estimate = measure(blank_image(1024, 768));
    assert!(!estimate.object_detected());
    assert_eq!(estimate.real_height_m, 0.0);
    assert_eq!(estimate.hub_height_m(30.0), 30.0);
}

#[test]
fn inner_detail_does_not_replace_outer_silhouette() {
    let mut img = rectangle_image(800, 600, 200, 100, 300, 400);
    for y in 250..350 {
        for x in 300..400 {
            img.put_pixel(x, y, BACKGROUND);
        }
    }

    let estimate = measure(img);
    let px = estimate.pixel_height as i64;
    assert!((398..=402).contains(&px), "measured {px} px, expected 400 +/- 2");
}

#[test]
fn larger_object_is_selected() {
    let mut img = rectangle_image(800, 600, 50, 50, 20, 120);
    for y in 300..500 {
        for x in 300..600 {
            img.put_pixel(x, y, FOREGROUND);
        }
    }

    let estimate = measure(img);
    let px = estimate.pixel_height as i64;
    assert!((198..=202).contains(&px), "measured {px} px, expected 200 +/- 2");
}

#[test]
fn moderate_contrast_rectangle_is_one_silhouette() {
    // gray 100 on gray 20
    let img = image::RgbImage::from_fn(800, 600, |x, y| {
        if (300..500).contains(&x) && (200..400).contains(&y) {
            image::Rgb([100, 100, 100])
        } else {
            image::Rgb([20, 20, 20])
        }
    });
    let extraction = ContourExtractor::default()
        .extract(&DynamicImage::ImageRgb8(img.clone()))
        .unwrap();
    assert_eq!(extraction.contours.len(), 1);

    let px = measure(img).pixel_height as i64;
    assert!((198..=202).contains(&px), "measured {px} px, expected 200 +/- 2");
}

#[test]
fn single_pixel_mast_is_detected() {
    let img = rectangle_image(800, 600, 400, 150, 1, 300);
    let extraction = ContourExtractor::default()
        .extract(&DynamicImage::ImageRgb8(img.clone()))
        .unwrap();
    assert!(!extraction.contours.is_empty());

    let estimate = measure(img);
    assert!(estimate.object_detected());
    let px = estimate.pixel_height as i64;
    assert!((298..=304).contains(&px), "measured {px} px, expected about 300");
}
