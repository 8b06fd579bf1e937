//! Canny edge detection without built-in smoothing.
//!
//! The caller blurs once; this module only runs Sobel gradients, L1
//! magnitude, non-maximum suppression and hysteresis, so thresholds keep the
//! meaning they have for a single-blur Canny.
use image::{GrayImage, Luma};
use imageproc::gradients::{horizontal_sobel, vertical_sobel};

const TAN_22_5_DEG: f32 = 0.414_213_56;
const EDGE: u8 = 255;

/// Binary edge map (255 = edge) of an already smoothed image.
///
/// Pixels above `high_threshold` seed edges; pixels above `low_threshold`
/// are kept when 8-connected to a seed.
pub fn canny_edges(image: &GrayImage, low_threshold: f32, high_threshold: f32) -> GrayImage {
    let (w, h) = image.dimensions();
    let (w, h) = (w as usize, h as usize);
    let mut edges = GrayImage::new(w as u32, h as u32);
    if w < 3 || h < 3 {
        return edges;
    }

    let gx = horizontal_sobel(image);
    let gy = vertical_sobel(image);
    let grad_x: Vec<f32> = gx.pixels().map(|p| p[0] as f32).collect();
    let grad_y: Vec<f32> = gy.pixels().map(|p| p[0] as f32).collect();
    let mag: Vec<f32> = grad_x
        .iter()
        .zip(&grad_y)
        .map(|(x, y)| x.abs() + y.abs())
        .collect();

    let thinned = non_max_suppression(&grad_x, &grad_y, &mag, w, h, low_threshold);

    // hysteresis
    let mut stack = Vec::new();
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            if thinned[i] > high_threshold && edges.get_pixel(x as u32, y as u32)[0] == 0 {
                edges.put_pixel(x as u32, y as u32, Luma([EDGE]));
                stack.push((x, y));
                while let Some((cx, cy)) = stack.pop() {
                    for ny in cy - 1..=cy + 1 {
                        for nx in cx - 1..=cx + 1 {
                            if nx == 0 || ny == 0 || nx >= w - 1 || ny >= h - 1 {
                                continue;
                            }
                            let j = ny * w + nx;
                            if thinned[j] > low_threshold
                                && edges.get_pixel(nx as u32, ny as u32)[0] == 0
                            {
                                edges.put_pixel(nx as u32, ny as u32, Luma([EDGE]));
                                stack.push((nx, ny));
                            }
                        }
                    }
                }
            }
        }
    }

    edges
}

/// Keep magnitudes that peak along the quantized gradient direction.
///
/// Ties go to the pixel before the edge (`> first`, `>= second`) so a step
/// that falls exactly between two pixels still leaves one edge pixel.
fn non_max_suppression(
    grad_x: &[f32],
    grad_y: &[f32],
    mag: &[f32],
    w: usize,
    h: usize,
    low_threshold: f32,
) -> Vec<f32> {
    let mut out = vec![0.0f32; w * h];
    for y in 1..h - 1 {
        for x in 1..w - 1 {
            let i = y * w + x;
            let m = mag[i];
            if m <= low_threshold {
                continue;
            }

            let (gx, gy) = (grad_x[i], grad_y[i]);
            let (abs_gx, abs_gy) = (gx.abs(), gy.abs());
            let same_sign = (gx >= 0.0) == (gy >= 0.0);

            let (before, after) = if abs_gy <= abs_gx * TAN_22_5_DEG {
                (mag[i - 1], mag[i + 1])
            } else if abs_gx <= abs_gy * TAN_22_5_DEG {
                (mag[i - w], mag[i + w])
            } else if same_sign {
                (mag[i - w - 1], mag[i + w + 1])
            } else {
                (mag[i - w + 1], mag[i + w - 1])
            };

            if m > before && m >= after {
                out[i] = m;
            }
        }
    }
    out
}
