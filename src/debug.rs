use ab_glyph::{FontArc, PxScale};
use image::Rgb;
use imageproc::drawing::{draw_hollow_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::detection::Extraction;
use crate::error::{Result, SurveyError};
use crate::models::HeightEstimate;

const BOX_COLOR: Rgb<u8> = Rgb([0, 255, 0]);
const LABEL_SCALE: f32 = 16.0;

/// Writes per-image edge maps and annotated images for inspection.
#[derive(Debug, Clone)]
pub struct DebugWriter {
    output_dir: PathBuf,
    font: Option<FontArc>,
}

impl DebugWriter {
    /// The directory must be empty or non-existent.
    pub fn new(output_dir: PathBuf) -> Result<Self> {
        if output_dir.exists() {
            let entries = std::fs::read_dir(&output_dir)?;
            if entries.count() > 0 {
                return Err(SurveyError::Config(format!(
                    "debug directory is not empty: {}",
                    output_dir.display()
                )));
            }
        } else {
            std::fs::create_dir_all(&output_dir)?;
        }

        Ok(Self {
            output_dir,
            font: None,
        })
    }

    /// Label annotated images with the estimated height, using a TTF/OTF font
    pub fn with_font(mut self, font_path: &Path) -> Result<Self> {
        let data = std::fs::read(font_path)?;
        let font = FontArc::try_from_vec(data).map_err(|e| {
            SurveyError::Config(format!("invalid font {}: {e}", font_path.display()))
        })?;
        self.font = Some(font);
        Ok(self)
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Save `<image_name>_edges.png` and `<image_name>_annotated.png`.
    ///
    /// The full file name is kept so `site.jpg` and `site.png` do not collide.
    pub fn save(
        &self,
        image_name: &str,
        extraction: &Extraction,
        estimate: &HeightEstimate,
    ) -> Result<()> {
        let edges_path = self.output_dir.join(format!("{image_name}_edges.png"));
        extraction
            .edges
            .save(&edges_path)
            .map_err(|e| SurveyError::Report(format!("failed to save debug image: {e}")))?;

        let mut annotated = extraction.canonical.to_rgb8();
        if let Some(bbox) = estimate.bounding_box {
            let (x, y) = (bbox.x as i32, bbox.y as i32);
            let rect = Rect::at(x, y).of_size(bbox.width.max(1), bbox.height.max(1));
            draw_hollow_rect_mut(&mut annotated, rect, BOX_COLOR);
            // two pixel outline
            if bbox.width > 2 && bbox.height > 2 {
                let inner = Rect::at(x + 1, y + 1).of_size(bbox.width - 2, bbox.height - 2);
                draw_hollow_rect_mut(&mut annotated, inner, BOX_COLOR);
            }

            if let Some(font) = &self.font {
                let text_y = (y - 20).max(0);
                let scale = PxScale::from(LABEL_SCALE);
                let label = height_label(estimate);
                draw_text_mut(&mut annotated, BOX_COLOR, x, text_y, scale, font, &label);
            }
        }

        let annotated_path = self.output_dir.join(format!("{image_name}_annotated.png"));
        annotated
            .save(&annotated_path)
            .map_err(|e| SurveyError::Report(format!("failed to save debug image: {e}")))?;

        debug!(
            "Debug: saved {} and {}",
            edges_path.display(),
            annotated_path.display()
        );
        Ok(())
    }
}

/// Text drawn above the bounding box
pub fn height_label(estimate: &HeightEstimate) -> String {
    format!("Est. Height: {:.2} m", estimate.real_height_m)
}
