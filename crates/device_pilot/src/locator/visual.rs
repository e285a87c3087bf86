//! Visual locator: reference-image matching against a screen capture
//!
//! Both images are reduced to single-channel grayscale and the reference is
//! slid over the capture computing zero-mean normalized cross-correlation.
//! Window sums come from integral images, leaving one multiply-accumulate
//! pass per offset. Only the global maximum is considered, and only above
//! the configured threshold.

use crate::channel::CommandChannel;
use crate::device::Device;
use crate::error::Result;
use crate::tree::{Point, Rect};
use image::GrayImage;
use std::path::Path;
use tracing::debug;

/// An accepted visual match: the matched region and its correlation score.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualMatch {
    pub region: Rect,
    pub score: f64,
}

impl VisualMatch {
    pub fn center(&self) -> Point {
        self.region.center()
    }
}

impl<C: CommandChannel> Device<C> {
    /// Find the best on-screen region for the reference image at `reference`.
    /// `None` when the capture is unavailable, the reference is larger than
    /// the screen, or the best score falls below the threshold. The pulled
    /// capture is deleted regardless of outcome.
    pub async fn find_image(&self, reference: &Path) -> Result<Option<VisualMatch>> {
        let capture = match self.capture_screen().await? {
            Some(capture) => capture,
            None => return Ok(None),
        };

        let frame = image::open(capture.path())?.to_luma8();
        let template = image::open(reference)?.to_luma8();

        let best = match_template(&frame, &template);
        drop(capture);

        let (x, y, score) = match best {
            Some(best) => best,
            None => return Ok(None),
        };
        debug!("best match at ({}, {}) score {:.3}", x, y, score);

        if score < self.config.match_threshold {
            return Ok(None);
        }
        Ok(Some(VisualMatch {
            region: Rect {
                x1: x as i32,
                y1: y as i32,
                x2: (x + template.width()) as i32,
                y2: (y + template.height()) as i32,
            },
            score,
        }))
    }
}

/// Summed-area table with a zero guard row and column, so any window sum is
/// four lookups.
struct Integral {
    width: usize,
    sums: Vec<f64>,
}

impl Integral {
    fn new(img: &GrayImage, square: bool) -> Self {
        let (w, h) = (img.width() as usize, img.height() as usize);
        let width = w + 1;
        let mut sums = vec![0.0f64; width * (h + 1)];
        for y in 0..h {
            let mut row = 0.0f64;
            for x in 0..w {
                let v = img.as_raw()[y * w + x] as f64;
                row += if square { v * v } else { v };
                sums[(y + 1) * width + (x + 1)] = sums[y * width + (x + 1)] + row;
            }
        }
        Self { width, sums }
    }

    fn window(&self, x: usize, y: usize, w: usize, h: usize) -> f64 {
        self.sums[(y + h) * self.width + (x + w)] - self.sums[y * self.width + (x + w)]
            - self.sums[(y + h) * self.width + x]
            + self.sums[y * self.width + x]
    }
}

/// Zero-mean normalized cross-correlation of `template` over `frame`.
/// Returns the offset and score of the global maximum, or `None` when the
/// template does not fit inside the frame. Zero-variance windows score 0.
fn match_template(frame: &GrayImage, template: &GrayImage) -> Option<(u32, u32, f64)> {
    let (fw, fh) = (frame.width() as usize, frame.height() as usize);
    let (tw, th) = (template.width() as usize, template.height() as usize);
    if tw == 0 || th == 0 || tw > fw || th > fh {
        return None;
    }

    let n = (tw * th) as f64;
    let t_sum: f64 = template.as_raw().iter().map(|&v| v as f64).sum();
    let t_mean = t_sum / n;
    let t_dev: f64 = template
        .as_raw()
        .iter()
        .map(|&v| (v as f64 - t_mean).powi(2))
        .sum();

    let f_int = Integral::new(frame, false);
    let f_sq_int = Integral::new(frame, true);
    let frame_raw = frame.as_raw();
    let template_raw = template.as_raw();

    let mut best: Option<(u32, u32, f64)> = None;
    for y in 0..=(fh - th) {
        for x in 0..=(fw - tw) {
            let f_sum = f_int.window(x, y, tw, th);
            let f_mean = f_sum / n;
            let f_dev = f_sq_int.window(x, y, tw, th) - n * f_mean * f_mean;

            let mut cross = 0.0f64;
            for ty in 0..th {
                let f_row = &frame_raw[(y + ty) * fw + x..(y + ty) * fw + x + tw];
                let t_row = &template_raw[ty * tw..(ty + 1) * tw];
                for (f, t) in f_row.iter().zip(t_row) {
                    cross += *f as f64 * *t as f64;
                }
            }
            let numerator = cross - n * f_mean * t_mean;

            let denominator = (f_dev * t_dev).sqrt();
            let score = if denominator > 0.0 {
                numerator / denominator
            } else {
                0.0
            };

            if best.map_or(true, |(_, _, s)| score > s) {
                best = Some((x as u32, y as u32, score));
            }
        }
    }
    best
}
