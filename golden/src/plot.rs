//! Mismatch visualization: a 2x2 grid of titled heatmaps, one colour scale
//! per panel, each bar labelled with its panel's max and min.

use std::path::PathBuf;

use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgb, RgbImage};
use ndarray::{Array2, ArrayD};
use tracing::{debug, info};

use crate::Error;

const MARGIN: u32 = 16;
const BAR_GAP: u32 = 8;
const BAR_WIDTH: u32 = 16;
const GLYPH: u32 = 8;
const TITLE_HEIGHT: u32 = GLYPH + 4;
const LABEL_GAP: u32 = 4;
const LABEL_CHARS: u32 = 10;

const INK: Rgb<u8> = Rgb([0, 0, 0]);

const VIRIDIS: [[f64; 3]; 5] = [
    [68.0, 1.0, 84.0],
    [59.0, 82.0, 139.0],
    [33.0, 145.0, 140.0],
    [94.0, 201.0, 98.0],
    [253.0, 231.0, 37.0],
];

/// One heatmap. Arrays with more than two axes are folded so the last axis
/// becomes the columns.
#[derive(Clone, Debug)]
pub struct Panel {
    pub title: &'static str,
    pub values: Array2<f64>,
}

impl Panel {
    pub fn new(title: &'static str, values: &ArrayD<f64>) -> Result<Self, Error> {
        let shape = values.shape();
        let (rows, cols) = match shape.split_last() {
            None => (1, 1),
            Some((&last, lead)) => (lead.iter().product(), last),
        };
        let grid = Array2::from_shape_vec((rows, cols), values.iter().copied().collect())
            .map_err(|e| Error::Plot(format!("{}: {}", title, e)))?;
        Ok(Panel {
            title,
            values: grid,
        })
    }

    /// Finite min and max, if any.
    pub fn range(&self) -> Option<(f64, f64)> {
        self.values
            .iter()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

pub trait Visualizer {
    fn render(&self, panels: &[Panel; 4]) -> Result<(), Error>;
}

#[derive(Copy, Clone, Debug, Default)]
pub struct NoopVisualizer;

impl Visualizer for NoopVisualizer {
    fn render(&self, panels: &[Panel; 4]) -> Result<(), Error> {
        debug!(panels = panels.len(), "plot_skipped");
        Ok(())
    }
}

/// Writes the grid as a PNG, each heatmap followed by its colour bar.
#[derive(Clone, Debug)]
pub struct PngVisualizer {
    pub path: PathBuf,
    pub cell: u32,
}

impl PngVisualizer {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        PngVisualizer {
            path: path.into(),
            cell: 256,
        }
    }

    pub fn image_size(&self) -> (u32, u32) {
        (
            2 * self.panel_width() + 3 * MARGIN,
            2 * self.panel_height() + 3 * MARGIN,
        )
    }

    fn panel_width(&self) -> u32 {
        self.cell + BAR_GAP + BAR_WIDTH + LABEL_GAP + LABEL_CHARS * GLYPH
    }

    fn panel_height(&self) -> u32 {
        TITLE_HEIGHT + self.cell
    }

    fn draw_panel(&self, image: &mut RgbImage, panel: &Panel, x0: u32, y0: u32) {
        let cell = self.cell;
        let (rows, cols) = panel.values.dim();
        let range = panel.range();
        let (lo, hi) = range.unwrap_or((0.0, 0.0));

        draw_text(image, panel.title, x0, y0);
        let y0 = y0 + TITLE_HEIGHT;

        for py in 0..cell {
            for px in 0..cell {
                let color = if rows == 0 || cols == 0 {
                    Rgb([128, 128, 128])
                } else {
                    let r = (py as usize * rows) / cell as usize;
                    let c = (px as usize * cols) / cell as usize;
                    let v = panel.values[[r, c]];
                    if v.is_finite() {
                        colormap(normalize(v, lo, hi))
                    } else {
                        Rgb([255, 0, 255])
                    }
                };
                image.put_pixel(x0 + px, y0 + py, color);
            }
        }

        let bar_x = x0 + cell + BAR_GAP;
        for py in 0..cell {
            let t = 1.0 - py as f64 / (cell.max(2) - 1) as f64;
            let color = colormap(t);
            for px in 0..BAR_WIDTH {
                image.put_pixel(bar_x + px, y0 + py, color);
            }
        }

        let label_x = bar_x + BAR_WIDTH + LABEL_GAP;
        let (top, bottom) = match range {
            Some(_) => (label(hi), label(lo)),
            None => ("n/a".to_string(), "n/a".to_string()),
        };
        draw_text(image, &top, label_x, y0);
        draw_text(image, &bottom, label_x, y0 + cell.saturating_sub(GLYPH));

        info!(title = panel.title, rows, cols, min = lo, max = hi, "plot_panel");
    }
}

impl Visualizer for PngVisualizer {
    fn render(&self, panels: &[Panel; 4]) -> Result<(), Error> {
        let (width, height) = self.image_size();
        let mut image = RgbImage::from_pixel(width, height, Rgb([255, 255, 255]));
        let (panel_width, panel_height) = (self.panel_width(), self.panel_height());

        for (i, panel) in panels.iter().enumerate() {
            let col = (i % 2) as u32;
            let row = (i / 2) as u32;
            let x0 = MARGIN + col * (panel_width + MARGIN);
            let y0 = MARGIN + row * (panel_height + MARGIN);
            self.draw_panel(&mut image, panel, x0, y0);
        }

        image
            .save_with_format(&self.path, ImageFormat::Png)
            .map_err(|e| Error::Plot(format!("{}: {}", self.path.display(), e)))?;
        info!(path = %self.path.display(), width, height, "plot_written");
        Ok(())
    }
}

fn label(value: f64) -> String {
    format!("{:.2e}", value)
}

/// Draws `text` with its top-left corner at `(x, y)` in 8x8 glyphs, clipped
/// to the image. Characters without a glyph are left blank.
fn draw_text(image: &mut RgbImage, text: &str, x: u32, y: u32) {
    let (width, height) = image.dimensions();
    for (i, ch) in text.chars().enumerate() {
        let Some(glyph) = BASIC_FONTS.get(ch) else {
            continue;
        };
        let gx = x + i as u32 * GLYPH;
        for (dy, bits) in glyph.iter().enumerate() {
            for dx in 0..GLYPH {
                let (px, py) = (gx + dx, y + dy as u32);
                if bits & (1 << dx) != 0 && px < width && py < height {
                    image.put_pixel(px, py, INK);
                }
            }
        }
    }
}

fn normalize(v: f64, lo: f64, hi: f64) -> f64 {
    if hi > lo {
        ((v - lo) / (hi - lo)).clamp(0.0, 1.0)
    } else {
        0.5
    }
}

fn colormap(t: f64) -> Rgb<u8> {
    let t = t.clamp(0.0, 1.0);
    let scaled = t * (VIRIDIS.len() - 1) as f64;
    let i = (scaled.floor() as usize).min(VIRIDIS.len() - 2);
    let frac = scaled - i as f64;
    let (a, b) = (VIRIDIS[i], VIRIDIS[i + 1]);
    let channel = |k: usize| (a[k] + (b[k] - a[k]) * frac).round() as u8;
    Rgb([channel(0), channel(1), channel(2)])
}
