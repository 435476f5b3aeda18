//! # Rendering
//!
//! Draws a [`ChartGrid`] as a 2×3 panel figure using [`plotters`]' SVG
//! backend. Beta curves become line series, count distributions become
//! filled bars centred on each count. Empty slots keep their title and axes.
//!
//! Non-finite samples (densities that diverge at `p = 0` or `p = 1`) are
//! skipped; the y-axis spans `0 ..= 1.1 × max` over the finite samples.

use std::path::Path;

use plotters::coord::Shift;
use plotters::prelude::*;
use thiserror::Error;

use crate::layout::{ChartGrid, Panel, Series};
use crate::utils::count_to_f64;

/// Errors that can occur while rendering a grid.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("invalid render options: {0}")]
    InvalidOptions(String),
    #[error("failed to prepare drawing area: {0}")]
    DrawingArea(String),
    #[error("failed to configure chart: {0}")]
    ChartConfig(String),
    #[error("failed to draw chart elements: {0}")]
    Drawing(String),
}

type Result<T> = core::result::Result<T, RenderError>;

/// Colour of curves and bars in the reference figure.
pub const DEFAULT_COLOR: RGBColor = RGBColor(0x36, 0xac, 0xc6);

/// Figure geometry and styling.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub width: u32,
    pub height: u32,
    pub color: RGBColor,
    /// Line width of Beta curves in pixels.
    pub stroke_width: u32,
    /// Bar width in count units.
    pub bar_width: f64,
    pub title_size: f64,
    pub label_size: f64,
    pub margin: u32,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 800,
            color: DEFAULT_COLOR,
            stroke_width: 3,
            bar_width: 0.8,
            title_size: 20.0,
            label_size: 14.0,
            margin: 20,
        }
    }
}

impl RenderOptions {
    /// # Errors
    ///
    /// Returns `RenderError::InvalidOptions` for an empty canvas or a bar
    /// width outside `(0, 1]`.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RenderError::InvalidOptions(format!(
                "canvas must be non-empty, got {}x{}",
                self.width, self.height
            )));
        }
        if !(self.bar_width > 0.0 && self.bar_width <= 1.0) {
            return Err(RenderError::InvalidOptions(format!(
                "bar width must lie in (0, 1], got {}",
                self.bar_width
            )));
        }
        Ok(())
    }
}

/// Parse a `#rrggbb` colour.
///
/// # Errors
///
/// Returns `RenderError::InvalidOptions` if `value` is not six hex digits
/// with an optional leading `#`.
pub fn parse_hex_color(value: &str) -> Result<RGBColor> {
    let digits = value.strip_prefix('#').unwrap_or(value);
    let invalid = || RenderError::InvalidOptions(format!("invalid colour `{value}`"));
    if digits.len() != 6 || !digits.is_ascii() {
        return Err(invalid());
    }
    let channel = |range: std::ops::Range<usize>| {
        u8::from_str_radix(&digits[range], 16).map_err(|_| invalid())
    };
    Ok(RGBColor(channel(0..2)?, channel(2..4)?, channel(4..6)?))
}

/// Render `grid` to an SVG file at `path`.
///
/// # Errors
///
/// Returns `RenderError` if the options are invalid or drawing fails,
/// including failure to write the file.
pub fn render_svg(grid: &ChartGrid, path: &Path, options: &RenderOptions) -> Result<()> {
    options.validate()?;
    let root = SVGBackend::new(path, (options.width, options.height)).into_drawing_area();
    draw_grid(&root, grid, options)?;
    root.present()
        .map_err(|e| RenderError::Drawing(e.to_string()))?;
    tracing::info!(path = %path.display(), "wrote handedness figure");
    Ok(())
}

/// Render `grid` to an in-memory SVG document.
///
/// # Errors
///
/// Returns `RenderError` if the options are invalid or drawing fails.
pub fn render_svg_string(grid: &ChartGrid, options: &RenderOptions) -> Result<String> {
    options.validate()?;
    let mut buffer = String::new();
    {
        let root =
            SVGBackend::with_string(&mut buffer, (options.width, options.height)).into_drawing_area();
        draw_grid(&root, grid, options)?;
        root.present()
            .map_err(|e| RenderError::Drawing(e.to_string()))?;
    }
    Ok(buffer)
}

fn draw_grid<DB: DrawingBackend>(
    root: &DrawingArea<DB, Shift>,
    grid: &ChartGrid,
    options: &RenderOptions,
) -> Result<()> {
    root.fill(&WHITE)
        .map_err(|e| RenderError::DrawingArea(e.to_string()))?;
    let areas = root.split_evenly((grid.rows, grid.cols));
    for (area, panel) in areas.iter().zip(&grid.panels) {
        draw_panel(area, panel, options)?;
    }
    Ok(())
}

fn draw_panel<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    panel: &Panel,
    options: &RenderOptions,
) -> Result<()> {
    let (x_min, x_max) = x_extent(panel);
    let y_max = panel
        .series
        .max_value()
        .filter(|value| *value > 0.0)
        .map_or(1.0, |value| value * 1.1);

    let mut chart = ChartBuilder::on(area)
        .caption(panel.title, ("sans-serif", options.title_size))
        .margin(options.margin)
        .x_label_area_size(45)
        .y_label_area_size(55)
        .build_cartesian_2d(x_min..x_max, 0.0..y_max)
        .map_err(|e| RenderError::ChartConfig(e.to_string()))?;

    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc(panel.x_label)
        .x_label_formatter(&|x| format!("{x:.2}"))
        .y_label_formatter(&|y| format!("{y:.2}"))
        .label_style(("sans-serif", options.label_size))
        .axis_desc_style(("sans-serif", options.label_size))
        .draw()
        .map_err(|e| RenderError::Drawing(e.to_string()))?;

    match &panel.series {
        Series::Curve { points } => {
            chart
                .draw_series(LineSeries::new(
                    points.iter().copied().filter(|(_, y)| y.is_finite()),
                    options.color.stroke_width(options.stroke_width),
                ))
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        Series::Bars { points } => {
            let half = 0.5 * options.bar_width;
            chart
                .draw_series(points.iter().map(|&(count, mass)| {
                    let x = count_to_f64(count);
                    Rectangle::new([(x - half, 0.0), (x + half, mass)], options.color.filled())
                }))
                .map_err(|e| RenderError::Drawing(e.to_string()))?;
        }
        Series::Empty => {}
    }
    Ok(())
}

fn x_extent(panel: &Panel) -> (f64, f64) {
    if let Some(range) = panel.x_range {
        return range;
    }
    match &panel.series {
        Series::Bars { points } => {
            let first = points.first().map_or(0, |p| p.0);
            let last = points.last().map_or(0, |p| p.0);
            (count_to_f64(first) - 0.5, count_to_f64(last) + 0.5)
        }
        Series::Curve { .. } => (0.0, 1.0),
        Series::Empty if panel.kind.is_continuous() => (0.0, 1.0),
        Series::Empty => (-0.5, 0.5),
    }
}
