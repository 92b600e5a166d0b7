//! Collision-aware placement of value labels next to line points.
//!
//! Every line point competes with the label of the bar drawn at the same x
//! position. The value label goes above the point when that keeps it at least
//! `min_pixel_distance` away from the bar top, below the point as a fallback,
//! and is dropped when both collide. Only the vertical pixel distance is
//! compared: point and bar share their x.

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::error::{LabelError, LabelResult};
use crate::format;
use crate::style::Rgb8;

/// Direction in which pixel y grows on a rendering surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PixelYAxis {
    /// Raster convention: y = 0 is the top edge (plotters, SVG, bitmaps).
    Down,
    /// Display convention with y = 0 at the bottom edge.
    Up,
}

impl PixelYAxis {
    /// Sign of a pixel offset that moves something visually upward.
    fn up_sign(self) -> f64 {
        match self {
            PixelYAxis::Down => -1.0,
            PixelYAxis::Up => 1.0,
        }
    }
}

/// Outcome for a single anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Placement {
    Above,
    Below,
    Suppressed,
}

/// The top edge of a competing bar, in the bar axis' data coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Region {
    pub center_x: f64,
    pub top_y: f64,
}

impl Region {
    pub fn new(center_x: f64, top_y: f64) -> Self {
        Self { center_x, top_y }
    }

    /// Bar given by its left edge, width and height (drawn from zero).
    pub fn from_bar(left: f64, width: f64, height: f64) -> Self {
        Self::new(left + width / 2.0, height)
    }
}

/// How a value turns into label text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelFormat {
    pub decimals: usize,
    /// Insert thousands separators (`2,450.00`).
    pub grouped: bool,
}

impl Default for LabelFormat {
    fn default() -> Self {
        Self {
            decimals: 2,
            grouped: false,
        }
    }
}

impl LabelFormat {
    pub fn render(&self, value: f64) -> String {
        if self.grouped {
            format::grouped(value, self.decimals)
        } else {
            format::fixed(value, self.decimals)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    pub format: LabelFormat,
    /// Labels closer than this (vertically, in pixels) to the bar top collide.
    pub min_pixel_distance: f64,
    /// Vertical shift applied to a label placed above or below its point.
    pub pixel_offset: f64,
    pub font_size: u32,
    pub color: Rgb8,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            format: LabelFormat::default(),
            min_pixel_distance: 12.0,
            pixel_offset: 10.0,
            font_size: 12,
            color: Rgb8::new(255, 0, 0),
        }
    }
}

impl LabelConfig {
    pub fn with_decimals(mut self, decimals: usize) -> Self {
        self.format.decimals = decimals;
        self
    }

    pub fn with_color(mut self, color: Rgb8) -> Self {
        self.color = color;
        self
    }

    pub fn with_min_pixel_distance(mut self, px: f64) -> Self {
        self.min_pixel_distance = px;
        self
    }

    pub fn with_pixel_offset(mut self, px: f64) -> Self {
        self.pixel_offset = px;
        self
    }
}

/// Maps data coordinates of one axis system onto the rendered surface.
pub trait PixelSpace {
    /// Fix the pixel layout. Must run before `to_pixel` is trusted.
    fn finalize_layout(&mut self) {}

    fn to_pixel(&self, point: (f64, f64)) -> (f64, f64);

    fn y_axis(&self) -> PixelYAxis {
        PixelYAxis::Down
    }
}

/// A label the engine decided to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedLabel {
    /// Position of the anchor in the input sequences.
    pub index: usize,
    pub text: String,
    /// Anchor in the anchor axis' data coordinates.
    pub anchor: (f64, f64),
    /// `Above` or `Below`; suppressed labels never reach a sink.
    pub placement: Placement,
    /// Signed vertical shift in the surface's own pixel convention.
    pub pixel_dy: f64,
    pub font_size: u32,
    pub color: Rgb8,
}

/// Receives the labels that survived collision checks.
///
/// Above labels are anchored at their bottom edge, below labels at their top
/// edge, both centered horizontally on the anchor.
pub trait LabelSink {
    fn draw_label(&mut self, label: &PlacedLabel) -> LabelResult<()>;
}

impl LabelSink for Vec<PlacedLabel> {
    fn draw_label(&mut self, label: &PlacedLabel) -> LabelResult<()> {
        self.push(label.clone());
        Ok(())
    }
}

/// Decide where a label goes given the pixel y of its anchor and of the
/// competing bar top. Above wins whenever it clears `min_pixel_distance`.
pub fn decide(
    anchor_px_y: f64,
    region_px_y: f64,
    axis: PixelYAxis,
    config: &LabelConfig,
) -> Placement {
    let up = axis.up_sign() * config.pixel_offset;
    if (anchor_px_y + up - region_px_y).abs() >= config.min_pixel_distance {
        Placement::Above
    } else if (anchor_px_y - up - region_px_y).abs() >= config.min_pixel_distance {
        Placement::Below
    } else {
        Placement::Suppressed
    }
}

/// Place one value label per anchor, avoiding the labels sitting on the
/// matching bar tops, and hand the survivors to `sink`.
///
/// `anchors`, `values` and `regions` are index-aligned. Returns one decision
/// per anchor.
pub fn place_labels<A, R, S>(
    anchors: &[(f64, f64)],
    values: &[f64],
    regions: &[Region],
    anchor_space: &mut A,
    region_space: &mut R,
    sink: &mut S,
    config: &LabelConfig,
) -> LabelResult<Vec<Placement>>
where
    A: PixelSpace + ?Sized,
    R: PixelSpace + ?Sized,
    S: LabelSink + ?Sized,
{
    if anchors.len() != values.len() || anchors.len() != regions.len() {
        return Err(LabelError::InvalidInput(format!(
            "sequence lengths differ: {} anchors, {} values, {} regions",
            anchors.len(),
            values.len(),
            regions.len()
        )));
    }
    let axis = anchor_space.y_axis();
    if region_space.y_axis() != axis {
        return Err(LabelError::InvalidInput(format!(
            "anchor space grows {:?} but region space grows {:?}",
            axis,
            region_space.y_axis()
        )));
    }

    anchor_space.finalize_layout();
    region_space.finalize_layout();

    let up = axis.up_sign() * config.pixel_offset;
    let mut decisions = Vec::with_capacity(anchors.len());

    let inputs = anchors.iter().zip(values).zip(regions).enumerate();
    for (index, ((&anchor, &value), region)) in inputs {
        let (_, anchor_y) = anchor_space.to_pixel(anchor);
        let (_, region_y) = region_space.to_pixel((region.center_x, region.top_y));
        let placement = decide(anchor_y, region_y, axis, config);
        debug!(
            "label {index}: anchor_y={anchor_y:.1}px bar_top_y={region_y:.1}px -> {placement:?}"
        );

        let pixel_dy = match placement {
            Placement::Above => up,
            Placement::Below => -up,
            Placement::Suppressed => {
                warn!("label {index} ({value}) collides above and below; skipped");
                decisions.push(placement);
                continue;
            }
        };

        sink.draw_label(&PlacedLabel {
            index,
            text: config.format.render(value),
            anchor,
            placement,
            pixel_dy,
            font_size: config.font_size,
            color: config.color,
        })?;
        decisions.push(placement);
    }

    Ok(decisions)
}
