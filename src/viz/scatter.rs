//! Metric-vs-metric scatter plots.

use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::util::padded;
use super::{Chart, render};
use crate::config::RenderConfig;
use crate::models::WeeklyRecord;
use crate::style;
use crate::transform::{ChangeDriver, axis_range, metric_pairs, weight_change_pairs};

/// Optional guide line drawn under the markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Reference {
    #[default]
    None,
    /// `y = 0`, for "did the weight go up or down".
    HorizontalZero,
    /// `y = x`, for projected vs. actual values.
    Diagonal,
}

#[derive(Debug, Clone)]
pub struct ScatterChart {
    pub title: String,
    pub x_desc: String,
    pub y_desc: String,
    pub points: Vec<(f64, f64)>,
    pub reference: Reference,
}

impl ScatterChart {
    pub fn new(
        title: impl Into<String>,
        x_desc: impl Into<String>,
        y_desc: impl Into<String>,
        points: Vec<(f64, f64)>,
    ) -> Self {
        Self {
            title: title.into(),
            x_desc: x_desc.into(),
            y_desc: y_desc.into(),
            points,
            reference: Reference::None,
        }
    }

    pub fn with_reference(mut self, reference: Reference) -> Self {
        self.reference = reference;
        self
    }

    /// `driver` vs. the week-over-week change in average weight.
    pub fn weight_change(records: &[WeeklyRecord], driver: ChangeDriver) -> Self {
        Self::new(
            format!("{} vs weekly weight change", driver.axis_label()),
            driver.axis_label(),
            "Weight change (kg)",
            weight_change_pairs(records, driver),
        )
        .with_reference(Reference::HorizontalZero)
    }

    /// Projected weight vs. the weight actually measured that week.
    pub fn projection_accuracy(records: &[WeeklyRecord]) -> Self {
        Self::new(
            "Projected vs actual weight",
            "Projected weight kg",
            "Weight avg kg",
            metric_pairs(records, |r| r.projected_weight_kg, |r| r.weight_avg_kg),
        )
        .with_reference(Reference::Diagonal)
    }

    pub fn running_vs_lifting(records: &[WeeklyRecord]) -> Self {
        Self::new(
            "Running distance vs lifting volume",
            "km run",
            "Totals kg",
            metric_pairs(records, |r| r.km_run, |r| r.totals_kg),
        )
    }

    fn ranges(&self) -> Result<((f64, f64), (f64, f64))> {
        let x = axis_range(self.points.iter().map(|p| p.0))?;
        let mut y = axis_range(self.points.iter().map(|p| p.1))?;
        match self.reference {
            Reference::HorizontalZero => y = (y.0.min(0.0), y.1.max(0.0)),
            Reference::Diagonal => {
                let lo = x.0.min(y.0);
                let hi = x.1.max(y.1);
                return Ok(((lo, hi), (lo, hi)));
            }
            Reference::None => {}
        }
        Ok((x, y))
    }
}

impl Chart for ScatterChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        _cfg: &RenderConfig,
    ) -> Result<()> {
        if self.points.is_empty() {
            bail!("no points to plot for '{}'", self.title);
        }
        let ((x_lo, x_hi), (y_lo, y_hi)) = self.ranges()?;

        let mut chart = ChartBuilder::on(root)
            .margin(16)
            .caption(&self.title, ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Bottom, 50)
            .build_cartesian_2d(padded(x_lo, x_hi, 0.05), padded(y_lo, y_hi, 0.1))
            .map_err(|e| anyhow!("{:?}", e))?;

        chart
            .configure_mesh()
            .x_desc(&self.x_desc)
            .y_desc(&self.y_desc)
            .label_style(("sans-serif", 12))
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        let guide = style::GRAY.rgb();
        let x_span = padded(x_lo, x_hi, 0.05);
        match self.reference {
            Reference::HorizontalZero => {
                chart
                    .draw_series(DashedLineSeries::new(
                        [(x_span.start, 0.0), (x_span.end, 0.0)],
                        6,
                        4,
                        guide.stroke_width(1),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            Reference::Diagonal => {
                chart
                    .draw_series(DashedLineSeries::new(
                        [(x_span.start, x_span.start), (x_span.end, x_span.end)],
                        6,
                        4,
                        guide.stroke_width(1),
                    ))
                    .map_err(|e| anyhow!("{:?}", e))?;
            }
            Reference::None => {}
        }

        let marker = style::BLUE.alpha(0.7);
        chart
            .draw_series(self.points.iter().map(|&p| Circle::new(p, 4, marker.filled())))
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}

/// Scatter chart, written to `out_path` (`.svg` or PNG). Fails when the chart
/// has no points.
pub fn plot_scatter<P: AsRef<Path>>(
    chart: &ScatterChart,
    out_path: P,
    cfg: &RenderConfig,
) -> Result<()> {
    if chart.points.is_empty() {
        bail!("no points to plot for '{}'", chart.title);
    }
    render(chart, out_path, cfg)
}
