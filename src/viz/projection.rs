//! Projected vs. actual weight: both series over time on the left, the
//! projection-accuracy scatter on the right.

use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use std::path::Path;

use super::scatter::ScatterChart;
use super::util::{
    category_label, category_range, category_tick_count, contiguous_runs, padded,
};
use super::{Chart, render};
use crate::config::RenderConfig;
use crate::models::WeeklyRecord;
use crate::style;
use crate::transform::{axis_range, sorted_by_week};

#[derive(Debug, Clone)]
pub struct ProjectionChart {
    pub weeks: Vec<String>,
    /// Aligned with `weeks`; gaps break the lines.
    pub actual: Vec<Option<f64>>,
    pub projected: Vec<Option<f64>>,
    pub accuracy: ScatterChart,
}

impl ProjectionChart {
    /// Weeks with neither an actual nor a projected weight are left out. At
    /// least one week must carry both.
    pub fn from_records(records: &[WeeklyRecord]) -> Result<Self> {
        let accuracy = ScatterChart::projection_accuracy(records);
        if accuracy.points.is_empty() {
            bail!("no weeks with both projected and actual weight to plot");
        }
        let mut chart = Self {
            weeks: Vec::new(),
            actual: Vec::new(),
            projected: Vec::new(),
            accuracy,
        };
        for (yw, r) in sorted_by_week(records) {
            if r.weight_avg_kg.is_none() && r.projected_weight_kg.is_none() {
                continue;
            }
            chart.weeks.push(yw.to_string());
            chart.actual.push(r.weight_avg_kg);
            chart.projected.push(r.projected_weight_kg);
        }
        Ok(chart)
    }

    fn draw_series_panel<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
    ) -> Result<()> {
        let n = self.weeks.len();
        let (lo, hi) = axis_range(self.actual.iter().chain(&self.projected).flatten().copied())?;

        let mut chart = ChartBuilder::on(area)
            .margin(16)
            .caption("Projected vs Actual Weight", ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 44)
            .build_cartesian_2d(category_range(n), padded(lo, hi, 0.1))
            .map_err(|e| anyhow!("{:?}", e))?;

        let x_label_fmt = |v: &f64| category_label(&self.weeks, *v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(category_tick_count(n).min(12))
            .x_label_formatter(&x_label_fmt)
            .y_desc("Weight kg")
            .label_style(("sans-serif", 12))
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        let actual_rgb = style::BLUE.rgb();
        for (run_idx, run) in contiguous_runs(&self.actual).into_iter().enumerate() {
            let anno = chart
                .draw_series(LineSeries::new(run, actual_rgb.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?;
            if run_idx == 0 {
                anno.label("Actual").legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 14, y)], actual_rgb.stroke_width(2))
                });
            }
        }

        let projected_rgb = style::ORANGE.rgb();
        for (run_idx, run) in contiguous_runs(&self.projected).into_iter().enumerate() {
            let anno = chart
                .draw_series(DashedLineSeries::new(run, 6, 4, projected_rgb.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?;
            if run_idx == 0 {
                anno.label("Projected").legend(move |(x, y)| {
                    PathElement::new(
                        vec![(x, y), (x + 5, y), (x + 9, y), (x + 14, y)],
                        projected_rgb.stroke_width(2),
                    )
                });
            }
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.85))
            .position(SeriesLabelPosition::UpperRight)
            .label_font(("sans-serif", 12))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}

impl Chart for ProjectionChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        cfg: &RenderConfig,
    ) -> Result<()> {
        let areas = root.split_evenly((1, 2));
        self.draw_series_panel(&areas[0])?;
        self.accuracy.draw(&areas[1], cfg)
    }
}

/// Projection accuracy chart, written to `out_path` (`.svg` or PNG).
pub fn plot_projection_accuracy<P: AsRef<Path>>(
    records: &[WeeklyRecord],
    out_path: P,
    cfg: &RenderConfig,
) -> Result<()> {
    let chart = ProjectionChart::from_records(records)?;
    render(&chart, out_path, cfg)
}
