//! Weekly kcal bars with the weight line on a secondary axis.

use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::VPos;
use std::path::Path;

use super::util::{
    BAR_HALF_WIDTH, BAR_LABEL_PAD, annotation_style, category_label, category_range,
    category_tick_count, contiguous_runs, padded,
};
use super::{Chart, render};
use crate::config::RenderConfig;
use crate::format;
use crate::labels::{ChartSpace, Region, place_labels};
use crate::models::WeeklyRecord;
use crate::style;
use crate::transform::{axis_range, sorted_by_week};

#[derive(Debug, Clone)]
pub struct WeightKcalChart {
    pub title: String,
    pub weeks: Vec<String>,
    pub kcals: Vec<f64>,
    /// Aligned with `weeks`; missing weigh-ins break the line.
    pub weights: Vec<Option<f64>>,
}

impl WeightKcalChart {
    /// Weeks without a kcal average are left out.
    pub fn from_records(records: &[WeeklyRecord]) -> Result<Self> {
        let mut chart = Self {
            title: "Weight avg kg and kcals daily avg".into(),
            weeks: Vec::new(),
            kcals: Vec::new(),
            weights: Vec::new(),
        };
        for (yw, r) in sorted_by_week(records) {
            let Some(k) = r.kcals_daily_avg else {
                continue;
            };
            chart.weeks.push(yw.to_string());
            chart.kcals.push(k);
            chart.weights.push(r.weight_avg_kg);
        }
        if chart.weeks.is_empty() {
            bail!("no weeks with kcal data to plot");
        }
        Ok(chart)
    }

    /// Anchors, values and competing bar tops for every week with a weigh-in.
    pub fn line_label_inputs(&self) -> (Vec<(f64, f64)>, Vec<f64>, Vec<Region>) {
        let mut anchors = Vec::new();
        let mut values = Vec::new();
        let mut regions = Vec::new();
        for (i, (w, k)) in self.weights.iter().zip(&self.kcals).enumerate() {
            let Some(w) = *w else {
                continue;
            };
            let x = i as f64;
            anchors.push((x, w));
            values.push(w);
            regions.push(Region::from_bar(x - BAR_HALF_WIDTH, 2.0 * BAR_HALF_WIDTH, *k));
        }
        (anchors, values, regions)
    }
}

impl Chart for WeightKcalChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        cfg: &RenderConfig,
    ) -> Result<()> {
        let n = self.weeks.len();
        let bar_color = style::GREEN;
        let line_color = style::ORANGE;
        let (bar_rgb, line_rgb) = (bar_color.rgb(), line_color.rgb());

        let kcal_max = self.kcals.iter().copied().fold(0.0, f64::max);
        let kcal_top = if kcal_max > 0.0 { kcal_max * 1.15 } else { 1.0 };
        let (w_lo, w_hi) = axis_range(self.weights.iter().flatten().copied()).unwrap_or((0.0, 1.0));

        let mut chart = ChartBuilder::on(root)
            .margin(16)
            .caption(&self.title, ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Right, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 44)
            .build_cartesian_2d(category_range(n), 0.0..kcal_top)
            .map_err(|e| anyhow!("{:?}", e))?
            .set_secondary_coord(category_range(n), padded(w_lo, w_hi, 0.1));

        let x_label_fmt = |v: &f64| category_label(&self.weeks, *v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(category_tick_count(n))
            .x_label_formatter(&x_label_fmt)
            .y_desc("Daily avg kcals")
            .label_style(("sans-serif", 12))
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .configure_secondary_axes()
            .y_desc("Weight avg kg")
            .label_style(("sans-serif", 12))
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        chart
            .draw_series(self.kcals.iter().enumerate().map(|(i, &k)| {
                let x = i as f64;
                Rectangle::new(
                    [(x - BAR_HALF_WIDTH, 0.0), (x + BAR_HALF_WIDTH, k)],
                    bar_rgb.filled(),
                )
            }))
            .map_err(|e| anyhow!("{:?}", e))?
            .label("kcals daily avg")
            .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 14, y + 5)], bar_rgb.filled()));

        let bar_label_style = annotation_style(cfg.annotation_font_size, bar_color, VPos::Bottom);
        chart
            .draw_series(self.kcals.iter().enumerate().map(|(i, &k)| {
                EmptyElement::at((i as f64, k))
                    + Text::new(format::grouped(k, 2), (0, -BAR_LABEL_PAD), bar_label_style.clone())
            }))
            .map_err(|e| anyhow!("{:?}", e))?;

        for (run_idx, run) in contiguous_runs(&self.weights).into_iter().enumerate() {
            let anno = chart
                .draw_secondary_series(LineSeries::new(run, line_rgb.stroke_width(2)))
                .map_err(|e| anyhow!("{:?}", e))?;
            if run_idx == 0 {
                anno.label("Weight avg kg").legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 14, y)], line_rgb.stroke_width(2))
                });
            }
        }

        let (anchors, values, regions) = self.line_label_inputs();
        chart
            .draw_secondary_series(anchors.iter().map(|&p| Circle::new(p, 3, line_rgb.filled())))
            .map_err(|e| anyhow!("{:?}", e))?;

        let label_cfg = cfg.labels.clone().with_decimals(1).with_color(line_color);
        {
            let bars = ChartSpace::new(&*chart);
            let line = ChartSpace::new(chart.borrow_secondary());
            let (mut line_px, mut bar_px, mut line_sink) = (line, bars, line);
            place_labels(
                &anchors,
                &values,
                &regions,
                &mut line_px,
                &mut bar_px,
                &mut line_sink,
                &label_cfg,
            )?;
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.85))
            .position(SeriesLabelPosition::UpperLeft)
            .label_font(("sans-serif", 12))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;
        Ok(())
    }
}

/// Weekly kcal bars vs. weight, written to `out_path` (`.svg` or PNG).
pub fn plot_weight_vs_kcals<P: AsRef<Path>>(
    records: &[WeeklyRecord],
    out_path: P,
    cfg: &RenderConfig,
) -> Result<()> {
    let chart = WeightKcalChart::from_records(records)?;
    render(&chart, out_path, cfg)
}
