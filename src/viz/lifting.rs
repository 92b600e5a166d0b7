//! Muscle-group training volume: absolute stacked tons on top, the same
//! stacks normalized to 100 % below.

use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::VPos;
use std::path::Path;

use super::util::{
    BAR_HALF_WIDTH, BAR_LABEL_PAD, annotation_style, category_label, category_range,
    category_tick_count,
};
use super::{Chart, render};
use crate::config::RenderConfig;
use crate::format;
use crate::models::{MuscleGroup, VolumeRow, WeeklyRecord};
use crate::style;
use crate::transform::{quarterly_volume, shares, weekly_volume};

/// Segments below this share of their period's total stay unlabelled.
const MIN_SEGMENT_SHARE: f64 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Weekly,
    Quarterly,
}

impl Frequency {
    fn suffix(self) -> &'static str {
        match self {
            Frequency::Weekly => "(Weekly)",
            Frequency::Quarterly => "(Quarterly)",
        }
    }
}

#[derive(Debug, Clone)]
pub struct MuscleVolumeChart {
    pub frequency: Frequency,
    pub rows: Vec<VolumeRow>,
}

impl MuscleVolumeChart {
    pub fn from_records(records: &[WeeklyRecord], frequency: Frequency) -> Result<Self> {
        let rows = match frequency {
            Frequency::Weekly => weekly_volume(records),
            Frequency::Quarterly => quarterly_volume(records),
        };
        if rows.is_empty() {
            bail!("no lifting volume to plot");
        }
        Ok(Self { frequency, rows })
    }

    /// Per-row shares of each group, indexed like `MuscleGroup::ALL`.
    pub fn normalized(&self) -> Vec<Vec<f64>> {
        self.rows.iter().map(|r| shares(&r.tons, r.total)).collect()
    }

    fn draw_absolute<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        labels: &[String],
        cfg: &RenderConfig,
    ) -> Result<()> {
        let n = self.rows.len();
        let max_total = self.rows.iter().map(|r| r.total).fold(0.0, f64::max);
        let y_top = if max_total > 0.0 { max_total * 1.1 } else { 1.0 };

        let mut chart = ChartBuilder::on(area)
            .margin(12)
            .caption(
                format!("Absolute Muscle Group Volume {}", self.frequency.suffix()),
                ("sans-serif", 20),
            )
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 36)
            .build_cartesian_2d(category_range(n), 0.0..y_top)
            .map_err(|e| anyhow!("{:?}", e))?;

        let x_label_fmt = |v: &f64| category_label(labels, *v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(category_tick_count(n))
            .x_label_formatter(&x_label_fmt)
            .y_desc("Weight lifted (tons)")
            .label_style(("sans-serif", 12))
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        let seg_size = cfg.annotation_font_size.saturating_sub(2).max(6);
        let seg_style = annotation_style(seg_size, style::WHITE, VPos::Center);
        let mut bottoms = vec![0.0; n];
        for group in MuscleGroup::ALL {
            let rgb = group.color().rgb();
            let fill = group.color().alpha(0.85);
            let segments: Vec<(f64, f64, f64)> = self
                .rows
                .iter()
                .zip(&bottoms)
                .enumerate()
                .map(|(i, (r, &b))| (i as f64, b, r.tons_of(group)))
                .collect();
            chart
                .draw_series(segments.iter().map(|&(x, b, v)| {
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, b), (x + BAR_HALF_WIDTH, b + v)],
                        fill.filled(),
                    )
                }))
                .map_err(|e| anyhow!("{:?}", e))?
                .label(group.label())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 14, y + 5)], rgb.filled())
                });

            chart
                .draw_series(
                    segments
                        .iter()
                        .zip(&self.rows)
                        .filter(|((_, _, v), r)| {
                            *v > 0.0 && r.total > 0.0 && v / r.total >= MIN_SEGMENT_SHARE
                        })
                        .map(|(&(x, b, v), _)| {
                            EmptyElement::at((x, b + v / 2.0))
                                + Text::new(format::fixed(v, 1), (0, 0), seg_style.clone())
                        }),
                )
                .map_err(|e| anyhow!("{:?}", e))?;

            for (b, (_, _, v)) in bottoms.iter_mut().zip(&segments) {
                *b += v;
            }
        }

        let gray = style::GRAY.rgb();
        let totals: Vec<(f64, f64)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.total))
            .collect();
        chart
            .draw_series(LineSeries::new(totals.clone(), gray.stroke_width(1)))
            .map_err(|e| anyhow!("{:?}", e))?
            .label("Total tons")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 14, y)], gray.stroke_width(1))
            });
        chart
            .draw_series(totals.iter().map(|&p| Circle::new(p, 3, gray.filled())))
            .map_err(|e| anyhow!("{:?}", e))?;

        let total_style = annotation_style(cfg.annotation_font_size, style::GRAY, VPos::Bottom);
        chart
            .draw_series(totals.iter().filter(|(_, t)| *t > 0.0).map(|&(x, t)| {
                EmptyElement::at((x, t))
                    + Text::new(
                        format::fixed(t, 1),
                        (0, -BAR_LABEL_PAD - 3),
                        total_style.clone(),
                    )
            }))
            .map_err(|e| anyhow!("{:?}", e))?;

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

    fn draw_normalized<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        labels: &[String],
        cfg: &RenderConfig,
    ) -> Result<()> {
        let n = self.rows.len();
        let normalized = self.normalized();

        let mut chart = ChartBuilder::on(area)
            .margin(12)
            .caption(
                format!("Normalized Muscle Group Volume {}", self.frequency.suffix()),
                ("sans-serif", 20),
            )
            .set_label_area_size(LabelAreaPosition::Left, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 36)
            .build_cartesian_2d(category_range(n), 0.0..1.05)
            .map_err(|e| anyhow!("{:?}", e))?;

        let x_label_fmt = |v: &f64| category_label(labels, *v);
        let y_label_fmt = |v: &f64| format::percent(*v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(category_tick_count(n))
            .x_label_formatter(&x_label_fmt)
            .y_label_formatter(&y_label_fmt)
            .y_desc("Relative contribution (%)")
            .label_style(("sans-serif", 12))
            .axis_desc_style(("sans-serif", 14))
            .draw()
            .map_err(|e| anyhow!("{:?}", e))?;

        let seg_size = cfg.annotation_font_size.saturating_sub(2).max(6);
        let seg_style = annotation_style(seg_size, style::WHITE, VPos::Center);
        let mut bottoms = vec![0.0; n];
        for group in MuscleGroup::ALL {
            let fill = group.color().alpha(0.85);
            let segments: Vec<(f64, f64, f64)> = normalized
                .iter()
                .zip(&bottoms)
                .enumerate()
                .map(|(i, (s, &b))| (i as f64, b, s[group as usize]))
                .collect();
            chart
                .draw_series(segments.iter().map(|&(x, b, v)| {
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, b), (x + BAR_HALF_WIDTH, b + v)],
                        fill.filled(),
                    )
                }))
                .map_err(|e| anyhow!("{:?}", e))?;
            chart
                .draw_series(
                    segments
                        .iter()
                        .filter(|(_, _, v)| *v >= MIN_SEGMENT_SHARE)
                        .map(|&(x, b, v)| {
                            EmptyElement::at((x, b + v / 2.0))
                                + Text::new(format::percent(v), (0, 0), seg_style.clone())
                        }),
                )
                .map_err(|e| anyhow!("{:?}", e))?;
            for (b, (_, _, v)) in bottoms.iter_mut().zip(&segments) {
                *b += v;
            }
        }
        Ok(())
    }
}

impl Chart for MuscleVolumeChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        cfg: &RenderConfig,
    ) -> Result<()> {
        let labels: Vec<String> = self.rows.iter().map(|r| r.period.clone()).collect();
        let areas = root.split_evenly((2, 1));
        self.draw_absolute(&areas[0], &labels, cfg)?;
        self.draw_normalized(&areas[1], &labels, cfg)?;
        Ok(())
    }
}

/// Absolute and normalized muscle-group volume, written to `out_path`
/// (`.svg` or PNG). The figure is twice the configured height.
pub fn plot_muscle_volume<P: AsRef<Path>>(
    records: &[WeeklyRecord],
    frequency: Frequency,
    out_path: P,
    cfg: &RenderConfig,
) -> Result<()> {
    let chart = MuscleVolumeChart::from_records(records, frequency)?;
    let tall = cfg.clone().with_size(cfg.width, cfg.height.saturating_mul(2));
    render(&chart, out_path, &tall)
}
