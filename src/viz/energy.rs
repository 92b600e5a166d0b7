//! Daily energy breakdown (resting / active / surplus) stacked per week, with
//! weight and its 4-week moving average on a secondary axis.

use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::VPos;
use std::path::Path;

use super::util::{
    BAR_HALF_WIDTH, BAR_LABEL_PAD, annotation_style, category_label, category_range,
    category_tick_count, padded,
};
use super::{Chart, render};
use crate::config::RenderConfig;
use crate::format;
use crate::labels::{ChartSpace, Region, place_labels};
use crate::models::{EnergyRow, WeeklyRecord};
use crate::style::{self, Rgb8};
use crate::transform::{axis_range, clip_negative, clip_positive, prepare_energy};

/// Segments smaller than this share of the intake stay unlabelled.
const MIN_SEGMENT_SHARE: f64 = 0.06;

#[derive(Debug, Clone)]
pub struct EnergyChart {
    pub title: String,
    pub rows: Vec<EnergyRow>,
}

/// One stacked segment: `[bottom, top]` in thousand kcal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub bottom: f64,
    pub top: f64,
}

impl Segment {
    pub fn height(&self) -> f64 {
        self.top - self.bottom
    }
}

/// Resting, active and surplus segments of one week. A deficit hangs below zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyStack {
    pub resting: Segment,
    pub active: Segment,
    pub surplus: Segment,
    pub deficit: Segment,
}

impl EnergyStack {
    pub fn of(row: &EnergyRow) -> Self {
        let rest_top = row.resting_k;
        let active_top = rest_top + row.active_k;
        Self {
            resting: Segment { bottom: 0.0, top: rest_top },
            active: Segment { bottom: rest_top, top: active_top },
            surplus: Segment {
                bottom: active_top,
                top: active_top + clip_positive(row.surplus_k),
            },
            deficit: Segment {
                bottom: clip_negative(row.surplus_k),
                top: 0.0,
            },
        }
    }

    /// Top of the positive stack, where the total label sits.
    pub fn total(&self) -> f64 {
        self.surplus.top
    }
}

impl EnergyChart {
    pub fn from_records(records: &[WeeklyRecord]) -> Result<Self> {
        let rows = prepare_energy(records);
        if rows.is_empty() {
            bail!("no weeks with intake, resting, active energy and weight to plot");
        }
        Ok(Self {
            title: "Daily Energy Breakdown (Resting / Active / Surplus) vs Weight".into(),
            rows,
        })
    }

    fn stacks(&self) -> Vec<EnergyStack> {
        self.rows.iter().map(EnergyStack::of).collect()
    }
}

impl Chart for EnergyChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        cfg: &RenderConfig,
    ) -> Result<()> {
        let n = self.rows.len();
        let stacks = self.stacks();
        let labels: Vec<String> = self.rows.iter().map(|r| r.week.to_string()).collect();

        let max_stack = stacks
            .iter()
            .map(EnergyStack::total)
            .chain(self.rows.iter().map(|r| r.intake_rolling4))
            .fold(0.0, f64::max);
        let min_stack = stacks.iter().map(|s| s.deficit.bottom).fold(0.0, f64::min);
        let y_top = if max_stack > 0.0 { max_stack * 1.15 } else { 1.0 };
        let (w_lo, w_hi) = axis_range(
            self.rows
                .iter()
                .flat_map(|r| [r.weight_kg, r.weight_rolling4]),
        )?;

        let mut chart = ChartBuilder::on(root)
            .margin(16)
            .caption(&self.title, ("sans-serif", 22))
            .set_label_area_size(LabelAreaPosition::Left, 70)
            .set_label_area_size(LabelAreaPosition::Right, 60)
            .set_label_area_size(LabelAreaPosition::Bottom, 44)
            .build_cartesian_2d(category_range(n), (min_stack * 1.2)..y_top)
            .map_err(|e| anyhow!("{:?}", e))?
            .set_secondary_coord(category_range(n), padded(w_lo, w_hi, 0.1));

        let x_label_fmt = |v: &f64| category_label(&labels, *v);
        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_labels(category_tick_count(n))
            .x_label_formatter(&x_label_fmt)
            .y_desc("Daily energy (thousand kcal)")
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

        // Resting and active share a hue; active is lighter.
        let layers: [(&str, fn(&EnergyStack) -> Segment, Rgb8, f64); 4] = [
            ("Resting energy", |s| s.resting, style::LIGHT_BLUE, 0.9),
            ("Active energy", |s| s.active, style::LIGHT_BLUE, 0.55),
            ("Surplus / deficit", |s| s.surplus, style::NEUTRAL, 0.8),
            ("", |s| s.deficit, style::NEUTRAL, 0.8),
        ];
        for (name, segment_of, color, alpha) in layers {
            let fill = color.alpha(alpha);
            let anno = chart
                .draw_series(stacks.iter().enumerate().map(|(i, s)| {
                    let seg = segment_of(s);
                    let x = i as f64;
                    Rectangle::new(
                        [(x - BAR_HALF_WIDTH, seg.bottom), (x + BAR_HALF_WIDTH, seg.top)],
                        fill.filled(),
                    )
                }))
                .map_err(|e| anyhow!("{:?}", e))?;
            if !name.is_empty() {
                anno.label(name).legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 14, y + 5)], fill.filled())
                });
            }
        }

        // Segment values, only where the segment is a visible share of intake.
        let seg_size = cfg.annotation_font_size.saturating_sub(2).max(6);
        let seg_style = annotation_style(seg_size, style::WHITE, VPos::Center);
        let mut seg_labels: Vec<(f64, f64, String)> = Vec::new();
        for (i, (s, row)) in stacks.iter().zip(&self.rows).enumerate() {
            for seg in [s.resting, s.active, s.surplus] {
                let h = seg.height();
                if row.intake_k > 0.0 && h.abs() / row.intake_k >= MIN_SEGMENT_SHARE {
                    seg_labels.push((i as f64, seg.bottom + h / 2.0, format::fixed(h, 1)));
                }
            }
        }
        chart
            .draw_series(seg_labels.into_iter().map(|(x, y, text)| {
                EmptyElement::at((x, y)) + Text::new(text, (0, 0), seg_style.clone())
            }))
            .map_err(|e| anyhow!("{:?}", e))?;

        let total_style = annotation_style(cfg.annotation_font_size, style::GRAY, VPos::Bottom);
        chart
            .draw_series(stacks.iter().enumerate().map(|(i, s)| {
                EmptyElement::at((i as f64, s.total()))
                    + Text::new(
                        format::fixed(s.total(), 2),
                        (0, -BAR_LABEL_PAD),
                        total_style.clone(),
                    )
            }))
            .map_err(|e| anyhow!("{:?}", e))?;

        let intake_rgb = style::BLUE.rgb();
        chart
            .draw_series(LineSeries::new(
                self.rows.iter().enumerate().map(|(i, r)| (i as f64, r.intake_rolling4)),
                intake_rgb.stroke_width(1),
            ))
            .map_err(|e| anyhow!("{:?}", e))?
            .label("kcals 4-wk MA")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 14, y)], intake_rgb.stroke_width(1))
            });

        let line_color = style::ORANGE;
        let line_rgb = line_color.rgb();
        let weights: Vec<(f64, f64)> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, r)| (i as f64, r.weight_kg))
            .collect();
        chart
            .draw_secondary_series(LineSeries::new(weights.clone(), line_rgb.stroke_width(2)))
            .map_err(|e| anyhow!("{:?}", e))?
            .label("Weight avg kg")
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 14, y)], line_rgb.stroke_width(2))
            });
        chart
            .draw_secondary_series(weights.iter().map(|&p| Circle::new(p, 3, line_rgb.filled())))
            .map_err(|e| anyhow!("{:?}", e))?;
        chart
            .draw_secondary_series(DashedLineSeries::new(
                self.rows.iter().enumerate().map(|(i, r)| (i as f64, r.weight_rolling4)),
                6,
                4,
                line_rgb.stroke_width(1),
            ))
            .map_err(|e| anyhow!("{:?}", e))?
            .label("Weight 4-wk MA")
            .legend(move |(x, y)| {
                PathElement::new(
                    vec![(x, y), (x + 5, y), (x + 9, y), (x + 14, y)],
                    line_rgb.stroke_width(1),
                )
            });

        // Weight labels compete with the total labels on top of each stack.
        let values: Vec<f64> = self.rows.iter().map(|r| r.weight_kg).collect();
        let regions: Vec<Region> = stacks
            .iter()
            .enumerate()
            .map(|(i, s)| Region::new(i as f64, s.total()))
            .collect();
        let label_cfg = cfg.labels.clone().with_decimals(1).with_color(line_color);
        {
            let bars = ChartSpace::new(&*chart);
            let line = ChartSpace::new(chart.borrow_secondary());
            let (mut line_px, mut bar_px, mut line_sink) = (line, bars, line);
            place_labels(
                &weights,
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

/// Energy breakdown chart, written to `out_path` (`.svg` or PNG).
pub fn plot_energy_breakdown<P: AsRef<Path>>(
    records: &[WeeklyRecord],
    out_path: P,
    cfg: &RenderConfig,
) -> Result<()> {
    let chart = EnergyChart::from_records(records)?;
    render(&chart, out_path, cfg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::YearWeek;

    fn row(resting_k: f64, active_k: f64, surplus_k: f64) -> EnergyRow {
        EnergyRow {
            week: YearWeek { year: 2025, week: 1 },
            intake_k: resting_k + active_k + surplus_k,
            resting_k,
            active_k,
            surplus_k,
            weight_kg: 80.0,
            intake_rolling4: 0.0,
            weight_rolling4: 80.0,
        }
    }

    #[test]
    fn surplus_stacks_on_top() {
        let s = EnergyStack::of(&row(1.7, 0.5, 0.3));
        assert_eq!(s.resting, Segment { bottom: 0.0, top: 1.7 });
        assert!((s.active.top - 2.2).abs() < 1e-12);
        assert!((s.total() - 2.5).abs() < 1e-12);
        assert_eq!(s.deficit.height(), 0.0);
    }

    #[test]
    fn deficit_hangs_below_zero() {
        let s = EnergyStack::of(&row(1.7, 0.6, -0.4));
        assert_eq!(s.surplus.height(), 0.0);
        assert!((s.total() - 2.3).abs() < 1e-12);
        assert_eq!(s.deficit, Segment { bottom: -0.4, top: 0.0 });
    }

    #[test]
    fn records_missing_required_columns_are_rejected() {
        let rec = WeeklyRecord {
            yearweek: 20251,
            kcals_daily_avg: Some(2300.0),
            weight_avg_kg: Some(80.0),
            ..Default::default()
        };
        assert!(EnergyChart::from_records(&[rec]).is_err());
    }
}
