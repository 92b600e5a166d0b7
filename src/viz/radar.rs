//! Muscle-group balance per quarter: each quarter's share of lifting volume
//! per group, drawn as one closed outline on a polar grid.

use anyhow::{Result, anyhow, bail};
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::VPos;
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::Path;

use super::util::annotation_style;
use super::{Chart, render};
use crate::config::RenderConfig;
use crate::format;
use crate::models::{MuscleGroup, WeeklyRecord};
use crate::style;
use crate::transform::{quarterly_volume, shares};

const RINGS: usize = 4;

/// Plot extent around the unit circle; leaves room for the group names.
const EXTENT: f64 = 1.3;

#[derive(Debug, Clone)]
pub struct MuscleRadarChart {
    pub periods: Vec<String>,
    /// Per period, shares indexed like `MuscleGroup::ALL`.
    pub shares: Vec<Vec<f64>>,
}

/// Angle of spoke `i` out of `n`: the first points up, the rest follow clockwise.
pub fn spoke_angle(i: usize, n: usize) -> f64 {
    FRAC_PI_2 - TAU * i as f64 / n.max(1) as f64
}

pub fn polar_point(angle: f64, radius: f64) -> (f64, f64) {
    (radius * angle.cos(), radius * angle.sin())
}

/// Closed outline through `radii`, one per spoke.
fn outline(radii: &[f64]) -> Vec<(f64, f64)> {
    let n = radii.len();
    let mut pts: Vec<(f64, f64)> = radii
        .iter()
        .enumerate()
        .map(|(i, r)| polar_point(spoke_angle(i, n), *r))
        .collect();
    if let Some(&first) = pts.first() {
        pts.push(first);
    }
    pts
}

impl MuscleRadarChart {
    /// Quarters without any lifting are left out.
    pub fn from_records(records: &[WeeklyRecord]) -> Result<Self> {
        let mut chart = Self {
            periods: Vec::new(),
            shares: Vec::new(),
        };
        for row in quarterly_volume(records).into_iter().filter(|r| r.total > 0.0) {
            chart.shares.push(shares(&row.tons, row.total));
            chart.periods.push(row.period);
        }
        if chart.periods.is_empty() {
            bail!("no lifting volume to plot");
        }
        Ok(chart)
    }

    /// Share shown on the outer ring: the largest share rounded up to a tenth.
    pub fn outer_share(&self) -> f64 {
        let max = self.shares.iter().flatten().copied().fold(0.0, f64::max);
        ((max * 10.0).ceil() / 10.0).max(0.1)
    }
}

impl Chart for MuscleRadarChart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        cfg: &RenderConfig,
    ) -> Result<()> {
        let n = MuscleGroup::ALL.len();
        let outer = self.outer_share();

        let mut chart = ChartBuilder::on(root)
            .margin(20)
            .caption("Muscle Group Balance (Quarterly)", ("sans-serif", 22))
            .build_cartesian_2d(-EXTENT..EXTENT, -EXTENT..EXTENT)
            .map_err(|e| anyhow!("{:?}", e))?;

        let grid = style::GRAY.alpha(0.4);
        let ring_size = cfg.annotation_font_size.saturating_sub(2).max(6);
        let ring_style = annotation_style(ring_size, style::GRAY, VPos::Bottom);
        for k in 1..=RINGS {
            let r = k as f64 / RINGS as f64;
            chart
                .draw_series(std::iter::once(PathElement::new(
                    outline(&vec![r; n]),
                    grid.stroke_width(1),
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
            chart
                .draw_series(std::iter::once(
                    EmptyElement::at((0.0, r))
                        + Text::new(format::percent(r * outer), (0, -2), ring_style.clone()),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        let group_style =
            annotation_style(cfg.annotation_font_size + 1, style::GRAY, VPos::Center);
        for (i, group) in MuscleGroup::ALL.iter().enumerate() {
            let angle = spoke_angle(i, n);
            chart
                .draw_series(std::iter::once(PathElement::new(
                    vec![(0.0, 0.0), polar_point(angle, 1.0)],
                    grid.stroke_width(1),
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
            chart
                .draw_series(std::iter::once(
                    EmptyElement::at(polar_point(angle, 1.15))
                        + Text::new(group.label(), (0, 0), group_style.clone()),
                ))
                .map_err(|e| anyhow!("{:?}", e))?;
        }

        let outlines = self.periods.iter().zip(&self.shares).enumerate();
        for (idx, (period, period_shares)) in outlines {
            let color = style::palette_color(idx);
            let line = color.alpha(0.6);
            let radii: Vec<f64> = period_shares.iter().map(|s| s / outer).collect();
            let pts = outline(&radii);
            chart
                .draw_series(std::iter::once(Polygon::new(
                    pts.clone(),
                    color.alpha(0.1).filled(),
                )))
                .map_err(|e| anyhow!("{:?}", e))?;
            chart
                .draw_series(std::iter::once(PathElement::new(pts, line.stroke_width(2))))
                .map_err(|e| anyhow!("{:?}", e))?
                .label(period.as_str())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 14, y)], line.stroke_width(2))
                });
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

/// Quarterly muscle-balance radar, written to `out_path` (`.svg` or PNG) on a
/// square canvas as tall as the configured height.
pub fn plot_muscle_radar<P: AsRef<Path>>(
    records: &[WeeklyRecord],
    out_path: P,
    cfg: &RenderConfig,
) -> Result<()> {
    let chart = MuscleRadarChart::from_records(records)?;
    let square = cfg.clone().with_size(cfg.height, cfg.height);
    render(&chart, out_path, &square)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lift(yearweek: u32, leg: f64, back: f64) -> WeeklyRecord {
        WeeklyRecord {
            yearweek,
            leg_tons: Some(leg),
            back_tons: Some(back),
            ..Default::default()
        }
    }

    #[test]
    fn shares_per_quarter_skip_empty_quarters() {
        // Q1 2025 and Q3 2025 lift; Q2 in between has nothing.
        let c = MuscleRadarChart::from_records(&[lift(20252, 3.0, 1.0), lift(202530, 1.0, 1.0)])
            .unwrap();
        assert_eq!(c.periods, vec!["2025Q1", "2025Q3"]);
        assert_eq!(c.shares[0][MuscleGroup::Leg as usize], 0.75);
        assert_eq!(c.shares[1][MuscleGroup::Back as usize], 0.5);
        for s in &c.shares {
            assert!((s.iter().sum::<f64>() - 1.0).abs() < 1e-12);
        }
        assert!((c.outer_share() - 0.8).abs() < 1e-12);
    }

    #[test]
    fn spokes_start_at_the_top_and_run_clockwise() {
        let (x0, y0) = polar_point(spoke_angle(0, 6), 1.0);
        assert!(x0.abs() < 1e-12 && (y0 - 1.0).abs() < 1e-12);
        let (x1, y1) = polar_point(spoke_angle(1, 6), 1.0);
        assert!(x1 > 0.0 && y1 > 0.0 && y1 < y0);
        let ring = outline(&[0.5; 6]);
        assert_eq!(ring.len(), 7);
        assert_eq!(ring.first(), ring.last());
    }

    #[test]
    fn no_lifting_is_error() {
        let rec = WeeklyRecord {
            yearweek: 20251,
            ..Default::default()
        };
        assert!(MuscleRadarChart::from_records(&[rec]).is_err());
    }
}
