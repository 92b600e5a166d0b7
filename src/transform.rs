//! Stateless reshaping of weekly records into chart-ready series.
//!
//! Series are `Option<f64>` slices wherever the source table may have blank
//! cells; a missing input yields a missing output instead of a zero.

use anyhow::{Result, anyhow};
use log::warn;
use std::collections::BTreeMap;

use crate::models::{EnergyRow, MuscleGroup, Quarter, VolumeRow, WeeklyRecord, YearWeek};

/// kcal -> thousand kcal.
#[inline]
pub fn kcal_to_thousands(kcal: f64) -> f64 {
    kcal / 1000.0
}

/// Intake minus resting and active expenditure. Negative means a deficit.
#[inline]
pub fn energy_surplus(intake: f64, resting: f64, active: f64) -> f64 {
    intake - (resting + active)
}

/// Trailing mean over `window` entries, averaging whichever values are
/// present. A position is missing only when its whole window is.
pub fn rolling_mean(values: &[Option<f64>], window: usize) -> Vec<Option<f64>> {
    let window = window.max(1);
    (0..values.len())
        .map(|i| {
            let start = (i + 1).saturating_sub(window);
            let (sum, n) = values[start..=i]
                .iter()
                .flatten()
                .fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
            (n > 0).then(|| sum / n as f64)
        })
        .collect()
}

/// First difference; the first entry (and any entry next to a gap) is missing.
pub fn diff(values: &[Option<f64>]) -> Vec<Option<f64>> {
    let mut out = Vec::with_capacity(values.len());
    let mut prev: Option<f64> = None;
    for (i, v) in values.iter().enumerate() {
        out.push(if i == 0 {
            None
        } else {
            match (prev, v) {
                (Some(p), Some(c)) => Some(c - p),
                _ => None,
            }
        });
        prev = *v;
    }
    out
}

/// `num / den`, missing for missing inputs or a zero denominator.
pub fn ratio(num: Option<f64>, den: Option<f64>) -> Option<f64> {
    match (num, den) {
        (Some(n), Some(d)) if d != 0.0 => Some(n / d),
        _ => None,
    }
}

#[inline]
pub fn clip_positive(v: f64) -> f64 {
    v.max(0.0)
}

#[inline]
pub fn clip_negative(v: f64) -> f64 {
    v.min(0.0)
}

/// Fractions of `total`. All zeros when the total is not positive.
pub fn shares(values: &[f64], total: f64) -> Vec<f64> {
    if total > 0.0 {
        values.iter().map(|v| v / total).collect()
    } else {
        vec![0.0; values.len()]
    }
}

/// Records ordered by year-week. Rows with an unparsable year-week are dropped.
pub fn sorted_by_week(records: &[WeeklyRecord]) -> Vec<(YearWeek, &WeeklyRecord)> {
    let mut out: Vec<(YearWeek, &WeeklyRecord)> = records
        .iter()
        .filter_map(|r| match r.year_week() {
            Ok(yw) => Some((yw, r)),
            Err(e) => {
                warn!("skipping row: {e}");
                None
            }
        })
        .collect();
    out.sort_by_key(|(yw, _)| *yw);
    out
}

fn group_tons(record: &WeeklyRecord) -> Option<[f64; 6]> {
    let mut tons = [0.0; 6];
    let mut any = false;
    for g in MuscleGroup::ALL {
        if let Some(v) = record.volume(g) {
            tons[g as usize] = v;
            any = true;
        }
    }
    any.then_some(tons)
}

fn volume_row(period: String, tons: [f64; 6]) -> VolumeRow {
    VolumeRow {
        period,
        tons,
        total: tons.iter().sum(),
    }
}

/// Lifting volume per week. Weeks without any muscle-group entry are skipped;
/// blank groups count as zero.
pub fn weekly_volume(records: &[WeeklyRecord]) -> Vec<VolumeRow> {
    sorted_by_week(records)
        .into_iter()
        .filter_map(|(yw, r)| group_tons(r).map(|t| volume_row(yw.to_string(), t)))
        .collect()
}

/// Lifting volume summed per calendar quarter of each week's Monday. The rows
/// run from the first to the last quarter with lifting; quarters in between
/// without any lifting week appear as zero rows, so gaps stay visible.
pub fn quarterly_volume(records: &[WeeklyRecord]) -> Vec<VolumeRow> {
    let mut acc: BTreeMap<Quarter, [f64; 6]> = BTreeMap::new();
    for (yw, r) in sorted_by_week(records) {
        let (Some(q), Some(tons)) = (yw.quarter(), group_tons(r)) else {
            continue;
        };
        let slot = acc.entry(q).or_insert([0.0; 6]);
        for (s, t) in slot.iter_mut().zip(tons) {
            *s += t;
        }
    }
    let (Some(&first), Some(&last)) = (acc.keys().next(), acc.keys().next_back()) else {
        return Vec::new();
    };

    let mut out = Vec::new();
    let mut q = first;
    while q <= last {
        let tons = acc.get(&q).copied().unwrap_or([0.0; 6]);
        out.push(volume_row(q.to_string(), tons));
        q = q.next();
    }
    out
}

/// Rows for the energy breakdown chart: weeks missing intake, resting,
/// active energy or weight are dropped, energy is converted to thousand kcal
/// and 4-week rolling means are taken over the remaining weeks.
pub fn prepare_energy(records: &[WeeklyRecord]) -> Vec<EnergyRow> {
    let kept: Vec<(YearWeek, f64, f64, f64, f64)> = sorted_by_week(records)
        .into_iter()
        .filter_map(|(yw, r)| {
            Some((
                yw,
                kcal_to_thousands(r.kcals_daily_avg?),
                kcal_to_thousands(r.resting_energy_kcal?),
                kcal_to_thousands(r.active_energy_kcal?),
                r.weight_avg_kg?,
            ))
        })
        .collect();

    let intake: Vec<Option<f64>> = kept.iter().map(|k| Some(k.1)).collect();
    let weight: Vec<Option<f64>> = kept.iter().map(|k| Some(k.4)).collect();
    let intake_ma = rolling_mean(&intake, 4);
    let weight_ma = rolling_mean(&weight, 4);

    kept.into_iter()
        .zip(intake_ma.into_iter().zip(weight_ma))
        .map(|((week, intake_k, resting_k, active_k, weight_kg), (ima, wma))| EnergyRow {
            week,
            intake_k,
            resting_k,
            active_k,
            surplus_k: energy_surplus(intake_k, resting_k, active_k),
            weight_kg,
            intake_rolling4: ima.unwrap_or(intake_k),
            weight_rolling4: wma.unwrap_or(weight_kg),
        })
        .collect()
}

/// Metrics that can be paired against the weekly weight change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeDriver {
    /// Weekly total calorie surplus (deficit).
    Surplus,
    /// Daily protein grams per kg of body weight.
    ProteinPerKg,
    /// Kilometers run.
    KmRun,
}

impl ChangeDriver {
    pub fn axis_label(self) -> &'static str {
        match self {
            ChangeDriver::Surplus => "Weekly calorie surplus / deficit",
            ChangeDriver::ProteinPerKg => "Protein (g / kg bodyweight)",
            ChangeDriver::KmRun => "km run",
        }
    }

    fn value(self, r: &WeeklyRecord) -> Option<f64> {
        match self {
            ChangeDriver::Surplus => r.weekly_surplus_kcal,
            ChangeDriver::ProteinPerKg => ratio(r.proteins_daily_avg, r.weight_avg_kg),
            ChangeDriver::KmRun => r.km_run,
        }
    }
}

/// `(driver, weight change vs. previous week)` pairs in week order. Weeks where
/// either side is missing are dropped.
pub fn weight_change_pairs(records: &[WeeklyRecord], driver: ChangeDriver) -> Vec<(f64, f64)> {
    let sorted = sorted_by_week(records);
    let weights: Vec<Option<f64>> = sorted.iter().map(|(_, r)| r.weight_avg_kg).collect();
    sorted
        .iter()
        .zip(diff(&weights))
        .filter_map(|((_, r), change)| Some((driver.value(r)?, change?)))
        .collect()
}

/// `(x, y)` pairs of two arbitrary metrics, e.g. km run vs. total kg lifted.
pub fn metric_pairs<FX, FY>(records: &[WeeklyRecord], x: FX, y: FY) -> Vec<(f64, f64)>
where
    FX: Fn(&WeeklyRecord) -> Option<f64>,
    FY: Fn(&WeeklyRecord) -> Option<f64>,
{
    sorted_by_week(records)
        .into_iter()
        .filter_map(|(_, r)| Some((x(r)?, y(r)?)))
        .collect()
}

/// Smallest and largest finite value, widened by one when they coincide so the
/// range can back a chart axis.
pub fn axis_range<I: IntoIterator<Item = f64>>(values: I) -> Result<(f64, f64)> {
    let (mut lo, mut hi) = values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if lo > hi {
        return Err(anyhow!("no numeric values to plot"));
    }
    if (hi - lo).abs() < f64::EPSILON {
        lo -= 1.0;
        hi += 1.0;
    }
    Ok((lo, hi))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Option<f64>, b: f64) -> bool {
        a.is_some_and(|a| (a - b).abs() < 1e-9)
    }

    #[test]
    fn rolling_mean_uses_partial_windows_and_skips_gaps() {
        let v = [Some(1.0), Some(2.0), None, Some(4.0), Some(5.0), Some(6.0)];
        let m = rolling_mean(&v, 4);
        assert!(approx(m[0], 1.0));
        assert!(approx(m[1], 1.5));
        assert!(approx(m[2], 1.5));
        assert!(approx(m[3], 7.0 / 3.0));
        assert!(approx(m[4], 11.0 / 3.0));
        assert!(approx(m[5], 5.0));

        let gaps = rolling_mean(&[None, None, Some(3.0)], 2);
        assert_eq!(gaps[0], None);
        assert_eq!(gaps[1], None);
        assert!(approx(gaps[2], 3.0));
    }

    #[test]
    fn diff_marks_first_and_gaps_missing() {
        let d = diff(&[Some(80.0), Some(79.5), None, Some(79.0), Some(79.4)]);
        assert_eq!(d[0], None);
        assert!(approx(d[1], -0.5));
        assert_eq!(d[2], None);
        assert_eq!(d[3], None);
        assert!(approx(d[4], 0.4));
    }

    #[test]
    fn ratio_and_clips() {
        assert!(approx(ratio(Some(160.0), Some(80.0)), 2.0));
        assert_eq!(ratio(Some(1.0), Some(0.0)), None);
        assert_eq!(ratio(None, Some(2.0)), None);
        assert_eq!(clip_positive(-0.3), 0.0);
        assert_eq!(clip_negative(-0.3), -0.3);
        assert_eq!(clip_negative(0.3), 0.0);
    }

    #[test]
    fn shares_sum_to_one_or_zero() {
        let s = shares(&[1.0, 3.0], 4.0);
        assert_eq!(s, vec![0.25, 0.75]);
        assert_eq!(shares(&[0.0, 0.0], 0.0), vec![0.0, 0.0]);
    }

    #[test]
    fn energy_surplus_can_be_negative() {
        assert!((energy_surplus(2.1, 1.7, 0.6) + 0.2).abs() < 1e-12);
        assert_eq!(kcal_to_thousands(1750.0), 1.75);
    }

    #[test]
    fn quarterly_volume_keeps_empty_quarters_between_active_ones() {
        let lift = |yearweek: u32, leg: f64| WeeklyRecord {
            yearweek,
            leg_tons: Some(leg),
            ..Default::default()
        };
        // 2024-W50 is in Q4, 2025-W20 in Q2: Q1 2025 has no lifting.
        let rows = quarterly_volume(&[lift(202520, 2.0), lift(202450, 3.0), lift(202451, 1.0)]);
        let periods: Vec<&str> = rows.iter().map(|r| r.period.as_str()).collect();
        assert_eq!(periods, vec!["2024Q4", "2025Q1", "2025Q2"]);
        assert_eq!(rows[0].total, 4.0);
        assert_eq!(rows[1].total, 0.0);
        assert_eq!(rows[1].tons, [0.0; 6]);
        assert_eq!(rows[2].tons_of(MuscleGroup::Leg), 2.0);
        assert!(quarterly_volume(&[]).is_empty());
    }

    #[test]
    fn axis_range_widens_flat_series() {
        assert_eq!(axis_range([3.0, 3.0]).unwrap(), (2.0, 4.0));
        assert_eq!(axis_range([1.0, f64::NAN, -2.0]).unwrap(), (-2.0, 1.0));
        assert!(axis_range(Vec::<f64>::new()).is_err());
    }
}
