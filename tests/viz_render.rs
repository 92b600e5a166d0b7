use fitviz::transform::ChangeDriver;
use fitviz::viz::{self, Frequency, Reference, ScatterChart};
use fitviz::{RenderConfig, WeeklyRecord};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn render_config() -> RenderConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    RenderConfig::default()
}

fn sample_weeks() -> Vec<WeeklyRecord> {
    (1..=10u32)
        .map(|w| {
            let f = w as f64;
            WeeklyRecord {
                yearweek: 2025 * 100 + w,
                kcals_daily_avg: Some(2200.0 + 40.0 * (f % 4.0)),
                // Week 6 has no weigh-in, which breaks the weight line.
                weight_avg_kg: (w != 6).then(|| 81.0 - 0.15 * f),
                resting_energy_kcal: Some(1750.0),
                active_energy_kcal: Some(450.0 + 20.0 * f),
                weekly_surplus_kcal: Some(700.0 - 120.0 * f),
                proteins_daily_avg: Some(150.0 + f),
                km_run: Some(10.0 + f),
                mins_gym: Some(180.0),
                totals_kg: Some(9000.0 + 300.0 * f),
                projected_weight_kg: Some(81.0 - 0.14 * f),
                leg_tons: Some(3.0 + 0.1 * f),
                chest_tons: Some(2.0),
                back_tons: Some(2.5),
                shoulders_tons: Some(1.0),
                biceps_tons: (w % 2 == 0).then_some(0.5),
                core_tons: Some(0.3),
            }
        })
        .collect()
}

fn assert_written(path: &Path) {
    let meta = fs::metadata(path).expect("file created");
    assert!(meta.len() > 0, "{} is empty", path.display());
}

#[test]
fn weekly_and_energy_charts_render_svg_and_png() {
    let cfg = render_config();
    let dir = tempdir().unwrap();
    let rows = sample_weeks();

    for name in ["weight_vs_kcals.svg", "weight_vs_kcals.png"] {
        let p = dir.path().join(name);
        viz::plot_weight_vs_kcals(&rows, &p, &cfg).unwrap();
        assert_written(&p);
    }
    let p = dir.path().join("energy.svg");
    viz::plot_energy_breakdown(&rows, &p, &cfg).unwrap();
    assert_written(&p);

    let svg = fs::read_to_string(dir.path().join("weight_vs_kcals.svg")).unwrap();
    assert!(svg.contains("Weight avg kg"));
}

#[test]
fn muscle_volume_renders_weekly_and_quarterly() {
    let cfg = render_config();
    let dir = tempdir().unwrap();
    let rows = sample_weeks();
    for (freq, name) in [(Frequency::Weekly, "vol_w.svg"), (Frequency::Quarterly, "vol_q.svg")] {
        let p = dir.path().join(name);
        viz::plot_muscle_volume(&rows, freq, &p, &cfg).unwrap();
        assert_written(&p);
    }
}

#[test]
fn radar_and_projection_charts_render() {
    let cfg = render_config();
    let dir = tempdir().unwrap();
    let rows = sample_weeks();

    let radar = dir.path().join("radar.svg");
    viz::plot_muscle_radar(&rows, &radar, &cfg).unwrap();
    assert_written(&radar);
    let svg = fs::read_to_string(&radar).unwrap();
    // 2025-W01 starts on 2024-12-30, so two quarters are compared.
    assert!(svg.contains("2024Q4") && svg.contains("2025Q1"));

    let projection = dir.path().join("projection.png");
    viz::plot_projection_accuracy(&rows, &projection, &cfg).unwrap();
    assert_written(&projection);
}

#[test]
fn scatter_charts_render() {
    let cfg = render_config();
    let dir = tempdir().unwrap();
    let rows = sample_weeks();
    let charts = [
        ScatterChart::weight_change(&rows, ChangeDriver::Surplus),
        ScatterChart::weight_change(&rows, ChangeDriver::ProteinPerKg),
        ScatterChart::projection_accuracy(&rows),
        ScatterChart::running_vs_lifting(&rows),
    ];
    assert_eq!(charts[2].reference, Reference::Diagonal);
    for (i, c) in charts.iter().enumerate() {
        assert!(!c.points.is_empty());
        let p = dir.path().join(format!("scatter_{i}.svg"));
        viz::plot_scatter(c, &p, &cfg).unwrap();
        assert_written(&p);
    }
}

#[test]
fn charts_without_data_fail_before_touching_disk() {
    let dir = tempdir().unwrap();
    let cfg = RenderConfig::default();
    let p = dir.path().join("empty.svg");
    assert!(viz::plot_weight_vs_kcals(&[], &p, &cfg).is_err());
    assert!(viz::plot_energy_breakdown(&[], &p, &cfg).is_err());
    assert!(viz::plot_muscle_volume(&[], Frequency::Weekly, &p, &cfg).is_err());
    assert!(viz::plot_muscle_radar(&[], &p, &cfg).is_err());
    assert!(viz::plot_projection_accuracy(&[], &p, &cfg).is_err());
    assert!(!p.exists());
}
