use fitviz::models::{MuscleGroup, YearWeek};
use fitviz::storage;
use fitviz::transform;
use std::fs;
use tempfile::tempdir;

const WEEKLY: &str = "\
Yearweek,kcals daily avg,Weight avg kg,Resting energy kcal,Active energy kcal,\
Leg tons,Chest tons,Notes
202410.0,2450.5,80.9,1750,620,4.5,2.0,deload
20252,2300,,1740,580,,,
202415, 2210 ,80.1,1735,700,3.0,1.5,
";

#[test]
fn reads_spreadsheet_style_csv() {
    let rows = storage::read_weekly(WEEKLY.as_bytes()).unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0].yearweek, 202410);
    assert_eq!(rows[0].year_week().unwrap(), YearWeek { year: 2024, week: 10 });
    assert_eq!(rows[0].kcals_daily_avg, Some(2450.5));

    // Blank cells stay missing instead of becoming zero.
    assert_eq!(rows[1].weight_avg_kg, None);
    assert_eq!(rows[1].volume(MuscleGroup::Leg), None);
    assert_eq!(rows[1].year_week().unwrap(), YearWeek { year: 2025, week: 2 });

    // Padded cells are trimmed.
    assert_eq!(rows[2].kcals_daily_avg, Some(2210.0));
    // Columns the table does not carry are simply absent.
    assert_eq!(rows[2].km_run, None);
}

#[test]
fn bad_cell_reports_its_row() {
    let csv = "Yearweek,kcals daily avg\n20251,2300\n20252,lots\n";
    let err = storage::read_weekly(csv.as_bytes()).unwrap_err();
    assert!(format!("{err:#}").contains("row 3"), "{err:#}");
}

#[test]
fn load_from_file_and_export_quarterly_volume() {
    let dir = tempdir().unwrap();
    let src = dir.path().join("weekly.csv");
    fs::write(&src, WEEKLY).unwrap();

    let rows = storage::load_weekly_csv(&src).unwrap();
    let quarterly = transform::quarterly_volume(&rows);
    // 2024-W10 is in Q1, 2024-W15 in Q2; 2025-W02 has no lifting.
    assert_eq!(
        quarterly.iter().map(|r| r.period.as_str()).collect::<Vec<_>>(),
        vec!["2024Q1", "2024Q2"]
    );
    assert_eq!(quarterly[0].total, 6.5);

    let out = dir.path().join("quarterly.csv");
    storage::save_volume_csv(&quarterly, &out).unwrap();
    let txt = fs::read_to_string(&out).unwrap();
    assert_eq!(txt.lines().count(), 1 + quarterly.len());
    assert!(txt.lines().next().unwrap().ends_with("Totals tons"));

    let json = dir.path().join("energy.json");
    storage::save_json(&transform::prepare_energy(&rows), &json).unwrap();
    let v: serde_json::Value = serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
    // 2025-W02 has no weight, so only two weeks survive.
    assert_eq!(v.as_array().unwrap().len(), 2);
}

#[test]
fn missing_file_is_an_error() {
    let dir = tempdir().unwrap();
    assert!(storage::load_weekly_csv(dir.path().join("nope.csv")).is_err());
}
