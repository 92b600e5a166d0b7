use crate::models::{MuscleGroup, VolumeRow, WeeklyRecord};
use anyhow::{Context, Result};
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::info;
use serde::Serialize;
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

/// Load the weekly summary table exported as CSV (header row required).
pub fn load_weekly_csv<P: AsRef<Path>>(path: P) -> Result<Vec<WeeklyRecord>> {
    let path = path.as_ref();
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let rows = read_weekly(file).with_context(|| format!("reading {}", path.display()))?;
    info!("loaded {} weekly rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Parse weekly rows from any reader. Unknown columns are ignored.
pub fn read_weekly<R: Read>(reader: R) -> Result<Vec<WeeklyRecord>> {
    let mut rdr = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut out = Vec::new();
    for (i, rec) in rdr.deserialize::<WeeklyRecord>().enumerate() {
        // +2: header line and 1-based numbering
        out.push(rec.with_context(|| format!("row {}", i + 2))?);
    }
    Ok(out)
}

/// Save aggregated lifting volume as CSV: period, one column per muscle group, total.
pub fn save_volume_csv<P: AsRef<Path>>(rows: &[VolumeRow], path: P) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_path(path)?;
    let mut header = vec!["period"];
    header.extend(MuscleGroup::ALL.iter().map(|g| g.column()));
    header.push("Totals tons");
    wtr.write_record(&header)?;
    for r in rows {
        let mut rec = vec![r.period.clone()];
        rec.extend(r.tons.iter().map(|t| t.to_string()));
        rec.push(r.total.to_string());
        wtr.write_record(&rec)?;
    }
    wtr.flush()?;
    Ok(())
}

/// Save any derived rows as a pretty JSON array.
pub fn save_json<T: Serialize, P: AsRef<Path>>(rows: &[T], path: P) -> Result<()> {
    let mut f = File::create(path)?;
    let s = serde_json::to_string_pretty(rows)?;
    f.write_all(s.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn write_csv_and_json() {
        let dir = tempdir().unwrap();
        let csvp = dir.path().join("v.csv");
        let jsonp = dir.path().join("v.json");
        let rows = vec![VolumeRow {
            period: "2025Q1".into(),
            tons: [10.0, 5.0, 6.0, 2.0, 1.0, 1.0],
            total: 25.0,
        }];
        save_volume_csv(&rows, &csvp).unwrap();
        save_json(&rows, &jsonp).unwrap();
        let txt = std::fs::read_to_string(&csvp).unwrap();
        assert!(txt.starts_with("period,Leg tons,Chest tons,"));
        assert!(txt.contains("2025Q1,10,5,6,2,1,1,25"));
        assert!(jsonp.exists());
    }
}
