use anyhow::{Result, bail};
use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::style::{self, Rgb8};

/// One row of the weekly summary table. Blank cells deserialize to `None`.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct WeeklyRecord {
    /// ISO year and week packed as `YYYYW` or `YYYYWW` (e.g. `20252`, `202410`).
    #[serde(rename = "Yearweek", deserialize_with = "de_u32_from_string_or_number")]
    pub yearweek: u32,
    #[serde(rename = "kcals daily avg", default)]
    pub kcals_daily_avg: Option<f64>,
    #[serde(rename = "Weight avg kg", default)]
    pub weight_avg_kg: Option<f64>,
    #[serde(rename = "Resting energy kcal", default)]
    pub resting_energy_kcal: Option<f64>,
    #[serde(rename = "Active energy kcal", default)]
    pub active_energy_kcal: Option<f64>,
    #[serde(rename = "Weekly total cal surplus (deficit)", default)]
    pub weekly_surplus_kcal: Option<f64>,
    #[serde(rename = "Proteins daily avg", default)]
    pub proteins_daily_avg: Option<f64>,
    #[serde(rename = "km run", default)]
    pub km_run: Option<f64>,
    #[serde(rename = "Mins gym", default)]
    pub mins_gym: Option<f64>,
    #[serde(rename = "Totals kg", default)]
    pub totals_kg: Option<f64>,
    #[serde(rename = "Projected weight kg", default)]
    pub projected_weight_kg: Option<f64>,
    #[serde(rename = "Leg tons", default)]
    pub leg_tons: Option<f64>,
    #[serde(rename = "Chest tons", default)]
    pub chest_tons: Option<f64>,
    #[serde(rename = "Back tons", default)]
    pub back_tons: Option<f64>,
    #[serde(rename = "Shoulders tons", default)]
    pub shoulders_tons: Option<f64>,
    #[serde(rename = "Biceps tons", default)]
    pub biceps_tons: Option<f64>,
    #[serde(rename = "Core tons", default)]
    pub core_tons: Option<f64>,
}

impl WeeklyRecord {
    pub fn volume(&self, group: MuscleGroup) -> Option<f64> {
        match group {
            MuscleGroup::Leg => self.leg_tons,
            MuscleGroup::Chest => self.chest_tons,
            MuscleGroup::Back => self.back_tons,
            MuscleGroup::Shoulders => self.shoulders_tons,
            MuscleGroup::Biceps => self.biceps_tons,
            MuscleGroup::Core => self.core_tons,
        }
    }

    pub fn year_week(&self) -> Result<YearWeek> {
        YearWeek::parse(self.yearweek)
    }
}

/// Spreadsheet exports write whole numbers as `202410` or `202410.0`; accept
/// both plus plain strings.
fn de_u32_from_string_or_number<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::{self, Visitor};
    struct U32Visitor;

    impl<'de> Visitor<'de> for U32Visitor {
        type Value = u32;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            write!(f, "a non-negative whole number like 202410")
        }

        fn visit_u64<E>(self, v: u64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_i64<E>(self, v: i64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            u32::try_from(v).map_err(E::custom)
        }

        fn visit_f64<E>(self, v: f64) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            if v.fract() != 0.0 || v < 0.0 || v > u32::MAX as f64 {
                return Err(E::custom(format!("not a whole year-week: {v}")));
            }
            Ok(v as u32)
        }

        fn visit_str<E>(self, s: &str) -> Result<Self::Value, E>
        where
            E: de::Error,
        {
            let s = s.trim();
            match s.parse::<u32>() {
                Ok(v) => Ok(v),
                Err(_) => s
                    .parse::<f64>()
                    .map_err(E::custom)
                    .and_then(|f| self.visit_f64(f)),
            }
        }
    }

    deserializer.deserialize_any(U32Visitor)
}

/// An ISO 8601 week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct YearWeek {
    pub year: i32,
    pub week: u32,
}

impl YearWeek {
    /// Split a packed `YYYYW` / `YYYYWW` value and check the week exists.
    pub fn parse(packed: u32) -> Result<Self> {
        let s = packed.to_string();
        if !(5..=6).contains(&s.len()) {
            bail!("invalid year-week {packed}: expected YYYYW or YYYYWW");
        }
        let year: i32 = s[..4].parse()?;
        let week: u32 = s[4..].parse()?;
        let yw = Self { year, week };
        if yw.monday().is_none() {
            bail!("invalid year-week {packed}: {year} has no ISO week {week}");
        }
        Ok(yw)
    }

    /// Monday of the week.
    pub fn monday(&self) -> Option<NaiveDate> {
        NaiveDate::from_isoywd_opt(self.year, self.week, Weekday::Mon)
    }

    /// `YYYY-Mon` of the week's Monday, e.g. week 10 of 2024 -> `2024-Mar`.
    pub fn month_label(&self) -> String {
        self.monday()
            .map(|d| d.format("%Y-%b").to_string())
            .unwrap_or_else(|| self.to_string())
    }

    /// Calendar quarter containing the week's Monday.
    pub fn quarter(&self) -> Option<Quarter> {
        self.monday().map(|d| Quarter {
            year: d.year(),
            quarter: d.month0() / 3 + 1,
        })
    }
}

impl fmt::Display for YearWeek {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-W{:02}", self.year, self.week)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Quarter {
    pub year: i32,
    pub quarter: u32,
}

impl Quarter {
    /// The following calendar quarter.
    pub fn next(self) -> Self {
        if self.quarter >= 4 {
            Self {
                year: self.year + 1,
                quarter: 1,
            }
        } else {
            Self {
                year: self.year,
                quarter: self.quarter + 1,
            }
        }
    }
}

impl fmt::Display for Quarter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Q{}", self.year, self.quarter)
    }
}

/// Muscle groups in stacking order (bottom to top).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MuscleGroup {
    Leg,
    Chest,
    Back,
    Shoulders,
    Biceps,
    Core,
}

impl MuscleGroup {
    pub const ALL: [MuscleGroup; 6] = [
        MuscleGroup::Leg,
        MuscleGroup::Chest,
        MuscleGroup::Back,
        MuscleGroup::Shoulders,
        MuscleGroup::Biceps,
        MuscleGroup::Core,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MuscleGroup::Leg => "Leg",
            MuscleGroup::Chest => "Chest",
            MuscleGroup::Back => "Back",
            MuscleGroup::Shoulders => "Shoulders",
            MuscleGroup::Biceps => "Biceps",
            MuscleGroup::Core => "Core",
        }
    }

    /// Column header in the weekly table.
    pub fn column(self) -> &'static str {
        match self {
            MuscleGroup::Leg => "Leg tons",
            MuscleGroup::Chest => "Chest tons",
            MuscleGroup::Back => "Back tons",
            MuscleGroup::Shoulders => "Shoulders tons",
            MuscleGroup::Biceps => "Biceps tons",
            MuscleGroup::Core => "Core tons",
        }
    }

    pub fn color(self) -> Rgb8 {
        match self {
            MuscleGroup::Leg => style::BLUE,
            MuscleGroup::Chest => style::ORANGE,
            MuscleGroup::Back => style::GREEN,
            MuscleGroup::Shoulders => style::RED,
            MuscleGroup::Biceps => style::PURPLE,
            MuscleGroup::Core => style::BROWN,
        }
    }
}

/// Lifting volume of one period (week or quarter), in tons.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VolumeRow {
    pub period: String,
    /// Indexed like `MuscleGroup::ALL`.
    pub tons: [f64; 6],
    pub total: f64,
}

impl VolumeRow {
    pub fn tons_of(&self, group: MuscleGroup) -> f64 {
        self.tons[group as usize]
    }
}

/// A week prepared for the energy breakdown chart. Energy is in thousand kcal.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EnergyRow {
    pub week: YearWeek,
    pub intake_k: f64,
    pub resting_k: f64,
    pub active_k: f64,
    /// Intake minus expenditure; negative for a deficit.
    pub surplus_k: f64,
    pub weight_kg: f64,
    pub intake_rolling4: f64,
    pub weight_rolling4: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn year_week_parses_short_and_long_forms() {
        let a = YearWeek::parse(20252).unwrap();
        assert_eq!((a.year, a.week), (2025, 2));
        assert_eq!(a.month_label(), "2025-Jan");

        let b = YearWeek::parse(202410).unwrap();
        assert_eq!((b.year, b.week), (2024, 10));
        assert_eq!(b.month_label(), "2024-Mar");
        assert_eq!(b.to_string(), "2024-W10");
    }

    #[test]
    fn year_week_rejects_nonexistent_weeks() {
        assert!(YearWeek::parse(202460).is_err());
        assert!(YearWeek::parse(2025).is_err());
        assert!(YearWeek::parse(2025010).is_err());
    }

    #[test]
    fn quarter_follows_the_monday() {
        // ISO week 1 of 2025 starts on Monday 2024-12-30.
        let q = YearWeek::parse(20251).unwrap().quarter().unwrap();
        assert_eq!(q.to_string(), "2024Q4");
        let q = YearWeek::parse(202514).unwrap().quarter().unwrap();
        assert_eq!(q.to_string(), "2025Q1");
    }

    #[test]
    fn muscle_group_index_matches_all() {
        for (i, g) in MuscleGroup::ALL.iter().enumerate() {
            assert_eq!(*g as usize, i);
        }
    }
}
