//! fitviz
//!
//! A small Rust library for turning a weekly fitness log (intake, energy
//! expenditure, weight, running and lifting volume) into static SVG/PNG charts.
//!
//! ### Features
//! - Read the weekly log from CSV into typed rows, export derived tables as CSV or JSON
//! - Stateless transforms: rolling means, week-over-week change, quarterly volume
//! - Bar + line charts whose line labels stay clear of the bar labels below them
//! - Stacked energy breakdown, muscle-group volume and metric scatter charts
//! - Quarterly muscle-balance radar and projected vs. actual weight charts
//!
//! ### Example
//! ```no_run
//! use fitviz::{RenderConfig, storage, viz};
//!
//! let records = storage::load_weekly_csv("weekly.csv")?;
//! let cfg = RenderConfig::default();
//! viz::plot_weight_vs_kcals(&records, "weight_vs_kcals.svg", &cfg)?;
//! viz::plot_energy_breakdown(&records, "energy.png", &cfg)?;
//! viz::plot_muscle_volume(&records, viz::Frequency::Quarterly, "volume.svg", &cfg)?;
//! # Ok::<(), anyhow::Error>(())
//! ```
//!
//! The label engine in [`labels`] works on any pair of coordinate systems that
//! implement [`labels::PixelSpace`]; the charts feed it Plotters chart contexts.

pub mod config;
pub mod error;
pub mod format;
pub mod labels;
pub mod models;
pub mod storage;
pub mod style;
pub mod transform;
pub mod viz;

pub use config::RenderConfig;
pub use error::{LabelError, LabelResult};
pub use labels::{LabelConfig, Placement, Region, place_labels};
pub use models::{MuscleGroup, WeeklyRecord, YearWeek};
