//! Chart rendering to **SVG** or **PNG** (chosen by the output extension).
//!
//! - `weekly`: kcal bars vs. weight line, weight labels kept clear of bar labels
//! - `energy`: stacked resting / active / surplus energy vs. weight
//! - `lifting`: absolute and normalized muscle-group volume, weekly or quarterly
//! - `scatter`: metric vs. metric, e.g. calorie surplus vs. weight change
//! - `projection`: projected vs. actual weight over time, next to their scatter
//! - `radar`: muscle-group balance per quarter on a polar grid
//!
//! Every chart that mixes bars and a labelled line goes through
//! [`crate::labels::place_labels`].

pub mod energy;
pub mod lifting;
pub mod projection;
pub mod radar;
pub mod scatter;
pub mod util;
pub mod weekly;

use anyhow::{Context, Result, anyhow};
use log::info;
use plotters::backend::DrawingBackend;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::FontStyle;
use plotters_bitmap::BitMapBackend;
use plotters_svg::SVGBackend;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::config::RenderConfig;

/// DejaVu Sans, used when no `font_path` is configured.
const BUNDLED_FONT: &[u8] = include_bytes!("../../assets/DejaVuSans.ttf");

#[derive(Debug, Clone, PartialEq, Eq)]
enum FontSource {
    Bundled,
    File(PathBuf),
}

/// Font currently registered as "sans-serif" for the `ab_glyph` text path,
/// which does not discover OS fonts on its own.
static ACTIVE_FONT: Mutex<Option<FontSource>> = Mutex::new(None);

/// Register the font `cfg` asks for as "sans-serif". Registration is redone
/// only when the requested font differs from the active one; a font that
/// cannot be loaded is an error and leaves the active font in place.
pub fn ensure_fonts_registered(cfg: &RenderConfig) -> Result<()> {
    let wanted = cfg
        .font_path
        .clone()
        .map_or(FontSource::Bundled, FontSource::File);
    let mut active = ACTIVE_FONT
        .lock()
        .map_err(|_| anyhow!("font registry lock poisoned"))?;
    if active.as_ref() == Some(&wanted) {
        return Ok(());
    }

    let bytes: &'static [u8] = match &wanted {
        FontSource::Bundled => BUNDLED_FONT,
        FontSource::File(path) => {
            let data =
                fs::read(path).with_context(|| format!("reading font {}", path.display()))?;
            // Plotters keeps registered font data for the lifetime of the process.
            Box::leak(data.into_boxed_slice())
        }
    };
    plotters::style::register_font("sans-serif", FontStyle::Normal, bytes)
        .map_err(|_| anyhow!("{:?} is not a usable TrueType/OpenType font", wanted))?;
    info!("registered sans-serif font: {:?}", wanted);
    *active = Some(wanted);
    Ok(())
}

/// A chart that can draw itself on any Plotters backend.
pub trait Chart {
    fn draw<DB: DrawingBackend>(
        &self,
        root: &DrawingArea<DB, Shift>,
        cfg: &RenderConfig,
    ) -> Result<()>;
}

/// Render `chart` to `out_path`: SVG for a `.svg` extension, PNG otherwise.
pub fn render<C: Chart, P: AsRef<Path>>(chart: &C, out_path: P, cfg: &RenderConfig) -> Result<()> {
    ensure_fonts_registered(cfg)?;
    let out_path = out_path.as_ref();
    let size = (cfg.width, cfg.height);

    if out_path.extension().and_then(|s| s.to_str()) == Some("svg") {
        let root = SVGBackend::new(out_path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        chart.draw(&root, cfg)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    } else {
        let root = BitMapBackend::new(out_path, size).into_drawing_area();
        root.fill(&WHITE).map_err(|e| anyhow!("{:?}", e))?;
        chart.draw(&root, cfg)?;
        root.present().map_err(|e| anyhow!("{:?}", e))?;
    }
    info!("wrote chart to {}", out_path.display());
    Ok(())
}

pub use energy::{EnergyChart, plot_energy_breakdown};
pub use lifting::{Frequency, MuscleVolumeChart, plot_muscle_volume};
pub use projection::{ProjectionChart, plot_projection_accuracy};
pub use radar::{MuscleRadarChart, plot_muscle_radar};
pub use scatter::{Reference, ScatterChart, plot_scatter};
pub use weekly::{WeightKcalChart, plot_weight_vs_kcals};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changing_font_path_is_honoured() {
        let default_cfg = RenderConfig::default();
        ensure_fonts_registered(&default_cfg).unwrap();

        let missing = RenderConfig {
            font_path: Some(PathBuf::from("/definitely/missing.ttf")),
            ..RenderConfig::default()
        };
        assert!(ensure_fonts_registered(&missing).is_err());

        let bundled_file = RenderConfig {
            font_path: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/DejaVuSans.ttf")),
            ..RenderConfig::default()
        };
        ensure_fonts_registered(&bundled_file).unwrap();
        ensure_fonts_registered(&default_cfg).unwrap();
    }

    #[test]
    fn non_font_file_is_rejected() {
        let cfg = RenderConfig {
            font_path: Some(Path::new(env!("CARGO_MANIFEST_DIR")).join("Cargo.toml")),
            ..RenderConfig::default()
        };
        assert!(ensure_fonts_registered(&cfg).is_err());
    }
}
