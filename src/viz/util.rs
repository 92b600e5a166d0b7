//! Shared helpers for category (one bar per period) axes and annotations.

use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

use crate::style::Rgb8;

/// Half the width of a bar, in category units.
pub const BAR_HALF_WIDTH: f64 = 0.4;

/// Gap between a bar top and its value label, in pixels.
pub const BAR_LABEL_PAD: i32 = 3;

/// X range that centers `n` categories on 0, 1, .., n-1.
pub fn category_range(n: usize) -> Range<f64> {
    -0.5..(n.max(1) as f64 - 0.5)
}

/// Tick label for category axes: the period name when `v` sits on a
/// category center, empty otherwise.
pub fn category_label(labels: &[String], v: f64) -> String {
    let idx = v.round();
    if (v - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

/// How many x ticks to request so long week lists stay readable.
pub fn category_tick_count(n: usize) -> usize {
    n.clamp(1, 26)
}

/// Widen `lo..hi` by `frac` of its span on both sides.
pub fn padded(lo: f64, hi: f64, frac: f64) -> Range<f64> {
    let pad = (hi - lo).abs() * frac;
    (lo - pad)..(hi + pad)
}

/// Split an index-aligned series into runs of consecutive present values,
/// as `(index, value)` points, so lines break across missing weeks.
pub fn contiguous_runs(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut runs: Vec<Vec<(f64, f64)>> = Vec::new();
    let mut cur: Vec<(f64, f64)> = Vec::new();
    for (i, v) in values.iter().enumerate() {
        match v {
            Some(y) => cur.push((i as f64, *y)),
            None if !cur.is_empty() => runs.push(std::mem::take(&mut cur)),
            None => {}
        }
    }
    if !cur.is_empty() {
        runs.push(cur);
    }
    runs
}

/// Text style for an annotation centered horizontally on its anchor.
pub fn annotation_style(size: u32, color: Rgb8, v_pos: VPos) -> TextStyle<'static> {
    (FontFamily::SansSerif, size as f64)
        .into_font()
        .color(&color.rgb())
        .pos(Pos::new(HPos::Center, v_pos))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_labels_only_on_centers() {
        let labels = vec!["2025-W01".to_string(), "2025-W02".to_string()];
        assert_eq!(category_label(&labels, 0.0), "2025-W01");
        assert_eq!(category_label(&labels, 1.0000000001), "2025-W02");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, -1.0), "");
        assert_eq!(category_label(&labels, 2.0), "");
    }

    #[test]
    fn runs_break_on_gaps() {
        let runs = contiguous_runs(&[Some(1.0), Some(2.0), None, None, Some(3.0)]);
        assert_eq!(runs, vec![vec![(0.0, 1.0), (1.0, 2.0)], vec![(4.0, 3.0)]]);
        assert!(contiguous_runs(&[None, None]).is_empty());
    }

    #[test]
    fn ranges() {
        assert_eq!(category_range(3), -0.5..2.5);
        assert_eq!(category_range(0), -0.5..0.5);
        assert_eq!(padded(0.0, 10.0, 0.1), -1.0..11.0);
    }
}
