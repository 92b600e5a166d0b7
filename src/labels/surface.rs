//! Plotters implementation of the placement seams.
//!
//! One `ChartSpace` wraps one coordinate system of a chart: the primary axis of
//! a dual-axis chart is `ChartSpace::new(&chart)`, the secondary one is
//! `ChartSpace::new(chart.borrow_secondary())`. The space is `Copy`, so the
//! same axis can act as pixel transform and as label sink in one call.
//!
//! ```ignore
//! let bars = ChartSpace::new(&chart);
//! let line = ChartSpace::new(chart.borrow_secondary());
//! let (mut line_px, mut line_sink, mut bar_px) = (line, line, bars);
//! place_labels(&points, &weights, &tops, &mut line_px, &mut bar_px, &mut line_sink, &cfg)?;
//! ```

use plotters::coord::CoordTranslate;
use plotters::prelude::*;
use plotters::style::FontFamily;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use super::placement::{LabelSink, PixelSpace, PixelYAxis, PlacedLabel, Placement};
use crate::error::{LabelError, LabelResult};

pub struct ChartSpace<'c, 'a, DB, CT>
where
    DB: DrawingBackend,
    CT: CoordTranslate,
{
    chart: &'c ChartContext<'a, DB, CT>,
}

impl<'c, 'a, DB, CT> ChartSpace<'c, 'a, DB, CT>
where
    DB: DrawingBackend,
    CT: CoordTranslate,
{
    pub fn new(chart: &'c ChartContext<'a, DB, CT>) -> Self {
        Self { chart }
    }
}

impl<DB, CT> Clone for ChartSpace<'_, '_, DB, CT>
where
    DB: DrawingBackend,
    CT: CoordTranslate,
{
    fn clone(&self) -> Self {
        *self
    }
}

impl<DB, CT> Copy for ChartSpace<'_, '_, DB, CT>
where
    DB: DrawingBackend,
    CT: CoordTranslate,
{
}

impl<DB, CT> PixelSpace for ChartSpace<'_, '_, DB, CT>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    // Plotters fixes the pixel layout when the chart context is built, so
    // there is nothing left to flush here.
    fn finalize_layout(&mut self) {}

    fn to_pixel(&self, point: (f64, f64)) -> (f64, f64) {
        let (x, y) = self.chart.as_coord_spec().translate(&point);
        (x as f64, y as f64)
    }

    fn y_axis(&self) -> PixelYAxis {
        PixelYAxis::Down
    }
}

impl<DB, CT> LabelSink for ChartSpace<'_, '_, DB, CT>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    fn draw_label(&mut self, label: &PlacedLabel) -> LabelResult<()> {
        let v_pos = match label.placement {
            Placement::Below => VPos::Top,
            _ => VPos::Bottom,
        };
        let style = (FontFamily::SansSerif, label.font_size as f64)
            .into_font()
            .color(&label.color.rgb())
            .pos(Pos::new(HPos::Center, v_pos));
        let dy = label.pixel_dy.round() as i32;

        self.chart
            .plotting_area()
            .draw(&(EmptyElement::at(label.anchor) + Text::new(label.text.clone(), (0, dy), style)))
            .map_err(|e| LabelError::Render(format!("{:?}", e)))
    }
}
