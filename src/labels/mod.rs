//! Value labels for line points that stay clear of the bar labels below them.

pub mod placement;
pub mod surface;

pub use placement::{
    LabelConfig, LabelFormat, LabelSink, PixelSpace, PixelYAxis, PlacedLabel, Placement, Region,
    decide, place_labels,
};
pub use surface::ChartSpace;
