use fitviz::labels::{
    LabelConfig, PixelSpace, PixelYAxis, PlacedLabel, Placement, Region, decide, place_labels,
};
use fitviz::{LabelError, style};

/// Linear y scale onto a surface `height` pixels tall, pixel y growing downward.
struct Linear {
    lo: f64,
    hi: f64,
    height: f64,
}

impl PixelSpace for Linear {
    fn to_pixel(&self, (x, y): (f64, f64)) -> (f64, f64) {
        (x, self.height * (1.0 - (y - self.lo) / (self.hi - self.lo)))
    }
}

fn weight_axis() -> Linear {
    Linear { lo: 70.0, hi: 90.0, height: 400.0 }
}

fn kcal_axis() -> Linear {
    Linear { lo: 0.0, hi: 3000.0, height: 400.0 }
}

#[test]
fn labels_avoid_bar_tops_on_a_dual_axis_chart() {
    let anchors = [(0.0, 80.0), (1.0, 84.0), (2.0, 76.0)];
    let values = [80.0, 84.0, 76.0];
    let regions = [
        Region::new(0.0, 1500.0),
        Region::new(1.0, 2250.0),
        Region::new(2.0, 600.0),
    ];
    let cfg = LabelConfig::default().with_decimals(1).with_color(style::ORANGE);
    let mut sink: Vec<PlacedLabel> = Vec::new();

    let decisions = place_labels(
        &anchors,
        &values,
        &regions,
        &mut weight_axis(),
        &mut kcal_axis(),
        &mut sink,
        &cfg,
    )
    .unwrap();

    // 80 kg and 1500 kcal share pixel row 200: both sides are 10 px away.
    assert_eq!(
        decisions,
        vec![Placement::Suppressed, Placement::Below, Placement::Above]
    );
    assert_eq!(sink.len(), 2);
    assert_eq!(sink[0].index, 1);
    assert_eq!(sink[0].text, "84.0");
    assert_eq!(sink[0].pixel_dy, 10.0);
    assert_eq!(sink[1].index, 2);
    assert_eq!(sink[1].text, "76.0");
    assert_eq!(sink[1].pixel_dy, -10.0);
    assert!(sink.iter().all(|l| l.color == style::ORANGE));
}

#[test]
fn wider_clearance_suppresses_more() {
    let anchors = [(0.0, 76.0)];
    let regions = [Region::new(0.0, 600.0)];
    let cfg = LabelConfig::default().with_min_pixel_distance(80.0);
    let mut sink: Vec<PlacedLabel> = Vec::new();
    let decisions = place_labels(
        &anchors,
        &[76.0],
        &regions,
        &mut weight_axis(),
        &mut kcal_axis(),
        &mut sink,
        &cfg,
    )
    .unwrap();
    assert_eq!(decisions, vec![Placement::Suppressed]);
    assert!(sink.is_empty());
}

#[test]
fn decisions_in_both_pixel_conventions() {
    let cfg = LabelConfig::default();
    // Bar top 5 px above the point on a downward surface: above collides.
    assert_eq!(decide(100.0, 95.0, PixelYAxis::Down, &cfg), Placement::Below);
    // Bar top 30 px away: above is clear.
    assert_eq!(decide(100.0, 130.0, PixelYAxis::Down, &cfg), Placement::Above);
    // Upward surface with the bar top level with the point: both sides collide.
    assert_eq!(decide(100.0, 100.0, PixelYAxis::Up, &cfg), Placement::Suppressed);
    // Bar top 2 px below the point: the raised label clears it by exactly 12 px.
    assert_eq!(decide(100.0, 98.0, PixelYAxis::Up, &cfg), Placement::Above);
}

#[test]
fn misaligned_inputs_are_rejected_before_drawing() {
    let mut sink: Vec<PlacedLabel> = Vec::new();
    let err = place_labels(
        &[(0.0, 80.0), (1.0, 81.0), (2.0, 82.0)],
        &[80.0, 81.0, 82.0],
        &[Region::new(0.0, 1.0), Region::new(1.0, 1.0)],
        &mut weight_axis(),
        &mut kcal_axis(),
        &mut sink,
        &LabelConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, LabelError::InvalidInput(_)));
    assert!(sink.is_empty());
}

#[test]
fn empty_input_places_nothing() {
    let mut sink: Vec<PlacedLabel> = Vec::new();
    let decisions = place_labels(
        &[],
        &[],
        &[],
        &mut weight_axis(),
        &mut kcal_axis(),
        &mut sink,
        &LabelConfig::default(),
    )
    .unwrap();
    assert!(decisions.is_empty());
    assert!(sink.is_empty());
}
