use super::*;
use crate::{foundation::core::Placement, theme::item::ShowType};

fn ring(radius: f64, start: f64, end: f64) -> Node {
    Node::new(
        NodeKind::Circle {
            radius,
            start_angle: start,
            end_angle: end,
        },
        Placement::default(),
    )
}

fn donut() -> Node {
    Node::new(
        NodeKind::Group {
            children: vec![ring(10.0, 0.0, 360.0), ring(10.0, 0.0, 0.0)],
        },
        Placement::default(),
    )
}

fn item() -> ThemeItem {
    ThemeItem::new("cpu", "load", ShowType::DonutChart)
}

#[test]
fn full_ring_dashes_sum_to_the_circumference() {
    let geo = donut_geometry(10.0, 360.0, 1.0, 5.0, 0.0);
    let sum: f64 = geo.dash.iter().sum();
    assert!((sum - 2.0 * PI * 10.0).abs() < 1e-6, "{sum}");
    assert_eq!(geo.sweep_deg, 360.0);
}

#[test]
fn dash_ends_with_the_partial_segment() {
    assert_eq!(donut_dash(12.0, 5.0, 1.0).as_slice(), &[5.0, 1.0, 5.0, 1.0]);
    assert_eq!(donut_dash(13.0, 5.0, 1.0).as_slice(), &[5.0, 1.0, 5.0, 1.0, 1.0]);
    assert_eq!(donut_dash(3.0, 5.0, 0.0).as_slice(), &[3.0]);
    assert!(donut_dash(0.0, 5.0, 0.0).is_empty());
    assert!(donut_dash(10.0, 0.0, 0.0).is_empty());
}

#[test]
fn partial_background_sweep_scales_the_circumference() {
    let geo = donut_geometry(10.0, 180.0, 0.5, 5.0, 0.0);
    assert_eq!(geo.sweep_deg, 90.0);
    let sum: f64 = geo.dash.iter().sum();
    assert!((sum - PI * 10.0 * 0.5).abs() < 1e-9);
}

#[test]
fn values_are_clamped() {
    assert_eq!(donut_geometry(10.0, 360.0, 2.0, 5.0, 0.0).sweep_deg, 360.0);
    assert_eq!(donut_geometry(10.0, 360.0, -1.0, 5.0, 0.0).sweep_deg, 0.0);
}

#[test]
fn sweep_wraps_negative_spans() {
    assert_eq!(arc_sweep_deg(0.0, 360.0), 360.0);
    assert_eq!(arc_sweep_deg(-90.0, 270.0), 360.0);
    assert_eq!(arc_sweep_deg(135.0, 45.0), 270.0);
    assert_eq!(arc_sweep_deg(10.0, 10.0), 0.0);
}

#[test]
fn update_sets_end_angle_and_dash() {
    let mut n = donut();
    assert_eq!(
        update_donut(&mut n, &item(), 0.25).unwrap(),
        WidgetUpdate::Changed
    );
    let fg = &n.children().unwrap()[1];
    match fg.kind {
        NodeKind::Circle { end_angle, .. } => assert_eq!(end_angle, 90.0),
        _ => unreachable!(),
    }
    let sum: f64 = fg.paint.dash.iter().sum();
    assert!((sum - 2.0 * PI * 10.0 * 0.25).abs() < 1e-9);
    assert_eq!(
        update_donut(&mut n, &item(), 0.25).unwrap(),
        WidgetUpdate::Unchanged
    );
}

#[test]
fn configured_segments_are_used_and_zero_falls_back() {
    let mut it = item();
    it.segment_width = Some(2.0);
    it.segment_gap = Some(1.0);
    let mut n = donut();
    update_donut(&mut n, &it, 0.1).unwrap();
    assert_eq!(n.children().unwrap()[1].paint.dash[..2], [2.0, 1.0]);

    it.segment_width = Some(0.0);
    let mut n = donut();
    update_donut(&mut n, &it, 1.0).unwrap();
    assert_eq!(n.children().unwrap()[1].paint.dash[0], DEFAULT_SEGMENT_WIDTH);
}
