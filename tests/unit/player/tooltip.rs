use super::*;
use crate::theme::{item::ShowType, locale::Catalog};

const CANVAS: Canvas = Canvas {
    width: 320,
    height: 240,
};

fn item() -> ThemeItem {
    let mut it = ThemeItem::new("cpu", "load", ShowType::Text);
    it.sensor_label = "CPU".into();
    it.attribute_label = "Load".into();
    it
}

fn at(left: f64, top: f64, width: f64) -> Placement {
    Placement {
        left,
        top,
        width,
        height: 20.0,
        ..Placement::default()
    }
}

#[test]
fn text_joins_localized_labels() {
    let mut cat = Catalog::new();
    cat.insert("label.CPU", "Processor");
    cat.insert("label.Load", "Usage");
    assert_eq!(tooltip_text(&item(), &cat), "Processor - Usage");
}

#[test]
fn sits_above_and_left_of_the_node() {
    assert_eq!(
        tooltip_position(&at(150.0, 100.0, 40.0), (60.0, 18.0), CANVAS),
        (110.0, 80.0)
    );
    let mut centered = at(150.0, 100.0, 40.0);
    centered.origin_x = OriginX::Center;
    centered.scale_x = 2.0;
    assert_eq!(
        tooltip_position(&centered, (60.0, 18.0), CANVAS),
        (110.0, 80.0)
    );
}

#[test]
fn clamped_to_the_canvas() {
    assert_eq!(
        tooltip_position(&at(330.0, 10.0, 0.0), (60.0, 18.0), CANVAS),
        (260.0, 0.0)
    );
    assert_eq!(
        tooltip_position(&at(5.0, 50.0, 40.0), (60.0, 18.0), CANVAS),
        (0.0, 30.0)
    );
}

#[test]
fn node_uses_measured_size_and_tooltip_style() {
    let node = build_tooltip(
        &item(),
        &at(150.0, 100.0, 40.0),
        &crate::theme::locale::KeyEcho,
        Some((70.0, 17.0)),
        CANVAS,
    );
    assert_eq!(node.text(), Some("CPU - Load"));
    assert_eq!(node.placement.width, 70.0);
    assert_eq!(node.placement.height, 17.0);
    let NodeKind::Text { style, .. } = &node.kind else {
        panic!("tooltip must be text");
    };
    assert_eq!(style.font_size, TOOLTIP_FONT_SIZE);
    assert_eq!(style.background, Some(Rgba8::WHITE));
}
