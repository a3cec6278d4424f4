use super::*;
use crate::{
    foundation::core::Placement,
    scene::node::TextStyle,
    theme::{item::ShowType, locale::KeyEcho},
};

fn item(sensor: &str, attribute: &str, unit: Option<&str>, show_unit: bool) -> ThemeItem {
    let mut it = ThemeItem::new(sensor, attribute, ShowType::Text);
    it.unit = unit.map(str::to_owned);
    it.show_unit = Some(show_unit);
    it
}

fn text_node(s: &str) -> Node {
    Node::new(
        NodeKind::Text {
            text: s.to_owned(),
            style: TextStyle::default(),
        },
        Placement::default(),
    )
}

#[test]
fn speeds_scale_by_unit() {
    let v = ItemValue::Number(183_870.0);
    assert_eq!(
        format_text_value(&item("net", "upload_speed", Some("kb/s"), true), &v, &KeyEcho),
        "183.87 kb/s"
    );
    assert_eq!(
        format_text_value(&item("net", "upload_speed", Some("mb/s"), true), &v, &KeyEcho),
        "0.18 mb/s"
    );
    assert_eq!(
        format_text_value(&item("net", "download_speed", Some("kb/s"), false), &v, &KeyEcho),
        "183.87"
    );
}

#[test]
fn speed_ties_round_up() {
    assert_eq!(
        format_text_value(
            &item("net", "upload_speed", Some("kb/s"), true),
            &ItemValue::Number(1_125.0),
            &KeyEcho
        ),
        "1.13 kb/s"
    );
    assert_eq!(
        format_text_value(
            &item("net", "download_speed", Some("mb/s"), false),
            &ItemValue::Number(2_625_000.0),
            &KeyEcho
        ),
        "2.63"
    );
}

#[test]
fn load_is_a_rounded_percent() {
    let it = item("cpu", "load", Some("%"), true);
    assert_eq!(format_text_value(&it, &ItemValue::Number(0.456), &KeyEcho), "46 %");
    assert_eq!(format_text_value(&it, &ItemValue::from("0.5"), &KeyEcho), "50 %");
}

#[test]
fn other_attributes_pass_through() {
    let it = item("gpu", "name", None, true);
    assert_eq!(
        format_text_value(&it, &ItemValue::from("RTX"), &KeyEcho),
        "RTX"
    );
    let t = item("cpu", "temperature", Some("°C"), true);
    assert_eq!(format_text_value(&t, &ItemValue::Number(41.0), &KeyEcho), "41 °C");
}

#[test]
fn weather_text_is_localized_and_normalized() {
    let it = item("weather", "text", None, false);
    let tr = |key: &str| format!("<{key}>");
    assert_eq!(
        format_text_value(&it, &ItemValue::from(WEATHER_PLACEHOLDER), &tr),
        "<label.WatherFakeValue>"
    );
    assert_eq!(
        format_text_value(&it, &ItemValue::from("Sunny 21\u{2103}"), &KeyEcho),
        "Sunny 21\u{b0}C"
    );
}

#[test]
fn update_is_a_noop_for_the_same_string() {
    let mut n = text_node("12");
    assert_eq!(update_text(&mut n, "12".into()).unwrap(), WidgetUpdate::Unchanged);
    assert_eq!(update_text(&mut n, "13".into()).unwrap(), WidgetUpdate::Changed);
    assert_eq!(n.text(), Some("13"));
}

#[test]
fn update_rejects_non_text_nodes() {
    let mut n = Node::new(NodeKind::Rect { rx: 0.0, ry: 0.0 }, Placement::default());
    assert!(matches!(
        update_text(&mut n, "x".into()),
        Err(ThemeError::InvalidScene(_))
    ));
}
