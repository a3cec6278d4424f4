use super::*;
use crate::{foundation::error::ThemeError, theme::item::ItemValue};

fn doc(objects: &str) -> SceneDocument {
    SceneDocument::from_json_str(&format!(
        r##"{{"shape":"rect","width":320,"height":240,
             "canvasJSON":{{"background":"#102030","objects":{objects}}}}}"##
    ))
    .unwrap()
}

fn build(objects: &str) -> ThemeResult<LoadedScene> {
    build_scene(&doc(objects), &LoadOptions::default())
}

const BAR: &str = r##"{"type":"group","left":10,"top":10,"width":100,"height":20,
    "objects":[{"type":"rect","width":100,"height":20,"fill":"#333"},
               {"type":"rect","width":0,"height":20,"fill":"#0f0"}],
    "data":{"sensor":"cpu","attribute":"load","showType":"BarChart"}}"##;

#[test]
fn rect_canvas_and_background() {
    let loaded = build("[]").unwrap();
    let s = &loaded.scene;
    assert_eq!(
        s.canvas(),
        Canvas {
            width: 320,
            height: 240
        }
    );
    assert!(s.clip().is_none());
    assert_eq!(s.background(), Some(Rgba8::rgba(0x10, 0x20, 0x30, 255)));
    assert!(loaded.jobs.is_empty());
}

#[test]
fn circle_canvas_is_clipped() {
    let d = SceneDocument::from_json_str(
        r#"{"shape":"circle","radius":120,"canvasJSON":{"objects":[]}}"#,
    )
    .unwrap();
    let s = build_scene(&d, &LoadOptions::default()).unwrap().scene;
    assert_eq!(s.canvas().width, 240);
    assert_eq!(s.canvas().height, 240);
    assert_eq!(
        s.clip(),
        Some(CircleClip {
            cx: 120.0,
            cy: 120.0,
            radius: 120.0
        })
    );
}

#[test]
fn missing_body_or_bad_size_is_invalid() {
    let no_body = SceneDocument::from_json_str(r#"{"shape":"rect","width":10,"height":10}"#).unwrap();
    assert!(matches!(
        build_scene(&no_body, &LoadOptions::default()),
        Err(ThemeError::InvalidScene(_))
    ));
    let zero = SceneDocument::from_json_str(
        r#"{"shape":"rect","width":0,"height":10,"canvasJSON":{"objects":[]}}"#,
    )
    .unwrap();
    assert!(matches!(
        build_scene(&zero, &LoadOptions::default()),
        Err(ThemeError::InvalidScene(_))
    ));
}

#[test]
fn bar_group_is_bound_and_validated() {
    let loaded = build(&format!("[{BAR}]")).unwrap();
    let ids = loaded.scene.bound_ids();
    assert_eq!(ids.len(), 1);
    let node = loaded.scene.get(ids[0]).unwrap();
    assert_eq!(node.children().unwrap().len(), 2);
    assert_eq!(
        loaded.scene.item(ids[0]).unwrap().show_type,
        ShowType::BarChart
    );
}

#[test]
fn wrong_shape_for_show_type_fails_the_load() {
    let err = build(
        r#"[{"type":"rect","data":{"sensor":"cpu","attribute":"load","showType":"DonutChart"}}]"#,
    )
    .unwrap_err();
    match err {
        ThemeError::InvalidScene(msg) => assert!(msg.contains("two circles"), "{msg}"),
        other => panic!("unexpected {other:?}"),
    }
}

#[test]
fn unknown_show_type_and_primitive_fail() {
    assert!(matches!(
        build(r#"[{"type":"text","data":{"sensor":"cpu","attribute":"x","showType":"Gauge"}}]"#),
        Err(ThemeError::InvalidScene(_))
    ));
    assert!(matches!(
        build(r#"[{"type":"polygon"}]"#),
        Err(ThemeError::InvalidScene(_))
    ));
}

#[test]
fn unbound_data_is_not_validated() {
    let loaded = build(r#"[{"type":"rect","data":{"note":"decor"}}]"#).unwrap();
    assert!(loaded.scene.bound_ids().is_empty());
    assert_eq!(loaded.scene.len(), 1);
}

#[test]
fn text_styles_are_read() {
    let loaded = build(
        r##"[{"type":"textbox","text":"hi","fill":"#ff0000","fontSize":22,"textAlign":"center",
              "fontFamily":"Mono","originX":"center","originY":"center"}]"##,
    )
    .unwrap();
    let (_, node) = loaded.scene.iter().next().unwrap();
    assert_eq!(node.placement.origin_x, OriginX::Center);
    assert_eq!(node.placement.origin_y, OriginY::Center);
    match &node.kind {
        NodeKind::Text { text, style } => {
            assert_eq!(text, "hi");
            assert_eq!(style.fill, Rgba8::rgba(255, 0, 0, 255));
            assert_eq!(style.font_size, 22.0);
            assert_eq!(style.align, TextAlign::Center);
            assert!(style.wrap);
        }
        _ => panic!("expected text"),
    }
    assert!(node.paint.fill.is_none());
}

#[test]
fn static_images_get_one_load_each() {
    let loaded = build(
        r#"[{"type":"image","src":"a.png","width":5,"height":5},{"type":"image","src":""}]"#,
    )
    .unwrap();
    assert_eq!(loaded.jobs.len(), 1);
    assert_eq!(loaded.jobs[0].source, "a.png");
    assert_eq!(loaded.jobs[0].kind, LoadKind::Static { adopt_size: false });
}

#[test]
fn animated_media_requests_sprite_then_preview() {
    let loaded = build(
        r#"[{"type":"image","src":"placeholder.png",
             "data":{"sensor":"frontend","attribute":"custom_image","showType":"Image",
                     "value":{"type":"image/gif","src":"anim.gif"}}}]"#,
    )
    .unwrap();
    assert_eq!(loaded.jobs.len(), 2);
    assert_eq!(loaded.jobs[0].source, "anim.gif");
    assert!(matches!(
        loaded.jobs[0].kind,
        LoadKind::Sprite(SpriteLimits {
            max_width: Some(320),
            max_height: Some(240),
            ..
        })
    ));
    assert_eq!(loaded.jobs[1].kind, LoadKind::Preview);

    let id = loaded.jobs[0].node;
    let img = loaded.scene.get(id).unwrap().image().unwrap();
    assert!(img.ticket.is_some());
    assert!(img.preview_ticket.is_some());
    assert!(matches!(
        loaded.scene.item(id).unwrap().value,
        Some(ItemValue::Media(_))
    ));
}

#[test]
fn paint_defaults_follow_the_document() {
    let loaded = build(
        r#"[{"type":"rect"},{"type":"rect","fill":null,"stroke":"blue","strokeWidth":3,
             "strokeDashArray":[5,2]},{"type":"rect","fill":"transparent"}]"#,
    )
    .unwrap();
    let nodes: Vec<_> = loaded.scene.iter().map(|(_, n)| n).collect();
    assert_eq!(nodes[0].paint.fill, Some(Rgba8::BLACK));
    assert_eq!(nodes[1].paint.fill, None);
    assert_eq!(nodes[1].paint.stroke, Some(Rgba8::rgba(0, 0, 255, 255)));
    assert_eq!(nodes[1].paint.stroke_width, 3.0);
    assert_eq!(nodes[1].paint.dash.as_slice(), &[5.0, 2.0]);
    assert_eq!(nodes[2].paint.fill, None);
}

#[test]
fn circles_fill_their_box_from_radius() {
    let loaded = build(r#"[{"type":"circle","radius":15,"startAngle":-90,"endAngle":90}]"#).unwrap();
    let (_, node) = loaded.scene.iter().next().unwrap();
    assert_eq!(node.placement.width, 30.0);
    match node.kind {
        NodeKind::Circle {
            radius,
            start_angle,
            end_angle,
        } => {
            assert_eq!(radius, 15.0);
            assert_eq!(start_angle, -90.0);
            assert_eq!(end_angle, 90.0);
        }
        _ => panic!("expected circle"),
    }
}

#[test]
fn weather_icons_may_start_without_a_source() {
    let loaded = build(
        r#"[{"type":"image","width":8,"height":8,"src":"",
             "data":{"sensor":"weather","attribute":"icon","showType":"Image"}}]"#,
    )
    .unwrap();
    assert_eq!(loaded.scene.bound_ids().len(), 1);
    assert!(loaded.jobs.is_empty());

    assert!(matches!(
        build(
            r#"[{"type":"image","width":8,"height":8,"src":"",
                 "data":{"sensor":"cpu","attribute":"load","showType":"Image"}}]"#,
        ),
        Err(ThemeError::InvalidScene(_))
    ));
}
