use super::*;

#[test]
fn parses_a_minimal_rect_document() {
    let doc = SceneDocument::from_json_str(
        r##"{"shape":"rect","width":480,"height":320,"radius":160,
            "canvasJSON":{"version":"5.3.0","objects":[
                {"type":"rect","left":1,"top":2,"width":3,"height":4,"fill":"#ff0000","data":{"x":1}}
            ]}}"##,
    )
    .unwrap();
    assert_eq!(doc.shape, CanvasShape::Rect);
    let objects = &doc.canvas_json.as_ref().unwrap().objects;
    assert_eq!(objects.len(), 1);
    assert_eq!(objects[0].kind, "rect");
    assert_eq!(PrimitiveDoc::color_str(&objects[0].fill), Some("#ff0000"));
    assert!(doc.canvas_json.unwrap().extra.contains_key("version"));
}

#[test]
fn missing_canvas_json_still_parses() {
    let doc = SceneDocument::from_json_str(r#"{"shape":"circle","radius":120}"#).unwrap();
    assert_eq!(doc.shape, CanvasShape::Circle);
    assert!(doc.canvas_json.is_none());
}

#[test]
fn gradient_fills_and_numeric_origins_do_not_fail_parsing() {
    let doc = SceneDocument::from_json_str(
        r#"{"canvasJSON":{"objects":[{"type":"rect","fill":{"type":"linear"},"originX":0.5}]}}"#,
    )
    .unwrap();
    let obj = &doc.canvas_json.unwrap().objects[0];
    assert_eq!(PrimitiveDoc::color_str(&obj.fill), None);
}

#[test]
fn invalid_json_is_a_serde_error() {
    assert!(matches!(
        SceneDocument::from_json_str("{"),
        Err(ThemeError::Serde(_))
    ));
}

#[test]
fn custom_fonts_roundtrip_through_text() {
    let mut doc = SceneDocument::default();
    doc.custom_fonts
        .insert("Mono".to_owned(), "0001".to_owned());
    let s = doc.to_json_string().unwrap();
    assert!(s.contains("customFonts"));
    let back = SceneDocument::from_json_str(&s).unwrap();
    assert_eq!(back.custom_fonts.get("Mono").map(String::as_str), Some("0001"));
}

#[test]
fn null_paint_is_kept_apart_from_missing_paint() {
    let doc = SceneDocument::from_json_str(
        r#"{"canvasJSON":{"objects":[
            {"type":"circle","fill":null,"stroke":null},
            {"type":"rect"}
        ]}}"#,
    )
    .unwrap();
    let objects = &doc.canvas_json.as_ref().unwrap().objects;
    assert_eq!(objects[0].fill, Some(serde_json::Value::Null));
    assert_eq!(objects[0].stroke, Some(serde_json::Value::Null));
    assert_eq!(objects[1].fill, None);

    let back = serde_json::to_value(&objects[0]).unwrap();
    assert!(back["fill"].is_null());
    assert!(back.as_object().unwrap().contains_key("fill"));
}
