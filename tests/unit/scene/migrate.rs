use super::*;

fn doc(objects: &str) -> SceneDocument {
    SceneDocument::from_json_str(&format!(
        r#"{{"shape":"rect","width":100,"height":100,"canvasJSON":{{"objects":{objects}}}}}"#
    ))
    .unwrap()
}

#[test]
fn weather_icon_source_is_recomputed_from_code() {
    let mut d = doc(
        r#"[{"type":"image","src":"file:///C:/old/app/weather/02d.png",
             "data":{"sensor":"weather","attribute":"icon","showType":"Image","value":"02d"}}]"#,
    );
    assert_eq!(migrate_document(&mut d), 1);
    let obj = &d.canvas_json.as_ref().unwrap().objects[0];
    assert_eq!(obj.src.as_deref(), Some("./weathericon/02d.png"));
    assert_eq!(migrate_document(&mut d), 0);
}

#[test]
fn other_nodes_are_untouched() {
    let mut d = doc(
        r#"[{"type":"image","src":"a.png","data":{"sensor":"cpu","attribute":"icon","showType":"Image","value":"02d"}},
            {"type":"image","src":"b.png","data":{"sensor":"weather","attribute":"text","showType":"Text","value":"02d"}},
            {"type":"rect"}]"#,
    );
    assert_eq!(migrate_document(&mut d), 0);
    let objs = &d.canvas_json.as_ref().unwrap().objects;
    assert_eq!(objs[0].src.as_deref(), Some("a.png"));
    assert_eq!(objs[1].src.as_deref(), Some("b.png"));
}

#[test]
fn unknown_codes_keep_the_stored_source() {
    let mut d = doc(
        r#"[{"type":"image","src":"keep.png","data":{"sensor":"weather","attribute":"icon","showType":"Image","value":"zz"}}]"#,
    );
    assert_eq!(migrate_document(&mut d), 0);
    assert_eq!(
        d.canvas_json.unwrap().objects[0].src.as_deref(),
        Some("keep.png")
    );
}

#[test]
fn documents_without_scene_are_noops() {
    let mut d = SceneDocument::default();
    assert_eq!(migrate_document(&mut d), 0);
}
