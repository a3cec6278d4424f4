use super::*;

#[test]
fn parses_nested_objects_and_skips_scalars() {
    let snap = SensorSnapshot::from_json_str(
        r#"{"cpu": {"load": 0.42, "name": "x86"}, "beauty": 3, "weather": {"icon": "02d"}}"#,
    )
    .unwrap();
    assert_eq!(snap.get("cpu", "load"), Some(ItemValue::Number(0.42)));
    assert_eq!(snap.get("weather", "icon"), Some(ItemValue::from("02d")));
    assert_eq!(snap.get("beauty", "x"), None);
    assert_eq!(snap.sensors().count(), 2);
}

#[test]
fn null_and_missing_are_absent() {
    let snap = SensorSnapshot::new().with("gpu", "temperature", serde_json::Value::Null);
    assert_eq!(snap.get("gpu", "temperature"), None);
    assert_eq!(snap.get("gpu", "load"), None);
    assert_eq!(snap.get("ram", "load"), None);
}

#[test]
fn rejects_non_object_roots() {
    assert!(matches!(
        SensorSnapshot::from_json_str("[1,2]"),
        Err(ThemeError::Serde(_))
    ));
    assert!(matches!(
        SensorSnapshot::from_json_str("{"),
        Err(ThemeError::Serde(_))
    ));
}
