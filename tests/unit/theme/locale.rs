use super::*;

#[test]
fn catalog_flattens_nested_keys() {
    let cat = Catalog::from_json_str(
        r#"{"label": {"CPU": "处理器", "WatherFakeValue": "晴\n25°C"}, "n": 3}"#,
    )
    .unwrap();
    assert_eq!(cat.translate("label.CPU"), "处理器");
    assert_eq!(cat.translate("label.WatherFakeValue"), "晴\n25°C");
    assert_eq!(cat.translate("n"), "3");
    assert_eq!(cat.len(), 3);
}

#[test]
fn missing_keys_echo_back() {
    let cat = Catalog::new();
    assert_eq!(cat.translate("label.Load"), "label.Load");
    assert_eq!(KeyEcho.translate("label.Load"), "Load");
}

#[test]
fn closures_translate() {
    let t = |k: &str| k.to_uppercase();
    assert_eq!(t.translate("label.x"), "LABEL.X");
}
