use super::*;

#[test]
fn normalize_rel_path_strips_dots_and_rejects_parents() {
    assert_eq!(
        normalize_rel_path("./weathericon/02d.png").unwrap(),
        "weathericon/02d.png"
    );
    assert_eq!(normalize_rel_path("a\\b//c.png").unwrap(), "a/b/c.png");
    assert!(normalize_rel_path("../secret.png").is_err());
    assert!(normalize_rel_path("./").is_err());
}

#[test]
fn classifies_sources() {
    let root = Path::new("/themes/assets");
    assert_eq!(
        AssetSource::parse("./weathericon/01d.png", root).unwrap(),
        AssetSource::File(PathBuf::from("/themes/assets/weathericon/01d.png"))
    );
    assert_eq!(
        AssetSource::parse("/abs/x.gif", root).unwrap(),
        AssetSource::File(PathBuf::from("/abs/x.gif"))
    );
    assert_eq!(
        AssetSource::parse("https://example.com/a.gif", root).unwrap(),
        AssetSource::Remote("https://example.com/a.gif".to_owned())
    );
    assert!(AssetSource::parse("  ", root).is_err());
}

#[test]
fn decodes_base64_and_plain_data_urls() {
    let (mime, bytes) = decode_data_url("data:image/gif;base64,R0lG").unwrap();
    assert_eq!(mime, "image/gif");
    assert_eq!(bytes, b"GIF");

    let (mime, bytes) = decode_data_url("data:text/plain,a%20b").unwrap();
    assert_eq!(mime, "text/plain");
    assert_eq!(bytes, b"a b");

    assert!(decode_data_url("data:image/png;base64").is_err());
    assert!(decode_data_url("data:image/png;base64,!!!").is_err());
}

#[test]
fn missing_files_are_io_errors() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_source_bytes("nope.png", dir.path()).unwrap_err();
    assert!(matches!(err, ThemeError::Io(_)));
}

#[test]
fn reads_relative_files_under_root() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::create_dir_all(dir.path().join("icons")).unwrap();
    std::fs::write(dir.path().join("icons/a.bin"), b"xyz").unwrap();
    assert_eq!(load_source_bytes("./icons/a.bin", dir.path()).unwrap(), b"xyz");
}

#[cfg(not(feature = "remote"))]
#[test]
fn remote_sources_need_the_feature() {
    let err = load_source_bytes("http://localhost/a.png", Path::new(".")).unwrap_err();
    assert!(matches!(err, ThemeError::Io(ref m) if m.contains("remote")));
}
