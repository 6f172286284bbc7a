use pixel_sprite_sdk::{ImagePart, SpriteFrame};
use pixel_sprite_studio::{
    asset_file_name, export_assets,
    upload::{load_upload, mime_type_for_path, validate_upload},
    Asset, ExportRequest, StudioError,
};
use std::path::Path;

#[test]
fn asset_names_are_sanitized() {
    assert_eq!(
        asset_file_name("Joan of Arc", Asset::Portrait),
        "joan_of_arc_portrait.png"
    );
    assert_eq!(
        asset_file_name("AC/DC: \"Live\"?", Asset::PixelCharacter),
        "ac_dc___live___pixel_char.png"
    );
    assert_eq!(
        asset_file_name("이순신", Asset::Frame("walk_01")),
        "이순신_walk_01.png"
    );
}

#[test]
fn export_skips_missing_images() {
    let dir = tempfile::tempdir().expect("tempdir");
    let base = ImagePart::from_bytes("image/png", b"base").data_uri();
    let frames = vec![SpriteFrame {
        name: "idle_01".to_string(),
        url: ImagePart::from_bytes("image/png", b"frame").data_uri(),
    }];

    let written = export_assets(
        dir.path(),
        ExportRequest {
            figure_name: "Cleopatra",
            portrait_url: None,
            base_character_url: Some(base.as_str()),
            frames: &frames,
        },
    )
    .expect("exported");

    assert_eq!(
        written,
        vec![
            dir.path().join("cleopatra_pixel_char.png"),
            dir.path().join("cleopatra_idle_01.png"),
        ]
    );
    assert_eq!(std::fs::read(&written[0]).expect("read"), b"base".to_vec());
}

#[test]
fn export_rejects_non_data_uris() {
    let dir = tempfile::tempdir().expect("tempdir");
    let error = export_assets(
        dir.path(),
        ExportRequest {
            figure_name: "x",
            portrait_url: Some("https://example.com/portrait.png"),
            base_character_url: None,
            frames: &[],
        },
    )
    .expect_err("not inline");

    assert!(matches!(error, StudioError::Generation(_)));
}

#[test]
fn uploads_are_typed_by_extension() {
    assert_eq!(mime_type_for_path(Path::new("a.PNG")), Some("image/png"));
    assert_eq!(mime_type_for_path(Path::new("a.jpeg")), Some("image/jpeg"));
    assert_eq!(mime_type_for_path(Path::new("a.webp")), Some("image/webp"));
    assert_eq!(mime_type_for_path(Path::new("a.gif")), None);
    assert_eq!(mime_type_for_path(Path::new("noext")), None);
}

#[test]
fn load_upload_reads_supported_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("face.jpg");
    std::fs::write(&path, b"jpeg bytes").expect("write");

    let image = load_upload(&path).expect("loaded");
    assert_eq!(image.mime_type, "image/jpeg");
    assert_eq!(image.decode().expect("decodes"), b"jpeg bytes".to_vec());
}

#[test]
fn load_upload_rejects_other_types() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("face.gif");
    std::fs::write(&path, b"GIF89a").expect("write");

    assert!(matches!(load_upload(&path), Err(StudioError::InvalidInput(_))));
}

#[test]
fn validate_upload_checks_mime_type() {
    let png = ImagePart::new("image/png", "iVBORw0KGgo=");
    assert_eq!(validate_upload(png.clone()).expect("accepted"), png);

    assert!(matches!(
        validate_upload(ImagePart::new("image/svg+xml", "PHN2Zz4=")),
        Err(StudioError::InvalidInput(_))
    ));
}
