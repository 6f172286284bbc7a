use pixel_sprite_sdk::{
    Credential, ErrorClassifier, GenerationError, GenerationErrorKind, ImagePart, FRAME_ACTIONS,
};

#[test]
fn credential_is_trimmed_and_redacted() {
    let credential = Credential::new("  secret-key \n").expect("valid credential");
    assert_eq!(credential.expose(), "secret-key");
    assert_eq!(format!("{credential:?}"), "Credential(***)");
}

#[test]
fn blank_credential_is_rejected() {
    let error = Credential::new("   ").expect_err("blank credential");
    assert!(matches!(error, GenerationError::InvalidInput(_)));
}

#[test]
fn image_part_parses_data_uri() {
    let image = ImagePart::from_data_uri("data:image/webp;base64,UklGRg==").expect("parses");
    assert_eq!(image.mime_type, "image/webp");
    assert_eq!(image.image_data, "UklGRg==");
    assert_eq!(image.data_uri(), "data:image/webp;base64,UklGRg==");
    assert_eq!(image.decode().expect("decodes"), b"RIFF");
}

#[test]
fn image_part_rejects_malformed_uris() {
    for uri in [
        "image/png;base64,AAAA",
        "data:image/png,AAAA",
        "data:;base64,AAAA",
        "data:image/png;base64",
    ] {
        assert!(
            matches!(ImagePart::from_data_uri(uri), Err(GenerationError::Decode(_))),
            "{uri} should be rejected"
        );
    }
}

#[test]
fn image_part_from_bytes_encodes_base64() {
    let image = ImagePart::from_bytes("image/png", b"\x89PNG");
    assert_eq!(image.image_data, "iVBORw==");
}

#[test]
fn frame_actions_are_the_fixed_animation_set() {
    let names: Vec<&str> = FRAME_ACTIONS.iter().map(|a| a.name).collect();
    assert_eq!(
        names,
        vec![
            "idle_01",
            "idle_02",
            "hurt_01",
            "walk_01",
            "walk_02",
            "walk_03",
            "walk_04",
            "run_01",
            "run_02",
            "run_03",
            "run_04",
            "jump_01_takeoff",
            "jump_02_midair",
            "jump_03_landing",
        ]
    );
}

#[test]
fn status_400_is_a_credential_error() {
    let error = GenerationError::StatusCode(
        reqwest::StatusCode::BAD_REQUEST,
        r#"{"error":{"message":"API key not valid. Please pass a valid API key."}}"#.to_string(),
    );
    assert_eq!(error.kind(), GenerationErrorKind::InvalidCredential);
}

#[test]
fn permission_and_quota_errors_are_classified() {
    let forbidden = GenerationError::StatusCode(
        reqwest::StatusCode::FORBIDDEN,
        "Permission denied on resource".to_string(),
    );
    assert_eq!(forbidden.kind(), GenerationErrorKind::QuotaOrPermission);

    let exhausted = GenerationError::StatusCode(
        reqwest::StatusCode::TOO_MANY_REQUESTS,
        "RESOURCE_EXHAUSTED".to_string(),
    );
    assert_eq!(exhausted.kind(), GenerationErrorKind::QuotaOrPermission);
}

#[test]
fn missing_image_data_is_unexpected() {
    let error = GenerationError::Invariant("google", "No image data in response".to_string());
    assert_eq!(error.kind(), GenerationErrorKind::Unexpected);
}

#[test]
fn classifier_markers_are_configurable() {
    let classifier = ErrorClassifier::new(["bad token"], ["slow down"]);
    assert_eq!(
        classifier.classify_message("Server said: BAD TOKEN"),
        GenerationErrorKind::InvalidCredential
    );
    assert_eq!(
        classifier.classify_message("slow down please"),
        GenerationErrorKind::QuotaOrPermission
    );
    assert_eq!(
        classifier.classify_message("API key not valid"),
        GenerationErrorKind::Unexpected
    );
}
