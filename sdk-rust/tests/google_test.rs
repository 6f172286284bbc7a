use pixel_sprite_sdk::{
    google::{GoogleImageModel, GoogleImageModelOptions},
    Credential, GenerationErrorKind, GeneratorModels, ImageContentInput, ImageModel,
    SpriteGenerator, TextToImageInput,
};
use std::{env, sync::Arc, sync::OnceLock};
use tokio::test;

fn google_credential() -> &'static Credential {
    static KEY: OnceLock<Credential> = OnceLock::new();

    KEY.get_or_init(|| {
        dotenvy::dotenv().ok();
        let key = env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set");
        Credential::new(key).expect("GOOGLE_API_KEY must not be blank")
    })
}

fn google_model() -> GoogleImageModel {
    GoogleImageModel::new(GoogleImageModelOptions::default())
}

#[test]
#[ignore = "calls the live Google API"]
async fn google_generate_content_returns_image() {
    let image = google_model()
        .generate_content(
            google_credential(),
            ImageContentInput {
                model_id: GeneratorModels::default().pixel_art,
                prompt: "A tiny pixel art knight on a transparent background.".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect("generate_content succeeds");

    assert!(image.mime_type.starts_with("image/"));
    assert!(!image.decode().expect("valid base64").is_empty());
}

#[test]
#[ignore = "calls the live Google API"]
async fn google_predict_returns_requested_images() {
    let images = google_model()
        .generate_images(
            google_credential(),
            TextToImageInput {
                model_id: GeneratorModels::default().text_portrait,
                prompt: "Portrait of King Sejong, digital painting".to_string(),
                number_of_images: 2,
                aspect_ratio: "1:1".to_string(),
                output_mime_type: "image/png".to_string(),
            },
        )
        .await
        .expect("predict succeeds");

    assert_eq!(images.len(), 2);
}

#[test]
#[ignore = "calls the live Google API"]
async fn google_text_portraits() {
    let generator = SpriteGenerator::new(Arc::new(google_model()), GeneratorModels::default());

    let portraits = generator
        .generate_portraits("Yi Sun-sin, in armor", None, google_credential())
        .await
        .expect("portraits generated");

    assert_eq!(portraits.len(), 3);
    assert!(portraits.iter().all(|p| p.starts_with("data:image/")));
}

#[test]
#[ignore = "calls the live Google API"]
async fn google_invalid_key_is_classified() {
    let credential = Credential::new("not-a-real-key").expect("non-blank");

    let error = google_model()
        .generate_content(
            &credential,
            ImageContentInput {
                model_id: GeneratorModels::default().pixel_art,
                prompt: "pixel art cat".to_string(),
                ..Default::default()
            },
        )
        .await
        .expect_err("invalid key is rejected");

    assert_eq!(error.kind(), GenerationErrorKind::InvalidCredential);
}
