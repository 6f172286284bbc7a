use dotenvy::dotenv;
use pixel_sprite_sdk::{
    google::{GoogleImageModel, GoogleImageModelOptions},
    Credential, GeneratorModels, ImagePart, SpriteGenerator,
};
use std::{env, fs, path::Path, sync::Arc};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let credential =
        Credential::new(env::var("GOOGLE_API_KEY").expect("GOOGLE_API_KEY must be set"))
            .expect("GOOGLE_API_KEY must not be blank");
    let figure = env::args()
        .nth(1)
        .unwrap_or_else(|| "King Sejong the Great".to_string());

    let generator = SpriteGenerator::new(
        Arc::new(GoogleImageModel::new(GoogleImageModelOptions::default())),
        GeneratorModels::default(),
    );

    let portraits = generator
        .generate_portraits(&figure, None, &credential)
        .await
        .expect("generate_portraits failed");
    println!("Generated {} portraits", portraits.len());

    let options = generator
        .generate_pixel_art_options(&portraits[0], &credential)
        .await
        .expect("generate_pixel_art_options failed");
    println!("Generated {} pixel art options", options.len());

    let frames = generator
        .generate_sprite_frames(&options[0], &credential, |progress| {
            println!("{} ({:.0}%)", progress.message, progress.percent);
        })
        .await
        .expect("generate_sprite_frames failed");

    let out_dir = Path::new("sprites");
    fs::create_dir_all(out_dir).expect("failed to create output directory");
    for frame in &frames {
        let bytes = ImagePart::from_data_uri(&frame.url)
            .and_then(|image| image.decode())
            .expect("frame is not a valid data URI");
        let path = out_dir.join(format!("{}.png", frame.name));
        fs::write(&path, bytes).expect("failed to write frame");
        println!("Saved {}", path.display());
    }
}
