use crate::{
    prompts, Credential, FrameAction, GenerationError, GenerationProgress, GenerationResult,
    ImageContentInput, ImageModel, ImagePart, SpriteFrame, TextToImageInput, FRAME_ACTIONS,
};
use futures::{future::try_join_all, stream::FuturesUnordered, TryStreamExt};
use std::sync::Arc;
use tracing::{debug, info};

/// Number of portrait and pixel-art options offered at each selection step.
pub const VARIATION_COUNT: u32 = 3;

const PORTRAIT_TEMPERATURE: f64 = 0.7;
const PORTRAIT_TOP_P: f64 = 0.95;
const PORTRAIT_ASPECT_RATIO: &str = "1:1";
const PORTRAIT_MIME_TYPE: &str = "image/png";

/// Model ids used for each generation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratorModels {
    /// Portraits conditioned on an uploaded reference image.
    pub portrait: String,
    /// Text-only portraits.
    pub text_portrait: String,
    pub pixel_art: String,
    pub sprite_frame: String,
}

impl Default for GeneratorModels {
    fn default() -> Self {
        Self {
            portrait: "gemini-2.5-pro".to_string(),
            text_portrait: "imagen-4.0-generate-001".to_string(),
            pixel_art: "gemini-2.5-flash-image".to_string(),
            sprite_frame: "gemini-2.5-flash-image".to_string(),
        }
    }
}

/// Runs the three generation steps of the sprite pipeline.
///
/// Every step fans out concurrent requests and succeeds only if all of them
/// do. The first failure is returned immediately and the remaining in-flight
/// requests are dropped.
#[derive(Clone)]
pub struct SpriteGenerator {
    model: Arc<dyn ImageModel>,
    models: GeneratorModels,
}

impl SpriteGenerator {
    pub fn new(model: Arc<dyn ImageModel>, models: GeneratorModels) -> Self {
        Self { model, models }
    }

    #[must_use]
    pub fn models(&self) -> &GeneratorModels {
        &self.models
    }

    /// Generate [`VARIATION_COUNT`] portraits as data URIs.
    pub async fn generate_portraits(
        &self,
        prompt: &str,
        image: Option<&ImagePart>,
        credential: &Credential,
    ) -> GenerationResult<Vec<String>> {
        info!(with_image = image.is_some(), "generating portraits");

        let images = if let Some(image) = image {
            let requests = (1..=VARIATION_COUNT).map(|variation| {
                self.model.generate_content(
                    credential,
                    ImageContentInput {
                        model_id: self.models.portrait.clone(),
                        image: Some(image.clone()),
                        prompt: prompts::portrait_from_image(prompt, variation),
                        temperature: Some(PORTRAIT_TEMPERATURE),
                        top_p: Some(PORTRAIT_TOP_P),
                    },
                )
            });
            try_join_all(requests).await?
        } else {
            let images = self
                .model
                .generate_images(
                    credential,
                    TextToImageInput {
                        model_id: self.models.text_portrait.clone(),
                        prompt: prompts::portrait_from_text(prompt),
                        number_of_images: VARIATION_COUNT,
                        aspect_ratio: PORTRAIT_ASPECT_RATIO.to_string(),
                        output_mime_type: PORTRAIT_MIME_TYPE.to_string(),
                    },
                )
                .await?;
            if images.len() < VARIATION_COUNT as usize {
                return Err(GenerationError::Invariant(
                    self.model.provider(),
                    format!(
                        "Expected {VARIATION_COUNT} portraits, received {}",
                        images.len()
                    ),
                ));
            }
            images.into_iter().take(VARIATION_COUNT as usize).collect()
        };

        Ok(images.iter().map(ImagePart::data_uri).collect())
    }

    /// Generate [`VARIATION_COUNT`] pixel-art characters from a portrait.
    pub async fn generate_pixel_art_options(
        &self,
        portrait_uri: &str,
        credential: &Credential,
    ) -> GenerationResult<Vec<String>> {
        let portrait = ImagePart::from_data_uri(portrait_uri)?;
        info!("generating pixel art options");

        let requests = (1..=VARIATION_COUNT).map(|variation| {
            self.model.generate_content(
                credential,
                ImageContentInput {
                    model_id: self.models.pixel_art.clone(),
                    image: Some(portrait.clone()),
                    prompt: prompts::pixel_art(variation),
                    ..Default::default()
                },
            )
        });
        let images = try_join_all(requests).await?;

        Ok(images.iter().map(ImagePart::data_uri).collect())
    }

    /// Generate every frame of [`FRAME_ACTIONS`] from the base character.
    ///
    /// `on_progress` runs once per finished frame, in completion order. The
    /// returned frames are in canonical order regardless.
    pub async fn generate_sprite_frames<P>(
        &self,
        base_character_uri: &str,
        credential: &Credential,
        mut on_progress: P,
    ) -> GenerationResult<Vec<SpriteFrame>>
    where
        P: FnMut(GenerationProgress) + Send,
    {
        let base = ImagePart::from_data_uri(base_character_uri)?;
        let total = FRAME_ACTIONS.len();
        info!(frames = total, "generating sprite frames");

        let mut pending: FuturesUnordered<_> = FRAME_ACTIONS
            .iter()
            .enumerate()
            .map(|(index, action)| self.generate_frame(index, *action, &base, credential))
            .collect();

        let mut slots: Vec<Option<SpriteFrame>> = vec![None; total];
        let mut completed = 0usize;

        while let Some((index, frame)) = pending.try_next().await? {
            completed += 1;
            #[allow(clippy::cast_precision_loss)]
            let percent = completed as f64 / total as f64 * 100.0;
            debug!(frame = %frame.name, completed, "sprite frame ready");
            on_progress(GenerationProgress {
                percent,
                message: format!("Generated {}", frame.name),
            });
            slots[index] = Some(frame);
        }

        slots
            .into_iter()
            .collect::<Option<Vec<_>>>()
            .ok_or_else(|| {
                GenerationError::Invariant(
                    self.model.provider(),
                    "Sprite generation finished with missing frames".to_string(),
                )
            })
    }

    async fn generate_frame(
        &self,
        index: usize,
        action: FrameAction,
        base: &ImagePart,
        credential: &Credential,
    ) -> GenerationResult<(usize, SpriteFrame)> {
        let image = self
            .model
            .generate_content(
                credential,
                ImageContentInput {
                    model_id: self.models.sprite_frame.clone(),
                    image: Some(base.clone()),
                    prompt: prompts::sprite_frame(action.name, action.description),
                    ..Default::default()
                },
            )
            .await?;

        Ok((
            index,
            SpriteFrame {
                name: action.name.to_string(),
                url: image.data_uri(),
            },
        ))
    }
}
