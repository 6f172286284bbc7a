use crate::{FileStorage, PersistedStore};
use pixel_sprite_sdk::{
    google::{GoogleImageModel, GoogleImageModelOptions},
    GeneratorModels, SpriteGenerator,
};
use std::{env, path::PathBuf, sync::Arc};

pub const DEFAULT_DATA_DIR: &str = ".pixel-sprite";

/// Runtime settings read from the environment.
///
/// - `PIXEL_SPRITE_DATA_DIR`: where the API key and history are stored
/// - `GOOGLE_BASE_URL`: override for the Gemini API endpoint
/// - `PIXEL_SPRITE_PORTRAIT_MODEL`, `PIXEL_SPRITE_TEXT_PORTRAIT_MODEL`,
///   `PIXEL_SPRITE_PIXEL_ART_MODEL`, `PIXEL_SPRITE_FRAME_MODEL`: model ids
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudioConfig {
    pub data_dir: PathBuf,
    pub google_base_url: Option<String>,
    pub models: GeneratorModels,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            google_base_url: None,
            models: GeneratorModels::default(),
        }
    }
}

impl StudioConfig {
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build the config from any variable source. Blank values count as
    /// unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let models = GeneratorModels {
            portrait: var("PIXEL_SPRITE_PORTRAIT_MODEL").unwrap_or(defaults.models.portrait),
            text_portrait: var("PIXEL_SPRITE_TEXT_PORTRAIT_MODEL")
                .unwrap_or(defaults.models.text_portrait),
            pixel_art: var("PIXEL_SPRITE_PIXEL_ART_MODEL").unwrap_or(defaults.models.pixel_art),
            sprite_frame: var("PIXEL_SPRITE_FRAME_MODEL").unwrap_or(defaults.models.sprite_frame),
        };

        Self {
            data_dir: var("PIXEL_SPRITE_DATA_DIR").map_or(defaults.data_dir, PathBuf::from),
            google_base_url: var("GOOGLE_BASE_URL"),
            models,
        }
    }

    #[must_use]
    pub fn generator(&self) -> SpriteGenerator {
        let model = GoogleImageModel::new(GoogleImageModelOptions {
            base_url: self.google_base_url.clone(),
            ..Default::default()
        });
        SpriteGenerator::new(Arc::new(model), self.models.clone())
    }

    #[must_use]
    pub fn store(&self) -> PersistedStore {
        PersistedStore::new(Arc::new(FileStorage::new(self.data_dir.clone())))
    }
}
