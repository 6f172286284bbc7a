use pixel_sprite_sdk::SpriteFrame;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardStep {
    Intro,
    PortraitGeneration,
    PixelArtSelection,
    SpriteGeneration,
    Finished,
    History,
}

impl WizardStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Intro => "intro",
            Self::PortraitGeneration => "portrait_generation",
            Self::PixelArtSelection => "pixel_art_selection",
            Self::SpriteGeneration => "sprite_generation",
            Self::Finished => "finished",
            Self::History => "history",
        }
    }
}

/// One finished run of the whole pipeline. Never modified once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Creation {
    /// Creation time in Unix milliseconds.
    pub id: i64,
    pub figure_name: String,
    pub portrait_url: String,
    pub base_character_url: String,
    pub frames: Vec<SpriteFrame>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadingState {
    pub is_loading: bool,
    pub message: String,
}
