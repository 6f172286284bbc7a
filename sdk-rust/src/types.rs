use crate::{GenerationError, GenerationResult};
use base64::{engine::general_purpose::STANDARD as BASE64_STANDARD, Engine};
use serde::{Deserialize, Serialize};
use std::fmt;

/// The secret the generative image service requires on every call.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Create a credential from user input. Surrounding whitespace is trimmed
    /// and blank input is rejected.
    pub fn new(value: impl Into<String>) -> GenerationResult<Self> {
        let value = value.into();
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(GenerationError::InvalidInput(
                "Credential must not be empty".to_string(),
            ));
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// An image carried inline, as the service sends and receives it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePart {
    /// The MIME type of the image. E.g. "image/jpeg", "image/png".
    pub mime_type: String,
    /// The base64-encoded image data.
    pub image_data: String,
}

impl ImagePart {
    pub fn new(mime_type: impl Into<String>, image_data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            image_data: image_data.into(),
        }
    }

    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, BASE64_STANDARD.encode(bytes))
    }

    /// Parse a `data:<mime>;base64,<data>` URI.
    pub fn from_data_uri(uri: &str) -> GenerationResult<Self> {
        let rest = uri
            .strip_prefix("data:")
            .ok_or_else(|| GenerationError::Decode("Missing data: scheme".to_string()))?;
        let (header, data) = rest
            .split_once(',')
            .ok_or_else(|| GenerationError::Decode("Missing data URI payload".to_string()))?;
        let mime_type = header
            .strip_suffix(";base64")
            .ok_or_else(|| GenerationError::Decode("Data URI is not base64".to_string()))?;
        if mime_type.is_empty() {
            return Err(GenerationError::Decode(
                "Data URI has no MIME type".to_string(),
            ));
        }
        Ok(Self::new(mime_type, data))
    }

    #[must_use]
    pub fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.image_data)
    }

    pub fn decode(&self) -> GenerationResult<Vec<u8>> {
        BASE64_STANDARD
            .decode(&self.image_data)
            .map_err(|e| GenerationError::Decode(format!("Invalid base64 image data: {e}")))
    }
}

/// Input for a single multimodal call that must answer with one image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageContentInput {
    pub model_id: String,
    /// Reference image sent before the text instruction.
    pub image: Option<ImagePart>,
    pub prompt: String,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

/// Input for a text-to-image batch call.
#[derive(Debug, Clone, PartialEq)]
pub struct TextToImageInput {
    pub model_id: String,
    pub prompt: String,
    pub number_of_images: u32,
    /// E.g. "1:1", "3:4".
    pub aspect_ratio: String,
    pub output_mime_type: String,
}

/// A single named animation pose to generate from the base character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAction {
    pub name: &'static str,
    pub description: &'static str,
}

/// The fixed animation set: idle x2, hurt x1, walk x4, run x4, jump x3.
pub const FRAME_ACTIONS: [FrameAction; 14] = [
    FrameAction {
        name: "idle_01",
        description: "a subtle breathing animation, body slightly up, standing still",
    },
    FrameAction {
        name: "idle_02",
        description: "a subtle breathing animation, body slightly down, standing still",
    },
    FrameAction {
        name: "hurt_01",
        description: "reacting to being hit, knocked back slightly with a pained expression",
    },
    FrameAction {
        name: "walk_01",
        description: "a 4-frame walking animation cycle, right foot forward",
    },
    FrameAction {
        name: "walk_02",
        description: "a 4-frame walking animation cycle, passing pose with left foot back",
    },
    FrameAction {
        name: "walk_03",
        description: "a 4-frame walking animation cycle, left foot forward",
    },
    FrameAction {
        name: "walk_04",
        description: "a 4-frame walking animation cycle, passing pose with right foot back",
    },
    FrameAction {
        name: "run_01",
        description:
            "a 4-frame running animation cycle, leaning forward, right foot forward energetically",
    },
    FrameAction {
        name: "run_02",
        description: "a 4-frame running animation cycle, leaning forward, passing pose, left foot back",
    },
    FrameAction {
        name: "run_03",
        description:
            "a 4-frame running animation cycle, leaning forward, left foot forward energetically",
    },
    FrameAction {
        name: "run_04",
        description:
            "a 4-frame running animation cycle, leaning forward, passing pose, right foot back",
    },
    FrameAction {
        name: "jump_01_takeoff",
        description: "preparing to jump, crouching down slightly to gather power",
    },
    FrameAction {
        name: "jump_02_midair",
        description: "in the air at the peak of a jump, legs tucked up",
    },
    FrameAction {
        name: "jump_03_landing",
        description: "landing on the ground, bending knees to absorb impact",
    },
];

/// One generated animation frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpriteFrame {
    pub name: String,
    /// Data URI of the frame image.
    pub url: String,
}

/// Reported once per completed frame while a sprite sheet is generated.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationProgress {
    /// 0 to 100.
    pub percent: f64,
    pub message: String,
}
