use serde::{Deserialize, Serialize};

const VIEWPORT_PADDING: f64 = 24.0;
const ESTIMATED_MODAL_HEIGHT: f64 = 280.0;
const ESTIMATED_HALF_WIDTH: f64 = 180.0;
const ANCHOR_GAP: f64 = 12.0;

/// Bounding box of the clicked tag, in viewport coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct TagRect {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl TagRect {
    #[must_use]
    pub fn bottom(&self) -> f64 {
        self.top + self.height
    }

    #[must_use]
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self {
            width: 1280.0,
            height: 800.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Placement {
    Above,
    Below,
}

/// Where the confirmation prompt is drawn. `y` is the prompt's bottom edge
/// when placed above the tag and its top edge when placed below.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ModalAnchor {
    pub x: f64,
    pub y: f64,
    pub placement: Placement,
}

impl ModalAnchor {
    /// Anchor a prompt next to `rect`, keeping it inside `viewport`.
    ///
    /// The prompt goes below the tag unless there is not enough room there
    /// and more room above.
    #[must_use]
    pub fn near(rect: TagRect, viewport: Viewport) -> Self {
        let space_below = viewport.height - rect.bottom();
        let space_above = rect.top;

        let (placement, y) = if space_below < ESTIMATED_MODAL_HEIGHT + VIEWPORT_PADDING
            && space_above > space_below
        {
            let min_y = VIEWPORT_PADDING + ESTIMATED_MODAL_HEIGHT;
            let y = (rect.top - ANCHOR_GAP)
                .max(min_y)
                .min(viewport.height - VIEWPORT_PADDING);
            (Placement::Above, y)
        } else {
            let max_y = viewport.height - VIEWPORT_PADDING - ESTIMATED_MODAL_HEIGHT;
            let y = (rect.bottom() + ANCHOR_GAP)
                .min(max_y)
                .max(VIEWPORT_PADDING);
            (Placement::Below, y)
        };

        let mut x = rect.center_x();
        if x - ESTIMATED_HALF_WIDTH < VIEWPORT_PADDING {
            x = VIEWPORT_PADDING + ESTIMATED_HALF_WIDTH;
        } else if x + ESTIMATED_HALF_WIDTH > viewport.width - VIEWPORT_PADDING {
            x = viewport.width - VIEWPORT_PADDING - ESTIMATED_HALF_WIDTH;
        }

        Self { x, y, placement }
    }
}

/// Asks whether a figure's recommended tags should be added with it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConfirmationPrompt {
    pub figure: String,
    pub recommendations: Vec<String>,
    pub anchor: ModalAnchor,
}

/// Blocking API key dialog. Pre-filled with the current key when reopened.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CredentialPrompt {
    open: bool,
    #[serde(skip)]
    current_key: Option<String>,
}

impl CredentialPrompt {
    pub fn open(&mut self, current_key: Option<&str>) {
        self.open = true;
        self.current_key = current_key.map(str::to_string);
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.open
    }

    #[must_use]
    pub fn current_key(&self) -> Option<&str> {
        self.current_key.as_deref()
    }
}
