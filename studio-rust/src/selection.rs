use crate::{
    lookup_recommendations, parse_tag_text, ConfirmationPrompt, ModalAnchor, Tag, TagCatalog,
    TagRect, Viewport,
};
use serde::Serialize;

/// Tag selected when the intro screen opens without prior input.
pub const DEFAULT_TAG: &str = "전신샷";

/// What a tag click did to the selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ClickOutcome {
    Deselected,
    Added,
    /// A figure with recommendations was clicked. Nothing changes until the
    /// prompt is confirmed or cancelled.
    Prompted,
}

/// The selected tag names and the comma-separated text field that mirrors
/// them.
///
/// Editing the text re-derives the names. Every other change re-derives the
/// text. At most one figure is selected at a time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TagSelection {
    names: Vec<String>,
    text: String,
    pending: Option<ConfirmationPrompt>,
}

impl Default for TagSelection {
    fn default() -> Self {
        Self::new("")
    }
}

impl TagSelection {
    /// Start from `initial_text`, or from [`DEFAULT_TAG`] when it is blank.
    #[must_use]
    pub fn new(initial_text: &str) -> Self {
        let mut selection = Self {
            names: Vec::new(),
            text: String::new(),
            pending: None,
        };
        if initial_text.trim().is_empty() {
            selection.insert(DEFAULT_TAG);
        } else {
            selection.set_text(initial_text);
        }
        selection.sync_text();
        selection
    }

    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|selected| selected == name)
    }

    #[must_use]
    pub fn pending(&self) -> Option<&ConfirmationPrompt> {
        self.pending.as_ref()
    }

    /// Replace the text field. The text is kept as typed.
    pub fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.names.clear();
        for name in parse_tag_text(text) {
            self.insert(&name);
        }
    }

    pub fn click(
        &mut self,
        catalog: &TagCatalog,
        tag: &Tag,
        rect: TagRect,
        viewport: Viewport,
    ) -> ClickOutcome {
        if self.contains(&tag.name) {
            self.names.retain(|name| name != &tag.name);
            self.sync_text();
            return ClickOutcome::Deselected;
        }

        if tag.is_figure() {
            let recommendations = lookup_recommendations(catalog, tag);
            if !recommendations.is_empty() {
                self.pending = Some(ConfirmationPrompt {
                    figure: tag.name.clone(),
                    recommendations,
                    anchor: ModalAnchor::near(rect, viewport),
                });
                return ClickOutcome::Prompted;
            }
            self.evict_figures(catalog);
        }

        self.insert(&tag.name);
        self.sync_text();
        ClickOutcome::Added
    }

    /// Add the pending figure with its recommendations. Returns `false` when
    /// no prompt is open.
    pub fn confirm(&mut self, catalog: &TagCatalog) -> bool {
        let Some(prompt) = self.pending.take() else {
            return false;
        };

        self.evict_figures(catalog);
        self.insert(&prompt.figure);
        for name in &prompt.recommendations {
            self.insert(name);
        }
        self.sync_text();
        true
    }

    /// Add only the pending figure. Returns `false` when no prompt is open.
    pub fn cancel(&mut self, catalog: &TagCatalog) -> bool {
        let Some(prompt) = self.pending.take() else {
            return false;
        };

        self.evict_figures(catalog);
        self.insert(&prompt.figure);
        self.sync_text();
        true
    }

    fn insert(&mut self, name: &str) {
        if !self.contains(name) {
            self.names.push(name.to_string());
        }
    }

    fn evict_figures(&mut self, catalog: &TagCatalog) {
        self.names.retain(|name| !catalog.is_figure(name));
    }

    fn sync_text(&mut self) {
        self.text = self.names.join(", ");
    }
}
