use crate::{
    build_prompt, export_assets, opentelemetry::trace_wizard_step, parse_tag_text,
    upload::validate_upload, ClickOutcome, Creation, CredentialPrompt, ExportRequest, LoadingState, PersistedStore,
    StudioError, StudioResult, TagCatalog, TagRect, TagSelection, Viewport, WizardError,
    WizardStep,
};
use chrono::Utc;
use pixel_sprite_sdk::{
    Credential, ErrorClassifier, GenerationError, ImagePart, SpriteFrame, SpriteGenerator,
};
use serde::Serialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

/// The step-by-step flow from a described figure to a finished sprite sheet.
///
/// Entering a generation step runs its generation immediately. A failed
/// generation moves the wizard one step back and records a [`WizardError`];
/// nothing is ever fatal. Only one step runs at a time because every
/// transition needs `&mut self`.
pub struct Wizard {
    generator: SpriteGenerator,
    store: PersistedStore,
    catalog: Arc<TagCatalog>,
    classifier: ErrorClassifier,

    step: WizardStep,
    selection: TagSelection,
    figure_name: String,
    uploaded_image: Option<ImagePart>,
    portrait_urls: Vec<String>,
    selected_portrait: Option<String>,
    pixel_art_options: Vec<String>,
    selected_pixel_art: Option<String>,
    frames: Vec<SpriteFrame>,
    history: Vec<Creation>,

    credential: Option<Credential>,
    credential_prompt: CredentialPrompt,
    error: Option<WizardError>,
    /// The generation step to re-enter on retry.
    failed_step: Option<WizardStep>,
    loading: watch::Sender<LoadingState>,
}

/// Serializable view of the wizard for front-ends.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WizardSnapshot {
    pub step: WizardStep,
    pub figure_name: String,
    pub has_uploaded_image: bool,
    pub portrait_urls: Vec<String>,
    pub selected_portrait: Option<String>,
    pub pixel_art_options: Vec<String>,
    pub selected_pixel_art: Option<String>,
    pub frames: Vec<SpriteFrame>,
    pub loading: LoadingState,
    pub error: Option<WizardError>,
    pub error_message: Option<String>,
    pub has_credential: bool,
    pub credential_prompt: CredentialPrompt,
    pub selection: TagSelection,
    pub can_retry: bool,
}

impl Wizard {
    /// Create a wizard at the intro step with the stored API key and
    /// history. The API key prompt opens when no key is stored.
    pub fn new(
        generator: SpriteGenerator,
        store: PersistedStore,
        catalog: Arc<TagCatalog>,
    ) -> Self {
        let credential = store.load_credential();
        let history = store.load_history();

        let mut credential_prompt = CredentialPrompt::default();
        if credential.is_none() {
            credential_prompt.open(None);
        }

        let (loading, _) = watch::channel(LoadingState::default());

        Self {
            generator,
            store,
            catalog,
            classifier: ErrorClassifier::default(),
            step: WizardStep::Intro,
            selection: TagSelection::default(),
            figure_name: String::new(),
            uploaded_image: None,
            portrait_urls: Vec::new(),
            selected_portrait: None,
            pixel_art_options: Vec::new(),
            selected_pixel_art: None,
            frames: Vec::new(),
            history,
            credential,
            credential_prompt,
            error: None,
            failed_step: None,
            loading,
        }
    }

    /// Use different markers to recognise credential errors.
    #[must_use]
    pub fn with_classifier(mut self, classifier: ErrorClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    // Credential

    /// Store a new API key. A key-related error is cleared.
    pub fn save_credential(&mut self, key: &str) -> StudioResult<()> {
        let credential = Credential::new(key)?;
        if let Err(error) = self.store.save_credential(&credential) {
            warn!(%error, "failed to persist API key, keeping it for this session");
        }

        self.credential = Some(credential);
        self.credential_prompt.close();
        if self.error.is_some_and(WizardError::is_credential_related) {
            self.error = None;
        }
        info!("API key saved");
        Ok(())
    }

    pub fn open_credential_prompt(&mut self) {
        let current = self.credential.as_ref().map(Credential::expose);
        self.credential_prompt.open(current);
    }

    /// The prompt cannot be dismissed before a key exists.
    pub fn close_credential_prompt(&mut self) -> bool {
        if self.credential.is_none() {
            return false;
        }
        self.credential_prompt.close();
        true
    }

    // Tag selection on the intro step

    pub fn set_tag_text(&mut self, text: &str) {
        self.selection.set_text(text);
    }

    pub fn click_tag(
        &mut self,
        name: &str,
        rect: TagRect,
        viewport: Viewport,
    ) -> StudioResult<ClickOutcome> {
        let tag = self
            .catalog
            .get(name)
            .ok_or_else(|| StudioError::InvalidInput(format!("Unknown tag '{name}'")))?;
        Ok(self.selection.click(&self.catalog, tag, rect, viewport))
    }

    pub fn confirm_recommendations(&mut self) -> bool {
        self.selection.confirm(&self.catalog)
    }

    pub fn cancel_recommendations(&mut self) -> bool {
        self.selection.cancel(&self.catalog)
    }

    // Transitions

    /// Build the prompt from the tag text as typed and start. Repeated names
    /// are kept.
    pub async fn submit(&mut self, image: Option<ImagePart>) -> StudioResult<()> {
        let prompt = build_prompt(&self.catalog, &parse_tag_text(self.selection.text()));
        self.start(&prompt, image).await
    }

    /// Leave the intro step and generate portraits for `prompt` and the
    /// optional reference image.
    pub async fn start(&mut self, prompt: &str, image: Option<ImagePart>) -> StudioResult<()> {
        self.expect_step(&[WizardStep::Intro], "start")?;
        let image = image.map(validate_upload).transpose()?;

        if prompt.trim().is_empty() && image.is_none() {
            self.error = Some(WizardError::MissingInput);
            return Ok(());
        }

        self.figure_name = prompt.to_string();
        self.uploaded_image = image;
        self.enter_portraits().await;
        Ok(())
    }

    /// Generate a fresh set of portraits with the same inputs.
    pub async fn retry_portraits(&mut self) -> StudioResult<()> {
        self.expect_step(&[WizardStep::PortraitGeneration], "regenerate portraits")?;
        if self.figure_name.is_empty() && self.uploaded_image.is_none() {
            return Ok(());
        }
        self.enter_portraits().await;
        Ok(())
    }

    pub async fn select_portrait(&mut self, index: usize) -> StudioResult<()> {
        self.expect_step(&[WizardStep::PortraitGeneration], "select a portrait")?;
        let url = option_at(&self.portrait_urls, index, "portrait")?;
        self.enter_pixel_art(url).await;
        Ok(())
    }

    pub async fn select_pixel_art(&mut self, index: usize) -> StudioResult<()> {
        self.expect_step(&[WizardStep::PixelArtSelection], "select a pixel art style")?;
        let url = option_at(&self.pixel_art_options, index, "pixel art style")?;
        self.enter_sprites(url).await;
        Ok(())
    }

    /// Re-run the generation that failed last, with the inputs it had. Without
    /// a failure this regenerates portraits.
    pub async fn retry(&mut self) -> StudioResult<()> {
        let target = match self.failed_step {
            Some(step) => step,
            None if self.step == WizardStep::PortraitGeneration => WizardStep::PortraitGeneration,
            None => {
                return Err(StudioError::InvalidTransition {
                    from: self.step,
                    action: "retry",
                })
            }
        };

        match target {
            WizardStep::PortraitGeneration => {
                if self.figure_name.is_empty() && self.uploaded_image.is_none() {
                    return Ok(());
                }
                self.enter_portraits().await;
            }
            WizardStep::PixelArtSelection => {
                let portrait = self.selected_portrait.clone().ok_or(
                    StudioError::InvalidTransition {
                        from: self.step,
                        action: "retry pixel art without a portrait",
                    },
                )?;
                self.enter_pixel_art(portrait).await;
            }
            WizardStep::SpriteGeneration => {
                let base = self.selected_pixel_art.clone().ok_or(
                    StudioError::InvalidTransition {
                        from: self.step,
                        action: "retry sprites without a base character",
                    },
                )?;
                self.enter_sprites(base).await;
            }
            other => {
                return Err(StudioError::InvalidTransition {
                    from: other,
                    action: "retry",
                })
            }
        }
        Ok(())
    }

    /// Clear every transient field and go back to the intro step.
    pub fn start_over(&mut self) {
        debug!(from = self.step.as_str(), "starting over");
        self.step = WizardStep::Intro;
        self.selection = TagSelection::default();
        self.figure_name.clear();
        self.uploaded_image = None;
        self.portrait_urls.clear();
        self.selected_portrait = None;
        self.pixel_art_options.clear();
        self.selected_pixel_art = None;
        self.frames.clear();
        self.error = None;
        self.failed_step = None;
        self.loading.send_replace(LoadingState::default());
    }

    pub fn show_history(&mut self) -> StudioResult<()> {
        self.expect_step(&[WizardStep::Intro, WizardStep::Finished], "show history")?;
        self.error = None;
        self.failed_step = None;
        self.step = WizardStep::History;
        Ok(())
    }

    /// Open a past creation on the finished step without generating anything.
    pub fn select_history(&mut self, id: i64) -> StudioResult<()> {
        self.expect_step(&[WizardStep::Intro, WizardStep::History], "open a creation")?;
        let creation = self
            .history
            .iter()
            .find(|creation| creation.id == id)
            .cloned()
            .ok_or_else(|| StudioError::InvalidInput(format!("No creation with id {id}")))?;

        self.figure_name = creation.figure_name;
        self.selected_portrait = Some(creation.portrait_url);
        self.selected_pixel_art = Some(creation.base_character_url);
        self.frames = creation.frames;
        self.step = WizardStep::Finished;
        Ok(())
    }

    pub fn back_from_history(&mut self) -> StudioResult<()> {
        self.expect_step(&[WizardStep::History], "leave history")?;
        self.start_over();
        Ok(())
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    /// Write the finished creation's images into `dir`.
    pub fn export(&self, dir: &Path) -> StudioResult<Vec<PathBuf>> {
        self.expect_step(&[WizardStep::Finished], "export")?;
        export_assets(
            dir,
            ExportRequest {
                figure_name: &self.figure_name,
                portrait_url: self.selected_portrait.as_deref(),
                base_character_url: self.selected_pixel_art.as_deref(),
                frames: &self.frames,
            },
        )
    }

    // Accessors

    #[must_use]
    pub fn step(&self) -> WizardStep {
        self.step
    }

    #[must_use]
    pub fn selection(&self) -> &TagSelection {
        &self.selection
    }

    #[must_use]
    pub fn catalog(&self) -> &TagCatalog {
        &self.catalog
    }

    #[must_use]
    pub fn figure_name(&self) -> &str {
        &self.figure_name
    }

    #[must_use]
    pub fn uploaded_image(&self) -> Option<&ImagePart> {
        self.uploaded_image.as_ref()
    }

    #[must_use]
    pub fn portrait_urls(&self) -> &[String] {
        &self.portrait_urls
    }

    #[must_use]
    pub fn selected_portrait(&self) -> Option<&str> {
        self.selected_portrait.as_deref()
    }

    #[must_use]
    pub fn pixel_art_options(&self) -> &[String] {
        &self.pixel_art_options
    }

    #[must_use]
    pub fn selected_pixel_art(&self) -> Option<&str> {
        self.selected_pixel_art.as_deref()
    }

    #[must_use]
    pub fn frames(&self) -> &[SpriteFrame] {
        &self.frames
    }

    #[must_use]
    pub fn history(&self) -> &[Creation] {
        &self.history
    }

    #[must_use]
    pub fn error(&self) -> Option<WizardError> {
        self.error
    }

    #[must_use]
    pub fn has_credential(&self) -> bool {
        self.credential.is_some()
    }

    #[must_use]
    pub fn credential_prompt(&self) -> &CredentialPrompt {
        &self.credential_prompt
    }

    #[must_use]
    pub fn loading(&self) -> LoadingState {
        self.loading.borrow().clone()
    }

    /// Follow loading state from another task while a step is running.
    #[must_use]
    pub fn subscribe_loading(&self) -> watch::Receiver<LoadingState> {
        self.loading.subscribe()
    }

    #[must_use]
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            step: self.step,
            figure_name: self.figure_name.clone(),
            has_uploaded_image: self.uploaded_image.is_some(),
            portrait_urls: self.portrait_urls.clone(),
            selected_portrait: self.selected_portrait.clone(),
            pixel_art_options: self.pixel_art_options.clone(),
            selected_pixel_art: self.selected_pixel_art.clone(),
            frames: self.frames.clone(),
            loading: self.loading(),
            error: self.error,
            error_message: self.error.map(|error| error.to_string()),
            has_credential: self.has_credential(),
            credential_prompt: self.credential_prompt.clone(),
            selection: self.selection.clone(),
            can_retry: self.failed_step.is_some()
                || self.step == WizardStep::PortraitGeneration,
        }
    }

    // Generation steps

    async fn enter_portraits(&mut self) {
        let Some(credential) = self.require_credential() else {
            return;
        };
        self.clear_failure();
        self.portrait_urls.clear();
        self.selected_portrait = None;
        self.pixel_art_options.clear();
        self.selected_pixel_art = None;
        self.frames.clear();
        self.step = WizardStep::PortraitGeneration;

        let label = if self.figure_name.is_empty() {
            "the uploaded figure"
        } else {
            self.figure_name.as_str()
        };
        self.begin_loading(format!("Generating portraits of {label}..."));

        let result = trace_wizard_step(
            WizardStep::PortraitGeneration,
            &self.figure_name,
            self.generator.generate_portraits(
                &self.figure_name,
                self.uploaded_image.as_ref(),
                &credential,
            ),
        )
        .await;
        self.end_loading();

        match result {
            Ok(urls) => {
                info!(portraits = urls.len(), "portraits ready");
                self.portrait_urls = urls;
            }
            Err(error) => self.fail(&error, WizardStep::PortraitGeneration, WizardStep::Intro),
        }
    }

    async fn enter_pixel_art(&mut self, portrait: String) {
        let Some(credential) = self.require_credential() else {
            return;
        };
        self.clear_failure();
        self.pixel_art_options.clear();
        self.selected_pixel_art = None;
        self.frames.clear();
        self.selected_portrait = Some(portrait.clone());
        self.step = WizardStep::PixelArtSelection;
        self.begin_loading("Generating pixel art styles...".to_string());

        let result = trace_wizard_step(
            WizardStep::PixelArtSelection,
            &self.figure_name,
            self.generator
                .generate_pixel_art_options(&portrait, &credential),
        )
        .await;
        self.end_loading();

        match result {
            Ok(options) => {
                info!(options = options.len(), "pixel art options ready");
                self.pixel_art_options = options;
            }
            Err(error) => self.fail(
                &error,
                WizardStep::PixelArtSelection,
                WizardStep::PortraitGeneration,
            ),
        }
    }

    async fn enter_sprites(&mut self, base_character: String) {
        let Some(credential) = self.require_credential() else {
            return;
        };
        self.clear_failure();
        self.frames.clear();
        self.selected_pixel_art = Some(base_character.clone());
        self.step = WizardStep::SpriteGeneration;
        self.begin_loading("Preparing to generate sprite frames...".to_string());

        let loading = &self.loading;
        let result = trace_wizard_step(
            WizardStep::SpriteGeneration,
            &self.figure_name,
            self.generator
                .generate_sprite_frames(&base_character, &credential, |progress| {
                    loading.send_modify(|state| {
                        state.message =
                            format!("{} ({}%)", progress.message, progress.percent.round());
                    });
                }),
        )
        .await;
        self.end_loading();

        match result {
            Ok(frames) => {
                info!(frames = frames.len(), "sprite sheet ready");
                self.record_creation(base_character, frames.clone());
                self.frames = frames;
                self.step = WizardStep::Finished;
            }
            Err(error) => self.fail(
                &error,
                WizardStep::SpriteGeneration,
                WizardStep::PixelArtSelection,
            ),
        }
    }

    fn record_creation(&mut self, base_character_url: String, frames: Vec<SpriteFrame>) {
        // Ids double as lookup keys, so keep them unique within a millisecond.
        let now = Utc::now().timestamp_millis();
        let ids = || self.history.iter().map(|creation| creation.id);
        let id = match ids().max() {
            None => now,
            Some(max) => max
                .checked_add(1)
                .map(|next| next.max(now))
                .or_else(|| ids().min().and_then(|min| min.checked_sub(1)))
                .unwrap_or(now),
        };

        self.history.insert(
            0,
            Creation {
                id,
                figure_name: self.figure_name.clone(),
                portrait_url: self.selected_portrait.clone().unwrap_or_default(),
                base_character_url,
                frames,
            },
        );

        if self.store.save_history(&self.history).is_err() {
            debug!("history is kept in memory only");
        }
    }

    fn require_credential(&mut self) -> Option<Credential> {
        if let Some(credential) = &self.credential {
            return Some(credential.clone());
        }
        self.error = Some(WizardError::MissingCredential);
        self.credential_prompt.open(None);
        None
    }

    fn clear_failure(&mut self) {
        self.error = None;
        self.failed_step = None;
    }

    fn fail(&mut self, error: &GenerationError, failed: WizardStep, back_to: WizardStep) {
        error!(%error, step = failed.as_str(), "generation failed");
        self.error = Some(WizardError::from_generation(error, &self.classifier));
        self.failed_step = Some(failed);
        self.step = back_to;
    }

    fn begin_loading(&self, message: String) {
        self.loading.send_replace(LoadingState {
            is_loading: true,
            message,
        });
    }

    fn end_loading(&self) {
        self.loading.send_modify(|state| state.is_loading = false);
    }

    fn expect_step(&self, allowed: &[WizardStep], action: &'static str) -> StudioResult<()> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(StudioError::InvalidTransition {
                from: self.step,
                action,
            })
        }
    }
}

fn option_at(options: &[String], index: usize, what: &str) -> StudioResult<String> {
    options
        .get(index)
        .cloned()
        .ok_or_else(|| StudioError::InvalidInput(format!("No {what} at index {index}")))
}
