use std::{collections::VecDeque, sync::Mutex};

use crate::{
    Credential, GenerationError, GenerationResult, ImageContentInput, ImageModel, ImagePart,
    TextToImageInput,
};

/// Result for a mocked `generate_content` call.
/// It can either be an image or an error to return.
pub enum MockContentResult {
    Image(ImagePart),
    Error(GenerationError),
}

impl MockContentResult {
    /// Construct a result that yields the provided image.
    pub fn image(image: ImagePart) -> Self {
        Self::Image(image)
    }

    /// Construct a result that yields the provided error.
    pub fn error(error: GenerationError) -> Self {
        Self::Error(error)
    }
}

impl From<ImagePart> for MockContentResult {
    fn from(image: ImagePart) -> Self {
        Self::image(image)
    }
}

impl From<GenerationResult<ImagePart>> for MockContentResult {
    fn from(result: GenerationResult<ImagePart>) -> Self {
        match result {
            Ok(image) => Self::Image(image),
            Err(error) => Self::Error(error),
        }
    }
}

/// Result for a mocked `generate_images` call.
pub enum MockImagesResult {
    Images(Vec<ImagePart>),
    Error(GenerationError),
}

impl From<Vec<ImagePart>> for MockImagesResult {
    fn from(images: Vec<ImagePart>) -> Self {
        Self::Images(images)
    }
}

impl From<GenerationError> for MockImagesResult {
    fn from(error: GenerationError) -> Self {
        Self::Error(error)
    }
}

type ContentResponder = dyn Fn(&ImageContentInput) -> GenerationResult<ImagePart> + Send + Sync;

#[derive(Default)]
struct MockImageModelState {
    mocked_content_results: VecDeque<MockContentResult>,
    mocked_images_results: VecDeque<MockImagesResult>,
    tracked_content_inputs: Vec<ImageContentInput>,
    tracked_images_inputs: Vec<TextToImageInput>,
    tracked_credentials: Vec<String>,
}

impl MockImageModelState {
    fn reset(&mut self) {
        self.tracked_content_inputs.clear();
        self.tracked_images_inputs.clear();
        self.tracked_credentials.clear();
    }

    fn restore(&mut self) {
        self.mocked_content_results.clear();
        self.mocked_images_results.clear();
        self.reset();
    }
}

/// A mock image model for testing that tracks inputs and yields predefined
/// outputs.
///
/// Enqueued results are consumed first. Once the `generate_content` queue is
/// empty the responder, if any, answers instead. This makes concurrent
/// fan-outs testable without depending on the order requests are issued in.
pub struct MockImageModel {
    provider: &'static str,
    responder: Option<Box<ContentResponder>>,
    state: Mutex<MockImageModelState>,
}

impl Default for MockImageModel {
    fn default() -> Self {
        Self {
            provider: "mock",
            responder: None,
            state: Mutex::new(MockImageModelState::default()),
        }
    }
}

impl MockImageModel {
    /// Construct a new mock image model instance.
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `generate_content` calls with `responder` when nothing is
    /// enqueued.
    #[must_use]
    pub fn with_responder<F>(mut self, responder: F) -> Self
    where
        F: Fn(&ImageContentInput) -> GenerationResult<ImagePart> + Send + Sync + 'static,
    {
        self.responder = Some(Box::new(responder));
        self
    }

    /// Override the provider identifier returned by the mock.
    pub fn set_provider(&mut self, provider: &'static str) {
        self.provider = provider;
    }

    /// Convenience to enqueue a single mocked `generate_content` result.
    pub fn enqueue_content<R>(&self, result: R) -> &Self
    where
        R: Into<MockContentResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_content_results.push_back(result.into());
        drop(state);
        self
    }

    /// Convenience to enqueue a single mocked `generate_images` result.
    pub fn enqueue_images<R>(&self, result: R) -> &Self
    where
        R: Into<MockImagesResult>,
    {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.mocked_images_results.push_back(result.into());
        drop(state);
        self
    }

    /// Retrieve the tracked `generate_content` inputs accumulated so far.
    pub fn tracked_content_inputs(&self) -> Vec<ImageContentInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_content_inputs.clone()
    }

    /// Retrieve the tracked `generate_images` inputs accumulated so far.
    pub fn tracked_images_inputs(&self) -> Vec<TextToImageInput> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_images_inputs.clone()
    }

    /// Credentials seen by any call, in call order.
    pub fn tracked_credentials(&self) -> Vec<String> {
        let state = self.state.lock().expect("mock state poisoned");
        state.tracked_credentials.clone()
    }

    /// Reset tracked inputs without touching enqueued results.
    pub fn reset(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.reset();
    }

    /// Clear both tracked inputs and enqueued results.
    pub fn restore(&self) {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.restore();
    }
}

#[async_trait::async_trait]
impl ImageModel for MockImageModel {
    fn provider(&self) -> &'static str {
        self.provider
    }

    async fn generate_content(
        &self,
        credential: &Credential,
        input: ImageContentInput,
    ) -> GenerationResult<ImagePart> {
        let queued = {
            let mut state = self.state.lock().expect("mock state poisoned");
            state.tracked_content_inputs.push(input.clone());
            state
                .tracked_credentials
                .push(credential.expose().to_string());
            state.mocked_content_results.pop_front()
        };

        match queued {
            Some(MockContentResult::Image(image)) => Ok(image),
            Some(MockContentResult::Error(error)) => Err(error),
            None => match &self.responder {
                Some(responder) => responder(&input),
                None => Err(GenerationError::InvalidInput(
                    "no mocked generate_content results available".to_string(),
                )),
            },
        }
    }

    async fn generate_images(
        &self,
        credential: &Credential,
        input: TextToImageInput,
    ) -> GenerationResult<Vec<ImagePart>> {
        let mut state = self.state.lock().expect("mock state poisoned");
        state.tracked_images_inputs.push(input);
        state
            .tracked_credentials
            .push(credential.expose().to_string());

        match state.mocked_images_results.pop_front() {
            Some(MockImagesResult::Images(images)) => Ok(images),
            Some(MockImagesResult::Error(error)) => Err(error),
            None => Err(GenerationError::InvalidInput(
                "no mocked generate_images results available".to_string(),
            )),
        }
    }
}
