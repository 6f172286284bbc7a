use crate::{Credential, GenerationResult, ImageContentInput, ImagePart, TextToImageInput};

/// A remote service able to produce images.
///
/// The credential is passed per call rather than held by the model so that a
/// single model instance keeps working after the user replaces their key.
#[async_trait::async_trait]
pub trait ImageModel: Send + Sync {
    fn provider(&self) -> &'static str;

    /// Run one multimodal request and return the image it produced.
    async fn generate_content(
        &self,
        credential: &Credential,
        input: ImageContentInput,
    ) -> GenerationResult<ImagePart>;

    /// Run one text-to-image request producing `number_of_images` images.
    async fn generate_images(
        &self,
        credential: &Credential,
        input: TextToImageInput,
    ) -> GenerationResult<Vec<ImagePart>>;
}
