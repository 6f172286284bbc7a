use super::api::{
    Blob, Content, GenerateContentConfig, GenerateContentParameters, GenerateContentResponse,
    ImageGenerationParameters, OutputOptions, Part as GooglePart, PredictInstance,
    PredictParameters, PredictResponse,
};
use crate::{
    client_utils,
    opentelemetry::{trace_generation, GenerationRequestInfo},
    Credential, GenerationError, GenerationResult, ImageContentInput, ImageModel, ImagePart,
    TextToImageInput,
};
use reqwest::{
    header::{HeaderMap, HeaderName, HeaderValue},
    Client,
};
use std::collections::HashMap;

const PROVIDER: &str = "google";
const API_KEY_HEADER: &str = "x-goog-api-key";

pub struct GoogleImageModel {
    base_url: String,
    client: Client,
    headers: HashMap<String, String>,
}

#[derive(Clone, Default)]
pub struct GoogleImageModelOptions {
    pub base_url: Option<String>,
    pub headers: Option<HashMap<String, String>>,
    pub client: Option<Client>,
}

impl GoogleImageModel {
    #[must_use]
    pub fn new(options: GoogleImageModelOptions) -> Self {
        let GoogleImageModelOptions {
            base_url,
            headers,
            client,
        } = options;

        let base_url = base_url
            .unwrap_or_else(|| "https://generativelanguage.googleapis.com/v1beta".to_string())
            .trim_end_matches('/')
            .to_string();
        let client = client.unwrap_or_else(Client::new);
        let headers = headers.unwrap_or_default();

        Self {
            base_url,
            client,
            headers,
        }
    }

    fn request_headers(&self, credential: &Credential) -> GenerationResult<HeaderMap> {
        let mut headers = HeaderMap::new();

        for (key, value) in &self.headers {
            let header_name = HeaderName::from_bytes(key.as_bytes()).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Google header name '{key}': {error}"
                ))
            })?;
            let header_value = HeaderValue::from_str(value).map_err(|error| {
                GenerationError::InvalidInput(format!(
                    "Invalid Google header value for '{key}': {error}"
                ))
            })?;
            headers.insert(header_name, header_value);
        }

        let mut key = HeaderValue::from_str(credential.expose()).map_err(|_| {
            GenerationError::InvalidInput("API key contains invalid characters".to_string())
        })?;
        key.set_sensitive(true);
        headers.insert(API_KEY_HEADER, key);

        Ok(headers)
    }
}

#[async_trait::async_trait]
impl ImageModel for GoogleImageModel {
    fn provider(&self) -> &'static str {
        PROVIDER
    }

    async fn generate_content(
        &self,
        credential: &Credential,
        input: ImageContentInput,
    ) -> GenerationResult<ImagePart> {
        let request = GenerationRequestInfo {
            requested_images: 1,
            has_reference_image: input.image.is_some(),
            temperature: input.temperature,
            top_p: input.top_p,
        };
        let model_id = input.model_id.clone();

        trace_generation(PROVIDER, &model_id, "generate_content", request, || async {
            let url = format!("{}/models/{}:generateContent", self.base_url, model_id);
            let params = convert_to_generate_content_parameters(input);
            let headers = self.request_headers(credential)?;

            let response: GenerateContentResponse =
                client_utils::send_json(&self.client, &url, &params, headers).await?;

            map_generate_content_response(response)
        })
        .await
    }

    async fn generate_images(
        &self,
        credential: &Credential,
        input: TextToImageInput,
    ) -> GenerationResult<Vec<ImagePart>> {
        let request = GenerationRequestInfo {
            requested_images: input.number_of_images,
            ..Default::default()
        };
        let model_id = input.model_id.clone();

        trace_generation(PROVIDER, &model_id, "predict", request, || async {
            let url = format!("{}/models/{}:predict", self.base_url, model_id);
            let output_mime_type = input.output_mime_type.clone();
            let params = convert_to_predict_parameters(input);
            let headers = self.request_headers(credential)?;

            let response: PredictResponse =
                client_utils::send_json(&self.client, &url, &params, headers).await?;

            Ok(map_predict_response(response, &output_mime_type))
        })
        .await
    }
}

pub(crate) fn convert_to_generate_content_parameters(
    input: ImageContentInput,
) -> GenerateContentParameters {
    let mut parts = Vec::with_capacity(2);
    if let Some(image) = input.image {
        parts.push(GooglePart {
            inline_data: Some(Blob {
                data: Some(image.image_data),
                mime_type: Some(image.mime_type),
            }),
            ..Default::default()
        });
    }
    parts.push(GooglePart {
        text: Some(input.prompt),
        ..Default::default()
    });

    GenerateContentParameters {
        contents: vec![Content {
            parts: Some(parts),
            role: Some("user".to_string()),
        }],
        generation_config: Some(GenerateContentConfig {
            temperature: input.temperature,
            top_p: input.top_p,
            response_modalities: Some(vec!["IMAGE".to_string()]),
        }),
    }
}

pub(crate) fn convert_to_predict_parameters(input: TextToImageInput) -> PredictParameters {
    PredictParameters {
        instances: vec![PredictInstance {
            prompt: input.prompt,
        }],
        parameters: ImageGenerationParameters {
            sample_count: Some(input.number_of_images),
            aspect_ratio: Some(input.aspect_ratio),
            output_options: Some(OutputOptions {
                mime_type: Some(input.output_mime_type),
            }),
        },
    }
}

/// Take the first inline image of the first candidate.
pub(crate) fn map_generate_content_response(
    response: GenerateContentResponse,
) -> GenerationResult<ImagePart> {
    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        return Err(GenerationError::Invariant(
            PROVIDER,
            format!("Prompt was blocked: {reason}"),
        ));
    }

    let candidate = response
        .candidates
        .and_then(|c| c.into_iter().next())
        .ok_or_else(|| {
            GenerationError::Invariant(PROVIDER, "No candidate in response".to_string())
        })?;

    candidate
        .content
        .and_then(|c| c.parts)
        .unwrap_or_default()
        .into_iter()
        .filter(|part| part.thought != Some(true))
        .find_map(|part| {
            let blob = part.inline_data?;
            match (blob.data, blob.mime_type) {
                (Some(data), Some(mime_type)) => Some(ImagePart::new(mime_type, data)),
                _ => None,
            }
        })
        .ok_or_else(|| {
            GenerationError::Invariant(
                PROVIDER,
                format!(
                    "No image data in response (finish reason: {})",
                    candidate.finish_reason.as_deref().unwrap_or("unknown")
                ),
            )
        })
}

/// Filtered predictions carry no bytes and are skipped; callers check the
/// count they asked for.
pub(crate) fn map_predict_response(
    response: PredictResponse,
    default_mime_type: &str,
) -> Vec<ImagePart> {
    response
        .predictions
        .into_iter()
        .filter_map(|prediction| {
            let data = prediction.bytes_base64_encoded?;
            let mime_type = prediction
                .mime_type
                .unwrap_or_else(|| default_mime_type.to_string());
            Some(ImagePart::new(mime_type, data))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn generate_content_request_puts_image_before_text() {
        let params = convert_to_generate_content_parameters(ImageContentInput {
            model_id: "gemini-2.5-flash-image".to_string(),
            image: Some(ImagePart::new("image/png", "AAAA")),
            prompt: "draw".to_string(),
            temperature: Some(0.7),
            top_p: None,
        });

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "contents": [{
                    "parts": [
                        { "inlineData": { "data": "AAAA", "mimeType": "image/png" } },
                        { "text": "draw" }
                    ],
                    "role": "user"
                }],
                "generationConfig": {
                    "temperature": 0.7,
                    "responseModalities": ["IMAGE"]
                }
            })
        );
    }

    #[test]
    fn predict_request_uses_imagen_parameter_names() {
        let params = convert_to_predict_parameters(TextToImageInput {
            model_id: "imagen-4.0-generate-001".to_string(),
            prompt: "a king".to_string(),
            number_of_images: 3,
            aspect_ratio: "1:1".to_string(),
            output_mime_type: "image/png".to_string(),
        });

        let value = serde_json::to_value(&params).unwrap();
        assert_eq!(
            value,
            json!({
                "instances": [{ "prompt": "a king" }],
                "parameters": {
                    "sampleCount": 3,
                    "aspectRatio": "1:1",
                    "outputOptions": { "mimeType": "image/png" }
                }
            })
        );
    }

    #[test]
    fn response_without_inline_data_is_an_invariant_error() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "parts": [{ "text": "I cannot draw that." }], "role": "model" },
                "finishReason": "STOP"
            }]
        }))
        .unwrap();

        let error = map_generate_content_response(response).unwrap_err();
        assert!(matches!(error, GenerationError::Invariant("google", _)));
    }

    #[test]
    fn response_image_skips_leading_text_part() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": {
                    "parts": [
                        { "text": "Here is your image" },
                        { "inlineData": { "mimeType": "image/png", "data": "iVBOR" } }
                    ]
                }
            }]
        }))
        .unwrap();

        let image = map_generate_content_response(response).unwrap();
        assert_eq!(image, ImagePart::new("image/png", "iVBOR"));
    }

    #[test]
    fn predict_response_drops_filtered_images() {
        let response: PredictResponse = serde_json::from_value(json!({
            "predictions": [
                { "bytesBase64Encoded": "AAA", "mimeType": "image/png" },
                { "raiFilteredReason": "filtered" },
                { "bytesBase64Encoded": "BBB" }
            ]
        }))
        .unwrap();

        let images = map_predict_response(response, "image/png");
        assert_eq!(
            images,
            vec![
                ImagePart::new("image/png", "AAA"),
                ImagePart::new("image/png", "BBB"),
            ]
        );
    }
}
