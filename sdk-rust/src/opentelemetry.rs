use crate::{GenerationResult, ImagePart};
use opentelemetry::trace::Status;
use std::time::Instant;
use tracing::{info_span, Span};
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Request attributes recorded on a generation span.
#[derive(Debug, Clone, Default)]
pub struct GenerationRequestInfo {
    pub requested_images: u32,
    pub has_reference_image: bool,
    pub temperature: Option<f64>,
    pub top_p: Option<f64>,
}

/// Anything a traced call returns that contains images.
pub trait ImageOutput {
    fn image_count(&self) -> usize;
}

impl ImageOutput for ImagePart {
    fn image_count(&self) -> usize {
        1
    }
}

impl ImageOutput for Vec<ImagePart> {
    fn image_count(&self) -> usize {
        self.len()
    }
}

pub struct GenerationSpan {
    span: Span,
    start_time: Instant,
    image_count: Option<usize>,
    request: GenerationRequestInfo,
    ended: bool,
}

impl GenerationSpan {
    pub fn new(
        provider: &str,
        model_id: &str,
        operation: &str,
        request: GenerationRequestInfo,
    ) -> Self {
        let span = info_span!("pixel_sprite.generate");
        span.set_attribute("gen_ai.operation.name", operation.to_string());
        span.set_attribute("gen_ai.provider.name", provider.to_string());
        span.set_attribute("gen_ai.request.model", model_id.to_string());

        Self {
            span,
            start_time: Instant::now(),
            image_count: None,
            request,
            ended: false,
        }
    }

    fn span(&self) -> Span {
        self.span.clone()
    }

    pub async fn instrument_future<F>(&self, future: F) -> F::Output
    where
        F: std::future::Future,
    {
        future.instrument(self.span()).await
    }

    pub fn on_response<T: ImageOutput>(&mut self, output: &T) {
        self.image_count = Some(output.image_count());
    }

    pub fn on_error(&mut self, error: &(dyn std::error::Error + 'static)) {
        self.span
            .set_attribute("exception.message", error.to_string());
        self.span.set_status(Status::error(error.to_string()));
    }

    pub fn on_end(&mut self) {
        if self.ended {
            return;
        }
        self.ended = true;

        self.span.set_attribute(
            "pixel_sprite.request.images",
            i64::from(self.request.requested_images),
        );
        self.span.set_attribute(
            "pixel_sprite.request.reference_image",
            self.request.has_reference_image,
        );
        if let Some(temperature) = self.request.temperature {
            self.span
                .set_attribute("gen_ai.request.temperature", temperature);
        }
        if let Some(top_p) = self.request.top_p {
            self.span.set_attribute("gen_ai.request.top_p", top_p);
        }
        if let Some(count) = self.image_count {
            self.span.set_attribute(
                "pixel_sprite.response.images",
                i64::try_from(count).unwrap_or(i64::MAX),
            );
        }
        self.span.set_attribute(
            "pixel_sprite.duration_seconds",
            self.start_time.elapsed().as_secs_f64(),
        );
    }
}

impl Drop for GenerationSpan {
    fn drop(&mut self) {
        self.on_end();
    }
}

pub async fn trace_generation<T, F, Fut>(
    provider: &str,
    model_id: &str,
    operation: &str,
    request: GenerationRequestInfo,
    f: F,
) -> GenerationResult<T>
where
    T: ImageOutput,
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = GenerationResult<T>>,
{
    let mut span = GenerationSpan::new(provider, model_id, operation, request);
    let result = span.instrument_future(f()).await;

    match &result {
        Ok(output) => span.on_response(output),
        Err(error) => span.on_error(error),
    }

    span.on_end();
    result
}
