use crate::WizardStep;
use opentelemetry::trace::Status;
use pixel_sprite_sdk::GenerationResult;
use std::future::Future;
use tracing::info_span;
use tracing_futures::Instrument;
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Run one generation step of the wizard inside a `pixel_sprite.wizard_step`
/// span.
pub async fn trace_wizard_step<T, Fut>(
    step: WizardStep,
    figure_name: &str,
    future: Fut,
) -> GenerationResult<T>
where
    Fut: Future<Output = GenerationResult<T>>,
{
    let span = info_span!("pixel_sprite.wizard_step");
    span.set_attribute("pixel_sprite.wizard.step", step.as_str());
    span.set_attribute("pixel_sprite.figure_name", figure_name.to_string());

    match future.instrument(span.clone()).await {
        Ok(output) => Ok(output),
        Err(err) => {
            span.set_attribute("exception.message", err.to_string());
            span.set_attribute("pixel_sprite.error.kind", format!("{:?}", err.kind()));
            span.set_status(Status::error(err.to_string()));
            Err(err)
        }
    }
}
