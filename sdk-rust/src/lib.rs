mod client_utils;
mod errors;
mod generator;
pub mod google;
mod image_model;
pub mod opentelemetry;
pub mod prompts;
mod types;

pub use errors::*;
pub use generator::{GeneratorModels, SpriteGenerator, VARIATION_COUNT};
pub use image_model::ImageModel;
pub use types::*;
