mod api;
mod model;

pub use model::{GoogleImageModel, GoogleImageModelOptions};
