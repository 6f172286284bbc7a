mod catalog;
mod config;
mod download;
mod errors;
mod modal;
pub mod opentelemetry;
mod prompt;
mod recommendation;
mod selection;
mod store;
mod types;
pub mod upload;
mod wizard;

pub use catalog::*;
pub use config::{StudioConfig, DEFAULT_DATA_DIR};
pub use download::{asset_file_name, export_assets, Asset, ExportRequest};
pub use errors::{StudioError, StudioResult, WizardError};
pub use modal::{ConfirmationPrompt, CredentialPrompt, ModalAnchor, Placement, TagRect, Viewport};
pub use prompt::{build_prompt, parse_tag_text};
pub use recommendation::lookup_recommendations;
pub use selection::{ClickOutcome, TagSelection, DEFAULT_TAG};
pub use store::{
    FileStorage, MemoryStorage, PersistedStore, Storage, CREDENTIAL_KEY, HISTORY_KEY,
};
pub use types::*;
pub use wizard::{Wizard, WizardSnapshot};
