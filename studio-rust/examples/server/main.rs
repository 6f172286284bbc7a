use axum::{
    extract::State,
    http::{header, HeaderValue, Method, StatusCode},
    routing::{get, post},
    Json, Router,
};
use dotenvy::dotenv;
use pixel_sprite_sdk::ImagePart;
use pixel_sprite_studio::{
    ClickOutcome, Creation, LoadingState, StudioConfig, StudioError, Tag, TagCatalog, TagRect,
    Viewport, Wizard, WizardSnapshot,
};
use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf, sync::Arc};
use tokio::sync::{watch, Mutex};
use tower_http::cors::CorsLayer;
use tracing_subscriber::EnvFilter;

type BoxedError = Box<dyn std::error::Error + Send + Sync>;
type HandlerResult<T> = Result<Json<T>, (StatusCode, String)>;

#[derive(Clone)]
struct AppState {
    wizard: Arc<Mutex<Wizard>>,
    // Read without the wizard lock, which is held for the whole generation.
    progress: watch::Receiver<LoadingState>,
    catalog: Arc<TagCatalog>,
}

#[derive(Deserialize)]
struct CredentialBody {
    key: String,
}

#[derive(Deserialize)]
struct TagTextBody {
    text: String,
}

#[derive(Deserialize)]
struct TagClickBody {
    name: String,
    #[serde(default)]
    rect: TagRect,
    viewport: Option<Viewport>,
}

#[derive(Serialize)]
struct TagClickResponse {
    outcome: ClickOutcome,
    state: WizardSnapshot,
}

#[derive(Deserialize)]
struct StartBody {
    /// Free text. When absent the selected tags are used.
    prompt: Option<String>,
    /// A `data:` URI of the reference image.
    image: Option<String>,
}

#[derive(Deserialize)]
struct SelectBody {
    index: usize,
}

#[derive(Deserialize)]
struct HistorySelectBody {
    id: i64,
}

#[derive(Deserialize)]
struct ExportBody {
    dir: PathBuf,
}

#[derive(Serialize)]
struct ExportResponse {
    files: Vec<PathBuf>,
}

fn error_response(error: &StudioError) -> (StatusCode, String) {
    let status = match error {
        StudioError::InvalidInput(_) | StudioError::Generation(_) => StatusCode::BAD_REQUEST,
        StudioError::InvalidTransition { .. } => StatusCode::CONFLICT,
        StudioError::Storage(_)
        | StudioError::Serialization(_)
        | StudioError::QuotaExceeded(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, error.to_string())
}

async fn state_handler(State(state): State<AppState>) -> Json<WizardSnapshot> {
    Json(state.wizard.lock().await.snapshot())
}

async fn progress_handler(State(state): State<AppState>) -> Json<LoadingState> {
    Json(state.progress.borrow().clone())
}

async fn tags_handler(State(state): State<AppState>) -> Json<Vec<Tag>> {
    Json(state.catalog.tags().to_vec())
}

async fn credential_handler(
    State(state): State<AppState>,
    Json(body): Json<CredentialBody>,
) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard
        .save_credential(&body.key)
        .map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn tag_text_handler(
    State(state): State<AppState>,
    Json(body): Json<TagTextBody>,
) -> Json<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.set_tag_text(&body.text);
    Json(wizard.snapshot())
}

async fn tag_click_handler(
    State(state): State<AppState>,
    Json(body): Json<TagClickBody>,
) -> HandlerResult<TagClickResponse> {
    let mut wizard = state.wizard.lock().await;
    let outcome = wizard
        .click_tag(&body.name, body.rect, body.viewport.unwrap_or_default())
        .map_err(|e| error_response(&e))?;
    Ok(Json(TagClickResponse {
        outcome,
        state: wizard.snapshot(),
    }))
}

async fn tag_confirm_handler(State(state): State<AppState>) -> Json<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.confirm_recommendations();
    Json(wizard.snapshot())
}

async fn tag_cancel_handler(State(state): State<AppState>) -> Json<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.cancel_recommendations();
    Json(wizard.snapshot())
}

async fn start_handler(
    State(state): State<AppState>,
    Json(body): Json<StartBody>,
) -> HandlerResult<WizardSnapshot> {
    let image = body
        .image
        .as_deref()
        .map(ImagePart::from_data_uri)
        .transpose()
        .map_err(|e| error_response(&StudioError::from(e)))?;

    let mut wizard = state.wizard.lock().await;
    let result = match body.prompt {
        Some(prompt) => wizard.start(&prompt, image).await,
        None => wizard.submit(image).await,
    };
    result.map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn portrait_select_handler(
    State(state): State<AppState>,
    Json(body): Json<SelectBody>,
) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard
        .select_portrait(body.index)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn pixel_art_select_handler(
    State(state): State<AppState>,
    Json(body): Json<SelectBody>,
) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard
        .select_pixel_art(body.index)
        .await
        .map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn retry_handler(State(state): State<AppState>) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.retry().await.map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn start_over_handler(State(state): State<AppState>) -> Json<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.start_over();
    Json(wizard.snapshot())
}

async fn history_handler(State(state): State<AppState>) -> Json<Vec<Creation>> {
    Json(state.wizard.lock().await.history().to_vec())
}

async fn history_show_handler(State(state): State<AppState>) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.show_history().map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn history_select_handler(
    State(state): State<AppState>,
    Json(body): Json<HistorySelectBody>,
) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard
        .select_history(body.id)
        .map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn history_back_handler(State(state): State<AppState>) -> HandlerResult<WizardSnapshot> {
    let mut wizard = state.wizard.lock().await;
    wizard.back_from_history().map_err(|e| error_response(&e))?;
    Ok(Json(wizard.snapshot()))
}

async fn export_handler(
    State(state): State<AppState>,
    Json(body): Json<ExportBody>,
) -> HandlerResult<ExportResponse> {
    let wizard = state.wizard.lock().await;
    let files = wizard.export(&body.dir).map_err(|e| error_response(&e))?;
    Ok(Json(ExportResponse { files }))
}

async fn home_handler() -> &'static str {
    "Pixel sprite studio server. GET /state to begin."
}

#[tokio::main]
async fn main() -> Result<(), BoxedError> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let config = StudioConfig::from_env();
    let catalog = TagCatalog::builtin()?;
    let wizard = Wizard::new(config.generator(), config.store(), catalog.clone());
    let progress = wizard.subscribe_loading();

    let state = AppState {
        wizard: Arc::new(Mutex::new(wizard)),
        progress,
        catalog,
    };

    let app_url = env::var("APP_URL").unwrap_or_else(|_| "http://localhost:4321".to_string());
    let origin: HeaderValue = app_url.parse()?;

    let app = Router::new()
        .route("/", get(home_handler))
        .route("/state", get(state_handler))
        .route("/progress", get(progress_handler))
        .route("/tags", get(tags_handler))
        .route("/credential", post(credential_handler))
        .route("/tags/text", post(tag_text_handler))
        .route("/tags/click", post(tag_click_handler))
        .route("/tags/confirm", post(tag_confirm_handler))
        .route("/tags/cancel", post(tag_cancel_handler))
        .route("/start", post(start_handler))
        .route("/portraits/select", post(portrait_select_handler))
        .route("/pixel-art/select", post(pixel_art_select_handler))
        .route("/retry", post(retry_handler))
        .route("/start-over", post(start_over_handler))
        .route("/history", get(history_handler))
        .route("/history/show", post(history_show_handler))
        .route("/history/select", post(history_select_handler))
        .route("/history/back", post(history_back_handler))
        .route("/export", post(export_handler))
        .layer(
            CorsLayer::new()
                .allow_origin([origin])
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        )
        .with_state(state);

    let port = env::var("PORT").unwrap_or_else(|_| "4000".to_string());
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{port}")).await?;

    tracing::info!("Server listening on http://localhost:{port}");

    axum::serve(listener, app).await?;

    Ok(())
}
