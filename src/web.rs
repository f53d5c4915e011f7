use crate::{
    app::{App, AppError},
    form::VideoForm,
    preview::Preview,
    search::SortKey,
    theme::Theme,
    toast::Toast,
    validation::{self, FormErrors},
    videos::VideoRecord,
};
use axum::{
    extract::State,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::{signal, sync::RwLock};

#[derive(Clone)]
pub struct SharedState {
    app: Arc<RwLock<App>>,
}

pub fn router(app: Arc<RwLock<App>>) -> Router {
    let shared_state = Arc::new(SharedState { app });

    Router::new()
        .route("/api/videos/search", post(search))
        .route("/api/videos/create", post(create))
        .route("/api/videos/delete", post(delete))
        .route("/api/videos/watch", post(watch))
        .route("/api/player", get(player))
        .route("/api/preview", post(preview))
        .route("/api/toasts", get(toasts))
        .route("/api/toasts/dismiss", post(dismiss_toast))
        .route("/api/theme", get(get_theme).post(update_theme))
        .layer(
            tower_http::trace::TraceLayer::new_for_http()
                .make_span_with(
                    tower_http::trace::DefaultMakeSpan::new().level(tracing::Level::INFO),
                )
                .on_response(
                    tower_http::trace::DefaultOnResponse::new().level(tracing::Level::INFO),
                ),
        )
        .with_state(shared_state)
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        log::error!("failed to install Ctrl+C handler: {err}");
        return;
    }
    log::warn!("shutting down");
}

async fn start_app(app: App, listen_addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(RwLock::new(app)));

    let listener = tokio::net::TcpListener::bind(listen_addr).await?;
    log::info!("listening on {listen_addr}");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

pub fn start_daemon(app: App, listen_addr: &str) -> anyhow::Result<()> {
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async { start_app(app, listen_addr).await })
}

#[derive(Debug)]
struct HttpError(AppError);

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        match self.0 {
            AppError::NotFound => (
                axum::http::StatusCode::NOT_FOUND,
                Json(json!({"error": self.0.to_string()})),
            ),
            AppError::Validation(errors) => (
                axum::http::StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({"errors": errors})),
            ),
            AppError::IO(_) | AppError::Other(_) => {
                log::error!("{self:?}");
                (
                    axum::http::StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({"error": self.0.to_string()})),
                )
            }
        }
        .into_response()
    }
}

impl<E> From<E> for HttpError
where
    E: Into<AppError>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SearchRequest {
    #[serde(default)]
    pub query: String,
    #[serde(default)]
    pub sort: SortKey,
}

async fn search(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<SearchRequest>,
) -> Json<Vec<VideoRecord>> {
    log::debug!("payload: {payload:?}");
    let app = state.app.read().await;
    Json(app.view(&payload.query, payload.sort))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub url: String,
}

async fn create(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<CreateRequest>,
) -> Result<Json<VideoRecord>, HttpError> {
    let mut form = VideoForm::new();
    form.set_name(payload.name);
    form.set_description(payload.description);

    // a blank name is filled from the preview, same as the interactive form
    if let Some((token, video_id)) = form.set_url(payload.url) {
        if form.name().trim().is_empty() {
            let fetcher = state.app.read().await.preview_fetcher().clone();
            let preview = tokio::task::spawn_blocking(move || fetcher.fetch(&video_id))
                .await
                .map_err(anyhow::Error::from)?;
            form.apply_preview(token, preview);
        }
    }

    let mut app = state.app.write().await;
    let video = app.add_video(&mut form)?;

    Ok(Json(video))
}

#[derive(Debug, Clone, Deserialize)]
pub struct IdRequest {
    pub id: String,
}

async fn delete(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<IdRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let mut app = state.app.write().await;
    let removed = app.delete_video(&payload.id)?;

    Ok(Json(json!({"deleted": removed.is_some()})))
}

async fn watch(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<IdRequest>,
) -> Result<Json<VideoRecord>, HttpError> {
    let mut app = state.app.write().await;
    Ok(Json(app.watch(&payload.id)?))
}

async fn player(State(state): State<Arc<SharedState>>) -> Json<VideoRecord> {
    Json(state.app.read().await.now_playing().clone())
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewRequest {
    pub url: String,
}

async fn preview(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<PreviewRequest>,
) -> Result<Json<Preview>, HttpError> {
    let url = payload.url.trim();
    let video_id = validation::is_valid_video_url(url)
        .then(|| validation::extract_video_id(url))
        .flatten()
        .map(String::from);

    let Some(video_id) = video_id else {
        let mut errors = FormErrors::default();
        errors.insert(
            "url",
            validation::validate_video_url(url)
                .unwrap_or_else(|| "Please enter a valid YouTube URL".to_string()),
        );
        return Err(AppError::Validation(errors).into());
    };

    let fetcher = state.app.read().await.preview_fetcher().clone();
    let preview = tokio::task::spawn_blocking(move || fetcher.fetch(&video_id))
        .await
        .map_err(anyhow::Error::from)?;

    Ok(Json(preview))
}

async fn toasts(State(state): State<Arc<SharedState>>) -> Json<Vec<Toast>> {
    Json(state.app.write().await.active_toasts())
}

async fn dismiss_toast(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<IdRequest>,
) -> impl IntoResponse {
    let dismissed = state.app.write().await.toasts().dismiss(&payload.id);
    Json(json!({"dismissed": dismissed}))
}

async fn get_theme(State(state): State<Arc<SharedState>>) -> impl IntoResponse {
    Json(json!({"theme": state.app.read().await.theme()}))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThemeRequest {
    pub theme: Option<Theme>,
}

async fn update_theme(
    State(state): State<Arc<SharedState>>,
    Json(payload): Json<ThemeRequest>,
) -> Result<impl IntoResponse, HttpError> {
    let mut app = state.app.write().await;
    let theme = match payload.theme {
        Some(theme) => app.set_theme(theme)?,
        None => app.toggle_theme()?,
    };

    Ok(Json(json!({"theme": theme})))
}
