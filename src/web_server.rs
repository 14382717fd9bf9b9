use std::{convert::Infallible, net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::{rejection::JsonRejection, Request, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    serve, Json, Router,
};
use minijinja::{path_loader, Environment};
use minijinja_autoreload::AutoReloader;
use serde::Deserialize;
use serde_json::json;
use tokio::sync::Mutex;
use tower_http::{services::ServeDir, trace::TraceLayer};
use tracing::{error, info, instrument, warn};

use crate::app_state::{run_generation, run_send, AppState, StateView};
use crate::features::{self, AssistantType, Catalog};
use crate::generator::Generator;
use crate::request::GeneratorRequest;

const BUSY: &str = "Đang xử lý yêu cầu trước, vui lòng đợi trong giây lát.";
const NO_SESSION: &str = "Hãy tạo nội dung trước khi trò chuyện.";
const EMPTY_CHAT: &str = "Vui lòng nhập tin nhắn.";

// Shared application state
#[derive(Clone)]
struct ServerState {
    templates: Arc<AutoReloader>,
    generator: Generator,
    // Single-user app: one presentation state for the whole server.
    app: Arc<Mutex<AppState>>,
}

/// JSON error body with a status code.
struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

// Malformed or incomplete bodies get the same `{error}` shape as every other failure.
impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        warn!(error = %rejection.body_text(), "Rejected request body");
        ApiError::new(StatusCode::BAD_REQUEST, rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}

#[derive(Deserialize)]
struct CategoryBody {
    assistant_type: AssistantType,
}

#[derive(Deserialize)]
struct ChatBody {
    message: String,
}

fn create_minijinja_env(templates_dir: String) -> AutoReloader {
    AutoReloader::new(move |notifier| {
        let mut env = Environment::new();
        env.set_loader(path_loader(&templates_dir));
        notifier.watch_path(&templates_dir, true);
        Ok(env)
    })
}

async fn index_handler(State(state): State<ServerState>) -> Result<Html<String>, ApiError> {
    let view = state.app.lock().await.view();
    state
        .templates
        .acquire_env()
        .and_then(|env| {
            env.get_template("index.html").and_then(|tmpl| {
                tmpl.render(minijinja::context! {
                    title => "Gửi lời nhớ Nhung",
                    catalog => features::catalog(),
                    state => view,
                })
            })
        })
        .map(Html)
        .map_err(|e| {
            error!("Failed to get or render template: {}", e);
            ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, format!("Internal Server Error: {e}"))
        })
}

async fn catalog_handler() -> Json<Catalog> {
    Json(features::catalog())
}

async fn state_handler(State(state): State<ServerState>) -> Json<StateView> {
    Json(state.app.lock().await.view())
}

async fn category_handler(
    State(state): State<ServerState>,
    body: Result<Json<CategoryBody>, JsonRejection>,
) -> Result<Json<StateView>, ApiError> {
    let Json(body) = body?;
    let mut app = state.app.lock().await;
    // Discarding the cycle mid-call would let a second call start alongside it.
    if app.is_busy() {
        warn!("Category switch requested while a call is outstanding");
        return Err(ApiError::new(StatusCode::CONFLICT, BUSY));
    }
    *app = app.on_switch_category(body.assistant_type);
    Ok(Json(app.view()))
}

#[instrument(skip_all, fields(feature = tracing::field::Empty))]
async fn generate_handler(
    State(state): State<ServerState>,
    request: Result<Json<GeneratorRequest>, JsonRejection>,
) -> Result<Json<StateView>, ApiError> {
    let Json(request) = request?;
    tracing::Span::current().record("feature", request.feature().slug());
    request
        .validate()
        .map_err(|e| ApiError::new(StatusCode::BAD_REQUEST, e.to_string()))?;

    let cycle = {
        let mut app = state.app.lock().await;
        let category = request.feature().category();
        if app.assistant_type() != category && !app.is_busy() {
            *app = app.on_switch_category(category);
        }
        let Some(loading) = app.begin_generate() else {
            warn!("Generation requested while another call is outstanding");
            return Err(ApiError::new(StatusCode::CONFLICT, BUSY));
        };
        *app = loading;
        app.cycle()
    };

    // The lock is not held across the remote call.
    let outcome = run_generation(&state.generator, &request).await;

    let mut app = state.app.lock().await;
    *app = app.finish_generate(cycle, outcome);
    Ok(Json(app.view()))
}

#[instrument(skip_all)]
async fn chat_handler(
    State(state): State<ServerState>,
    body: Result<Json<ChatBody>, JsonRejection>,
) -> Result<Json<StateView>, ApiError> {
    let Json(body) = body?;
    if body.message.trim().is_empty() {
        return Err(ApiError::new(StatusCode::BAD_REQUEST, EMPTY_CHAT));
    }

    let pending = {
        let mut app = state.app.lock().await;
        if !app.chat_enabled() {
            return Err(ApiError::new(StatusCode::CONFLICT, NO_SESSION));
        }
        let Some((sending, pending)) = app.begin_send(&body.message) else {
            return Err(ApiError::new(StatusCode::CONFLICT, BUSY));
        };
        *app = sending;
        pending
    };

    let outcome = run_send(&state.generator, pending.session, &pending.text).await;

    let mut app = state.app.lock().await;
    *app = app.finish_send(pending.cycle, outcome);
    Ok(Json(app.view()))
}

/// Builds the application router. Paths are resolved relative to the working directory.
pub fn router(generator: Generator, templates_dir: &str, static_dir: &str) -> Router {
    let state = ServerState {
        templates: Arc::new(create_minijinja_env(templates_dir.to_string())),
        generator,
        app: Arc::new(Mutex::new(AppState::default())),
    };

    // Serve static files from the static directory
    let static_files_service =
        ServeDir::new(static_dir).not_found_service(tower::service_fn(|_req: Request| async {
            Ok::<_, Infallible>((StatusCode::NOT_FOUND, "Not Found").into_response())
        }));

    Router::new()
        .route("/", get(index_handler))
        .route("/api/catalog", get(catalog_handler))
        .route("/api/state", get(state_handler))
        .route("/api/category", post(category_handler))
        .route("/api/generate", post(generate_handler))
        .route("/api/chat", post(chat_handler))
        .nest_service("/static", static_files_service)
        .with_state(state)
        .layer(TraceLayer::new_for_http())
}

pub async fn start_web_server(port: u16, generator: Generator) -> Result<()> {
    let app = router(
        generator,
        &crate::constants::TEMPLATES_DIR,
        &crate::constants::STATIC_DIR,
    );

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Web server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context(format!("Failed to bind to address {}", addr))?;

    serve(listener, app.into_make_service())
        .await
        .context("Web server failed")?;

    Ok(())
}
