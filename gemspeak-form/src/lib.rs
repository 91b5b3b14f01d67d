use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use axum::extract::{Form, State};
use axum::http::{StatusCode, header};
use axum::response::{Html, IntoResponse, Response};
use axum::Router;
use axum::routing::get;
use gemspeak::utils::debug::format_request_prefix;
use gemspeak::utils::fileio::read_audio_file;
use gemspeak::{AudioFormat, GenerateError, GenerateRequest, OperationalError, SpeechSynth, generate};
use serde::Deserialize;
use tower_http::trace::TraceLayer;
use uuid::Uuid;

pub mod page;

use page::{DOWNLOAD_NAME, Outcome, PageView};

/// Shared by every request. All generations write to the same
/// `output_path`; overlapping requests are not serialized, last write wins.
pub struct FormState<S> {
    pub synth: Arc<S>,
    pub output_path: PathBuf,
    pub format: AudioFormat,
}

impl<S> FormState<S> {
    pub fn new(synth: S, output_path: impl Into<PathBuf>) -> Self {
        Self {
            synth: Arc::new(synth),
            output_path: output_path.into(),
            format: AudioFormat::default(),
        }
    }

    pub fn with_format(mut self, format: AudioFormat) -> Self {
        self.format = format;
        self
    }
}

impl<S> Clone for FormState<S> {
    fn clone(&self) -> Self {
        Self {
            synth: self.synth.clone(),
            output_path: self.output_path.clone(),
            format: self.format,
        }
    }
}

#[derive(Deserialize)]
struct GenerateForm {
    #[serde(default)]
    api_key: String,
    #[serde(default)]
    style: String,
    #[serde(default)]
    script: String,
}

pub fn create_server<S>(state: FormState<S>) -> Router
where
    S: SpeechSynth + Send + Sync + 'static,
{
    Router::new()
        .route("/", get(handle_index))
        .route("/generate", get(handle_index).post(handle_generate::<S>))
        .route("/output.wav", get(handle_download::<S>))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

pub use axum::serve;

async fn handle_index() -> Html<String> {
    Html(page::render(&PageView::default()))
}

fn status_for(err: &GenerateError) -> StatusCode {
    match err {
        GenerateError::Input(_) => StatusCode::UNPROCESSABLE_ENTITY,
        GenerateError::Operational(
            OperationalError::Http(_)
            | OperationalError::Api { .. }
            | OperationalError::MalformedResponse(_)
            | OperationalError::Decode(_),
        ) => StatusCode::BAD_GATEWAY,
        GenerateError::Operational(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

async fn handle_generate<S>(
    State(state): State<FormState<S>>,
    Form(form): Form<GenerateForm>,
) -> (StatusCode, Html<String>)
where
    S: SpeechSynth + Send + Sync + 'static,
{
    let prefix = format_request_prefix(&Uuid::new_v4().to_string());
    tracing::info!(
        "{} generate: style_chars={} script_chars={}",
        prefix,
        form.style.chars().count(),
        form.script.chars().count()
    );

    let request = GenerateRequest {
        api_key: form.api_key,
        style: form.style,
        script: form.script,
    };

    let (status, outcome) =
        match generate(state.synth.as_ref(), &request, &state.output_path, state.format).await {
            Ok(audio) => {
                tracing::info!("{} done: {} bytes", prefix, audio.bytes.len());
                (
                    StatusCode::OK,
                    Outcome::Generated {
                        wav: audio.bytes,
                        info: audio.info,
                    },
                )
            }
            Err(e) => {
                if e.is_input() {
                    tracing::info!("{} rejected: {}", prefix, e);
                } else {
                    tracing::error!("{} failed: {}", prefix, e);
                }
                (status_for(&e), Outcome::Failed(e.to_string()))
            }
        };

    let html = page::render(&PageView {
        api_key: &request.api_key,
        style: &request.style,
        script: &request.script,
        outcome,
    });
    (status, Html(html))
}

#[derive(Debug)]
enum DownloadError {
    NotGenerated,
    Read(io::Error),
}

impl IntoResponse for DownloadError {
    fn into_response(self) -> Response {
        match self {
            Self::NotGenerated => {
                (StatusCode::NOT_FOUND, "No audio has been generated yet.").into_response()
            }
            Self::Read(e) => {
                tracing::error!("reading output file: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR.into_response()
            }
        }
    }
}

async fn handle_download<S>(State(state): State<FormState<S>>) -> Result<Response, DownloadError>
where
    S: Send + Sync + 'static,
{
    let bytes = read_audio_file(&state.output_path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DownloadError::NotGenerated,
        _ => DownloadError::Read(e),
    })?;

    Ok((
        [
            (header::CONTENT_TYPE, "audio/wav".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_NAME),
            ),
        ],
        bytes,
    )
        .into_response())
}
