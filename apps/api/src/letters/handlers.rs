use axum::{
    extract::{Multipart, Query, State},
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use bytes::Bytes;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::archive::{ArchiveFormat, ARCHIVE_MIME};
use crate::errors::AppError;
use crate::letters::sample::{SAMPLE_CSV, SAMPLE_CSV_NAME};
use crate::letters::upload::read_csv_upload;
use crate::letters::{LetterBatch, LetterSummary};
use crate::recipients::{load_recipients, preview_rows, RecipientPreview, REQUIRED_COLUMNS};
use crate::render::OutputKind;
use crate::state::AppState;

#[derive(Serialize)]
pub struct PreviewResponse {
    pub record_count: usize,
    pub required_columns: [&'static str; 6],
    pub preview: Vec<RecipientPreview>,
}

#[derive(Serialize)]
pub struct ArchiveLink {
    pub format: ArchiveFormat,
    pub file_name: &'static str,
}

#[derive(Serialize)]
pub struct GenerateResponse {
    pub generated: usize,
    pub letters: Vec<LetterSummary>,
    pub archives: Vec<ArchiveLink>,
}

#[derive(Deserialize)]
pub struct ArchiveQuery {
    #[serde(default)]
    pub format: ArchiveFormat,
}

#[derive(Deserialize)]
pub struct FileQuery {
    pub key: String,
    pub format: OutputKind,
}

/// GET /api/v1/letters/template
pub async fn handle_template() -> Result<Response, AppError> {
    attachment(
        SAMPLE_CSV_NAME,
        "text/csv; charset=utf-8",
        Bytes::from_static(SAMPLE_CSV.as_bytes()),
    )
}

/// POST /api/v1/letters/preview
pub async fn handle_preview(multipart: Multipart) -> Result<Json<PreviewResponse>, AppError> {
    let data = read_csv_upload(multipart).await?;
    let recipients = run_blocking("preview", move || Ok(load_recipients(&data)?)).await?;
    Ok(Json(PreviewResponse {
        record_count: recipients.len(),
        required_columns: REQUIRED_COLUMNS,
        preview: preview_rows(&recipients),
    }))
}

/// POST /api/v1/letters/generate
pub async fn handle_generate(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<GenerateResponse>, AppError> {
    let data = read_csv_upload(multipart).await?;
    let batch = generate_batch(&state, data).await?;
    Ok(Json(GenerateResponse {
        generated: batch.len(),
        letters: batch.summary(),
        archives: ArchiveFormat::ALL
            .iter()
            .map(|&format| ArchiveLink {
                format,
                file_name: format.archive_name(),
            })
            .collect(),
    }))
}

/// POST /api/v1/letters/archive?format=docx|html|both
pub async fn handle_archive(
    State(state): State<AppState>,
    Query(params): Query<ArchiveQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let data = read_csv_upload(multipart).await?;
    let batch = generate_batch(&state, data).await?;
    let format = params.format;
    let zip = run_blocking("archive packaging", move || {
        batch
            .package(format)
            .map_err(|e| AppError::Generation(e.to_string()))
    })
    .await?;
    info!("Serving {} ({} bytes)", format.archive_name(), zip.len());
    attachment(format.archive_name(), ARCHIVE_MIME, zip)
}

/// POST /api/v1/letters/file?key=<electorate>_<first>_<last>&format=docx|html
pub async fn handle_file(
    State(state): State<AppState>,
    Query(params): Query<FileQuery>,
    multipart: Multipart,
) -> Result<Response, AppError> {
    let data = read_csv_upload(multipart).await?;
    let batch = generate_batch(&state, data).await?;
    let (file_name, bytes) = batch
        .file(&params.key, params.format)
        .ok_or_else(|| AppError::NotFound(format!("No letter for recipient '{}'", params.key)))?;
    attachment(&file_name, params.format.mime(), bytes)
}

// ────────────────────────────────────────────────────────────────────────────
// Shared pipeline
// ────────────────────────────────────────────────────────────────────────────

/// Load → render-all, off the async executor. Schema and parse errors surface
/// before anything is rendered; a render failure discards the whole batch.
async fn generate_batch(state: &AppState, data: Bytes) -> Result<LetterBatch, AppError> {
    let renderer = state.renderer.clone();
    let batch = run_blocking("letter generation", move || {
        let recipients = load_recipients(&data)?;
        LetterBatch::generate(&recipients, &renderer)
            .map_err(|e| AppError::Generation(e.to_string()))
    })
    .await?;

    if batch.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "No letters were generated. The CSV file has no recipient rows.".to_string(),
        ));
    }
    Ok(batch)
}

async fn run_blocking<T, F>(label: &'static str, f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f).await.map_err(|e| {
        AppError::Internal(anyhow::anyhow!("spawn_blocking failed in {label}: {e}"))
    })?
}

/// RFC 5987 `attr-char`: everything else is percent-encoded in `filename*`.
const ATTR_CHAR: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'!')
    .remove(b'#')
    .remove(b'$')
    .remove(b'&')
    .remove(b'+')
    .remove(b'-')
    .remove(b'.')
    .remove(b'^')
    .remove(b'_')
    .remove(b'`')
    .remove(b'|')
    .remove(b'~');

/// `attachment; filename="<ascii>"; filename*=UTF-8''<encoded>`.
fn content_disposition(file_name: &str) -> String {
    let fallback: String = file_name
        .chars()
        .map(|c| {
            if c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect();
    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        utf8_percent_encode(file_name, ATTR_CHAR)
    )
}

/// Download response with `Content-Disposition: attachment`.
fn attachment(file_name: &str, mime: &'static str, body: Bytes) -> Result<Response, AppError> {
    let disposition = HeaderValue::from_str(&content_disposition(file_name))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("invalid download name: {e}")))?;

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, HeaderValue::from_static(mime)),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        body,
    )
        .into_response())
}
