use std::collections::BTreeMap;
use std::time::Duration;

use axum::{
    body::{Body, Bytes},
    extract::{Json, Multipart, Path, State},
    http::{header, HeaderMap, HeaderName, StatusCode, Uri},
    response::{IntoResponse, Response},
    Form,
};
use shared_types::{MessageResponse, MultipartFormResponse, RandomFormat, UploadResponse};

use crate::error::{ApiError, ApiResult};
use crate::random;
use crate::AppState;

const DOWNLOAD_FILE_NAME: &str = "sample.bin";
static DOWNLOAD_FILE: &[u8] = include_bytes!("../assets/sample.bin");

/// Connection and framing headers are left for the serving layer to set.
fn is_echoed(name: &HeaderName) -> bool {
    name != header::HOST
        && name != header::CONNECTION
        && name != header::TRANSFER_ENCODING
        && name != header::CONTENT_LENGTH
}

pub async fn root() -> Json<MessageResponse> {
    Json(MessageResponse {
        message: "Hello World".to_string(),
    })
}

pub async fn foo() -> Json<Vec<&'static str>> {
    Json(vec!["called foo"])
}

pub async fn health_check() -> StatusCode {
    StatusCode::OK
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::not_found(format!("Route {}", uri.path()))
}

// Random payloads
pub async fn random_payload(Path(format): Path<String>) -> ApiResult<Response> {
    let format: RandomFormat = format
        .parse()
        .map_err(|_| ApiError::not_found(format!("Random format {}", format)))?;

    let body = random::generate(format, &mut rand::thread_rng())
        .map_err(|e| ApiError::Internal(e.into()))?;

    Ok(([(header::CONTENT_TYPE, format.content_type())], body).into_response())
}

/// Empty body with the requested status code.
pub async fn status_code(Path(status): Path<u16>) -> ApiResult<StatusCode> {
    StatusCode::from_u16(status)
        .map_err(|_| ApiError::bad_request(format!("Not a valid HTTP status: {}", status)))
}

// Echo handlers
pub async fn echo(headers: HeaderMap, body: Bytes) -> Response {
    echo_response(headers, body)
}

/// Same as `echo` but sleeps first. Only this request is delayed.
pub async fn echo_with_wait(
    State(state): State<AppState>,
    Path(wait): Path<u64>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<Response> {
    let wait = Duration::from_secs(wait);
    if wait > state.config.echo_max_wait {
        return Err(ApiError::bad_request(format!(
            "wait must be at most {} seconds",
            state.config.echo_max_wait.as_secs()
        )));
    }

    tracing::debug!("Delaying echo by {:?}", wait);
    tokio::time::sleep(wait).await;

    Ok(echo_response(headers, body))
}

fn echo_response(headers: HeaderMap, body: Bytes) -> Response {
    let mut response = Response::new(Body::from(body));
    for (name, value) in headers.iter() {
        if is_echoed(name) {
            response.headers_mut().append(name.clone(), value.clone());
        }
    }
    response
}

// Form and file handlers
pub async fn form(Form(fields): Form<BTreeMap<String, String>>) -> Json<BTreeMap<String, String>> {
    Json(fields)
}

struct ReceivedFile {
    name: String,
    size: usize,
}

async fn read_file_field(field: axum::extract::multipart::Field<'_>) -> ApiResult<ReceivedFile> {
    let name = field
        .file_name()
        .or(field.name())
        .unwrap_or_default()
        .to_string();
    let data = field
        .bytes()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?;

    Ok(ReceivedFile {
        name,
        size: data.len(),
    })
}

pub async fn multipart_form(mut multipart: Multipart) -> ApiResult<Json<MultipartFormResponse>> {
    let mut title = None;
    let mut file = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("title") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::bad_request(e.body_text()))?;
                title = Some(text);
            }
            Some("file") => file = Some(read_file_field(field).await?),
            _ => {}
        }
    }

    let title = title.ok_or_else(|| ApiError::bad_request("Missing field: title"))?;
    let file = file.ok_or_else(|| ApiError::bad_request("Missing field: file"))?;

    Ok(Json(MultipartFormResponse {
        title,
        file_name: file.name,
        file_size: file.size,
    }))
}

pub async fn upload(mut multipart: Multipart) -> ApiResult<Json<UploadResponse>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(e.body_text()))?
    {
        if field.name() == Some("file") {
            let file = read_file_field(field).await?;
            tracing::debug!("Received upload {} ({} bytes)", file.name, file.size);
            return Ok(Json(UploadResponse {
                file_name: file.name,
                file_size: file.size,
            }));
        }
    }

    Err(ApiError::bad_request("Missing field: file"))
}

pub async fn download() -> impl IntoResponse {
    (
        [
            (header::CONTENT_TYPE, "application/octet-stream".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", DOWNLOAD_FILE_NAME),
            ),
        ],
        DOWNLOAD_FILE,
    )
}
