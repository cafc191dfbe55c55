//! axum request → inbound snapshot.
//!
//! Plays the role of the event-driven runtime: it buffers the body, decodes
//! urlencoded forms into post fields and spools multipart file parts to temp
//! storage. For multipart requests the raw body handed on is empty.
//!
//! A multipart body that cannot be parsed is not an error here. Anything
//! spooled so far is removed and the request is dispatched with no post
//! fields and no files.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use axum::{
    body::Body,
    extract::{multipart::MultipartError, FromRequest, Multipart},
    http::{Request, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::bridge::form::FormKind;
use crate::config::UploadConfig;
use crate::http::{InboundRequestSnapshot, RawUpload};

/// File exceeded the configured size limit.
pub const UPLOAD_ERR_SIZE: i32 = 1;
/// File part carried no file.
pub const UPLOAD_ERR_NO_FILE: i32 = 4;

/// Connection facts the request itself does not carry.
#[derive(Debug, Clone)]
pub struct CaptureContext {
    pub local_port: u16,
    pub remote: SocketAddr,
    pub max_body_size: usize,
    pub uploads: UploadConfig,
}

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("failed to read request body: {0}")]
    Body(#[from] axum::Error),

    #[error("multipart body too large: {0}")]
    MultipartTooLarge(MultipartError),

    #[error("failed to spool upload: {0}")]
    Spool(#[from] std::io::Error),
}

impl IntoResponse for CaptureError {
    fn into_response(self) -> Response {
        let status = match &self {
            CaptureError::Body(_) | CaptureError::MultipartTooLarge(_) => {
                StatusCode::PAYLOAD_TOO_LARGE
            }
            CaptureError::Spool(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        status.into_response()
    }
}

/// Paths of successfully spooled files, for cleanup after the exchange.
pub fn spooled_paths(snapshot: &InboundRequestSnapshot) -> Vec<PathBuf> {
    snapshot
        .files
        .iter()
        .flatten()
        .filter(|file| file.error == 0)
        .map(|file| file.tmp_name.clone())
        .collect()
}

pub async fn capture(
    request: Request<Body>,
    ctx: &CaptureContext,
) -> Result<InboundRequestSnapshot, CaptureError> {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();

    let uri = request.uri();
    let mut snapshot = InboundRequestSnapshot {
        method: request.method().to_string(),
        server_protocol: format!("{:?}", request.version()),
        request_uri: uri
            .path_and_query()
            .map_or_else(|| uri.path().to_string(), |pq| pq.as_str().to_string()),
        path_info: uri.path().to_string(),
        query_string: uri.query().map(str::to_string),
        server_port: ctx.local_port,
        remote_addr: ctx.remote.ip().to_string(),
        request_time: now.as_secs(),
        request_time_float: now.as_secs_f64(),
        headers: collect_headers(&request),
        ..InboundRequestSnapshot::default()
    };

    let form_kind = snapshot.header("content-type").and_then(FormKind::detect);

    match form_kind {
        Some(FormKind::Multipart) => match Multipart::from_request(request, &()).await {
            Ok(multipart) => {
                let mut spooled = Vec::new();
                match read_multipart(multipart, &ctx.uploads, &mut spooled).await {
                    Ok((post, files)) => {
                        snapshot.post = Some(post);
                        snapshot.files = Some(files);
                    }
                    Err(MultipartFailure::Parse(e)) => {
                        cleanup(spooled).await;
                        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
                            return Err(CaptureError::MultipartTooLarge(e));
                        }
                        tracing::warn!(error = %e, "Malformed multipart body, dispatching without form data");
                    }
                    Err(MultipartFailure::Spool(e)) => {
                        cleanup(spooled).await;
                        return Err(CaptureError::Spool(e));
                    }
                }
            }
            Err(rejection) => {
                tracing::warn!(
                    error = %rejection.body_text(),
                    "Multipart request rejected, dispatching without form data"
                );
            }
        },
        Some(FormKind::UrlEncoded) => {
            let bytes = axum::body::to_bytes(request.into_body(), ctx.max_body_size).await?;
            snapshot.post = Some(
                url::form_urlencoded::parse(&bytes)
                    .into_owned()
                    .collect(),
            );
            snapshot.body = bytes.to_vec();
        }
        None => {
            let bytes = axum::body::to_bytes(request.into_body(), ctx.max_body_size).await?;
            snapshot.body = bytes.to_vec();
        }
    }

    Ok(snapshot)
}

/// One entry per header name; repeated values merged with `", "`.
fn collect_headers(request: &Request<Body>) -> Vec<(String, String)> {
    let headers = request.headers();
    headers
        .keys()
        .map(|name| {
            let value = headers
                .get_all(name)
                .iter()
                .map(|v| header_text(v.as_bytes()))
                .collect::<Vec<_>>()
                .join(", ");
            (name.as_str().to_string(), value)
        })
        .collect()
}

/// Header bytes as text. Non-UTF-8 values (obs-text) are read as ISO-8859-1,
/// one char per byte, so nothing is replaced or lost.
fn header_text(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().copied().map(char::from).collect(),
    }
}

enum MultipartFailure {
    Parse(MultipartError),
    Spool(std::io::Error),
}

impl From<MultipartError> for MultipartFailure {
    fn from(e: MultipartError) -> Self {
        Self::Parse(e)
    }
}

impl From<std::io::Error> for MultipartFailure {
    fn from(e: std::io::Error) -> Self {
        Self::Spool(e)
    }
}

/// Every spooled path is pushed to `spooled` before the file is written, so
/// the caller can remove partial work on failure.
async fn read_multipart(
    mut multipart: Multipart,
    uploads: &UploadConfig,
    spooled: &mut Vec<PathBuf>,
) -> Result<(Vec<(String, String)>, Vec<RawUpload>), MultipartFailure> {
    let temp_dir = uploads.resolved_temp_dir();
    let mut post = Vec::new();
    let mut files = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();

        let Some(file_name) = field.file_name().map(str::to_string) else {
            post.push((name, field.text().await?));
            continue;
        };

        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let data = field.bytes().await?;
        let size = data.len() as u64;

        let (tmp_name, error) = if file_name.is_empty() && data.is_empty() {
            (PathBuf::new(), UPLOAD_ERR_NO_FILE)
        } else if size > uploads.max_file_size {
            tracing::warn!(field = %name, size, limit = uploads.max_file_size, "Upload exceeds size limit");
            (PathBuf::new(), UPLOAD_ERR_SIZE)
        } else {
            let path = temp_dir.join(format!("bridge-upload-{}", uuid::Uuid::new_v4()));
            spooled.push(path.clone());
            tokio::fs::write(&path, &data).await?;
            (path, 0)
        };

        files.push(RawUpload {
            field: name,
            tmp_name,
            name: file_name,
            content_type,
            size: if error == 0 { size } else { 0 },
            error,
        });
    }

    Ok((post, files))
}

/// Remove spooled files once the exchange is over.
pub async fn cleanup(paths: Vec<PathBuf>) {
    for path in paths {
        if let Err(e) = tokio::fs::remove_file(&path).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!(path = ?path, error = %e, "Failed to remove spooled upload");
            }
        }
    }
}
