//! Inbound snapshot → canonical request.
//!
//! # Steps
//! 1. Base environment from the snapshot, with a fixed `http` scheme
//! 2. Headers copied one by one (last write per name wins)
//! 3. Form fields for urlencoded and multipart content types
//! 4. Uploaded files for multipart only
//! 5. Body stream, only when the raw body is non-empty
//!
//! Nothing is validated; malformed input passes through as-is.

use crate::bridge::form::{self, FormKind};
use crate::http::request::DEFAULT_SCHEME;
use crate::http::{BodyStream, CanonicalRequest, InboundRequestSnapshot, ServerParams};

#[derive(Debug, Clone, Copy, Default)]
pub struct RequestAdapter;

impl RequestAdapter {
    pub fn new() -> Self {
        Self
    }

    pub fn adapt(&self, snapshot: &InboundRequestSnapshot) -> CanonicalRequest {
        let mut request = CanonicalRequest::from_server_params(Self::server_params(snapshot));

        for (name, value) in &snapshot.headers {
            request = request.with_header(name.as_str(), value.as_str());
        }

        let form_kind = snapshot.header("content-type").and_then(FormKind::detect);

        if form_kind.is_some() {
            if let Some(fields) = form::extract_fields(snapshot.post.as_deref()) {
                request = request.with_parsed_body(fields);
            }
        }

        if form_kind == Some(FormKind::Multipart) {
            let files = form::extract_files(snapshot.files.as_deref());
            if !files.is_empty() {
                request = request.with_uploaded_files(files);
            }
        }

        Self::attach_body(request, &snapshot.body)
    }

    fn server_params(snapshot: &InboundRequestSnapshot) -> ServerParams {
        ServerParams {
            server_protocol: snapshot.server_protocol.clone(),
            request_method: snapshot.method.clone(),
            request_scheme: DEFAULT_SCHEME.to_string(),
            request_uri: snapshot.request_uri.clone(),
            query_string: snapshot.query_string.clone().unwrap_or_default(),
            server_port: snapshot.server_port,
            remote_addr: snapshot.remote_addr.clone(),
            request_time: snapshot.request_time,
            request_time_float: snapshot.request_time_float,
        }
    }

    fn attach_body(request: CanonicalRequest, raw: &[u8]) -> CanonicalRequest {
        if raw.is_empty() {
            return request;
        }

        request.with_body(BodyStream::from_bytes(raw))
    }
}
