//! Canonical immutable request.
//!
//! Every `with_*` call consumes the value and returns a new one. Parts are
//! held behind `Arc`, so clones share whatever a later `with_*` does not
//! replace.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;

use crate::http::body::BodyStream;
use crate::http::headers::HeaderSet;

/// Scheme reported for every request. The transport is never inspected.
pub const DEFAULT_SCHEME: &str = "http";

/// Base environment of a request, fixed at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ServerParams {
    pub server_protocol: String,
    pub request_method: String,
    pub request_scheme: String,
    pub request_uri: String,
    pub query_string: String,
    pub server_port: u16,
    pub remote_addr: String,
    pub request_time: u64,
    pub request_time_float: f64,
}

/// Metadata of one uploaded file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedFileDescriptor {
    pub field_name: String,
    pub tmp_path: PathBuf,
    pub client_filename: String,
    pub client_media_type: String,
    pub size: u64,
    pub error: i32,
}

impl UploadedFileDescriptor {
    pub fn is_ok(&self) -> bool {
        self.error == 0
    }
}

/// Decoded form fields, in submission order.
pub type ParsedBody = Vec<(String, String)>;

#[derive(Debug, Clone)]
pub struct CanonicalRequest {
    server: Arc<ServerParams>,
    method: Arc<str>,
    uri: Arc<str>,
    headers: Arc<HeaderSet>,
    query_params: Arc<[(String, String)]>,
    parsed_body: Option<Arc<ParsedBody>>,
    uploaded_files: Arc<[UploadedFileDescriptor]>,
    body: Option<Arc<BodyStream>>,
}

impl CanonicalRequest {
    /// Build a request from its environment. Query parameters are decoded
    /// from the query string.
    pub fn from_server_params(server: ServerParams) -> Self {
        let query_params: Vec<(String, String)> =
            url::form_urlencoded::parse(server.query_string.as_bytes())
                .into_owned()
                .collect();
        Self {
            method: Arc::from(server.request_method.as_str()),
            uri: Arc::from(server.request_uri.as_str()),
            server: Arc::new(server),
            headers: Arc::new(HeaderSet::new()),
            query_params: Arc::from(query_params),
            parsed_body: None,
            uploaded_files: Arc::from(Vec::new()),
            body: None,
        }
    }

    pub fn server_params(&self) -> &ServerParams {
        &self.server
    }

    pub fn method(&self) -> &str {
        &self.method
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    /// Path component of the URI.
    pub fn path(&self) -> &str {
        let uri: &str = &self.uri;
        uri.split_once('?').map_or(uri, |(path, _)| path)
    }

    pub fn scheme(&self) -> &str {
        &self.server.request_scheme
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    pub fn query_params(&self) -> &[(String, String)] {
        &self.query_params
    }

    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query_params
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn parsed_body(&self) -> Option<&ParsedBody> {
        self.parsed_body.as_deref()
    }

    pub fn uploaded_files(&self) -> &[UploadedFileDescriptor] {
        &self.uploaded_files
    }

    pub fn body(&self) -> Option<&BodyStream> {
        self.body.as_deref()
    }

    #[must_use]
    pub fn with_method(mut self, method: impl AsRef<str>) -> Self {
        self.method = Arc::from(method.as_ref());
        self
    }

    /// Replace every value of `name`.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.headers).set(name, value);
        self
    }

    #[must_use]
    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.headers).append(name, value);
        self
    }

    #[must_use]
    pub fn without_header(mut self, name: &str) -> Self {
        if self.headers.contains(name) {
            Arc::make_mut(&mut self.headers).remove(name);
        }
        self
    }

    #[must_use]
    pub fn with_parsed_body(mut self, body: ParsedBody) -> Self {
        self.parsed_body = Some(Arc::new(body));
        self
    }

    #[must_use]
    pub fn with_uploaded_files(mut self, files: Vec<UploadedFileDescriptor>) -> Self {
        self.uploaded_files = Arc::from(files);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: BodyStream) -> Self {
        self.body = Some(Arc::new(body));
        self
    }
}
