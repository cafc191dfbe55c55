//! Host-side description of one incoming request.

use std::path::PathBuf;

/// One uploaded file as the host stored it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawUpload {
    /// Form field the file was sent under.
    pub field: String,
    /// Where the host spooled the content.
    pub tmp_name: PathBuf,
    /// Client-supplied filename.
    pub name: String,
    /// Client-declared MIME type.
    pub content_type: String,
    pub size: u64,
    /// 0 on success.
    pub error: i32,
}

/// Snapshot of an inbound request, owned by the host for the duration of
/// the exchange. The bridge only reads it.
#[derive(Debug, Clone, Default)]
pub struct InboundRequestSnapshot {
    pub method: String,
    pub server_protocol: String,
    pub request_uri: String,
    pub path_info: String,
    pub query_string: Option<String>,
    pub server_port: u16,
    pub remote_addr: String,
    pub request_time: u64,
    pub request_time_float: f64,
    /// Header pairs with host-assigned casing, in arrival order.
    pub headers: Vec<(String, String)>,
    pub body: Vec<u8>,
    pub post: Option<Vec<(String, String)>>,
    pub files: Option<Vec<RawUpload>>,
}

impl InboundRequestSnapshot {
    /// Minimal snapshot for `method` on `uri`, splitting off the query string.
    pub fn new(method: impl Into<String>, uri: impl Into<String>) -> Self {
        let request_uri = uri.into();
        let (path_info, query_string) = match request_uri.split_once('?') {
            Some((path, query)) => (path.to_string(), Some(query.to_string())),
            None => (request_uri.clone(), None),
        };
        Self {
            method: method.into(),
            server_protocol: "HTTP/1.1".to_string(),
            request_uri,
            path_info,
            query_string,
            server_port: 80,
            remote_addr: "127.0.0.1".to_string(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_post(mut self, post: Vec<(String, String)>) -> Self {
        self.post = Some(post);
        self
    }

    #[must_use]
    pub fn with_files(mut self, files: Vec<RawUpload>) -> Self {
        self.files = Some(files);
        self
    }

    /// First header value whose name matches case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_splits_query() {
        let snapshot = InboundRequestSnapshot::new("GET", "/search?q=rust&page=2");
        assert_eq!(snapshot.path_info, "/search");
        assert_eq!(snapshot.query_string.as_deref(), Some("q=rust&page=2"));

        let snapshot = InboundRequestSnapshot::new("GET", "/plain");
        assert_eq!(snapshot.path_info, "/plain");
        assert!(snapshot.query_string.is_none());
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let snapshot = InboundRequestSnapshot::new("POST", "/")
            .with_header("content-type", "application/json");
        assert_eq!(snapshot.header("Content-Type"), Some("application/json"));
        assert_eq!(snapshot.header("accept"), None);
    }
}
