//! Canonical response produced by the dispatcher.

use crate::http::body::ResponseBody;
use crate::http::headers::HeaderSet;

#[derive(Debug)]
pub struct CanonicalResponse {
    status: u16,
    headers: HeaderSet,
    body: ResponseBody,
}

impl CanonicalResponse {
    /// Empty `200` response.
    pub fn new() -> Self {
        Self {
            status: 200,
            headers: HeaderSet::new(),
            body: ResponseBody::empty(),
        }
    }

    pub fn status(&self) -> u16 {
        self.status
    }

    pub fn headers(&self) -> &HeaderSet {
        &self.headers
    }

    pub fn body(&self) -> &ResponseBody {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut ResponseBody {
        &mut self.body
    }

    pub fn into_body(self) -> ResponseBody {
        self.body
    }

    #[must_use]
    pub fn with_status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.set(name, value);
        self
    }

    #[must_use]
    pub fn with_added_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<ResponseBody>) -> Self {
        self.body = body.into();
        self
    }
}

impl Default for CanonicalResponse {
    fn default() -> Self {
        Self::new()
    }
}
