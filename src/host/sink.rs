//! Ordered response sink backed by an axum response.

use axum::{
    body::Body,
    http::{HeaderName, HeaderValue, StatusCode},
    response::Response,
};

use crate::http::{MutableSink, SinkError};

/// Collects one response in header → status → body order.
///
/// Setting a header that already exists replaces it.
#[derive(Debug, Default)]
pub struct HostSink {
    headers: Vec<(HeaderName, HeaderValue)>,
    status: Option<StatusCode>,
    body: Option<Vec<u8>>,
    ended: bool,
}

impl HostSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    pub fn status(&self) -> Option<StatusCode> {
        self.status
    }

    /// Build the final response. A sink ended without a status answers 200.
    pub fn into_response(self) -> Response {
        let mut response = Response::new(self.body.map_or_else(Body::empty, Body::from));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        let headers = response.headers_mut();
        for (name, value) in self.headers {
            headers.insert(name, value);
        }
        response
    }

    fn ensure_open(&self) -> Result<(), SinkError> {
        if self.ended {
            Err(SinkError::Ended)
        } else {
            Ok(())
        }
    }
}

impl MutableSink for HostSink {
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), SinkError> {
        self.ensure_open()?;
        if self.status.is_some() {
            return Err(SinkError::HeaderAfterStatus(name.to_string()));
        }

        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| SinkError::InvalidHeader(name.to_string()))?;
        let header_value =
            HeaderValue::from_str(value).map_err(|_| SinkError::InvalidHeader(name.to_string()))?;

        self.headers.retain(|(existing, _)| *existing != header_name);
        self.headers.push((header_name, header_value));
        Ok(())
    }

    fn set_status(&mut self, status: u16) -> Result<(), SinkError> {
        self.ensure_open()?;
        if self.body.is_some() {
            return Err(SinkError::StatusAfterBody);
        }
        self.status = Some(StatusCode::from_u16(status).map_err(|_| SinkError::InvalidStatus(status))?);
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.ensure_open()?;
        if self.status.is_none() {
            return Err(SinkError::BodyBeforeStatus);
        }
        if self.body.is_some() {
            return Err(SinkError::BodyAlreadyWritten);
        }
        self.body = Some(bytes.to_vec());
        Ok(())
    }

    fn end(&mut self) -> Result<(), SinkError> {
        self.ensure_open()?;
        self.ended = true;
        Ok(())
    }
}
