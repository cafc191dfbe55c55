//! Built-in application used by the `http-bridge` binary.
//!
//! Routes:
//! - `GET /healthcheck` → plain text liveness answer
//! - `* /echo` → JSON description of the canonical request
//! - anything else → 404

use serde_json::json;

use crate::bridge::{DispatchError, Dispatcher};
use crate::http::{CanonicalRequest, CanonicalResponse};

pub const HEALTH_MESSAGE: &str = "Everything is OK!";

#[derive(Debug, Default)]
pub struct DemoApp;

impl DemoApp {
    fn echo(
        request: &CanonicalRequest,
        response: CanonicalResponse,
    ) -> Result<CanonicalResponse, DispatchError> {
        let headers: serde_json::Map<String, serde_json::Value> = request
            .headers()
            .iter()
            .map(|(name, values)| (name.to_ascii_lowercase(), json!(values)))
            .collect();
        let body = request.body().map(|b| String::from_utf8_lossy(b.as_bytes()).into_owned());

        let document = json!({
            "server": request.server_params(),
            "method": request.method(),
            "uri": request.uri(),
            "headers": headers,
            "query": request.query_params(),
            "parsed_body": request.parsed_body(),
            "files": request.uploaded_files(),
            "body": body,
        });

        let encoded = serde_json::to_vec(&document)
            .map_err(|e| DispatchError::with_source("failed to encode echo document", e))?;

        Ok(response
            .with_header("Content-Type", "application/json")
            .with_body(encoded))
    }
}

impl Dispatcher for DemoApp {
    fn process(
        &self,
        request: CanonicalRequest,
        response: CanonicalResponse,
    ) -> Result<CanonicalResponse, DispatchError> {
        match (request.method(), request.path()) {
            ("GET", "/healthcheck") => {
                tracing::info!("Health check");
                Ok(response
                    .with_header("Content-Type", "text/plain")
                    .with_body(HEALTH_MESSAGE))
            }
            (_, "/echo") => Self::echo(&request, response),
            _ => Ok(response.with_status(404).with_body("Not Found")),
        }
    }
}
