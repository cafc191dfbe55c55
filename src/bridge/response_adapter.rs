//! Canonical response → host sink.
//!
//! Write order is fixed: computed `Content-Length`, response headers, status,
//! then a single body write. The host sink rejects anything else.

use crate::error::BridgeError;
use crate::http::{CanonicalResponse, MutableSink};

/// Separator used when a header carries several values.
pub const HEADER_VALUE_SEPARATOR: &str = "; ";

#[derive(Debug, Clone, Copy)]
pub struct ResponseAdapter {
    auto_content_length: bool,
}

impl ResponseAdapter {
    pub fn new(auto_content_length: bool) -> Self {
        Self {
            auto_content_length,
        }
    }

    pub fn auto_content_length(&self) -> bool {
        self.auto_content_length
    }

    /// Write `response` into `sink` and hand the sink back.
    ///
    /// A failure after the status line leaves the sink partially written;
    /// the caller must discard it.
    pub fn merge<S: MutableSink>(
        &self,
        mut response: CanonicalResponse,
        mut sink: S,
    ) -> Result<S, BridgeError> {
        let size = response.body().size();

        if self.auto_content_length {
            if let Some(size) = size {
                sink.set_header("Content-Length", &size.to_string())?;
            }
        }

        for (name, values) in response.headers().iter() {
            sink.set_header(name, &values.join(HEADER_VALUE_SEPARATOR))?;
        }

        sink.set_status(response.status())?;

        let body = response.body_mut();
        let content = match size {
            Some(0) => None,
            Some(_) => {
                if body.is_seekable() {
                    body.rewind().map_err(BridgeError::Body)?;
                }
                Some(body.read_remaining().map_err(BridgeError::Body)?)
            }
            None => Some(body.read_remaining().map_err(BridgeError::Body)?),
        };

        if let Some(bytes) = content.filter(|bytes| !bytes.is_empty()) {
            sink.write(&bytes)?;
        }

        Ok(sink)
    }
}

impl Default for ResponseAdapter {
    fn default() -> Self {
        Self::new(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bridge::testing::{RecordingSink, SinkCall};
    use crate::http::ResponseBody;
    use std::io::{self, Cursor, Read};

    struct BrokenReader;

    impl Read for BrokenReader {
        fn read(&mut self, _buf: &mut [u8]) -> io::Result<usize> {
            Err(io::Error::new(io::ErrorKind::BrokenPipe, "upstream closed"))
        }
    }

    #[test]
    fn content_length_comes_first() {
        let response = CanonicalResponse::new()
            .with_header("Content-Type", "text/plain")
            .with_body(vec![b'x'; 42]);

        let sink = ResponseAdapter::new(true)
            .merge(response, RecordingSink::default())
            .unwrap();

        assert_eq!(
            sink.calls[0],
            SinkCall::Header("Content-Length".into(), "42".into())
        );
        assert_eq!(
            sink.calls[1],
            SinkCall::Header("Content-Type".into(), "text/plain".into())
        );
    }

    #[test]
    fn disabled_flag_injects_no_content_length() {
        let response = CanonicalResponse::new().with_body(vec![b'x'; 42]);

        let sink = ResponseAdapter::new(false)
            .merge(response, RecordingSink::default())
            .unwrap();

        assert!(sink.header("content-length").is_none());
        assert_eq!(sink.writes(), vec![vec![b'x'; 42]]);
    }

    #[test]
    fn explicit_content_length_is_sent_after_computed_one() {
        let response = CanonicalResponse::new()
            .with_header("Content-Length", "999")
            .with_body("four");

        let sink = ResponseAdapter::new(true)
            .merge(response, RecordingSink::default())
            .unwrap();

        let lengths: Vec<_> = sink
            .calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Header(name, value) if name.eq_ignore_ascii_case("content-length") => {
                    Some(value.as_str())
                }
                _ => None,
            })
            .collect();
        assert_eq!(lengths, vec!["4", "999"]);
    }

    #[test]
    fn unknown_size_skips_content_length() {
        let body = ResponseBody::streaming(Cursor::new(b"chunked".to_vec()), None);
        let response = CanonicalResponse::new().with_body(body);

        let sink = ResponseAdapter::new(true)
            .merge(response, RecordingSink::default())
            .unwrap();

        assert!(sink.header("Content-Length").is_none());
        assert_eq!(sink.writes(), vec![b"chunked".to_vec()]);
    }

    #[test]
    fn multi_value_headers_are_joined() {
        let response = CanonicalResponse::new()
            .with_added_header("X", "a")
            .with_added_header("X", "b");

        let sink = ResponseAdapter::new(false)
            .merge(response, RecordingSink::default())
            .unwrap();

        assert_eq!(sink.calls[0], SinkCall::Header("X".into(), "a; b".into()));
    }

    #[test]
    fn order_is_headers_status_body() {
        let response = CanonicalResponse::new()
            .with_status(201)
            .with_header("Location", "/items/1")
            .with_body("done");

        let sink = ResponseAdapter::new(true)
            .merge(response, RecordingSink::default())
            .unwrap();

        assert_eq!(
            sink.calls,
            vec![
                SinkCall::Header("Content-Length".into(), "4".into()),
                SinkCall::Header("Location".into(), "/items/1".into()),
                SinkCall::Status(201),
                SinkCall::Write(b"done".to_vec()),
            ]
        );
    }

    #[test]
    fn seekable_body_is_rewound_before_write() {
        let mut body = ResponseBody::from("payload");
        body.read_remaining().unwrap();
        let response = CanonicalResponse::new().with_body(body);

        let sink = ResponseAdapter::new(false)
            .merge(response, RecordingSink::default())
            .unwrap();

        assert_eq!(sink.writes(), vec![b"payload".to_vec()]);
    }

    #[test]
    fn empty_body_is_not_written() {
        let sink = ResponseAdapter::new(true)
            .merge(CanonicalResponse::new().with_status(204), RecordingSink::default())
            .unwrap();

        assert!(sink.writes().is_empty());
        assert_eq!(sink.header("Content-Length").as_deref(), Some("0"));
        assert_eq!(sink.status(), Some(204));
    }

    #[test]
    fn body_read_failure_is_reported_after_status() {
        let body = ResponseBody::streaming(BrokenReader, Some(10));
        let response = CanonicalResponse::new().with_body(body);

        let err = ResponseAdapter::new(true)
            .merge(response, RecordingSink::default())
            .unwrap_err();

        assert!(matches!(err, BridgeError::Body(_)));
    }

    #[test]
    fn sink_rejection_propagates() {
        let sink = RecordingSink {
            reject_status: true,
            ..RecordingSink::default()
        };

        let err = ResponseAdapter::new(false)
            .merge(CanonicalResponse::new(), sink)
            .unwrap_err();

        assert!(matches!(err, BridgeError::Sink(_)));
    }
}
