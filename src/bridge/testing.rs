//! Sink double that records every call.

use crate::http::{MutableSink, SinkError};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SinkCall {
    Header(String, String),
    Status(u16),
    Write(Vec<u8>),
    End,
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub calls: Vec<SinkCall>,
    pub reject_status: bool,
}

impl RecordingSink {
    pub fn header(&self, name: &str) -> Option<String> {
        self.calls.iter().find_map(|call| match call {
            SinkCall::Header(n, v) if n.eq_ignore_ascii_case(name) => Some(v.clone()),
            _ => None,
        })
    }

    pub fn status(&self) -> Option<u16> {
        self.calls.iter().find_map(|call| match call {
            SinkCall::Status(code) => Some(*code),
            _ => None,
        })
    }

    pub fn writes(&self) -> Vec<Vec<u8>> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                SinkCall::Write(bytes) => Some(bytes.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn ended(&self) -> bool {
        self.calls.contains(&SinkCall::End)
    }
}

impl MutableSink for RecordingSink {
    fn set_header(&mut self, name: &str, value: &str) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Header(name.into(), value.into()));
        Ok(())
    }

    fn set_status(&mut self, status: u16) -> Result<(), SinkError> {
        if self.reject_status {
            return Err(SinkError::InvalidStatus(status));
        }
        self.calls.push(SinkCall::Status(status));
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), SinkError> {
        self.calls.push(SinkCall::Write(bytes.to_vec()));
        Ok(())
    }

    fn end(&mut self) -> Result<(), SinkError> {
        self.calls.push(SinkCall::End);
        Ok(())
    }
}
