//! Form data extraction from the host's pre-parsed payloads.
//!
//! The host has already decoded urlencoded and multipart bodies into a
//! post-fields mapping and a list of spooled files. Nothing here reads file
//! content or enforces limits; declared metadata is taken as-is.

use crate::http::{ParsedBody, RawUpload, UploadedFileDescriptor};

/// Content type markers that trigger form extraction.
pub const MULTIPART_FORM_DATA: &str = "multipart/form-data";
pub const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// Kind of form payload announced by a `Content-Type` value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormKind {
    Multipart,
    UrlEncoded,
}

impl FormKind {
    /// Classify a content type by case-insensitive substring match.
    pub fn detect(content_type: &str) -> Option<Self> {
        let lowered = content_type.to_ascii_lowercase();
        if lowered.contains(MULTIPART_FORM_DATA) {
            Some(Self::Multipart)
        } else if lowered.contains(FORM_URLENCODED) {
            Some(Self::UrlEncoded)
        } else {
            None
        }
    }
}

/// Parsed body from the host's post fields. Absent or empty yields `None`.
pub fn extract_fields(post: Option<&[(String, String)]>) -> Option<ParsedBody> {
    match post {
        Some(fields) if !fields.is_empty() => Some(fields.to_vec()),
        _ => None,
    }
}

/// One descriptor per uploaded file, in host order.
pub fn extract_files(files: Option<&[RawUpload]>) -> Vec<UploadedFileDescriptor> {
    files
        .unwrap_or_default()
        .iter()
        .map(|file| UploadedFileDescriptor {
            field_name: file.field.clone(),
            tmp_path: file.tmp_name.clone(),
            client_filename: file.name.clone(),
            client_media_type: file.content_type.clone(),
            size: file.size,
            error: file.error,
        })
        .collect()
}
