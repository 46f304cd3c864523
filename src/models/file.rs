use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::utils::errors::WorkflowError;

const BYTES_PER_MB: u64 = 1024 * 1024;

/// Metadata kept for a file attached to a task draft. File contents are not retained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Attachment {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: u64,
    pub size_label: String,
    pub mime_type: String,
    pub uploaded_at: DateTime<Utc>,
}

impl Attachment {
    pub fn new(file_name: &str, file_size: u64, mime_type: String, uploaded_at: DateTime<Utc>) -> Self {
        Attachment {
            id: Uuid::new_v4(),
            file_name: file_name.to_string(),
            file_size,
            size_label: format_file_size(file_size),
            mime_type,
            uploaded_at,
        }
    }
}

/// Named upload slots of the draft forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum FileSlot {
    Scheme,
    Interview,
    Media,
    Data,
    Other,
    Report,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UploadFileRequest {
    #[schema(format = "binary")]
    pub file: String,
}

pub fn upload_limit_bytes(limit_mb: u32) -> u64 {
    u64::from(limit_mb) * BYTES_PER_MB
}

/// Checks extension and size of an incoming file, returning its MIME type.
pub fn validate_file(file_name: &str, file_size: u64, limit_mb: u32) -> Result<mime::Mime, WorkflowError> {
    if file_name.trim().is_empty() {
        return Err(WorkflowError::validation("File name is required"));
    }

    if file_size > upload_limit_bytes(limit_mb) {
        return Err(WorkflowError::QuotaExceeded {
            size: format_file_size(file_size),
            limit_mb,
        });
    }

    let extension = Path::new(file_name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .unwrap_or_default();

    let mime_type = match extension.as_str() {
        "jpg" | "jpeg" => mime::IMAGE_JPEG.to_string(),
        "png" => mime::IMAGE_PNG.to_string(),
        "gif" => mime::IMAGE_GIF.to_string(),
        "pdf" => mime::APPLICATION_PDF.to_string(),
        "txt" => mime::TEXT_PLAIN.to_string(),
        "csv" => mime::TEXT_CSV.to_string(),
        "json" => mime::APPLICATION_JSON.to_string(),
        "doc" => "application/msword".to_string(),
        "docx" => "application/vnd.openxmlformats-officedocument.wordprocessingml.document".to_string(),
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet".to_string(),
        "zip" => "application/zip".to_string(),
        "mp3" => "audio/mpeg".to_string(),
        "wav" => "audio/wav".to_string(),
        "m4a" => "audio/mp4".to_string(),
        "mp4" => "video/mp4".to_string(),
        _ => {
            return Err(WorkflowError::validation(format!(
                "File type '{}' not allowed",
                extension
            )))
        }
    };

    mime_type
        .parse::<mime::Mime>()
        .map_err(|e| WorkflowError::validation(format!("Unrecognised file type: {}", e)))
}

/// Human readable size with at most two decimals, e.g. `2.4 MB`.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }

    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];
    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, UNITS[unit])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_sizes_like_the_upload_widget() {
        assert_eq!(format_file_size(0), "0 Bytes");
        assert_eq!(format_file_size(512), "512 Bytes");
        assert_eq!(format_file_size(1024), "1 KB");
        assert_eq!(format_file_size(1536), "1.5 KB");
        assert_eq!(format_file_size(2_516_582), "2.4 MB");
        assert_eq!(format_file_size(3 * 1024 * 1024 * 1024), "3 GB");
    }

    #[test]
    fn detects_mime_from_extension_case_insensitively() {
        let mime = validate_file("Interview_01.MP3", 2048, 50).unwrap();
        assert_eq!(mime.essence_str(), "audio/mpeg");

        let mime = validate_file("scheme.pdf", 10, 50).unwrap();
        assert_eq!(mime, mime::APPLICATION_PDF);
    }

    #[test]
    fn rejects_unknown_extensions() {
        let err = validate_file("payload.exe", 10, 50).unwrap_err();
        assert_eq!(err, WorkflowError::validation("File type 'exe' not allowed"));
    }

    #[test]
    fn enforces_the_upload_quota() {
        assert!(validate_file("data.xlsx", upload_limit_bytes(1), 1).is_ok());

        let err = validate_file("data.xlsx", upload_limit_bytes(1) + 1, 1).unwrap_err();
        assert!(matches!(err, WorkflowError::QuotaExceeded { limit_mb: 1, .. }));
    }
}
