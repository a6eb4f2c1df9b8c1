use std::sync::Arc;

use reqwest::multipart::{Form, Part};
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    gateway::ApiGateway,
    models::dto::{request::UploadUrlRequest, response::UploadResponse},
    services::endpoints,
};

pub const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

pub const ALLOWED_MIME_TYPES: [&str; 9] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "video/mp4",
    "video/avi",
    "video/mov",
    "video/quicktime",
    "application/pdf",
];

/// A media file picked for upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl FileUpload {
    pub fn new(file_name: &str, mime_type: &str, bytes: Vec<u8>) -> Self {
        FileUpload {
            file_name: file_name.to_string(),
            mime_type: mime_type.to_string(),
            bytes,
        }
    }

    pub fn check(&self) -> AppResult<()> {
        if self.bytes.len() > MAX_UPLOAD_BYTES {
            return Err(AppError::ValidationFailure(
                "File size exceeds 50MB limit".to_string(),
            ));
        }
        if !ALLOWED_MIME_TYPES.contains(&self.mime_type.to_lowercase().as_str()) {
            return Err(AppError::ValidationFailure(
                "Invalid file type. Only images, videos, and PDFs are allowed.".to_string(),
            ));
        }
        Ok(())
    }

    fn into_form(self) -> AppResult<Form> {
        let part = Part::bytes(self.bytes)
            .file_name(self.file_name)
            .mime_str(&self.mime_type)
            .map_err(|e| AppError::ValidationFailure(format!("Invalid MIME type: {}", e)))?;
        Ok(Form::new().part("file", part))
    }
}

pub struct FileService {
    gateway: Arc<ApiGateway>,
}

impl FileService {
    pub fn new(gateway: Arc<ApiGateway>) -> Self {
        Self { gateway }
    }

    pub async fn upload_file(&self, upload: FileUpload) -> AppResult<UploadResponse> {
        self.upload_to(endpoints::FILE_UPLOAD, upload).await
    }

    /// Multipart upload to `path`; the backend must report success and a URL.
    pub(crate) async fn upload_to(&self, path: &str, upload: FileUpload) -> AppResult<UploadResponse> {
        upload.check()?;
        let size = upload.bytes.len();
        let response: UploadResponse = self
            .gateway
            .post_multipart(path, upload.into_form()?)
            .await?;
        log::info!("Uploaded {} bytes to {}", size, path);
        require_success(response, "Failed to upload media file")
    }

    /// Stores a reference to externally hosted media.
    pub async fn upload_url(&self, url: &str, title: &str) -> AppResult<UploadResponse> {
        let request = UploadUrlRequest {
            url: url.trim().to_string(),
            title: title.trim().to_string(),
        };
        request.validate()?;

        let response: UploadResponse = self
            .gateway
            .post_json(endpoints::FILE_UPLOAD_URL, &request)
            .await?;
        require_success(response, "Failed to store media URL")
    }
}

fn require_success(response: UploadResponse, failure: &str) -> AppResult<UploadResponse> {
    if response.success && response.url.is_some() {
        Ok(response)
    } else {
        Err(AppError::UpstreamFailure {
            status: 200,
            message: failure.to_string(),
        })
    }
}
