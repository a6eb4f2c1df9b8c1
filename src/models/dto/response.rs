use serde::{Deserialize, Serialize};

use crate::models::domain::user::AuthUser;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LoginResponse {
    pub token: String,
    #[serde(default)]
    pub user: AuthUser,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ForgotPasswordResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Returned by both the multipart and the by-URL upload endpoints.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct UploadResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub url: Option<String>,
    #[serde(rename = "type", default)]
    pub media_type: Option<String>,
}
