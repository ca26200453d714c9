use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::{EmailMessage, EmailSummary, EmailTemplate};

// ============================================================================
// Auth API Types
// ============================================================================

/// Credential pair submitted to `POST /api/auth/login`.
///
/// Call [`LoginRequest::normalized`] before validating: the email is matched
/// case-insensitively by the identity API and surrounding whitespace is never
/// significant.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email)]
    pub email: String,

    #[validate(length(min = 1))]
    pub password: String,
}

impl LoginRequest {
    /// Trim both fields and case-fold the email.
    pub fn normalized(self) -> Self {
        Self {
            email: self.email.trim().to_lowercase(),
            password: self.password.trim().to_string(),
        }
    }
}

/// Public projection of an authenticated member. The `role` claim is carried
/// inside the session token but is not exposed here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicUser {
    pub id: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub token: String,
    pub user: PublicUser,
}

// ============================================================================
// Mail API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendMailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplyMailRequest {
    pub original_email_id: Option<String>,
    pub to: String,
    pub subject: String,
    pub body: String,
    pub cc: Option<String>,
    pub bcc: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendMailResponse {
    pub success: bool,
    pub message_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct InboxResponse {
    pub success: bool,
    pub emails: Vec<EmailSummary>,
    pub total: usize,
    pub limit: usize,
    pub offset: usize,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EmailResponse {
    pub success: bool,
    pub email: EmailMessage,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub synced: usize,
    pub last_sync: String,
}

/// Generic acknowledgement for routes that only report an outcome.
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub success: bool,
    pub message: String,
}

// ============================================================================
// Template API Types
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
    pub category: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateTemplateRequest {
    pub name: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplatesResponse {
    pub success: bool,
    pub templates: Vec<EmailTemplate>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TemplateResponse {
    pub success: bool,
    pub template: EmailTemplate,
}
