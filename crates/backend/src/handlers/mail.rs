//! Mail route handlers.
//!
//! Message storage and IMAP synchronization are not implemented: the read
//! routes keep their stub contract while outbound delivery goes through the
//! SMTP mailer. Every route runs behind `require_session`, so the acting
//! identity is always available from the request extensions.

use axum::extract::{Path, Query, State};
use axum::{Extension, Json};
use chrono::Utc;
use serde::Deserialize;

use shared_types::{
    EmailResponse, InboxResponse, ReplyMailRequest, SendMailRequest, SendMailResponse,
    StatusResponse, SyncResponse,
};

use crate::auth::types::Claims;
use crate::error::{ApiError, ApiResult};
use crate::services::mailer::OutgoingMail;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct InboxQuery {
    limit: Option<usize>,
    offset: Option<usize>,
}

/// List received messages.
pub async fn inbox(Query(query): Query<InboxQuery>) -> ApiResult<Json<InboxResponse>> {
    let limit = query.limit.unwrap_or(20);
    let offset = query.offset.unwrap_or(0);

    // No message store yet, so the inbox is always empty.
    let emails = Vec::new();

    Ok(Json(InboxResponse {
        success: true,
        total: emails.len(),
        emails,
        limit,
        offset,
    }))
}

/// Fetch one message.
pub async fn get_email(Path(_id): Path<String>) -> ApiResult<Json<EmailResponse>> {
    Err(ApiError::NotFound("Email".to_string()))
}

/// Send a message. The `from` field is stamped from the session context,
/// never taken from the request.
pub async fn send_email(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SendMailRequest>,
) -> ApiResult<Json<SendMailResponse>> {
    if payload.to.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.body.trim().is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    let sent = state
        .mailer
        .send(OutgoingMail {
            from: claims.email,
            to: payload.to,
            cc: payload.cc,
            bcc: payload.bcc,
            subject: payload.subject,
            html_body: payload.body,
        })
        .await?;

    Ok(Json(SendMailResponse {
        success: true,
        message_id: sent.message_id,
    }))
}

/// Reply to a message. With no message store the original sender cannot be
/// looked up, so the recipient comes from the request.
pub async fn reply_email(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<ReplyMailRequest>,
) -> ApiResult<Json<SendMailResponse>> {
    if payload.to.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.body.trim().is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    tracing::debug!("Replying to message {:?}", payload.original_email_id);

    let sent = state
        .mailer
        .send(OutgoingMail {
            from: claims.email,
            to: payload.to,
            cc: payload.cc,
            bcc: payload.bcc,
            subject: format!("Re: {}", payload.subject),
            html_body: payload.body,
        })
        .await?;

    Ok(Json(SendMailResponse {
        success: true,
        message_id: sent.message_id,
    }))
}

/// Delete a message.
pub async fn delete_email(Path(_id): Path<String>) -> Json<StatusResponse> {
    // No message store yet, deletion is an acknowledged no-op.
    Json(StatusResponse {
        success: true,
        message: "Email deleted".to_string(),
    })
}

/// Trigger a mailbox synchronization. IMAP sync is out of scope, so this
/// reports an empty pass with a fresh timestamp.
pub async fn sync_mailbox() -> Json<SyncResponse> {
    Json(SyncResponse {
        success: true,
        synced: 0,
        last_sync: Utc::now().to_rfc3339(),
    })
}
