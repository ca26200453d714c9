//! Email template route handlers.
//!
//! The catalog is the built-in notification set; template persistence is not
//! implemented, so the per-template routes keep their stub contract.

use axum::extract::Path;
use axum::Json;
use chrono::Utc;
use uuid::Uuid;

use shared_types::{
    CreateTemplateRequest, EmailTemplate, StatusResponse, TemplateResponse, TemplatesResponse,
    UpdateTemplateRequest,
};

use crate::error::{ApiError, ApiResult};

/// Built-in notification templates.
fn builtin_templates() -> Vec<EmailTemplate> {
    let template = |id: &str, name: &str, subject: &str, body: &str| EmailTemplate {
        id: id.to_string(),
        name: name.to_string(),
        subject: subject.to_string(),
        body: body.to_string(),
        category: None,
        created_at: None,
    };

    vec![
        template(
            "welcome",
            "Bienvenue",
            "Bienvenue sur RétroBus Mail",
            "<h1>Bienvenue</h1><p>Merci de vous être inscrit.</p>",
        ),
        template(
            "password_reset",
            "Réinitialiser le mot de passe",
            "Réinitialiser votre mot de passe",
            "<h1>Réinitialisation</h1><p>Cliquez <a href=\"{reset_link}\">ici</a> pour réinitialiser.</p>",
        ),
        template(
            "event_notification",
            "Notification d'événement",
            "Nouvel événement RétroBus",
            "<h1>Événement</h1><p>Un nouvel événement a été créé: {event_name}</p>",
        ),
        template(
            "maintenance_alert",
            "Alerte maintenance",
            "Alerte maintenance véhicule",
            "<h1>Maintenance</h1><p>Maintenance requise pour: {vehicle_name}</p>",
        ),
    ]
}

/// List available templates.
pub async fn list_templates() -> Json<TemplatesResponse> {
    Json(TemplatesResponse {
        success: true,
        templates: builtin_templates(),
    })
}

/// Fetch one template. Templates are not persisted, so there is nothing to
/// look up by id.
pub async fn get_template(Path(_id): Path<String>) -> ApiResult<Json<TemplateResponse>> {
    Err(ApiError::NotFound("Template".to_string()))
}

/// Create a template. The result is echoed back but not stored.
pub async fn create_template(
    Json(payload): Json<CreateTemplateRequest>,
) -> ApiResult<Json<TemplateResponse>> {
    if payload.name.trim().is_empty()
        || payload.subject.trim().is_empty()
        || payload.body.trim().is_empty()
    {
        return Err(ApiError::BadRequest("Missing required fields".to_string()));
    }

    Ok(Json(TemplateResponse {
        success: true,
        template: EmailTemplate {
            id: Uuid::new_v4().to_string(),
            name: payload.name,
            subject: payload.subject,
            body: payload.body,
            category: Some(payload.category.unwrap_or_else(|| "custom".to_string())),
            created_at: Some(Utc::now()),
        },
    }))
}

/// Update a template. Echoed back but not stored.
pub async fn update_template(
    Path(id): Path<String>,
    Json(payload): Json<UpdateTemplateRequest>,
) -> Json<TemplateResponse> {
    Json(TemplateResponse {
        success: true,
        template: EmailTemplate {
            id,
            name: payload.name,
            subject: payload.subject,
            body: payload.body,
            category: None,
            created_at: None,
        },
    })
}

/// Delete a template.
pub async fn delete_template(Path(_id): Path<String>) -> Json<StatusResponse> {
    Json(StatusResponse {
        success: true,
        message: "Template deleted".to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_catalog_lists_builtin_templates() {
        let Json(response) = list_templates().await;

        assert!(response.success);
        let ids: Vec<&str> = response.templates.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(
            ids,
            vec![
                "welcome",
                "password_reset",
                "event_notification",
                "maintenance_alert"
            ]
        );
        assert_eq!(response.templates[0].name, "Bienvenue");
    }

    #[tokio::test]
    async fn test_get_template_is_not_found() {
        let result = get_template(Path("welcome".to_string())).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_create_template_requires_fields() {
        let result = create_template(Json(CreateTemplateRequest {
            name: "Relance cotisation".to_string(),
            subject: String::new(),
            body: "<p>…</p>".to_string(),
            category: None,
        }))
        .await;

        assert!(matches!(result, Err(ApiError::BadRequest(_))));
    }

    #[tokio::test]
    async fn test_create_template_defaults_category() {
        let Json(response) = create_template(Json(CreateTemplateRequest {
            name: "Relance cotisation".to_string(),
            subject: "Cotisation 2025".to_string(),
            body: "<p>Pensez à renouveler.</p>".to_string(),
            category: None,
        }))
        .await
        .expect("should create");

        assert_eq!(response.template.category.as_deref(), Some("custom"));
        assert!(response.template.created_at.is_some());
        assert!(!response.template.id.is_empty());
    }

    #[tokio::test]
    async fn test_update_template_echoes_id_and_fields() {
        let Json(response) = update_template(
            Path("welcome".to_string()),
            Json(UpdateTemplateRequest {
                name: "Bienvenue (v2)".to_string(),
                subject: "Bienvenue".to_string(),
                body: "<h1>Bienvenue</h1>".to_string(),
            }),
        )
        .await;

        assert_eq!(response.template.id, "welcome");
        assert_eq!(response.template.name, "Bienvenue (v2)");
    }

    #[tokio::test]
    async fn test_delete_template_acknowledges() {
        let Json(response) = delete_template(Path("welcome".to_string())).await;
        assert!(response.success);
        assert_eq!(response.message, "Template deleted");
    }
}
