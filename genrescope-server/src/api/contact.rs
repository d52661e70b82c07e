//! Contact-form endpoint

use axum::{extract::State, routing::post, Json, Router};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::services::contact_log::{append_message, ContactMessage};
use crate::AppState;

/// Contact form body
#[derive(Debug, Deserialize)]
pub struct ContactForm {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Acknowledgement body
#[derive(Debug, Serialize)]
pub struct ContactResponse {
    pub message: String,
}

/// POST /api/contact
pub async fn submit_contact(
    State(state): State<AppState>,
    Json(form): Json<ContactForm>,
) -> ApiResult<Json<ContactResponse>> {
    if form.message.trim().is_empty() {
        return Err(ApiError::BadRequest("message must not be empty".to_string()));
    }

    append_message(
        &state.config.contact_log_path,
        ContactMessage::new(form.name, form.email, form.message),
    )
    .await?;

    Ok(Json(ContactResponse {
        message: "Thank you for reaching out! We'll get back to you soon.".to_string(),
    }))
}

/// Build contact routes
pub fn contact_routes() -> Router<AppState> {
    Router::new().route("/api/contact", post(submit_contact))
}
