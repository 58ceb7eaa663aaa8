use axum::{extract::State, http::HeaderMap, routing::post, Form, Json, Router};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::auth;
use crate::error::ApiError;
use crate::notify;
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenForm {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

pub async fn admin_token(
    State(state): State<Arc<AppState>>,
    Form(form): Form<TokenForm>,
) -> Result<Json<TokenResponse>, ApiError> {
    if !auth::check_admin_credentials(&state.config.auth, &form.username, &form.password) {
        return Err(ApiError::Unauthenticated(
            "Incorrect username or password".to_string(),
        ));
    }

    let access_token = auth::issue_access_token(&state.config.auth, &form.username)?;
    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
pub struct SendEmailRequest {
    pub to: String,
    pub subject: String,
    pub body: String,
    #[serde(default)]
    pub html: bool,
}

pub async fn admin_send_email(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SendEmailRequest>,
) -> Result<Json<Value>, ApiError> {
    auth::authorize(&state.config.auth, &headers)?;
    notify::email::send_email(&state.config.smtp, &req.to, &req.subject, &req.body, req.html)
        .await?;
    Ok(Json(json!({ "status": "sent" })))
}

#[derive(Debug, Deserialize)]
pub struct SendSmsRequest {
    pub to: String,
    pub body: String,
}

pub async fn admin_send_sms(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<SendSmsRequest>,
) -> Result<Json<Value>, ApiError> {
    auth::authorize(&state.config.auth, &headers)?;
    let sid = notify::sms::send_sms(&state.config.sms, &req.to, &req.body).await?;
    Ok(Json(json!({ "sid": sid })))
}

pub fn configure_admin_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/admin/token", post(admin_token))
        .route("/admin/email", post(admin_send_email))
        .route("/admin/sms", post(admin_send_sms))
}
