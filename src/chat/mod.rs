use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use diesel::prelude::*;
use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;

use crate::error::ApiError;
use crate::llm::ChatProvider;
use crate::shared::models::NewMessage;
use crate::shared::schema::messages;
use crate::shared::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub message: String,
    pub ticket_id: Option<i32>,
    pub history: Option<Vec<Value>>,
    pub system_prompt: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub reply: String,
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, ApiError> {
    if req.message.trim().is_empty() {
        return Err(ApiError::Validation("message must not be empty".to_string()));
    }

    let history = req.history.unwrap_or_default();
    let reply = state
        .llm_provider
        .complete(&req.message, &history, req.system_prompt.as_deref())
        .await
        .map_err(|e| ApiError::Upstream(e.to_string()))?;

    // Transcript persistence is best effort: the reply still returns on
    // failure, which is only visible in the logs.
    if let Some(ticket_id) = req.ticket_id {
        if let Err(e) = record_exchange(&state, ticket_id, &req.message, &reply) {
            warn!("Failed to record chat exchange for ticket {ticket_id}: {e}");
        }
    }

    Ok(Json(ChatResponse { reply }))
}

fn record_exchange(
    state: &AppState,
    ticket_id: i32,
    user_message: &str,
    reply: &str,
) -> Result<(), ApiError> {
    let mut conn = state.conn.get()?;

    let user_turn = NewMessage {
        ticket_id: Some(ticket_id),
        role: "user".to_string(),
        content: user_message.to_string(),
        created_at: Utc::now(),
    };
    diesel::insert_into(messages::table)
        .values(&user_turn)
        .execute(&mut conn)
        .map_err(|e| ApiError::Database(format!("Insert error: {e}")))?;

    let assistant_turn = NewMessage {
        ticket_id: Some(ticket_id),
        role: "assistant".to_string(),
        content: reply.to_string(),
        created_at: Utc::now(),
    };
    diesel::insert_into(messages::table)
        .values(&assistant_turn)
        .execute(&mut conn)
        .map_err(|e| ApiError::Database(format!("Insert error: {e}")))?;

    Ok(())
}

pub fn configure_chat_routes() -> Router<Arc<AppState>> {
    Router::new().route("/chat", post(chat))
}
