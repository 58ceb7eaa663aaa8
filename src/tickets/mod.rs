use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use chrono::Utc;
use diesel::prelude::*;
use serde::Deserialize;
use std::sync::Arc;

use crate::error::ApiError;
use crate::shared::models::{NewTicket, Ticket, TicketChangeset, TicketStatus};
use crate::shared::schema::tickets;
use crate::shared::state::AppState;

const DEFAULT_LIST_LIMIT: i64 = 50;

#[derive(Debug, Deserialize)]
pub struct CreateTicketRequest {
    pub title: String,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTicketRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TicketStatus>,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

pub async fn create_ticket(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateTicketRequest>,
) -> Result<Json<Ticket>, ApiError> {
    if req.title.trim().is_empty() {
        return Err(ApiError::Validation("title must not be empty".to_string()));
    }

    let mut conn = state.conn.get()?;
    let now = Utc::now();
    let new_ticket = NewTicket {
        title: req.title,
        description: req.description.unwrap_or_default(),
        status: TicketStatus::Open.as_str().to_string(),
        created_at: now,
        updated_at: now,
    };

    let ticket: Ticket = diesel::insert_into(tickets::table)
        .values(&new_ticket)
        .get_result(&mut conn)
        .map_err(|e| ApiError::Database(format!("Insert error: {e}")))?;

    Ok(Json(ticket))
}

pub async fn list_tickets(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<Ticket>>, ApiError> {
    let mut conn = state.conn.get()?;
    let limit = query.limit.unwrap_or(DEFAULT_LIST_LIMIT);

    let rows: Vec<Ticket> = tickets::table
        .order(tickets::created_at.desc())
        .limit(limit)
        .load(&mut conn)
        .map_err(|e| ApiError::Database(format!("Query error: {e}")))?;

    Ok(Json(rows))
}

pub async fn get_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<Ticket>, ApiError> {
    let mut conn = state.conn.get()?;

    let ticket: Ticket = tickets::table
        .find(id)
        .first(&mut conn)
        .map_err(not_found_or_db)?;

    Ok(Json(ticket))
}

pub async fn update_ticket(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(req): Json<UpdateTicketRequest>,
) -> Result<Json<Ticket>, ApiError> {
    if let Some(title) = &req.title {
        if title.trim().is_empty() {
            return Err(ApiError::Validation("title must not be empty".to_string()));
        }
    }

    let mut conn = state.conn.get()?;
    let changes = TicketChangeset {
        title: req.title,
        description: req.description,
        status: req.status.map(|s| s.as_str().to_string()),
        updated_at: Utc::now(),
    };

    let ticket: Ticket = diesel::update(tickets::table.find(id))
        .set(&changes)
        .get_result(&mut conn)
        .map_err(not_found_or_db)?;

    Ok(Json(ticket))
}

fn not_found_or_db(e: diesel::result::Error) -> ApiError {
    match e {
        diesel::result::Error::NotFound => ApiError::NotFound("Ticket not found".to_string()),
        e => ApiError::Database(format!("Query error: {e}")),
    }
}

pub fn configure_tickets_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/tickets", get(list_tickets).post(create_ticket))
        .route("/tickets/{id}", get(get_ticket).patch(update_ticket))
}
