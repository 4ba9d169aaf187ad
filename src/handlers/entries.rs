//! Gratitude and testimonial feeds: create and list, wrapped in a success envelope.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use tracing::error;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{Collection, Document, InsertResult};

#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: &'static str,
    pub data: T,
}

/// Per-feed collection and response wording.
struct Feed {
    collection: Collection,
    created: &'static str,
    create_failed: &'static str,
    listed: &'static str,
    list_failed: &'static str,
}

const GRATITUDE: Feed = Feed {
    collection: Collection::Gratitude,
    created: "Gratitude created successfully",
    create_failed: "Gratitude create failed",
    listed: "Successfully retrieved gratitudes data",
    list_failed: "Gratitudes failed",
};

const TESTIMONIAL: Feed = Feed {
    collection: Collection::Testimonial,
    created: "Testimonial created successfully",
    create_failed: "Testimonial create failed",
    listed: "Successfully retrieved testimonial data",
    list_failed: "Testimonial failed",
};

async fn create_entry(
    state: &AppState,
    feed: &Feed,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<InsertResult>>), AppError> {
    let Ok(Json(Value::Object(fields))) = body else {
        return Err(AppError::EntryFailed(feed.create_failed));
    };
    let doc = state
        .documents()
        .insert(feed.collection, fields)
        .await
        .map_err(|e| {
            error!(collection = feed.collection.name(), error = %e, "insert failed");
            AppError::EntryFailed(feed.create_failed)
        })?;

    Ok((
        StatusCode::CREATED,
        Json(Envelope {
            success: true,
            message: feed.created,
            data: InsertResult::acknowledged(doc.id),
        }),
    ))
}

async fn list_entries(
    state: &AppState,
    feed: &Feed,
) -> Result<Json<Envelope<Vec<Document>>>, AppError> {
    let docs = state
        .documents()
        .find_all(feed.collection)
        .await
        .map_err(|e| {
            error!(collection = feed.collection.name(), error = %e, "list failed");
            AppError::EntryFailed(feed.list_failed)
        })?;

    Ok(Json(Envelope {
        success: true,
        message: feed.listed,
        data: docs,
    }))
}

/// POST /create-gratitude
pub async fn create_gratitude(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<InsertResult>>), AppError> {
    create_entry(&state, &GRATITUDE, body).await
}

/// GET /gratitudes
pub async fn list_gratitudes(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Document>>>, AppError> {
    list_entries(&state, &GRATITUDE).await
}

/// POST /create-testimonial
pub async fn create_testimonial(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Envelope<InsertResult>>), AppError> {
    create_entry(&state, &TESTIMONIAL, body).await
}

/// GET /testimonial
pub async fn list_testimonials(
    State(state): State<AppState>,
) -> Result<Json<Envelope<Vec<Document>>>, AppError> {
    list_entries(&state, &TESTIMONIAL).await
}
