//! Supplies CRUD handlers.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::AppError;
use crate::handlers::http::AppState;
use crate::models::{Collection, Document, DocumentId, Fields};

const SUPPLY_NOT_FOUND: &str = "Supply not found";

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

/// Replaceable supply fields; absent ones are stored as null.
#[derive(Debug, Deserialize)]
pub struct SupplyUpdate {
    #[serde(default)]
    pub title: Option<Value>,
    #[serde(default)]
    pub quantity: Option<Value>,
    #[serde(default)]
    pub category: Option<Value>,
}

impl SupplyUpdate {
    fn into_fields(self) -> Fields {
        let mut fields = Fields::new();
        fields.insert("title".into(), self.title.unwrap_or(Value::Null));
        fields.insert("quantity".into(), self.quantity.unwrap_or(Value::Null));
        fields.insert("category".into(), self.category.unwrap_or(Value::Null));
        fields
    }
}

/// GET /supplies
pub async fn list_supplies(
    State(state): State<AppState>,
) -> Result<Json<Vec<Document>>, AppError> {
    let docs = state.documents().find_all(Collection::Supplies).await?;
    Ok(Json(docs))
}

/// POST /supplies
pub async fn create_supply(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<Document>), AppError> {
    let Json(body) = body.map_err(|e| AppError::Validation(e.body_text()))?;
    let Value::Object(fields) = body else {
        return Err(AppError::Validation("Supply must be a JSON object".to_string()));
    };
    let doc = state
        .documents()
        .insert(Collection::Supplies, fields)
        .await?;
    Ok((StatusCode::CREATED, Json(doc)))
}

/// GET /supplies/:id
pub async fn get_supply(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Document>, AppError> {
    let id = DocumentId::parse(&id)?;
    let doc = state
        .documents()
        .find_one(Collection::Supplies, id)
        .await?
        .ok_or(AppError::NotFound(SUPPLY_NOT_FOUND))?;
    Ok(Json(doc))
}

/// PUT /supplies/:id — 404 when nothing was modified.
pub async fn update_supply(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SupplyUpdate>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = DocumentId::parse(&id)?;
    let modified = state
        .documents()
        .set_fields(Collection::Supplies, id, body.into_fields())
        .await?;
    if modified == 0 {
        return Err(AppError::NotFound(SUPPLY_NOT_FOUND));
    }
    Ok(Json(MessageResponse {
        message: "Supply updated successfully",
    }))
}

/// DELETE /supplies/:id
pub async fn delete_supply(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let id = DocumentId::parse(&id)?;
    let deleted = state.documents().delete(Collection::Supplies, id).await?;
    if deleted == 0 {
        return Err(AppError::NotFound("Document not found"));
    }
    Ok(Json(MessageResponse {
        message: "Document deleted successfully",
    }))
}
