//! Free-form documents stored in the supplies, gratitude and testimonial collections.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// Document body: arbitrary JSON fields.
pub type Fields = serde_json::Map<String, serde_json::Value>;

/// Key under which a document exposes its identifier.
pub const ID_FIELD: &str = "_id";

/// Document collections backed by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
    Supplies,
    Gratitude,
    Testimonial,
}

impl Collection {
    pub const ALL: [Collection; 3] = [
        Collection::Supplies,
        Collection::Gratitude,
        Collection::Testimonial,
    ];

    /// Table / collection name in the store.
    pub fn name(&self) -> &'static str {
        match self {
            Collection::Supplies => "supplies",
            Collection::Gratitude => "gratitude",
            Collection::Testimonial => "testimonial",
        }
    }
}

/// Store-assigned document identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(Uuid);

impl DocumentId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parse a client-supplied id; malformed input never reaches the store.
    pub fn parse(raw: &str) -> AppResult<Self> {
        Uuid::parse_str(raw)
            .map(Self)
            .map_err(|_| AppError::InvalidIdentifier)
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for DocumentId {
    fn default() -> Self {
        Self::new()
    }
}

impl From<Uuid> for DocumentId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A stored document: its id plus the submitted fields, serialized flat.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Document {
    #[serde(rename = "_id")]
    pub id: DocumentId,
    #[serde(flatten)]
    pub fields: Fields,
}

impl Document {
    /// Build a document from client fields. A client `_id` is dropped; the store owns ids.
    pub fn new(id: DocumentId, mut fields: Fields) -> Self {
        fields.remove(ID_FIELD);
        Self { id, fields }
    }
}

/// Acknowledgement returned by insert-style endpoints.
#[derive(Debug, Clone, Serialize)]
pub struct InsertResult {
    pub acknowledged: bool,
    #[serde(rename = "insertedId")]
    pub inserted_id: DocumentId,
}

impl InsertResult {
    pub fn acknowledged(id: DocumentId) -> Self {
        Self {
            acknowledged: true,
            inserted_id: id,
        }
    }
}
