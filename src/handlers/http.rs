//! Shared application state and the status endpoint.

use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

use crate::auth::{AuthAppService, JwtSecret};
use crate::repositories::{DocumentStore, UserStore};

/// Shared application state: store handles and the auth service.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthAppService,
    pub documents: Arc<dyn DocumentStore>,
}

impl AppState {
    pub fn new(
        users: Arc<dyn UserStore>,
        documents: Arc<dyn DocumentStore>,
        jwt_secret: JwtSecret,
    ) -> Self {
        Self {
            auth: AuthAppService::new(users, jwt_secret),
            documents,
        }
    }

    pub fn auth(&self) -> &AuthAppService {
        &self.auth
    }
    pub fn documents(&self) -> &dyn DocumentStore {
        self.documents.as_ref()
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub message: &'static str,
    pub timestamp: DateTime<Utc>,
}

/// GET / — liveness probe.
pub async fn status() -> Json<StatusResponse> {
    Json(StatusResponse {
        message: "Server is running smoothly",
        timestamp: Utc::now(),
    })
}
