//! Bulk import API
//!
//! POST /api/import/:entity, GET /api/import/entities

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::warn;

use crate::error::{ApiError, ApiResult};
use crate::import::{CandidateRecord, CommitOptions, CommitResult, EntityKind};
use crate::AppState;

/// POST /api/import/:entity request
#[derive(Debug, Deserialize)]
pub struct ImportRequest {
    /// Candidate records; non-object entries count as records without a name
    pub records: Vec<serde_json::Value>,

    #[serde(flatten)]
    pub options: CommitOptions,
}

/// One entry of GET /api/import/entities
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntityDescription {
    pub entity: EntityKind,
    pub identifying_field: &'static str,
    pub fields: Vec<&'static str>,
    /// Reference key → referenced table
    pub relations: BTreeMap<&'static str, &'static str>,
    pub list_fields: Vec<&'static str>,
}

impl From<EntityKind> for EntityDescription {
    fn from(kind: EntityKind) -> Self {
        let schema = kind.schema();
        Self {
            entity: kind,
            identifying_field: schema.identifying.key,
            fields: schema.keys(),
            relations: schema.references.iter().map(|r| (r.key, r.table)).collect(),
            list_fields: schema.lists.iter().map(|f| f.key).collect(),
        }
    }
}

/// POST /api/import/:entity
///
/// Imports the whole batch or nothing. 200 with `{inserted, total}` on
/// success; otherwise the structured import error.
pub async fn import_entities(
    State(state): State<AppState>,
    Path(entity): Path<String>,
    payload: Result<Json<ImportRequest>, JsonRejection>,
) -> ApiResult<Json<CommitResult>> {
    let kind = entity
        .parse::<EntityKind>()
        .map_err(|e| ApiError::NotFound(e.to_string()))?;

    let Json(request) = payload.map_err(|rejection| {
        warn!(entity = %kind, error = %rejection, "Rejected malformed import request");
        ApiError::BadRequest(rejection.body_text())
    })?;

    let records = request
        .records
        .into_iter()
        .map(CandidateRecord::from)
        .collect();

    let result = state.pipeline.run(kind, records, request.options).await?;

    Ok(Json(result))
}

/// GET /api/import/entities
pub async fn list_entities() -> Json<Vec<EntityDescription>> {
    Json(EntityKind::ALL.into_iter().map(EntityDescription::from).collect())
}

/// Build import routes
pub fn import_routes() -> Router<AppState> {
    Router::new()
        .route("/api/import/entities", get(list_entities))
        .route("/api/import/:entity", post(import_entities))
}
