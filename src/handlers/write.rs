use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use serde_json::Value;

use crate::types::extjson;
use crate::types::requests::{require_body, DeleteRequest, InsertRequest, UpdateRequest};
use crate::types::responses::{DeleteResponse, InsertResponse, UpdateResponse};
use crate::types::{AppError, AppState};

/// Insert one or more documents.
///
/// Body: `database`, `collection`, `documents` (single object or array),
/// optional `ordered` (default true).
pub async fn insert(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<InsertResponse>, AppError> {
    let req = InsertRequest::from_body(require_body(payload)?)?;

    let collection = state.mongo.collection(&req.database, &req.collection);
    let result = collection
        .insert_many(req.documents)
        .ordered(req.ordered)
        .await?;

    // The driver keys generated ids by input position.
    let mut ids: Vec<(usize, bson::Bson)> = result.inserted_ids.into_iter().collect();
    ids.sort_by_key(|(index, _)| *index);
    let inserted_ids: Vec<Value> = ids.into_iter().map(|(_, id)| extjson::bson_to_json(id)).collect();

    tracing::info!(
        "inserted {} documents into {}.{}",
        inserted_ids.len(),
        req.database,
        req.collection
    );

    Ok(Json(InsertResponse {
        database: req.database,
        collection: req.collection,
        inserted_count: inserted_ids.len(),
        inserted_ids,
    }))
}

/// Update matching documents.
///
/// Body: `database`, `collection`, `filter`, `update`, optional `many`
/// (default false) and `upsert` (default false). With `many=false` the server
/// applies the update to one matching document in its natural scan order,
/// which is unordered and non-deterministic.
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, AppError> {
    let req = UpdateRequest::from_body(require_body(payload)?)?;

    let collection = state.mongo.collection(&req.database, &req.collection);
    let result = if req.many {
        collection
            .update_many(req.filter, req.update)
            .upsert(req.upsert)
            .await?
    } else {
        collection
            .update_one(req.filter, req.update)
            .upsert(req.upsert)
            .await?
    };

    Ok(Json(UpdateResponse {
        database: req.database,
        collection: req.collection,
        matched_count: result.matched_count,
        modified_count: result.modified_count,
        upserted_id: result.upserted_id.map(extjson::bson_to_json),
    }))
}

/// Delete matching documents.
///
/// Body: `database`, `collection`, `filter`, optional `many` (default false).
/// With `many=false` exactly one matching document is removed, chosen by the
/// server's natural scan order.
pub async fn delete(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<DeleteResponse>, AppError> {
    let req = DeleteRequest::from_body(require_body(payload)?)?;

    let collection = state.mongo.collection(&req.database, &req.collection);
    let result = if req.many {
        collection.delete_many(req.filter).await?
    } else {
        collection.delete_one(req.filter).await?
    };

    Ok(Json(DeleteResponse {
        database: req.database,
        collection: req.collection,
        deleted_count: result.deleted_count,
    }))
}
