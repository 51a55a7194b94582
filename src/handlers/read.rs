use axum::extract::rejection::JsonRejection;
use axum::{extract::State, Json};
use bson::{doc, Document};
use futures::TryStreamExt;
use serde_json::Value;

use crate::types::extjson;
use crate::types::requests::{require_body, AggregateRequest, QueryRequest, SampleRequest};
use crate::types::responses::{AggregateResponse, QueryResponse};
use crate::types::{AppError, AppState};

/// Execute a find query.
///
/// Body: `database`, `collection`, optional `filter`, `projection`, `sort`,
/// `limit` (default 100), `skip`.
pub async fn query(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let req = QueryRequest::from_body(require_body(payload)?)?;

    let collection = state.mongo.collection(&req.database, &req.collection);
    let mut find = collection.find(req.filter);
    if let Some(projection) = req.projection {
        find = find.projection(projection);
    }
    if let Some(sort) = req.sort {
        find = find.sort(sort);
    }
    if req.skip > 0 {
        find = find.skip(req.skip);
    }
    if req.limit > 0 {
        find = find.limit(req.limit);
    }

    let documents: Vec<Document> = find.await?.try_collect().await?;
    let documents: Vec<Value> = documents.into_iter().map(extjson::document_to_json).collect();

    tracing::debug!(
        "query on {}.{} returned {} documents",
        req.database,
        req.collection,
        documents.len()
    );

    Ok(Json(QueryResponse {
        database: req.database,
        collection: req.collection,
        count: documents.len(),
        documents,
    }))
}

/// Execute an aggregation pipeline.
///
/// Body: `database`, `collection`, `pipeline` (ordered array of stage objects).
pub async fn aggregate(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AggregateResponse>, AppError> {
    let req = AggregateRequest::from_body(require_body(payload)?)?;

    let collection = state.mongo.collection(&req.database, &req.collection);
    let results: Vec<Document> = collection.aggregate(req.pipeline).await?.try_collect().await?;
    let results: Vec<Value> = results.into_iter().map(extjson::document_to_json).collect();

    Ok(Json(AggregateResponse {
        database: req.database,
        collection: req.collection,
        count: results.len(),
        results,
    }))
}

/// Return a random sample of documents via a `$sample` stage.
///
/// Body: `database`, `collection`, optional `size` (default 5).
pub async fn sample(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<QueryResponse>, AppError> {
    let req = SampleRequest::from_body(require_body(payload)?)?;

    let pipeline = vec![doc! { "$sample": { "size": req.size } }];
    let collection = state.mongo.collection(&req.database, &req.collection);
    let documents: Vec<Document> = collection.aggregate(pipeline).await?.try_collect().await?;
    let documents: Vec<Value> = documents.into_iter().map(extjson::document_to_json).collect();

    Ok(Json(QueryResponse {
        database: req.database,
        collection: req.collection,
        count: documents.len(),
        documents,
    }))
}
