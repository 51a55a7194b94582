use axum::{
    extract::{Path, State},
    Json,
};
use bson::{doc, Bson, Document};
use futures::TryStreamExt;

use crate::types::extjson;
use crate::types::responses::{
    CollectionInfo, CollectionList, CountResponse, DatabaseInfo, DatabaseList, IndexesResponse,
};
use crate::types::{AppError, AppState};

pub async fn list_databases(
    State(state): State<AppState>,
) -> Result<Json<DatabaseList>, AppError> {
    let databases = state
        .mongo
        .list_databases()
        .await?
        .into_iter()
        .map(|spec| DatabaseInfo {
            name: spec.name,
            size_on_disk: spec.size_on_disk,
            empty: spec.empty,
        })
        .collect();

    Ok(Json(DatabaseList { databases }))
}

/// List collections in a database, enriched with `collStats` where the server
/// provides them. Stats failures degrade to a name-only entry.
pub async fn list_collections(
    State(state): State<AppState>,
    Path(db): Path<String>,
) -> Result<Json<CollectionList>, AppError> {
    let database = state.mongo.database(&db);
    let names = database.list_collection_names().await?;

    let mut collections = Vec::with_capacity(names.len());
    for name in names {
        let info = match database.run_command(doc! { "collStats": name.as_str() }).await {
            Ok(stats) => CollectionInfo {
                name,
                count: stat_i64(&stats, "count"),
                size: stat_i64(&stats, "size"),
                avg_obj_size: stat_i64(&stats, "avgObjSize"),
            },
            Err(_) => CollectionInfo {
                name,
                count: None,
                size: None,
                avg_obj_size: None,
            },
        };
        collections.push(info);
    }

    Ok(Json(CollectionList {
        database: db,
        collections,
    }))
}

pub async fn count_documents(
    State(state): State<AppState>,
    Path((db, collection)): Path<(String, String)>,
) -> Result<Json<CountResponse>, AppError> {
    let count = state
        .mongo
        .collection(&db, &collection)
        .estimated_document_count()
        .await?;

    Ok(Json(CountResponse {
        database: db,
        collection,
        count,
    }))
}

pub async fn list_indexes(
    State(state): State<AppState>,
    Path((db, collection)): Path<(String, String)>,
) -> Result<Json<IndexesResponse>, AppError> {
    let models: Vec<mongodb::IndexModel> = state
        .mongo
        .collection(&db, &collection)
        .list_indexes()
        .await?
        .try_collect()
        .await?;

    let indexes = models
        .into_iter()
        .map(|model| {
            let doc = bson::to_document(&model)
                .map_err(|e| AppError::Database(e.to_string()))?;
            Ok(extjson::document_to_json(doc))
        })
        .collect::<Result<Vec<_>, AppError>>()?;

    Ok(Json(IndexesResponse {
        database: db,
        collection,
        indexes,
    }))
}

/// collStats values come back as Int32, Int64 or Double depending on server
/// version; normalize to i64.
fn stat_i64(stats: &Document, key: &str) -> Option<i64> {
    match stats.get(key) {
        Some(Bson::Int32(n)) => Some(i64::from(*n)),
        Some(Bson::Int64(n)) => Some(*n),
        Some(Bson::Double(n)) => Some(*n as i64),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_i64_accepts_numeric_variants() {
        let stats = doc! { "a": 3_i32, "b": 4_i64, "c": 5.0 };
        assert_eq!(stat_i64(&stats, "a"), Some(3));
        assert_eq!(stat_i64(&stats, "b"), Some(4));
        assert_eq!(stat_i64(&stats, "c"), Some(5));
        assert_eq!(stat_i64(&stats, "missing"), None);
    }
}
