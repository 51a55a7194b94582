use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Serialize, Deserialize)]
pub struct ServiceInfo {
    pub service: String,
    pub status: String,
    pub auth_required: bool,
    pub endpoints: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

#[derive(Serialize, Deserialize)]
pub struct DatabaseInfo {
    pub name: String,
    #[serde(rename = "sizeOnDisk")]
    pub size_on_disk: u64,
    pub empty: bool,
}

#[derive(Serialize, Deserialize)]
pub struct DatabaseList {
    pub databases: Vec<DatabaseInfo>,
}

#[derive(Serialize, Deserialize)]
pub struct CollectionInfo {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<i64>,
    #[serde(rename = "avgObjSize", skip_serializing_if = "Option::is_none")]
    pub avg_obj_size: Option<i64>,
}

#[derive(Serialize, Deserialize)]
pub struct CollectionList {
    pub database: String,
    pub collections: Vec<CollectionInfo>,
}

#[derive(Serialize, Deserialize)]
pub struct QueryResponse {
    pub database: String,
    pub collection: String,
    pub count: usize,
    pub documents: Vec<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct AggregateResponse {
    pub database: String,
    pub collection: String,
    pub count: usize,
    pub results: Vec<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct InsertResponse {
    pub database: String,
    pub collection: String,
    pub inserted_count: usize,
    pub inserted_ids: Vec<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct UpdateResponse {
    pub database: String,
    pub collection: String,
    pub matched_count: u64,
    pub modified_count: u64,
    pub upserted_id: Option<Value>,
}

#[derive(Serialize, Deserialize)]
pub struct DeleteResponse {
    pub database: String,
    pub collection: String,
    pub deleted_count: u64,
}

#[derive(Serialize, Deserialize)]
pub struct CommandResponse {
    pub database: String,
    pub result: Value,
}

#[derive(Serialize, Deserialize)]
pub struct CountResponse {
    pub database: String,
    pub collection: String,
    pub count: u64,
}

#[derive(Serialize, Deserialize)]
pub struct IndexesResponse {
    pub database: String,
    pub collection: String,
    pub indexes: Vec<Value>,
}
