//! Request envelopes for the body-driven operations.
//!
//! Bodies arrive as schema-less JSON. Each operation has an explicit
//! `from_body` validator that checks required fields and converts the dynamic
//! value into a typed struct; handlers never touch raw JSON after that point.

use axum::extract::rejection::JsonRejection;
use axum::Json;
use bson::Document;
use serde_json::{Map, Value};

use crate::types::error::AppError;
use crate::types::extjson;

/// Unwrap the JSON body extractor, mapping malformed JSON to a 400.
pub fn require_body(payload: Result<Json<Value>, JsonRejection>) -> Result<Value, AppError> {
    let Json(body) = payload.map_err(|e| AppError::BadRequest(format!("Invalid JSON body: {}", e)))?;
    Ok(body)
}

#[derive(Debug)]
pub struct QueryRequest {
    pub database: String,
    pub collection: String,
    pub filter: Document,
    pub projection: Option<Document>,
    pub sort: Option<Document>,
    pub limit: i64,
    pub skip: u64,
}

impl QueryRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        Ok(Self {
            database: take_required_str(&mut map, "database")?,
            collection: take_required_str(&mut map, "collection")?,
            filter: take_document_or_default(&mut map, "filter")?,
            projection: take_optional_document(&mut map, "projection")?,
            sort: take_optional_document(&mut map, "sort")?,
            limit: take_integer_or_default(&map, "limit", 100)?,
            skip: take_integer_or_default(&map, "skip", 0)? as u64,
        })
    }
}

#[derive(Debug)]
pub struct AggregateRequest {
    pub database: String,
    pub collection: String,
    pub pipeline: Vec<Document>,
}

impl AggregateRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        let database = take_required_str(&mut map, "database")?;
        let collection = take_required_str(&mut map, "collection")?;
        let pipeline = match map.remove("pipeline") {
            Some(Value::Array(stages)) => extjson::json_to_documents(stages)?,
            Some(_) => {
                return Err(AppError::BadRequest(
                    "pipeline must be an array of stage objects".to_string(),
                ))
            }
            None => {
                return Err(AppError::BadRequest(
                    "database, collection, and pipeline are required".to_string(),
                ))
            }
        };
        Ok(Self {
            database,
            collection,
            pipeline,
        })
    }
}

#[derive(Debug)]
pub struct InsertRequest {
    pub database: String,
    pub collection: String,
    pub documents: Vec<Document>,
    pub ordered: bool,
}

impl InsertRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        let database = take_required_str(&mut map, "database")?;
        let collection = take_required_str(&mut map, "collection")?;
        let ordered = take_bool_or_default(&map, "ordered", true)?;

        // A single object is normalized to a one-element list.
        let documents = match map.remove("documents") {
            Some(obj @ Value::Object(_)) => vec![extjson::json_to_document(obj)?],
            Some(Value::Array(items)) if !items.is_empty() => extjson::json_to_documents(items)?,
            Some(Value::Array(_)) | None => {
                return Err(AppError::BadRequest(
                    "database, collection, and documents are required".to_string(),
                ))
            }
            Some(_) => {
                return Err(AppError::BadRequest(
                    "documents must be an object or an array of objects".to_string(),
                ))
            }
        };

        Ok(Self {
            database,
            collection,
            documents,
            ordered,
        })
    }
}

#[derive(Debug)]
pub struct UpdateRequest {
    pub database: String,
    pub collection: String,
    pub filter: Document,
    pub update: Document,
    pub many: bool,
    pub upsert: bool,
}

impl UpdateRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        let database = take_required_str(&mut map, "database")?;
        let collection = take_required_str(&mut map, "collection")?;
        let filter = take_document_or_default(&mut map, "filter")?;
        let update = match map.remove("update") {
            Some(value) => extjson::json_to_document(value)?,
            None => {
                return Err(AppError::BadRequest(
                    "database, collection, and update are required".to_string(),
                ))
            }
        };
        Ok(Self {
            database,
            collection,
            filter,
            update,
            many: take_bool_or_default(&map, "many", false)?,
            upsert: take_bool_or_default(&map, "upsert", false)?,
        })
    }
}

#[derive(Debug)]
pub struct DeleteRequest {
    pub database: String,
    pub collection: String,
    pub filter: Document,
    pub many: bool,
}

impl DeleteRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        Ok(Self {
            database: take_required_str(&mut map, "database")?,
            collection: take_required_str(&mut map, "collection")?,
            filter: take_document_or_default(&mut map, "filter")?,
            many: take_bool_or_default(&map, "many", false)?,
        })
    }
}

#[derive(Debug)]
pub struct CommandRequest {
    pub database: String,
    pub command: Document,
}

impl CommandRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        let database = match map.remove("database") {
            Some(Value::String(s)) if !s.is_empty() => s,
            Some(Value::String(_)) | None => "admin".to_string(),
            Some(_) => return Err(AppError::BadRequest("database must be a string".to_string())),
        };
        let command = match map.remove("command") {
            Some(value) => extjson::json_to_document(value)?,
            None => return Err(AppError::BadRequest("command is required".to_string())),
        };
        Ok(Self { database, command })
    }
}

#[derive(Debug)]
pub struct SampleRequest {
    pub database: String,
    pub collection: String,
    pub size: i64,
}

impl SampleRequest {
    pub fn from_body(body: Value) -> Result<Self, AppError> {
        let mut map = body_object(body)?;
        Ok(Self {
            database: take_required_str(&mut map, "database")?,
            collection: take_required_str(&mut map, "collection")?,
            size: take_integer_or_default(&map, "size", 5)?,
        })
    }
}

fn body_object(body: Value) -> Result<Map<String, Value>, AppError> {
    match body {
        Value::Object(map) => Ok(map),
        Value::Null => Err(AppError::BadRequest("Request body required".to_string())),
        _ => Err(AppError::BadRequest(
            "Request body must be a JSON object".to_string(),
        )),
    }
}

fn take_required_str(map: &mut Map<String, Value>, key: &str) -> Result<String, AppError> {
    match map.remove(key) {
        Some(Value::String(s)) if !s.is_empty() => Ok(s),
        _ => Err(AppError::BadRequest(
            "database and collection are required".to_string(),
        )),
    }
}

fn take_document_or_default(map: &mut Map<String, Value>, key: &str) -> Result<Document, AppError> {
    match map.remove(key) {
        Some(Value::Null) | None => Ok(Document::new()),
        Some(value) => extjson::json_to_document(value),
    }
}

fn take_optional_document(
    map: &mut Map<String, Value>,
    key: &str,
) -> Result<Option<Document>, AppError> {
    match map.remove(key) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => Ok(Some(extjson::json_to_document(value)?)),
    }
}

fn take_integer_or_default(
    map: &Map<String, Value>,
    key: &str,
    default: i64,
) -> Result<i64, AppError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(value) => value
            .as_i64()
            .filter(|n| *n >= 0)
            .ok_or_else(|| AppError::BadRequest(format!("{} must be a non-negative integer", key))),
    }
}

fn take_bool_or_default(map: &Map<String, Value>, key: &str, default: bool) -> Result<bool, AppError> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(default),
        Some(Value::Bool(b)) => Ok(*b),
        Some(_) => Err(AppError::BadRequest(format!("{} must be a boolean", key))),
    }
}
