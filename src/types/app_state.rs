use crate::clients::mongodb::MongoClient;
use crate::types::api_key::ApiKey;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub mongo: Arc<MongoClient>,
    pub api_key: Arc<ApiKey>,
}
