use mongodb::results::DatabaseSpecification;
use mongodb::{Client, Collection, Database};

/// Long-lived handle to the MongoDB server, created once at startup and shared
/// across all requests. The driver connects lazily and pools internally, so the
/// bridge starts even when the server is down; connectivity problems surface
/// per-request through the operations below.
pub struct MongoClient {
    client: Client,
    uri: String,
}

impl MongoClient {
    pub async fn connect(uri: &str) -> Result<Self, mongodb::error::Error> {
        let client = Client::with_uri_str(uri).await?;
        Ok(Self {
            client,
            uri: uri.to_string(),
        })
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn database(&self, name: &str) -> Database {
        self.client.database(name)
    }

    /// Untyped collection access; the bridge never declares a schema.
    pub fn collection(&self, database: &str, name: &str) -> Collection<bson::Document> {
        self.client.database(database).collection(name)
    }

    pub async fn list_databases(
        &self,
    ) -> Result<Vec<DatabaseSpecification>, mongodb::error::Error> {
        self.client.list_databases().await
    }
}
