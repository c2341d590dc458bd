use crate::error::Result;
use crate::stores::Stores;

/// Chooses the store backend from configuration.
///
/// Without a MongoDB URI every store is in-memory.
pub struct StoresBuilder {
    mongodb_uri: Option<String>,
    database: String,
}

impl StoresBuilder {
    pub fn new() -> Self {
        Self {
            mongodb_uri: None,
            database: "finsight".to_string(),
        }
    }

    /// Empty strings are treated as "not configured"
    pub fn mongodb_uri(mut self, uri: Option<String>) -> Self {
        self.mongodb_uri = uri.filter(|u| !u.trim().is_empty());
        self
    }

    pub fn database(mut self, db: impl Into<String>) -> Self {
        self.database = db.into();
        self
    }

    pub async fn build(self) -> Result<Stores> {
        match self.mongodb_uri {
            #[cfg(feature = "mongodb")]
            Some(uri) => {
                let mongo = crate::dbs::mongo::MongoStore::connect(&uri, &self.database).await?;
                tracing::info!(database = %self.database, "Using MongoDB stores");
                Ok(Stores::from_mongo(std::sync::Arc::new(mongo)))
            }
            #[cfg(not(feature = "mongodb"))]
            Some(_) => {
                tracing::warn!(
                    database = %self.database,
                    "MongoDB URI configured but built without the mongodb feature, using in-memory stores"
                );
                Ok(Stores::in_memory())
            }
            None => {
                tracing::info!("Using in-memory stores");
                Ok(Stores::in_memory())
            }
        }
    }
}

impl Default for StoresBuilder {
    fn default() -> Self {
        Self::new()
    }
}
