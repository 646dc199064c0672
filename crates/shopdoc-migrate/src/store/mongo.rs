//! MongoDB (or DocumentDB) store

use async_trait::async_trait;
use bson::{doc, Document};
use mongodb::{options::ClientOptions, Client, Collection, Database, IndexModel};
use tracing::{debug, info};

use super::DocumentStore;
use crate::config::DestinationConfig;
use crate::error::{MigrateError, Result};
use crate::indexes::IndexSpec;

const APP_NAME: &str = "shopdoc-migrate";

pub struct MongoStore {
    client: Client,
    database: Database,
}

impl MongoStore {
    /// Connect and ping, so a bad endpoint fails here rather than at the first drop
    pub async fn connect(config: &DestinationConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(&config.uri).await?;
        options.app_name = Some(APP_NAME.to_string());

        let client = Client::with_options(options)?;
        let database = client.database(&config.database);
        database.run_command(doc! { "ping": 1 }).await?;

        info!(
            endpoint = %config.redacted_uri(),
            database = %config.database,
            "MongoDB connection established"
        );

        Ok(Self { client, database })
    }

    fn collection(&self, name: &str) -> Collection<Document> {
        self.database.collection::<Document>(name)
    }
}

#[async_trait]
impl DocumentStore for MongoStore {
    async fn drop_collection(&self, collection: &str) -> Result<()> {
        self.collection(collection).drop().await?;
        debug!(collection, "Dropped collection");
        Ok(())
    }

    async fn insert_many(&self, collection: &str, documents: Vec<Document>) -> Result<usize> {
        let expected = documents.len();
        let result = self.collection(collection).insert_many(documents).await?;
        let inserted = result.inserted_ids.len();

        if inserted != expected {
            return Err(MigrateError::rejected(
                collection,
                "insert_many",
                format!("acknowledged {} of {} documents", inserted, expected),
            ));
        }

        Ok(inserted)
    }

    async fn create_index(&self, index: &IndexSpec) -> Result<()> {
        let model = IndexModel::builder().keys(index.keys_document()).build();
        let created = self
            .collection(index.collection.name())
            .create_index(model)
            .await?;
        debug!(collection = %index.collection, index = %created.index_name, "Index ready");
        Ok(())
    }

    async fn count_documents(&self, collection: &str) -> Result<u64> {
        Ok(self.collection(collection).count_documents(doc! {}).await?)
    }

    async fn find_one(&self, collection: &str) -> Result<Option<Document>> {
        Ok(self.collection(collection).find_one(doc! {}).await?)
    }

    async fn close(&self) {
        self.client.clone().shutdown().await;
        info!("MongoDB connection closed");
    }
}
