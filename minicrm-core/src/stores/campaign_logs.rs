use crate::config::MongoConfig;
use crate::entities::campaign_logs::{CampaignLogDocument, ListCampaignLogs};
use crate::framework::{CampaignLogStore, StoreError};
use async_trait::async_trait;
use futures_util::TryStreamExt;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database, IndexModel};
use tracing::debug;

/// Campaign log store backed by a MongoDB collection.
#[derive(Clone)]
pub struct MongoCampaignLogs {
    database: Database,
    collection: Collection<CampaignLogDocument>,
}

impl MongoCampaignLogs {
    /// Build the store from a connected client.
    pub fn new(client: &Client, config: &MongoConfig) -> Self {
        let database = client.database(&config.database);
        let collection = database.collection(&config.collection);
        Self {
            database,
            collection,
        }
    }

    /// Parse the URI and create a client.
    ///
    /// The driver connects lazily, so this succeeds even while the server is
    /// unreachable; use [`CampaignLogStore::ping`] to check connectivity.
    pub async fn connect(config: &MongoConfig) -> Result<Self, StoreError> {
        let client = Client::with_uri_str(&config.uri).await?;
        Ok(Self::new(&client, config))
    }
}

#[async_trait]
impl CampaignLogStore for MongoCampaignLogs {
    #[tracing::instrument(skip_all, err, name = "MONGO:InsertCampaignLog")]
    async fn insert_campaign_log(&self, log: CampaignLogDocument) -> Result<(), StoreError> {
        let result = self.collection.insert_one(&log).await?;
        debug!(event_id = %log.event_id, inserted_id = %result.inserted_id, "Campaign log inserted");
        Ok(())
    }

    #[tracing::instrument(skip_all, err, name = "MONGO:ListCampaignLogs")]
    async fn list_campaign_logs(
        &self,
        query: ListCampaignLogs,
    ) -> Result<Vec<CampaignLogDocument>, StoreError> {
        let logs: Vec<CampaignLogDocument> = self
            .collection
            .find(query.filter())
            .with_options(query.find_options())
            .await?
            .try_collect()
            .await?;
        Ok(logs)
    }

    #[tracing::instrument(skip_all, err, name = "MONGO:EnsureSchema")]
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        let index = IndexModel::builder()
            .keys(doc! { "player_id": 1, "timestamp": 1 })
            .build();
        self.collection.create_index(index).await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.database.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}
