use crate::config::ClickHouseConfig;
use crate::entities::deposit_events::{CREATE_EVENTS_TABLE, DepositEventRow};
use crate::framework::{AnalyticsStore, StoreError};
use async_trait::async_trait;
use clickhouse::Client;
use clickhouse::sql::Identifier;
use tracing::debug;

/// Analytical store backed by ClickHouse.
///
/// The underlying client is lazy; no connection is made until the first
/// query.
#[derive(Clone)]
pub struct ClickHouseAnalytics {
    client: Client,
    table: String,
}

impl ClickHouseAnalytics {
    pub fn new(config: &ClickHouseConfig) -> Self {
        let client = Client::default()
            .with_url(&config.url)
            .with_database(&config.database)
            .with_user(&config.user)
            .with_password(&config.password);
        Self {
            client,
            table: config.table.clone(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }
}

#[async_trait]
impl AnalyticsStore for ClickHouseAnalytics {
    #[tracing::instrument(skip_all, err, name = "CH:InsertDepositEvent")]
    async fn insert_deposit_event(&self, row: DepositEventRow) -> Result<(), StoreError> {
        let mut insert = self.client.insert::<DepositEventRow>(&self.table)?;
        insert.write(&row).await?;
        insert.end().await?;
        debug!(event_id = %row.event_id, table = %self.table, "Deposit event inserted");
        Ok(())
    }

    #[tracing::instrument(skip_all, err, name = "CH:EnsureSchema")]
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        self.client
            .query(CREATE_EVENTS_TABLE)
            .bind(Identifier(&self.table))
            .execute()
            .await?;
        Ok(())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.client.query("SELECT 1").execute().await?;
        Ok(())
    }
}
