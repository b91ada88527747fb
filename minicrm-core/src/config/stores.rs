//! Connection settings for the two backing stores.

/// ClickHouse connection (HTTP interface).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickHouseConfig {
    /// e.g. `http://127.0.0.1:8123`
    pub url: String,
    pub database: String,
    pub user: String,
    pub password: String,
    /// Table receiving deposit events.
    pub table: String,
}

/// MongoDB connection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MongoConfig {
    pub uri: String,
    pub database: String,
    /// Collection receiving campaign logs.
    pub collection: String,
}
