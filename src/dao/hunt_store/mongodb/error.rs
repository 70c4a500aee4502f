use thiserror::Error;
use uuid::Uuid;

/// Result alias for MongoDB DAO operations.
pub type MongoResult<T> = Result<T, MongoDaoError>;

/// Errors raised by the MongoDB implementation of the hunt store.
#[derive(Debug, Error)]
pub enum MongoDaoError {
    #[error("invalid MongoDB connection string `{uri}`")]
    InvalidUri {
        uri: String,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to construct MongoDB client")]
    ClientConstruction {
        #[source]
        source: mongodb::error::Error,
    },
    #[error("MongoDB did not answer the initial ping after {attempts} attempts")]
    InitialPing {
        attempts: u32,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("failed to create index `{index}` on collection `{collection}`")]
    EnsureIndex {
        collection: &'static str,
        index: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("health ping failed")]
    HealthPing {
        #[source]
        source: mongodb::error::Error,
    },
    #[error("query on collection `{collection}` failed")]
    Query {
        collection: &'static str,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("write to collection `{collection}` failed (document `{id}`)")]
    Write {
        collection: &'static str,
        id: Uuid,
        #[source]
        source: mongodb::error::Error,
    },
    #[error("settings document update failed")]
    Settings {
        #[source]
        source: mongodb::error::Error,
    },
}
