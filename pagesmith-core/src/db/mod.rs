// pagesmith-core/src/db/mod.rs

use mongodb::Client;
use tracing::info;

use crate::Error;

/// Handle to the backing MongoDB database.
///
/// Created once at startup and passed into every repository constructor;
/// the driver multiplexes connections internally, so cloning is cheap.
#[derive(Clone)]
pub struct Database {
    client: Client,
    db: mongodb::Database,
}

impl Database {
    /// Connect to the store and select the application database.
    pub async fn new(mongodb_url: &str, database_name: &str) -> Result<Self, Error> {
        let client = Client::with_uri_str(mongodb_url).await?;
        let db = client.database(database_name);
        info!("Connected to MongoDB database '{}'", database_name);
        Ok(Self { client, db })
    }

    pub fn handle(&self) -> &mongodb::Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
