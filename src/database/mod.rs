pub mod user_repository;

pub use user_repository::*;

use mongodb::{options::ClientOptions, Client, Collection, Database};
use std::error::Error;

pub const CUSTOMER_USERS: &str = "customer_users";
pub const DEFAULT_DB_NAME: &str = "restaurant_admin";

/// Database named in the connection string, or [`DEFAULT_DB_NAME`].
pub fn database_name(options: &ClientOptions) -> String {
    options
        .default_database
        .clone()
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| DEFAULT_DB_NAME.to_string())
}

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str) -> Result<Self, Box<dyn Error>> {
        let mut client_options = ClientOptions::parse(uri).await?;
        let db_name = database_name(&client_options);

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(std::time::Duration::from_secs(300));

        client_options.connect_timeout = Some(std::time::Duration::from_secs(5));
        client_options.server_selection_timeout = Some(std::time::Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(&db_name);
        log::info!("📊 Database: {}", db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Phone numbers identify customers, so they must be unique.
    async fn ensure_indexes(&self) -> Result<(), Box<dyn Error>> {
        use mongodb::bson::doc;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let users = self.collection::<mongodb::bson::Document>(CUSTOMER_USERS);

        let phone_index = IndexModel::builder()
            .keys(doc! { "phone_number": 1 })
            .options(IndexOptions::builder().unique(true).build())
            .build();

        match users.create_index(phone_index).await {
            Ok(_) => log::info!("   ✅ Index created: {}(phone_number)", CUSTOMER_USERS),
            Err(e) => log::debug!("   ℹ️  Index already exists: {}", e),
        }

        log::info!("✅ Database indexes ready");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn client(&self) -> &Client {
        &self.client
    }
}
