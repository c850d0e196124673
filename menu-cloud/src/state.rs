//! Application state for menu-cloud

use std::sync::Arc;

use crate::blob::{BlobStore, MemoryBlobStore, S3BlobStore};
use crate::config::Config;
use crate::error::ServiceResult;
use crate::session::DashboardSession;
use crate::store::{DocumentStore, MemoryStore, PgStore};
use crate::stripe::{CheckoutProvider, StripeClient};

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Restaurants, menus and processed webhook events
    pub store: Arc<dyn DocumentStore>,
    /// Uploaded logos and item images
    pub blobs: Arc<dyn BlobStore>,
    /// Hosted subscription checkout
    pub checkout: Arc<dyn CheckoutProvider>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState, picking backends from the configuration
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let store: Arc<dyn DocumentStore> = match &config.database_url {
            Some(url) => Arc::new(PgStore::connect(url).await?),
            None => {
                if !config.is_development() {
                    return Err("DATABASE_URL must be set outside development".into());
                }
                tracing::warn!("DATABASE_URL not set, using in-memory document store");
                Arc::new(MemoryStore::new())
            }
        };

        let blobs: Arc<dyn BlobStore> = match &config.s3_bucket {
            Some(bucket) => Arc::new(
                S3BlobStore::from_env(bucket.clone(), config.blob_public_base_url.clone()).await,
            ),
            None => {
                tracing::warn!("S3_BUCKET not set, serving uploads from memory");
                Arc::new(MemoryBlobStore::new(config.blob_public_base_url.clone()))
            }
        };

        let checkout = Arc::new(StripeClient::new(config.stripe_secret_key.clone()));

        Ok(Self::with_backends(config.clone(), store, blobs, checkout))
    }

    /// Assemble state from explicit backends
    pub fn with_backends(
        config: Config,
        store: Arc<dyn DocumentStore>,
        blobs: Arc<dyn BlobStore>,
        checkout: Arc<dyn CheckoutProvider>,
    ) -> Self {
        Self {
            store,
            blobs,
            checkout,
            config: Arc::new(config),
        }
    }

    /// Open an editing session for one restaurant
    pub async fn session(&self, restaurant_id: &str) -> ServiceResult<DashboardSession> {
        DashboardSession::load(self.store.clone(), restaurant_id).await
    }
}
