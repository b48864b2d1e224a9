use std::sync::{Arc, Mutex, MutexGuard};

use rusqlite::Connection;
use tokio::sync::broadcast;

use crate::config::AppConfig;
use crate::db::queries;
use crate::errors::AppError;
use crate::models::{Service, ShopConfig, Therapist};
use crate::services::cache::{CachePolicy, CatalogCache};
use crate::services::notify::{BroadcastNotifier, Notifier, QueueEvent};

pub struct AppState {
    pub db: Arc<Mutex<Connection>>,
    pub config: AppConfig,
    pub catalog: CatalogCache,
    pub notifier: Box<dyn Notifier>,
    pub queue_tx: broadcast::Sender<QueueEvent>,
}

impl AppState {
    /// State wired the way the server runs: board events go out over `queue_tx`.
    pub fn new(conn: Connection, config: AppConfig) -> Self {
        let (queue_tx, _) = broadcast::channel(256);
        let notifier = BroadcastNotifier::new(queue_tx.clone());
        Self {
            db: Arc::new(Mutex::new(conn)),
            catalog: CatalogCache::new(CachePolicy::from_secs(config.cache_ttl_secs)),
            config,
            notifier: Box::new(notifier),
            queue_tx,
        }
    }

    pub fn db(&self) -> MutexGuard<'_, Connection> {
        self.db.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn services(&self) -> Result<Vec<Service>, AppError> {
        self.catalog
            .services(|| queries::list_services(&self.db()))
            .map_err(AppError::from)
    }

    pub fn therapists(&self) -> Result<Vec<Therapist>, AppError> {
        self.catalog
            .therapists(|| queries::list_therapists(&self.db()))
            .map_err(AppError::from)
    }

    /// Stored shop config, or one carrying the default commission rate if none was saved.
    pub fn shop_config(&self) -> Result<ShopConfig, AppError> {
        let fallback = self.config.default_commission_rate;
        self.catalog
            .config(|| {
                queries::get_shop_config(&self.db())
                    .map(|found| found.unwrap_or_else(|| ShopConfig::with_rate(fallback)))
            })
            .map_err(AppError::from)
    }

    pub fn find_service(&self, id: &str) -> Result<Option<Service>, AppError> {
        Ok(self.services()?.into_iter().find(|s| s.id == id))
    }

    pub fn find_therapist(&self, id: &str) -> Result<Option<Therapist>, AppError> {
        Ok(self.therapists()?.into_iter().find(|t| t.id == id))
    }
}
