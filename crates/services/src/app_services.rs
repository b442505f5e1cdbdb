use std::sync::Arc;

use course_core::engine::ProgressPolicy;
use course_core::model::Catalog;
use storage::repository::Storage;

use crate::Clock;
use crate::course_catalog::builtin_catalog;
use crate::error::AppServicesError;
use crate::progress_service::ProgressService;

/// Assembles the storage backend and course catalog the app runs against.
#[derive(Clone)]
pub struct AppServices {
    storage: Storage,
    catalog: Arc<Catalog>,
    clock: Clock,
    policy: ProgressPolicy,
}

impl AppServices {
    /// Build services backed by `SQLite` storage.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if storage initialization fails or the
    /// built-in catalog is inconsistent.
    pub async fn new_sqlite(
        db_url: &str,
        clock: Clock,
        policy: ProgressPolicy,
    ) -> Result<Self, AppServicesError> {
        let storage = Storage::sqlite(db_url).await?;
        Self::with_storage(storage, clock, policy)
    }

    /// Build services with a throwaway in-memory store.
    ///
    /// # Errors
    ///
    /// Returns `AppServicesError` if the built-in catalog is inconsistent.
    pub fn in_memory(clock: Clock, policy: ProgressPolicy) -> Result<Self, AppServicesError> {
        Self::with_storage(Storage::in_memory(), clock, policy)
    }

    fn with_storage(
        storage: Storage,
        clock: Clock,
        policy: ProgressPolicy,
    ) -> Result<Self, AppServicesError> {
        let catalog = Arc::new(builtin_catalog()?);
        Ok(Self {
            storage,
            catalog,
            clock,
            policy,
        })
    }

    #[must_use]
    pub fn catalog(&self) -> Arc<Catalog> {
        Arc::clone(&self.catalog)
    }

    /// Load the learner's progress and hand back a service that owns it.
    pub async fn progress_service(&self) -> ProgressService {
        ProgressService::load(
            Arc::clone(&self.catalog),
            Arc::clone(&self.storage.progress),
            self.clock,
            self.policy,
        )
        .await
    }
}
