pub mod rules;
mod sse;

use std::sync::Arc;

use tokio::sync::{RwLock, watch};

use crate::{config::AppConfig, dao::hunt_store::HuntStore, error::ServiceError};

pub use self::sse::SseHub;
use self::sse::SseState;

/// Shared handle to the central application state.
pub type SharedState = Arc<AppState>;

/// Central application state storing the store handle, SSE hubs, and config.
pub struct AppState {
    hunt_store: RwLock<Option<Arc<dyn HuntStore>>>,
    sse: SseState,
    degraded: watch::Sender<bool>,
    config: AppConfig,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The application starts in degraded mode until a storage backend is installed.
    pub fn new(config: AppConfig) -> SharedState {
        let (degraded_tx, _rx) = watch::channel(true);
        Arc::new(Self {
            hunt_store: RwLock::new(None),
            sse: SseState::new(16, 16),
            degraded: degraded_tx,
            config,
        })
    }

    /// Obtain a handle to the current hunt store, if one is installed.
    pub async fn hunt_store(&self) -> Option<Arc<dyn HuntStore>> {
        let guard = self.hunt_store.read().await;
        guard.as_ref().cloned()
    }

    /// Obtain the hunt store or fail with a degraded-mode error.
    pub async fn require_hunt_store(&self) -> Result<Arc<dyn HuntStore>, ServiceError> {
        self.hunt_store().await.ok_or(ServiceError::Degraded)
    }

    /// Install a new hunt store implementation and leave degraded mode.
    pub async fn set_hunt_store(&self, store: Arc<dyn HuntStore>) {
        {
            let mut guard = self.hunt_store.write().await;
            *guard = Some(store);
        }
        self.update_degraded(false).await;
    }

    /// Current degraded flag.
    pub async fn is_degraded(&self) -> bool {
        *self.degraded.borrow()
    }

    /// Update and broadcast the degraded flag when the value changes.
    pub async fn update_degraded(&self, value: bool) {
        if self.is_degraded().await == value {
            return;
        }

        let _ = self.degraded.send(value);
    }

    /// Subscribe to degraded mode updates.
    pub fn degraded_watcher(&self) -> watch::Receiver<bool> {
        self.degraded.subscribe()
    }

    /// Broadcast hub used for the public SSE stream.
    pub fn public_sse(&self) -> &SseHub {
        self.sse.public()
    }

    /// Broadcast hub used for the admin SSE stream.
    pub fn admin_sse(&self) -> &SseHub {
        self.sse.admin()
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}
