//! Reloadable holder for the shared network.
//!
//! Evaluators keep their own `Arc`, so replacing or releasing the network
//! here never invalidates an evaluator that is already running.

use std::path::Path;
use std::sync::Arc;

use log::info;
use once_cell::sync::Lazy;
use parking_lot::RwLock;

use super::error::NnueError;
use super::network::NnueNetwork;

#[derive(Default)]
pub struct NetworkSlot {
    network: RwLock<Option<Arc<NnueNetwork>>>,
}

impl NetworkSlot {
    #[must_use]
    pub fn new() -> Self {
        NetworkSlot::default()
    }

    /// Load a weight file and install it. On error the current network, if
    /// any, stays installed.
    pub fn load<P: AsRef<Path>>(&self, path: P) -> Result<Arc<NnueNetwork>, NnueError> {
        let network = Arc::new(NnueNetwork::load(path)?);
        self.install(Arc::clone(&network));
        Ok(network)
    }

    pub fn install(&self, network: Arc<NnueNetwork>) {
        *self.network.write() = Some(network);
        info!("NNUE network installed");
    }

    /// Current network, if one is installed
    #[must_use]
    pub fn get(&self) -> Option<Arc<NnueNetwork>> {
        self.network.read().clone()
    }

    #[must_use]
    pub fn is_loaded(&self) -> bool {
        self.network.read().is_some()
    }

    /// Drop the slot's handle. Returns whether a network was installed.
    pub fn release(&self) -> bool {
        let released = self.network.write().take().is_some();
        if released {
            info!("NNUE network released");
        }
        released
    }
}

static GLOBAL: Lazy<NetworkSlot> = Lazy::new(NetworkSlot::new);

/// Process-wide default slot
#[must_use]
pub fn global() -> &'static NetworkSlot {
    &GLOBAL
}
