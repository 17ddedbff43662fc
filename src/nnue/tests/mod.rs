//! NNUE module tests.
//!
//! - `loader.rs` - weight file parsing, validation and writing
//! - `incremental.rs` - accumulator patching against full rebuilds
//! - `proptest.rs` - property-based playouts

mod loader;
mod proptest;

use std::sync::Arc;

use once_cell::sync::Lazy;

use super::NnueNetwork;

/// Shared random network; building one is too slow to repeat per test
pub(crate) static SYNTHETIC: Lazy<Arc<NnueNetwork>> =
    Lazy::new(|| Arc::new(NnueNetwork::synthetic(0x4E4E_5545)));
