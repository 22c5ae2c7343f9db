//! HTTP API for the IVR simulator
//!
//! JSON routes for browser clients plus the telephony webhooks, served
//! from one router.

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::config::IvrConfig;
use crate::menu::MenuGraph;
use crate::runtime::{InMemoryStorage, ProductionEngine, StaticReservationDesk};
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<ProductionEngine>,
    pub config: Arc<IvrConfig>,
}

impl AppState {
    pub fn new(graph: MenuGraph, config: IvrConfig) -> Self {
        Self {
            engine: Arc::new(ProductionEngine::new(
                Arc::new(graph),
                InMemoryStorage::new(),
                StaticReservationDesk::default(),
            )),
            config: Arc::new(config),
        }
    }
}
