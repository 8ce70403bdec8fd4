use std::sync::Arc;

use crate::{config::Config, db::Store, services::Recommender};

/// Shared application state
///
/// Everything is behind an `Arc`, so cloning per request is cheap. The store
/// and the recommender's sources are trait objects; tests swap in fakes.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub store: Arc<dyn Store>,
    pub recommender: Arc<Recommender>,
}

impl AppState {
    pub fn new(config: Arc<Config>, store: Arc<dyn Store>, recommender: Arc<Recommender>) -> Self {
        Self {
            config,
            store,
            recommender,
        }
    }
}
