use std::sync::Arc;

use crate::graph::GraphExecutor;
use crate::storage::GraphStore;

#[derive(Clone)]
pub struct AppState {
    pub store: GraphStore,
}

impl AppState {
    pub fn new(graph: Arc<dyn GraphExecutor>) -> Self {
        Self {
            store: GraphStore::new(graph),
        }
    }
}
