use std::sync::Arc;

use ledgerdesk_core::DomainResult;
use ledgerdesk_infra::{seed_sample_data, LedgerStore};

/// Everything a handler needs, shared behind `Arc` via `Extension`.
#[derive(Clone)]
pub struct AppServices {
    pub store: Arc<LedgerStore>,
}

impl AppServices {
    pub fn new(store: Arc<LedgerStore>) -> Self {
        Self { store }
    }

    /// Fresh in-memory store, optionally loaded with the sample books.
    pub fn in_memory(seed: bool) -> DomainResult<Self> {
        let store = LedgerStore::in_memory();
        if seed {
            seed_sample_data(&store)?;
        } else {
            tracing::info!("starting with an empty ledger");
        }
        Ok(Self::new(Arc::new(store)))
    }
}
