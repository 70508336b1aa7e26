pub mod protected;
pub mod public;

use std::sync::Arc;

use crate::storage::UrlSigner;
use crate::store::CatalogStore;

/// Shared application state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
    pub signer: Arc<dyn UrlSigner>,
}
