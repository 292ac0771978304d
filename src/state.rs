use std::sync::Arc;

use crate::auth::UserDirectory;
use crate::store::CashCardStore;

/// Shared collaborators handed to every handler and to the auth gate.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CashCardStore>,
    pub users: Arc<UserDirectory>,
}

impl AppState {
    pub fn new(store: Arc<dyn CashCardStore>, users: Arc<UserDirectory>) -> Self {
        Self { store, users }
    }
}
