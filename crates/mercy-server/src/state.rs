//! Shared application state.

use mercy_core::AuthConfig;
use mercy_store::DocumentStore;
use mercy_token::TokenService;
use std::sync::Arc;

/// Cloned into every handler and middleware stage.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    store: Arc<dyn DocumentStore>,
    tokens: TokenService,
    auth: AuthConfig,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, tokens: TokenService, auth: AuthConfig) -> Self {
        Self {
            inner: Arc::new(AppStateInner {
                store,
                tokens,
                auth,
            }),
        }
    }

    pub fn store(&self) -> &dyn DocumentStore {
        self.inner.store.as_ref()
    }

    pub fn tokens(&self) -> &TokenService {
        &self.inner.tokens
    }

    pub fn auth(&self) -> &AuthConfig {
        &self.inner.auth
    }
}
