use std::sync::Arc;

use crate::config::Config;
use crate::repositories::{SessionStore, UserStore};

/// The application's state.
#[derive(Clone)]
pub struct AppState {
    /// The application's configuration.
    pub config: Config,
    /// The user store.
    pub users: Arc<dyn UserStore>,
    /// The session store.
    pub sessions: Arc<dyn SessionStore>,
}

impl AppState {
    /// Creates a new `AppState` over the given stores.
    ///
    /// # Arguments
    ///
    /// * `config` - The application's configuration.
    /// * `users` - The user store.
    /// * `sessions` - The session store.
    pub fn new(
        config: Config,
        users: Arc<dyn UserStore>,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            users,
            sessions,
        }
    }
}
