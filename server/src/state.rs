use std::sync::Arc;

use super::{config::Config, guard::LockoutGuard, sessions::Sessions, store::Store};

pub struct AppState {
    pub config: Config,
    pub guard: LockoutGuard,
    pub sessions: Sessions,
    pub store: Store,
}

impl AppState {
    pub fn new(config: Config) -> Arc<Self> {
        let guard = LockoutGuard::with_policy(
            config.admin_secret.clone(),
            config.max_attempts,
            config.lockout,
        );

        Arc::new(Self {
            config,
            guard,
            sessions: Sessions::new(),
            store: Store::new(),
        })
    }
}
