//! Admin session tokens.
//!
//! Issued on successful login, checked on every admin-gated request. Tokens
//! live in memory for the process lifetime; a restart logs everyone out.

use std::collections::HashSet;
use std::sync::RwLock;

use axum::http::{HeaderMap, header::AUTHORIZATION};
use rand::RngCore;

const TOKEN_BYTES: usize = 32;

#[derive(Default)]
pub struct Sessions {
    tokens: RwLock<HashSet<String>>,
}

impl Sessions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mint a fresh token and remember it.
    pub fn issue(&self) -> String {
        let mut raw = [0u8; TOKEN_BYTES];
        rand::rng().fill_bytes(&mut raw);
        let token = hex::encode(raw);

        self.write().insert(token.clone());
        token
    }

    pub fn verify(&self, token: &str) -> bool {
        !token.is_empty() && self.read().contains(token)
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, HashSet<String>> {
        self.tokens
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, HashSet<String>> {
        self.tokens
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Pull the token out of an `Authorization: Bearer <token>` header.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
}
