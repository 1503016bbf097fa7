//! # Admin Lockout Guard
//!
//! Gates admin authentication behind a shared secret and counts failed
//! attempts. Three consecutive failures lock the guard for four hours;
//! while locked, every attempt is rejected, even with the correct secret.
//!
//! The lockout has no background timer. Expiry is recognized lazily on the
//! next [`LockoutGuard::attempt_login`] call, which clears the record and
//! re-evaluates from a clean counter. [`LockoutGuard::status`] never clears
//! anything, so an elapsed-but-unread lockout still reads as locked until
//! someone actually tries to log in.
//!
//! All state lives in one process-wide [`AttemptRecord`]; a restart clears
//! any active lockout. That is a documented limitation, not a bug.

use std::sync::Mutex;
use std::time::{Duration, Instant};

use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::error::AppError;

pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_LOCKOUT: Duration = Duration::from_secs(4 * 60 * 60);

/// The single shared attempt record.
///
/// Invariant: `locked_until` is set iff `failures` reached the threshold
/// since the last reset or lockout expiry.
#[derive(Debug)]
struct AttemptRecord {
    failures: u32,
    locked_until: Option<Instant>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardStatus {
    Locked { remaining_secs: u64 },
    Unlocked { attempts_remaining: u32 },
}

pub struct LockoutGuard {
    secret: Option<String>,
    max_attempts: u32,
    lockout: Duration,
    record: Mutex<AttemptRecord>,
}

impl LockoutGuard {
    pub fn new(secret: Option<String>) -> Self {
        Self::with_policy(secret, DEFAULT_MAX_ATTEMPTS, DEFAULT_LOCKOUT)
    }

    pub fn with_policy(secret: Option<String>, max_attempts: u32, lockout: Duration) -> Self {
        if secret.as_deref().map_or(true, str::is_empty) {
            warn!("no admin secret configured, all login attempts will be rejected");
        }

        Self {
            secret,
            max_attempts: max_attempts.max(1),
            lockout,
            record: Mutex::new(AttemptRecord {
                failures: 0,
                locked_until: None,
            }),
        }
    }

    /// Run one authentication attempt against the shared record.
    ///
    /// The full read-check-increment-possibly-lock sequence holds the record
    /// lock, so concurrent attempts serialize and the counter can never race
    /// past the threshold.
    pub fn attempt_login(&self, submitted: &str) -> Result<(), AppError> {
        let now = Instant::now();
        let mut record = self.lock_record();

        if let Some(until) = record.locked_until {
            if now < until {
                return Err(AppError::LockedOut {
                    retry_after_secs: until.saturating_duration_since(now).as_secs(),
                });
            }

            // Lockout has lapsed, start over from a clean counter.
            record.locked_until = None;
            record.failures = 0;
            info!("admin lockout expired, counter reset");
        }

        if self.secret_matches(submitted) {
            record.failures = 0;
            info!("admin authenticated");
            return Ok(());
        }

        record.failures += 1;

        if record.failures >= self.max_attempts {
            record.locked_until = Some(now + self.lockout);
            warn!(
                failures = record.failures,
                lockout_secs = self.lockout.as_secs(),
                "admin login locked after repeated failures"
            );
            return Err(AppError::LockedOut {
                retry_after_secs: self.lockout.as_secs(),
            });
        }

        let attempts_remaining = self.max_attempts - record.failures;
        warn!(
            failures = record.failures,
            attempts_remaining, "admin login failed"
        );
        Err(AppError::InvalidSecret { attempts_remaining })
    }

    /// Read-only view of the record. Does not clear a lapsed lockout; an
    /// elapsed-but-unread lockout reads as locked with 0 seconds remaining.
    pub fn status(&self) -> GuardStatus {
        let record = self.lock_record();

        match record.locked_until {
            Some(until) => GuardStatus::Locked {
                remaining_secs: until.saturating_duration_since(Instant::now()).as_secs(),
            },
            None => GuardStatus::Unlocked {
                attempts_remaining: self.max_attempts - record.failures,
            },
        }
    }

    fn lock_record(&self) -> std::sync::MutexGuard<'_, AttemptRecord> {
        // Every mutation is a plain field store, so a poisoned lock still
        // holds a consistent record.
        self.record
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Constant-time secret comparison. An unset or empty configured secret
    /// fails closed: nothing matches, not even an empty submission.
    fn secret_matches(&self, submitted: &str) -> bool {
        match self.secret.as_deref() {
            Some(secret) if !secret.is_empty() => {
                secret.as_bytes().ct_eq(submitted.as_bytes()).into()
            }
            _ => false,
        }
    }

    #[cfg(test)]
    fn failures(&self) -> u32 {
        self.lock_record().failures
    }
}
