//! Sliding-window throttle for local login attempts.
//!
//! Tracks attempt timestamps per identifier; an identifier over the limit
//! inside the window is refused until old attempts age out. Kept
//! deliberately small: the local directory holds two accounts, this just
//! stops secret guessing from being free.

#[cfg(test)]
#[path = "throttle_test.rs"]
mod tests;

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug)]
pub struct ThrottleConfig {
    pub max_attempts: usize,
    pub window: Duration,
}

#[derive(Clone)]
pub struct LoginThrottle {
    attempts: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    config: ThrottleConfig,
}

impl LoginThrottle {
    pub fn new(config: ThrottleConfig) -> Self {
        Self { attempts: Arc::new(Mutex::new(HashMap::new())), config }
    }

    /// Record an attempt for `identifier`; `false` when over the limit.
    pub fn allow(&self, identifier: &str) -> bool {
        self.allow_at(identifier, Instant::now())
    }

    fn allow_at(&self, identifier: &str, now: Instant) -> bool {
        // A poisoned lock fails open.
        let Ok(mut attempts) = self.attempts.lock() else {
            return true;
        };
        let window = attempts.entry(identifier.to_string()).or_default();
        while let Some(oldest) = window.front() {
            if now.duration_since(*oldest) > self.config.window {
                window.pop_front();
            } else {
                break;
            }
        }
        if window.len() >= self.config.max_attempts {
            return false;
        }
        window.push_back(now);
        true
    }
}
