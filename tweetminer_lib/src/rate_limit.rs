//! Quota-driven cooldown gate shared by all callers of a tier.
//!
//! The tiers report their remaining request quota in a response header.
//! When it hits zero the gate arms a fixed resume deadline; every caller
//! awaits the deadline before issuing its next request, so the entity or
//! page that was in flight when the quota ran out is retried after the
//! wait rather than skipped. The deadline sits behind a tokio Mutex, which
//! makes the wait a shared barrier if calls ever run concurrently.

use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{sleep_until, Instant};

/// How long to stand down once a tier reports zero remaining quota.
pub const COOLDOWN: Duration = Duration::from_secs(15 * 60);

pub struct CooldownGate {
    resume_at: Mutex<Option<Instant>>,
    cooldown: Duration,
}

impl CooldownGate {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            resume_at: Mutex::new(None),
            cooldown,
        }
    }

    /// Records the quota a response reported. `Some(0)` arms the gate.
    pub async fn note_remaining(&self, remaining: Option<u64>) {
        if remaining == Some(0) {
            let mut resume_at = self.resume_at.lock().await;
            tracing::info!(
                "Rate limit exhausted, cooling down for {}s",
                self.cooldown.as_secs()
            );
            *resume_at = Some(Instant::now() + self.cooldown);
        }
    }

    /// Waits out any armed cooldown, then disarms it.
    ///
    /// Returns immediately when the gate is open. Loops in case another
    /// exhaustion re-arms the gate while this caller slept.
    pub async fn wait_ready(&self) {
        loop {
            let deadline = *self.resume_at.lock().await;
            let Some(at) = deadline else {
                return;
            };

            if at <= Instant::now() {
                let mut resume_at = self.resume_at.lock().await;
                if *resume_at == Some(at) {
                    *resume_at = None;
                    tracing::info!("Cooldown elapsed, resuming");
                }
                continue;
            }

            sleep_until(at).await;
        }
    }
}

impl Default for CooldownGate {
    fn default() -> Self {
        Self::new(COOLDOWN)
    }
}
