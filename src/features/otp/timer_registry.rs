use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant};

use super::countdown::Countdown;

const TICK: Duration = Duration::from_secs(1);

struct ResendTimer {
    state: Arc<RwLock<Countdown>>,
    handle: JoinHandle<()>,
}

impl Drop for ResendTimer {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

/// One running countdown per OTP identifier.
///
/// A countdown can only be started once the previous one for the same
/// identifier has run out, so an identifier never has two tasks ticking.
pub struct ResendTimerRegistry {
    cooldown_secs: u64,
    timers: RwLock<HashMap<String, ResendTimer>>,
}

impl ResendTimerRegistry {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            cooldown_secs: cooldown.as_secs(),
            timers: RwLock::new(HashMap::new()),
        }
    }

    /// Start the countdown for `identifier` unless one is still running.
    ///
    /// Check and insert happen under one write lock, so of two concurrent
    /// callers only one gets `Ok`. The running countdown is the error.
    pub async fn try_start(&self, identifier: &str) -> Result<Countdown, Countdown> {
        let mut timers = self.timers.write().await;
        if let Some(timer) = timers.get_mut(identifier) {
            let restarted = {
                let mut countdown = timer.state.write().await;
                if !countdown.resend_enabled() {
                    return Err(*countdown);
                }
                countdown.reset();
                *countdown
            };
            timer.handle.abort();
            timer.handle = tokio::spawn(run(Arc::clone(&timer.state)));
            tracing::debug!("Restarted resend countdown for {}", identifier);
            return Ok(restarted);
        }

        let countdown = Countdown::new(self.cooldown_secs);
        let state = Arc::new(RwLock::new(countdown));
        let handle = tokio::spawn(run(Arc::clone(&state)));

        timers.retain(|_, timer| !timer.handle.is_finished());
        timers.insert(identifier.to_string(), ResendTimer { state, handle });
        tracing::debug!(active = timers.len(), "Started resend countdown for {}", identifier);

        Ok(countdown)
    }

    /// What an identifier without a timer looks like
    pub fn idle(&self) -> Countdown {
        Countdown::finished(self.cooldown_secs)
    }

    /// Current countdown, if a timer exists for `identifier`
    pub async fn status(&self, identifier: &str) -> Option<Countdown> {
        let timers = self.timers.read().await;
        let timer = timers.get(identifier)?;
        let countdown = *timer.state.read().await;
        Some(countdown)
    }

    /// Drop the timer for `identifier`. Returns whether one existed.
    pub async fn stop(&self, identifier: &str) -> bool {
        self.timers.write().await.remove(identifier).is_some()
    }

    #[cfg(test)]
    async fn active(&self) -> usize {
        self.timers
            .read()
            .await
            .values()
            .filter(|timer| !timer.handle.is_finished())
            .count()
    }
}

async fn run(state: Arc<RwLock<Countdown>>) {
    let mut interval = interval_at(Instant::now() + TICK, TICK);
    loop {
        interval.tick().await;
        let mut countdown = state.write().await;
        countdown.tick();
        if countdown.resend_enabled() {
            break;
        }
    }
}
