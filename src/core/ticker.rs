//! Periodic callback driver shared by the signal generator and the passive
//! growth ticker.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

type Callback = Box<dyn FnMut() + Send>;

/// Calls a callback on a fixed period from a tokio task.
///
/// Once `stop` returns, the callback is never invoked again.
pub struct PeriodicTask {
    name: &'static str,
    period: Duration,
    slot: Option<Arc<Mutex<Option<Callback>>>>,
    task: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn new(name: &'static str, period: Duration) -> Self {
        Self {
            name,
            period,
            slot: None,
            task: None,
        }
    }

    /// Install the callback and spawn the producer. The first call happens one
    /// period after start. Restarting replaces any running producer.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start<F>(&mut self, callback: F)
    where
        F: FnMut() + Send + 'static,
    {
        self.stop();

        // Fresh slot per start so an aborted producer can never reach the new callback
        let slot: Arc<Mutex<Option<Callback>>> = Arc::new(Mutex::new(Some(Box::new(callback))));
        let task_slot = Arc::clone(&slot);
        let period = self.period;
        let name = self.name;

        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                let mut guard = match task_slot.lock() {
                    Ok(guard) => guard,
                    Err(poisoned) => poisoned.into_inner(),
                };
                match guard.as_mut() {
                    Some(callback) => callback(),
                    None => break,
                }
            }
            log::debug!("{} producer exited", name);
        });

        log::debug!("{} started with period {:?}", self.name, self.period);
        self.slot = Some(slot);
        self.task = Some(task);
    }

    /// Stop the producer. Idempotent.
    pub fn stop(&mut self) {
        if let Some(slot) = self.slot.take() {
            // Taking the lock waits out a callback that is currently running
            let mut guard = match slot.lock() {
                Ok(guard) => guard,
                Err(poisoned) => poisoned.into_inner(),
            };
            *guard = None;
        }
        if let Some(task) = self.task.take() {
            task.abort();
            log::debug!("{} stopped", self.name);
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.stop();
    }
}
