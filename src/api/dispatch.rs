//! Runs API requests off the UI thread.
//!
//! Each submitted request gets its own worker thread; outcomes come back over a
//! channel that the event loop drains every tick. In-flight requests are never
//! cancelled and outcomes are delivered in completion order.
use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;

use tracing::warn;

use super::{ApiOutcome, ApiRequest, UserApi, execute};

pub struct Dispatcher {
    api: Arc<dyn UserApi>,
    outcome_tx: Sender<ApiOutcome>,
    outcome_rx: Receiver<ApiOutcome>,
}

impl Dispatcher {
    pub fn new(api: Arc<dyn UserApi>) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::channel();
        Self {
            api,
            outcome_tx,
            outcome_rx,
        }
    }

    /// Start `request` in the background.
    pub fn submit(&self, request: ApiRequest) {
        let api = Arc::clone(&self.api);
        let tx = self.outcome_tx.clone();
        thread::spawn(move || {
            let outcome = execute(api.as_ref(), request);
            if tx.send(outcome).is_err() {
                warn!("UI loop gone; dropping API outcome");
            }
        });
    }

    /// Collect every outcome that has arrived so far without blocking.
    pub fn drain(&self) -> Vec<ApiOutcome> {
        self.outcome_rx.try_iter().collect()
    }

    /// Block up to `timeout` for the next outcome.
    pub fn wait(&self, timeout: Duration) -> Option<ApiOutcome> {
        self.outcome_rx.recv_timeout(timeout).ok()
    }
}
