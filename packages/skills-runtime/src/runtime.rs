//! Runtime loop draining the API request queue.

use skills_core::SharedSkillStore;
use tokio::sync::mpsc;

use crate::api_handlers::ApiHandlers;
use crate::api_request::ApiRequest;

/// Runtime configuration.
#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    /// Capacity of the API request channel
    pub queue_capacity: usize,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            queue_capacity: 1024,
        }
    }
}

/// Single-writer loop applying API requests to the store.
pub struct SkillRuntime {
    /// API request receiver
    api_rx: mpsc::Receiver<ApiRequest>,
    /// API handlers
    api_handlers: ApiHandlers,
    /// Requests applied so far
    processed: u64,
}

impl SkillRuntime {
    /// Create a new runtime
    pub fn new(store: SharedSkillStore, api_rx: mpsc::Receiver<ApiRequest>) -> Self {
        Self {
            api_rx,
            api_handlers: ApiHandlers::new(store),
            processed: 0,
        }
    }

    /// Creates the request channel and a runtime draining it.
    pub fn with_channel(
        store: SharedSkillStore,
        config: &RuntimeConfig,
    ) -> (mpsc::Sender<ApiRequest>, Self) {
        let (api_tx, api_rx) = mpsc::channel(config.queue_capacity.max(1));
        (api_tx, Self::new(store, api_rx))
    }

    /// Number of requests applied so far.
    pub fn processed(&self) -> u64 {
        self.processed
    }

    /// Applies every request already queued without blocking.
    ///
    /// Returns how many requests were applied.
    pub fn process_pending(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(req) = self.api_rx.try_recv() {
            self.apply(req);
            applied += 1;
        }
        applied
    }

    /// Run the runtime loop (blocking)
    ///
    /// Returns once every sender has been dropped. Must be called from a
    /// plain thread, not from inside an async task.
    pub fn run(&mut self) {
        tracing::info!("Skill runtime started");
        while let Some(req) = self.api_rx.blocking_recv() {
            self.apply(req);
        }
        tracing::info!(processed = self.processed, "Skill runtime stopped");
    }

    fn apply(&mut self, req: ApiRequest) {
        self.api_handlers.handle_api_request(req);
        self.processed += 1;
    }
}
