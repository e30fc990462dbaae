//! In-process reference server for suite tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::mpsc as std_mpsc;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use skills_api::{ApiConfig, Router, Server};
use skills_core::SharedSkillStore;
use skills_e2e::{FixtureError, SkillFixture, SkillsClient, VerifierConfig};
use skills_runtime::{RuntimeConfig, SkillRuntime};
use tokio::sync::oneshot;

/// Skills API served from its own thread and tokio runtime.
///
/// Stops serving when dropped.
pub struct ReferenceServer {
    addr: SocketAddr,
    shutdown: Option<oneshot::Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl ReferenceServer {
    pub fn start(store: SharedSkillStore) -> Self {
        let (api_tx, mut runtime) = SkillRuntime::with_channel(store, &RuntimeConfig::default());
        thread::spawn(move || runtime.run());

        let router = Router::new(Arc::new(ApiConfig::default()), api_tx).unwrap();
        let (addr_tx, addr_rx) = std_mpsc::channel();
        let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

        let thread = thread::spawn(move || {
            let rt = tokio::runtime::Builder::new_multi_thread()
                .worker_threads(2)
                .enable_all()
                .build()
                .unwrap();
            rt.block_on(async move {
                let server = Server::bind("127.0.0.1:0".parse().unwrap(), router)
                    .await
                    .unwrap();
                addr_tx.send(server.local_addr().unwrap()).unwrap();
                server
                    .serve_until(async {
                        let _ = shutdown_rx.await;
                    })
                    .await
                    .unwrap();
            });
        });

        let addr = addr_rx.recv().unwrap();
        Self {
            addr,
            shutdown: Some(shutdown_tx),
            thread: Some(thread),
        }
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn client(&self) -> SkillsClient {
        SkillsClient::new(&VerifierConfig::for_base_url(self.base_url())).unwrap()
    }
}

impl Drop for ReferenceServer {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(thread) = self.thread.take() {
            let _ = thread.join();
        }
    }
}

/// Fixture that records calls and fails on demand.
#[derive(Default)]
pub struct ScriptedFixture {
    pub fail_insert: bool,
    pub fail_delete: bool,
    pub inserted: bool,
    pub deleted: bool,
}

impl SkillFixture for ScriptedFixture {
    fn insert_data(&mut self) -> Result<(), FixtureError> {
        self.inserted = true;
        if self.fail_insert {
            return Err(FixtureError::SeedExists {
                key: "go".to_string(),
            });
        }
        Ok(())
    }

    fn delete_data(&mut self) -> Result<(), FixtureError> {
        self.deleted = true;
        if self.fail_delete {
            return Err(FixtureError::Store(skills_core::SkillError::Storage(
                "delete refused".to_string(),
            )));
        }
        Ok(())
    }
}
