//! Common testing infrastructure for manager tests.

use crate::{
    config::Config,
    error::{Error, Result},
    manager::ConnectionManager,
    observer::StateUpdate,
    transport::{Connection, Connector},
};
use async_trait::async_trait;
use bytes::Bytes;
use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};
use tokio::{sync::mpsc, time::Instant};
use url::Url;

/// One scripted outcome for a connect call.
pub enum ConnectScript {
    /// The attempt fails to open.
    Refuse,
    /// The attempt opens. The test drives the connection through the
    /// paired sender; dropping the sender closes the connection.
    Open(mpsc::UnboundedReceiver<Bytes>),
}

/// A connector that replays a scripted sequence of outcomes, records the
/// instant of every connect call, and tracks how many connections are open
/// simultaneously. An exhausted script refuses further attempts.
#[derive(Clone, Default)]
pub struct MockConnector {
    scripts: Arc<Mutex<VecDeque<ConnectScript>>>,
    connect_times: Arc<Mutex<Vec<Instant>>>,
    open_connections: Arc<AtomicUsize>,
    max_open_connections: Arc<AtomicUsize>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a refused connection attempt.
    pub fn push_refused(&self) {
        self.scripts.lock().unwrap().push_back(ConnectScript::Refuse);
    }

    /// Queues an accepted attempt and returns the sender that drives it.
    pub fn push_open(&self) -> mpsc::UnboundedSender<Bytes> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.scripts
            .lock()
            .unwrap()
            .push_back(ConnectScript::Open(rx));
        tx
    }

    /// The instants at which connect calls were made.
    pub fn connect_times(&self) -> Vec<Instant> {
        self.connect_times.lock().unwrap().clone()
    }

    /// The total number of connect calls so far.
    pub fn connect_count(&self) -> usize {
        self.connect_times.lock().unwrap().len()
    }

    /// How many connections are open right now.
    pub fn open_connections(&self) -> usize {
        self.open_connections.load(Ordering::SeqCst)
    }

    /// The largest number of simultaneously open connections observed.
    pub fn max_open_connections(&self) -> usize {
        self.max_open_connections.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Connector for MockConnector {
    type Connection = MockConnection;

    async fn connect(&self, _target: &Url) -> Result<MockConnection> {
        self.connect_times.lock().unwrap().push(Instant::now());
        match self.scripts.lock().unwrap().pop_front() {
            Some(ConnectScript::Open(rx)) => {
                let open = self.open_connections.clone();
                let now_open = open.fetch_add(1, Ordering::SeqCst) + 1;
                self.max_open_connections
                    .fetch_max(now_open, Ordering::SeqCst);
                Ok(MockConnection { rx, open })
            }
            Some(ConnectScript::Refuse) | None => {
                Err(Error::Transport("connection refused".to_string()))
            }
        }
    }
}

/// A scripted connection fed by the test through an unbounded channel.
pub struct MockConnection {
    rx: mpsc::UnboundedReceiver<Bytes>,
    open: Arc<AtomicUsize>,
}

#[async_trait]
impl Connection for MockConnection {
    async fn next_message(&mut self) -> Option<Bytes> {
        self.rx.recv().await
    }

    async fn close(&mut self) {
        self.rx.close();
    }
}

impl Drop for MockConnection {
    fn drop(&mut self) {
        self.open.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Spawns a manager over the given connector with an unbounded update
/// channel as its observer.
pub fn spawn_manager(
    target: &str,
    connector: &MockConnector,
) -> (ConnectionManager, mpsc::UnboundedReceiver<StateUpdate>) {
    let (update_tx, update_rx) = mpsc::unbounded_channel();
    let manager = ConnectionManager::spawn(target, Config::default(), connector.clone(), update_tx)
        .expect("target address must parse");
    (manager, update_rx)
}
