//! tests/common/harness.rs
use std::net::SocketAddr;
use std::sync::{
    Once,
    atomic::{AtomicU16, Ordering},
};
use std::time::Duration;
use tokio::net::{TcpListener, TcpStream};
use tokio::sync::mpsc;
use tokio_tungstenite::{WebSocketStream, accept_async};
use tracing_subscriber::fmt::format::FmtSpan;

/// Initializes tracing for tests, ensuring it's only done once.
pub fn init_tracing() {
    static TRACING_INIT: Once = Once::new();
    TRACING_INIT.call_once(|| {
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "petrel_stream=debug".to_string());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::FULL)
            .with_test_writer()
            .init();
    });
}

// Use a global atomic to assign a new port for each server harness.
// This avoids port conflicts when running tests in parallel.
static NEXT_SERVER_PORT: AtomicU16 = AtomicU16::new(41000);

/// The server half of one accepted WebSocket connection.
pub type ServerConn = WebSocketStream<TcpStream>;

/// A test harness that runs a real WebSocket server and hands each
/// accepted connection to the test for scripting.
pub struct WsServerHarness {
    pub url: String,
    accepted_rx: mpsc::Receiver<ServerConn>,
}

impl WsServerHarness {
    /// Starts a server on a unique, non-ephemeral port.
    pub async fn start() -> Self {
        init_tracing();
        let port = NEXT_SERVER_PORT.fetch_add(1, Ordering::SeqCst);
        let addr: SocketAddr = format!("127.0.0.1:{port}").parse().unwrap();
        let listener = TcpListener::bind(addr).await.unwrap();

        let (accepted_tx, accepted_rx) = mpsc::channel(8);
        tokio::spawn(async move {
            while let Ok((stream, _)) = listener.accept().await {
                let Ok(conn) = accept_async(stream).await else {
                    continue;
                };
                if accepted_tx.send(conn).await.is_err() {
                    break;
                }
            }
        });

        Self {
            url: format!("ws://127.0.0.1:{port}/ws"),
            accepted_rx,
        }
    }

    /// Waits for the next client connection.
    pub async fn accept(&mut self) -> ServerConn {
        tokio::time::timeout(Duration::from_secs(5), self.accepted_rx.recv())
            .await
            .expect("timed out waiting for a client connection")
            .expect("server accept loop ended")
    }

    /// Allocates a port that nothing listens on, for refused-connection
    /// scenarios. The listener is bound and dropped so the port is free.
    pub async fn dead_port_url() -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);
        format!("ws://127.0.0.1:{port}/ws")
    }
}
