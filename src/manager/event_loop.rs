//! The manager's single-task event loop.
//!
//! One actor owns at most one open connection at a time and serializes
//! every event that can touch the stream's state: message arrival,
//! connection closure, backoff expiry, and owner commands. The invariants
//! of the state machine hold because nothing here runs concurrently with
//! anything else here.
//!
//! 管理器的单任务事件循环。
//!
//! 一个actor同一时刻最多持有一个打开的连接，并串行处理所有可能触及流状态
//! 的事件：消息到达、连接关闭、退避到期以及所有者命令。状态机的不变量
//! 之所以成立，是因为这里没有任何事件会与其他事件并发运行。

use super::{ManagerCommand, retry::RetryPolicy, state::StreamState};
use crate::{
    config::Config,
    envelope,
    observer::{
        DETAIL_DISCONNECTED, DETAIL_LOADING, DETAIL_RECONNECTING, StateSink, StateUpdate,
        StatusKind,
    },
    transport::{Connection, Connector},
};
use bytes::Bytes;
use std::time::Duration;
use tokio::{sync::mpsc, time::Instant};
use tracing::{debug, info, trace, warn};
use url::Url;

/// The actor behind a `ConnectionManager` handle.
/// `ConnectionManager` 句柄背后的actor。
pub(super) struct ManagerEventLoop<C: Connector, S: StateSink> {
    target: Url,
    connector: C,
    sink: S,
    retry: RetryPolicy,
    state: StreamState,
    /// Consecutive attempts that have not delivered a message. Incremented
    /// speculatively on every connect, reset exactly once per successful
    /// connection, on its first decodable message.
    ///
    /// 未交付消息的连续尝试次数。每次连接时推测性递增，
    /// 每个成功连接恰好重置一次（在其第一条可解码消息时）。
    failed_attempts: u32,
    /// Messages delivered across the manager's whole lifetime. Only the
    /// `> 0` test is ever consulted, to word the "connecting" status.
    ///
    /// 管理器整个生命周期内交付的消息数。只会用到 `> 0` 判断，
    /// 用于措辞“connecting”状态。
    total_messages: u64,
    /// One-way latch. Once set, no connection attempt and no notification.
    /// 单向闩锁。一旦置位，不再有连接尝试和通知。
    disposed: bool,
    command_rx: mpsc::Receiver<ManagerCommand>,
}

impl<C: Connector, S: StateSink> ManagerEventLoop<C, S> {
    pub(super) fn new(
        target: Url,
        config: &Config,
        connector: C,
        sink: S,
        command_rx: mpsc::Receiver<ManagerCommand>,
    ) -> Self {
        let retry = RetryPolicy::new(&config.retry, &target);
        Self {
            target,
            connector,
            sink,
            retry,
            state: StreamState::Connecting { attempt: 0 },
            failed_attempts: 0,
            total_messages: 0,
            disposed: false,
            command_rx,
        }
    }

    /// Runs the manager's main loop: attempt, classify the closure, notify,
    /// back off if warranted, repeat. Only disposal exits.
    ///
    /// 运行管理器的主循环：尝试、对关闭进行分类、通知、必要时退避、重复。
    /// 只有销毁才会退出。
    pub(super) async fn run(mut self) {
        info!(url = %self.target, "Connection manager started");

        while !self.disposed {
            let was_live = self.run_attempt().await;
            if self.disposed {
                break;
            }

            if was_live {
                // An established connection dropped. This is user-visible
                // and not evidence of a persistent outage: report at once,
                // reconnect at once.
                debug!(url = %self.target, "Live connection dropped; reconnecting immediately");
                self.notify(StatusKind::Disconnected, DETAIL_DISCONNECTED)
                    .await;
                continue;
            }

            let delay = self.retry.delay(self.failed_attempts);
            let detail = if self.total_messages > 0 {
                DETAIL_RECONNECTING
            } else {
                DETAIL_LOADING
            };
            debug!(
                url = %self.target,
                attempt = self.failed_attempts,
                delay_ms = delay.as_millis() as u64,
                "Connection attempt failed; backing off"
            );
            self.notify(StatusKind::Connecting, detail).await;
            self.back_off(delay).await;
        }

        info!(url = %self.target, "Connection manager stopped");
    }

    /// Runs one connection attempt to completion and returns whether the
    /// connection was live (had delivered at least one message) when it
    /// closed. A connect error is the same as closing without a message.
    ///
    /// 将一次连接尝试运行到结束，并返回连接关闭时是否处于存活状态
    /// （已交付至少一条消息）。连接错误等同于未交付消息即关闭。
    async fn run_attempt(&mut self) -> bool {
        self.failed_attempts = self.failed_attempts.saturating_add(1);
        self.state = StreamState::Connecting {
            attempt: self.failed_attempts,
        };
        trace!(url = %self.target, attempt = self.failed_attempts, "Opening connection");

        // Destructured inside a block so the pinned connect future can
        // borrow the connector and target while commands are still being
        // served, and release the borrows once the connection is open.
        let mut conn = {
            let Self {
                connector,
                target,
                command_rx,
                state,
                disposed,
                ..
            } = &mut *self;
            let connect = connector.connect(target);
            tokio::pin!(connect);

            loop {
                tokio::select! {
                    biased; // Disposal must win over a slow connect.

                    command = command_rx.recv() => match command {
                        Some(ManagerCommand::State { response_tx }) => {
                            let _ = response_tx.send(*state);
                        }
                        Some(ManagerCommand::Dispose) | None => {
                            *disposed = true;
                            *state = StreamState::Disposed;
                            info!(url = %target, "Connection manager disposed");
                            return false;
                        }
                    },
                    result = &mut connect => match result {
                        Ok(conn) => break conn,
                        Err(e) => {
                            debug!(url = %target, error = %e, "Connection attempt failed to open");
                            return false;
                        }
                    },
                }
            }
        };

        loop {
            tokio::select! {
                biased; // Commands (disposal above all) take priority.

                command = self.command_rx.recv() => {
                    self.handle_command(command);
                    if self.disposed {
                        conn.close().await;
                        return false;
                    }
                }
                message = conn.next_message() => match message {
                    Some(body) => self.on_message(body).await,
                    None => {
                        let was_live = self.state.is_live();
                        // Liveness ends the instant the connection closes;
                        // attempt 0 means "none in flight yet".
                        self.state = StreamState::Connecting {
                            attempt: self.failed_attempts,
                        };
                        return was_live;
                    }
                },
            }
        }
    }

    /// Handles one inbound message body.
    ///
    /// 处理一条入站消息体。
    async fn on_message(&mut self, body: Bytes) {
        let payload = match envelope::decode(&body) {
            Ok(payload) => payload,
            Err(e) => {
                // A bad frame fails the message, never the connection:
                // liveness and the failure counter stay untouched.
                warn!(url = %self.target, error = %e, "Dropping undecodable message");
                return;
            }
        };

        if !self.state.is_live() {
            trace!(url = %self.target, "First message on this connection; stream is live");
            self.state = StreamState::Live;
            self.failed_attempts = 0;
        }
        self.total_messages = self.total_messages.saturating_add(1);

        self.sink.update(StateUpdate::Data(payload)).await;
    }

    /// Waits out a backoff delay, still serving commands. Disposal
    /// interrupts the wait; the expiry itself then never acts.
    ///
    /// 等待退避延迟，期间仍处理命令。销毁会中断等待；
    /// 到期本身此后不再产生任何动作。
    async fn back_off(&mut self, delay: Duration) {
        self.state = StreamState::BackingOff {
            until: Instant::now() + delay,
        };

        let sleep = tokio::time::sleep(delay);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                biased;

                command = self.command_rx.recv() => {
                    self.handle_command(command);
                    if self.disposed {
                        return;
                    }
                }
                () = &mut sleep => return,
            }
        }
    }

    fn handle_command(&mut self, command: Option<ManagerCommand>) {
        match command {
            Some(ManagerCommand::State { response_tx }) => {
                let _ = response_tx.send(self.state);
            }
            Some(ManagerCommand::Dispose) => self.dispose(),
            // Every handle has been dropped; nothing can observe the
            // stream any more.
            None => self.dispose(),
        }
    }

    fn dispose(&mut self) {
        if !self.disposed {
            info!(url = %self.target, "Connection manager disposed");
            self.disposed = true;
            self.state = StreamState::Disposed;
        }
    }

    async fn notify(&self, kind: StatusKind, detail: &'static str) {
        self.sink.update(StateUpdate::Status { kind, detail }).await;
    }
}
