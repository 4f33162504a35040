//! The connection manager: owns a single logical connection to a remote
//! event source, handles connect/disconnect/retry, and reports data and
//! lifecycle transitions to a registered observer.
//!
//! 连接管理器：持有到远程事件源的单个逻辑连接，处理连接/断开/重试，
//! 并向已注册的观察者报告数据和生命周期转换。

use crate::{
    config::Config,
    error::{Error, Result},
    observer::StateSink,
    transport::{Connector, WsConnector},
};
use tokio::sync::{mpsc, oneshot};
use url::Url;

mod event_loop;
pub mod retry;
pub mod state;

#[cfg(test)]
pub mod test_utils;

pub use state::StreamState;

use event_loop::ManagerEventLoop;

/// Commands sent to the manager actor.
///
/// 发送到管理器actor的命令。
#[derive(Debug)]
pub enum ManagerCommand {
    /// Command from the public API to read the current stream state.
    /// 来自公共API的命令，用于读取当前流状态。
    State {
        response_tx: oneshot::Sender<StreamState>,
    },
    /// Command from the public API to dispose the manager. One-way; there
    /// is no un-dispose.
    /// 来自公共API的命令，用于销毁管理器。单向；没有反销毁。
    Dispose,
}

/// A handle to a connection manager actor.
///
/// The actor starts its first connection attempt the moment the handle is
/// created, retries forever with capped exponential backoff, and only
/// stops when `dispose` is called or every handle has been dropped.
///
/// 连接管理器actor的句柄。
///
/// actor在句柄创建的那一刻开始第一次连接尝试，以带上限的指数退避
/// 无限重试，仅当调用 `dispose` 或所有句柄都被丢弃时才停止。
#[derive(Debug, Clone)]
pub struct ConnectionManager {
    command_tx: mpsc::Sender<ManagerCommand>,
}

impl ConnectionManager {
    /// Creates a manager for `target` over a custom connector and spawns
    /// its actor. The first connection attempt starts immediately.
    ///
    /// 使用自定义连接器为 `target` 创建管理器并派生其actor。
    /// 第一次连接尝试立即开始。
    pub fn spawn<C, S>(target: &str, config: Config, connector: C, sink: S) -> Result<Self>
    where
        C: Connector,
        S: StateSink,
    {
        let target = Url::parse(target)?;
        let (command_tx, command_rx) = mpsc::channel(config.connection.command_buffer);

        let actor = ManagerEventLoop::new(target, &config, connector, sink, command_rx);
        tokio::spawn(actor.run());

        Ok(Self { command_tx })
    }

    /// Creates a manager for a `ws://` / `wss://` target. A target with
    /// any other scheme is rejected here rather than fed to the retry
    /// loop, where it could never succeed.
    ///
    /// 为 `ws://` / `wss://` 目标创建管理器。其他协议方案的目标在此处
    /// 被拒绝，而不是交给永远不可能成功的重试循环。
    pub fn connect<S: StateSink>(target: &str, config: Config, sink: S) -> Result<Self> {
        let parsed = Url::parse(target)?;
        match parsed.scheme() {
            "ws" | "wss" => {}
            other => return Err(Error::UnsupportedScheme(other.to_string())),
        }
        Self::spawn(target, config, WsConnector, sink)
    }

    /// Reads the current stream state.
    ///
    /// 读取当前流状态。
    pub async fn state(&self) -> Result<StreamState> {
        let (response_tx, response_rx) = oneshot::channel();
        self.command_tx
            .send(ManagerCommand::State { response_tx })
            .await
            .map_err(|_| Error::Disposed)?;
        response_rx.await.map_err(|_| Error::ChannelClosed)
    }

    /// Disposes the manager: closes any active connection, cancels any
    /// pending retry, and silences all further notifications. Idempotent.
    ///
    /// 销毁管理器：关闭所有活动连接，取消所有待定重试，
    /// 并使所有后续通知静默。幂等。
    pub async fn dispose(&self) {
        let _ = self.command_tx.send(ManagerCommand::Dispose).await;
    }
}
