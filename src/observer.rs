//! The observer side of a managed stream: the fixed set of notifications a
//! manager delivers, and the sink trait they are delivered through.
//!
//! 受管理流的观察者一侧：管理器交付的固定通知集合，
//! 以及交付它们的接收器trait。

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;

/// Detail text for the very first connection attempt of a manager's lifetime.
/// 管理器生命周期中第一次连接尝试的详情文本。
pub const DETAIL_LOADING: &str = "Loading…";

/// Detail text once at least one message has ever been received.
/// 一旦收到过至少一条消息后的详情文本。
pub const DETAIL_RECONNECTING: &str = "Reconnecting…";

/// Detail text for the drop of an established connection.
/// 已建立连接断开时的详情文本。
pub const DETAIL_DISCONNECTED: &str = "Disconnected…";

/// The kind of a connection-status notification.
/// 连接状态通知的种类。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    /// A connection attempt is in progress or scheduled.
    /// 连接尝试正在进行或已被调度。
    Connecting,
    /// An established connection was lost.
    /// 已建立的连接丢失。
    Disconnected,
}

/// A single notification from a manager to its observer.
///
/// This is the complete contract: either a decoded payload, or a
/// human-readable connection status. No raw error codes cross this seam.
///
/// 从管理器到其观察者的单条通知。
///
/// 这是完整的契约：要么是已解码的载荷，要么是人类可读的连接状态。
/// 没有任何原始错误码会跨越这个接缝。
#[derive(Debug, Clone, PartialEq)]
pub enum StateUpdate {
    /// A decoded message payload, forwarded verbatim.
    /// 已解码的消息载荷，原样转发。
    Data(Value),
    /// A connection-status change with human-readable detail text.
    /// 连接状态变化，附带人类可读的详情文本。
    Status {
        kind: StatusKind,
        detail: &'static str,
    },
}

/// The sink a manager delivers notifications into.
///
/// The manager only ever calls `update`; it assumes nothing about the
/// sink's own concurrency. Implementations are provided for tokio mpsc
/// senders so an observer can simply be the receiving end of a channel.
///
/// 管理器向其交付通知的接收器。
///
/// 管理器只会调用 `update`；它不对接收器自身的并发性做任何假设。
/// 已为tokio mpsc发送端提供实现，因此观察者可以只是通道的接收端。
#[async_trait]
pub trait StateSink: Send + Sync + 'static {
    /// Delivers one notification. Delivery failures (e.g. a dropped
    /// receiver) are the sink's concern, not the manager's.
    async fn update(&self, update: StateUpdate);
}

#[async_trait]
impl StateSink for mpsc::Sender<StateUpdate> {
    async fn update(&self, update: StateUpdate) {
        let _ = self.send(update).await;
    }
}

#[async_trait]
impl StateSink for mpsc::UnboundedSender<StateUpdate> {
    async fn update(&self, update: StateUpdate) {
        let _ = self.send(update);
    }
}
