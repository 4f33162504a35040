//! Defines the connection state machine for a managed stream.
//!
//! 定义受管理流的连接状态机。

use tokio::time::Instant;

/// The state of a managed stream.
///
/// The variants make illegal combinations unrepresentable: a stream cannot
/// be live and backing off at the same time, and `Disposed` is terminal.
///
/// 受管理流的状态。
///
/// 这些变体使非法组合不可表示：一个流不可能同时处于存活和退避状态，
/// 而 `Disposed` 是终态。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum StreamState {
    /// A connection attempt is in flight and has not yet delivered a
    /// message. `attempt` counts consecutive attempts without one.
    ///
    /// 连接尝试正在进行且尚未交付消息。`attempt` 统计未交付消息的连续尝试次数。
    Connecting {
        /// The 1-based index of the current consecutive attempt.
        attempt: u32,
    },

    /// The current connection has delivered at least one message and has
    /// not since closed.
    ///
    /// 当前连接已交付至少一条消息且此后未关闭。
    Live,

    /// Waiting out the computed delay before the next attempt.
    /// 在下一次尝试前等待计算出的延迟。
    BackingOff {
        /// When the next attempt is due.
        until: Instant,
    },

    /// The manager was disposed. No further attempts or notifications.
    /// 管理器已被销毁。不再有任何尝试或通知。
    Disposed,
}

impl StreamState {
    /// Returns `true` while the current connection is delivering data.
    /// 当前连接正在交付数据时返回 `true`。
    pub fn is_live(&self) -> bool {
        matches!(self, Self::Live)
    }

    /// Returns `true` once the manager has been disposed.
    /// 管理器被销毁后返回 `true`。
    pub fn is_disposed(&self) -> bool {
        matches!(self, Self::Disposed)
    }
}
