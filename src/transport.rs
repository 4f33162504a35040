//! Traits for abstracting over the underlying event-source transport.
//!
//! The manager only needs two capabilities from a transport: opening a
//! connection against a target address, and draining message bodies from it
//! until it closes. Clean and error closes are deliberately
//! indistinguishable; both are just closure.
//!
//! 用于抽象底层事件源传输的trait。
//!
//! 管理器只需要传输层提供两种能力：针对目标地址打开连接，
//! 以及从连接中读取消息体直到其关闭。正常关闭与错误关闭刻意不做区分；
//! 两者都只是关闭。

use crate::error::Result;
use async_trait::async_trait;
use bytes::Bytes;
use url::Url;

pub mod ws;

pub use ws::WsConnector;

/// A single open connection to an event source.
///
/// Exclusively owned by one manager; dropped and replaced on every
/// reconnect.
///
/// 到事件源的单个打开连接。
///
/// 由一个管理器独占持有；每次重连时被丢弃并替换。
#[async_trait]
pub trait Connection: Send {
    /// Receives the next message body.
    ///
    /// Returns `None` once the connection has closed, for any reason.
    /// 返回下一条消息体。连接一旦关闭（无论何种原因）即返回 `None`。
    async fn next_message(&mut self) -> Option<Bytes>;

    /// Closes the connection. Best effort; errors are absorbed.
    /// 关闭连接。尽力而为；错误被吸收。
    async fn close(&mut self);
}

/// Opens connections against a target address.
///
/// This trait allows for abstracting over the underlying transport
/// implementation, enabling scripted connectors for testing.
///
/// 针对目标地址打开连接。
///
/// 此trait允许对底层传输实现进行抽象，从而可以为测试使用脚本化的连接器。
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// The connection type this connector produces.
    type Connection: Connection;

    /// Opens a new connection to `target`.
    ///
    /// A connect error is classified by the manager exactly like a
    /// connection that closed before delivering a message.
    ///
    /// 打开一个到 `target` 的新连接。
    /// 连接错误被管理器归类为等同于在交付消息前就关闭的连接。
    async fn connect(&self, target: &Url) -> Result<Self::Connection>;
}
