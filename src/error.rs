//! 定义了库中所有可能的错误类型。
//! Defines all possible error types in the library.

use thiserror::Error;

/// The primary error type for the event stream client library.
///
/// Connection failures are deliberately absent: a failed or dropped
/// connection feeds the retry loop and is reported to the observer as a
/// status update, never surfaced to the manager's owner as an error.
///
/// 事件流客户端库的主要错误类型。
///
/// 这里刻意不包含连接失败：失败或断开的连接会进入重试循环，
/// 并作为状态更新报告给观察者，绝不会作为错误暴露给管理器的所有者。
#[derive(Debug, Error)]
pub enum Error {
    /// An underlying I/O error occurred.
    /// 发生了底层的I/O错误。
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The target address could not be parsed.
    /// 目标地址无法解析。
    #[error("Invalid target address: {0}")]
    InvalidAddress(#[from] url::ParseError),

    /// The target address uses a scheme the transport cannot open.
    /// 目标地址使用了传输层无法打开的协议方案。
    #[error("Unsupported address scheme: {0}")]
    UnsupportedScheme(String),

    /// The transport failed while opening a connection.
    /// 传输层在打开连接时失败。
    #[error("Transport error: {0}")]
    Transport(String),

    /// An internal channel for communication between tasks was closed unexpectedly.
    /// 用于任务间通信的内部通道意外关闭。
    #[error("Internal channel is broken")]
    ChannelClosed,

    /// The manager has been disposed and accepts no further operations.
    /// 管理器已被销毁，不再接受任何操作。
    #[error("Manager is disposed")]
    Disposed,
}

/// A specialized `Result` type for this library.
/// 本库专用的 `Result` 类型。
pub type Result<T> = std::result::Result<T, Error>;
