//! 定义了连接和重试的可配置参数。
//! Defines configurable parameters for connections and retries.

use std::time::Duration;

/// A structure containing all configurable parameters for a managed stream.
///
/// 包含受管理流所有可配置参数的结构体。
#[derive(Debug, Clone)]
pub struct Config {
    /// Retry and backoff-related parameters.
    /// 重试和退避相关参数。
    pub retry: RetryConfig,

    /// Connection and channel-related parameters.
    /// 连接和通道相关参数。
    pub connection: ConnectionConfig,
}

/// Retry and backoff-related parameters.
///
/// The delay before the n-th consecutive failed attempt is
/// `base_delay * 2^n`, capped at `remote_cap` (or `local_cap` when the
/// target address designates the local machine). Retries never stop on
/// their own; the cap makes the delay plateau rather than grow forever.
///
/// 重试和退避相关参数。
///
/// 第n次连续失败尝试前的延迟为 `base_delay * 2^n`，上限为 `remote_cap`
/// （当目标地址指向本机时为 `local_cap`）。重试不会自行停止；
/// 上限使延迟趋于平稳而不是无限增长。
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// The base unit of the exponential backoff.
    /// 指数退避的基本单位。
    pub base_delay: Duration,

    /// The backoff ceiling for remote targets.
    /// 远程目标的退避上限。
    pub remote_cap: Duration,

    /// The backoff ceiling for local targets. Kept short so that a human
    /// restarting a local server sees the client recover within ~1.5s.
    ///
    /// 本地目标的退避上限。保持较短，以便重启本地服务器的人
    /// 能在约1.5秒内看到客户端恢复。
    pub local_cap: Duration,
}

/// Connection and channel-related parameters.
///
/// 连接和通道相关参数。
#[derive(Debug, Clone)]
pub struct ConnectionConfig {
    /// The capacity of the manager's command mailbox.
    /// 管理器命令邮箱的容量。
    pub command_buffer: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            connection: ConnectionConfig::default(),
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            base_delay: Duration::from_millis(1000),
            remote_cap: Duration::from_millis(10_000),
            local_cap: Duration::from_millis(1500),
        }
    }
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self { command_buffer: 32 }
    }
}
