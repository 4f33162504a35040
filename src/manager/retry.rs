//! Backoff computation for reconnection attempts.
//!
//! 重连尝试的退避计算。

use crate::config::RetryConfig;
use std::net::IpAddr;
use std::time::Duration;
use url::{Host, Url};

/// Returns `true` when a target address designates the local machine.
///
/// The rule is a plain `ws` scheme with a loopback host. A TLS target is
/// never considered local: certificates on loopback addresses are rare
/// enough that a `wss` target almost certainly points at a tunnel.
///
/// 当目标地址指向本机时返回 `true`。
///
/// 规则是：纯 `ws` 方案加回环主机。TLS目标绝不视为本地：
/// 回环地址上的证书足够罕见，`wss` 目标几乎必然指向一条隧道。
pub fn is_local_endpoint(target: &Url) -> bool {
    if target.scheme() != "ws" {
        return false;
    }
    match target.host() {
        Some(Host::Domain(host)) => host.eq_ignore_ascii_case("localhost"),
        Some(Host::Ipv4(ip)) => IpAddr::V4(ip).is_loopback(),
        Some(Host::Ipv6(ip)) => IpAddr::V6(ip).is_loopback(),
        None => false,
    }
}

/// The retry policy for one managed stream.
///
/// Locality of the target is decided once, at construction; the delay for
/// a given consecutive-failure count is then a pure function.
///
/// 单个受管理流的重试策略。
///
/// 目标的本地性在构造时一次性确定；此后给定连续失败次数的延迟是纯函数。
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    base_delay: Duration,
    cap: Duration,
}

impl RetryPolicy {
    /// Builds the policy for `target`, selecting the backoff cap by the
    /// locality of the address.
    ///
    /// 为 `target` 构建策略，并按地址的本地性选择退避上限。
    pub fn new(config: &RetryConfig, target: &Url) -> Self {
        let cap = if is_local_endpoint(target) {
            config.local_cap
        } else {
            config.remote_cap
        };
        Self {
            base_delay: config.base_delay,
            cap,
        }
    }

    /// The delay before the next attempt after `failed_attempts`
    /// consecutive attempts without a message: `base * 2^n`, capped.
    ///
    /// 在连续 `failed_attempts` 次未交付消息的尝试后，下一次尝试前的延迟：
    /// `base * 2^n`，带上限。
    pub fn delay(&self, failed_attempts: u32) -> Duration {
        // 2^31 seconds already dwarfs any cap; clamp the exponent before shifting.
        let exponent = failed_attempts.min(31);
        let backoff = self.base_delay.saturating_mul(1u32 << exponent);
        backoff.min(self.cap)
    }
}
