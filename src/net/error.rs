//! 网络路由错误
//!
//! 路由层的错误都是配置性/致命的：未知目的地不重试、不静默丢弃，
//! 直接上报给调用方决定补救，否则会破坏仿真的计数与时延统计。

use thiserror::Error;

use super::id::{HostId, SwitchId, VmId};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NetError {
    /// 接收方 VM 在放置表中没有映射的主机。
    #[error("receiver vm {0:?} has no mapped host")]
    UnresolvableDestination(VmId),

    /// 需要上行转发但该交换机未配置任何上行交换机。
    #[error("switch {0:?} must forward upward but has no uplink configured")]
    UnroutableUplink(SwitchId),

    #[error("unknown host {0:?}")]
    UnknownHost(HostId),
}
