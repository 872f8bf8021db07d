//! 数据包类型
//!
//! 创建后基本不可变；只有 `receiver_host` 在路由解析时被填入。
//! 负载只有长度（用于时延计算），不携带内容。

use crate::sim::SimTime;

use super::id::{HostId, VmId};

#[derive(Debug, Clone)]
pub struct NetworkPacket {
    pub id: u64,
    pub sender_vm: VmId,
    pub receiver_vm: VmId,
    /// 发出该 packet 的主机。
    pub sender_host: HostId,
    /// 路由解析后填入的目的主机；到达主机前必定已解析。
    pub receiver_host: Option<HostId>,
    pub size_bytes: u64,
    pub created_at: SimTime,
}

impl NetworkPacket {
    /// 上行/哈希选路用的流键：同一对 VM 的 packet 始终走同一条上行。
    pub fn flow_key(&self) -> u64 {
        self.sender_vm
            .0
            .wrapping_mul(0x9E3779B97F4A7C15)
            .wrapping_add(self.receiver_vm.0)
    }
}
