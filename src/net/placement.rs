//! VM 放置查询
//!
//! 路由只读取 VM→主机映射来解析接收方；映射本身由外层（broker/
//! 迁移执行）维护。未知 VM 是致命配置错误，直接上报。

use std::collections::HashMap;

use super::error::NetError;
use super::id::{HostId, SwitchId, VmId};

/// 放置查询接口：交换机路由经由它解析目的地。
pub trait PlacementOracle {
    fn host_for_vm(&self, vm: VmId) -> Result<HostId, NetError>;
    fn edge_for_host(&self, host: HostId) -> Result<SwitchId, NetError>;
}

/// 基于 HashMap 的放置表实现。
#[derive(Debug, Default)]
pub struct VmPlacement {
    vm_to_host: HashMap<VmId, HostId>,
    host_to_edge: HashMap<HostId, SwitchId>,
}

impl VmPlacement {
    /// 登记主机归属的边缘交换机（拓扑构建时调用一次）。
    pub fn register_host(&mut self, host: HostId, edge: SwitchId) {
        self.host_to_edge.insert(host, edge);
    }

    /// 放置（或迁移后重新放置）一台 VM。
    pub fn place(&mut self, vm: VmId, host: HostId) {
        self.vm_to_host.insert(vm, host);
    }

    /// 迁移：把 VM 改放到目标主机。返回原主机（若有）。
    pub fn migrate(&mut self, vm: VmId, target: HostId) -> Option<HostId> {
        self.vm_to_host.insert(vm, target)
    }

    /// 列出放置在指定主机上的全部 VM（升序，保证确定性）。
    pub fn vms_on_host(&self, host: HostId) -> Vec<VmId> {
        let mut vms: Vec<VmId> = self
            .vm_to_host
            .iter()
            .filter(|(_, h)| **h == host)
            .map(|(vm, _)| *vm)
            .collect();
        vms.sort();
        vms
    }
}

impl PlacementOracle for VmPlacement {
    fn host_for_vm(&self, vm: VmId) -> Result<HostId, NetError> {
        self.vm_to_host
            .get(&vm)
            .copied()
            .ok_or(NetError::UnresolvableDestination(vm))
    }

    fn edge_for_host(&self, host: HostId) -> Result<SwitchId, NetError> {
        self.host_to_edge
            .get(&host)
            .copied()
            .ok_or(NetError::UnknownHost(host))
    }
}
