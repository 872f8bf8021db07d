//! 主机实体
//!
//! 主机直接挂在一个边缘交换机下。持有收包统计与仅追加的
//! 利用率历史（过载检测器只读快照，从不修改）。

use crate::sim::SimTime;

use super::id::{HostId, SwitchId};
use super::packet::NetworkPacket;

#[derive(Debug)]
pub struct NetworkHost {
    id: HostId,
    name: String,
    edge: SwitchId,
    received_pkts: u64,
    received_bytes: u64,
    utilization: Vec<f64>,
}

impl NetworkHost {
    pub fn new(id: HostId, name: impl Into<String>, edge: SwitchId) -> Self {
        Self {
            id,
            name: name.into(),
            edge,
            received_pkts: 0,
            received_bytes: 0,
            utilization: Vec::new(),
        }
    }

    pub fn id(&self) -> HostId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// 该主机归属的边缘交换机。
    pub fn edge(&self) -> SwitchId {
        self.edge
    }

    pub fn record_delivery(&mut self, pkt: &NetworkPacket, _at: SimTime) {
        self.received_pkts += 1;
        self.received_bytes += pkt.size_bytes;
    }

    pub fn received_pkts(&self) -> u64 {
        self.received_pkts
    }

    pub fn received_bytes(&self) -> u64 {
        self.received_bytes
    }

    /// 追加一个利用率采样（时间序，旧→新）。
    pub fn record_utilization(&mut self, sample: f64) {
        self.utilization.push(sample);
    }

    /// 利用率历史快照（只读）。
    pub fn utilization_history(&self) -> &[f64] {
        &self.utilization
    }
}
